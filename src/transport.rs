use crate::errors::{TransportError, TransportResult};
use crate::messages::{ClientRequest, TopicEnvelope};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, trace, warn};

/// Broker connection wrapper that handles message streaming.
///
/// Frames are newline-delimited JSON in both directions. Received envelopes
/// are fanned out on a broadcast channel; devices subscribe and filter for
/// their own topic.
pub struct TopicClient {
    /// Broadcast sender for received envelopes (subscribed by every device)
    tx: broadcast::Sender<TopicEnvelope>,
    /// Write half of the broker link, shared by request senders
    writer: Mutex<OwnedWriteHalf>,
}

impl TopicClient {
    /// Connect to the broker and announce `node_name`.
    /// Starts the receive loop before the first request is written.
    pub async fn connect(addr: &str, node_name: &str) -> TransportResult<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::ConnectError {
                addr: addr.to_string(),
                source,
            })?;
        let (read_half, write_half) = stream.into_split();

        // Buffer sized for bursts of high-rate sensor data
        let (tx, _rx) = broadcast::channel(1000);
        Self::spawn_receive_loop(read_half, tx.clone());

        let client = Self {
            tx,
            writer: Mutex::new(write_half),
        };
        client
            .send_request(&ClientRequest::Hello {
                node: node_name.to_string(),
            })
            .await?;
        info!("[transport] connected to {} as '{}'", addr, node_name);
        Ok(client)
    }

    /// Ask the broker for messages published on `topic` and return a receiver
    /// of everything this connection delivers.
    ///
    /// The receiver is created before the subscribe frame is written, so no
    /// message for the topic can be delivered without a listener.
    pub async fn subscribe(
        &self,
        topic: &str,
    ) -> TransportResult<broadcast::Receiver<TopicEnvelope>> {
        let rx = self.tx.subscribe();
        self.send_request(&ClientRequest::Subscribe {
            topic: topic.to_string(),
        })
        .await?;
        info!("[transport] subscribed to {}", topic);
        Ok(rx)
    }

    async fn send_request(&self, request: &ClientRequest) -> TransportResult<()> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    fn spawn_receive_loop(read_half: OwnedReadHalf, tx: broadcast::Sender<TopicEnvelope>) {
        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            info!("[transport] receive loop started");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<TopicEnvelope>(&line) {
                            Ok(envelope) => {
                                trace!("[transport] message on {}", envelope.topic);
                                if tx.send(envelope).is_err() {
                                    trace!("[transport] no active receivers");
                                }
                            }
                            Err(e) => {
                                // Decoding is owned here, consumers never see
                                // malformed frames
                                warn!("[transport] skipping undecodable frame: {}", e);
                            }
                        }
                    }
                    Ok(None) => {
                        error!("[transport] connection closed by peer");
                        break;
                    }
                    Err(e) => {
                        error!("[transport] read failed: {}", e);
                        break;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Header, ImuMessage, TimeStamp, Vector3};
    use tokio::net::TcpListener;

    fn sample_envelope(topic: &str) -> TopicEnvelope {
        TopicEnvelope {
            topic: topic.to_string(),
            msg: ImuMessage {
                header: Header {
                    stamp: TimeStamp { sec: 7, nanosec: 0 },
                    frame_id: "imu_link".to_string(),
                },
                linear_acceleration: Vector3 { x: 0.5, y: 1.5, z: 9.81 },
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_subscribe_and_receive() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let broker = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();

            let hello: ClientRequest =
                serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
            assert_eq!(
                hello,
                ClientRequest::Hello { node: "test_node".to_string() }
            );

            let subscribe: ClientRequest =
                serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
            assert_eq!(
                subscribe,
                ClientRequest::Subscribe { topic: "/imu/data".to_string() }
            );

            // A garbage frame must not kill the receive loop
            write_half.write_all(b"not a json frame\n").await.unwrap();

            let mut frame = serde_json::to_string(&sample_envelope("/imu/data")).unwrap();
            frame.push('\n');
            write_half.write_all(frame.as_bytes()).await.unwrap();
        });

        let client = TopicClient::connect(&addr.to_string(), "test_node")
            .await
            .unwrap();
        let mut rx = client.subscribe("/imu/data").await.unwrap();

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope, sample_envelope("/imu/data"));

        broker.await.unwrap();
    }
}
