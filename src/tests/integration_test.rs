use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

use crate::config::NodeSettings;
use crate::node::QueueNode;
use crate::node::clock::SystemClock;
use crate::transport::websocket::{client_map, forward_released, start_websocket_server};

#[tokio::test]
async fn integration_queue_and_trigger_end_to_end() {
    use tokio_tungstenite::connect_async;

    let (released_tx, released_rx) = mpsc::unbounded_channel();
    let (status_tx, _status_rx) = mpsc::unbounded_channel();
    let settings = NodeSettings {
        first_message_bypass: false,
        bypass_interval_ms: 0,
    };
    let node = QueueNode::spawn(&settings, released_tx, status_tx, Arc::new(SystemClock));

    let clients = client_map();
    tokio::spawn(forward_released(released_rx, clients.clone()));

    let addr = "127.0.0.1:9021";
    let inbound = node.sender();
    tokio::spawn(async move {
        start_websocket_server(addr, inbound, clients).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (mut ws, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client connect");

    let payload = json!({ "body": "hello" }).to_string();
    ws.send(WsMessage::text(payload)).await.unwrap();

    let trigger = json!({ "trigger": true }).to_string();
    ws.send(WsMessage::text(trigger)).await.unwrap();

    if let Some(Ok(WsMessage::Text(text))) = ws.next().await {
        let parsed: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(parsed["body"], "hello");
        assert_eq!(parsed["_queueCount"], 0);
        assert!(parsed.get("_queuetimestamp").is_some());
    } else {
        panic!("did not receive the released message");
    }

    node.shutdown();
    node.join().await;
}
