use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

use crate::config::NodeSettings;
use crate::node::clock::SystemClock;
use crate::node::message::Message;
use crate::node::{NodeSender, QueueNode};
use crate::transport::websocket::{client_map, forward_released};

// This is a helper that mirrors the frame-handling part of the websocket
// server: parse the text as a message and post it to the node.
fn handle_text(inbound: &NodeSender, text: &str) {
    match serde_json::from_str::<Message>(text) {
        Ok(msg) => {
            let _ = inbound.send(msg);
        }
        Err(err) => eprintln!("Invalid inbound message: {err} | {text}"),
    }
}

fn spawn_node() -> (
    crate::node::NodeHandle,
    mpsc::UnboundedReceiver<Message>,
    mpsc::UnboundedReceiver<crate::node::status::Status>,
) {
    let (released_tx, released_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let settings = NodeSettings {
        first_message_bypass: false,
        bypass_interval_ms: 0,
    };
    let node = QueueNode::spawn(&settings, released_tx, status_tx, Arc::new(SystemClock));
    (node, released_rx, status_rx)
}

#[tokio::test]
async fn test_text_frames_drive_the_node() {
    let (node, mut released_rx, _status_rx) = spawn_node();
    let inbound = node.sender();

    let payload = json!({ "body": "hello" }).to_string();
    handle_text(&inbound, &payload);

    let trigger = json!({ "trigger": true }).to_string();
    handle_text(&inbound, &trigger);

    let released = released_rx.recv().await.unwrap();
    assert_eq!(released.extra["body"], "hello");
    assert_eq!(released.queue_count, Some(0));
}

#[tokio::test]
async fn test_invalid_frame_is_dropped_without_stalling() {
    let (node, mut released_rx, _status_rx) = spawn_node();
    let inbound = node.sender();

    handle_text(&inbound, "not json at all");

    // the node is still alive and answering queries
    let query = json!({ "queueCount": true }).to_string();
    handle_text(&inbound, &query);

    let reply = released_rx.recv().await.unwrap();
    assert_eq!(reply.queue_count, Some(0));
}

#[tokio::test]
async fn test_released_messages_fan_out_to_every_client() {
    let clients = client_map();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel::<WsMessage>();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel::<WsMessage>();
    clients.lock().unwrap().insert("client-a".to_string(), tx_a);
    clients.lock().unwrap().insert("client-b".to_string(), tx_b);

    let (released_tx, released_rx) = mpsc::unbounded_channel::<Message>();
    tokio::spawn(forward_released(released_rx, clients.clone()));

    let msg: Message = serde_json::from_value(json!({ "body": "out", "_queueCount": 2 })).unwrap();
    released_tx.send(msg).unwrap();

    for rx in [&mut rx_a, &mut rx_b] {
        let got = rx.recv().await.unwrap();
        if let WsMessage::Text(text) = got {
            let parsed: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            assert_eq!(parsed["body"], "out");
            assert_eq!(parsed["_queueCount"], 2);
        } else {
            panic!("Expected a text frame");
        }
    }
}

#[tokio::test]
async fn test_dead_client_does_not_block_the_release_stream() {
    let clients = client_map();
    let (tx_dead, rx_dead) = mpsc::unbounded_channel::<WsMessage>();
    let (tx_live, mut rx_live) = mpsc::unbounded_channel::<WsMessage>();
    clients.lock().unwrap().insert("dead".to_string(), tx_dead);
    clients.lock().unwrap().insert("live".to_string(), tx_live);

    // Drop the receiver to close the dead client's channel
    drop(rx_dead);

    let (released_tx, released_rx) = mpsc::unbounded_channel::<Message>();
    tokio::spawn(forward_released(released_rx, clients.clone()));

    let msg: Message = serde_json::from_value(json!({ "body": "still flowing" })).unwrap();
    released_tx.send(msg).unwrap();

    let got = rx_live.recv().await.unwrap();
    assert!(got.is_text());
}
