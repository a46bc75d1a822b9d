use std::sync::Arc;

use tokio::sync::mpsc;

use holdq::config::load_config;
use holdq::node::QueueNode;
use holdq::node::clock::SystemClock;
use holdq::transport::websocket::{client_map, forward_released, start_websocket_server};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let (released_tx, released_rx) = mpsc::unbounded_channel();
    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let node = QueueNode::spawn(&config.node, released_tx, status_tx, Arc::new(SystemClock));

    let clients = client_map();
    tokio::spawn(forward_released(released_rx, clients.clone()));
    tokio::spawn(async move {
        while let Some(status) = status_rx.recv().await {
            println!("queue status: {status}");
        }
    });

    start_websocket_server(&addr, node.sender(), clients).await;

    node.shutdown();
    node.join().await;
}
