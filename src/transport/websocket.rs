use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::accept_async;
use tungstenite::protocol::Message as WsMessage;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::node::NodeSender;
use crate::node::message::Message;

/// Registry of connected websocket clients, keyed by connection id.
///
/// Released messages are fanned out to every entry; the map is shared
/// between the accept loop and the fan-out task.
pub type ClientMap = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<WsMessage>>>>;

pub fn client_map() -> ClientMap {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Forwards every message the node releases to all connected clients.
///
/// Runs until the node's downstream channel closes. Serialization or send
/// failures are logged and skipped; a dead client never blocks the release
/// stream.
pub async fn forward_released(mut released: UnboundedReceiver<Message>, clients: ClientMap) {
    while let Some(msg) = released.recv().await {
        let text = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize released message: {e:?}");
                continue;
            }
        };
        let ws_msg = WsMessage::text(text);
        let clients = clients.lock().unwrap();
        for (client_id, sender) in clients.iter() {
            if let Err(e) = sender.send(ws_msg.clone()) {
                eprintln!("Failed to send to {client_id}: {e}");
            }
        }
    }
}

/// Accepts websocket connections and feeds their text frames into the node.
///
/// Each text frame is parsed as a JSON [`Message`]; frames that do not parse
/// are logged and dropped, so malformed input never stalls the queue. Every
/// connection is registered in `clients` so it also receives the released
/// message stream.
pub async fn start_websocket_server(addr: &str, inbound: NodeSender, clients: ClientMap) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");

    println!("WebSocket server listening on ws://{addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let inbound = inbound.clone();
        let clients = clients.clone();
        let client_id = format!("client-{}", uuid::Uuid::new_v4());

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    eprintln!("WebSocket handshake error: {e}");
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();

            // Channel carrying released messages to this client
            let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

            // Register before reading anything so the client cannot miss a
            // release caused by its own first frame
            {
                let mut clients = clients.lock().unwrap();
                clients.insert(client_id.clone(), tx);
            }

            // Forward released messages to this client
            let client_id_clone = client_id.clone();
            spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if let Err(e) = ws_sender.send(msg).await {
                        eprintln!("Failed to send message to {client_id_clone}: {e}");
                        break;
                    }
                }
                println!("Send loop closed for {client_id_clone}");
            });

            // Handle incoming frames from this client
            while let Some(Ok(msg)) = ws_receiver.next().await {
                if msg.is_text() {
                    let text = match msg.to_text() {
                        Ok(text) => text,
                        Err(e) => {
                            eprintln!("Non-UTF8 text frame from {client_id}: {e}");
                            continue;
                        }
                    };
                    match serde_json::from_str::<Message>(text) {
                        Ok(parsed) => {
                            if !inbound.send(parsed) {
                                eprintln!("Queue node is gone, dropping frame from {client_id}");
                                break;
                            }
                        }
                        Err(err) => {
                            eprintln!("Invalid inbound message: {err} | {text}");
                        }
                    }
                }
            }

            println!("{client_id} disconnected");

            {
                let mut clients = clients.lock().unwrap();
                clients.remove(&client_id);
            }
        });
    }
}
