//! The `transport` module hosts the queue node behind a network edge,
//! primarily via WebSockets.
//!
//! It accepts connections, parses each text frame as a JSON message for the
//! node, and fans the node's released messages back out to every connected
//! client.

pub mod websocket;

#[cfg(test)]
mod tests;
