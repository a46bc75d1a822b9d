//! # holdq
//!
//! `holdq` is a single-slot, event-driven message buffering stage built with
//! Rust. It accepts arbitrary JSON messages one at a time, holds them in an
//! ordered, time-limited backlog, and releases them downstream either on an
//! explicit trigger message or automatically at a configurable cadence.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `node`: The queueing/release state machine — backlog, expiry filtering,
//!   the bypass timer, the control-message protocol and status reporting.
//! - `config`: Handles loading and managing server and node configuration.
//! - `transport`: Hosts the node behind a WebSocket server and fans released
//!   messages out to connected clients.
//! - `utils`: Shared helpers, such as the lenient JSON value normalization
//!   used by the control protocol.

pub mod config;
pub mod node;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
