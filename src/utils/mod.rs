//! The `utils` module provides small shared helpers used across `holdq`.
//!
//! Currently this is the lenient JSON normalization used by the control
//! protocol, where malformed values are absorbed instead of rejected.

pub mod parse;
