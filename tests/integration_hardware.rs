//! Hardware integration test suite.
//!
//! These tests require two real boards and are ignored by default.
//! Run with: cargo test --features hardware-tests -- --ignored

#![cfg(feature = "hardware-tests")]

#[path = "hardware/mod.rs"]
mod hardware;
