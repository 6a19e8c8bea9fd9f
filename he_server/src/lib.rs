//! HTTP/WebSocket front end for the hold'em table engine.
//!
//! Exposes the router and configuration so integration tests can drive the
//! API without binding a socket.

pub mod api;
pub mod config;
pub mod logging;
