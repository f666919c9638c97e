//! HTTP transport for the JSON-RPC endpoint
//!
//! Hands GET query pairs and POST bodies to the dispatcher and writes the
//! serialized JSON-RPC response back.

pub mod handlers;
