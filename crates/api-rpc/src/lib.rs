//! JSON-RPC API Layer
//!
//! Exposes the deploy desk to chat front ends over JSON-RPC 2.0.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::RpcServer;
