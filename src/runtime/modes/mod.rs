//! Mode routing
//!
//! Only the HTTP server mode exists; `config-gen` is handled in `main`.

pub mod server;

pub use server::run_server;
