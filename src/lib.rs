//! urlshortener - A URL shortener with user accounts
//!
//! Anonymous visitors can shorten URLs. Signed-in users additionally own the
//! links they create and may list or delete them. Sessions are stateless
//! HS256 tokens carried in a cookie or an `Authorization: Bearer` header.
//!
//! # Architecture
//! - `storage`: Link and credential stores (SeaORM or in-memory)
//! - `services`: Shortening, redirect resolution, accounts and sessions
//! - `api`: HTTP handlers and the session guard middleware
//! - `config`: Configuration loading
//! - `runtime`: Application lifecycle and server mode
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
