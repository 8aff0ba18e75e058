//! linkvault - embedded storage for short links and sessions
//!
//! Short-code-to-URL records are persisted in a single redb file; sessions
//! live in an expiring in-memory map.
//!
//! # Architecture
//! - `storage`: URL record store (`UrlDb` contract, redb backend, codec)
//! - `session`: session store (`SessionStore` contract, in-memory backend)
//! - `utils`: random identifier generation and time parsing
//! - `config`: static configuration
//! - `system`: logging setup
//! - `interfaces`: administrative CLI

pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod session;
pub mod storage;
pub mod system;
pub mod utils;
