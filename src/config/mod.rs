//! Configuration management
//!
//! Static configuration is loaded once at startup and handed to each
//! component by reference. There is no process-wide config instance.

mod structs;

pub use structs::*;
