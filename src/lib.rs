//! FluxTogether - real-time text-to-image generation
//!
//! The crate has two halves:
//!
//! - a generation proxy ([`api`]) that validates requests and forwards them to an
//!   image provider ([`provider`]) holding the API credential
//! - a generation console ([`console`]) that drives the proxy, deduplicates
//!   identical requests, and keeps a session history of results

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod provider;
