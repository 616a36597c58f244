//! neato-http library
//!
//! Controls a Neato robot vacuum through the nucleo cloud API:
//! - Request signing and the signed HTTPS command transport
//! - Typed decoding of nucleo responses
//! - House cleaning orchestration (resume / start with map / start without map)
//! - A small HTTP API exposing it as `/houseCleaning`

pub mod config;
pub mod error;
pub mod house_cleaning;
pub mod response;
pub mod robot;
pub mod server;
pub mod signer;
pub mod transport;
