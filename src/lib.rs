//! CryptoArcade Library
//!
//! Market signal derivation, recommendation plumbing and arcade wallet
//! core for the Crypto Arcade site

pub mod config;
pub mod error;
pub mod games;
pub mod market_data;
pub mod recommendation;
pub mod session;
pub mod signals;
pub mod types;
