//! Wire types shared between the Birdie server and anything that displays
//! or drives a match (scoreboards, umpire tablets, history pages).
//!
//! Enable the `client` feature for a typed HTTP client.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
