//! # PubGames Core
//!
//! Domain types shared by the store and the HTTP API, plus the slot booking
//! engine. This crate does no I/O.

pub mod booking;
pub mod errors;
pub mod models;
pub mod selection;
