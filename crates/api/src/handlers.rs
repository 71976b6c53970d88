//! Request handlers, one module per resource.

pub mod events;
pub mod gamers;
pub mod games;
pub mod publicans;
