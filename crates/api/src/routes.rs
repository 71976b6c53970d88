pub mod events;
pub mod gamers;
pub mod games;
pub mod health;
pub mod publicans;
