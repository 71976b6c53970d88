pub mod ban;
pub mod event;
pub mod game;
