pub mod calendar;
pub mod event;
pub mod game;
pub mod publican;
