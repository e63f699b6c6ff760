pub mod activity;
pub mod pace;
pub mod time;
