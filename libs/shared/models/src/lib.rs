pub mod auth;
pub mod authorization;
pub mod error;
pub mod status;
pub mod time;
