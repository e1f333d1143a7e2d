pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod record;
pub mod score;
pub mod session;
pub mod source;
