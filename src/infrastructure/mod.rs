pub mod config;
pub mod http;
pub mod repositories;
pub mod telegram;
pub mod transcoder;
