pub mod health;
pub mod storage_events;
pub mod webhook;
