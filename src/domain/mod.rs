pub mod audio;
pub mod reply;
pub mod speech;
