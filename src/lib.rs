pub mod api;
pub mod chat;
pub mod config;
pub mod grading;
pub mod session;
