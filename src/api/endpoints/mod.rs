pub mod chat;
pub mod grade;
pub mod health;
