pub mod download;
pub mod health;
pub mod home;
pub mod search;
