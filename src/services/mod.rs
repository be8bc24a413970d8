pub mod converter;
pub mod download_service;
pub mod library;
pub mod provider;
pub mod watcher;
pub mod ytdlp;
