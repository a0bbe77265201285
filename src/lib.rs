pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod favorites;
pub mod format;
pub mod models;
pub mod paging;
pub mod ui;
