pub mod api;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod plugin;
pub mod ui;
pub mod utils;
