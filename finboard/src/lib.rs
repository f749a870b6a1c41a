pub mod aggregation;
mod app;
pub mod app_core;
pub mod background;
pub mod category;
pub mod chart;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod filters;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod optimistic;
pub mod report;
pub mod state;
pub mod utils;

pub use app::App;

// Always expose testing module (integration tests need it)
pub mod testing;
