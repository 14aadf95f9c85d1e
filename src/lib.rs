pub mod app;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
pub mod metrics;
pub mod state;
pub mod stats;
pub mod ui;
