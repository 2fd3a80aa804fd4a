//! Atlas Voyager: Moroccan trip planning with Gemini.

pub mod debug_log;

pub mod api;
pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod model;
pub mod ui;

pub use error::{AppError, AppResult};
