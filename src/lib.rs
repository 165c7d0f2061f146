//! Single-patient dashboard over a precomputed PMS/GIS table.
//!
//! `data` loads and caches the table, `encode` turns rows into display
//! values, and `app` / `ui` draw them with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod encode;
pub mod error;
pub mod state;
pub mod ui;
