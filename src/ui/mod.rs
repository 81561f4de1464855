//! GUI panels and application state.

pub mod app;
pub mod batch_card;
pub mod charts;
pub mod components;
pub mod dashboard;
pub mod finance_dialogs;
pub mod finance_panel;
pub mod processing_panel;

pub use app::App;
