//! # gestao-core
//!
//! The three pages of the management dashboard, built on
//! [`gestao_sheet`] and the period resolver in [`gestao_period`]:
//!
//! - **NDs Realizadas**: debit notes filtered by period and attributes,
//!   with hour and value totals
//! - **Analistas**: yearly and monthly cost recovery per analyst
//! - **Gráficos NDs**: reclassified value per area over time
//!
//! Every page is a plain function of a loaded [`Sheet`] and the user's
//! [`Selections`]; [`Dashboard`] wires them to the configured workbook.
//!
//! [`Sheet`]: gestao_sheet::Sheet

/// Configuration loading.
pub mod config;
mod dashboard;
/// Error types and result aliases.
pub mod error;
pub mod pages;
mod selection;
mod table;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{GestaoError, GestaoResult};
pub use pages::Page;
pub use selection::Selections;
pub use table::{drop_sequential_column, FilterControl, Render, NO_DATA_WARNING};
