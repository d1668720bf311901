//! A terminal countdown timer for focused work cycles.

pub mod app;
pub mod config;
pub mod countdown;
pub mod cycle;
pub mod error;
pub mod form;
pub mod logging;
pub mod notify;
pub mod theme;
pub mod ui;

pub use error::{Error, Result};
