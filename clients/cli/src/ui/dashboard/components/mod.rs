//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod alerts_panel;
pub mod conditions_table;
pub mod footer;
pub mod header;
pub mod logs;
pub mod popups;
pub mod portfolio_table;
