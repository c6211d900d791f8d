//! Shared model and pure logic for alert administration
//!
//! This library holds the alert record, the field validation engine, message
//! keys, master list query logic and value formatters used by the alert editor.

pub mod error;
pub mod formatter;
pub mod listing;
pub mod messages;
pub mod order_help;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_utilities;

// Re-export commonly used types
pub use error::*;
pub use listing::{ListFilter, ListQuery, MasterViewState, SortKey};
pub use messages::*;
pub use order_help::{help_block, OrderHelpBlock};
pub use types::*;
pub use validation::*;
