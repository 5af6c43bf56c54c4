//! Casefile
//!
//! Renders the JSON output of a content threat scanner as an HTML report
//! page or a styled terminal report.

pub mod cli;
pub mod errors;
pub mod models;
pub mod reporter;
pub mod summary;
pub mod terminal;
pub mod utils;

pub use errors::{CasefileError, CasefileResult};
pub use models::{EntityValue, ReportInput, ScanResult, SensitiveInfo};
pub use reporter::HtmlReporter;
pub use summary::{tally_categories, CategoryTally};
pub use terminal::TerminalReporter;
