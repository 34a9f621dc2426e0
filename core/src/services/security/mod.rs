//! Startup checks on security settings and the operational security report.

mod report;
mod settings;

pub use report::SecurityReport;
pub use settings::{validate_security_settings, SecuritySettingsCheck};
