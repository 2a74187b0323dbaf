//! Non-fatal findings from importing editor exports.

use std::fmt;

/// Something odd in the input that was repaired or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWarning {
    /// Record the warning is about (generated pipe name, node id, ...).
    pub subject: String,
    pub message: String,
}

impl ImportWarning {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Collects warnings and mirrors each one to the log.
#[derive(Debug, Default)]
pub(crate) struct WarningSink {
    warnings: Vec<ImportWarning>,
}

impl WarningSink {
    pub(crate) fn push(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let warning = ImportWarning::new(subject, message);
        tracing::warn!(subject = %warning.subject, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub(crate) fn into_vec(self) -> Vec<ImportWarning> {
        self.warnings
    }
}
