//! Domain error types.

/// Top-level error type for papertrader.
///
/// Business-rule refusals (insufficient cash, closed market, loan-risk cap,
/// wrong dividend ticker) are not errors; engines report those through their
/// outcome enums and leave state untouched. `PapertraderError` covers invariant
/// violations and infrastructure failures only.
#[derive(Debug, thiserror::Error)]
pub enum PapertraderError {
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("no stock lot at index {index}")]
    UnknownLot { index: usize },

    #[error("no loan at index {index}")]
    UnknownLoan { index: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("statement write error: {reason}")]
    Statement { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PapertraderError {
    /// Shorthand for the invariant-violation variant.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        PapertraderError::InvalidState {
            reason: reason.into(),
        }
    }
}

impl From<&PapertraderError> for std::process::ExitCode {
    fn from(err: &PapertraderError) -> Self {
        let code: u8 = match err {
            PapertraderError::Io(_) => 1,
            PapertraderError::ConfigParse { .. }
            | PapertraderError::ConfigMissing { .. }
            | PapertraderError::ConfigInvalid { .. } => 2,
            PapertraderError::Statement { .. } => 3,
            PapertraderError::InvalidState { .. }
            | PapertraderError::UnknownLot { .. }
            | PapertraderError::UnknownLoan { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
