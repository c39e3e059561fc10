use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("emit probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("tick interval must be greater than zero")]
    InvalidInterval,

    #[error("catalog pool is empty: {0}")]
    EmptyPool(&'static str),

    #[error("notification not found: {0}")]
    NotificationNotFound(String),

    #[error("unknown obra: {0}")]
    UnknownObra(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable code, printed ahead of the message when the
    /// CLI reports a failure.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidProbability(_) => "invalid_probability",
            AppError::InvalidInterval => "invalid_interval",
            AppError::EmptyPool(_) => "empty_pool",
            AppError::NotificationNotFound(_) => "notification_not_found",
            AppError::UnknownObra(_) => "unknown_obra",
            AppError::Config(_) => "invalid_config",
        }
    }
}

/// One-line failure report for the CLI: `[code] message` for application
/// errors (also when wrapped in context), the plain context chain otherwise.
pub fn report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AppError>() {
        Some(app) => format!("[{}] {:#}", app.code(), err),
        None => format!("{:#}", err),
    }
}
