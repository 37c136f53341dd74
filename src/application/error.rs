use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("ambiguous ID prefix: '{prefix}' matches {count} books")]
    AmbiguousId { prefix: String, count: usize },

    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl AppError {
    /// 呼び出し側の入力に起因するエラーかどうか
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AppError::Domain(_) | AppError::AmbiguousId { .. })
    }
}
