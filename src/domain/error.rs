#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("title is required")]
    MissingTitle,

    #[error("author is required")]
    MissingAuthor,

    #[error("publication year {0} is out of range (0-9999)")]
    YearOutOfRange(u32),

    #[error("{field} must not contain '|' or line breaks")]
    DelimiterInField { field: &'static str },

    #[error("Enter 1 or 2 to search by Title or Author.")]
    UnknownSearchMode(String),
}
