pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Add some highlights first to create a mind map (book {book_id} has none)")]
    NoHighlights { book_id: String },

    #[error("Book not found: {id}")]
    BookNotFound { id: String },

    #[error("Highlight index {index} out of range (book has {len} highlights)")]
    HighlightOutOfRange { index: usize, len: usize },

    #[error("Invalid backup file: {message}")]
    InvalidBackup { message: String },

    #[error("Invalid config JSON: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
