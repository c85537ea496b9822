//! Content errors

use thiserror::Error;

/// Errors raised while turning a source file into a post
#[derive(Debug, Error)]
pub enum PostError {
    /// The front-matter date could not be parsed in any supported format
    #[error("invalid date '{value}' in {path}")]
    InvalidDate { value: String, path: String },

    /// No usable file name could be derived for the post
    #[error("invalid post id '{value}' in {path}")]
    InvalidId { value: String, path: String },

    /// The front-matter block could not be decoded
    #[error("invalid front-matter in {path}: {message}")]
    FrontMatter { path: String, message: String },
}
