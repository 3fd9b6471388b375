//! Usage errors surfaced to the CLI as exit code 2.

use thiserror::Error;

/// Missing inputs detected before any request is prepared.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    /// Neither a note URL nor both id and token were given.
    #[error("provide --note-url or both --note-id and --xsec-token.")]
    MissingNote,
    /// No cookie string from `--cookies` or `.env` `COOKIES`.
    #[error("COOKIES not found. Set .env COOKIES or pass --cookies.")]
    MissingCookies,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_input() {
        assert!(UsageError::MissingNote.to_string().contains("--note-url"));
        assert!(UsageError::MissingCookies.to_string().contains("COOKIES"));
    }

    #[test]
    fn downcasts_from_anyhow() {
        let err: anyhow::Error = UsageError::MissingCookies.into();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::MissingCookies)
        );
    }
}
