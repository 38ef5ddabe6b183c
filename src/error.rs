//! Error types.
//!
//! `CompareError` covers the ways a backup file can be rejected by the
//! comparison engine. Everything else the crate can fail on (reading files,
//! the on-disk store, configuration) is folded into [`Error`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("backup file is empty")]
    EmptyFile,

    #[error("backup file is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("backup file does not contain a playlist or a list of videos")]
    UnsupportedFormat,

    #[error("backup belongs to playlist {backup_id} but {current_id} is loaded")]
    PlaylistMismatch {
        current_id: String,
        current_title: String,
        backup_id: String,
        backup_title: String,
    },
}

impl CompareError {
    /// Message suitable for showing to the user before asking for another file.
    pub fn user_message(&self) -> String {
        match self {
            CompareError::EmptyFile => "The selected file is empty.".to_string(),
            CompareError::InvalidJson(_) => {
                "The selected file is not a valid JSON backup.".to_string()
            }
            CompareError::UnsupportedFormat => {
                "The selected file is not in a supported backup format.".to_string()
            }
            CompareError::PlaylistMismatch {
                current_id,
                current_title,
                backup_id,
                backup_title,
            } => format!(
                "This backup is for \"{}\", but the playlist being viewed is \"{}\". Choose a backup of the same playlist.",
                display_name(backup_title, backup_id),
                display_name(current_title, current_id)
            ),
        }
    }
}

fn display_name<'a>(title: &'a str, id: &'a str) -> &'a str {
    if title.trim().is_empty() {
        id
    } else {
        title
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("failed to read '{}': {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no playlist has been loaded yet")]
    NoPlaylistLoaded,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn user_message(&self) -> String {
        match self {
            Error::Compare(e) => e.user_message(),
            Error::ReadFailure { .. } => "The selected file could not be read.".to_string(),
            Error::NoPlaylistLoaded => {
                "Load a playlist before comparing it with a backup.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_playlists() {
        let err = CompareError::PlaylistMismatch {
            current_id: "PL1".to_string(),
            current_title: "Road Trip".to_string(),
            backup_id: "PL2".to_string(),
            backup_title: "Gym Mix".to_string(),
        };

        let message = err.user_message();
        assert!(message.contains("Road Trip"));
        assert!(message.contains("Gym Mix"));
    }

    #[test]
    fn test_mismatch_message_falls_back_to_ids() {
        let err = CompareError::PlaylistMismatch {
            current_id: "PL1".to_string(),
            current_title: "Road Trip".to_string(),
            backup_id: "PL2".to_string(),
            backup_title: String::new(),
        };

        let message = err.user_message();
        assert!(message.contains("\"PL2\""));
        assert!(message.contains("\"Road Trip\""));
        assert!(!message.contains("\"\""));
    }

    #[test]
    fn test_compare_error_passes_through() {
        let err: Error = CompareError::EmptyFile.into();
        assert_eq!(err.user_message(), "The selected file is empty.");
        assert_eq!(err.to_string(), "backup file is empty");
    }
}
