use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single playlist entry, either from the playlist in view or from a backup.
///
/// Only `videoId`, `title`, `unavailable` and `channelTitle` are typed. The
/// descriptive fields are kept as raw JSON so an entry with an unexpected
/// value type is still usable, and a merged list exports without losing data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PlaylistInfo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistBackup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_count: Option<usize>,
    pub videos: Vec<Video>,
}

impl PlaylistBackup {
    pub fn info(&self) -> PlaylistInfo {
        PlaylistInfo {
            id: self.id.clone().unwrap_or_default(),
            title: self.title.clone().unwrap_or_default(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// Top-level document written on export and accepted on restore.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub playlists: Vec<PlaylistBackup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Backup contents after the accepted file shapes have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBackup {
    pub playlist: Option<PlaylistInfo>,
    pub videos: Vec<Video>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    ExactMatch,
    UnavailableMatch,
    NoMatch,
}

/// A recovered title. Both indices are 1-based positions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableMatch {
    pub current_index: usize,
    pub file_index: usize,
    pub current_title: String,
    pub file_title: String,
    pub video_id: String,
    pub confidence: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoComparison {
    pub current_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_index: Option<usize>,
    pub current_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub status: MatchStatus,
    pub is_unavailable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub unavailable_matches: Vec<UnavailableMatch>,
    pub all_videos: Vec<VideoComparison>,
    pub merged_videos: Vec<Video>,
    pub has_new_data: bool,
}
