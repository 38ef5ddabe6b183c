use crate::core::models::{BackupDocument, ParsedBackup, PlaylistBackup, PlaylistInfo, Video};
use crate::error::CompareError;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

pub const BACKUP_VERSION: &str = "1.0.0";

/// The file shapes a backup may arrive in. Order matters: serde tries the
/// variants top to bottom.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum BackupShape {
    Collection(BackupDocument),
    Playlist(PlaylistBackup),
    VideoList(Vec<Video>),
}

impl BackupShape {
    /// Picks the playlist to compare against. A collection contributes its
    /// first playlist, a bare list has no playlist metadata.
    pub fn into_playlist(self) -> Result<(Option<PlaylistInfo>, Vec<Video>), CompareError> {
        match self {
            BackupShape::Collection(doc) => {
                let first = doc
                    .playlists
                    .into_iter()
                    .next()
                    .ok_or(CompareError::UnsupportedFormat)?;
                Ok((Some(first.info()), first.videos))
            }
            BackupShape::Playlist(playlist) => Ok((Some(playlist.info()), playlist.videos)),
            BackupShape::VideoList(videos) => Ok((None, videos)),
        }
    }
}

pub fn parse_backup(text: &str) -> Result<ParsedBackup, CompareError> {
    if text.trim().is_empty() {
        return Err(CompareError::EmptyFile);
    }

    let value: Value = serde_json::from_str(text).map_err(CompareError::InvalidJson)?;
    let shape =
        BackupShape::deserialize(value).map_err(|_| CompareError::UnsupportedFormat)?;
    let (playlist, videos) = shape.into_playlist()?;

    // a non-empty list in which nothing carries an id is not a video list
    if !videos.is_empty() && videos.iter().all(|video| video.video_id.is_none()) {
        return Err(CompareError::UnsupportedFormat);
    }

    Ok(ParsedBackup { playlist, videos })
}

pub fn build_backup_document(playlists: Vec<PlaylistBackup>, now: DateTime<Utc>) -> BackupDocument {
    BackupDocument {
        playlists,
        created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        version: Some(BACKUP_VERSION.to_string()),
    }
}

/// Wraps a merged video list in the same document shape restore accepts, so
/// the export can be fed straight back into a comparison.
pub fn build_merged_backup(
    merged_videos: &[Video],
    playlist: &PlaylistInfo,
    now: DateTime<Utc>,
) -> BackupDocument {
    let entry = PlaylistBackup {
        id: Some(playlist.id.clone()),
        title: Some(playlist.title.clone()),
        thumbnail: playlist.thumbnail.clone(),
        last_accessed: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        video_count: Some(merged_videos.len()),
        videos: merged_videos.to_vec(),
    };

    build_backup_document(vec![entry], now)
}

pub fn merged_export_filename(date: NaiveDate) -> String {
    format!("merged-complete-{}.json", date.format("%Y-%m-%d"))
}

pub fn backup_export_filename(date: NaiveDate) -> String {
    format!("missingtube-backup-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn video(video_id: &str, title: &str) -> Video {
        Video {
            video_id: Some(video_id.to_string()),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_collection_uses_first_playlist() {
        let text = json!({
            "playlists": [
                {"id": "PL1", "title": "First", "videos": [{"videoId": "a", "title": "A"}]},
                {"id": "PL2", "title": "Second", "videos": []}
            ],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "version": "1.0.0"
        })
        .to_string();

        let parsed = parse_backup(&text).unwrap();
        assert_eq!(parsed.playlist.unwrap().id, "PL1");
        assert_eq!(parsed.videos, vec![video("a", "A")]);
    }

    #[test]
    fn test_parse_single_playlist() {
        let text = json!({
            "id": "PL9",
            "title": "Solo",
            "thumbnail": "https://i.ytimg.com/vi/a/default.jpg",
            "videos": [{"videoId": "a", "title": "A", "channelTitle": "Chan"}]
        })
        .to_string();

        let parsed = parse_backup(&text).unwrap();
        let info = parsed.playlist.unwrap();
        assert_eq!(info.title, "Solo");
        assert_eq!(parsed.videos[0].channel_title.as_deref(), Some("Chan"));
    }

    #[test]
    fn test_parse_bare_array() {
        let text = r#"[{"videoId": "a", "title": "A"}, {"videoId": "b", "title": "B"}]"#;

        let parsed = parse_backup(text).unwrap();
        assert!(parsed.playlist.is_none());
        assert_eq!(parsed.videos.len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        assert!(matches!(parse_backup(""), Err(CompareError::EmptyFile)));
        assert!(matches!(parse_backup("  \n\t"), Err(CompareError::EmptyFile)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_backup("{not json"),
            Err(CompareError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        for text in [r#"{"foo": 1}"#, "42", r#""text""#, r#"{"playlists": []}"#, "[1, 2]"] {
            assert!(
                matches!(parse_backup(text), Err(CompareError::UnsupportedFormat)),
                "expected UnsupportedFormat for {}",
                text
            );
        }
    }

    #[test]
    fn test_parse_rejects_entries_without_video_ids() {
        for text in [
            r#"[{"foo": 1}]"#,
            r#"[{"title": "Song A"}, {"title": "Song B"}]"#,
            r#"{"id": "PL1", "videos": [{"title": "Song A"}]}"#,
        ] {
            assert!(
                matches!(parse_backup(text), Err(CompareError::UnsupportedFormat)),
                "expected UnsupportedFormat for {}",
                text
            );
        }
    }

    #[test]
    fn test_parse_accepts_partial_ids_and_empty_lists() {
        let parsed = parse_backup(r#"[{"title": "Loose"}, {"videoId": "a", "title": "A"}]"#).unwrap();
        assert_eq!(parsed.videos.len(), 2);

        let empty = parse_backup(r#"{"id": "PL1", "title": "Empty", "videos": []}"#).unwrap();
        assert!(empty.videos.is_empty());
    }

    #[test]
    fn test_unknown_video_fields_survive() {
        let text = r#"[{"videoId": "a", "title": "A", "addedBy": "someone"}]"#;

        let parsed = parse_backup(text).unwrap();
        let round_trip = serde_json::to_value(&parsed.videos[0]).unwrap();
        assert_eq!(round_trip["addedBy"], "someone");
        assert_eq!(round_trip["videoId"], "a");
    }

    #[test]
    fn test_merged_backup_round_trips_through_parser() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        let info = PlaylistInfo {
            id: "PL1".to_string(),
            title: "Mix".to_string(),
            thumbnail: None,
        };
        let videos = vec![video("a", "Original Song A"), video("b", "Song B")];

        let doc = build_merged_backup(&videos, &info, now);
        assert_eq!(doc.version.as_deref(), Some("1.0.0"));
        assert_eq!(doc.created_at.as_deref(), Some("2024-03-05T10:30:00.000Z"));
        assert_eq!(doc.playlists[0].video_count, Some(2));

        let text = serde_json::to_string_pretty(&doc).unwrap();
        let parsed = parse_backup(&text).unwrap();
        assert_eq!(parsed.playlist, Some(info));
        assert_eq!(parsed.videos, videos);
    }

    #[test]
    fn test_export_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(merged_export_filename(date), "merged-complete-2024-03-05.json");
        assert_eq!(backup_export_filename(date), "missingtube-backup-2024-03-05.json");
    }
}
