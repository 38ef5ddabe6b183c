use crate::core::backup::parse_backup;
use crate::core::models::{
    ComparisonResult, MatchStatus, PlaylistInfo, UnavailableMatch, Video, VideoComparison,
};
use crate::error::CompareError;

use std::collections::HashMap;
use tracing::debug;

/// Id matches are exact, so every recovery is reported with full confidence.
pub const RECOVERY_CONFIDENCE: u8 = 100;

const UNAVAILABLE_TITLES: [&str; 6] = [
    "Deleted video",
    "Private video",
    "Unavailable video",
    "[Deleted video]",
    "[Private video]",
    "[Unavailable video]",
];

pub fn is_unavailable_title(title: &str) -> bool {
    let title = title.to_lowercase();
    UNAVAILABLE_TITLES
        .iter()
        .any(|placeholder| title.contains(&placeholder.to_lowercase()))
}

fn is_unavailable(video: &Video) -> bool {
    video.unavailable || is_unavailable_title(&video.title)
}

/// Maps each video id to the entry and its 0-based position in `videos`.
/// Entries without an id are skipped; on duplicates the later entry wins.
pub fn create_video_map(videos: &[Video]) -> HashMap<&str, (usize, &Video)> {
    videos
        .iter()
        .enumerate()
        .filter_map(|(pos, video)| video.video_id.as_deref().map(|id| (id, (pos, video))))
        .collect()
}

/// Rejects a backup taken from a different playlist. Only applies when both
/// sides carry a non-empty id.
pub fn check_playlist_match(
    current: Option<&PlaylistInfo>,
    backup: Option<&PlaylistInfo>,
) -> Result<(), CompareError> {
    if let (Some(current), Some(backup)) = (current, backup) {
        if !current.id.is_empty() && !backup.id.is_empty() && current.id != backup.id {
            return Err(CompareError::PlaylistMismatch {
                current_id: current.id.clone(),
                current_title: current.title.clone(),
                backup_id: backup.id.clone(),
                backup_title: backup.title.clone(),
            });
        }
    }
    Ok(())
}

pub fn compare_videos(current_videos: &[Video], backup_videos: &[Video]) -> ComparisonResult {
    let backup_map = create_video_map(backup_videos);

    let mut unavailable_matches = Vec::new();
    let mut all_videos = Vec::with_capacity(current_videos.len());
    let mut merged_videos = Vec::with_capacity(current_videos.len());

    for (pos, current) in current_videos.iter().enumerate() {
        let current_index = pos + 1;
        let current_unavailable = is_unavailable(current);

        let found = current
            .video_id
            .as_deref()
            .and_then(|id| backup_map.get(id).map(|entry| (id, *entry)));

        let Some((video_id, (file_pos, file_video))) = found else {
            all_videos.push(VideoComparison {
                current_index,
                file_index: None,
                current_title: current.title.clone(),
                file_title: None,
                video_id: current.video_id.clone(),
                status: MatchStatus::NoMatch,
                is_unavailable: current_unavailable,
            });
            merged_videos.push(current.clone());
            continue;
        };

        let recovers = current_unavailable && !is_unavailable_title(&file_video.title);
        let status = if recovers {
            MatchStatus::UnavailableMatch
        } else {
            MatchStatus::ExactMatch
        };

        if recovers {
            unavailable_matches.push(UnavailableMatch {
                current_index,
                file_index: file_pos + 1,
                current_title: current.title.clone(),
                file_title: file_video.title.clone(),
                video_id: video_id.to_string(),
                confidence: RECOVERY_CONFIDENCE,
            });

            let channel_title = file_video
                .channel_title
                .clone()
                .filter(|channel| !channel.is_empty())
                .or_else(|| current.channel_title.clone());

            merged_videos.push(Video {
                title: file_video.title.clone(),
                unavailable: false,
                channel_title,
                ..current.clone()
            });
        } else {
            merged_videos.push(current.clone());
        }

        all_videos.push(VideoComparison {
            current_index,
            file_index: Some(file_pos + 1),
            current_title: current.title.clone(),
            file_title: Some(file_video.title.clone()),
            video_id: Some(video_id.to_string()),
            status,
            is_unavailable: current_unavailable,
        });
    }

    let has_new_data = !unavailable_matches.is_empty();

    debug!(
        current = current_videos.len(),
        backup = backup_videos.len(),
        recovered = unavailable_matches.len(),
        "compared playlist against backup"
    );

    ComparisonResult {
        unavailable_matches,
        all_videos,
        merged_videos,
        has_new_data,
    }
}

/// Validates a backup file and compares it with the videos currently in view.
///
/// Validation stops at the first failure and no partial result is produced.
pub fn compare(
    current_videos: &[Video],
    backup_text: &str,
    current_playlist: Option<&PlaylistInfo>,
) -> Result<ComparisonResult, CompareError> {
    let backup = parse_backup(backup_text)?;
    check_playlist_match(current_playlist, backup.playlist.as_ref())?;

    Ok(compare_videos(current_videos, &backup.videos))
}
