pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::core::backup::parse_backup;
pub use crate::core::compare::{compare, is_unavailable_title, RECOVERY_CONFIDENCE};
pub use crate::core::models::{
    BackupDocument, ComparisonResult, MatchStatus, PlaylistBackup, PlaylistInfo, UnavailableMatch,
    Video, VideoComparison,
};
pub use crate::error::{CompareError, Error, Result};

use crate::core::backup::{
    backup_export_filename, build_backup_document, build_merged_backup, merged_export_filename,
};
use crate::core::store::{FileStore, PlaylistSession};
use crate::core::utils::{read_file_as_text, write_json_atomic};

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

fn open_session(dir: &Path) -> PlaylistSession<FileStore> {
    PlaylistSession::new(FileStore::new(dir))
}

pub fn initialize_store(dir: &Path) -> Result<()> {
    FileStore::new(dir).init()
}

/// Reads a backup-shaped file and makes its playlist the one in view.
pub fn import_playlist(dir: &Path, file: &Path, now: DateTime<Utc>) -> Result<PlaylistInfo> {
    let text = read_file_as_text(file)?;
    let parsed = parse_backup(&text)?;
    let playlist_info = parsed.playlist.unwrap_or_default();

    let playlist = PlaylistBackup {
        id: Some(playlist_info.id.clone()),
        title: Some(playlist_info.title.clone()),
        thumbnail: playlist_info.thumbnail.clone(),
        videos: parsed.videos,
        ..Default::default()
    };

    let video_count = playlist.videos.len();
    open_session(dir).load_playlist(playlist, now)?;
    info!(id = %playlist_info.id, videos = video_count, "loaded playlist");

    Ok(playlist_info)
}

/// Compares the playlist in view with a backup file. Nothing is read when no
/// playlist has been loaded.
pub fn compare_backup(dir: &Path, backup_file: &Path) -> Result<ComparisonResult> {
    let session = open_session(dir);
    let playlist = session
        .current_playlist()?
        .ok_or(Error::NoPlaylistLoaded)?;

    let text = read_file_as_text(backup_file)?;
    let result = compare(&playlist.videos, &text, Some(&playlist.info()))?;

    info!(
        backup = %backup_file.display(),
        recovered = result.unavailable_matches.len(),
        "comparison finished"
    );

    Ok(result)
}

/// Stores the merged list from `result` as the playlist in view.
pub fn apply_recovery(dir: &Path, result: &ComparisonResult) -> Result<()> {
    open_session(dir).apply_merged(&result.merged_videos)
}

pub fn export_merged(
    dir: &Path,
    result: &ComparisonResult,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let playlist_info = open_session(dir)
        .current_playlist_info()?
        .ok_or(Error::NoPlaylistLoaded)?;

    let document = build_merged_backup(&result.merged_videos, &playlist_info, now);
    let target = out_dir.join(merged_export_filename(now.date_naive()));
    write_json_atomic(&target, &document)?;
    info!(path = %target.display(), "exported merged playlist");

    Ok(target)
}

/// Writes every playlist in the session history to a single backup file.
pub fn export_all_playlists(dir: &Path, out_dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let playlists = open_session(dir).saved_playlists()?;
    if playlists.is_empty() {
        return Err(Error::NoPlaylistLoaded);
    }

    let document = build_backup_document(playlists, now);
    let target = out_dir.join(backup_export_filename(now.date_naive()));
    write_json_atomic(&target, &document)?;
    info!(path = %target.display(), playlists = document.playlists.len(), "exported backup");

    Ok(target)
}

pub fn current_playlist(dir: &Path) -> Result<Option<PlaylistBackup>> {
    open_session(dir).current_playlist()
}
