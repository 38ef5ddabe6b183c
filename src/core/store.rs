use crate::core::models::{PlaylistBackup, PlaylistInfo, Video};
use crate::core::utils::write_json_atomic;
use crate::error::{Error, Result};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const STORE_DIR: &str = ".missingtube";
pub const STORE_FILE: &str = "store.json";

const CURRENT_PLAYLIST_KEY: &str = "currentPlaylist";
const PLAYLISTS_KEY: &str = "playlists";

/// String key/value persistence used by the playlist session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in a single JSON object at `<root>/.missingtube/store.json`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: &Path) -> Self {
        Self {
            path: base_path.join(STORE_DIR).join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !self.path.exists() {
            write_json_atomic(&self.path, &Value::Object(Map::new()))?;
            info!(path = %self.path.display(), "created store");
        }

        Ok(())
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load()?;
        Ok(entries
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.init()?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        write_json_atomic(&self.path, &Value::Object(entries))?;
        debug!(key, "stored value");
        Ok(())
    }
}

/// The playlist currently in view plus the history of loaded playlists,
/// kept in a [`KeyValueStore`].
pub struct PlaylistSession<S> {
    store: S,
}

impl<S: KeyValueStore> PlaylistSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn current_playlist(&self) -> Result<Option<PlaylistBackup>> {
        match self.store.get(CURRENT_PLAYLIST_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn current_videos(&self) -> Result<Vec<Video>> {
        Ok(self
            .current_playlist()?
            .map(|playlist| playlist.videos)
            .unwrap_or_default())
    }

    pub fn current_playlist_info(&self) -> Result<Option<PlaylistInfo>> {
        Ok(self.current_playlist()?.map(|playlist| playlist.info()))
    }

    pub fn saved_playlists(&self) -> Result<Vec<PlaylistBackup>> {
        match self.store.get(PLAYLISTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Makes `playlist` the one in view and records it in the history.
    pub fn load_playlist(&mut self, mut playlist: PlaylistBackup, now: DateTime<Utc>) -> Result<()> {
        playlist.last_accessed = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        playlist.video_count = Some(playlist.videos.len());
        self.save_current(&playlist)
    }

    /// Replaces the videos of the playlist in view, typically with the merged
    /// list from a comparison.
    pub fn apply_merged(&mut self, merged_videos: &[Video]) -> Result<()> {
        let mut playlist = self
            .current_playlist()?
            .ok_or(Error::NoPlaylistLoaded)?;
        playlist.videos = merged_videos.to_vec();
        playlist.video_count = Some(playlist.videos.len());
        self.save_current(&playlist)
    }

    fn save_current(&mut self, playlist: &PlaylistBackup) -> Result<()> {
        self.store
            .set(CURRENT_PLAYLIST_KEY, &serde_json::to_string(playlist)?)?;

        let mut history = self.saved_playlists()?;
        // playlists without an id share one history slot
        let id = playlist.id.as_deref().unwrap_or_default();
        match history
            .iter_mut()
            .find(|saved| saved.id.as_deref().unwrap_or_default() == id)
        {
            Some(saved) => *saved = playlist.clone(),
            None => history.push(playlist.clone()),
        }
        self.store.set(PLAYLISTS_KEY, &serde_json::to_string(&history)?)
    }
}
