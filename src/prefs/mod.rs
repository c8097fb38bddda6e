//! Audio Preferences
//!
//! Persisted enable flags and track selection. The backing file is a
//! flat JSON object of string-encoded key-value pairs shared with other
//! game components (player name, unlock counters, language); this store
//! reads and writes only the three audio keys and preserves everything
//! else verbatim. Loading tolerates a missing or corrupt file by falling
//! back to defaults; audio preferences are never a fatal concern.

use crate::sequencer::patterns::TrackStyle;
use crate::{AudioEngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Storage key for the sound-effects flag
pub const KEY_SFX: &str = "audio.sfx";
/// Storage key for the music flag
pub const KEY_MUSIC: &str = "audio.music";
/// Storage key for the selected track style
pub const KEY_TRACK: &str = "audio.track";

/// Snapshot of the audio preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioPreferences {
    /// Sound effects enabled
    pub sfx_enabled: bool,
    /// Background music enabled
    pub music_enabled: bool,
    /// Selected background track style
    pub selected_track: TrackStyle,
}

impl Default for AudioPreferences {
    fn default() -> Self {
        AudioPreferences {
            sfx_enabled: true,
            music_enabled: true,
            selected_track: TrackStyle::Fun,
        }
    }
}

/// File-backed preference store
pub struct PreferenceStore {
    path: PathBuf,
    raw: Map<String, Value>,
    prefs: AudioPreferences,
}

fn decode_flag(value: Option<&Value>, default: bool) -> bool {
    match value.and_then(Value::as_str) {
        Some(s) => match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => true,
            "off" | "false" | "0" => false,
            _ => default,
        },
        None => default,
    }
}

fn encode_flag(on: bool) -> Value {
    Value::String(if on { "on" } else { "off" }.to_string())
}

impl PreferenceStore {
    /// Load preferences from `path`.
    ///
    /// Never fails: a missing file, unreadable JSON or malformed values
    /// all degrade to the defaults (sfx on, music on, track fun). Keys
    /// this store does not own are kept for the next save.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        let defaults = AudioPreferences::default();
        let selected_track = raw
            .get(KEY_TRACK)
            .and_then(Value::as_str)
            .map(TrackStyle::parse)
            .unwrap_or(defaults.selected_track);
        let prefs = AudioPreferences {
            sfx_enabled: decode_flag(raw.get(KEY_SFX), defaults.sfx_enabled),
            music_enabled: decode_flag(raw.get(KEY_MUSIC), defaults.music_enabled),
            selected_track,
        };

        PreferenceStore { path, raw, prefs }
    }

    /// Current preferences
    pub fn snapshot(&self) -> AudioPreferences {
        self.prefs
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enable or disable sound effects and persist
    pub fn set_sfx_enabled(&mut self, on: bool) -> Result<()> {
        self.prefs.sfx_enabled = on;
        self.persist()
    }

    /// Enable or disable background music and persist
    pub fn set_music_enabled(&mut self, on: bool) -> Result<()> {
        self.prefs.music_enabled = on;
        self.persist()
    }

    /// Select the background track style and persist
    pub fn set_track(&mut self, style: TrackStyle) -> Result<()> {
        self.prefs.selected_track = style;
        self.persist()
    }

    /// Write the audio keys back into the shared file, keeping foreign keys
    fn persist(&mut self) -> Result<()> {
        self.raw
            .insert(KEY_SFX.to_string(), encode_flag(self.prefs.sfx_enabled));
        self.raw
            .insert(KEY_MUSIC.to_string(), encode_flag(self.prefs.music_enabled));
        self.raw.insert(
            KEY_TRACK.to_string(),
            Value::String(self.prefs.selected_track.as_str().to_string()),
        );
        let text = serde_json::to_string_pretty(&Value::Object(self.raw.clone()))
            .map_err(|e| AudioEngineError::Prefs(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::load(dir.path().join("none.json"));
        assert_eq!(store.snapshot(), AudioPreferences::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json at all").unwrap();
        let store = PreferenceStore::load(&path);
        assert_eq!(store.snapshot(), AudioPreferences::default());
    }

    #[test]
    fn test_malformed_values_fall_back_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(
            &path,
            r#"{"audio.sfx": "maybe", "audio.music": "off", "audio.track": "bogus"}"#,
        )
        .unwrap();
        let store = PreferenceStore::load(&path);
        let prefs = store.snapshot();
        assert!(prefs.sfx_enabled, "unparseable flag keeps default");
        assert!(!prefs.music_enabled);
        assert_eq!(prefs.selected_track, TrackStyle::Fun);
    }

    #[test]
    fn test_round_trip_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut store = PreferenceStore::load(&path);
            store.set_track(TrackStyle::Adventure).unwrap();
            store.set_music_enabled(false).unwrap();
        }
        // simulated process restart
        let store = PreferenceStore::load(&path);
        assert_eq!(store.snapshot().selected_track, TrackStyle::Adventure);
        assert!(!store.snapshot().music_enabled);
        assert!(store.snapshot().sfx_enabled);
    }

    #[test]
    fn test_foreign_keys_preserved_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(
            &path,
            r#"{"player.name": "Ada", "progress.unlocked": "7", "audio.sfx": "off"}"#,
        )
        .unwrap();
        let mut store = PreferenceStore::load(&path);
        assert!(!store.snapshot().sfx_enabled);
        store.set_track(TrackStyle::Chill).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["player.name"], "Ada");
        assert_eq!(value["progress.unlocked"], "7");
        assert_eq!(value["audio.track"], "chill");
        assert_eq!(value["audio.sfx"], "off");
    }

    #[test]
    fn test_flags_are_string_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut store = PreferenceStore::load(&path);
        store.set_sfx_enabled(true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[KEY_SFX], "on");
        assert_eq!(value[KEY_MUSIC], "on");
    }
}
