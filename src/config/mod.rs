use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::constants::{MAX_RECENT_FILES, MAX_UNDO_HISTORY, MAX_UNDO_HISTORY_LIMIT};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Which vocabulary a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Entity,
    Relation,
}

impl LabelKind {
    pub fn noun(&self) -> &'static str {
        match self {
            LabelKind::Entity => "entity",
            LabelKind::Relation => "relation",
        }
    }
}

fn default_entity_types() -> Vec<String> {
    [
        "Dataset",
        "Task",
        "Method",
        "Metric",
        "Material",
        "Generic",
        "OtherScientificTerm",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_relation_types() -> Vec<String> {
    [
        "Used-For",
        "Feature-Of",
        "Hyponym-Of",
        "Part-Of",
        "Compare",
        "Conjunction",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_label_colors() -> BTreeMap<String, [u8; 3]> {
    [
        ("Dataset", [233, 30, 99]),
        ("Task", [33, 150, 243]),
        ("Method", [76, 175, 80]),
        ("Metric", [255, 152, 0]),
        ("Material", [156, 39, 176]),
        ("Generic", [96, 125, 139]),
        ("OtherScientificTerm", [255, 193, 7]),
        ("Used-For", [33, 150, 243]),
        ("Feature-Of", [76, 175, 80]),
        ("Hyponym-Of", [156, 39, 176]),
        ("Part-Of", [255, 152, 0]),
        ("Compare", [244, 67, 54]),
        ("Conjunction", [96, 125, 139]),
    ]
    .into_iter()
    .map(|(label, rgb)| (label.to_string(), rgb))
    .collect()
}

fn default_undo_depth() -> usize {
    MAX_UNDO_HISTORY
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Entity types offered in the type prompt, in display order
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<String>,

    /// Relation types offered in the type prompt, in display order
    #[serde(default = "default_relation_types")]
    pub relation_types: Vec<String>,

    /// Fixed colours per label; other labels get a hashed colour
    #[serde(default = "default_label_colors")]
    pub label_colors: BTreeMap<String, [u8; 3]>,

    /// How many edits can be undone per document
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,

    /// Recently opened collections, most recent first
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,

    /// Last opened collection (not auto-loaded, offered in the file menu)
    #[serde(default)]
    pub last_file_path: Option<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
            relation_types: default_relation_types(),
            label_colors: default_label_colors(),
            undo_depth: default_undo_depth(),
            recent_files: Vec::new(),
            last_file_path: None,
        }
    }
}

impl AppConfigData {
    pub fn labels(&self, kind: LabelKind) -> &[String] {
        match kind {
            LabelKind::Entity => &self.entity_types,
            LabelKind::Relation => &self.relation_types,
        }
    }

    /// Append labels not yet in the vocabulary. Returns how many were new.
    pub fn merge_labels<'a>(
        &mut self,
        kind: LabelKind,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let vocabulary = match kind {
            LabelKind::Entity => &mut self.entity_types,
            LabelKind::Relation => &mut self.relation_types,
        };
        let mut added = 0;
        for label in labels {
            let label = label.trim();
            if label.is_empty() || vocabulary.iter().any(|known| known == label) {
                continue;
            }
            vocabulary.push(label.to_string());
            added += 1;
        }
        added
    }

    /// Move `path` to the front of the recent list and remember it as last opened
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path.clone());
        self.recent_files.truncate(MAX_RECENT_FILES);
        self.last_file_path = Some(path);
    }

    /// Undo depth as stored, clamped to the supported range
    pub fn effective_undo_depth(&self) -> usize {
        self.undo_depth.clamp(1, MAX_UNDO_HISTORY_LIMIT)
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to push a collection onto the recent list
#[derive(Message)]
pub struct AddRecentFileRequest {
    pub path: PathBuf,
}

/// Message to add labels to a vocabulary
#[derive(Message)]
pub struct RegisterLabelsRequest {
    pub kind: LabelKind,
    pub labels: Vec<String>,
}

/// Message to change the undo depth
#[derive(Message)]
pub struct SetUndoDepthRequest {
    pub depth: usize,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from disk
fn load_config(config_path: &PathBuf) -> LoadConfigResult {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: AppConfigData::default(),
            reset_reason: None,
        };
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", config_path);
                LoadConfigResult {
                    data,
                    reset_reason: None,
                }
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                LoadConfigResult {
                    data: AppConfigData::default(),
                    reset_reason: Some(format!("Configuration file was corrupted: {}", e)),
                }
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            LoadConfigResult {
                data: AppConfigData::default(),
                reset_reason: Some(format!("Could not read configuration file: {}", e)),
            }
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Some(parent) = config.config_path.parent()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                error!("Failed to create config directory: {}", e);
                return;
            }
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn add_recent_file_system(
    mut events: MessageReader<AddRecentFileRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.add_recent_file(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn register_labels_system(
    mut events: MessageReader<RegisterLabelsRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let added = config
            .data
            .merge_labels(event.kind, event.labels.iter().map(String::as_str));
        if added > 0 {
            info!("Added {} {} type(s) to the vocabulary", added, event.kind.noun());
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

fn set_undo_depth_system(
    mut events: MessageReader<SetUndoDepthRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let depth = event.depth.clamp(1, MAX_UNDO_HISTORY_LIMIT);
        if config.data.undo_depth != depth {
            config.data.undo_depth = depth;
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<AddRecentFileRequest>()
            .add_message::<RegisterLabelsRequest>()
            .add_message::<SetUndoDepthRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    add_recent_file_system.run_if(on_message::<AddRecentFileRequest>),
                    register_labels_system.run_if(on_message::<RegisterLabelsRequest>),
                    set_undo_depth_system.run_if(on_message::<SetUndoDepthRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.entity_types.len(), 7);
        assert_eq!(data.relation_types.len(), 6);
        assert_eq!(data.undo_depth, MAX_UNDO_HISTORY);
        assert!(data.recent_files.is_empty());
        assert!(data.last_file_path.is_none());
        assert_eq!(data.label_colors.get("Task"), Some(&[33, 150, 243]));
    }

    #[test]
    fn test_app_config_data_serialization() {
        let mut data = AppConfigData::default();
        data.entity_types.push("Person".to_string());
        data.undo_depth = 120;
        data.add_recent_file(PathBuf::from("/data/train.jsonl"));

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: AppConfigData = serde_json::from_str(r#"{"undo_depth": 10}"#).unwrap();
        assert_eq!(parsed.undo_depth, 10);
        assert_eq!(parsed.entity_types, default_entity_types());
        assert_eq!(parsed.relation_types, default_relation_types());
    }

    #[test]
    fn test_merge_labels_skips_known_and_blank() {
        let mut data = AppConfigData::default();
        let added = data.merge_labels(LabelKind::Entity, ["Task", "Person", " ", "Person"]);
        assert_eq!(added, 1);
        assert_eq!(data.entity_types.last().map(String::as_str), Some("Person"));

        let added = data.merge_labels(LabelKind::Relation, ["Causes"]);
        assert_eq!(added, 1);
        assert!(data.labels(LabelKind::Relation).contains(&"Causes".to_string()));
    }

    #[test]
    fn test_recent_files_dedup_and_cap() {
        let mut data = AppConfigData::default();
        for i in 0..(MAX_RECENT_FILES + 3) {
            data.add_recent_file(PathBuf::from(format!("/data/{}.jsonl", i)));
        }
        data.add_recent_file(PathBuf::from("/data/5.jsonl"));

        assert_eq!(data.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(data.recent_files[0], PathBuf::from("/data/5.jsonl"));
        assert_eq!(
            data.recent_files
                .iter()
                .filter(|p| **p == PathBuf::from("/data/5.jsonl"))
                .count(),
            1
        );
        assert_eq!(data.last_file_path, Some(PathBuf::from("/data/5.jsonl")));
    }

    #[test]
    fn test_effective_undo_depth_clamped() {
        let mut data = AppConfigData::default();
        data.undo_depth = 0;
        assert_eq!(data.effective_undo_depth(), 1);
        data.undo_depth = 10_000;
        assert_eq!(data.effective_undo_depth(), MAX_UNDO_HISTORY_LIMIT);
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
