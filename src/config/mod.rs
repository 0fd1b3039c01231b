use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::MAX_RECENT_MAPS;
use crate::geo::{GeoPosition, Viewport};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_zoom() -> u8 {
    Viewport::default().zoom
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Simulator executable launched with F5
    #[serde(default)]
    pub simulator_path: Option<PathBuf>,

    /// Map center used for new maps and for files without a viewport element
    #[serde(default)]
    pub default_center: GeoPosition,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    /// Last opened map file path (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_map_path: Option<PathBuf>,

    /// Recently opened maps, most recent first
    #[serde(default)]
    pub recent_maps: Vec<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            simulator_path: None,
            default_center: GeoPosition::default(),
            default_zoom: default_zoom(),
            last_map_path: None,
            recent_maps: Vec::new(),
        }
    }
}

impl AppConfigData {
    /// Viewport a fresh document starts from, sized to the given window.
    pub fn default_viewport(&self, width: i32, height: i32) -> Viewport {
        Viewport {
            width,
            height,
            ..Viewport::new(self.default_center, self.default_zoom)
        }
    }

    /// Move `path` to the front of the recent list.
    pub fn remember_map(&mut self, path: PathBuf) {
        self.recent_maps.retain(|p| p != &path);
        self.recent_maps.insert(0, path.clone());
        self.recent_maps.truncate(MAX_RECENT_MAPS);
        self.last_map_path = Some(path);
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
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource for the "map file missing" warning dialog
#[derive(Resource, Default)]
pub struct MissingMapWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
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

/// Message to update the last map path in config
#[derive(Message)]
pub struct UpdateLastMapPathRequest {
    pub path: PathBuf,
}

/// Message to set the simulator executable
#[derive(Message)]
pub struct SetSimulatorPathRequest {
    pub path: PathBuf,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config JSON, falling back to defaults with a reason on failure.
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult {
        config: AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
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
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create application directories: {}", e);
    }
    let result = load_config();
    config.data = result.config.data;
    config.config_path = result.config.config_path;
    config.dirty = result.config.dirty;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if last map exists
fn check_last_map_exists(config: Res<AppConfig>, mut warning: ResMut<MissingMapWarning>) {
    if let Some(ref path) = config.data.last_map_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened map no longer exists: {:?}", path);
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

/// System to update last map path and the recent list
fn update_last_map_path_system(
    mut events: MessageReader<UpdateLastMapPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_map(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn set_simulator_path_system(
    mut events: MessageReader<SetSimulatorPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.simulator_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        info!("Simulator set to {:?}", event.path);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingMapWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastMapPathRequest>()
            .add_message::<SetSimulatorPathRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_map_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_map_path_system.run_if(on_message::<UpdateLastMapPathRequest>),
                    set_simulator_path_system.run_if(on_message::<SetSimulatorPathRequest>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert!(data.simulator_path.is_none());
        assert!(data.recent_maps.is_empty());
        assert!(data.last_map_path.is_none());
        assert_eq!(data.default_zoom, Viewport::default().zoom);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            simulator_path: Some(PathBuf::from("/opt/sim/run")),
            default_center: GeoPosition::new(47.37, 8.54),
            default_zoom: 14,
            last_map_path: Some(PathBuf::from("/path/to/map.xml")),
            recent_maps: vec![PathBuf::from("/path/one"), PathBuf::from("/path/two")],
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.simulator_path, data.simulator_path);
        assert_eq!(parsed.default_center, data.default_center);
        assert_eq!(parsed.default_zoom, 14);
        assert_eq!(parsed.recent_maps, data.recent_maps);
        assert_eq!(parsed.last_map_path, data.last_map_path);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let (data, reason) = parse_config("{}");
        assert!(reason.is_none());
        assert_eq!(data.default_zoom, Viewport::default().zoom);
        assert_eq!(data.default_center, GeoPosition::default());
    }

    #[test]
    fn test_corrupt_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert!(reason.is_some_and(|r| r.contains("corrupted")));
        assert!(data.simulator_path.is_none());
    }

    #[test]
    fn test_remember_map_moves_to_front_and_caps() {
        let mut data = AppConfigData::default();
        for i in 0..7 {
            data.remember_map(PathBuf::from(format!("map{}.xml", i)));
        }
        data.remember_map(PathBuf::from("map4.xml"));

        assert_eq!(data.recent_maps.len(), MAX_RECENT_MAPS);
        assert_eq!(data.recent_maps[0], PathBuf::from("map4.xml"));
        assert_eq!(data.recent_maps[1], PathBuf::from("map6.xml"));
        assert_eq!(data.last_map_path, Some(PathBuf::from("map4.xml")));
        assert_eq!(
            data.recent_maps.iter().filter(|p| **p == PathBuf::from("map4.xml")).count(),
            1
        );
    }

    #[test]
    fn test_default_viewport_uses_window_size() {
        let data = AppConfigData::default();
        let vp = data.default_viewport(800, 600);
        assert_eq!((vp.width, vp.height), (800, 600));
        assert_eq!(vp.center, data.default_center);
    }

    #[test]
    fn test_missing_map_warning_default() {
        let warning = MissingMapWarning::default();
        assert!(!warning.show);
        assert!(warning.path.is_none());
    }
}
