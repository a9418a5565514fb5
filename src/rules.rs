use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Shortest accepted timer period, in seconds.
pub const MIN_PERIOD: f32 = 0.01;

/// Every tunable of the game. Missing fields in `rules.json` fall back to
/// the values in [`GameRules::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub seed: Option<u64>,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub vsync_enabled: bool,
    pub max_frame_delta: f32,
    pub debug_overlay: bool,

    // Player
    pub gravity: f32,
    pub flap_strength: f32,
    pub launch_strength: f32,
    pub player_start_x: f32,
    pub player_start_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub flap_tilt_degrees: f32,
    pub flap_tilt_duration: f32,
    pub wing_frame_interval: f32,
    pub fall_margin: f32,
    pub ceiling_margin: f32,

    // Spawning and motion
    pub spawn_offset_x: f32,
    pub despawn_x: f32,
    pub obstacle_interval: f32,
    pub obstacle_speed: f32,
    pub obstacle_min_y: f32,
    pub obstacle_max_y: f32,
    pub obstacle_size: f32,
    pub coin_interval: f32,
    pub coin_speed: f32,
    pub coin_min_y: f32,
    pub coin_max_y: f32,
    pub coin_size: f32,
    pub coin_spin_duration: f32,

    // Run
    pub coins_needed: u32,
    pub start_lives: i32,
    pub coin_score: u32,
    pub score_interval: f32,

    // Presentation timings
    pub hit_flash_duration: f32,
    pub finish_fade_duration: f32,
    pub heart_reveal_duration: f32,
    pub background_scroll_speed: f32,

    // End scene
    pub dialogue_messages: Vec<String>,
    pub end_scene_buttons: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            seed: None,
            viewport_width: 360.0,
            viewport_height: 640.0,
            vsync_enabled: true,
            max_frame_delta: 0.1,
            debug_overlay: false,
            gravity: 600.0,
            flap_strength: 260.0,
            launch_strength: 120.0,
            player_start_x: 0.2,
            player_start_y: 0.45,
            player_width: 32.0,
            player_height: 30.0,
            flap_tilt_degrees: -12.0,
            flap_tilt_duration: 0.12,
            wing_frame_interval: 0.12,
            fall_margin: 30.0,
            ceiling_margin: 40.0,
            spawn_offset_x: 40.0,
            despawn_x: -40.0,
            obstacle_interval: 1.2,
            obstacle_speed: 180.0,
            obstacle_min_y: 0.2,
            obstacle_max_y: 0.86,
            obstacle_size: 22.0,
            coin_interval: 0.9,
            coin_speed: 160.0,
            coin_min_y: 0.2,
            coin_max_y: 0.7,
            coin_size: 38.4,
            coin_spin_duration: 1.2,
            coins_needed: 8,
            start_lives: 1,
            coin_score: 10,
            score_interval: 0.5,
            hit_flash_duration: 0.2,
            finish_fade_duration: 0.6,
            heart_reveal_duration: 0.6,
            // half a pixel per 16ms frame
            background_scroll_speed: 31.25,
            dialogue_messages: default_dialogue(),
            end_scene_buttons: true,
        }
    }
}

pub fn default_dialogue() -> Vec<String> {
    [
        "Você chegou",
        "Eu estava com saudade",
        "Sinto algo lindo em você",
        "É muito mais do que sonhei para mim",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl GameRules {
    /// Clamps values that would break the run loop (zero periods, inverted
    /// spawn bands, a zero coin target).
    pub fn sanitized(mut self) -> Self {
        let defaults = GameRules::default();

        self.viewport_width = self.viewport_width.max(1.0);
        self.viewport_height = self.viewport_height.max(1.0);
        if self.max_frame_delta <= 0.0 {
            self.max_frame_delta = defaults.max_frame_delta;
        }

        self.coins_needed = self.coins_needed.max(1);
        self.start_lives = self.start_lives.max(1);

        for (value, fallback) in [
            (&mut self.obstacle_interval, defaults.obstacle_interval),
            (&mut self.coin_interval, defaults.coin_interval),
            (&mut self.score_interval, defaults.score_interval),
            (&mut self.coin_spin_duration, defaults.coin_spin_duration),
            (&mut self.wing_frame_interval, defaults.wing_frame_interval),
        ] {
            if *value <= 0.0 || !value.is_finite() {
                *value = fallback;
            } else {
                *value = value.max(MIN_PERIOD);
            }
        }

        for value in [
            &mut self.flap_tilt_duration,
            &mut self.hit_flash_duration,
            &mut self.finish_fade_duration,
            &mut self.heart_reveal_duration,
        ] {
            *value = value.max(0.0);
        }

        (self.obstacle_min_y, self.obstacle_max_y) =
            ordered_band(self.obstacle_min_y, self.obstacle_max_y);
        (self.coin_min_y, self.coin_max_y) = ordered_band(self.coin_min_y, self.coin_max_y);

        if self.dialogue_messages.is_empty() {
            self.dialogue_messages = defaults.dialogue_messages;
        }

        self
    }
}

fn ordered_band(a: f32, b: f32) -> (f32, f32) {
    let a = a.clamp(0.0, 1.0);
    let b = b.clamp(0.0, 1.0);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub fn read_rules(path: impl AsRef<Path>) -> Result<GameRules, GameError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GameError::RulesIo {
        path: path.to_path_buf(),
        source,
    })?;
    let rules: GameRules = serde_json::from_str(&text).map_err(|source| GameError::RulesParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rules.sanitized())
}

/// Reads the rules file, falling back to defaults when it is missing or
/// malformed.
pub fn load_rules(path: impl AsRef<Path>) -> GameRules {
    match read_rules(path.as_ref()) {
        Ok(rules) => {
            debug!("Loaded rules from {:?}", path.as_ref());
            rules
        }
        Err(e) => {
            warn!("{e}. Using defaults.");
            GameRules::default()
        }
    }
}

pub fn save_rules(path: impl AsRef<Path>, rules: &GameRules) -> Result<(), GameError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(rules)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GameError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| GameError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_constants() {
        let rules = GameRules::default();
        assert_eq!(rules.coins_needed, 8);
        assert_eq!(rules.start_lives, 1);
        assert_eq!(rules.coin_score, 10);
        assert_eq!(rules.viewport_width, 360.0);
        assert_eq!(rules.viewport_height, 640.0);
        assert_eq!(rules.dialogue_messages.len(), 4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let rules: GameRules = serde_json::from_str(r#"{ "coins_needed": 3 }"#).unwrap();
        assert_eq!(rules.coins_needed, 3);
        assert_eq!(rules.gravity, 600.0);
        assert_eq!(rules.obstacle_interval, 1.2);
    }

    #[test]
    fn test_sanitized_fixes_degenerate_values() {
        let rules = GameRules {
            coins_needed: 0,
            start_lives: -2,
            score_interval: 0.0,
            coin_min_y: 0.9,
            coin_max_y: 0.1,
            dialogue_messages: Vec::new(),
            ..GameRules::default()
        }
        .sanitized();

        assert_eq!(rules.coins_needed, 1);
        assert_eq!(rules.start_lives, 1);
        assert_eq!(rules.score_interval, 0.5);
        assert_eq!((rules.coin_min_y, rules.coin_max_y), (0.1, 0.9));
        assert_eq!(rules.dialogue_messages, default_dialogue());
    }

    #[test]
    fn test_tiny_periods_are_raised_to_minimum() {
        let rules = GameRules {
            obstacle_interval: 1e-6,
            coin_interval: 1e-9,
            score_interval: 0.002,
            ..GameRules::default()
        }
        .sanitized();

        assert_eq!(rules.obstacle_interval, MIN_PERIOD);
        assert_eq!(rules.coin_interval, MIN_PERIOD);
        assert_eq!(rules.score_interval, MIN_PERIOD);
        assert_eq!(rules.wing_frame_interval, 0.12);
    }

    #[test]
    fn test_save_then_read_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config/rules.json");
        let rules = GameRules {
            coins_needed: 5,
            seed: Some(42),
            ..GameRules::default()
        };

        save_rules(&path, &rules).unwrap();
        let loaded = read_rules(&path).unwrap();
        assert_eq!(loaded.coins_needed, 5);
        assert_eq!(loaded.seed, Some(42));
    }

    #[test]
    fn test_load_rules_falls_back_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_rules(&path), Err(GameError::RulesParse { .. })));
        let rules = load_rules(&path);
        assert_eq!(rules.coins_needed, 8);
    }

    #[test]
    fn test_missing_rules_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_rules(dir.path().join("absent.json"));
        assert!(matches!(result, Err(GameError::RulesIo { .. })));
    }
}
