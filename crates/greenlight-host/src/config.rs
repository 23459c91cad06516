use serde::Deserialize;

use greenlight_redlight::config::DetectionMode;

/// Host configuration, loaded from `greenlight.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub player_name: String,
    /// Let the autopilot drive the player.
    pub autopilot: bool,
    /// Zero uses the game's own round count.
    pub round_count: u8,
    /// Zero disables the round time limit.
    pub round_duration_secs: u64,
    pub between_round_secs: u64,
    pub tick_rate_override: Option<f32>,
    pub seed: Option<u64>,
    pub detection: Option<DetectionMode>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            autopilot: true,
            round_count: 0,
            round_duration_secs: 0,
            between_round_secs: 3,
            tick_rate_override: None,
            seed: None,
            detection: None,
        }
    }
}

/// A host configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyPlayerName,
    InvalidTickRate(f32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPlayerName => write!(f, "player_name must not be empty"),
            Self::InvalidTickRate(rate) => {
                write!(f, "tick_rate_override must be a positive number (got {rate})")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

impl HostConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        if let Some(rate) = self.tick_rate_override
            && !(rate.is_finite() && rate > 0.0)
        {
            return Err(ConfigError::InvalidTickRate(rate));
        }
        Ok(())
    }

    /// Load config from the file named by `GREENLIGHT_HOST_CONFIG` (default
    /// `greenlight.toml`) if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("GREENLIGHT_HOST_CONFIG")
            .unwrap_or_else(|_| "greenlight.toml".to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                HostConfig::default()
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `GREENLIGHT_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("GREENLIGHT_PLAYER_NAME")
            && !name.is_empty()
        {
            self.player_name = name;
        }
        if let Some(val) = lookup("GREENLIGHT_AUTOPILOT")
            && let Ok(b) = val.parse::<bool>()
        {
            self.autopilot = b;
        }
        if let Some(val) = lookup("GREENLIGHT_ROUNDS")
            && let Ok(n) = val.parse::<u8>()
        {
            self.round_count = n;
        }
        if let Some(val) = lookup("GREENLIGHT_ROUND_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            self.round_duration_secs = n;
        }
        if let Some(val) = lookup("GREENLIGHT_TICK_RATE")
            && let Ok(n) = val.parse::<f32>()
        {
            self.tick_rate_override = Some(n);
        }
        if let Some(val) = lookup("GREENLIGHT_SEED")
            && let Ok(n) = val.parse::<u64>()
        {
            self.seed = Some(n);
        }
        if let Some(val) = lookup("GREENLIGHT_DETECTION") {
            match val.as_str() {
                "continuous" => self.detection = Some(DetectionMode::Continuous),
                "on_transition" => self.detection = Some(DetectionMode::OnTransition),
                other => tracing::warn!(value = other, "Unknown GREENLIGHT_DETECTION"),
            }
        }
    }
}
