use rand::Rng;
use serde::{Deserialize, Serialize};

use greenlight_core::events::LightColor;

/// Inclusive range of seconds a light color persists before the next flip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellRange {
    pub min: f32,
    pub max: f32,
}

impl DwellRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a dwell duration uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

/// Dwell ranges for each light color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTiming {
    pub green: DwellRange,
    pub red: DwellRange,
}

impl Default for LightTiming {
    fn default() -> Self {
        Self {
            green: DwellRange::new(5.0, 10.0),
            red: DwellRange::new(2.0, 2.7),
        }
    }
}

impl LightTiming {
    pub fn dwell_for(&self, color: LightColor) -> DwellRange {
        match color {
            LightColor::Green => self.green,
            LightColor::Red => self.red,
        }
    }

    /// Shortest dwell either color can draw.
    pub fn shortest_dwell(&self) -> f32 {
        self.green.min.min(self.red.min)
    }
}

/// When a moving actor counts as caught.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Only at the instant the light turns red.
    OnTransition,
    /// At the red transition and on every tick while the light stays red.
    #[default]
    Continuous,
}

/// Rules the game session enforces for the controlled actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    pub light: LightTiming,
    pub detection: DetectionMode,
    /// Forward/backward speed (units/s).
    pub move_speed: f32,
    /// Sideways speed (units/s).
    pub lateral_speed: f32,
    /// Where the actor stands after start or reset. Forward increases position.
    pub start_position: f32,
    /// Reaching or passing this position wins the round.
    pub finish_line: f32,
    /// Sideways movement is clamped to `±field_half_width`.
    pub field_half_width: f32,
    /// Larger frame deltas are clamped to this (seconds).
    pub max_frame_delta: f32,
    /// Round time limit in seconds. Zero disables it.
    pub time_limit_secs: f32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            light: LightTiming::default(),
            detection: DetectionMode::Continuous,
            move_speed: 5.0,
            lateral_speed: 5.0,
            start_position: 0.0,
            finish_line: 40.0,
            field_half_width: 20.0,
            max_frame_delta: 0.25,
            time_limit_secs: 0.0,
        }
    }
}

impl SessionRules {
    pub fn time_limit(&self) -> Option<f32> {
        (self.time_limit_secs > 0.0).then_some(self.time_limit_secs)
    }
}

/// AI contestant crowd tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestantConfig {
    pub count: u32,
    /// Speed of contestant 0 (units/s).
    pub base_speed: f32,
    /// Extra speed per contestant index.
    pub speed_step: f32,
    /// Per-tick speed variation as a fraction of base speed.
    pub speed_jitter: f32,
    /// Chance per green tick that a contestant walks.
    pub move_chance: f64,
    /// Chance that a contestant walking at the red flip gets caught.
    /// Lower it for a more forgiving crowd.
    pub caught_chance: f64,
    /// Contestants spawn up to this far behind the start line.
    pub spread: f32,
}

impl Default for ContestantConfig {
    fn default() -> Self {
        Self {
            count: 8,
            base_speed: 3.0,
            speed_step: 0.2,
            speed_jitter: 0.1,
            move_chance: 0.9,
            caught_chance: 1.0,
            spread: 10.0,
        }
    }
}

/// Autopilot tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Seconds the bot waits after green before walking.
    pub hesitation_secs: f32,
    /// The bot stops when less than this much green remains.
    pub safety_margin_secs: f32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            hesitation_secs: 0.3,
            safety_margin_secs: 0.2,
        }
    }
}

/// Data-driven configuration for Red Light, Green Light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedLightConfig {
    pub session: SessionRules,
    pub contestants: ContestantConfig,
    pub bot: BotConfig,
    pub tick_rate_hz: f32,
    pub round_count: u8,
    /// Fixed RNG seed. Unset draws a fresh seed per round.
    pub seed: Option<u64>,
}

impl Default for RedLightConfig {
    fn default() -> Self {
        Self {
            session: SessionRules::default(),
            contestants: ContestantConfig::default(),
            bot: BotConfig::default(),
            tick_rate_hz: 30.0,
            round_count: 1,
            seed: None,
        }
    }
}

/// A configuration value the game cannot run with.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidDwell {
        color: LightColor,
        min: f32,
        max: f32,
    },
    NonPositive {
        field: &'static str,
        value: f32,
    },
    Negative {
        field: &'static str,
        value: f32,
    },
    ChanceOutOfRange {
        field: &'static str,
        value: f64,
    },
    FinishBehindStart {
        start: f32,
        finish: f32,
    },
    FrameDeltaTooLarge {
        max_frame_delta: f32,
        shortest_dwell: f32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDwell { color, min, max } => {
                write!(f, "{color} dwell range {min}..={max} is invalid")
            },
            Self::NonPositive { field, value } => write!(f, "{field} must be > 0 (got {value})"),
            Self::Negative { field, value } => write!(f, "{field} must be >= 0 (got {value})"),
            Self::ChanceOutOfRange { field, value } => {
                write!(f, "{field} must be within 0..=1 (got {value})")
            },
            Self::FinishBehindStart { start, finish } => {
                write!(f, "finish_line {finish} must be ahead of start_position {start}")
            },
            Self::FrameDeltaTooLarge {
                max_frame_delta,
                shortest_dwell,
            } => write!(
                f,
                "max_frame_delta {max_frame_delta} must be shorter than the shortest dwell {shortest_dwell}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn chance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { field, value })
    }
}

impl RedLightConfig {
    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.session;
        for color in [LightColor::Green, LightColor::Red] {
            let dwell = rules.light.dwell_for(color);
            if !dwell.is_valid() {
                return Err(ConfigError::InvalidDwell {
                    color,
                    min: dwell.min,
                    max: dwell.max,
                });
            }
        }
        positive("session.move_speed", rules.move_speed)?;
        positive("session.lateral_speed", rules.lateral_speed)?;
        positive("session.max_frame_delta", rules.max_frame_delta)?;
        positive("session.field_half_width", rules.field_half_width)?;
        positive("tick_rate_hz", self.tick_rate_hz)?;
        if rules.finish_line.partial_cmp(&rules.start_position) != Some(std::cmp::Ordering::Greater) {
            return Err(ConfigError::FinishBehindStart {
                start: rules.start_position,
                finish: rules.finish_line,
            });
        }
        // One tick may flip the light at most once.
        let shortest = rules.light.shortest_dwell();
        if rules.max_frame_delta >= shortest {
            return Err(ConfigError::FrameDeltaTooLarge {
                max_frame_delta: rules.max_frame_delta,
                shortest_dwell: shortest,
            });
        }
        non_negative("contestants.spread", self.contestants.spread)?;
        non_negative("contestants.speed_jitter", self.contestants.speed_jitter)?;
        chance("contestants.move_chance", self.contestants.move_chance)?;
        chance("contestants.caught_chance", self.contestants.caught_chance)?;
        Ok(())
    }

    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing, unparseable, or invalid.
    pub fn load() -> Self {
        let path = std::env::var("GREENLIGHT_REDLIGHT_CONFIG")
            .unwrap_or_else(|_| "config/redlight.toml".to_string());
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<RedLightConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded game configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    return Self::default();
                },
            },
            Err(_) => return Self::default(),
        };
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid game configuration in {path}, using defaults");
                Self::default()
            },
        }
    }
}
