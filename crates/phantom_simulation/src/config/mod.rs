//! Simulation configuration
//!
//! Все tuning-параметры контроллера и уровня. Defaults совпадают с
//! исходным тюнингом персонажа; TOML-файл переопределяет любые поля.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::SpinCurve;
use crate::combat::HitPolicy;
use crate::logger::LogLevel;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// Value parsed fine but breaks an invariant
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ============================================================================
// Controller tuning
// ============================================================================

/// Locomotion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed (m/s)
    pub speed: f32,
    /// Upward impulse on jump (N·s)
    pub jump_impulse: f32,
    /// Vertical acceleration while gravity is enabled (m/s²)
    pub gravity: f32,
    /// Ground probe position relative to the body origin
    pub ground_check_offset: Vec3,
    pub ground_check_radius: f32,
    /// Aim ray length
    pub max_aim_distance: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            jump_impulse: 10.0,
            gravity: -40.0,
            ground_check_offset: Vec3::new(0.0, -1.0, 0.0),
            ground_check_radius: 0.1,
            max_aim_distance: 1000.0,
        }
    }
}

/// Phantom dash parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Travel speed (units per second); duration = distance / speed
    pub speed: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self { speed: 10.0 }
    }
}

/// Briefcase bash parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BashConfig {
    /// Seconds before the hit volume goes live
    pub delay: f32,
    /// Total bash length (seconds)
    pub duration: f32,
    /// Full turns over the whole bash
    pub rotation_count: f32,
    /// Weapon height range: x = start, y = end
    pub height_range: Vec2,
    /// Hit volume distance in front of the rotation base
    pub hit_box_forward: f32,
    pub hit_box_half_extents: Vec3,
    /// Trail distance in front of the rotation base
    pub trail_forward: f32,
    /// Trail local orientation (Euler XYZ, degrees)
    pub trail_rotation_degrees: Vec3,
    pub spin_curve: SpinCurve,
    pub hit_policy: HitPolicy,
}

impl Default for BashConfig {
    fn default() -> Self {
        Self {
            delay: 0.2,
            duration: 1.0,
            rotation_count: 2.0,
            height_range: Vec2::new(0.5, 1.5),
            hit_box_forward: 1.5,
            hit_box_half_extents: Vec3::new(1.0, 0.5, 1.0),
            trail_forward: 2.0,
            trail_rotation_degrees: Vec3::new(90.0, 0.0, 90.0),
            spin_curve: SpinCurve::default(),
            hit_policy: HitPolicy::default(),
        }
    }
}

impl BashConfig {
    pub fn trail_rotation(&self) -> Quat {
        let radians = self.trail_rotation_degrees * (std::f32::consts::PI / 180.0);
        Quat::from_euler(EulerRot::XYZ, radians.x, radians.y, radians.z)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementConfig,
    pub dash: DashConfig,
    pub bash: BashConfig,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        if !m.speed.is_finite() || m.speed < 0.0 {
            return Err(ConfigError::Invalid("movement.speed must be >= 0".into()));
        }
        if !m.gravity.is_finite() || !m.jump_impulse.is_finite() {
            return Err(ConfigError::Invalid("movement gravity/jump must be finite".into()));
        }
        if !m.ground_check_radius.is_finite() || m.ground_check_radius < 0.0 {
            return Err(ConfigError::Invalid("movement.ground_check_radius must be >= 0".into()));
        }
        if !m.max_aim_distance.is_finite() || m.max_aim_distance <= 0.0 {
            return Err(ConfigError::Invalid("movement.max_aim_distance must be > 0".into()));
        }
        if !self.dash.speed.is_finite() || self.dash.speed <= 0.0 {
            return Err(ConfigError::Invalid("dash.speed must be > 0".into()));
        }

        let b = &self.bash;
        // inf duration = bash, который никогда не заканчивается
        if !b.delay.is_finite() || !b.duration.is_finite() || b.delay < 0.0 || b.duration < 0.0 {
            return Err(ConfigError::Invalid("bash.delay and bash.duration must be >= 0".into()));
        }
        if !b.rotation_count.is_finite() || !b.height_range.is_finite() {
            return Err(ConfigError::Invalid("bash rotation/height must be finite".into()));
        }
        if !b.hit_box_half_extents.is_finite() || b.hit_box_half_extents.min_element() < 0.0 {
            return Err(ConfigError::Invalid("bash.hit_box_half_extents must be >= 0".into()));
        }
        b.spin_curve.validate().map_err(ConfigError::Invalid)
    }
}

// ============================================================================
// Level + top-level
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Waypoint names in patrol order
    pub patrol_points: Vec<String>,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// FixedUpdate rate (Hz)
    pub fixed_hz: f64,
    pub seed: u64,
    /// debug | info | warning | error
    pub log_level: String,
    /// Headless runner writes here when set
    pub log_file: Option<String>,
    pub controller: ControllerConfig,
    pub level: LevelConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            seed: 42,
            log_level: "info".to_string(),
            log_file: None,
            controller: ControllerConfig::default(),
            level: LevelConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_hz.is_finite() || self.fixed_hz <= 0.0 {
            return Err(ConfigError::Invalid("fixed_hz must be > 0".into()));
        }
        if self.log_level().is_none() {
            return Err(ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level)));
        }
        self.controller.validate()
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        LogLevel::parse(&self.log_level)
    }
}
