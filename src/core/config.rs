//! Engine configuration.
//!
//! Every timing constant and capacity the mechanics use lives here. The
//! defaults are the reference values the templates were tuned with; hosts
//! override individual values through the builder methods or deserialize
//! a whole `EngineConfig`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::time::Millis;

/// Timed-reveal settings (whack-a-mole, balloon pop).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Period of the spawn tick.
    pub tick: Millis,

    /// How long a spawned entity stays visible if nobody hits it.
    pub visible_for: Millis,

    /// Maximum simultaneously visible entities.
    pub max_visible: usize,

    /// Number of slots on the board.
    pub slots: usize,

    /// Probability that a spawn carries the correct answer.
    pub correct_probability: f64,

    /// Total session duration.
    pub session_budget: Millis,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            tick: Millis(800),
            visible_for: Millis(1500),
            max_visible: 3,
            slots: 9,
            correct_probability: 0.5,
            session_budget: Millis::from_secs(30),
        }
    }
}

/// Moving-target settings (airplane).
///
/// Positions are percentages of the play area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Period of both motion loops.
    pub tick: Millis,

    /// Delay between firing and the hit being resolved.
    pub shot_travel: Millis,

    /// Delay between resolution and advancing (or retrying).
    pub shot_settle: Millis,

    /// Where planes enter.
    pub plane_start_x: f32,

    /// Lane of the first plane.
    pub lane_origin_y: f32,

    /// Vertical distance between lanes.
    pub lane_spacing: f32,

    /// Per-tick plane speed range, lower bound inclusive.
    pub speed_min: f32,

    /// Per-tick plane speed range, upper bound exclusive.
    pub speed_max: f32,

    /// Anything at or past this x is off screen.
    pub bound_x: f32,

    /// Where projectiles are created.
    pub muzzle: Vec2,

    /// Per-tick projectile displacement.
    pub projectile_velocity: Vec2,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick: Millis(50),
            shot_travel: Millis(500),
            shot_settle: Millis(1000),
            plane_start_x: -20.0,
            lane_origin_y: 15.0,
            lane_spacing: 20.0,
            speed_min: 0.3,
            speed_max: 0.5,
            bound_x: 120.0,
            muzzle: Vec2::new(5.0, 50.0),
            projectile_velocity: Vec2::new(2.0, 0.0),
        }
    }
}

/// Grid navigation settings (maze chase).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid.
    pub size: usize,

    /// Delay between collecting the correct item and advancing.
    pub advance_delay: Millis,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 6,
            advance_delay: Millis(1000),
        }
    }
}

/// Ordering puzzle settings (rank order).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// How many questions are sampled into the puzzle.
    pub sample_size: usize,

    /// How long a correct order is held before completion.
    pub settle_delay: Millis,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            sample_size: 6,
            settle_delay: Millis(2000),
        }
    }
}

/// Option-pick settings (quiz family, true/false).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConfig {
    /// Feedback pause before a true/false statement advances.
    pub feedback_delay: Millis,

    /// Probability that a true/false statement shows the real answer.
    pub true_probability: f64,

    /// Smallest offset applied to a false statement.
    pub false_offset_min: i64,

    /// Largest offset applied to a false statement.
    pub false_offset_max: i64,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            feedback_delay: Millis(1500),
            true_probability: 0.5,
            false_offset_min: -3,
            false_offset_max: 2,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub order: OrderConfig,
    #[serde(default)]
    pub choice: ChoiceConfig,
}

impl EngineConfig {
    /// Create a configuration with the reference values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the spawn settings.
    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    /// Replace the motion settings.
    #[must_use]
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Set the grid side length.
    #[must_use]
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid.size = size;
        self
    }

    /// Set the number of sampled rank items.
    #[must_use]
    pub fn with_order_sample(mut self, sample_size: usize) -> Self {
        self.order.sample_size = sample_size;
        self
    }

    /// Set the session duration of timed-reveal templates.
    #[must_use]
    pub fn with_session_budget(mut self, budget: Millis) -> Self {
        self.spawn.session_budget = budget;
        self
    }

    /// Set the probability that a spawn carries the correct answer.
    #[must_use]
    pub fn with_correct_probability(mut self, probability: f64) -> Self {
        self.spawn.correct_probability = probability;
        self
    }

    /// Set the probability that a true/false statement is true.
    #[must_use]
    pub fn with_true_probability(mut self, probability: f64) -> Self {
        self.choice.true_probability = probability;
        self
    }

    /// Check that the values can drive a session.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.spawn.tick == Millis::ZERO || self.motion.tick == Millis::ZERO {
            return Err(SessionError::InvalidConfig("tick period must be non-zero"));
        }
        if self.spawn.max_visible == 0 || self.spawn.slots == 0 {
            return Err(SessionError::InvalidConfig("spawn board needs slots and capacity"));
        }
        if self.grid.size < 2 {
            return Err(SessionError::InvalidConfig("grid must be at least 2x2"));
        }
        if self.order.sample_size == 0 {
            return Err(SessionError::InvalidConfig("rank sample must be non-empty"));
        }
        if self.motion.speed_min >= self.motion.speed_max {
            return Err(SessionError::InvalidConfig("plane speed range is empty"));
        }
        if self.choice.false_offset_min > self.choice.false_offset_max {
            return Err(SessionError::InvalidConfig("false offset range is empty"));
        }
        Ok(())
    }
}
