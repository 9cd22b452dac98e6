//! Spawn scheduling
//!
//! Levels 2 and 3 drip powerups onto scripted positions at randomized
//! intervals. Sudden death runs three independent schedules (unbreakable
//! obstacles, breakable obstacles, powerups) over random positions inside
//! inset canvas bounds, with a minimum-distance rule for powerups.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Obstacle, Powerup, PowerupKind};
use crate::settings::Tuning;

/// Interval between consecutive spawns, drawn uniformly per spawn (seconds).
pub const SPAWN_INTERVAL_MIN: f32 = 2.0;
pub const SPAWN_INTERVAL_MAX: f32 = 5.0;

/// Scripted spawns start this long after level start (seconds).
pub const SCRIPTED_FIRST_SPAWN: f32 = 5.0;

/// Sudden-death first-spawn offsets (seconds).
pub const SD_FIRST_UNBREAKABLE: f32 = 2.0;
pub const SD_FIRST_BREAKABLE: f32 = 4.0;
pub const SD_FIRST_POWERUP: f32 = 3.0;

/// A powerup may not spawn within this distance of any active obstacle or
/// powerup; the attempt is deferred to the next tick instead.
pub const MIN_SPAWN_DISTANCE: f32 = 100.0;

fn roll_interval(rng: &mut Pcg32) -> f32 {
    rng.random_range(SPAWN_INTERVAL_MIN..SPAWN_INTERVAL_MAX)
}

/// Bookkeeping for one category of timed spawns.
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    next_at: f32,
    spawned: u32,
    quota: u32,
}

impl SpawnSchedule {
    pub fn new(first_at: f32, quota: u32) -> Self {
        Self {
            next_at: first_at,
            spawned: 0,
            quota,
        }
    }

    /// True when the quota has headroom and the spawn time has arrived.
    pub fn due(&self, elapsed: f32) -> bool {
        self.spawned < self.quota && elapsed >= self.next_at
    }

    /// Count a spawn and push the deadline forward by a fresh interval.
    pub fn advance(&mut self, rng: &mut Pcg32) {
        self.spawned += 1;
        self.next_at += roll_interval(rng);
    }

    /// Count a spawn and reschedule relative to the current elapsed time.
    pub fn reschedule(&mut self, elapsed: f32, rng: &mut Pcg32) {
        self.spawned += 1;
        self.next_at = elapsed + roll_interval(rng);
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn exhausted(&self) -> bool {
        self.spawned >= self.quota
    }
}

/// Fixed powerup plan for levels 2 and 3: ordered positions with a cycling
/// kind sequence.
#[derive(Debug, Clone, Copy)]
pub struct PowerupScript {
    positions: &'static [Vec2],
    kinds: &'static [PowerupKind],
}

const LEVEL2_POSITIONS: [Vec2; 4] = [
    Vec2::new(300.0, 300.0),
    Vec2::new(600.0, 300.0),
    Vec2::new(400.0, 500.0),
    Vec2::new(500.0, 200.0),
];
const LEVEL2_KINDS: [PowerupKind; 2] = [PowerupKind::SpeedUp, PowerupKind::SlowDown];

const LEVEL3_POSITIONS: [Vec2; 4] = [
    Vec2::new(500.0, 500.0),
    Vec2::new(700.0, 200.0),
    Vec2::new(200.0, 600.0),
    Vec2::new(400.0, 400.0),
];
const LEVEL3_KINDS: [PowerupKind; 4] = [
    PowerupKind::IncreaseSize,
    PowerupKind::DecreaseSize,
    PowerupKind::SpeedUp,
    PowerupKind::SlowDown,
];

/// Sudden-death powerup kind rotation. SpeedUp is deliberately absent.
const SUDDEN_DEATH_KINDS: [PowerupKind; 4] = [
    PowerupKind::SlowDown,
    PowerupKind::IncreaseSize,
    PowerupKind::DecreaseSize,
    PowerupKind::SlowDown,
];

impl PowerupScript {
    pub fn for_level(level: u32) -> Option<Self> {
        match level {
            2 => Some(Self {
                positions: &LEVEL2_POSITIONS,
                kinds: &LEVEL2_KINDS,
            }),
            3 => Some(Self {
                positions: &LEVEL3_POSITIONS,
                kinds: &LEVEL3_KINDS,
            }),
            _ => None,
        }
    }

    pub fn quota(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn position(&self, index: u32) -> Vec2 {
        self.positions[index as usize % self.positions.len()]
    }

    pub fn kind(&self, index: u32) -> PowerupKind {
        self.kinds[index as usize % self.kinds.len()]
    }
}

/// Kind for the nth sudden-death powerup spawn.
pub fn sudden_death_kind(index: u32) -> PowerupKind {
    SUDDEN_DEATH_KINDS[index as usize % SUDDEN_DEATH_KINDS.len()]
}

/// Rectangular region random spawns draw positions from.
#[derive(Debug, Clone, Copy)]
pub struct SpawnArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl SpawnArea {
    /// Canvas inset uniformly on all sides.
    pub fn inset(canvas: Vec2, margin: f32) -> Self {
        Self {
            min: Vec2::splat(margin),
            max: canvas - Vec2::splat(margin),
        }
    }

    pub fn sample(&self, rng: &mut Pcg32) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min.x..self.max.x),
            rng.random_range(self.min.y..self.max.y),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Obstacles spawn well inside the canvas, away from the paddles.
pub fn obstacle_area(canvas: Vec2) -> SpawnArea {
    SpawnArea::inset(canvas, 150.0)
}

/// Powerups get a slightly wider region.
pub fn powerup_area(canvas: Vec2) -> SpawnArea {
    SpawnArea::inset(canvas, 100.0)
}

/// True if `pos` keeps `MIN_SPAWN_DISTANCE` from every active obstacle and
/// powerup.
pub fn clear_of_entities(pos: Vec2, obstacles: &[Obstacle], powerups: &[Powerup]) -> bool {
    let near_obstacle = obstacles
        .iter()
        .filter(|o| o.active)
        .any(|o| pos.distance(o.pos) < MIN_SPAWN_DISTANCE);
    let near_powerup = powerups
        .iter()
        .filter(|p| p.active)
        .any(|p| pos.distance(p.pos) < MIN_SPAWN_DISTANCE);
    !near_obstacle && !near_powerup
}

/// The three independent sudden-death schedules.
#[derive(Debug, Clone)]
pub struct SuddenDeathSpawner {
    pub unbreakable: SpawnSchedule,
    pub breakable: SpawnSchedule,
    pub powerups: SpawnSchedule,
}

impl SuddenDeathSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            unbreakable: SpawnSchedule::new(SD_FIRST_UNBREAKABLE, tuning.sudden_death_max_unbreakable),
            breakable: SpawnSchedule::new(SD_FIRST_BREAKABLE, tuning.sudden_death_max_breakable),
            powerups: SpawnSchedule::new(SD_FIRST_POWERUP, tuning.sudden_death_max_powerups),
        }
    }
}
