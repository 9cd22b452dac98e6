//! Game entities
//!
//! Ball, paddles, obstacles, and powerups. Each record owns its position,
//! size, and mode-specific fields; the level orchestrates them. Deactivated
//! entities stay in their collections with `active` cleared so iteration
//! and collision order remain stable within a tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::timer::{Timer, TimerMode};
use crate::consts::*;
use crate::platform::{AssetResolver, DrawSurface, InputSource, Key, Paint};

/// Which player a score or win is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    One,
    Two,
}

/// Powerup effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    SpeedUp,
    SlowDown,
    IncreaseSize,
    DecreaseSize,
}

impl PowerupKind {
    /// Texture asset for the pickup's sprite.
    pub fn texture(self) -> &'static str {
        match self {
            PowerupKind::SpeedUp => "speed_up.png",
            PowerupKind::SlowDown => "slow_down.png",
            PowerupKind::IncreaseSize => "increase_size.png",
            PowerupKind::DecreaseSize => "decrease_size.png",
        }
    }
}

/// A powerup effect currently riding on the ball.
#[derive(Debug, Clone)]
struct ActiveEffect {
    kind: PowerupKind,
    timer: Timer,
}

/// The ball.
///
/// Lifecycle: constructed once per level init; `reset` recenters it, clears
/// effects, and restarts the ramp-up with a fresh random launch direction.
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
    base_speed: f32,
    base_size: Vec2,
    target_vel: Vec2,
    ramp_timer: Timer,
    effects: Vec<ActiveEffect>,
    powered: bool,
}

impl Ball {
    pub fn new(base_speed: f32, size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            active: true,
            base_speed,
            base_size: size,
            target_vel: Vec2::ZERO,
            ramp_timer: Timer::new(BALL_RAMP_UP_SECS, TimerMode::Once),
            effects: Vec::new(),
            powered: false,
        }
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Sudden death scales the base speed up; renormalization uses it too.
    pub fn set_base_speed(&mut self, speed: f32) {
        self.base_speed = speed;
    }

    /// True from a reset until the ramp-up completes.
    pub fn is_ramping(&self) -> bool {
        self.ramp_timer.is_running()
    }

    /// True while a powerup effect is riding on the ball.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }

    /// Recenter, restore base size, drop all effects, and launch in a fresh
    /// random direction via the 1-second ramp-up.
    ///
    /// The launch angle is drawn uniformly from [30°, 60°] or [120°, 150°]
    /// (band chosen 50/50), with the vertical sign flipped half the time.
    pub fn reset(&mut self, canvas: Vec2, rng: &mut Pcg32, now: f64) {
        self.pos = canvas * 0.5;
        self.size = self.base_size;
        self.clear_powerups();
        self.ramp_timer.stop();
        self.vel = Vec2::ZERO;

        let degrees: f32 = if rng.random_bool(0.5) {
            rng.random_range(30.0..60.0)
        } else {
            rng.random_range(120.0..150.0)
        };
        let mut radians = degrees.to_radians();
        if rng.random_bool(0.5) {
            radians = -radians;
        }

        self.target_vel = Vec2::new(radians.cos(), radians.sin()) * self.base_speed;
        self.ramp_timer.start(now);
        log::debug!(
            "ball reset: angle {degrees:.1} deg, target ({:.1}, {:.1})",
            self.target_vel.x,
            self.target_vel.y
        );
    }

    /// Advance the ball one tick: ramp velocity toward target, integrate
    /// position, expire finished powerup effects.
    pub fn update(&mut self, dt: f32, now: f64) {
        if self.ramp_timer.is_running() {
            let progress = self.ramp_timer.progress(now);
            self.vel = self.target_vel * progress;
            if progress >= 1.0 {
                self.ramp_timer.stop();
                self.vel = self.target_vel;
            }
        }

        self.pos += self.vel * dt;
        self.expire_effects(now);
    }

    /// Try to put a powerup effect on the ball. Rejected (logged, returns
    /// false) in sudden death for SpeedUp, while ramping up, or while
    /// another effect is active.
    pub fn apply_powerup(&mut self, kind: PowerupKind, sudden_death: bool, now: f64) -> bool {
        if sudden_death && kind == PowerupKind::SpeedUp {
            log::debug!("sudden death: ignoring SpeedUp powerup");
            return false;
        }
        if self.is_ramping() {
            log::debug!("ball ramping up: ignoring powerup");
            return false;
        }
        if self.powered {
            log::debug!("powerup already active: ignoring new powerup");
            return false;
        }

        let mut timer = Timer::new(POWERUP_DURATION_SECS, TimerMode::Once);
        timer.start(now);
        self.effects.push(ActiveEffect { kind, timer });
        self.powered = true;

        match kind {
            PowerupKind::SpeedUp => self.vel *= SPEED_UP_FACTOR,
            PowerupKind::SlowDown => self.vel *= SLOW_DOWN_FACTOR,
            PowerupKind::IncreaseSize => self.size = self.base_size * GROW_FACTOR,
            PowerupKind::DecreaseSize => self.size = self.base_size * SHRINK_FACTOR,
        }
        log::debug!("powerup applied: {kind:?}");
        true
    }

    /// Reverse and drop effects whose timers have run out.
    fn expire_effects(&mut self, now: f64) {
        let mut i = 0;
        while i < self.effects.len() {
            let _ = self.effects[i].timer.progress(now);
            if self.effects[i].timer.is_running() {
                i += 1;
                continue;
            }
            let kind = self.effects[i].kind;
            match kind {
                PowerupKind::SpeedUp => self.vel /= SPEED_UP_FACTOR,
                PowerupKind::SlowDown => self.vel /= SLOW_DOWN_FACTOR,
                PowerupKind::IncreaseSize | PowerupKind::DecreaseSize => {
                    self.size = self.base_size;
                }
            }
            self.effects.remove(i);
            log::debug!("powerup expired: {kind:?}");
        }
        if self.effects.is_empty() {
            self.powered = false;
        }
    }

    /// Drop all effects without reversing them; `reset` restores size and
    /// recomputes velocity, and scoring resets the level multiplier.
    pub fn clear_powerups(&mut self) {
        self.effects.clear();
        self.powered = false;
    }

    /// Rescale velocity so its magnitude equals base speed times the level
    /// multiplier, preserving direction.
    pub fn renormalize(&mut self, multiplier: f32) {
        let speed = self.vel.length();
        if speed > 0.0 {
            self.vel *= (self.base_speed * multiplier) / speed;
        }
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface) {
        gfx.fill_rect(self.pos, self.size, &Paint::default());

        if self.is_ramping() {
            let mut ramp = Paint::fill([1.0, 0.0, 0.0]);
            ramp.fill_opacity = 0.5;
            gfx.fill_disk(self.pos, self.size.x, &ramp);
        }
        if self.powered {
            let mut glow = Paint::fill([1.0, 1.0, 0.0]);
            glow.outline_opacity = 1.0;
            gfx.fill_rect(self.pos, self.size, &glow);
        }
    }
}

/// A player's paddle.
#[derive(Debug, Clone)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    speed: f32,
    up: Key,
    down: Key,
}

impl Paddle {
    pub fn new(pos: Vec2, up: Key, down: Key) -> Self {
        Self {
            pos,
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            active: true,
            speed: PADDLE_SPEED,
            up,
            down,
        }
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }

    /// Move per held keys, clamped to the canvas.
    pub fn update(&mut self, dt: f32, input: &dyn InputSource, canvas_height: f32) {
        if input.is_down(self.up) {
            self.pos.y -= self.speed * dt;
        }
        if input.is_down(self.down) {
            self.pos.y += self.speed * dt;
        }

        let half = self.size.y * 0.5;
        self.pos.y = self.pos.y.clamp(half, canvas_height - half);
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface) {
        let mut paint = Paint::fill([0.0, 1.0, 0.0]);
        paint.outline = [1.0, 1.0, 1.0];
        paint.outline_opacity = 1.0;
        paint.outline_width = 2.0;
        gfx.fill_rect(self.pos, self.size, &paint);
    }
}

/// Obstacle behavior variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleKind {
    /// Stationary; deactivates after `hit_points` hits.
    Breakable { hit_points: u32 },
    /// Oscillates vertically between canvas bounds; `direction` is +1 or -1.
    Unbreakable { speed: f32, direction: f32 },
}

/// An obstacle in the playfield.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Obstacle {
    pub fn breakable(pos: Vec2) -> Self {
        Self {
            kind: ObstacleKind::Breakable {
                hit_points: BREAKABLE_HIT_POINTS,
            },
            pos,
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            active: true,
        }
    }

    pub fn unbreakable(pos: Vec2) -> Self {
        Self {
            kind: ObstacleKind::Unbreakable {
                speed: OBSTACLE_SPEED,
                direction: 1.0,
            },
            pos,
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            active: true,
        }
    }

    pub fn is_breakable(&self) -> bool {
        matches!(self.kind, ObstacleKind::Breakable { .. })
    }

    pub fn hit_points(&self) -> u32 {
        match self.kind {
            ObstacleKind::Breakable { hit_points } => hit_points,
            ObstacleKind::Unbreakable { .. } => 0,
        }
    }

    /// Signed vertical velocity the obstacle imparts on the ball; zero for
    /// stationary breakables.
    pub fn drift(&self) -> f32 {
        match self.kind {
            ObstacleKind::Breakable { .. } => 0.0,
            ObstacleKind::Unbreakable { speed, direction } => speed * direction,
        }
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }

    /// Unbreakables bounce between the canvas bounds; breakables hold still.
    pub fn update(&mut self, dt: f32, canvas_height: f32) {
        if let ObstacleKind::Unbreakable { speed, direction } = &mut self.kind {
            let half = self.size.y * 0.5;
            let mut y = self.pos.y + *speed * *direction * dt;

            if y + half >= canvas_height {
                y = canvas_height - half;
                *direction = -1.0;
            } else if y - half <= 0.0 {
                y = half;
                *direction = 1.0;
            }
            self.pos.y = y;
        }
    }

    /// Register one hit on a breakable obstacle; deactivates at zero hit
    /// points. Unbreakables ignore hits.
    pub fn handle_hit(&mut self) {
        if let ObstacleKind::Breakable { hit_points } = &mut self.kind {
            *hit_points = hit_points.saturating_sub(1);
            log::debug!("obstacle hit, hp now {hit_points}");
            if *hit_points == 0 {
                self.active = false;
                log::debug!("obstacle destroyed");
            }
        }
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface) {
        let fill = match self.kind {
            ObstacleKind::Breakable { hit_points } if hit_points >= 2 => [0.0, 1.0, 0.0],
            ObstacleKind::Breakable { .. } => [1.0, 0.0, 0.0],
            ObstacleKind::Unbreakable { .. } => [0.5, 0.5, 0.5],
        };
        gfx.fill_rect(self.pos, self.size, &Paint::fill(fill));
    }
}

/// A pickup sitting in the playfield until the ball collects it.
#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: Vec2::splat(POWERUP_SIZE),
            active: true,
        }
    }

    pub fn aabb(&self) -> super::Aabb {
        super::Aabb::new(self.pos, self.size)
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface, assets: &dyn AssetResolver) {
        let paint = Paint::textured(assets.resolve(self.kind.texture()));
        gfx.fill_rect(self.pos, self.size, &paint);
    }
}
