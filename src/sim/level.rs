//! Level orchestration
//!
//! The level owns both paddles, the ball, the obstacle and powerup
//! collections, the scores, and the menu/phase state machine. One
//! `update` call per frame runs the whole pipeline: countdown, spawns,
//! entity updates, scoring, collision response, pickups, progression.
//!
//! Deactivated obstacles and powerups are soft-deleted (flag cleared) and
//! skipped everywhere, so iteration and collision order stay stable
//! within a tick; the collections are cleared on level init.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::{
    PowerupScript, SpawnSchedule, SuddenDeathSpawner, SCRIPTED_FIRST_SPAWN, clear_of_entities,
    obstacle_area, powerup_area, sudden_death_kind,
};
use super::state::{Ball, Obstacle, Paddle, PlayerId, Powerup, PowerupKind};
use crate::audio::{SoundBank, SoundCue};
use crate::consts::*;
use crate::context::GameContext;
use crate::menu::{Menu, MenuKind};
use crate::platform::{DrawSurface, Key, Paint};
use crate::settings::{Settings, Tuning};

/// Where the level currently sits in its menu/gameplay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    MainMenu,
    Active,
    PauseMenu,
    GameOver,
}

/// Result of one update tick, surfaced to the session shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Running,
    /// The menu collaborator requested shutdown; process no further ticks.
    Exit,
}

pub struct Level {
    number: u32,
    phase: LevelPhase,
    countdown: f32,
    elapsed: f32,
    speed_multiplier: f32,
    player1: Paddle,
    player2: Paddle,
    ball: Ball,
    obstacles: Vec<Obstacle>,
    powerups: Vec<Powerup>,
    player1_score: u32,
    player2_score: u32,
    winner: Option<PlayerId>,
    menu: Menu,
    sounds: SoundBank,
    script: Option<PowerupScript>,
    script_schedule: SpawnSchedule,
    sudden_death: SuddenDeathSpawner,
    rng: Pcg32,
    tuning: Tuning,
}

impl Level {
    /// Construct an uninitialized level; call `init` before the first tick.
    /// The RNG is seeded here, once, and reused for every spawn and reset.
    pub fn new(seed: u64, settings: &Settings, tuning: Tuning) -> Self {
        let canvas = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        Self {
            number: 1,
            phase: LevelPhase::MainMenu,
            countdown: tuning.level_time_limit,
            elapsed: 0.0,
            speed_multiplier: 1.0,
            player1: Paddle::new(Vec2::new(PADDLE_MARGIN, canvas.y * 0.5), Key::W, Key::S),
            player2: Paddle::new(
                Vec2::new(canvas.x - PADDLE_MARGIN, canvas.y * 0.5),
                Key::Up,
                Key::Down,
            ),
            ball: Ball::new(BALL_SPEED, Vec2::splat(BALL_SIZE)),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            player1_score: 0,
            player2_score: 0,
            winner: None,
            menu: Menu::new(MenuKind::Main),
            sounds: SoundBank::new(settings),
            script: None,
            script_schedule: SpawnSchedule::new(SCRIPTED_FIRST_SPAWN, 0),
            sudden_death: SuddenDeathSpawner::new(&tuning),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Set up a level (1-4): spawn bookkeeping, entities, music, and the
    /// entry menu. Scores persist across levels; everything else resets.
    pub fn init(&mut self, number: u32, show_menu: bool, ctx: &mut GameContext) {
        self.number = number;
        self.elapsed = 0.0;
        self.speed_multiplier = 1.0;
        self.countdown = self.tuning.level_time_limit;
        self.obstacles.clear();
        self.powerups.clear();

        self.script = PowerupScript::for_level(number);
        self.script_schedule = SpawnSchedule::new(
            SCRIPTED_FIRST_SPAWN,
            self.script.map_or(0, |s| s.quota()),
        );
        self.sudden_death = SuddenDeathSpawner::new(&self.tuning);

        self.setup_level_objects(number, ctx);

        if ctx.music_on {
            self.sounds.start_music(&mut *ctx.audio, &*ctx.assets);
        }

        if show_menu {
            let kind = if number == 1 {
                MenuKind::Main
            } else {
                MenuKind::Pause
            };
            self.menu.set_kind(kind);
            self.phase = match kind {
                MenuKind::Main => LevelPhase::MainMenu,
                _ => LevelPhase::PauseMenu,
            };
        } else {
            self.phase = LevelPhase::Active;
        }

        log::info!("Level {number} initialized ({:?})", self.phase);
    }

    fn setup_level_objects(&mut self, number: u32, ctx: &mut GameContext) {
        let canvas = ctx.canvas;

        self.player1 = Paddle::new(Vec2::new(PADDLE_MARGIN, canvas.y * 0.5), Key::W, Key::S);
        self.player2 = Paddle::new(
            Vec2::new(canvas.x - PADDLE_MARGIN, canvas.y * 0.5),
            Key::Up,
            Key::Down,
        );

        self.ball = Ball::new(BALL_SPEED, Vec2::splat(BALL_SIZE));
        if number == 4 {
            self.ball
                .set_base_speed(self.ball.base_speed() * SUDDEN_DEATH_SPEED_FACTOR);
            log::info!("Sudden death: ball speed increased");
        }
        self.ball.reset(canvas, &mut self.rng, ctx.clock);

        match number {
            2 => {
                self.obstacles
                    .push(Obstacle::breakable(Vec2::new(450.0, 700.0)));
                self.obstacles
                    .push(Obstacle::breakable(Vec2::new(450.0, 250.0)));
            }
            3 => {
                self.obstacles
                    .push(Obstacle::breakable(Vec2::new(400.0, 700.0)));
                self.obstacles
                    .push(Obstacle::breakable(Vec2::new(500.0, 250.0)));
                self.obstacles
                    .push(Obstacle::unbreakable(Vec2::new(350.0, 300.0)));
                self.obstacles
                    .push(Obstacle::unbreakable(Vec2::new(550.0, 700.0)));
            }
            _ => {}
        }
    }

    /// Advance one tick. Returns `Exit` when a menu requested shutdown.
    pub fn update(&mut self, dt: f32, ctx: &mut GameContext) -> LevelOutcome {
        self.sounds
            .sync_music(ctx.music_on, &mut *ctx.audio, &*ctx.assets);

        match self.phase {
            LevelPhase::MainMenu => {
                self.menu.update(&*ctx.input);
                if self.menu.is_play_clicked() {
                    self.menu.reset_flags();
                    self.phase = LevelPhase::Active;
                    log::info!("Starting level {}", self.number);
                }
                if self.menu.is_exit_clicked() {
                    log::info!("Exit requested from main menu");
                    return LevelOutcome::Exit;
                }
            }
            LevelPhase::Active => self.tick_active(dt, ctx),
            LevelPhase::PauseMenu => {
                self.menu.update(&*ctx.input);
                if self.menu.is_ready_pressed() {
                    self.init(self.number, false, ctx);
                    self.menu.reset_flags();
                    log::info!("Starting level {}", self.number);
                }
                if self.menu.is_exit_clicked() {
                    log::info!("Exit requested from pause menu");
                    return LevelOutcome::Exit;
                }
            }
            LevelPhase::GameOver => {
                if self.menu.kind() != MenuKind::GameOver {
                    self.menu.set_kind(MenuKind::GameOver);
                }
                self.menu.update(&*ctx.input);
                if self.menu.is_play_again_clicked() {
                    self.player1_score = 0;
                    self.player2_score = 0;
                    self.winner = None;
                    self.init(1, true, ctx);
                    log::info!("Returning to main menu");
                }
                if self.menu.is_exit_clicked() {
                    log::info!("Exit requested from game over");
                    return LevelOutcome::Exit;
                }
            }
        }

        LevelOutcome::Running
    }

    fn tick_active(&mut self, dt: f32, ctx: &mut GameContext) {
        // Countdown runs in levels 1-3 only; sudden death has no timer
        if self.number != 4 {
            self.countdown = (self.countdown - dt).max(0.0);
        }
        self.elapsed += dt;

        self.run_scripted_spawns();
        if self.number == 4 {
            self.run_sudden_death_spawns(ctx);
        }

        if self.player1.active {
            self.player1.update(dt, &*ctx.input, ctx.canvas.y);
        }
        if self.player2.active {
            self.player2.update(dt, &*ctx.input, ctx.canvas.y);
        }
        if self.ball.active {
            self.ball.update(dt, ctx.clock);
        }
        for obstacle in &mut self.obstacles {
            if obstacle.active {
                obstacle.update(dt, ctx.canvas.y);
            }
        }

        self.resolve_scoring(ctx);
        self.resolve_wall_bounce(ctx);

        // Multiplier only persists while a powerup effect is riding the ball
        if !self.ball.is_powered() {
            self.speed_multiplier = 1.0;
        }

        self.resolve_paddle_collisions(ctx);
        self.resolve_obstacle_collisions(ctx);
        self.resolve_powerup_pickups(ctx);

        self.check_progression(ctx);

        if self.number == 4 && self.phase == LevelPhase::Active {
            if self.player1_score >= self.tuning.win_score {
                self.declare_winner(PlayerId::One);
            } else if self.player2_score >= self.tuning.win_score {
                self.declare_winner(PlayerId::Two);
            }
        }
    }

    fn run_scripted_spawns(&mut self) {
        let Some(script) = self.script else { return };
        if !self.script_schedule.due(self.elapsed) {
            return;
        }

        let index = self.script_schedule.spawned();
        let kind = script.kind(index);
        let pos = script.position(index);
        self.powerups.push(Powerup::new(kind, pos));
        self.script_schedule.advance(&mut self.rng);
        log::debug!("spawned scripted powerup {kind:?} at ({}, {})", pos.x, pos.y);
    }

    fn run_sudden_death_spawns(&mut self, ctx: &GameContext) {
        let area = obstacle_area(ctx.canvas);

        if self.sudden_death.unbreakable.due(self.elapsed) {
            let pos = area.sample(&mut self.rng);
            self.obstacles.push(Obstacle::unbreakable(pos));
            self.sudden_death.unbreakable.reschedule(self.elapsed, &mut self.rng);
            log::debug!("spawned unbreakable obstacle at ({}, {})", pos.x, pos.y);
        }

        if self.sudden_death.breakable.due(self.elapsed) {
            let pos = area.sample(&mut self.rng);
            self.obstacles.push(Obstacle::breakable(pos));
            self.sudden_death.breakable.reschedule(self.elapsed, &mut self.rng);
            log::debug!("spawned breakable obstacle at ({}, {})", pos.x, pos.y);
        }

        if self.sudden_death.powerups.due(self.elapsed) {
            let pos = powerup_area(ctx.canvas).sample(&mut self.rng);
            if clear_of_entities(pos, &self.obstacles, &self.powerups) {
                let kind = sudden_death_kind(self.sudden_death.powerups.spawned());
                self.powerups.push(Powerup::new(kind, pos));
                self.sudden_death.powerups.reschedule(self.elapsed, &mut self.rng);
                log::debug!("spawned powerup {kind:?} at ({}, {})", pos.x, pos.y);
            } else {
                // Deferred: the schedule stays due and retries next tick
                log::debug!("powerup spawn deferred, position too crowded");
            }
        }
    }

    /// Boundary crossings score and reset the ball: right wall for
    /// player 1, left wall for player 2.
    fn resolve_scoring(&mut self, ctx: &mut GameContext) {
        if !self.ball.active {
            return;
        }
        let half_w = self.ball.size.x * 0.5;

        let scorer = if self.ball.pos.x + half_w >= ctx.canvas.x {
            Some(PlayerId::One)
        } else if self.ball.pos.x - half_w <= 0.0 {
            Some(PlayerId::Two)
        } else {
            None
        };

        if let Some(player) = scorer {
            match player {
                PlayerId::One => self.player1_score += 1,
                PlayerId::Two => self.player2_score += 1,
            }
            log::info!(
                "goal for {player:?} - scores {} : {}",
                self.player1_score,
                self.player2_score
            );
            self.ball.reset(ctx.canvas, &mut self.rng, ctx.clock);
            self.ball.clear_powerups();
            self.speed_multiplier = 1.0;
        }
    }

    /// Top/bottom bounds clamp the ball and force the vertical velocity
    /// away from the wall.
    fn resolve_wall_bounce(&mut self, ctx: &GameContext) {
        if !self.ball.active {
            return;
        }
        let half_h = self.ball.size.y * 0.5;

        if self.ball.pos.y + half_h >= ctx.canvas.y {
            self.ball.pos.y = ctx.canvas.y - half_h;
            self.ball.vel.y = -self.ball.vel.y.abs();
        } else if self.ball.pos.y - half_h <= 0.0 {
            self.ball.pos.y = half_h;
            self.ball.vel.y = self.ball.vel.y.abs();
        }
    }

    fn resolve_paddle_collisions(&mut self, ctx: &mut GameContext) {
        if !self.ball.active {
            return;
        }

        if self.player1.active && self.ball.aabb().intersects(&self.player1.aabb()) {
            self.ball.vel.x = self.ball.vel.x.abs();
            // Push just clear of the paddle so the hit doesn't re-trigger
            self.ball.pos.x = self.player1.aabb().right() + self.ball.size.x * 0.5 + 1.0;
            self.ball.renormalize(self.speed_multiplier);
            self.sounds
                .play(SoundCue::PaddleHit, &mut *ctx.audio, &*ctx.assets);
            log::debug!("ball hit player 1 paddle");
        }

        if self.player2.active && self.ball.aabb().intersects(&self.player2.aabb()) {
            self.ball.vel.x = -self.ball.vel.x.abs();
            self.ball.pos.x = self.player2.aabb().left() - self.ball.size.x * 0.5 - 1.0;
            self.ball.renormalize(self.speed_multiplier);
            self.sounds
                .play(SoundCue::PaddleHit, &mut *ctx.audio, &*ctx.assets);
            log::debug!("ball hit player 2 paddle");
        }
    }

    /// At most one obstacle is handled per tick; the first active hit in
    /// collection order wins.
    fn resolve_obstacle_collisions(&mut self, ctx: &mut GameContext) {
        if !self.ball.active {
            return;
        }
        let ball_box = self.ball.aabb();

        for obstacle in &mut self.obstacles {
            if !obstacle.active || !ball_box.intersects(&obstacle.aabb()) {
                continue;
            }
            let obstacle_box = obstacle.aabb();

            if obstacle.is_breakable() {
                // Side keyed off x-centers
                let from_left = self.ball.pos.x < obstacle.pos.x;
                if from_left {
                    self.ball.vel.x = -self.ball.vel.x.abs();
                    self.ball.pos.x = obstacle_box.left() - self.ball.size.x * 0.5 - 1.0;
                } else {
                    self.ball.vel.x = self.ball.vel.x.abs();
                    self.ball.pos.x = obstacle_box.right() + self.ball.size.x * 0.5 + 1.0;
                }
                self.ball.vel.y += obstacle.drift();
                self.ball.renormalize(self.speed_multiplier);

                obstacle.handle_hit();
                if obstacle.hit_points() == 0 {
                    // The breaking side takes the point
                    if from_left {
                        self.player1_score += 1;
                    } else {
                        self.player2_score += 1;
                    }
                    log::info!(
                        "obstacle broken - scores {} : {}",
                        self.player1_score,
                        self.player2_score
                    );
                }
            } else {
                // Side keyed off y-centers
                let from_above = self.ball.pos.y < obstacle.pos.y;
                if from_above {
                    self.ball.vel.y = -self.ball.vel.y.abs();
                    self.ball.pos.y = obstacle_box.top() - self.ball.size.y * 0.5 - 1.0;
                } else {
                    self.ball.vel.y = self.ball.vel.y.abs();
                    self.ball.pos.y = obstacle_box.bottom() + self.ball.size.y * 0.5 + 1.0;
                }
                self.ball.vel.x += obstacle.drift();
                self.ball.renormalize(self.speed_multiplier);
            }

            self.sounds
                .play(SoundCue::PaddleHit, &mut *ctx.audio, &*ctx.assets);
            break;
        }
    }

    /// Pickups only register when the ball is cruising with no effect on.
    fn resolve_powerup_pickups(&mut self, ctx: &mut GameContext) {
        if !self.ball.active || self.ball.is_ramping() || self.ball.is_powered() {
            return;
        }
        let sudden_death = self.number == 4;
        let ball_box = self.ball.aabb();

        for powerup in &mut self.powerups {
            if !powerup.active || !ball_box.intersects(&powerup.aabb()) {
                continue;
            }
            if !self.ball.apply_powerup(powerup.kind, sudden_death, ctx.clock) {
                continue;
            }

            match powerup.kind {
                PowerupKind::SpeedUp => {
                    self.speed_multiplier = self
                        .tuning
                        .clamp_multiplier(self.speed_multiplier * SPEED_UP_FACTOR);
                }
                PowerupKind::SlowDown => {
                    self.speed_multiplier = self
                        .tuning
                        .clamp_multiplier(self.speed_multiplier * SLOW_DOWN_FACTOR);
                }
                PowerupKind::IncreaseSize | PowerupKind::DecreaseSize => {}
            }

            self.sounds
                .play(SoundCue::PowerupPickup, &mut *ctx.audio, &*ctx.assets);
            powerup.active = false;
            log::debug!(
                "powerup {:?} collected, multiplier {}",
                powerup.kind,
                self.speed_multiplier
            );
        }
    }

    fn check_progression(&mut self, ctx: &mut GameContext) {
        if self.countdown <= 0.0 {
            self.next_level(ctx);
        }
    }

    fn next_level(&mut self, ctx: &mut GameContext) {
        if self.number < 3 {
            self.number += 1;
            log::info!("Advancing to level {}", self.number);
            self.init(self.number, true, ctx);
        } else if self.number == 3 {
            if self.player1_score > self.player2_score {
                self.declare_winner(PlayerId::One);
            } else if self.player2_score > self.player1_score {
                self.declare_winner(PlayerId::Two);
            } else {
                log::info!("Scores tied, entering sudden death");
                self.number = 4;
                self.init(4, true, ctx);
            }
        } else {
            // Sudden death has no countdown; if it somehow expires, fall
            // back to the main menu
            self.number = 1;
            self.init(1, true, ctx);
        }
    }

    fn declare_winner(&mut self, player: PlayerId) {
        self.winner = Some(player);
        self.phase = LevelPhase::GameOver;
        self.menu.set_kind(MenuKind::GameOver);
        log::info!(
            "{player:?} wins {} : {}",
            self.player1_score,
            self.player2_score
        );
    }

    pub fn draw(&self, gfx: &mut dyn DrawSurface, ctx: &GameContext) {
        match self.phase {
            LevelPhase::MainMenu | LevelPhase::PauseMenu => self.menu.draw(gfx, ctx.canvas),
            LevelPhase::Active => self.draw_playfield(gfx, ctx),
            LevelPhase::GameOver => self.draw_game_over(gfx, ctx),
        }
    }

    fn draw_background(&self, gfx: &mut dyn DrawSurface, ctx: &GameContext) {
        let mut bg = Paint::textured(ctx.assets.resolve("background.png"));
        bg.fill_opacity = 0.17;
        gfx.fill_rect(ctx.canvas * 0.5, ctx.canvas, &bg);
    }

    fn draw_playfield(&self, gfx: &mut dyn DrawSurface, ctx: &GameContext) {
        self.draw_background(gfx, ctx);

        if self.player1.active {
            self.player1.draw(gfx);
        }
        if self.player2.active {
            self.player2.draw(gfx);
        }
        if self.ball.active {
            self.ball.draw(gfx);
        }
        for obstacle in &self.obstacles {
            if obstacle.active {
                obstacle.draw(gfx);
            }
        }
        for powerup in &self.powerups {
            if powerup.active {
                powerup.draw(gfx, &*ctx.assets);
            }
        }

        let hud = Paint::default();
        gfx.draw_text(
            Vec2::new(20.0, 30.0),
            20.0,
            &format!("P1 Score: {}", self.player1_score),
            &hud,
        );
        let time_left = if self.number == 4 {
            "N/A".to_string()
        } else {
            format!("{}", self.countdown.ceil() as u32)
        };
        gfx.draw_text(
            Vec2::new(ctx.canvas.x * 0.5 - 100.0, 30.0),
            20.0,
            &format!("Level {}   |   Time left: {}", self.number, time_left),
            &hud,
        );
        gfx.draw_text(
            Vec2::new(ctx.canvas.x - 115.0, 30.0),
            20.0,
            &format!("P2 Score: {}", self.player2_score),
            &hud,
        );
    }

    fn draw_game_over(&self, gfx: &mut dyn DrawSurface, ctx: &GameContext) {
        self.draw_background(gfx, ctx);
        let center = ctx.canvas * 0.5;

        let (color, banner) = match self.winner {
            Some(PlayerId::One) => ([0.0, 0.0, 1.0], "Player 1 Wins!"),
            Some(PlayerId::Two) => ([1.0, 0.0, 0.0], "Player 2 Wins!"),
            None => ([1.0, 1.0, 1.0], "Game Over"),
        };
        gfx.draw_text(
            center - Vec2::new(140.0, 50.0),
            50.0,
            banner,
            &Paint::fill(color),
        );

        let text = Paint::default();
        gfx.draw_text(
            center + Vec2::new(-148.0, 10.0),
            30.0,
            &format!(
                "Final Scores - P1: {} | P2: {}",
                self.player1_score, self.player2_score
            ),
            &text,
        );
        gfx.draw_text(
            center + Vec2::new(-168.0, 50.0),
            30.0,
            "Press R to Replay the Game",
            &text,
        );
    }

    pub fn level_number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player1_score, self.player2_score)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddles(&self) -> (&Paddle, &Paddle) {
        (&self.player1, &self.player2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SharedKeys;

    const DT: f32 = 1.0 / 60.0;

    fn harness() -> (Level, GameContext, SharedKeys) {
        let keys = SharedKeys::new();
        let mut ctx = GameContext::headless();
        ctx.input = Box::new(keys.clone());
        let level = Level::new(12345, &Settings::default(), Tuning::default());
        (level, ctx, keys)
    }

    fn active_level(number: u32) -> (Level, GameContext, SharedKeys) {
        let (mut level, mut ctx, keys) = harness();
        level.init(number, false, &mut ctx);
        (level, ctx, keys)
    }

    /// Run the ramp out so the ball cruises at full speed.
    fn settle_ball(level: &mut Level, ctx: &mut GameContext) {
        ctx.clock += 1.5;
        level.ball.update(0.0, ctx.clock);
        assert!(!level.ball.is_ramping());
    }

    #[test]
    fn scenario_a_right_wall_scores_for_player_one() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.ball.pos = Vec2::new(893.0, 450.0);
        level.ball.vel = Vec2::new(BALL_SPEED, 0.0);
        level.update(DT, &mut ctx);

        assert_eq!(level.scores(), (1, 0));
        // Ball recentered and ramping again
        let d = level.ball().pos - Vec2::new(450.0, 450.0);
        assert!(d.length() < BALL_SPEED * DT + 1.0);
        assert!(level.ball().is_ramping());
        assert_eq!(level.speed_multiplier(), 1.0);
    }

    #[test]
    fn left_wall_scores_for_player_two() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.ball.pos = Vec2::new(5.0, 450.0);
        level.ball.vel = Vec2::new(-BALL_SPEED, 0.0);
        level.update(DT, &mut ctx);

        assert_eq!(level.scores(), (0, 1));
    }

    #[test]
    fn scenario_b_breakable_two_hits_then_side_scores() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.obstacles.push(Obstacle::breakable(Vec2::new(600.0, 450.0)));

        // First hit, approaching from the left
        level.ball.pos = Vec2::new(593.0, 450.0);
        level.ball.vel = Vec2::new(BALL_SPEED, 0.0);
        level.update(0.0, &mut ctx);
        assert_eq!(level.obstacles[0].hit_points(), 1);
        assert!(level.obstacles[0].active);
        assert!(level.ball.vel.x < 0.0, "ball bounced back left");
        assert_eq!(level.scores(), (0, 0));

        // Second hit from the left breaks it and credits player 1
        level.ball.pos = Vec2::new(593.0, 450.0);
        level.ball.vel = Vec2::new(BALL_SPEED, 0.0);
        level.update(0.0, &mut ctx);
        assert_eq!(level.obstacles[0].hit_points(), 0);
        assert!(!level.obstacles[0].active);
        assert_eq!(level.scores(), (1, 0));
    }

    #[test]
    fn breakable_hit_from_right_credits_player_two() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        let mut obstacle = Obstacle::breakable(Vec2::new(600.0, 450.0));
        obstacle.handle_hit(); // one hit left
        level.obstacles.push(obstacle);

        level.ball.pos = Vec2::new(607.0, 450.0);
        level.ball.vel = Vec2::new(-BALL_SPEED, 0.0);
        level.update(0.0, &mut ctx);
        assert_eq!(level.scores(), (0, 1));
        assert!(level.ball.vel.x > 0.0);
    }

    #[test]
    fn unbreakable_flips_vertical_velocity_and_survives() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level
            .obstacles
            .push(Obstacle::unbreakable(Vec2::new(450.0, 500.0)));

        // Ball above the obstacle moving down
        level.ball.pos = Vec2::new(450.0, 460.0);
        level.ball.vel = Vec2::new(100.0, 300.0);
        level.update(0.0, &mut ctx);

        assert!(level.ball.vel.y < 0.0, "vertical velocity forced upward");
        assert!(level.obstacles[0].active);
        // Renormalized to base speed (no active powerup)
        assert!((level.ball.vel.length() - BALL_SPEED).abs() < 1e-2);
    }

    #[test]
    fn only_first_obstacle_is_handled_per_tick() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.obstacles.push(Obstacle::breakable(Vec2::new(600.0, 450.0)));
        level.obstacles.push(Obstacle::breakable(Vec2::new(600.0, 450.0)));

        level.ball.pos = Vec2::new(593.0, 450.0);
        level.ball.vel = Vec2::new(BALL_SPEED, 0.0);
        level.update(0.0, &mut ctx);

        assert_eq!(level.obstacles[0].hit_points(), 1);
        assert_eq!(level.obstacles[1].hit_points(), 2);
    }

    #[test]
    fn scenario_c_speed_up_pickup_then_expiry_restores_baseline() {
        let (mut level, mut ctx, _keys) = active_level(2);
        settle_ball(&mut level, &mut ctx);
        let baseline = level.ball.vel.length();

        level.powerups.push(Powerup::new(PowerupKind::SpeedUp, level.ball.pos));
        level.update(0.0, &mut ctx);

        assert!((level.speed_multiplier() - SPEED_UP_FACTOR).abs() < 1e-6);
        assert!((level.ball.vel.length() - baseline * SPEED_UP_FACTOR).abs() < 1e-2);
        assert!(!level.powerups[0].active);

        // Four simulated seconds later the effect unwinds
        ctx.clock += POWERUP_DURATION_SECS as f64 + 0.1;
        level.update(0.0, &mut ctx);
        assert!((level.ball.vel.length() - baseline).abs() < 1e-2);
        assert_eq!(level.speed_multiplier(), 1.0);
    }

    #[test]
    fn pickup_ignored_while_ramping() {
        let (mut level, mut ctx, _keys) = active_level(2);
        assert!(level.ball.is_ramping());

        level.powerups.push(Powerup::new(PowerupKind::SlowDown, level.ball.pos));
        level.update(0.0, &mut ctx);

        assert!(level.powerups[0].active, "pickup deferred while ramping");
        assert_eq!(level.speed_multiplier(), 1.0);
    }

    #[test]
    fn multiplier_is_clamped() {
        let tuning = Tuning {
            multiplier_ceiling: 1.2,
            ..Tuning::default()
        };
        let keys = SharedKeys::new();
        let mut ctx = GameContext::headless();
        ctx.input = Box::new(keys.clone());
        let mut level = Level::new(7, &Settings::default(), tuning);
        level.init(2, false, &mut ctx);
        settle_ball(&mut level, &mut ctx);

        level.powerups.push(Powerup::new(PowerupKind::SpeedUp, level.ball.pos));
        level.update(0.0, &mut ctx);
        assert_eq!(level.speed_multiplier(), 1.2);
    }

    #[test]
    fn paddle_hit_renormalizes_and_pushes_clear() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.ball.pos = level.player1.pos;
        level.ball.vel = Vec2::new(-200.0, 100.0);
        level.update(0.0, &mut ctx);

        assert!(level.ball.vel.x > 0.0);
        assert!((level.ball.vel.length() - BALL_SPEED).abs() < 1e-2);
        assert!(level.ball.pos.x > level.player1.aabb().right());
        assert!(!level.ball.aabb().intersects(&level.player1.aabb()));
    }

    #[test]
    fn wall_bounce_clamps_and_reflects() {
        let (mut level, mut ctx, _keys) = active_level(1);
        settle_ball(&mut level, &mut ctx);

        level.ball.pos = Vec2::new(450.0, 897.0);
        level.ball.vel = Vec2::new(100.0, 200.0);
        level.update(0.0, &mut ctx);
        assert!(level.ball.vel.y < 0.0);
        assert!(level.ball.pos.y <= 900.0 - level.ball.size.y * 0.5);

        level.ball.pos = Vec2::new(450.0, 3.0);
        level.ball.vel = Vec2::new(100.0, -200.0);
        level.update(0.0, &mut ctx);
        assert!(level.ball.vel.y > 0.0);
    }

    #[test]
    fn countdown_is_monotonic_and_clamped() {
        let (mut level, mut ctx, _keys) = active_level(1);
        let mut last = level.countdown;
        for _ in 0..100 {
            level.update(1.0, &mut ctx);
            if level.phase() != LevelPhase::Active {
                break;
            }
            assert!(level.countdown <= last);
            assert!(level.countdown >= 0.0);
            last = level.countdown;
        }
    }

    #[test]
    fn level_one_countdown_advances_to_level_two_pause() {
        let (mut level, mut ctx, _keys) = active_level(1);
        level.countdown = 0.01;
        level.update(DT, &mut ctx);
        assert_eq!(level.level_number(), 2);
        assert_eq!(level.phase(), LevelPhase::PauseMenu);
    }

    #[test]
    fn level_three_unequal_scores_ends_the_game() {
        let (mut level, mut ctx, _keys) = active_level(3);
        level.player1_score = 3;
        level.player2_score = 5;
        level.countdown = 0.01;
        level.update(DT, &mut ctx);
        assert_eq!(level.phase(), LevelPhase::GameOver);
        assert_eq!(level.winner(), Some(PlayerId::Two));
    }

    #[test]
    fn scenario_d_tie_after_level_three_enters_sudden_death() {
        let (mut level, mut ctx, keys) = active_level(3);
        level.player1_score = 5;
        level.player2_score = 5;
        level.countdown = 0.01;
        level.update(DT, &mut ctx);

        assert_eq!(level.level_number(), 4);
        assert_eq!(level.phase(), LevelPhase::PauseMenu);
        assert!((level.ball().base_speed() - BALL_SPEED * SUDDEN_DEATH_SPEED_FACTOR).abs() < 1e-3);

        // Ready up and confirm the countdown is bypassed
        keys.press(Key::Space);
        level.update(DT, &mut ctx);
        keys.release(Key::Space);
        assert_eq!(level.phase(), LevelPhase::Active);

        let before = level.countdown;
        level.update(1.0, &mut ctx);
        assert_eq!(level.countdown, before);

        // First to ten wins
        level.player1_score = 10;
        level.update(DT, &mut ctx);
        assert_eq!(level.phase(), LevelPhase::GameOver);
        assert_eq!(level.winner(), Some(PlayerId::One));
    }

    #[test]
    fn sudden_death_spawns_up_to_caps() {
        let (mut level, mut ctx, _keys) = active_level(4);
        // Park the ball so nothing scores while we run the schedules out
        level.ball.active = false;

        for _ in 0..(120.0 / DT) as u32 {
            level.update(DT, &mut ctx);
        }

        let tuning = Tuning::default();
        let unbreakable = level.obstacles.iter().filter(|o| !o.is_breakable()).count() as u32;
        let breakable = level.obstacles.iter().filter(|o| o.is_breakable()).count() as u32;
        assert_eq!(unbreakable, tuning.sudden_death_max_unbreakable);
        assert_eq!(breakable, tuning.sudden_death_max_breakable);
        assert!(level.powerups.len() as u32 <= tuning.sudden_death_max_powerups);
        // Spawned powerups all honor the proximity rule at spawn time
        assert!(!level.powerups.is_empty());
    }

    #[test]
    fn scripted_level_two_spawns_alternate_kinds() {
        let (mut level, mut ctx, _keys) = active_level(2);
        level.ball.active = false;

        // 25 s: first spawn lands at 5 s, the rest at most 5 s apart, and
        // the 30 s countdown has not ended the level yet
        for _ in 0..(25.0 / DT) as u32 {
            level.update(DT, &mut ctx);
        }
        assert_eq!(level.phase(), LevelPhase::Active);

        assert_eq!(level.powerups.len(), 4);
        let kinds: Vec<_> = level.powerups.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PowerupKind::SpeedUp,
                PowerupKind::SlowDown,
                PowerupKind::SpeedUp,
                PowerupKind::SlowDown,
            ]
        );
        assert_eq!(level.powerups[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn main_menu_play_starts_the_level() {
        let (mut level, mut ctx, keys) = harness();
        level.init(1, true, &mut ctx);
        assert_eq!(level.phase(), LevelPhase::MainMenu);

        keys.press(Key::Space);
        assert_eq!(level.update(DT, &mut ctx), LevelOutcome::Running);
        assert_eq!(level.phase(), LevelPhase::Active);
    }

    #[test]
    fn exit_is_surfaced_not_swallowed() {
        let (mut level, mut ctx, keys) = harness();
        level.init(1, true, &mut ctx);
        keys.press(Key::E);
        assert_eq!(level.update(DT, &mut ctx), LevelOutcome::Exit);
    }

    #[test]
    fn game_over_play_again_resets_to_main_menu() {
        let (mut level, mut ctx, keys) = active_level(3);
        level.player1_score = 7;
        level.player2_score = 2;
        level.countdown = 0.01;
        level.update(DT, &mut ctx);
        assert_eq!(level.phase(), LevelPhase::GameOver);

        keys.press(Key::R);
        level.update(DT, &mut ctx);
        assert_eq!(level.phase(), LevelPhase::MainMenu);
        assert_eq!(level.level_number(), 1);
        assert_eq!(level.scores(), (0, 0));
        assert_eq!(level.winner(), None);
    }

    #[test]
    fn scores_persist_across_level_init() {
        let (mut level, mut ctx, _keys) = active_level(1);
        level.player1_score = 3;
        level.init(2, false, &mut ctx);
        assert_eq!(level.scores(), (3, 0));
    }
}
