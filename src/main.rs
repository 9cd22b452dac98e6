//! Duel Pong entry point
//!
//! Runs a headless demo session: an autopilot drives both paddles and taps
//! through the menus so the whole level progression can be exercised from
//! the command line. A real frontend would swap in concrete DrawSurface /
//! AudioSink / InputSource implementations.
//!
//! Usage: duel-pong [seed] [demo-seconds]

use duel_pong::platform::{DirAssets, Key, NullAudio, NullDraw, SharedKeys};
use duel_pong::sim::LevelPhase;
use duel_pong::{FrameClock, GameContext, Session, SessionOutcome, Settings, Tuning};

/// Drive the input for one frame: track the ball during play, tap through
/// menus otherwise. Taps alternate press/release frames so the menus' edge
/// detection sees distinct key-down events.
fn drive(session: &Session, keys: &SharedKeys, tap: &mut bool) {
    keys.release_all();

    match session.level().phase() {
        LevelPhase::MainMenu | LevelPhase::PauseMenu => {
            if *tap {
                keys.press(Key::Space);
            }
            *tap = !*tap;
        }
        LevelPhase::GameOver => {
            if *tap {
                keys.press(Key::R);
            }
            *tap = !*tap;
        }
        LevelPhase::Active => {
            let ball_y = session.level().ball().pos.y;
            let (p1, p2) = session.level().paddles();

            // Dead zone so the paddles don't jitter on the ball's row
            if ball_y < p1.pos.y - 10.0 {
                keys.press(Key::W);
            } else if ball_y > p1.pos.y + 10.0 {
                keys.press(Key::S);
            }
            if ball_y < p2.pos.y - 10.0 {
                keys.press(Key::Up);
            } else if ball_y > p2.pos.y + 10.0 {
                keys.press(Key::Down);
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    let demo_secs: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(90.0);

    let settings = Settings::load("settings.json");
    let keys = SharedKeys::new();
    let ctx = GameContext::new(
        Box::new(keys.clone()),
        Box::new(NullAudio),
        Box::new(DirAssets::new("assets")),
    );
    let mut session = Session::new(seed, settings, Tuning::default(), ctx);

    let mut gfx = NullDraw;
    let mut clock = FrameClock::new();
    let mut tap = false;
    let mut elapsed = 0.0f32;

    log::info!("Demo run: seed {seed}, {demo_secs} s");
    while elapsed < demo_secs {
        let dt = clock.tick();
        elapsed += dt;

        drive(&session, &keys, &mut tap);
        if session.update(dt) == SessionOutcome::Exit {
            log::info!("Exit requested, shutting down");
            break;
        }
        session.draw(&mut gfx);
    }

    let (p1, p2) = session.level().scores();
    println!(
        "Demo finished on level {} - P1 {} : P2 {}{}",
        session.level().level_number(),
        p1,
        p2,
        match session.level().winner() {
            Some(winner) => format!(" (winner: {winner:?})"),
            None => String::new(),
        }
    );
}
