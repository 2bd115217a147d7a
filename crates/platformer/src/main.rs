//! Headless demo
//!
//! Runs the testing scene for a few seconds of scripted input and logs what
//! the player runs into. Pass a settings file path to override
//! `platformer.toml`.

use platformer::{GameConfig, GameError, PlayerInput, TestingScene};
use platformer_engine::config::Config;
use platformer_engine::foundation::logging;

const FRAME_RATE: u32 = 60;
const SECONDS: u32 = 10;

fn main() -> Result<(), GameError> {
    logging::init("info");

    let path = std::env::args().nth(1).unwrap_or_else(|| "platformer.toml".to_owned());
    let config = GameConfig::load_or_default(&path)?;
    log::info!("Loaded settings from {path} (defaults where missing)");

    let mut scene = TestingScene::new(&config);
    let dt = 1.0 / FRAME_RATE as f32;

    for frame in 0..FRAME_RATE * SECONDS {
        scene.update(dt, &scripted_input(frame));

        if frame % FRAME_RATE == FRAME_RATE - 1 {
            let body = scene.player().body();
            log::info!(
                "t={}s position=({:.1}, {:.1}) velocity=({:.2}, {:.2}) grounded={} key={} door={}",
                (frame + 1) / FRAME_RATE,
                body.position().x,
                body.position().y,
                body.velocity().x,
                body.velocity().y,
                scene.player().is_grounded(),
                if scene.key().is_picked_up() { "taken" } else { "waiting" },
                if scene.door().is_open() { "open" } else { "closed" },
            );
        }
    }

    log::info!("Demo finished, {} shapes left in the index", scene.index().borrow().len());
    Ok(())
}

/// Settle, hop onto the left block, jump for the key, then walk to the door
/// holding interact.
fn scripted_input(frame: u32) -> PlayerInput {
    match frame {
        0..=59 => PlayerInput::default(),
        60..=89 => PlayerInput {
            right: true,
            jump: frame == 60 || frame == 75,
            ..PlayerInput::default()
        },
        90..=239 => PlayerInput {
            right: true,
            interact: true,
            jump: frame % 45 == 0,
            ..PlayerInput::default()
        },
        _ => PlayerInput {
            left: frame < 300,
            interact: true,
            ..PlayerInput::default()
        },
    }
}
