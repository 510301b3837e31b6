//! Nebula Dash headless runner
//!
//! Plays one seeded session with a simple autopilot at a simulated 60 Hz
//! refresh and prints the session report as JSON.
//!
//! Environment:
//! - `NEBULA_DASH_SEED`: session seed (u64)
//! - `NEBULA_DASH_TUNING`: path to a JSON tuning override
//! - `NEBULA_DASH_FRAMES`: frame budget before the run is stopped
//! - `RUST_LOG`: log filter

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;

    use nebula_dash::consts::SIM_DT;
    use nebula_dash::sim::GameState;
    use nebula_dash::{Direction, Engine, RunStatus, SessionObserver, SessionReport, Tuning};

    const DEFAULT_SEED: u64 = 0x5eed;
    /// Three minutes of frames
    const DEFAULT_FRAMES: u32 = 60 * 180;
    /// How far ahead (pixels) the autopilot looks for obstacles
    const LOOKAHEAD: f32 = 220.0;

    #[derive(Default)]
    struct ConsoleObserver {
        report: Option<SessionReport>,
    }

    impl SessionObserver for ConsoleObserver {
        fn on_level_complete(&mut self, level: u32) {
            log::info!("Level {level} complete");
        }

        fn on_session_end(&mut self, report: &SessionReport) {
            self.report = Some(report.clone());
        }
    }

    fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn tuning_from_env() -> Tuning {
        let Ok(path) = env::var("NEBULA_DASH_TUNING") else {
            return Tuning::default();
        };
        match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Tuning::default()
            }
        }
    }

    /// Dodge the closest threatening obstacle, otherwise drift toward the nearest pickup
    fn steer(engine: &mut Engine<ConsoleObserver>) {
        let Some(target) = engine.state().map(pick_direction) else {
            return;
        };
        engine.release_all();
        if let Some(direction) = target {
            engine.press(direction);
        }
    }

    fn pick_direction(state: &GameState) -> Option<Direction> {
        let player = &state.player.body;
        let (top, bottom) = (player.pos.y, player.pos.y + player.size.y);
        let front = player.pos.x + player.size.x;

        let threat = state
            .obstacles
            .iter()
            .filter(|o| {
                let dx = o.body.pos.x - front;
                dx > -player.size.x && dx < LOOKAHEAD
            })
            .filter(|o| o.body.pos.y < bottom + 10.0 && o.body.pos.y + o.body.size.y > top - 10.0)
            .min_by(|a, b| a.body.pos.x.total_cmp(&b.body.pos.x));

        if let Some(obstacle) = threat {
            let room_above = obstacle.body.pos.y;
            let room_below = state.tuning.field_height - (obstacle.body.pos.y + obstacle.body.size.y);
            return Some(if room_above > room_below {
                Direction::Up
            } else {
                Direction::Down
            });
        }

        let center_y = player.center().y;
        state
            .collectibles
            .iter()
            .filter(|c| c.body.pos.x > player.pos.x)
            .min_by(|a, b| a.body.pos.x.total_cmp(&b.body.pos.x))
            .and_then(|c| {
                let dy = c.body.center().y - center_y;
                if dy.abs() < state.tuning.player_speed {
                    None
                } else if dy < 0.0 {
                    Some(Direction::Up)
                } else {
                    Some(Direction::Down)
                }
            })
    }

    pub fn run() {
        env_logger::init();

        let seed = env_parse("NEBULA_DASH_SEED", DEFAULT_SEED);
        let frames = env_parse("NEBULA_DASH_FRAMES", DEFAULT_FRAMES);
        let tuning = tuning_from_env();
        log::info!("Nebula Dash (headless) starting, seed {seed}, {frames} frames");

        let mut engine = match Engine::new(tuning, seed, ConsoleObserver::default()) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Cannot start: {e}");
                return;
            }
        };
        engine.start();
        for _ in 0..frames {
            steer(&mut engine);
            engine.frame(SIM_DT);
            if engine.status() == RunStatus::Ended {
                break;
            }
        }
        engine.stop();

        match engine.observer().report.as_ref().map(serde_json::to_string_pretty) {
            Some(Ok(json)) => println!("{json}"),
            Some(Err(e)) => log::error!("Failed to encode session report: {e}"),
            None => log::error!("Session ended without a report"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is embedded by a host on the web; there is no standalone entry point
}
