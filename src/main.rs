//! Arena Duel headless runner
//!
//! Plays an autopilot session at the fixed timestep and prints the final
//! snapshot as JSON. Useful for balance passes and determinism checks.
//!
//! Usage:
//!   arena-duel [--seed N] [--secs S] [--config path.json]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use arena_duel::consts::SIM_DT;
    use arena_duel::sim::{GameEvent, GameState, Snapshot};
    use arena_duel::{FrameDriver, GameConfig};

    env_logger::init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;

    log::info!("Arena Duel starting (seed {}, {}s)", args.seed, args.secs);

    let mut state = GameState::new(config, args.seed);
    let mut driver = FrameDriver::new();
    driver.set_autopilot(true);

    let frames = (args.secs / SIM_DT).round() as u64;
    let mut kills = 0u32;
    let mut casts = 0u32;
    for _ in 0..frames {
        driver.advance(&mut state, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::AbilityCast { .. } => casts += 1,
                GameEvent::GameOver { .. } => log::warn!("Autopilot died at t={:.1}s", state.time_ms / 1000.0),
                _ => {}
            }
        }
        if state.session.is_game_over {
            break;
        }
    }

    log::info!(
        "Finished: level {}, score {}, {} kills, {} casts over {} ticks",
        state.level.current_level,
        state.session.score,
        kills,
        casts,
        state.time_ticks
    );
    println!("{}", Snapshot::capture(&state).to_json()?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by the host on the web; no standalone runner
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
struct Args {
    seed: u64,
    secs: f32,
    config: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self {
            seed: 12345,
            secs: 60.0,
            config: None,
        };
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--seed" => {
                    let v = value()?;
                    parsed.seed = v.parse().map_err(|_| format!("bad seed '{v}'"))?;
                }
                "--secs" => {
                    let v = value()?;
                    parsed.secs = v.parse().map_err(|_| format!("bad duration '{v}'"))?;
                    if !(parsed.secs > 0.0) {
                        return Err(format!("duration must be positive, got {v}"));
                    }
                }
                "--config" => parsed.config = Some(value()?.into()),
                other => return Err(format!("unknown argument '{other}'")),
            }
        }
        Ok(parsed)
    }
}
