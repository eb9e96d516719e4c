//! Cat Runner entry point
//!
//! In the browser this only installs logging; the page drives a
//! `WebRunner`. Natively it runs an autopilot demo session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Cat Runner starting...");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cat Runner (native) starting...");
    log::info!("Native mode runs the autopilot demo - use the wasm build to play");

    let args = demo::Args::from_env();
    demo::run(&args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use cat_runner::{QualityPreset, Session};
    use cat_runner::persistence::FileStorage;
    use cat_runner::sim::{GameEvent, GameMode, World};
    use cat_runner::telemetry::{LogSink, Telemetry};
    use cat_runner::tuning::Tuning;

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct Args {
        pub seed: u64,
        pub seconds: f64,
        pub save_path: String,
        pub tuning_path: Option<String>,
        pub quality: Option<QualityPreset>,
    }

    impl Args {
        /// `cat-runner [seed] [seconds] [save file] [tuning file] [quality]`
        pub fn from_env() -> Self {
            let mut args = std::env::args().skip(1);
            let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xCA7);
            let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
            let save_path = args
                .next()
                .unwrap_or_else(|| "cat_runner_save.json".to_string());
            let tuning_path = args.next().filter(|p| !p.is_empty() && p != "-");
            let quality = args.next().and_then(|name| {
                let preset = QualityPreset::parse(&name);
                if preset.is_none() {
                    log::warn!("Unknown quality preset '{}', keeping saved settings", name);
                }
                preset
            });
            Self {
                seed,
                seconds,
                save_path,
                tuning_path,
                quality,
            }
        }
    }

    fn load_tuning(path: Option<&str>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path).map(|text| Tuning::from_json(&text)) {
            Ok(Ok(tuning)) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Ok(Err(e)) => {
                log::warn!("Invalid tuning file {}: {}", path, e);
                Tuning::default()
            }
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run(args: &Args) {
        let world = World::with_seed(load_tuning(args.tuning_path.as_deref()), args.seed);
        let storage = FileStorage::new(&args.save_path);
        let mut session = Session::new(world, storage, Telemetry::new(Box::new(LogSink)));
        if let Some(preset) = args.quality {
            session.set_quality(preset);
            log::info!("Quality preset {}", preset.as_str());
        }
        session.set_autopilot(true);

        let mut jumps = 0u32;
        let mut powerups = 0u32;
        let frames = (args.seconds * 1000.0 / FRAME_MS).ceil() as u64;
        for frame in 0..=frames {
            for event in session.frame(frame as f64 * FRAME_MS) {
                match event {
                    GameEvent::Jump => jumps += 1,
                    GameEvent::PowerupActivated { .. } => powerups += 1,
                    _ => {}
                }
            }
            if session.world().mode == GameMode::GameOver {
                break;
            }
        }

        let world = session.world();
        log::info!(
            "Demo finished: mode {:?}, score {}, {:.1}s survived, {} jumps, {} power-ups",
            world.mode,
            world.score,
            world.elapsed_ms / 1000.0,
            jumps,
            powerups
        );
        log::info!(
            "High score {} (stored in {})",
            session.high_score(),
            session.storage().path().display()
        );
    }
}
