//! Headless demo binary
//!
//! Runs an autopilot session at the reference tick rate and prints the
//! final score. Real front-ends embed the library and supply their own
//! `InputSource`/`RenderSink`/`SoundSink` implementations; this binary is
//! the wiring example and a smoke test.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;

use coin_collector::audio::AudioManager;
use coin_collector::session::{Autopilot, Frame, RenderSink, Session};
use coin_collector::{Settings, Tuning, TuningError};

/// Logs the scoreboard line once a second
struct HudLog {
    every: u64,
    frames: u64,
}

impl RenderSink for HudLog {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        if self.frames % self.every == 0 {
            info!("{}", frame.hud);
        }
    }
}

fn main() -> Result<(), TuningError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let max_ticks = args.next().and_then(|s| s.parse().ok());

    let settings = Settings::load(Path::new("settings.json"));
    let mut audio = AudioManager::new();
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let tuning = Tuning::default();
    let mut pilot = Autopilot::new(&tuning, max_ticks);
    let mut hud = HudLog {
        every: u64::from(tuning.tick_rate),
        frames: 0,
    };

    let mut session = Session::new(tuning, seed)?.with_audio(audio);
    let score = session.run(&mut pilot, &mut hud);

    println!("Final score: {score}");
    Ok(())
}
