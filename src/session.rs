//! Session runner
//!
//! Drives the simulation at a fixed tick rate against two collaborator
//! traits: an `InputSource` polled once per tick and a `RenderSink` handed
//! the finished frame. Real windowing and rasterization live behind those
//! traits; the crate itself ships only headless implementations.

use std::time::{Duration, Instant};

use glam::Vec2;
use log::info;

use crate::audio::AudioManager;
use crate::sim::{
    Collider, EntityKind, GameEvent, GamePhase, GameState, OverlapTest, SpriteInstance,
    TickInput, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Input sampled at the top of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Current pointer position, if known
    pub pointer: Option<Vec2>,
    /// Player asked to end the session
    pub quit: bool,
}

/// Non-blocking input provider. `poll` gets a read-only snapshot of the
/// state so demo drivers can steer from it.
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> InputFrame;
}

/// Everything the render collaborator needs for one frame, back to front
#[derive(Debug, Clone)]
pub struct Frame {
    pub sprites: Vec<SpriteInstance>,
    /// Scoreboard overlay line
    pub hud: String,
}

/// Presentation backend; must not block the tick loop
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

/// Input source that never moves and never quits
#[derive(Debug, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn poll(&mut self, _state: &GameState) -> InputFrame {
        InputFrame::default()
    }
}

/// Render sink that discards every frame
#[derive(Debug, Default)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn present(&mut self, _frame: &Frame) {}
}

/// Self-steering input for demo runs: chases the coin, swerves around
/// whatever hazard is bearing down on the car.
#[derive(Debug)]
pub struct Autopilot {
    sensitivity: f32,
    /// Quit after this many ticks (`None` runs until game over)
    pub max_ticks: Option<u64>,
}

impl Autopilot {
    pub fn new(tuning: &Tuning, max_ticks: Option<u64>) -> Self {
        Self {
            sensitivity: tuning.pointer_sensitivity,
            max_ticks,
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        if let Some(max) = self.max_ticks {
            if state.tick >= max {
                return InputFrame {
                    pointer: None,
                    quit: true,
                };
            }
        }

        let player = &state.player;
        // Chase the nearest coin still ahead of the car
        let mut target = player.pos.y;
        if let Some(coin) = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Coin && e.active && e.pos.x > player.pos.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        {
            target = coin.pos.y;
        }

        // Any hazard closing in on the target line vetoes the chase
        for e in &state.entities {
            if !e.active || !matches!(e.kind, EntityKind::Traffic | EntityKind::Flotsam) {
                continue;
            }
            let ahead = e.pos.x - player.pos.x;
            if (-40.0..180.0).contains(&ahead) && (e.pos.y - target).abs() < 60.0 {
                target = if e.pos.y > player.pos.y {
                    e.pos.y - 100.0
                } else {
                    e.pos.y + 100.0
                };
            }
        }

        // The steer path divides by the sensitivity, so pre-scale
        InputFrame {
            pointer: Some(Vec2::new(player.pos.x, target * self.sensitivity)),
            quit: false,
        }
    }
}

/// One playthrough: a fresh `GameState`, its collider, and the audio hook
pub struct Session {
    tuning: Tuning,
    state: GameState,
    collider: Collider,
    audio: AudioManager,
}

impl Session {
    /// Validate the tuning and build a fresh session from a seed
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let state = GameState::new(seed, &tuning);
        Ok(Self {
            tuning,
            state,
            collider: Collider::new(OverlapTest::PixelMask),
            audio: AudioManager::new(),
        })
    }

    pub fn with_audio(mut self, audio: AudioManager) -> Self {
        self.audio = audio;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run the blocking fixed-timestep loop until game over or a quit
    /// request, returning the final score.
    ///
    /// The terminal tick is still rendered; termination is observed at the
    /// top of the following iteration, so the last frame the player sees
    /// carries the final scoreboard.
    pub fn run(&mut self, input: &mut dyn InputSource, render: &mut dyn RenderSink) -> u64 {
        info!(
            "session start, seed {} at {} Hz",
            self.state.seed, self.tuning.tick_rate
        );
        self.audio.handle(&GameEvent::EngineLoopStart);

        let tick_len = Duration::from_secs_f64(1.0 / f64::from(self.tuning.tick_rate));
        let mut next_tick = Instant::now() + tick_len;

        loop {
            if self.state.phase == GamePhase::GameOver {
                break;
            }
            let frame_in = input.poll(&self.state);
            if frame_in.quit {
                break;
            }

            let tick_input = TickInput {
                pointer_y: frame_in.pointer.map(|p| p.y),
            };
            let events = tick(&mut self.state, &tick_input, &self.tuning, &self.collider);
            for event in &events {
                self.audio.handle(event);
            }

            render.present(&Frame {
                sprites: self.state.draw_list(),
                hud: self.state.scoreboard.line(),
            });

            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            }
            next_tick += tick_len;
        }

        self.audio.handle(&GameEvent::EngineLoopStop);
        info!(
            "session over after {} ticks: score {}, health {}",
            self.state.tick, self.state.scoreboard.score, self.state.scoreboard.health
        );
        self.state.scoreboard.score
    }
}
