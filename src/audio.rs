//! Audio feedback hook
//!
//! The simulation never talks to a sound device; it emits `GameEvent`s and
//! this module turns them into `SoundEffect` requests against a pluggable
//! `SoundSink`. With no sink installed every call is a no-op, so headless
//! runs and tests need no audio backend at all.

use log::debug;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Looping engine hum, running for the whole session
    Engine,
    /// Collided with a rival car
    Crash,
    /// Collided with road debris
    Hit,
    /// Coin pickup
    Coin,
    /// Repair pickup
    Fix,
    /// Star pickup
    Invulnerable,
}

/// Playback backend. Implementations must not block; requests are
/// fire-and-forget.
pub trait SoundSink {
    /// Play a one-shot effect at the given volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start a looping effect; keeps playing until stopped
    fn start_loop(&mut self, _effect: SoundEffect, _volume: f32) {}

    /// Stop a looping effect
    fn stop_loop(&mut self, _effect: SoundEffect) {}
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn SoundSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Manager with no backend; all playback degrades to no-ops
    pub fn new() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 0.5,
            muted: false,
        }
    }

    pub fn with_sink(sink: Box<dyn SoundSink>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new()
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Per-effect gain on top of the effective volume. The crash is mixed
    /// hot so it cuts through the engine loop.
    fn gain(effect: SoundEffect) -> f32 {
        match effect {
            SoundEffect::Crash => 1.5,
            _ => 1.0,
        }
    }

    /// Play a one-shot sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = (self.effective_volume() * Self::gain(effect)).min(1.0);
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = &mut self.sink else { return };
        sink.play(effect, vol);
    }

    /// Route a simulation event to its sound effect
    pub fn handle(&mut self, event: &GameEvent) {
        debug!("audio event: {event:?}");
        match event {
            GameEvent::CoinCollected => self.play(SoundEffect::Coin),
            GameEvent::CarHit => self.play(SoundEffect::Crash),
            GameEvent::ObjectHit => self.play(SoundEffect::Hit),
            GameEvent::RepairCollected => self.play(SoundEffect::Fix),
            GameEvent::StarCollected => self.play(SoundEffect::Invulnerable),
            GameEvent::EngineLoopStart => {
                let vol = self.effective_volume();
                if vol > 0.0 {
                    if let Some(sink) = &mut self.sink {
                        sink.start_loop(SoundEffect::Engine, vol);
                    }
                }
            }
            GameEvent::EngineLoopStop => {
                if let Some(sink) = &mut self.sink {
                    sink.stop_loop(SoundEffect::Engine);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Recording {
        played: Vec<(SoundEffect, f32)>,
        looping: Vec<SoundEffect>,
    }

    struct RecordingSink(Rc<RefCell<Recording>>);

    impl SoundSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().played.push((effect, volume));
        }
        fn start_loop(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.borrow_mut().looping.push(effect);
        }
        fn stop_loop(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().looping.retain(|&e| e != effect);
        }
    }

    fn manager() -> (AudioManager, Rc<RefCell<Recording>>) {
        let rec = Rc::new(RefCell::new(Recording::default()));
        let mgr = AudioManager::with_sink(Box::new(RecordingSink(rec.clone())));
        (mgr, rec)
    }

    #[test]
    fn events_map_to_effects() {
        let (mut mgr, rec) = manager();
        mgr.handle(&GameEvent::CoinCollected);
        mgr.handle(&GameEvent::ObjectHit);

        let played: Vec<SoundEffect> = rec.borrow().played.iter().map(|&(e, _)| e).collect();
        assert_eq!(played, vec![SoundEffect::Coin, SoundEffect::Hit]);
    }

    #[test]
    fn crash_is_mixed_louder_than_a_pickup() {
        let (mut mgr, rec) = manager();
        mgr.handle(&GameEvent::CarHit);
        mgr.handle(&GameEvent::CoinCollected);

        let rec = rec.borrow();
        assert!(rec.played[0].1 > rec.played[1].1);
    }

    #[test]
    fn muted_manager_plays_nothing() {
        let (mut mgr, rec) = manager();
        mgr.set_muted(true);
        mgr.handle(&GameEvent::CarHit);
        mgr.handle(&GameEvent::EngineLoopStart);

        assert!(rec.borrow().played.is_empty());
        assert!(rec.borrow().looping.is_empty());
    }

    #[test]
    fn engine_loop_starts_and_stops() {
        let (mut mgr, rec) = manager();
        mgr.handle(&GameEvent::EngineLoopStart);
        assert_eq!(rec.borrow().looping, vec![SoundEffect::Engine]);

        mgr.handle(&GameEvent::EngineLoopStop);
        assert!(rec.borrow().looping.is_empty());
    }

    #[test]
    fn sinkless_manager_is_a_no_op() {
        let mut mgr = AudioManager::new();
        mgr.handle(&GameEvent::CarHit);
        mgr.handle(&GameEvent::EngineLoopStart);
        mgr.handle(&GameEvent::EngineLoopStop);
    }
}
