//! Sound-effect notifications.
//!
//! The engine announces effects and never waits for, or looks at, the
//! outcome. Sinks must not call back into the engine.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SoundEffect {
    CardPlay,
    Capture,
    Pisti,
    JackPisti,
    Deal,
    GameStart,
    Undo,
    PlayerWins,
    CpuWins,
    Tie,
}

impl SoundEffect {
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::CardPlay => "card_play",
            SoundEffect::Capture => "capture",
            SoundEffect::Pisti => "pisti",
            SoundEffect::JackPisti => "pisti_jack",
            SoundEffect::Deal => "deal",
            SoundEffect::GameStart => "game_start",
            SoundEffect::Undo => "undo",
            SoundEffect::PlayerWins => "player_wins",
            SoundEffect::CpuWins => "cpu_wins",
            SoundEffect::Tie => "tie",
        }
    }
}

/// Receiver for fire-and-forget sound triggers.
pub trait SoundSink: Send {
    fn notify(&self, effect: SoundEffect);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn notify(&self, _effect: SoundEffect) {}
}

/// Reports each effect as a `debug` event; for front ends without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl SoundSink for TraceSink {
    fn notify(&self, effect: SoundEffect) {
        tracing::debug!(effect = effect.name(), "sound");
    }
}

/// Keeps every notification in order; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<SoundEffect>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn effects(&self) -> Vec<SoundEffect> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<SoundEffect> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).last().copied()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<SoundEffect> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SoundSink for RecordingSink {
    fn notify(&self, effect: SoundEffect) {
        tracing::trace!(effect = effect.name(), "sound");
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(effect);
    }
}
