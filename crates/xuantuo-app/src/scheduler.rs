use std::thread;
use std::time::Duration;

/// Points where the table waits before an automaton acts, so a viewer can
/// follow what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pause {
    AutomatonPlay,
    KouLeResponse,
    RoundFinish,
}

impl Pause {
    pub const fn default_duration(self) -> Duration {
        match self {
            Pause::AutomatonPlay => Duration::from_millis(1200),
            Pause::KouLeResponse => Duration::from_millis(1000),
            Pause::RoundFinish => Duration::from_millis(1500),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Pause::AutomatonPlay => "automaton_play",
            Pause::KouLeResponse => "kou_le_response",
            Pause::RoundFinish => "round_finish",
        }
    }
}

pub trait Scheduler {
    fn pause(&mut self, pause: Pause);
}

/// No waiting at all; used by tests and the bench harness.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn pause(&mut self, _pause: Pause) {}
}

/// Blocks the calling thread for each pause.
#[derive(Debug, Clone, Copy)]
pub struct PacedScheduler {
    automaton_play: Duration,
    kou_le_response: Duration,
    round_finish: Duration,
}

impl PacedScheduler {
    pub fn new() -> Self {
        Self {
            automaton_play: Pause::AutomatonPlay.default_duration(),
            kou_le_response: Pause::KouLeResponse.default_duration(),
            round_finish: Pause::RoundFinish.default_duration(),
        }
    }

    /// Same proportions, stretched or shrunk by `factor`.
    pub fn scaled(factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        let base = Self::new();
        Self {
            automaton_play: scale(base.automaton_play, factor),
            kou_le_response: scale(base.kou_le_response, factor),
            round_finish: scale(base.round_finish, factor),
        }
    }

    pub fn duration(&self, pause: Pause) -> Duration {
        match pause {
            Pause::AutomatonPlay => self.automaton_play,
            Pause::KouLeResponse => self.kou_le_response,
            Pause::RoundFinish => self.round_finish,
        }
    }
}

fn scale(duration: Duration, factor: f32) -> Duration {
    let millis = (duration.as_millis() as f64 * f64::from(factor)).round();
    Duration::from_millis(millis as u64)
}

impl Default for PacedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for PacedScheduler {
    fn pause(&mut self, pause: Pause) {
        let duration = self.duration(pause);
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Remembers every pause instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    pauses: Vec<Pause>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> &[Pause] {
        &self.pauses
    }

    pub fn count(&self, pause: Pause) -> usize {
        self.pauses.iter().filter(|p| **p == pause).count()
    }
}

impl Scheduler for RecordingScheduler {
    fn pause(&mut self, pause: Pause) {
        self.pauses.push(pause);
    }
}
