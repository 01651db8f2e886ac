/// Tunable automaton parameters.
///
/// Read from the environment by [`BotParams::from_env`]; absent or invalid
/// values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Chance of declaring Kou Le when opening a round (default: 0.15)
    pub kou_le_chance: f64,

    /// Pairs at or above this strength are opened eagerly (default: 120)
    pub strong_pair_threshold: i16,

    /// Cards still needed to reach 刚够 before a triple is pushed (default: 3)
    pub triple_push_margin: usize,

    /// Collected pile size from which the automaton sheds singles (default: 15)
    pub shed_singles_from: usize,
}

impl BotParams {
    pub const KOU_LE_CHANCE_VAR: &'static str = "XTT_KOU_LE_CHANCE";
    pub const STRONG_PAIR_VAR: &'static str = "XTT_STRONG_PAIR_THRESHOLD";

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let kou_le_chance = read(Self::KOU_LE_CHANCE_VAR)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
            .unwrap_or(defaults.kou_le_chance);

        let strong_pair_threshold = read(Self::STRONG_PAIR_VAR)
            .and_then(|raw| raw.trim().parse::<i16>().ok())
            .filter(|value| (100..=125).contains(value))
            .unwrap_or(defaults.strong_pair_threshold);

        Self {
            kou_le_chance,
            strong_pair_threshold,
            ..defaults
        }
    }

    pub fn with_kou_le_chance(mut self, chance: f64) -> Self {
        self.kou_le_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            kou_le_chance: 0.15,
            strong_pair_threshold: 120,
            triple_push_margin: 3,
            shed_singles_from: 15,
        }
    }
}
