mod kou_le;
mod params;
mod play;

pub use kou_le::KouLePlanner;
pub use params::BotParams;
pub use play::{PlayDecision, PlayPlanner};

use std::sync::OnceLock;
use xuantuo_core::model::hand::Hand;
use xuantuo_core::model::player::Participant;
use xuantuo_core::model::play::Play;
use xuantuo_core::model::reward::crosses_tier;
use xuantuo_core::model::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Always plays the weakest legal option and never declares Kou Le.
    Easy,
    #[default]
    Normal,
}

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| Self::parse(std::env::var("XTT_BOT_DIFFICULTY").ok().as_deref()))
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(raw) => match raw.as_str() {
                "easy" | "weakest" => BotDifficulty::Easy,
                "normal" | "default" | "heuristic" => BotDifficulty::Normal,
                _ => BotDifficulty::default(),
            },
            None => BotDifficulty::default(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Normal => "normal",
        }
    }
}

/// What an automaton knows when it has to act.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub seat: Participant,
    pub hand: &'a Hand,
    pub table: &'a Table,
    pub collected: usize,
    pub difficulty: BotDifficulty,
    pub params: &'a BotParams,
}

impl<'a> BotContext<'a> {
    pub fn new(
        seat: Participant,
        hand: &'a Hand,
        table: &'a Table,
        collected: usize,
        difficulty: BotDifficulty,
        params: &'a BotParams,
    ) -> Self {
        Self {
            seat,
            hand,
            table,
            collected,
            difficulty,
            params,
        }
    }

    pub fn target(&self) -> Option<&'a Play> {
        self.table.target()
    }

    pub fn is_opening(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether winning this round would lift the collected pile into the
    /// next reward tier.
    pub fn tier_urgency(&self) -> bool {
        self.target()
            .is_some_and(|target| crosses_tier(self.collected, target.card_count() * Table::SEATS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xuantuo_core::model::card::Card;

    fn card(id: &str) -> Card {
        Card::from_id(id).unwrap()
    }

    #[test]
    fn difficulty_parsing_falls_back_to_normal() {
        assert_eq!(BotDifficulty::parse(None), BotDifficulty::Normal);
        assert_eq!(BotDifficulty::parse(Some(" Easy ")), BotDifficulty::Easy);
        assert_eq!(BotDifficulty::parse(Some("heuristic")), BotDifficulty::Normal);
        assert_eq!(BotDifficulty::parse(Some("expert")), BotDifficulty::Normal);
    }

    #[test]
    fn tier_urgency_tracks_round_value() {
        let hand = Hand::with_cards(vec![card("r_e1"), card("r_e2")]);
        let params = BotParams::default();
        let mut table = Table::new(Participant::AiLeft);
        table
            .place(Play::shown(Participant::AiLeft, vec![card("b_z1"), card("b_z2")]))
            .unwrap();

        let near = BotContext::new(
            Participant::Player,
            &hand,
            &table,
            4,
            BotDifficulty::Normal,
            &params,
        );
        assert!(near.tier_urgency());

        let far = BotContext { collected: 0, ..near };
        assert!(!far.tier_urgency());

        let empty = Table::new(Participant::Player);
        let opening = BotContext { table: &empty, ..near };
        assert!(opening.is_opening());
        assert!(!opening.tier_urgency());
    }
}
