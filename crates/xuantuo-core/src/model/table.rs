use crate::model::card::Card;
use crate::model::play::{DISCARD_STRENGTH, Play};
use crate::model::player::Participant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plays of the current round, in the order they were placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    starter: Participant,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    RoundComplete,
    OutOfTurn {
        expected: Participant,
        actual: Participant,
    },
    AlreadyPlayed(Participant),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::RoundComplete => write!(f, "round already complete"),
            TableError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            TableError::AlreadyPlayed(participant) => {
                write!(f, "{participant} has already played this round")
            }
        }
    }
}

impl std::error::Error for TableError {}

impl Table {
    pub const SEATS: usize = 3;

    pub fn new(starter: Participant) -> Self {
        Self {
            starter,
            plays: Vec::with_capacity(Self::SEATS),
        }
    }

    pub fn starter(&self) -> Participant {
        self.starter
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == Self::SEATS
    }

    /// The opening play every response must match in kind and count.
    pub fn target(&self) -> Option<&Play> {
        self.plays.first()
    }

    /// Strongest strength placed so far, or the discard value when empty.
    pub fn current_max(&self) -> i16 {
        self.plays
            .iter()
            .map(|play| play.strength)
            .max()
            .unwrap_or(DISCARD_STRENGTH)
    }

    pub fn expected_participant(&self) -> Participant {
        self.plays
            .last()
            .map(|play| play.participant.next())
            .unwrap_or(self.starter)
    }

    pub fn place(&mut self, play: Play) -> Result<(), TableError> {
        if self.is_complete() {
            return Err(TableError::RoundComplete);
        }

        if self
            .plays
            .iter()
            .any(|placed| placed.participant == play.participant)
        {
            return Err(TableError::AlreadyPlayed(play.participant));
        }

        let expected = self.expected_participant();
        if expected != play.participant {
            return Err(TableError::OutOfTurn {
                expected,
                actual: play.participant,
            });
        }

        self.plays.push(play);
        Ok(())
    }

    /// First play holding the maximum strength. Only defined once all three
    /// participants have played.
    pub fn winner(&self) -> Option<Participant> {
        if !self.is_complete() {
            return None;
        }
        let mut best: Option<&Play> = None;
        for play in &self.plays {
            if best.is_none_or(|current| play.strength > current.strength) {
                best = Some(play);
            }
        }
        best.map(|play| play.participant)
    }

    /// Every card on the table, face-down discards included.
    pub fn cards(&self) -> Vec<Card> {
        self.plays
            .iter()
            .flat_map(|play| play.cards.iter().copied())
            .collect()
    }

    pub fn card_count(&self) -> usize {
        self.plays.iter().map(Play::card_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Table, TableError};
    use crate::model::card::Card;
    use crate::model::play::Play;
    use crate::model::player::Participant;

    fn card(id: &str) -> Card {
        Card::from_id(id).unwrap()
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut table = Table::new(Participant::AiLeft);
        table
            .place(Play::shown(Participant::AiLeft, vec![card("r_z1")]))
            .unwrap();
        assert!(matches!(
            table.place(Play::shown(Participant::AiRight, vec![card("r_m1")])),
            Err(TableError::OutOfTurn {
                expected: Participant::Player,
                ..
            })
        ));
    }

    #[test]
    fn winner_is_strongest_play_and_collects_discards() {
        let mut table = Table::new(Participant::Player);
        table
            .place(Play::shown(Participant::Player, vec![card("r_m1")]))
            .unwrap();
        table
            .place(Play::shown(Participant::AiRight, vec![card("r_e1")]))
            .unwrap();
        table
            .place(Play::discard(Participant::AiLeft, vec![card("b_q1")]))
            .unwrap();

        assert!(table.is_complete());
        assert_eq!(table.winner(), Some(Participant::AiRight));
        assert_eq!(table.card_count(), 3);
        assert_eq!(table.current_max(), 24);
        assert_eq!(table.expected_participant(), Participant::Player);
    }

    #[test]
    fn incomplete_round_has_no_winner() {
        let mut table = Table::new(Participant::AiRight);
        assert_eq!(table.current_max(), -1);
        table
            .place(Play::shown(Participant::AiRight, vec![card("bj")]))
            .unwrap();
        assert_eq!(table.winner(), None);
        assert_eq!(table.target().map(|p| p.strength), Some(16));
    }

    #[test]
    fn complete_round_rejects_more_plays() {
        let mut table = Table::new(Participant::AiLeft);
        for (seat, id) in [
            (Participant::AiLeft, "b_z1"),
            (Participant::Player, "b_m1"),
            (Participant::AiRight, "b_x1"),
        ] {
            table.place(Play::shown(seat, vec![card(id)])).unwrap();
        }
        assert_eq!(
            table.place(Play::shown(Participant::AiLeft, vec![card("b_e1")])),
            Err(TableError::RoundComplete)
        );
    }
}
