use crate::model::card::Card;
use crate::model::name::CardName;
use crate::model::player::Participant;
use crate::model::suit::Color;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Strength of the two unbeatable pairs: both jokers, or both red 尔.
pub const TOP_PAIR_STRENGTH: i16 = 125;
const PAIR_BONUS: i16 = 100;
const TRIPLE_BONUS: i16 = 200;
pub const DISCARD_STRENGTH: i16 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayKind {
    Discard,
    Single,
    Pair,
    Triple,
}

impl PlayKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayKind::Discard => "discard",
            PlayKind::Single => "single",
            PlayKind::Pair => "pair",
            PlayKind::Triple => "triple",
        }
    }
}

impl fmt::Display for PlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub kind: PlayKind,
    pub strength: i16,
}

impl Evaluation {
    pub const DISCARD: Evaluation = Evaluation {
        kind: PlayKind::Discard,
        strength: DISCARD_STRENGTH,
    };

    const fn new(kind: PlayKind, strength: i16) -> Self {
        Self { kind, strength }
    }

    pub const fn is_discard(self) -> bool {
        matches!(self.kind, PlayKind::Discard)
    }
}

/// Classifies a selection of cards. Anything that is not a single, a legal
/// pair or a legal triple evaluates as a discard.
pub fn evaluate(cards: &[Card]) -> Evaluation {
    match cards {
        [card] => Evaluation::new(PlayKind::Single, card.strength() as i16),
        [a, b] => evaluate_pair(*a, *b),
        [a, b, c] => evaluate_triple(*a, *b, *c),
        _ => Evaluation::DISCARD,
    }
}

fn evaluate_pair(a: Card, b: Card) -> Evaluation {
    let jokers = matches!(
        (a.name(), b.name()),
        (CardName::BigJoker, CardName::SmallJoker) | (CardName::SmallJoker, CardName::BigJoker)
    );
    let red_er = a.name() == CardName::Er
        && b.name() == CardName::Er
        && a.color() == Color::Red
        && b.color() == Color::Red;
    if jokers || red_er {
        return Evaluation::new(PlayKind::Pair, TOP_PAIR_STRENGTH);
    }

    // Jokers share Color::Neutral but differ in name, so they never reach here
    // as a matched pair.
    if a.name() == b.name() && a.color() == b.color() {
        let top = a.strength().max(b.strength()) as i16;
        return Evaluation::new(PlayKind::Pair, top + PAIR_BONUS);
    }

    Evaluation::DISCARD
}

fn evaluate_triple(a: Card, b: Card, c: Card) -> Evaluation {
    let cards = [a, b, c];
    let all_qu = cards.iter().all(|card| card.name() == CardName::Qu);
    let one_color = cards.iter().all(|card| card.color() == a.color());
    if all_qu && one_color {
        let top = cards.iter().map(|card| card.strength()).max().unwrap_or(0) as i16;
        return Evaluation::new(PlayKind::Triple, top + TRIPLE_BONUS);
    }
    Evaluation::DISCARD
}

/// A set of cards placed on the table by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub participant: Participant,
    pub cards: Vec<Card>,
    pub kind: PlayKind,
    pub strength: i16,
}

impl Play {
    /// A face-up play; its kind and strength come from the evaluator.
    pub fn shown(participant: Participant, cards: Vec<Card>) -> Self {
        let Evaluation { kind, strength } = evaluate(&cards);
        Self {
            participant,
            cards,
            kind,
            strength,
        }
    }

    /// A face-down forfeit. Whatever the cards are, it cannot win the round.
    pub fn discard(participant: Participant, cards: Vec<Card>) -> Self {
        Self {
            participant,
            cards,
            kind: PlayKind::Discard,
            strength: DISCARD_STRENGTH,
        }
    }

    pub fn is_discard(&self) -> bool {
        self.kind == PlayKind::Discard
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_discard() {
            return write!(f, "{} discards {} card(s)", self.participant, self.cards.len());
        }
        write!(f, "{} plays {} [", self.participant, self.kind)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "] ({})", self.strength)
    }
}
