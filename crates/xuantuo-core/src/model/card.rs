use crate::model::name::CardName;
use crate::model::suit::{Color, Suit};
use core::fmt;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

struct CardSpec {
    id: &'static str,
    name: CardName,
    suit: Suit,
    face: &'static str,
    strength: u8,
}

const fn spec(
    id: &'static str,
    name: CardName,
    suit: Suit,
    face: &'static str,
    strength: u8,
) -> CardSpec {
    CardSpec {
        id,
        name,
        suit,
        face,
        strength,
    }
}

static TABLE: [CardSpec; Card::COUNT] = [
    spec("r_z1", CardName::Zu, Suit::Hearts, "7", 18),
    spec("r_z2", CardName::Zu, Suit::Diamonds, "7", 18),
    spec("b_z1", CardName::Zu, Suit::Spades, "7", 17),
    spec("b_z2", CardName::Zu, Suit::Clubs, "7", 17),
    spec("r_m1", CardName::Ma, Suit::Hearts, "8", 20),
    spec("r_m2", CardName::Ma, Suit::Diamonds, "8", 20),
    spec("b_m1", CardName::Ma, Suit::Spades, "8", 19),
    spec("b_m2", CardName::Ma, Suit::Clubs, "8", 19),
    spec("r_x1", CardName::Xiang, Suit::Hearts, "9", 22),
    spec("r_x2", CardName::Xiang, Suit::Diamonds, "9", 22),
    spec("b_x1", CardName::Xiang, Suit::Spades, "9", 21),
    spec("b_x2", CardName::Xiang, Suit::Clubs, "9", 21),
    spec("r_e1", CardName::Er, Suit::Hearts, "10", 24),
    spec("r_e2", CardName::Er, Suit::Diamonds, "10", 24),
    spec("b_e1", CardName::Er, Suit::Spades, "10", 23),
    spec("b_e2", CardName::Er, Suit::Clubs, "10", 23),
    spec("bj", CardName::BigJoker, Suit::Star, "RJ", 16),
    spec("r_q1", CardName::Qu, Suit::Hearts, "J", 16),
    spec("r_q2", CardName::Qu, Suit::Hearts, "Q", 16),
    spec("r_q3", CardName::Qu, Suit::Hearts, "K", 16),
    spec("sj", CardName::SmallJoker, Suit::HollowStar, "SJ", 14),
    spec("b_q1", CardName::Qu, Suit::Spades, "J", 14),
    spec("b_q2", CardName::Qu, Suit::Spades, "Q", 14),
    spec("b_q3", CardName::Qu, Suit::Spades, "K", 14),
];

/// Handle to one of the 24 physical cards. Equality is identity: the two red
/// 尔 cards compare unequal even though they play identically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    pub const COUNT: usize = 24;

    pub fn all() -> impl Iterator<Item = Card> {
        (0..Self::COUNT as u8).map(Card)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        TABLE
            .iter()
            .position(|spec| spec.id == id)
            .map(|index| Card(index as u8))
    }

    fn spec(self) -> &'static CardSpec {
        &TABLE[self.0 as usize]
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    pub fn name(self) -> CardName {
        self.spec().name
    }

    pub fn suit(self) -> Suit {
        self.spec().suit
    }

    pub fn color(self) -> Color {
        self.spec().suit.color()
    }

    /// Face label printed in the corner (`7`, `10`, `K`, `RJ`, ...).
    pub fn face(self) -> &'static str {
        self.spec().face
    }

    pub fn strength(self) -> u8 {
        self.spec().strength
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.suit(), self.face(), self.name())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Card::from_id(&id).ok_or_else(|| de::Error::custom(format!("unknown card id '{id}'")))
    }
}
