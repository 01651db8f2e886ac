use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Spades = 2,
    Clubs = 3,
    /// Printed on the big joker.
    Star = 4,
    /// Printed on the small joker.
    HollowStar = 5,
}

impl Suit {
    pub const fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Clubs => '♣',
            Suit::Star => '★',
            Suit::HollowStar => '☆',
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Spades | Suit::Clubs => Color::Black,
            Suit::Star | Suit::HollowStar => Color::Neutral,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    /// Jokers carry no color.
    #[serde(rename = "none")]
    Neutral,
}

impl Color {
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
            Color::Neutral => "none",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Suit};

    #[test]
    fn display_returns_card_symbols() {
        assert_eq!(Suit::Hearts.to_string(), "♥");
        assert_eq!(Suit::HollowStar.to_string(), "☆");
    }

    #[test]
    fn jokers_have_no_color() {
        assert_eq!(Suit::Star.color(), Color::Neutral);
        assert_eq!(Suit::Diamonds.color(), Color::Red);
        assert_eq!(Suit::Clubs.color(), Color::Black);
    }

    #[test]
    fn neutral_serializes_as_none() {
        let json = serde_json::to_string(&Color::Neutral).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
