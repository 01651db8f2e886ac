use core::fmt;
use serde::{Deserialize, Serialize};

/// The printed figure of a card. Red and black copies share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CardName {
    /// 卒, the sevens.
    Zu = 0,
    /// 马, the eights.
    Ma = 1,
    /// 相, the nines.
    Xiang = 2,
    /// 尔, the tens.
    Er = 3,
    /// 曲, the court cards J/Q/K.
    Qu = 4,
    BigJoker = 5,
    SmallJoker = 6,
}

impl CardName {
    pub const ALL: [CardName; 7] = [
        CardName::Zu,
        CardName::Ma,
        CardName::Xiang,
        CardName::Er,
        CardName::Qu,
        CardName::BigJoker,
        CardName::SmallJoker,
    ];

    pub const fn glyph(self) -> &'static str {
        match self {
            CardName::Zu => "卒",
            CardName::Ma => "马",
            CardName::Xiang => "相",
            CardName::Er => "尔",
            CardName::Qu => "曲",
            CardName::BigJoker => "大王",
            CardName::SmallJoker => "小王",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|name| name.glyph() == glyph)
    }

    /// 尔 and 相 are the cards a dealt hand must contain at least one of.
    pub const fn is_xiang_family(self) -> bool {
        matches!(self, CardName::Er | CardName::Xiang)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}
