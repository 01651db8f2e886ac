use core::fmt;
use serde::{Deserialize, Serialize};

/// The three seats at the table. Only `Player` is driven by a person in the
/// stock setup; the other two are automatons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Participant {
    Player = 0,
    AiLeft = 1,
    AiRight = 2,
}

impl Participant {
    pub const LOOP: [Participant; 3] = [
        Participant::Player,
        Participant::AiLeft,
        Participant::AiRight,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Participant::Player),
            1 => Some(Participant::AiLeft),
            2 => Some(Participant::AiRight),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fixed rotation AiLeft → Player → AiRight → AiLeft, regardless of who
    /// opened the round.
    pub const fn next(self) -> Participant {
        match self {
            Participant::AiLeft => Participant::Player,
            Participant::Player => Participant::AiRight,
            Participant::AiRight => Participant::AiLeft,
        }
    }

    pub const fn previous(self) -> Participant {
        match self {
            Participant::Player => Participant::AiLeft,
            Participant::AiRight => Participant::Player,
            Participant::AiLeft => Participant::AiRight,
        }
    }

    pub fn others(self) -> impl Iterator<Item = Participant> {
        Self::LOOP.into_iter().filter(move |seat| *seat != self)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Participant::Player => "Player",
            Participant::AiLeft => "AiLeft",
            Participant::AiRight => "AiRight",
        };
        f.write_str(label)
    }
}
