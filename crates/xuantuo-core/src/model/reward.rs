use core::fmt;
use serde::{Deserialize, Serialize};

/// Reward tier reached by the size of a participant's collected pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    /// Fewer than 9 cards: pays every winner.
    BuGou,
    /// 9 to 14 cards.
    GangGou,
    /// 15 to 17 cards.
    WuLe,
    /// 18 cards or more.
    CiLe,
}

impl RewardTier {
    pub const GANG_GOU_THRESHOLD: usize = 9;
    pub const WU_LE_THRESHOLD: usize = 15;
    pub const CI_LE_THRESHOLD: usize = 18;

    pub const fn for_collected(count: usize) -> Self {
        if count >= Self::CI_LE_THRESHOLD {
            RewardTier::CiLe
        } else if count >= Self::WU_LE_THRESHOLD {
            RewardTier::WuLe
        } else if count >= Self::GANG_GOU_THRESHOLD {
            RewardTier::GangGou
        } else {
            RewardTier::BuGou
        }
    }

    pub const fn coins(self) -> u32 {
        match self {
            RewardTier::CiLe => 3,
            RewardTier::WuLe => 2,
            RewardTier::GangGou => 1,
            RewardTier::BuGou => 0,
        }
    }

    pub const fn is_winning(self) -> bool {
        self.coins() > 0
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RewardTier::CiLe => "ci_le",
            RewardTier::WuLe => "wu_le",
            RewardTier::GangGou => "gang_gou",
            RewardTier::BuGou => "bu_gou",
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether taking `cards_at_stake` more cards would lift `collected` over the
/// 9 or 15 card boundary.
pub const fn crosses_tier(collected: usize, cards_at_stake: usize) -> bool {
    let potential = collected + cards_at_stake;
    (collected < RewardTier::GANG_GOU_THRESHOLD && potential >= RewardTier::GANG_GOU_THRESHOLD)
        || (collected < RewardTier::WU_LE_THRESHOLD && potential >= RewardTier::WU_LE_THRESHOLD)
}
