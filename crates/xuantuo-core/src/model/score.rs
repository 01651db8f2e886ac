use crate::model::player::Participant;
use crate::model::reward::RewardTier;
use serde::{Deserialize, Serialize};

pub const STARTING_COINS: i64 = 100;

/// Star-coin balances, carried from hand to hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinLedger {
    balances: [i64; 3],
}

impl CoinLedger {
    pub const fn new() -> Self {
        Self {
            balances: [STARTING_COINS; 3],
        }
    }

    pub fn balance(&self, seat: Participant) -> i64 {
        self.balances[seat.index()]
    }

    pub fn standings(&self) -> &[i64; 3] {
        &self.balances
    }

    pub fn set_balances(&mut self, balances: [i64; 3]) {
        self.balances = balances;
    }

    pub fn apply(&mut self, report: &SettlementReport) {
        for line in &report.lines {
            self.balances[line.participant.index()] += line.net;
        }
    }
}

impl Default for CoinLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Participant,
    pub to: Participant,
    pub coins: i64,
    /// The payer challenged a Kou Le and still finished without a reward.
    pub doubled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLine {
    pub participant: Participant,
    pub collected: usize,
    pub tier: RewardTier,
    pub net: i64,
    pub challenge_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub lines: [SettlementLine; 3],
    pub transfers: Vec<Transfer>,
}

impl SettlementReport {
    pub fn line(&self, seat: Participant) -> &SettlementLine {
        &self.lines[seat.index()]
    }

    pub fn net(&self, seat: Participant) -> i64 {
        self.line(seat).net
    }
}

/// All-pairs settlement: every participant without a reward pays every
/// rewarded participant that participant's tier value, twice over if the
/// payer challenged a Kou Le this hand.
pub fn settle(collected: [usize; 3], challengers: &[Participant]) -> SettlementReport {
    let mut lines = Participant::LOOP.map(|participant| {
        let count = collected[participant.index()];
        SettlementLine {
            participant,
            collected: count,
            tier: RewardTier::for_collected(count),
            net: 0,
            challenge_failed: false,
        }
    });

    let mut transfers = Vec::new();
    for loser in Participant::LOOP {
        if lines[loser.index()].tier.is_winning() {
            continue;
        }
        let doubled = challengers.contains(&loser);
        for winner in Participant::LOOP {
            let tier = lines[winner.index()].tier;
            if !tier.is_winning() {
                continue;
            }
            let base = tier.coins() as i64;
            let coins = if doubled { base * 2 } else { base };
            lines[loser.index()].net -= coins;
            lines[winner.index()].net += coins;
            if doubled {
                lines[loser.index()].challenge_failed = true;
            }
            transfers.push(Transfer {
                from: loser,
                to: winner,
                coins,
                doubled,
            });
        }
    }

    SettlementReport { lines, transfers }
}
