use super::session::{Phase, Session};
use crate::model::player::Participant;
use crate::model::score::CoinLedger;
use crate::model::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub hands_dealt: u32,
    pub phase: Phase,
    pub turn: Participant,
    pub starter: Participant,
    pub balances: [i64; 3],
    #[serde(default)]
    pub challengers: Vec<Participant>,
    pub collected: [usize; 3],
    pub table: Table,
}

impl SessionSnapshot {
    pub fn capture(state: &Session) -> Self {
        SessionSnapshot {
            seed: state.seed(),
            hands_dealt: state.hands_dealt(),
            phase: state.phase(),
            turn: state.turn(),
            starter: state.starter(),
            balances: *state.ledger().standings(),
            challengers: state.challengers().to_vec(),
            collected: state.collected_counts(),
            table: state.table().clone(),
        }
    }

    /// Waiting session at the same point of the seed stream, with the
    /// captured balances. A hand in progress is not restored.
    pub fn restore(self) -> Session {
        let mut ledger = CoinLedger::new();
        ledger.set_balances(self.balances);
        Session::resume(self.seed, self.hands_dealt, ledger)
    }

    pub fn to_json(state: &Session) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
