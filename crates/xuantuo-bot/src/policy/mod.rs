mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::PlayDecision;
use xuantuo_core::game::kou_le::KouLeResponse;
use xuantuo_core::game::session::Session;
use xuantuo_core::model::hand::Hand;
use xuantuo_core::model::player::Participant;
use xuantuo_core::model::table::Table;

/// Context provided to policies for decision-making
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub seat: Participant,
    pub hand: &'a Hand,
    pub table: &'a Table,
    pub collected: usize,
}

impl<'a> PolicyContext<'a> {
    pub fn from_session(session: &'a Session, seat: Participant) -> Self {
        Self {
            seat,
            hand: session.hand(seat),
            table: session.table(),
            collected: session.collected(seat).len(),
        }
    }
}

/// Decision interface for automaton seats
pub trait Policy: Send {
    /// Cards to place on the table. `None` only when the hand is empty.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<PlayDecision>;

    /// Answer to a Kou Le declared by another seat.
    fn respond_kou_le(&mut self, ctx: &PolicyContext) -> KouLeResponse;

    /// Whether to declare Kou Le instead of opening the round.
    fn wants_kou_le(&mut self, _ctx: &PolicyContext) -> bool {
        false
    }
}
