use crate::game::session::Phase;
use crate::model::card::Card;
use crate::model::player::Participant;
use crate::model::table::TableError;
use thiserror::Error;

/// Reasons an action is rejected. A rejected action never changes the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is not allowed during {phase}")]
    PhaseViolation { action: &'static str, phase: Phase },
    #[error("expected {expected} to act but got {actual}")]
    OutOfTurn {
        expected: Participant,
        actual: Participant,
    },
    #[error("{0} is not in the participant's hand")]
    CardNotInHand(Card),
    #[error("{0} was selected more than once")]
    DuplicateCard(Card),
    #[error("expected {expected} card(s) but {actual} were selected")]
    InvalidCardCount { expected: usize, actual: usize },
    #[error("{count} selected card(s) do not form a legal single, pair or triple")]
    IllegalCombination { count: usize },
    #[error("strength {actual} does not beat {required_above}")]
    InsufficientStrength { required_above: i16, actual: i16 },
    #[error("nothing in hand beats {required_above}; the cards must be discarded face down")]
    ForcedDiscardRequired { required_above: i16 },
    #[error("a beating play is available; discarding is not allowed")]
    MustBeat,
    #[error("the opening play of a round cannot be a discard")]
    CannotDiscardOpening,
    #[error("Kou Le can only be declared before the round is opened")]
    TableNotEmpty,
    #[error("{0} has already answered the Kou Le")]
    AlreadyResponded(Participant),
    #[error("{0} declared the Kou Le and cannot answer it")]
    InitiatorCannotRespond(Participant),
    #[error(transparent)]
    Table(#[from] TableError),
}
