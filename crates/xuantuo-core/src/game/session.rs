use crate::game::error::ActionError;
use crate::game::kou_le::{KouLeNegotiation, KouLeResponse};
use crate::model::card::Card;
use crate::model::deck::{Deal, Deck};
use crate::model::hand::Hand;
use crate::model::legal::{self, Candidate};
use crate::model::play::{Play, PlayKind, evaluate};
use crate::model::player::Participant;
use crate::model::score::{CoinLedger, SettlementReport, settle};
use crate::model::table::Table;
use core::fmt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::array;
use tracing::{Level, event};

pub const AUTOMATON_NAME_POOL: [&str; 8] = [
    "王铁柱", "李翠花", "赵大壮", "孙木耳", "钱多多", "周公瑾", "吴二娃", "郑牛牛",
];

const DEFAULT_AUTOMATON_NAMES: [&str; 2] = ["AI 左", "AI 右"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Playing,
    RoundOver,
    KouLeDecision,
    Settlement,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Playing => "playing",
            Phase::RoundOver => "round_over",
            Phase::KouLeDecision => "kou_le_decision",
            Phase::Settlement => "settlement",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a collaborator can ask the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Deal,
    SubmitPlay {
        participant: Participant,
        cards: Vec<Card>,
        discard: bool,
    },
    DeclareKouLe {
        participant: Participant,
    },
    RespondKouLe {
        participant: Participant,
        response: KouLeResponse,
    },
    /// Leaves the round-over pause: next round, or settlement when the hands
    /// are exhausted.
    FinishRound,
    SettleAndRestart,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Deal => "deal",
            Action::SubmitPlay { .. } => "submit_play",
            Action::DeclareKouLe { .. } => "declare_kou_le",
            Action::RespondKouLe { .. } => "respond_kou_le",
            Action::FinishRound => "finish_round",
            Action::SettleAndRestart => "settle_and_restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dealt {
        starter: Participant,
        attempts: u32,
    },
    Played {
        participant: Participant,
        kind: PlayKind,
    },
    /// The play completed the table and the round was resolved on the spot.
    RoundWon {
        participant: Participant,
        kind: PlayKind,
        winner: Participant,
        cards_won: usize,
    },
    KouLeDeclared {
        initiator: Participant,
    },
    KouLeResponded {
        participant: Participant,
        response: KouLeResponse,
    },
    /// Everybody agreed; the hand went straight to settlement.
    KouLeAccepted,
    KouLeChallenged {
        challengers: Vec<Participant>,
    },
    NextRound {
        starter: Participant,
    },
    HandOver,
    Restarted,
}

/// State of one table of three, from dealing through settlement. Star-coin
/// balances survive across hands; everything else is reset per hand.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    turn: Participant,
    starter: Participant,
    hands: [Hand; 3],
    collected: [Vec<Card>; 3],
    table: Table,
    history: Vec<Table>,
    kou_le: Option<KouLeNegotiation>,
    challengers: Vec<Participant>,
    ledger: CoinLedger,
    automaton_names: [String; 2],
    settlement: Option<SettlementReport>,
    hands_dealt: u32,
    seed: u64,
    rng: StdRng,
}

/// Randomness consumed by one deal, drawn in a fixed order so a seed replays
/// exactly.
struct DrawnHand {
    deal: Deal,
    names: [String; 2],
    starter: Participant,
}

fn draw_hand(rng: &mut StdRng) -> DrawnHand {
    let deal = Deck::deal_valid(rng);
    let mut pool = AUTOMATON_NAME_POOL;
    pool.shuffle(rng);
    let starter = *Participant::LOOP
        .choose(rng)
        .unwrap_or(&Participant::Player);
    DrawnHand {
        deal,
        names: [pool[0].to_string(), pool[1].to_string()],
        starter,
    }
}

/// Pure transition: applies `action` to a copy of `state`.
pub fn transition(state: &Session, action: Action) -> Result<(Session, Outcome), ActionError> {
    let mut next = state.clone();
    let outcome = next.apply(action)?;
    Ok((next, outcome))
}

impl Session {
    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_seed_and_ledger(seed, CoinLedger::new())
    }

    pub fn with_seed_and_ledger(seed: u64, ledger: CoinLedger) -> Self {
        Self {
            phase: Phase::Waiting,
            turn: Participant::Player,
            starter: Participant::Player,
            hands: array::from_fn(|_| Hand::new()),
            collected: array::from_fn(|_| Vec::new()),
            table: Table::new(Participant::Player),
            history: Vec::new(),
            kou_le: None,
            challengers: Vec::new(),
            ledger,
            automaton_names: DEFAULT_AUTOMATON_NAMES.map(str::to_string),
            settlement: None,
            hands_dealt: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Rebuilds a waiting session positioned after `hands_dealt` deals of the
    /// seed's stream.
    pub fn resume(seed: u64, hands_dealt: u32, ledger: CoinLedger) -> Self {
        let mut session = Self::with_seed_and_ledger(seed, ledger);
        for _ in 0..hands_dealt {
            let _ = draw_hand(&mut session.rng);
        }
        session.hands_dealt = hands_dealt;
        session
    }

    /// Hand-built session for tests and tooling; skips the shuffle.
    pub fn from_hands(hands: [Hand; 3], starter: Participant, ledger: CoinLedger) -> Self {
        let mut session = Self::with_seed_and_ledger(0, ledger);
        session.hands = hands;
        session.start_hand(starter);
        session
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Participant {
        self.turn
    }

    pub fn starter(&self) -> Participant {
        self.starter
    }

    pub fn hand(&self, seat: Participant) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn collected(&self, seat: Participant) -> &[Card] {
        &self.collected[seat.index()]
    }

    pub fn collected_counts(&self) -> [usize; 3] {
        Participant::LOOP.map(|seat| self.collected[seat.index()].len())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Completed rounds of the current hand, oldest first.
    pub fn history(&self) -> &[Table] {
        &self.history
    }

    /// The round just resolved, while the session sits in `RoundOver`.
    pub fn last_round(&self) -> Option<&Table> {
        self.history.last()
    }

    pub fn kou_le(&self) -> Option<&KouLeNegotiation> {
        self.kou_le.as_ref()
    }

    pub fn challengers(&self) -> &[Participant] {
        &self.challengers
    }

    pub fn ledger(&self) -> &CoinLedger {
        &self.ledger
    }

    pub fn settlement(&self) -> Option<&SettlementReport> {
        self.settlement.as_ref()
    }

    pub fn hands_dealt(&self) -> u32 {
        self.hands_dealt
    }

    pub fn display_name(&self, seat: Participant) -> &str {
        match seat {
            Participant::Player => "您",
            Participant::AiLeft => &self.automaton_names[0],
            Participant::AiRight => &self.automaton_names[1],
        }
    }

    /// Cards in hands, on the table and in collected piles. Always the full
    /// deck once a hand has been dealt.
    pub fn cards_in_play(&self) -> usize {
        let in_hands: usize = self.hands.iter().map(Hand::len).sum();
        let collected: usize = self.collected.iter().map(Vec::len).sum();
        in_hands + collected + self.table.card_count()
    }

    /// What `seat` could legally place right now, assuming it is their turn.
    pub fn legal_options(&self, seat: Participant) -> Vec<Candidate> {
        legal::legal_options(
            self.hand(seat),
            self.table.target(),
            self.table.current_max(),
        )
    }

    /// False only when responding to a round that `seat` cannot beat.
    pub fn can_beat(&self, seat: Participant) -> bool {
        match self.table.target() {
            None => true,
            Some(target) => {
                legal::has_beating_option(self.hand(seat), target, self.table.current_max())
            }
        }
    }

    pub fn new_hand(&mut self) -> Result<Outcome, ActionError> {
        self.apply(Action::Deal)
    }

    pub fn submit_play(
        &mut self,
        participant: Participant,
        cards: Vec<Card>,
        discard: bool,
    ) -> Result<Outcome, ActionError> {
        self.apply(Action::SubmitPlay {
            participant,
            cards,
            discard,
        })
    }

    pub fn declare_kou_le(&mut self, participant: Participant) -> Result<Outcome, ActionError> {
        self.apply(Action::DeclareKouLe { participant })
    }

    pub fn respond_kou_le(
        &mut self,
        participant: Participant,
        response: KouLeResponse,
    ) -> Result<Outcome, ActionError> {
        self.apply(Action::RespondKouLe {
            participant,
            response,
        })
    }

    pub fn finish_round(&mut self) -> Result<Outcome, ActionError> {
        self.apply(Action::FinishRound)
    }

    pub fn settle_and_restart(&mut self) -> Result<Outcome, ActionError> {
        self.apply(Action::SettleAndRestart)
    }

    /// Validates `action` completely before touching any state.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, ActionError> {
        let name = action.name();
        match action {
            Action::Deal => {
                self.require_phase(Phase::Waiting, name)?;
                Ok(self.deal())
            }
            Action::SubmitPlay {
                participant,
                cards,
                discard,
            } => {
                self.require_phase(Phase::Playing, name)?;
                self.require_turn(participant)?;
                let play = self.validate_play(participant, cards, discard)?;
                self.place(play)
            }
            Action::DeclareKouLe { participant } => {
                self.require_phase(Phase::Playing, name)?;
                self.require_turn(participant)?;
                if !self.table.is_empty() {
                    return Err(ActionError::TableNotEmpty);
                }
                self.kou_le = Some(KouLeNegotiation::new(participant));
                self.phase = Phase::KouLeDecision;
                event!(
                    target: "xuantuo_core::session",
                    Level::INFO,
                    initiator = %participant,
                    "Kou Le declared"
                );
                Ok(Outcome::KouLeDeclared {
                    initiator: participant,
                })
            }
            Action::RespondKouLe {
                participant,
                response,
            } => {
                self.require_phase(Phase::KouLeDecision, name)?;
                self.respond(participant, response)
            }
            Action::FinishRound => {
                self.require_phase(Phase::RoundOver, name)?;
                Ok(self.finish())
            }
            Action::SettleAndRestart => {
                self.require_phase(Phase::Settlement, name)?;
                self.reset_hand_state();
                self.phase = Phase::Waiting;
                Ok(Outcome::Restarted)
            }
        }
    }

    fn require_phase(&self, expected: Phase, action: &'static str) -> Result<(), ActionError> {
        if self.phase != expected {
            return Err(ActionError::PhaseViolation {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn require_turn(&self, participant: Participant) -> Result<(), ActionError> {
        if self.turn != participant {
            return Err(ActionError::OutOfTurn {
                expected: self.turn,
                actual: participant,
            });
        }
        Ok(())
    }

    fn validate_play(
        &self,
        participant: Participant,
        cards: Vec<Card>,
        discard: bool,
    ) -> Result<Play, ActionError> {
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return Err(ActionError::DuplicateCard(*card));
            }
        }
        let hand = self.hand(participant);
        if let Some(missing) = hand.first_missing(&cards) {
            return Err(ActionError::CardNotInHand(missing));
        }

        let Some(target) = self.table.target() else {
            if discard {
                return Err(ActionError::CannotDiscardOpening);
            }
            if evaluate(&cards).is_discard() {
                return Err(ActionError::IllegalCombination { count: cards.len() });
            }
            return Ok(Play::shown(participant, cards));
        };

        if cards.len() != target.card_count() {
            return Err(ActionError::InvalidCardCount {
                expected: target.card_count(),
                actual: cards.len(),
            });
        }

        let current_max = self.table.current_max();
        let beat_available = legal::has_beating_option(hand, target, current_max);
        if discard {
            if beat_available {
                return Err(ActionError::MustBeat);
            }
            return Ok(Play::discard(participant, cards));
        }

        if !beat_available {
            return Err(ActionError::ForcedDiscardRequired {
                required_above: current_max,
            });
        }

        let eval = evaluate(&cards);
        if eval.kind != target.kind {
            return Err(ActionError::IllegalCombination { count: cards.len() });
        }
        if eval.strength <= current_max {
            return Err(ActionError::InsufficientStrength {
                required_above: current_max,
                actual: eval.strength,
            });
        }
        Ok(Play::shown(participant, cards))
    }

    fn place(&mut self, play: Play) -> Result<Outcome, ActionError> {
        let participant = play.participant;
        let kind = play.kind;
        let cards = play.cards.clone();
        self.table.place(play)?;
        self.hands[participant.index()].remove_all(&cards);
        self.turn = participant.next();

        if !self.table.is_complete() {
            return Ok(Outcome::Played { participant, kind });
        }

        let Some(winner) = self.table.winner() else {
            return Ok(Outcome::Played { participant, kind });
        };
        let finished = std::mem::replace(&mut self.table, Table::new(winner));
        let won = finished.cards();
        let cards_won = won.len();
        self.collected[winner.index()].extend(won);
        self.history.push(finished);
        self.phase = Phase::RoundOver;

        event!(
            target: "xuantuo_core::session",
            Level::DEBUG,
            winner = %winner,
            cards_won,
            collected = self.collected[winner.index()].len(),
            round = self.history.len(),
            "round resolved"
        );

        Ok(Outcome::RoundWon {
            participant,
            kind,
            winner,
            cards_won,
        })
    }

    fn respond(
        &mut self,
        participant: Participant,
        response: KouLeResponse,
    ) -> Result<Outcome, ActionError> {
        let mut negotiation = match self.kou_le.clone() {
            Some(negotiation) => negotiation,
            None => {
                return Err(ActionError::PhaseViolation {
                    action: "respond_kou_le",
                    phase: self.phase,
                });
            }
        };
        negotiation.record(participant, response)?;

        event!(
            target: "xuantuo_core::session",
            Level::INFO,
            participant = %participant,
            response = %response,
            "Kou Le answered"
        );

        if !negotiation.is_complete() {
            self.kou_le = Some(negotiation);
            return Ok(Outcome::KouLeResponded {
                participant,
                response,
            });
        }

        self.kou_le = None;
        let challengers = negotiation.challengers();
        if challengers.is_empty() {
            self.enter_settlement();
            return Ok(Outcome::KouLeAccepted);
        }

        for seat in &challengers {
            if !self.challengers.contains(seat) {
                self.challengers.push(*seat);
            }
        }
        self.phase = Phase::Playing;
        Ok(Outcome::KouLeChallenged { challengers })
    }

    fn finish(&mut self) -> Outcome {
        if self.hands.iter().all(Hand::is_empty) {
            self.enter_settlement();
            return Outcome::HandOver;
        }
        let starter = self.table.starter();
        self.starter = starter;
        self.turn = starter;
        self.phase = Phase::Playing;
        Outcome::NextRound { starter }
    }

    fn deal(&mut self) -> Outcome {
        let DrawnHand {
            deal,
            names,
            starter,
        } = draw_hand(&mut self.rng);
        self.hands_dealt += 1;
        self.hands = deal.hands;
        self.automaton_names = names;
        self.start_hand(starter);

        event!(
            target: "xuantuo_core::session",
            Level::INFO,
            hand = self.hands_dealt,
            starter = %starter,
            attempts = deal.attempts,
            repaired = deal.repaired,
            "hand dealt"
        );

        Outcome::Dealt {
            starter,
            attempts: deal.attempts,
        }
    }

    fn start_hand(&mut self, starter: Participant) {
        self.collected = array::from_fn(|_| Vec::new());
        self.table = Table::new(starter);
        self.history.clear();
        self.kou_le = None;
        self.challengers.clear();
        self.settlement = None;
        self.starter = starter;
        self.turn = starter;
        self.phase = Phase::Playing;
    }

    fn enter_settlement(&mut self) {
        let report = settle(self.collected_counts(), &self.challengers);
        self.ledger.apply(&report);

        if tracing::enabled!(Level::INFO) {
            let nets = report
                .lines
                .iter()
                .map(|line| format!("{}:{}({:+})", line.participant, line.tier, line.net))
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "xuantuo_core::session",
                Level::INFO,
                hand = self.hands_dealt,
                rounds = self.history.len(),
                challengers = self.challengers.len(),
                nets = %nets,
                "hand settled"
            );
        }

        self.settlement = Some(report);
        self.phase = Phase::Settlement;
    }

    fn reset_hand_state(&mut self) {
        self.hands = array::from_fn(|_| Hand::new());
        self.collected = array::from_fn(|_| Vec::new());
        self.table = Table::new(self.starter);
        self.history.clear();
        self.kou_le = None;
        self.challengers.clear();
        self.settlement = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
