use super::{BotContext, BotDifficulty};
use xuantuo_core::game::session::Action;
use xuantuo_core::model::card::Card;
use xuantuo_core::model::legal::{self, Candidate};
use xuantuo_core::model::play::PlayKind;
use xuantuo_core::model::player::Participant;
use xuantuo_core::model::reward::RewardTier;

/// Cards an automaton puts on the table, and whether face down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayDecision {
    pub cards: Vec<Card>,
    pub discard: bool,
    pub reason: &'static str,
}

impl PlayDecision {
    fn shown(candidate: &Candidate, reason: &'static str) -> Self {
        Self {
            cards: candidate.cards.clone(),
            discard: false,
            reason,
        }
    }

    pub fn into_action(self, participant: Participant) -> Action {
        Action::SubmitPlay {
            participant,
            cards: self.cards,
            discard: self.discard,
        }
    }
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// `None` only when the hand is empty.
    pub fn choose(ctx: &BotContext<'_>) -> Option<PlayDecision> {
        if ctx.hand.is_empty() {
            return None;
        }

        let current_max = ctx.table.current_max();
        let options = legal::legal_options(ctx.hand, ctx.target(), current_max);

        if let Some(target) = ctx.target() {
            if options.is_empty() {
                let count = target.card_count();
                if ctx.hand.len() < count {
                    return None;
                }
                return Some(PlayDecision {
                    cards: ctx.hand.weakest(count),
                    discard: true,
                    reason: "forced_discard",
                });
            }
            return weakest(&options).map(|option| PlayDecision::shown(option, "weakest_beat"));
        }

        if ctx.difficulty == BotDifficulty::Easy {
            return weakest(&options).map(|option| PlayDecision::shown(option, "easy_weakest"));
        }

        Self::choose_opening(ctx, &options)
    }

    fn choose_opening(ctx: &BotContext<'_>, options: &[Candidate]) -> Option<PlayDecision> {
        let params = ctx.params;
        let needed = RewardTier::GANG_GOU_THRESHOLD.saturating_sub(ctx.collected);

        if needed > params.triple_push_margin {
            if let Some(triple) = options.iter().find(|o| o.kind() == PlayKind::Triple) {
                return Some(PlayDecision::shown(triple, "triple_push"));
            }
        }

        let strong_pair = strongest(
            options
                .iter()
                .filter(|o| o.kind() == PlayKind::Pair && o.strength() >= params.strong_pair_threshold),
        );
        if let Some(pair) = strong_pair {
            return Some(PlayDecision::shown(pair, "strong_pair"));
        }

        if ctx.collected >= params.shed_singles_from {
            let single = weakest_of(options.iter().filter(|o| o.kind() == PlayKind::Single));
            if let Some(single) = single {
                return Some(PlayDecision::shown(single, "shed_single"));
            }
        }

        if let Some(pair) = options.iter().find(|o| o.kind() == PlayKind::Pair) {
            return Some(PlayDecision::shown(pair, "first_pair"));
        }

        weakest(options).map(|option| PlayDecision::shown(option, "weakest_option"))
    }
}

/// First option with the lowest evaluated strength.
fn weakest(options: &[Candidate]) -> Option<&Candidate> {
    weakest_of(options.iter())
}

fn weakest_of<'a>(options: impl Iterator<Item = &'a Candidate>) -> Option<&'a Candidate> {
    options.min_by_key(|option| option.strength())
}

/// First option with the highest evaluated strength.
fn strongest<'a>(options: impl Iterator<Item = &'a Candidate>) -> Option<&'a Candidate> {
    let mut best: Option<&Candidate> = None;
    for option in options {
        if best.is_none_or(|current| option.strength() > current.strength()) {
            best = Some(option);
        }
    }
    best
}
