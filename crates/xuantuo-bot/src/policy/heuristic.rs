use super::{Policy, PolicyContext};
use crate::bot::{BotContext, BotDifficulty, BotParams, KouLePlanner, PlayDecision, PlayPlanner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};
use xuantuo_core::game::kou_le::KouLeResponse;

/// Adapter that wraps PlayPlanner/KouLePlanner to implement the Policy trait
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    params: BotParams,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty, params: BotParams, seed: u64) -> Self {
        Self {
            difficulty,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn easy(seed: u64) -> Self {
        Self::new(BotDifficulty::Easy, BotParams::default(), seed)
    }

    pub fn normal(seed: u64) -> Self {
        Self::new(BotDifficulty::Normal, BotParams::default(), seed)
    }

    /// Difficulty and parameters taken from `XTT_*` environment variables.
    pub fn from_env(seed: u64) -> Self {
        Self::new(BotDifficulty::from_env(), BotParams::from_env(), seed)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    fn bot_context<'a>(&'a self, ctx: &PolicyContext<'a>) -> BotContext<'a> {
        BotContext::new(
            ctx.seat,
            ctx.hand,
            ctx.table,
            ctx.collected,
            self.difficulty,
            &self.params,
        )
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<PlayDecision> {
        let bot_ctx = self.bot_context(ctx);
        let decision = PlayPlanner::choose(&bot_ctx)?;
        log_play_decision(ctx, self.difficulty, bot_ctx.tier_urgency(), &decision);
        Some(decision)
    }

    fn respond_kou_le(&mut self, ctx: &PolicyContext) -> KouLeResponse {
        let response = KouLePlanner::respond(&self.bot_context(ctx));
        event!(
            target: "xuantuo_bot::kou_le",
            Level::INFO,
            seat = %ctx.seat,
            difficulty = self.difficulty.as_str(),
            collected = ctx.collected,
            hand_size = ctx.hand.len(),
            response = %response,
        );
        response
    }

    fn wants_kou_le(&mut self, ctx: &PolicyContext) -> bool {
        let bot_ctx = BotContext::new(
            ctx.seat,
            ctx.hand,
            ctx.table,
            ctx.collected,
            self.difficulty,
            &self.params,
        );
        let declare = KouLePlanner::should_declare(&bot_ctx, &mut self.rng);
        if declare {
            event!(
                target: "xuantuo_bot::kou_le",
                Level::INFO,
                seat = %ctx.seat,
                chance = self.params.kou_le_chance,
                collected = ctx.collected,
                "declaring Kou Le"
            );
        }
        declare
    }
}

fn log_play_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    tier_urgency: bool,
    decision: &PlayDecision,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let cards = decision
        .cards
        .iter()
        .map(|card| format!("{:?}", card))
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "xuantuo_bot::play",
        Level::INFO,
        seat = %ctx.seat,
        difficulty = difficulty.as_str(),
        hand_size = ctx.hand.len(),
        collected = ctx.collected,
        table_plays = ctx.table.plays().len(),
        current_max = ctx.table.current_max(),
        tier_urgency,
        discard = decision.discard,
        cards = %cards,
        reason = decision.reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use xuantuo_core::game::session::{Phase, Session};
    use xuantuo_core::model::card::Card;
    use xuantuo_core::model::hand::Hand;
    use xuantuo_core::model::player::Participant;
    use xuantuo_core::model::table::Table;

    fn hand(ids: &[&str]) -> Hand {
        Hand::with_cards(ids.iter().map(|id| Card::from_id(id).unwrap()).collect())
    }

    #[test]
    fn policy_drives_a_hand_to_settlement() {
        let mut session = Session::with_seed(31);
        session.new_hand().unwrap();
        let mut policies: Vec<HeuristicPolicy> =
            (0..3).map(|seed| HeuristicPolicy::normal(seed)).collect();

        while session.phase() != Phase::Settlement {
            match session.phase() {
                Phase::Playing => {
                    let seat = session.turn();
                    let ctx = PolicyContext::from_session(&session, seat);
                    let decision = policies[seat.index()].choose_play(&ctx).unwrap();
                    session.apply(decision.into_action(seat)).unwrap();
                }
                Phase::RoundOver => {
                    session.finish_round().unwrap();
                }
                phase => panic!("unexpected phase {phase}"),
            }
        }
        assert_eq!(session.collected_counts().iter().sum::<usize>(), Card::COUNT);
    }

    #[test]
    fn kou_le_response_follows_planner() {
        let mut policy = HeuristicPolicy::normal(1);
        let strong = hand(&["r_e1", "r_e2", "b_z1"]);
        let table = Table::new(Participant::Player);
        let ctx = PolicyContext {
            seat: Participant::AiRight,
            hand: &strong,
            table: &table,
            collected: 0,
        };
        assert_eq!(policy.respond_kou_le(&ctx), KouLeResponse::Challenge);

        let weak = hand(&["b_z1", "b_q1"]);
        let ctx = PolicyContext { hand: &weak, ..ctx };
        assert_eq!(policy.respond_kou_le(&ctx), KouLeResponse::Agree);
    }

    #[test]
    fn declaration_rolls_are_seeded() {
        let params = BotParams::default().with_kou_le_chance(0.5);
        let hand = hand(&["b_z1", "r_e1"]);
        let table = Table::new(Participant::AiLeft);
        let ctx = PolicyContext {
            seat: Participant::AiLeft,
            hand: &hand,
            table: &table,
            collected: 0,
        };

        let rolls = |seed| {
            let mut policy = HeuristicPolicy::new(BotDifficulty::Normal, params, seed);
            (0..32).map(|_| policy.wants_kou_le(&ctx)).collect::<Vec<_>>()
        };
        assert_eq!(rolls(9), rolls(9));
        assert!(rolls(9).contains(&true));
        assert!(rolls(9).contains(&false));
    }

    #[test]
    fn easy_policy_never_declares() {
        let mut policy = HeuristicPolicy::new(
            BotDifficulty::Easy,
            BotParams::default().with_kou_le_chance(1.0),
            4,
        );
        let hand = hand(&["b_z1"]);
        let table = Table::new(Participant::AiLeft);
        let ctx = PolicyContext {
            seat: Participant::AiLeft,
            hand: &hand,
            table: &table,
            collected: 0,
        };
        assert!(!policy.wants_kou_le(&ctx));
        assert_eq!(policy.difficulty(), BotDifficulty::Easy);
    }
}
