use super::{BotContext, BotDifficulty, BotParams};
use rand::Rng;
use xuantuo_core::game::kou_le::KouLeResponse;
use xuantuo_core::model::hand::Hand;
use xuantuo_core::model::legal;
use xuantuo_core::model::play::PlayKind;

/// Single cards at or above this strength count as top cards (red/black 相
/// and 尔).
const TOP_CARD_STRENGTH: u8 = 22;

pub struct KouLePlanner;

impl KouLePlanner {
    /// Challenge with two top cards, with two pairs once six cards are
    /// collected, or whenever 刚够 is already secured.
    pub fn evaluate(hand: &Hand, collected: usize) -> KouLeResponse {
        let top_cards = hand
            .iter()
            .filter(|card| card.strength() >= TOP_CARD_STRENGTH)
            .count();
        let pairs = legal::opening_options(hand)
            .iter()
            .filter(|option| option.kind() == PlayKind::Pair)
            .count();

        if top_cards >= 2 || (collected >= 6 && pairs >= 2) || collected >= 9 {
            KouLeResponse::Challenge
        } else {
            KouLeResponse::Agree
        }
    }

    pub fn respond(ctx: &BotContext<'_>) -> KouLeResponse {
        Self::evaluate(ctx.hand, ctx.collected)
    }

    /// Rolls for a declaration. Only meaningful while opening a round.
    pub fn should_declare<R: Rng + ?Sized>(ctx: &BotContext<'_>, rng: &mut R) -> bool {
        if !ctx.is_opening() || ctx.difficulty == BotDifficulty::Easy {
            return false;
        }
        roll(ctx.params, rng)
    }
}

fn roll<R: Rng + ?Sized>(params: &BotParams, rng: &mut R) -> bool {
    if params.kou_le_chance <= 0.0 {
        return false;
    }
    rng.gen_bool(params.kou_le_chance.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use xuantuo_core::model::card::Card;
    use xuantuo_core::model::play::Play;
    use xuantuo_core::model::player::Participant;
    use xuantuo_core::model::table::Table;

    fn hand(ids: &[&str]) -> Hand {
        Hand::with_cards(ids.iter().map(|id| Card::from_id(id).unwrap()).collect())
    }

    #[test]
    fn two_top_cards_challenge() {
        let hand = hand(&["r_x1", "b_e1", "b_z1"]);
        assert_eq!(KouLePlanner::evaluate(&hand, 0), KouLeResponse::Challenge);
    }

    #[test]
    fn pairs_only_count_after_six_collected() {
        let hand = hand(&["b_z1", "b_z2", "b_q1", "b_q2", "r_x1"]);
        assert_eq!(KouLePlanner::evaluate(&hand, 5), KouLeResponse::Agree);
        assert_eq!(KouLePlanner::evaluate(&hand, 6), KouLeResponse::Challenge);
    }

    #[test]
    fn secured_tier_always_challenges() {
        let hand = hand(&["b_z1"]);
        assert_eq!(KouLePlanner::evaluate(&hand, 9), KouLeResponse::Challenge);
        assert_eq!(KouLePlanner::evaluate(&hand, 8), KouLeResponse::Agree);
    }

    #[test]
    fn declaration_requires_empty_table_and_nonzero_chance() {
        let hand = hand(&["b_z1", "r_e1"]);
        let always = BotParams::default().with_kou_le_chance(1.0);
        let never = BotParams::default().with_kou_le_chance(0.0);
        let empty = Table::new(Participant::AiLeft);
        let mut rng = StdRng::seed_from_u64(3);

        let ctx = BotContext::new(
            Participant::AiLeft,
            &hand,
            &empty,
            0,
            BotDifficulty::Normal,
            &always,
        );
        assert!(KouLePlanner::should_declare(&ctx, &mut rng));

        let ctx = BotContext { params: &never, ..ctx };
        assert!(!KouLePlanner::should_declare(&ctx, &mut rng));

        let mut opened = Table::new(Participant::Player);
        opened
            .place(Play::shown(Participant::Player, vec![Card::from_id("r_z1").unwrap()]))
            .unwrap();
        let ctx = BotContext::new(
            Participant::AiRight,
            &hand,
            &opened,
            0,
            BotDifficulty::Normal,
            &always,
        );
        assert!(!KouLePlanner::should_declare(&ctx, &mut rng));

        let ctx = BotContext::new(
            Participant::AiLeft,
            &hand,
            &empty,
            0,
            BotDifficulty::Easy,
            &always,
        );
        assert!(!KouLePlanner::should_declare(&ctx, &mut rng));
    }
}
