use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Participant;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;
use tracing::{Level, event};

pub const HAND_SIZE: usize = 8;

/// Full reshuffles attempted before the deal is repaired in place.
pub const MAX_REDEAL_ATTEMPTS: u32 = 32;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

/// Result of dealing a hand that satisfies the No-Xiang rule.
#[derive(Debug, Clone)]
pub struct Deal {
    pub hands: [Hand; 3],
    /// Number of shuffles performed, including the accepted one.
    pub attempts: u32,
    /// True when the reshuffle budget ran out and cards were swapped instead.
    pub repaired: bool,
}

impl Deck {
    pub fn standard() -> Self {
        Self {
            cards: Card::all().collect(),
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Splits the deck into consecutive blocks of eight, in seat order.
    pub fn split(&self) -> [Hand; 3] {
        array::from_fn(|seat| {
            let start = seat * HAND_SIZE;
            Hand::with_cards(self.cards[start..start + HAND_SIZE].to_vec())
        })
    }

    /// Shuffles and splits until no hand is No-Xiang (holds neither 尔 nor
    /// 相). After [`MAX_REDEAL_ATTEMPTS`] failures the last deal is repaired.
    pub fn deal_valid<R: rand::Rng + ?Sized>(rng: &mut R) -> Deal {
        let mut hands = Self::shuffled(rng).split();
        let mut attempts = 1;

        while hands.iter().any(|hand| !hand.has_xiang()) {
            if attempts >= MAX_REDEAL_ATTEMPTS {
                event!(
                    target: "xuantuo_core::deal",
                    Level::WARN,
                    attempts,
                    "redeal budget exhausted; repairing deal"
                );
                repair_no_xiang(&mut hands);
                return Deal {
                    hands,
                    attempts,
                    repaired: true,
                };
            }

            event!(
                target: "xuantuo_core::deal",
                Level::DEBUG,
                attempt = attempts,
                "No-Xiang hand dealt; reshuffling"
            );
            hands = Self::shuffled(rng).split();
            attempts += 1;
        }

        Deal {
            hands,
            attempts,
            repaired: false,
        }
    }
}

fn xiang_count(hand: &Hand) -> usize {
    hand.iter().filter(|card| card.name().is_xiang_family()).count()
}

/// Moves one 尔/相 card into every hand lacking one, taking it from the hand
/// that holds the most and returning the receiver's weakest card in exchange.
/// Eight 尔/相 cards over three hands guarantee a donor with at least two.
pub fn repair_no_xiang(hands: &mut [Hand; 3]) {
    for seat in Participant::LOOP {
        if hands[seat.index()].has_xiang() {
            continue;
        }

        let Some(donor) = seat
            .others()
            .filter(|other| xiang_count(&hands[other.index()]) >= 2)
            .max_by_key(|other| xiang_count(&hands[other.index()]))
        else {
            continue;
        };

        let Some(given) = hands[donor.index()]
            .iter()
            .copied()
            .find(|card| card.name().is_xiang_family())
        else {
            continue;
        };
        let Some(returned) = hands[seat.index()].weakest(1).first().copied() else {
            continue;
        };

        hands[donor.index()].remove(given);
        hands[seat.index()].remove(returned);
        hands[donor.index()].add(returned);
        hands[seat.index()].add(given);
    }
}

#[cfg(test)]
mod tests {
    use super::{Deck, HAND_SIZE, MAX_REDEAL_ATTEMPTS, repair_no_xiang};
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_24_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), 24);
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), 24);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn split_gives_eight_cards_each() {
        let hands = Deck::shuffled_with_seed(7).split();
        for hand in &hands {
            assert_eq!(hand.len(), HAND_SIZE);
        }
    }

    #[test]
    fn valid_deal_never_contains_no_xiang_hand() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let deal = Deck::deal_valid(&mut rng);
            assert!(deal.hands.iter().all(Hand::has_xiang), "seed {seed}");
            assert!(deal.attempts >= 1);
        }
    }

    #[test]
    fn exhausted_redeal_budget_repairs_the_last_deal() {
        // A constant generator shuffles the same way every time.
        let mut rng = StepRng::new(0, 0);
        let stuck = Deck::shuffled(&mut rng).split();
        assert!(stuck.iter().any(|hand| !hand.has_xiang()));

        let deal = Deck::deal_valid(&mut rng);
        assert!(deal.repaired);
        assert_eq!(deal.attempts, MAX_REDEAL_ATTEMPTS);
        assert!(deal.hands.iter().all(Hand::has_xiang));
        assert!(deal.hands.iter().all(|hand| hand.len() == HAND_SIZE));
        let total: HashSet<_> = deal.hands.iter().flat_map(|h| h.iter().copied()).collect();
        assert_eq!(total.len(), 24);
    }

    #[test]
    fn lucky_first_shuffle_is_not_repaired() {
        let deal = (0..200)
            .map(|seed| Deck::deal_valid(&mut StdRng::seed_from_u64(seed)))
            .find(|deal| deal.attempts == 1)
            .unwrap();
        assert!(!deal.repaired);
    }

    #[test]
    fn repair_fixes_hand_without_xiang() {
        let ids = |list: &[&str]| -> Hand {
            Hand::with_cards(list.iter().map(|id| Card::from_id(id).unwrap()).collect())
        };
        let mut hands = [
            ids(&["r_z1", "r_z2", "b_z1", "b_z2", "r_m1", "r_m2", "b_m1", "b_m2"]),
            ids(&["r_x1", "r_x2", "b_x1", "b_x2", "r_e1", "r_e2", "b_e1", "b_e2"]),
            ids(&["bj", "r_q1", "r_q2", "r_q3", "sj", "b_q1", "b_q2", "b_q3"]),
        ];

        repair_no_xiang(&mut hands);

        assert!(hands.iter().all(Hand::has_xiang));
        assert!(hands.iter().all(|hand| hand.len() == HAND_SIZE));
        let total: HashSet<_> = hands.iter().flat_map(|h| h.iter().copied()).collect();
        assert_eq!(total.len(), 24);
    }
}
