use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::play::{Evaluation, Play, PlayKind, evaluate};

/// A candidate play together with its evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub cards: Vec<Card>,
    pub eval: Evaluation,
}

impl Candidate {
    pub fn kind(&self) -> PlayKind {
        self.eval.kind
    }

    pub fn strength(&self) -> i16 {
        self.eval.strength
    }
}

/// Every play available to a participant opening a round: all singles, then
/// every legal pair, then every legal triple, in hand order.
pub fn opening_options(hand: &Hand) -> Vec<Candidate> {
    let cards = hand.cards();
    let mut options = Vec::new();
    options.extend(combinations(cards, 1).filter(|o| o.kind() == PlayKind::Single));
    options.extend(combinations(cards, 2).filter(|o| o.kind() == PlayKind::Pair));
    options.extend(combinations(cards, 3).filter(|o| o.kind() == PlayKind::Triple));
    options
}

/// Plays that beat the round so far: same card count and kind as `target`,
/// strictly stronger than `current_max`. Empty means the participant has to
/// discard `target.card_count()` cards.
pub fn beating_options(hand: &Hand, target: &Play, current_max: i16) -> Vec<Candidate> {
    combinations(hand.cards(), target.card_count())
        .filter(|o| o.kind() == target.kind && o.strength() > current_max)
        .collect()
}

/// Dispatches to [`opening_options`] or [`beating_options`].
pub fn legal_options(hand: &Hand, target: Option<&Play>, current_max: i16) -> Vec<Candidate> {
    match target {
        None => opening_options(hand),
        Some(target) => beating_options(hand, target, current_max),
    }
}

pub fn has_beating_option(hand: &Hand, target: &Play, current_max: i16) -> bool {
    combinations(hand.cards(), target.card_count())
        .any(|o| o.kind() == target.kind && o.strength() > current_max)
}

/// Index-ordered k-subsets for k in 1..=3, evaluated. Larger k yield nothing
/// since no play uses more than three cards.
fn combinations(cards: &[Card], k: usize) -> impl Iterator<Item = Candidate> + '_ {
    let n = cards.len();
    let mut picks: Vec<Vec<Card>> = Vec::new();
    match k {
        1 => picks.extend(cards.iter().map(|c| vec![*c])),
        2 => {
            for i in 0..n {
                for j in i + 1..n {
                    picks.push(vec![cards[i], cards[j]]);
                }
            }
        }
        3 => {
            for i in 0..n {
                for j in i + 1..n {
                    for l in j + 1..n {
                        picks.push(vec![cards[i], cards[j], cards[l]]);
                    }
                }
            }
        }
        _ => {}
    }
    picks.into_iter().map(|cards| {
        let eval = evaluate(&cards);
        Candidate { cards, eval }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::Participant;

    fn hand(ids: &[&str]) -> Hand {
        Hand::with_cards(ids.iter().map(|id| Card::from_id(id).unwrap()).collect())
    }

    fn ids(option: &Candidate) -> Vec<&'static str> {
        option.cards.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn opening_lists_singles_pairs_and_triples() {
        let hand = hand(&["b_q1", "b_q2", "b_q3", "r_e1"]);
        let options = opening_options(&hand);
        let singles = options.iter().filter(|o| o.kind() == PlayKind::Single).count();
        let pairs = options.iter().filter(|o| o.kind() == PlayKind::Pair).count();
        let triples = options.iter().filter(|o| o.kind() == PlayKind::Triple).count();
        assert_eq!((singles, pairs, triples), (4, 3, 1));
        assert_eq!(options[0].kind(), PlayKind::Single);
        assert_eq!(options.last().map(Candidate::kind), Some(PlayKind::Triple));
    }

    #[test]
    fn opening_with_two_cards_has_no_triples() {
        let hand = hand(&["bj", "sj"]);
        let options = opening_options(&hand);
        assert_eq!(options.len(), 3);
        assert_eq!(options[2].strength(), 125);
    }

    #[test]
    fn single_response_requires_strictly_greater() {
        let hand = hand(&["bj", "r_q1", "r_m1"]);
        let target = Play::shown(Participant::AiLeft, vec![Card::from_id("r_q2").unwrap()]);
        let options = beating_options(&hand, &target, 16);
        assert_eq!(options.len(), 1);
        assert_eq!(ids(&options[0]), vec!["r_m1"]);
    }

    #[test]
    fn pair_response_ignores_singles_and_weak_pairs() {
        let hand = hand(&["b_q1", "b_q2", "r_z1", "r_z2", "r_e1"]);
        let target = Play::shown(
            Participant::Player,
            vec![Card::from_id("b_z1").unwrap(), Card::from_id("b_z2").unwrap()],
        );
        let options = beating_options(&hand, &target, 117);
        assert_eq!(options.len(), 1);
        assert_eq!(ids(&options[0]), vec!["r_z1", "r_z2"]);
        assert!(has_beating_option(&hand, &target, 117));
        assert!(!has_beating_option(&hand, &target, 118));
    }

    #[test]
    fn triple_response_needs_stronger_triple() {
        let hand = hand(&["r_q1", "r_q2", "r_q3", "r_e1"]);
        let target = Play::shown(
            Participant::AiRight,
            ["b_q1", "b_q2", "b_q3"]
                .iter()
                .map(|id| Card::from_id(id).unwrap())
                .collect(),
        );
        let options = legal_options(&hand, Some(&target), target.strength);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].strength(), 216);
    }
}
