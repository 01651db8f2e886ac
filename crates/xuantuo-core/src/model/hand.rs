use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::vec::Vec;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Returns the first card in `cards` that this hand does not hold.
    pub fn first_missing(&self, cards: &[Card]) -> Option<Card> {
        cards.iter().copied().find(|card| !self.contains(*card))
    }

    /// Removes every card or none of them.
    pub fn remove_all(&mut self, cards: &[Card]) -> bool {
        if self.first_missing(cards).is_some() {
            return false;
        }
        for card in cards {
            self.remove(*card);
        }
        true
    }

    pub fn has_xiang(&self) -> bool {
        self.cards.iter().any(|card| card.name().is_xiang_family())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The `count` weakest cards, used for face-down forfeits.
    pub fn weakest(&self, count: usize) -> Vec<Card> {
        self.cards.iter().copied().take(count).collect()
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.strength().cmp(&b.strength()).then(a.cmp(b)));
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;

    fn card(id: &str) -> Card {
        Card::from_id(id).unwrap()
    }

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        hand.add(card("r_z1"));
        assert!(hand.contains(card("r_z1")));
        assert!(hand.remove(card("r_z1")));
        assert!(!hand.contains(card("r_z1")));
        assert!(!hand.remove(card("r_z1")));
    }

    #[test]
    fn cards_are_sorted_by_strength() {
        let hand = Hand::with_cards(vec![card("r_e1"), card("b_q1"), card("r_m2")]);
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(ordered, vec![card("b_q1"), card("r_m2"), card("r_e1")]);
        assert_eq!(hand.weakest(2), vec![card("b_q1"), card("r_m2")]);
    }

    #[test]
    fn remove_all_is_atomic() {
        let mut hand = Hand::with_cards(vec![card("r_e1"), card("b_q1")]);
        assert!(!hand.remove_all(&[card("r_e1"), card("sj")]));
        assert_eq!(hand.len(), 2);
        assert!(hand.remove_all(&[card("r_e1"), card("b_q1")]));
        assert!(hand.is_empty());
    }

    #[test]
    fn xiang_detection() {
        let without = Hand::with_cards(vec![card("r_z1"), card("b_q1"), card("bj")]);
        assert!(!without.has_xiang());
        let with = Hand::with_cards(vec![card("r_z1"), card("b_x2")]);
        assert!(with.has_xiang());
    }
}
