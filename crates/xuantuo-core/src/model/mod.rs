pub mod card;
pub mod deck;
pub mod hand;
pub mod legal;
pub mod name;
pub mod play;
pub mod player;
pub mod reward;
pub mod score;
pub mod suit;
pub mod table;
