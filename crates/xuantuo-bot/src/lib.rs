pub mod bot;
pub mod policy;

pub use bot::{BotContext, BotDifficulty, BotParams, KouLePlanner, PlayDecision, PlayPlanner};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
