use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use xuantuo_core::model::reward::RewardTier;

use super::HandOutcome;

/// Running per-agent totals for the Markdown summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentTotals {
    pub name: String,
    pub hands: usize,
    pub cards: usize,
    pub net: i64,
    pub final_balance: i64,
    /// Hands finished in each tier, indexed bu_gou, gang_gou, wu_le, ci_le.
    pub tiers: [usize; 4],
    pub declarations: usize,
    pub failed_challenges: usize,
}

impl AgentTotals {
    pub fn avg_cards(&self) -> f64 {
        if self.hands == 0 {
            0.0
        } else {
            self.cards as f64 / self.hands as f64
        }
    }

    pub fn net_per_hand(&self) -> f64 {
        if self.hands == 0 {
            0.0
        } else {
            self.net as f64 / self.hands as f64
        }
    }
}

pub struct SummaryCollector {
    run_id: String,
    totals: Vec<AgentTotals>,
    rounds: usize,
    redeals: usize,
}

impl SummaryCollector {
    pub fn new(run_id: &str, agent_names: &[String]) -> Self {
        Self {
            run_id: run_id.to_string(),
            totals: agent_names
                .iter()
                .map(|name| AgentTotals {
                    name: name.clone(),
                    ..AgentTotals::default()
                })
                .collect(),
            rounds: 0,
            redeals: 0,
        }
    }

    pub fn record_hand(&mut self, outcome: &HandOutcome) {
        self.rounds += outcome.rounds;
        self.redeals += outcome.deal_attempts.saturating_sub(1);
        for (totals, seat) in self.totals.iter_mut().zip(&outcome.seats) {
            totals.hands += 1;
            totals.cards += seat.collected;
            totals.net += seat.net;
            totals.final_balance = seat.balance;
            totals.tiers[tier_index(seat.tier)] += 1;
            totals.declarations += usize::from(seat.declared_kou_le);
            totals.failed_challenges += usize::from(seat.challenge_failed);
        }
    }

    pub fn totals(&self) -> &[AgentTotals] {
        &self.totals
    }

    pub fn render_markdown(&self, hands: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Xuan Tuo Tuo bench: {}", self.run_id);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{hands} hands, {} rounds, {} redeals.",
            self.rounds, self.redeals
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "| agent | seat | avg cards | net/hand | balance | bu_gou | gang_gou | wu_le | ci_le | kou le | failed challenges |"
        );
        let _ = writeln!(
            out,
            "|---|---|---:|---:|---:|---:|---:|---:|---:|---:|---:|"
        );
        for (index, totals) in self.totals.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | {:.2} | {:+.2} | {} | {} | {} | {} | {} | {} | {} |",
                totals.name,
                super::seat_label(index),
                totals.avg_cards(),
                totals.net_per_hand(),
                totals.final_balance,
                totals.tiers[0],
                totals.tiers[1],
                totals.tiers[2],
                totals.tiers[3],
                totals.declarations,
                totals.failed_challenges,
            );
        }
        out
    }

    pub fn write_markdown(&self, path: &Path, hands: usize) -> std::io::Result<()> {
        fs::write(path, self.render_markdown(hands))
    }
}

fn tier_index(tier: RewardTier) -> usize {
    match tier {
        RewardTier::BuGou => 0,
        RewardTier::GangGou => 1,
        RewardTier::WuLe => 2,
        RewardTier::CiLe => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::SeatResult;
    use xuantuo_core::model::player::Participant;

    fn seat(participant: Participant, collected: usize, net: i64) -> SeatResult {
        SeatResult {
            seat: participant,
            agent_name: participant.to_string(),
            difficulty: "normal",
            collected,
            tier: RewardTier::for_collected(collected),
            net,
            balance: 100 + net,
            declared_kou_le: false,
            challenge_failed: false,
        }
    }

    #[test]
    fn totals_accumulate_per_seat() {
        let names = ["a", "b", "c"].map(String::from);
        let mut collector = SummaryCollector::new("run", &names);
        let outcome = HandOutcome {
            deal_attempts: 2,
            rounds: 4,
            seats: vec![
                seat(Participant::Player, 15, 4),
                seat(Participant::AiLeft, 9, 1),
                seat(Participant::AiRight, 0, -5),
            ],
        };
        collector.record_hand(&outcome);
        collector.record_hand(&outcome);

        let totals = collector.totals();
        assert_eq!(totals[0].hands, 2);
        assert_eq!(totals[0].tiers, [0, 0, 2, 0]);
        assert_eq!(totals[1].avg_cards(), 9.0);
        assert_eq!(totals[2].net_per_hand(), -5.0);

        let markdown = collector.render_markdown(2);
        assert!(markdown.contains("2 hands, 8 rounds, 2 redeals."));
        assert!(markdown.contains("| c | ai_right |"));
    }
}
