use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dealsmith_core::engine::{AttributionCounters, Deal, DealSynthesizer, check_viability};
use dealsmith_core::model::hand::Hand;
use dealsmith_core::model::rank::Rank;
use dealsmith_core::model::seat::Seat;
use dealsmith_core::model::suit::Suit;
use dealsmith_core::profile::{HandProfile, ProfileError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, RunConfig};
use crate::report::ReportCollector;

/// Primary entry point for batch deal generation.
pub struct GenerationRunner {
    config: RunConfig,
    outputs: ResolvedOutputs,
    profile: HandProfile,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub boards_requested: usize,
    pub boards_dealt: usize,
    pub boards_failed: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Errors surfaced while loading the profile or streaming results.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read profile {path:?}: {source}")]
    ProfileRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("profile {path:?} is invalid: {source}")]
    Profile {
        path: PathBuf,
        #[source]
        source: ProfileError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode output row: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GenerationRunner {
    /// Loads the configured profile document, validates it, and vets its
    /// viability once, before any board is attempted.
    pub fn new(config: RunConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let path = config.profile.clone();
        let text = fs::read_to_string(&path).map_err(|source| RunnerError::ProfileRead {
            source,
            path: path.clone(),
        })?;
        let profile = HandProfile::from_json(&text).map_err(|source| RunnerError::Profile {
            path: path.clone(),
            source,
        })?;
        check_viability(&profile).map_err(|source| RunnerError::Profile { path, source })?;
        Ok(Self {
            config,
            outputs,
            profile,
        })
    }

    /// Builds a runner around an already validated profile.
    pub fn with_profile(config: RunConfig, outputs: ResolvedOutputs, profile: HandProfile) -> Self {
        Self {
            config,
            outputs,
            profile,
        }
    }

    pub fn profile(&self) -> &HandProfile {
        &self.profile
    }

    /// Generates every board, streaming JSONL rows to disk and writing the
    /// attribution summary at the end.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.deals_jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.deals_jsonl)?);
        let mut master = StdRng::seed_from_u64(self.config.boards.seed.unwrap_or(0));
        let synthesizer = DealSynthesizer::new(self.config.boards.max_attempts);
        let mut collector = ReportCollector::new();
        let mut rows_written = 0usize;

        for board in 1..=self.config.boards.count as u32 {
            // Every board gets its own sub-seed so boards stay independent
            // and an interesting one can be replayed in isolation.
            let board_seed = master.next_u64();
            let mut rng = StdRng::seed_from_u64(board_seed);
            let deal =
                synthesizer.build_deal_observed(&mut rng, &self.profile, board, Some(&mut collector));

            let (success, attempts) = match &deal {
                Some(deal) => (true, deal.attempts()),
                None => (false, synthesizer.max_attempts()),
            };
            event!(
                Level::INFO,
                board,
                board_seed,
                success,
                attempts,
                "board resolved"
            );
            collector.finish_board(board, success, attempts);
            let counters = collector
                .boards()
                .last()
                .map(|outcome| outcome.counters)
                .unwrap_or_default();
            write_board_row(&mut writer, board, board_seed, attempts, deal.as_ref(), &counters)?;
            rows_written += 1;
        }
        writer.flush()?;

        let report = collector.finalize();
        report.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            boards_requested: self.config.boards.count,
            boards_dealt: report.boards_dealt(),
            boards_failed: report.boards_failed(),
            rows_written,
            jsonl_path: self.outputs.deals_jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }
}

fn ensure_parent(parent: Option<&Path>) -> std::io::Result<()> {
    if let Some(parent) = parent {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct BoardRow<'a> {
    board: u32,
    seed: u64,
    success: bool,
    attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hands: Option<HandsRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failures: Option<&'a AttributionCounters>,
}

#[derive(Serialize)]
struct HandsRow {
    n: String,
    e: String,
    s: String,
    w: String,
}

fn write_board_row<W: Write>(
    writer: &mut W,
    board: u32,
    seed: u64,
    attempts: u32,
    deal: Option<&Deal>,
    counters: &AttributionCounters,
) -> Result<(), RunnerError> {
    let row = BoardRow {
        board,
        seed,
        success: deal.is_some(),
        attempts,
        hands: deal.map(|deal| HandsRow {
            n: hand_notation(deal.hand(Seat::North)),
            e: hand_notation(deal.hand(Seat::East)),
            s: hand_notation(deal.hand(Seat::South)),
            w: hand_notation(deal.hand(Seat::West)),
        }),
        failures: (counters.total() > 0).then_some(counters),
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Suit-dot notation, spades first, ranks descending: `AQT62.K4.987.J53`.
fn hand_notation(hand: &Hand) -> String {
    let mut text = String::new();
    for (index, suit) in [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
        .iter()
        .enumerate()
    {
        if index > 0 {
            text.push('.');
        }
        let mut ranks: Vec<Rank> = hand
            .iter()
            .filter(|card| card.suit == *suit)
            .map(|card| card.rank)
            .collect();
        ranks.sort_by(|a, b| b.cmp(a));
        for rank in ranks {
            text.push_str(&rank.to_string());
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::hand_notation;
    use dealsmith_core::model::card::Card;
    use dealsmith_core::model::hand::Hand;
    use dealsmith_core::model::rank::Rank;
    use dealsmith_core::model::suit::Suit;

    #[test]
    fn notation_orders_suits_and_ranks() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Ten, Suit::Spades),
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Nine, Suit::Clubs),
        ]);
        assert_eq!(hand_notation(&hand), "AT.K..9");
    }

    #[test]
    fn void_suits_render_empty_segments() {
        let hand = Hand::with_cards(vec![Card::new(Rank::Queen, Suit::Diamonds)]);
        assert_eq!(hand_notation(&hand), "..Q.");
    }
}
