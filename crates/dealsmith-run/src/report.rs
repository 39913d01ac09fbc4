//! Run-level aggregation of failure attribution.
//!
//! Consumes the engine's per-attempt snapshots, keeps the last (cumulative)
//! snapshot of every board, and turns the totals into per-seat "pain share"
//! metrics plus a Markdown summary.

use dealsmith_core::engine::{AttemptSnapshot, AttributionCounters, DealObserver};
use dealsmith_core::model::seat::Seat;
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of one board, including its final attribution snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BoardOutcome {
    pub board: u32,
    pub success: bool,
    pub attempts: u32,
    pub counters: AttributionCounters,
}

/// Observes a generation run board by board.
///
/// The collector is installed as the synthesizer's observer; every failed
/// attempt replaces the current board's snapshot (snapshots are cumulative,
/// so the last one wins). `finish_board` closes the board out.
#[derive(Debug, Default)]
pub struct ReportCollector {
    current: AttributionCounters,
    boards: Vec<BoardOutcome>,
}

impl DealObserver for ReportCollector {
    fn on_failed_attempt(&mut self, snapshot: &AttemptSnapshot<'_>) {
        self.current = *snapshot.counters;
    }
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish_board(&mut self, board: u32, success: bool, attempts: u32) {
        let counters = std::mem::take(&mut self.current);
        self.boards.push(BoardOutcome {
            board,
            success,
            attempts,
            counters,
        });
    }

    pub fn boards(&self) -> &[BoardOutcome] {
        &self.boards
    }

    pub fn finalize(self) -> RunReport {
        let mut totals = AttributionCounters::default();
        for outcome in &self.boards {
            totals.merge(&outcome.counters);
        }
        RunReport {
            boards: self.boards,
            totals,
        }
    }
}

/// Aggregated view of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    boards: Vec<BoardOutcome>,
    totals: AttributionCounters,
}

impl RunReport {
    pub fn boards_dealt(&self) -> usize {
        self.boards.iter().filter(|outcome| outcome.success).count()
    }

    pub fn boards_failed(&self) -> usize {
        self.boards.len() - self.boards_dealt()
    }

    pub fn total_attempts(&self) -> u64 {
        self.boards
            .iter()
            .map(|outcome| outcome.attempts as u64)
            .sum()
    }

    pub fn totals(&self) -> &AttributionCounters {
        &self.totals
    }

    /// The seat's share of all attributed failures across the run, in
    /// `0.0..=1.0`; zero when nothing failed.
    pub fn pain_share(&self, seat: Seat) -> f64 {
        let total = self.totals.total();
        if total == 0 {
            return 0.0;
        }
        self.totals.seat_total(seat) as f64 / total as f64
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut rows = String::new();
        rows.push_str("# Deal Generation Summary\n\n");
        rows.push_str(&format!(
            "Boards dealt: {dealt} / {requested} ({attempts} attempts total)\n\n",
            dealt = self.boards_dealt(),
            requested = self.boards.len(),
            attempts = self.total_attempts(),
        ));
        rows.push_str("| Seat | as_seat | hcp | shape | global_other | global_unchecked | Total | Pain share |\n");
        rows.push_str("|------|---------|-----|-------|--------------|------------------|-------|------------|\n");
        for seat in Seat::LOOP {
            let slot = seat.index();
            rows.push_str(&format!(
                "| {seat} | {as_seat} | {hcp} | {shape} | {other} | {unchecked} | {total} | {share:.1}% |\n",
                as_seat = self.totals.as_seat[slot],
                hcp = self.totals.hcp[slot],
                shape = self.totals.shape[slot],
                other = self.totals.global_other[slot],
                unchecked = self.totals.global_unchecked[slot],
                total = self.totals.seat_total(seat),
                share = self.pain_share(seat) * 100.0,
            ));
        }
        if self.boards_failed() > 0 {
            rows.push_str("\n## Failed boards\n\n");
            for outcome in self.boards.iter().filter(|outcome| !outcome.success) {
                rows.push_str(&format!(
                    "- board {}: budget of {} attempts exhausted\n",
                    outcome.board, outcome.attempts
                ));
            }
        }
        fs::write(path, rows)
    }
}
