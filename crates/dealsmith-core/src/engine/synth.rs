//! Constraint-satisfying deal synthesis.
//!
//! Given one selected subprofile per seat, assigns all 52 cards to the four
//! hands, seat by seat in dealing order, or reports a classified failure.
//! Attempts are bounded; exhaustion is an expected outcome for tight
//! profiles, reported as `None` rather than an error.

use crate::engine::observe::{AttemptSnapshot, DealObserver};
use crate::engine::select::{SeatSelection, select_subprofiles};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::profile::{
    HAND_SIZE, HandProfile, SpecialConstraint, StandardConstraints, SuitPair, SuitRange,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::array;
use std::fmt;

/// Candidate hands drawn for one seat within a single attempt before the
/// attempt is abandoned.
const SEAT_DRAW_LIMIT: usize = 50;

/// Attempt budget used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 200;

/// Why a dealing attempt died at a particular seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The seat's own special (random-suit or contingent) requirement failed.
    AsSeat,
    /// The pool left by earlier seats cannot satisfy the seat at all.
    GlobalOther,
    /// Structural failure no local check anticipated.
    GlobalUnchecked,
    Hcp,
    Shape,
}

impl FailureCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureCategory::AsSeat => "as_seat",
            FailureCategory::GlobalOther => "global_other",
            FailureCategory::GlobalUnchecked => "global_unchecked",
            FailureCategory::Hcp => "hcp",
            FailureCategory::Shape => "shape",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative failure counts for one board, keyed by seat and category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionCounters {
    pub as_seat: [u32; 4],
    pub global_other: [u32; 4],
    pub global_unchecked: [u32; 4],
    pub hcp: [u32; 4],
    pub shape: [u32; 4],
}

impl AttributionCounters {
    pub fn record(&mut self, seat: Seat, category: FailureCategory) {
        let slot = seat.index();
        match category {
            FailureCategory::AsSeat => self.as_seat[slot] += 1,
            FailureCategory::GlobalOther => self.global_other[slot] += 1,
            FailureCategory::GlobalUnchecked => self.global_unchecked[slot] += 1,
            FailureCategory::Hcp => self.hcp[slot] += 1,
            FailureCategory::Shape => self.shape[slot] += 1,
        }
    }

    pub fn category(&self, category: FailureCategory) -> &[u32; 4] {
        match category {
            FailureCategory::AsSeat => &self.as_seat,
            FailureCategory::GlobalOther => &self.global_other,
            FailureCategory::GlobalUnchecked => &self.global_unchecked,
            FailureCategory::Hcp => &self.hcp,
            FailureCategory::Shape => &self.shape,
        }
    }

    pub fn seat_total(&self, seat: Seat) -> u32 {
        let slot = seat.index();
        self.as_seat[slot]
            + self.global_other[slot]
            + self.global_unchecked[slot]
            + self.hcp[slot]
            + self.shape[slot]
    }

    pub fn total(&self) -> u32 {
        Seat::LOOP.iter().map(|seat| self.seat_total(*seat)).sum()
    }

    /// Adds another board's counts into this accumulator.
    pub fn merge(&mut self, other: &AttributionCounters) {
        for slot in 0..4 {
            self.as_seat[slot] += other.as_seat[slot];
            self.global_other[slot] += other.global_other[slot];
            self.global_unchecked[slot] += other.global_unchecked[slot];
            self.hcp[slot] += other.hcp[slot];
            self.shape[slot] += other.shape[slot];
        }
    }
}

/// A successfully synthesized board.
#[derive(Debug, Clone)]
pub struct Deal {
    board_number: u32,
    hands: [Hand; 4],
    attempts: u32,
    selection: SeatSelection,
}

impl Deal {
    pub fn board_number(&self) -> u32 {
        self.board_number
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    /// Attempts consumed, including the successful one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn selection(&self) -> SeatSelection {
        self.selection
    }
}

/// Builds deals for one profile under a bounded attempt budget.
#[derive(Debug, Clone)]
pub struct DealSynthesizer {
    max_attempts: u32,
}

impl DealSynthesizer {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Synthesizes one board, or `None` once the attempt budget is spent.
    pub fn build_deal<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        profile: &HandProfile,
        board_number: u32,
    ) -> Option<Deal> {
        self.build_deal_observed(rng, profile, board_number, None)
    }

    /// Synthesizes one board, feeding the observer a cumulative counter
    /// snapshot after every failed attempt.
    pub fn build_deal_observed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        profile: &HandProfile,
        board_number: u32,
        mut observer: Option<&mut dyn DealObserver>,
    ) -> Option<Deal> {
        let selection = select_subprofiles(rng, profile);
        let chosen = draw_random_suits(rng, profile, &selection);
        let mut counters = AttributionCounters::default();

        for attempt in 1..=self.max_attempts {
            match attempt_deal(rng, profile, &selection, &chosen) {
                Ok(hands) => {
                    return Some(Deal {
                        board_number,
                        hands,
                        attempts: attempt,
                        selection,
                    });
                }
                Err(failure) => {
                    counters.record(failure.seat, failure.category);
                    if let Some(sink) = observer.as_deref_mut() {
                        sink.on_failed_attempt(&AttemptSnapshot {
                            profile,
                            board_number,
                            attempt_number: attempt,
                            counters: &counters,
                        });
                    }
                }
            }
        }
        None
    }
}

impl Default for DealSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Suits drawn for one seat's random-suit constraint, fixed for the board.
#[derive(Debug, Clone)]
struct SuitChoice {
    chosen: Vec<Suit>,
    non_chosen: Option<Suit>,
}

#[derive(Debug, Clone, Default)]
struct ChosenSuits {
    choices: [Option<SuitChoice>; 4],
}

impl ChosenSuits {
    fn choice(&self, seat: Seat) -> Option<&SuitChoice> {
        self.choices[seat.index()].as_ref()
    }
}

/// Draws every random-suit seat's suits for the board, in dealing order.
/// The draw happens once; retries within the board reuse it.
fn draw_random_suits<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &HandProfile,
    selection: &SeatSelection,
) -> ChosenSuits {
    let mut chosen = ChosenSuits::default();
    for &seat in profile.dealing_order() {
        let Some(constraint) = selection.subprofile(profile, seat).random_suit() else {
            continue;
        };
        let mut allowed: Vec<Suit> = constraint.allowed_suits.iter().collect();
        allowed.shuffle(rng);
        let picked = allowed[..constraint.required_suits].to_vec();
        let non_chosen = if constraint.surplus() == 1 {
            allowed.get(constraint.required_suits).copied()
        } else {
            None
        };
        chosen.choices[seat.index()] = Some(SuitChoice {
            chosen: picked,
            non_chosen,
        });
    }
    chosen
}

struct AttemptFailure {
    seat: Seat,
    category: FailureCategory,
}

/// One full pass over the dealing order; any seat that cannot be satisfied
/// aborts the attempt with its failure classification.
fn attempt_deal<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &HandProfile,
    selection: &SeatSelection,
    chosen: &ChosenSuits,
) -> Result<[Hand; 4], AttemptFailure> {
    let mut pool: Vec<Card> = Deck::standard().cards().to_vec();
    let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
    for &seat in profile.dealing_order() {
        let requirements = resolve_requirements(profile, selection, chosen, seat)
            .map_err(|category| AttemptFailure { seat, category })?;
        let hand = draw_seat_hand(rng, &mut pool, &requirements)
            .map_err(|category| AttemptFailure { seat, category })?;
        hands[seat.index()] = hand;
    }
    Ok(hands)
}

/// A seat's constraints with the board's random and contingent suits
/// resolved onto concrete suits.
struct SeatRequirements<'a> {
    standard: &'a StandardConstraints,
    special: Vec<(Suit, SuitRange)>,
    merged: [SuitRange; 4],
}

fn resolve_requirements<'a>(
    profile: &'a HandProfile,
    selection: &SeatSelection,
    chosen: &ChosenSuits,
    seat: Seat,
) -> Result<SeatRequirements<'a>, FailureCategory> {
    let sub = selection.subprofile(profile, seat);
    let standard = sub.standard();
    let mut special: Vec<(Suit, SuitRange)> = Vec::new();

    match sub.special() {
        None => {}
        Some(SpecialConstraint::RandomSuit(constraint)) => {
            let choice = chosen
                .choice(seat)
                .ok_or(FailureCategory::GlobalUnchecked)?;
            let mut overridden = false;
            if constraint.required_suits == 2 && choice.chosen.len() == 2 {
                let pair = SuitPair::new(choice.chosen[0], choice.chosen[1]);
                if let Some(ranges) = constraint.pair_overrides.get(&pair) {
                    let suits = pair.suits();
                    special.push((suits[0], ranges[0]));
                    special.push((suits[1], ranges[1]));
                    overridden = true;
                }
            }
            if !overridden {
                for (slot, suit) in choice.chosen.iter().enumerate() {
                    special.push((*suit, constraint.suit_ranges[slot]));
                }
            }
        }
        Some(SpecialConstraint::PartnerContingent(contingent))
        | Some(SpecialConstraint::OpponentContingent(contingent)) => {
            // A target seat that selected no random-suit subprofile this
            // board leaves the constraint without a target suit; it is inert.
            if let Some(target_choice) = chosen.choice(contingent.target_seat) {
                let target_suit = if contingent.use_non_chosen_suit {
                    target_choice.non_chosen
                } else {
                    target_choice.chosen.first().copied()
                };
                if let Some(suit) = target_suit {
                    special.push((suit, contingent.suit_range));
                }
            }
        }
    }

    let mut merged: [SuitRange; 4] = array::from_fn(|index| {
        *standard.suit(Suit::ALL[index])
    });
    for (suit, range) in &special {
        match merged[suit.index()].intersect(range) {
            Some(narrowed) => merged[suit.index()] = narrowed,
            None => return Err(FailureCategory::AsSeat),
        }
    }

    Ok(SeatRequirements {
        standard,
        special,
        merged,
    })
}

/// Draws 13 cards for one seat from the undealt pool, retrying a bounded
/// number of candidates before giving up with the last failing category.
fn draw_seat_hand<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &mut Vec<Card>,
    requirements: &SeatRequirements<'_>,
) -> Result<Hand, FailureCategory> {
    check_pool_feasibility(pool, requirements)?;

    // A 13-card pool admits exactly one membership, so one check decides.
    let draws = if pool.len() == HAND_SIZE as usize {
        1
    } else {
        SEAT_DRAW_LIMIT
    };
    let mut last_failure = FailureCategory::GlobalUnchecked;
    for _ in 0..draws {
        pool.shuffle(rng);
        match check_candidate(&pool[..HAND_SIZE as usize], requirements) {
            Ok(()) => {
                let cards: Vec<Card> = pool.drain(..HAND_SIZE as usize).collect();
                return Ok(Hand::with_cards(cards));
            }
            Err(category) => last_failure = category,
        }
    }
    Err(last_failure)
}

/// Rules out hands the pool can no longer supply before any card is drawn.
fn check_pool_feasibility(
    pool: &[Card],
    requirements: &SeatRequirements<'_>,
) -> Result<(), FailureCategory> {
    if pool.len() < HAND_SIZE as usize {
        return Err(FailureCategory::GlobalUnchecked);
    }

    let mut min_sum: u32 = 0;
    let mut max_sum: u32 = 0;
    for suit in Suit::ALL {
        let bounds = &requirements.merged[suit.index()];
        min_sum += bounds.min_cards as u32;
        max_sum += bounds.max_cards as u32;
    }
    if min_sum > HAND_SIZE as u32 || max_sum < HAND_SIZE as u32 {
        return Err(FailureCategory::Shape);
    }

    let mut pool_counts = [0u32; 4];
    for card in pool {
        pool_counts[card.suit.index()] += 1;
    }
    let mut capacity: u32 = 0;
    for suit in Suit::ALL {
        let bounds = &requirements.merged[suit.index()];
        if pool_counts[suit.index()] < bounds.min_cards as u32 {
            return Err(FailureCategory::GlobalOther);
        }
        capacity += pool_counts[suit.index()].min(bounds.max_cards as u32);
    }
    if capacity < HAND_SIZE as u32 {
        return Err(FailureCategory::GlobalOther);
    }

    // The pool must still be able to reach the seat's whole-hand HCP window.
    let mut points: Vec<u8> = pool.iter().map(|card| card.hcp()).collect();
    points.sort_unstable_by(|a, b| b.cmp(a));
    let richest: u32 = points[..HAND_SIZE as usize]
        .iter()
        .map(|p| *p as u32)
        .sum();
    let poorest: u32 = points[points.len() - HAND_SIZE as usize..]
        .iter()
        .map(|p| *p as u32)
        .sum();
    if richest < requirements.standard.total_min_hcp as u32
        || poorest > requirements.standard.total_max_hcp as u32
    {
        return Err(FailureCategory::GlobalOther);
    }
    Ok(())
}

/// Checks one candidate hand: standard lengths, then HCP, then the resolved
/// special-suit requirements.
fn check_candidate(
    cards: &[Card],
    requirements: &SeatRequirements<'_>,
) -> Result<(), FailureCategory> {
    let mut counts = [0usize; 4];
    let mut suit_hcp = [0u8; 4];
    let mut total_hcp: u8 = 0;
    for card in cards {
        counts[card.suit.index()] += 1;
        suit_hcp[card.suit.index()] += card.hcp();
        total_hcp += card.hcp();
    }

    for suit in Suit::ALL {
        let bounds = requirements.standard.suit(suit);
        let held = counts[suit.index()];
        if held < bounds.min_cards as usize || held > bounds.max_cards as usize {
            return Err(FailureCategory::Shape);
        }
    }

    if total_hcp < requirements.standard.total_min_hcp
        || total_hcp > requirements.standard.total_max_hcp
    {
        return Err(FailureCategory::Hcp);
    }
    for suit in Suit::ALL {
        let bounds = requirements.standard.suit(suit);
        let held = suit_hcp[suit.index()];
        if held < bounds.min_hcp || held > bounds.max_hcp {
            return Err(FailureCategory::Hcp);
        }
    }

    for (suit, range) in &requirements.special {
        if !range.contains(counts[suit.index()], suit_hcp[suit.index()]) {
            return Err(FailureCategory::AsSeat);
        }
    }
    Ok(())
}
