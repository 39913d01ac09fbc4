//! Static feasibility analysis over a validated profile.
//!
//! Runs once per profile load, before any board is attempted. The checks are
//! necessary conditions only: a profile that passes may still exhaust its
//! attempt budget on every board, but a profile that fails can never deal.

use crate::model::seat::{Partnership, Seat};
use crate::model::suit::Suit;
use crate::profile::{DECK_HCP, HAND_SIZE, HandProfile, MAX_HAND_HCP, ProfileError, SubProfile};

/// Card-count and HCP bounds a viability check needs from a subprofile.
///
/// Production subprofiles expose their standard constraints through this
/// trait; test fixtures implement it directly instead of faking the whole
/// profile model.
pub trait ConstraintBounds {
    fn min_cards_for(&self, suit: Suit) -> u8;
    fn max_cards_for(&self, suit: Suit) -> u8;
    fn min_hcp(&self) -> u8;
    fn max_hcp(&self) -> u8;
}

impl ConstraintBounds for SubProfile {
    fn min_cards_for(&self, suit: Suit) -> u8 {
        self.standard().suit(suit).min_cards
    }

    fn max_cards_for(&self, suit: Suit) -> u8 {
        self.standard().suit(suit).max_cards
    }

    fn min_hcp(&self) -> u8 {
        self.standard().total_min_hcp
    }

    fn max_hcp(&self) -> u8 {
        self.standard().total_max_hcp
    }
}

/// A subprofile that could be satisfied by some 13-card hand in isolation.
pub fn individually_viable<B: ConstraintBounds + ?Sized>(bounds: &B) -> bool {
    if bounds.min_hcp() > bounds.max_hcp() || bounds.max_hcp() > MAX_HAND_HCP {
        return false;
    }
    let mut demanded: u32 = 0;
    for suit in Suit::ALL {
        if bounds.min_cards_for(suit) > bounds.max_cards_for(suit) {
            return false;
        }
        demanded += bounds.min_cards_for(suit) as u32;
    }
    demanded <= HAND_SIZE as u32
}

/// Rejects profiles that can never produce a valid deal.
pub fn check_viability(profile: &HandProfile) -> Result<(), ProfileError> {
    for seat in Seat::LOOP {
        let viable = profile
            .seat_profile(seat)
            .subprofiles()
            .iter()
            .any(|sub| individually_viable(sub));
        if !viable {
            return Err(ProfileError::NoViableSubprofile { seat });
        }
    }
    for partnership in Partnership::BOTH {
        check_partnership_coupling(profile, partnership)?;
    }
    check_cross_seat_minimums(profile)
}

/// When same-index coupling is in effect, every index where both partners are
/// individually viable must also be jointly satisfiable suit by suit.
fn check_partnership_coupling(
    profile: &HandProfile,
    partnership: Partnership,
) -> Result<(), ProfileError> {
    let [first, second] = partnership.seats();
    let first_subs = profile.seat_profile(first).subprofiles();
    let second_subs = profile.seat_profile(second).subprofiles();

    let coupled = profile.role_mode(partnership).coupling_enabled()
        || profile.bespoke_map(partnership).is_some();
    if !coupled
        || first_subs.len() < 2
        || second_subs.len() < 2
        || first_subs.len() != second_subs.len()
    {
        return Ok(());
    }

    let mut any_viable_pair = false;
    for (index, (a, b)) in first_subs.iter().zip(second_subs).enumerate() {
        if !individually_viable(a) || !individually_viable(b) {
            continue;
        }
        any_viable_pair = true;
        for suit in Suit::ALL {
            let combined = a.min_cards_for(suit) as u32 + b.min_cards_for(suit) as u32;
            if combined > HAND_SIZE as u32 {
                return Err(ProfileError::JointlyInfeasiblePair {
                    partnership,
                    index,
                    suit,
                });
            }
        }
    }
    if !any_viable_pair {
        return Err(ProfileError::NoJointlyViableIndex { partnership });
    }
    Ok(())
}

/// Best-case combined minimums across all four seats must fit in one deck.
fn check_cross_seat_minimums(profile: &HandProfile) -> Result<(), ProfileError> {
    let mut hcp_floor: u32 = 0;
    let mut suit_floor = [0u32; 4];
    for seat in Seat::LOOP {
        let subs = profile.seat_profile(seat).subprofiles();
        hcp_floor += subs
            .iter()
            .map(|sub| sub.min_hcp() as u32)
            .min()
            .unwrap_or(0);
        for suit in Suit::ALL {
            suit_floor[suit.index()] += subs
                .iter()
                .map(|sub| sub.min_cards_for(suit) as u32)
                .min()
                .unwrap_or(0);
        }
    }
    if hcp_floor > DECK_HCP as u32 {
        return Err(ProfileError::DeckHcpOvercommitted {
            required: hcp_floor,
        });
    }
    for suit in Suit::ALL {
        if suit_floor[suit.index()] > HAND_SIZE as u32 {
            return Err(ProfileError::DeckSuitOvercommitted {
                suit,
                required: suit_floor[suit.index()],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ConstraintBounds, check_viability, individually_viable};
    use crate::model::seat::{Partnership, Seat};
    use crate::model::suit::Suit;
    use crate::profile::{HandProfile, ProfileError};

    /// Minimal fixture standing in for a subprofile's bounds.
    struct FixtureBounds {
        min_cards: [u8; 4],
        max_cards: [u8; 4],
        min_hcp: u8,
        max_hcp: u8,
    }

    impl FixtureBounds {
        fn open() -> Self {
            Self {
                min_cards: [0; 4],
                max_cards: [13; 4],
                min_hcp: 0,
                max_hcp: 37,
            }
        }
    }

    impl ConstraintBounds for FixtureBounds {
        fn min_cards_for(&self, suit: Suit) -> u8 {
            self.min_cards[suit.index()]
        }

        fn max_cards_for(&self, suit: Suit) -> u8 {
            self.max_cards[suit.index()]
        }

        fn min_hcp(&self) -> u8 {
            self.min_hcp
        }

        fn max_hcp(&self) -> u8 {
            self.max_hcp
        }
    }

    #[test]
    fn open_bounds_are_viable() {
        assert!(individually_viable(&FixtureBounds::open()));
    }

    #[test]
    fn fourteen_card_minimum_is_not_viable() {
        let mut fixture = FixtureBounds::open();
        fixture.min_cards = [4, 4, 3, 3];
        assert!(!individually_viable(&fixture));
    }

    #[test]
    fn inverted_hcp_bounds_are_not_viable() {
        let mut fixture = FixtureBounds::open();
        fixture.min_hcp = 20;
        fixture.max_hcp = 10;
        assert!(!individually_viable(&fixture));
    }

    fn profile_from(json: &str) -> HandProfile {
        HandProfile::from_json(json).expect("profile builds")
    }

    #[test]
    fn open_profile_passes() {
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [ { } ] },
                    "E": { "subprofiles": [ { } ] },
                    "S": { "subprofiles": [ { } ] },
                    "W": { "subprofiles": [ { } ] }
                }
            }"#,
        );
        assert!(check_viability(&profile).is_ok());
    }

    #[test]
    fn coupled_pair_demanding_14_spades_is_rejected() {
        // Both NS subprofile pairs are individually fine but demand 7+7
        // spades at every coupled index.
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [
                        { "standard": { "spades": { "min_cards": 7 } } },
                        { "standard": { "spades": { "min_cards": 7 } } }
                    ] },
                    "E": { "subprofiles": [ { } ] },
                    "S": { "subprofiles": [
                        { "standard": { "spades": { "min_cards": 7 } } },
                        { "standard": { "spades": { "min_cards": 7 } } }
                    ] },
                    "W": { "subprofiles": [ { } ] }
                },
                "ns_role_mode": "north_drives"
            }"#,
        );
        let err = check_viability(&profile).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::JointlyInfeasiblePair {
                partnership: Partnership::NorthSouth,
                index: 0,
                suit: Suit::Spades,
            }
        ));
    }

    #[test]
    fn uncoupled_partnership_skips_joint_check() {
        // Same shape demands, but no role mode or bespoke map: per-board
        // selection is independent, so the joint (i,i) rule does not apply.
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [
                        { "standard": { "spades": { "min_cards": 7 } } },
                        { "standard": { "spades": { "min_cards": 7 } } }
                    ] },
                    "E": { "subprofiles": [ { } ] },
                    "S": { "subprofiles": [
                        { "standard": { "spades": { "min_cards": 7 } } },
                        { "standard": { "spades": { "min_cards": 7 } } }
                    ] },
                    "W": { "subprofiles": [ { } ] }
                }
            }"#,
        );
        assert!(check_viability(&profile).is_ok());
    }

    #[test]
    fn seat_with_no_viable_subprofile_is_rejected() {
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [
                        { "standard": {
                            "spades": { "min_cards": 6 },
                            "hearts": { "min_cards": 6 },
                            "diamonds": { "min_cards": 2 }
                        } }
                    ] },
                    "E": { "subprofiles": [ { } ] },
                    "S": { "subprofiles": [ { } ] },
                    "W": { "subprofiles": [ { } ] }
                }
            }"#,
        );
        let err = check_viability(&profile).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::NoViableSubprofile { seat: Seat::North }
        ));
    }

    #[test]
    fn cross_seat_suit_floor_is_enforced() {
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [ { "standard": { "hearts": { "min_cards": 5 } } } ] },
                    "E": { "subprofiles": [ { "standard": { "hearts": { "min_cards": 5 } } } ] },
                    "S": { "subprofiles": [ { "standard": { "hearts": { "min_cards": 2 } } } ] },
                    "W": { "subprofiles": [ { "standard": { "hearts": { "min_cards": 2 } } } ] }
                }
            }"#,
        );
        let err = check_viability(&profile).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::DeckSuitOvercommitted {
                suit: Suit::Hearts,
                required: 14,
            }
        ));
    }

    #[test]
    fn cross_seat_hcp_floor_is_enforced() {
        let profile = profile_from(
            r#"{
                "seats": {
                    "N": { "subprofiles": [ { "standard": { "total_min_hcp": 15 } } ] },
                    "E": { "subprofiles": [ { "standard": { "total_min_hcp": 15 } } ] },
                    "S": { "subprofiles": [ { "standard": { "total_min_hcp": 8 } } ] },
                    "W": { "subprofiles": [ { "standard": { "total_min_hcp": 8 } } ] }
                }
            }"#,
        );
        let err = check_viability(&profile).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::DeckHcpOvercommitted { required: 46 }
        ));
    }
}
