use crate::model::seat::{Partnership, Seat};
use crate::model::suit::Suit;
use crate::profile::constraint::{ContingentSuit, SpecialConstraint};
use crate::profile::error::ProfileError;
use crate::profile::seat_profile::SeatProfile;
use crate::profile::subprofile::SubProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index-coupling behaviour for one partnership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMode {
    /// Both seats sample their subprofile independently.
    Independent,
    /// The named seat always drives; its partner follows.
    Drives(Seat),
    /// The driver is re-rolled uniformly between the partners each board.
    RandomDriver,
}

impl RoleMode {
    pub const fn coupling_enabled(self) -> bool {
        !matches!(self, RoleMode::Independent)
    }
}

/// Explicit driver-index to follower-indices mapping overriding the default
/// same-index coupling rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BespokeMap {
    entries: BTreeMap<usize, Vec<usize>>,
}

impl BespokeMap {
    pub fn new(entries: BTreeMap<usize, Vec<usize>>) -> Self {
        Self { entries }
    }

    pub fn followers(&self, driver_index: usize) -> Option<&[usize]> {
        self.entries.get(&driver_index).map(Vec::as_slice)
    }

    fn validate(&self, driver_count: usize, follower_count: usize) -> Result<(), String> {
        for driver_index in 0..driver_count {
            match self.entries.get(&driver_index) {
                None => {
                    return Err(format!("driver index {driver_index} has no mapping"));
                }
                Some(followers) if followers.is_empty() => {
                    return Err(format!("driver index {driver_index} maps to no follower indices"));
                }
                Some(followers) => {
                    for follower in followers {
                        if *follower >= follower_count {
                            return Err(format!(
                                "driver index {driver_index} maps to follower index {follower} but only {follower_count} subprofiles exist"
                            ));
                        }
                    }
                }
            }
        }
        for driver_index in self.entries.keys() {
            if *driver_index >= driver_count {
                return Err(format!(
                    "map declares driver index {driver_index} but only {driver_count} subprofiles exist"
                ));
            }
        }
        Ok(())
    }
}

/// Removes one (seat, subprofile) pairing from selection before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub seat: Seat,
    pub subprofile: usize,
}

/// A fully validated deal-generation profile: one `SeatProfile` per seat plus
/// dealing order, role coupling, and exclusion metadata. Read-only once
/// constructed; a single profile drives an entire multi-board run.
#[derive(Debug, Clone, PartialEq)]
pub struct HandProfile {
    name: Option<String>,
    seats: [SeatProfile; 4],
    dealing_order: [Seat; 4],
    ns_role_mode: RoleMode,
    ew_role_mode: RoleMode,
    ns_bespoke_map: Option<BespokeMap>,
    ew_bespoke_map: Option<BespokeMap>,
    exclusions: Vec<ExclusionRule>,
}

impl HandProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Option<String>,
        seats: [SeatProfile; 4],
        dealing_order: [Seat; 4],
        ns_role_mode: RoleMode,
        ew_role_mode: RoleMode,
        ns_bespoke_map: Option<BespokeMap>,
        ew_bespoke_map: Option<BespokeMap>,
        exclusions: Vec<ExclusionRule>,
    ) -> Result<Self, ProfileError> {
        for (index, seat_profile) in seats.iter().enumerate() {
            debug_assert!(
                seat_profile.seat().index() == index,
                "seat profile for {} placed at slot {index}",
                seat_profile.seat()
            );
        }
        let profile = Self {
            name,
            seats,
            dealing_order,
            ns_role_mode,
            ew_role_mode,
            ns_bespoke_map,
            ew_bespoke_map,
            exclusions,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn seat_profile(&self, seat: Seat) -> &SeatProfile {
        &self.seats[seat.index()]
    }

    pub fn dealing_order(&self) -> &[Seat; 4] {
        &self.dealing_order
    }

    pub fn role_mode(&self, partnership: Partnership) -> RoleMode {
        match partnership {
            Partnership::NorthSouth => self.ns_role_mode,
            Partnership::EastWest => self.ew_role_mode,
        }
    }

    pub fn bespoke_map(&self, partnership: Partnership) -> Option<&BespokeMap> {
        match partnership {
            Partnership::NorthSouth => self.ns_bespoke_map.as_ref(),
            Partnership::EastWest => self.ew_bespoke_map.as_ref(),
        }
    }

    pub fn exclusions(&self) -> &[ExclusionRule] {
        &self.exclusions
    }

    pub fn is_excluded(&self, seat: Seat, subprofile: usize) -> bool {
        self.exclusions
            .iter()
            .any(|rule| rule.seat == seat && rule.subprofile == subprofile)
    }

    fn dealing_position(&self, seat: Seat) -> usize {
        self.dealing_order
            .iter()
            .position(|s| *s == seat)
            .unwrap_or(usize::MAX)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        self.validate_dealing_order()?;
        for seat in Seat::LOOP {
            let seat_profile = self.seat_profile(seat);
            for (index, sub) in seat_profile.subprofiles().iter().enumerate() {
                self.validate_subprofile(seat, index, sub)?;
            }
        }
        for partnership in Partnership::BOTH {
            self.validate_role_mode(partnership)?;
            self.validate_bespoke_map(partnership)?;
        }
        for rule in &self.exclusions {
            if rule.subprofile >= self.seat_profile(rule.seat).len() {
                return Err(ProfileError::InvalidExclusion {
                    seat: rule.seat,
                    subprofile: rule.subprofile,
                });
            }
        }
        Ok(())
    }

    fn validate_dealing_order(&self) -> Result<(), ProfileError> {
        for seat in Seat::LOOP {
            let occurrences = self.dealing_order.iter().filter(|s| **s == seat).count();
            if occurrences != 1 {
                return Err(ProfileError::InvalidDealingOrder {
                    detail: format!("{seat} appears {occurrences} times"),
                });
            }
        }
        Ok(())
    }

    fn validate_subprofile(
        &self,
        seat: Seat,
        index: usize,
        sub: &SubProfile,
    ) -> Result<(), ProfileError> {
        for suit in Suit::ALL {
            sub.standard().suit(suit).validate().map_err(|detail| {
                ProfileError::InvalidSuitRange {
                    seat,
                    subprofile: index,
                    detail,
                }
            })?;
        }
        if !sub.standard().total_hcp_valid() {
            return Err(ProfileError::InvalidTotalHcp {
                seat,
                subprofile: index,
            });
        }
        match sub.special() {
            None => Ok(()),
            Some(SpecialConstraint::RandomSuit(random_suit)) => {
                random_suit
                    .validate()
                    .map_err(|detail| ProfileError::InvalidRandomSuit {
                        seat,
                        subprofile: index,
                        detail,
                    })
            }
            Some(SpecialConstraint::PartnerContingent(contingent)) => {
                if contingent.target_seat != seat.partner() {
                    return Err(ProfileError::InvalidContingent {
                        seat,
                        subprofile: index,
                        detail: format!(
                            "partner-contingent constraint targets {} which is not {seat}'s partner",
                            contingent.target_seat
                        ),
                    });
                }
                self.validate_contingent(seat, index, contingent)
            }
            Some(SpecialConstraint::OpponentContingent(contingent)) => {
                if contingent.target_seat.partnership() == seat.partnership() {
                    return Err(ProfileError::InvalidContingent {
                        seat,
                        subprofile: index,
                        detail: format!(
                            "opponent-contingent constraint targets {} which is not an opponent of {seat}",
                            contingent.target_seat
                        ),
                    });
                }
                self.validate_contingent(seat, index, contingent)
            }
        }
    }

    fn validate_contingent(
        &self,
        seat: Seat,
        index: usize,
        contingent: &ContingentSuit,
    ) -> Result<(), ProfileError> {
        contingent
            .suit_range
            .validate()
            .map_err(|detail| ProfileError::InvalidContingent {
                seat,
                subprofile: index,
                detail,
            })?;
        let target = contingent.target_seat;
        if self.dealing_position(target) >= self.dealing_position(seat) {
            return Err(ProfileError::ContingentOrdering {
                dependent: seat,
                target,
            });
        }
        if contingent.use_non_chosen_suit {
            let random_suit_subs: Vec<_> = self
                .seat_profile(target)
                .subprofiles()
                .iter()
                .filter_map(SubProfile::random_suit)
                .collect();
            if random_suit_subs.is_empty()
                || random_suit_subs.iter().any(|constraint| constraint.surplus() != 1)
            {
                return Err(ProfileError::NonChosenSuitSurplus {
                    dependent: seat,
                    target,
                });
            }
        }
        Ok(())
    }

    fn validate_role_mode(&self, partnership: Partnership) -> Result<(), ProfileError> {
        if let RoleMode::Drives(seat) = self.role_mode(partnership) {
            if !partnership.contains(seat) {
                return Err(ProfileError::InvalidRoleMode {
                    partnership,
                    value: format!("{seat} cannot drive for {partnership}"),
                });
            }
        }
        Ok(())
    }

    fn validate_bespoke_map(&self, partnership: Partnership) -> Result<(), ProfileError> {
        let Some(map) = self.bespoke_map(partnership) else {
            return Ok(());
        };
        let drivers: Vec<Seat> = match self.role_mode(partnership) {
            RoleMode::Drives(seat) => vec![seat],
            RoleMode::RandomDriver => partnership.seats().to_vec(),
            // The map is inert for selection without a role mode but still
            // participates in viability coupling; hold it to the same shape
            // rules from the first seat's point of view.
            RoleMode::Independent => vec![partnership.seats()[0]],
        };
        for driver in drivers {
            let driver_count = self.seat_profile(driver).len();
            let follower_count = self.seat_profile(driver.partner()).len();
            map.validate(driver_count, follower_count)
                .map_err(|detail| ProfileError::InvalidBespokeMap {
                    partnership,
                    detail,
                })?;
        }
        Ok(())
    }
}
