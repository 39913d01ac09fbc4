use crate::model::seat::Seat;
use crate::profile::error::ProfileError;
use crate::profile::subprofile::SubProfile;

/// Normalized weights sum to this many tenths of a percent.
const WEIGHT_SCALE: u32 = 1000;
/// Declared sums within this distance of 100% are rescaled instead of
/// rejected.
const WEIGHT_TOLERANCE_TENTHS: u32 = 20;

/// A seat's ordered constraint alternatives with normalized weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatProfile {
    seat: Seat,
    subprofiles: Vec<SubProfile>,
}

impl SeatProfile {
    /// Builds a seat profile, normalizing declared weights: an all-zero
    /// declaration auto-equalizes, a sum within +/- 2 percent of 100 is
    /// rescaled to exactly 100, anything else is rejected.
    pub fn new(seat: Seat, mut subprofiles: Vec<SubProfile>) -> Result<Self, ProfileError> {
        if subprofiles.is_empty() {
            return Err(ProfileError::EmptySeat { seat });
        }
        normalize_weights(seat, &mut subprofiles)?;
        Ok(Self { seat, subprofiles })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn subprofiles(&self) -> &[SubProfile] {
        &self.subprofiles
    }

    pub fn len(&self) -> usize {
        self.subprofiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subprofiles.is_empty()
    }
}

fn normalize_weights(seat: Seat, subprofiles: &mut [SubProfile]) -> Result<(), ProfileError> {
    let declared: u32 = subprofiles
        .iter()
        .map(|sub| sub.weight_tenths() as u32)
        .sum();

    if declared == 0 {
        let count = subprofiles.len() as u32;
        let base = WEIGHT_SCALE / count;
        let leftover = (WEIGHT_SCALE % count) as usize;
        for (index, sub) in subprofiles.iter_mut().enumerate() {
            let bonus = if index < leftover { 1 } else { 0 };
            sub.set_weight_tenths((base + bonus) as u16);
        }
        return Ok(());
    }

    if declared.abs_diff(WEIGHT_SCALE) > WEIGHT_TOLERANCE_TENTHS {
        return Err(ProfileError::WeightSum {
            seat,
            declared_tenths: declared,
        });
    }

    if declared != WEIGHT_SCALE {
        rescale(subprofiles, declared);
    }
    Ok(())
}

/// Largest-remainder rescale onto WEIGHT_SCALE, so the result is exact and
/// independent of floating-point rounding.
fn rescale(subprofiles: &mut [SubProfile], declared: u32) {
    let mut assigned = 0u32;
    let mut remainders: Vec<(usize, u32)> = Vec::with_capacity(subprofiles.len());
    for (index, sub) in subprofiles.iter_mut().enumerate() {
        let scaled = sub.weight_tenths() as u32 * WEIGHT_SCALE;
        let quotient = scaled / declared;
        remainders.push((index, scaled % declared));
        assigned += quotient;
        sub.set_weight_tenths(quotient as u16);
    }
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut shortfall = WEIGHT_SCALE - assigned;
    for (index, _) in remainders {
        if shortfall == 0 {
            break;
        }
        let current = subprofiles[index].weight_tenths();
        subprofiles[index].set_weight_tenths(current + 1);
        shortfall -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::SeatProfile;
    use crate::model::seat::Seat;
    use crate::profile::error::ProfileError;
    use crate::profile::subprofile::SubProfile;

    fn weights(profile: &SeatProfile) -> Vec<u16> {
        profile
            .subprofiles()
            .iter()
            .map(|sub| sub.weight_tenths())
            .collect()
    }

    #[test]
    fn empty_seat_is_rejected() {
        let err = SeatProfile::new(Seat::North, Vec::new()).unwrap_err();
        assert!(matches!(err, ProfileError::EmptySeat { seat: Seat::North }));
    }

    #[test]
    fn all_zero_weights_equalize() {
        let profile = SeatProfile::new(
            Seat::East,
            vec![SubProfile::open(0), SubProfile::open(0), SubProfile::open(0)],
        )
        .unwrap();
        assert_eq!(weights(&profile), vec![334, 333, 333]);
    }

    #[test]
    fn sum_inside_tolerance_is_rescaled_to_exactly_100() {
        let profile = SeatProfile::new(
            Seat::South,
            vec![SubProfile::open(505), SubProfile::open(505)],
        )
        .unwrap();
        assert_eq!(weights(&profile), vec![500, 500]);
        let total: u32 = weights(&profile).iter().map(|w| *w as u32).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn sum_outside_tolerance_is_rejected() {
        let err = SeatProfile::new(
            Seat::West,
            vec![SubProfile::open(500), SubProfile::open(550)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::WeightSum {
                seat: Seat::West,
                declared_tenths: 1050,
            }
        ));
    }

    #[test]
    fn exact_sum_is_left_untouched() {
        let profile = SeatProfile::new(
            Seat::North,
            vec![SubProfile::open(700), SubProfile::open(300)],
        )
        .unwrap();
        assert_eq!(weights(&profile), vec![700, 300]);
    }
}
