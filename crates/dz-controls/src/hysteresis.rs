//! Vent decision rule with a hysteresis dead-band.
//!
//! The rule is a two-state machine {open, closed}. For temperature-controlled
//! modes the open and close thresholds sit on opposite sides of the target,
//! `tolerance` away from it, so a reading inside the band never changes the
//! vent: only a reading that crosses fully past the opposite threshold can.
//!
//! | mode               | open when                 | close when                 |
//! |--------------------|---------------------------|----------------------------|
//! | `off`              | never                     | always                     |
//! | `fan_only`, `dry`  | always                    | never                      |
//! | `heat`             | `current < target - tol`  | `current >= target + tol`  |
//! | `cool`             | `current > target + tol`  | `current <= target - tol`  |

use crate::mode::HvacMode;
use crate::vent::VentState;

/// Compute the desired vent state.
///
/// `current` is `None` until the first sensor reading arrives; heat and cool
/// then hold `previous` because there is nothing to compare against.
pub fn decide_vent(
    mode: HvacMode,
    target: f64,
    current: Option<f64>,
    tolerance: f64,
    previous: VentState,
) -> VentState {
    match mode {
        HvacMode::Off => VentState::Closed,
        HvacMode::FanOnly | HvacMode::Dry => VentState::Open,
        HvacMode::Heat => {
            let Some(temp) = current else {
                return previous;
            };
            if temp < target - tolerance {
                VentState::Open
            } else if temp >= target + tolerance {
                VentState::Closed
            } else {
                previous
            }
        }
        HvacMode::Cool => {
            let Some(temp) = current else {
                return previous;
            };
            if temp > target + tolerance {
                VentState::Open
            } else if temp <= target - tolerance {
                VentState::Closed
            } else {
                previous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 0.3;

    #[test]
    fn off_always_closes() {
        assert_eq!(
            decide_vent(HvacMode::Off, 22.0, Some(40.0), TOL, VentState::Open),
            VentState::Closed
        );
        assert_eq!(
            decide_vent(HvacMode::Off, 22.0, None, TOL, VentState::Open),
            VentState::Closed
        );
    }

    #[test]
    fn fan_and_dry_always_open() {
        for mode in [HvacMode::FanOnly, HvacMode::Dry] {
            assert_eq!(
                decide_vent(mode, 22.0, None, TOL, VentState::Closed),
                VentState::Open
            );
            assert_eq!(
                decide_vent(mode, 22.0, Some(10.0), TOL, VentState::Closed),
                VentState::Open
            );
        }
    }

    #[test]
    fn heat_thresholds() {
        let heat = |temp, prev| decide_vent(HvacMode::Heat, 22.0, Some(temp), TOL, prev);
        assert_eq!(heat(21.6, VentState::Closed), VentState::Open);
        assert_eq!(heat(22.5, VentState::Open), VentState::Closed);
        // Dead-band holds either state
        assert_eq!(heat(21.8, VentState::Open), VentState::Open);
        assert_eq!(heat(21.8, VentState::Closed), VentState::Closed);
        assert_eq!(heat(22.2, VentState::Open), VentState::Open);
    }

    #[test]
    fn cool_thresholds() {
        let cool = |temp, prev| decide_vent(HvacMode::Cool, 24.0, Some(temp), TOL, prev);
        assert_eq!(cool(24.4, VentState::Closed), VentState::Open);
        assert_eq!(cool(23.6, VentState::Open), VentState::Closed);
        assert_eq!(cool(23.9, VentState::Open), VentState::Open);
        assert_eq!(cool(24.1, VentState::Closed), VentState::Closed);
    }

    #[test]
    fn missing_reading_holds_previous() {
        for prev in [VentState::Open, VentState::Closed] {
            assert_eq!(decide_vent(HvacMode::Heat, 22.0, None, TOL, prev), prev);
            assert_eq!(decide_vent(HvacMode::Cool, 22.0, None, TOL, prev), prev);
        }
    }

    #[test]
    fn zero_tolerance_has_no_dead_band() {
        assert_eq!(
            decide_vent(HvacMode::Heat, 22.0, Some(22.0), 0.0, VentState::Open),
            VentState::Closed
        );
        assert_eq!(
            decide_vent(HvacMode::Cool, 22.0, Some(22.0), 0.0, VentState::Open),
            VentState::Closed
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Once open in heat mode, only a reading at or above target + tol closes it.
        #[test]
        fn heat_open_vent_closes_only_past_upper_threshold(
            target in 16.0_f64..30.0,
            tol in 0.0_f64..2.0,
            readings in prop::collection::vec(10.0_f64..36.0, 1..40),
        ) {
            let mut vent = VentState::Open;
            for temp in readings {
                let next = decide_vent(HvacMode::Heat, target, Some(temp), tol, vent);
                if vent == VentState::Open && next == VentState::Closed {
                    prop_assert!(temp >= target + tol);
                }
                vent = next;
            }
        }

        /// Symmetric property for cool mode.
        #[test]
        fn cool_open_vent_closes_only_past_lower_threshold(
            target in 16.0_f64..30.0,
            tol in 0.0_f64..2.0,
            readings in prop::collection::vec(10.0_f64..36.0, 1..40),
        ) {
            let mut vent = VentState::Open;
            for temp in readings {
                let next = decide_vent(HvacMode::Cool, target, Some(temp), tol, vent);
                if vent == VentState::Open && next == VentState::Closed {
                    prop_assert!(temp <= target - tol);
                }
                vent = next;
            }
        }

        /// Inside the band the previous state always wins.
        #[test]
        fn dead_band_never_flips(
            target in 16.0_f64..30.0,
            tol in 0.1_f64..2.0,
            offset in -0.99_f64..0.99,
            open in any::<bool>(),
        ) {
            let prev = VentState::from_open(open);
            let temp = target + offset * tol;
            prop_assert_eq!(decide_vent(HvacMode::Heat, target, Some(temp), tol, prev), prev);
            prop_assert_eq!(decide_vent(HvacMode::Cool, target, Some(temp), tol, prev), prev);
        }
    }
}
