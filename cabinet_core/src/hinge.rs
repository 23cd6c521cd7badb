//! # Hinge Selection
//!
//! Finds the catalog hinge and K-value that produce a requested door
//! overlay with the least screw adjustment.
//!
//! Every `(hinge, K)` pair in the catalog is tried. A pair is feasible when
//! `desired − base_overlay` lies inside the hinge's adjustment range. The
//! feasible pair with the smallest absolute adjustment wins; ties go to the
//! earlier catalog entry, then the lower K.
//!
//! The search never fails loudly: when nothing fits, the result carries
//! `success = false` and a message naming the overlay that was asked for.
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::catalog::ProfileType;
//! use cabinet_core::hinge::select_hinge;
//!
//! let result = select_hinge(ProfileType::P2020, 14.0);
//! assert!(result.success);
//! assert_eq!(result.hinge.unwrap().series, "C80");
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{HingeSpec, ProfileType, HINGE_CATALOG};

/// Slack on the adjustment-range bounds for floating point noise in the
/// base-overlay line
const RANGE_EPSILON: f64 = 1e-9;

/// One feasible `(hinge, K)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HingeCandidate {
    pub hinge: &'static HingeSpec,
    pub k: i32,
    /// Overlay at this K before adjustment (mm)
    pub base_overlay: f64,
    /// Adjustment needed to reach the requested overlay (mm, one decimal)
    pub adjustment: f64,
}

/// Result of a hinge search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HingeSelection {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hinge: Option<&'static HingeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_overlay: Option<f64>,
    pub message: String,
}

impl HingeSelection {
    fn found(candidate: HingeCandidate, profile: ProfileType, desired: f64) -> Self {
        let h = candidate.hinge;
        HingeSelection {
            success: true,
            hinge: Some(h),
            k: Some(candidate.k),
            adjustment: Some(candidate.adjustment),
            base_overlay: Some(candidate.base_overlay),
            message: format!(
                "{} ({} series, {} arm) at K={} with {:+.1} mm adjustment gives {} mm overlay on {} profile",
                h.name, h.series, h.arm, candidate.k, candidate.adjustment, desired, profile
            ),
        }
    }

    fn exhausted(profile: ProfileType, desired: f64) -> Self {
        HingeSelection {
            success: false,
            hinge: None,
            k: None,
            adjustment: None,
            base_overlay: None,
            message: format!(
                "No hinge reaches {} mm overlay on {} profile; searched all {} catalog hinges over their full K and adjustment ranges",
                desired,
                profile,
                HINGE_CATALOG.len()
            ),
        }
    }
}

/// Pick the hinge needing the least adjustment for `desired_overlay` (mm).
///
/// Pairs are compared on the exact adjustment; only the reported values are
/// rounded to one decimal.
pub fn select_hinge(profile: ProfileType, desired_overlay: f64) -> HingeSelection {
    let mut best: Option<FeasiblePair> = None;
    for pair in feasible_pairs(profile, desired_overlay) {
        let better = match &best {
            Some(b) => pair.required.abs() < b.required.abs(),
            None => true,
        };
        if better {
            best = Some(pair);
        }
    }

    match best {
        Some(pair) => {
            debug!(
                hinge = pair.hinge.id,
                k = pair.k,
                required = pair.required,
                "Selected hinge"
            );
            HingeSelection::found(pair.rounded(), profile, desired_overlay)
        }
        None => {
            warn!(overlay = desired_overlay, profile = %profile, "No hinge fits requested overlay");
            HingeSelection::exhausted(profile, desired_overlay)
        }
    }
}

/// All feasible pairs, best first (stable on ties).
pub fn hinge_candidates(profile: ProfileType, desired_overlay: f64) -> Vec<HingeCandidate> {
    let mut pairs: Vec<FeasiblePair> = feasible_pairs(profile, desired_overlay).collect();
    pairs.sort_by(|a, b| a.required.abs().total_cmp(&b.required.abs()));
    pairs.iter().map(FeasiblePair::rounded).collect()
}

/// A feasible pair before rounding; comparisons use the exact adjustment
struct FeasiblePair {
    hinge: &'static HingeSpec,
    k: i32,
    base_overlay: f64,
    required: f64,
}

impl FeasiblePair {
    fn rounded(&self) -> HingeCandidate {
        HingeCandidate {
            hinge: self.hinge,
            k: self.k,
            base_overlay: round_tenth(self.base_overlay),
            adjustment: round_tenth(self.required),
        }
    }
}

fn feasible_pairs(profile: ProfileType, desired: f64) -> impl Iterator<Item = FeasiblePair> {
    let offset = profile.hinge_offset_mm();
    HINGE_CATALOG.iter().flat_map(move |hinge| {
        hinge
            .k_values()
            .filter_map(move |k| evaluate(hinge, k, offset, desired))
    })
}

fn evaluate(hinge: &'static HingeSpec, k: i32, offset: f64, desired: f64) -> Option<FeasiblePair> {
    let base_overlay = hinge.base_overlay(k, offset);
    let required = desired - base_overlay;
    let [min, max] = hinge.adjustment_range;
    if required < min - RANGE_EPSILON || required > max + RANGE_EPSILON {
        return None;
    }
    Some(FeasiblePair {
        hinge,
        k,
        base_overlay,
        required,
    })
}

/// Round to one decimal place; `+ 0.0` folds negative zero into zero
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0 + 0.0
}
