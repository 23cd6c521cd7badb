//! Concealed Hinge Catalog
//!
//! Fixed table of cup hinges and their mounting geometry. Each entry pairs a
//! hinge arm with a range of K-values (plate offset from the profile face to
//! the cup center) and a range of on-hinge adjustment.
//!
//! ## Base Overlay
//!
//! For a given entry and K-value the door overlay before adjustment is a
//! straight line:
//!
//! ```text
//! base = overlay_at_zero + overlay_per_k × K + profile offset
//! ```
//!
//! The coefficients differ per arm (straight, medium bend, big bend) and per
//! series, and are taken from the manufacturer's drilling charts.

use serde::{Deserialize, Serialize};

/// Hinge arm crank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HingeArm {
    /// Full overlay, door covers the profile face
    Straight,
    /// Half overlay, two doors share one profile
    MediumBend,
    /// Inset, door sits inside the opening
    BigBend,
}

impl HingeArm {
    pub fn display_name(&self) -> &'static str {
        match self {
            HingeArm::Straight => "Straight",
            HingeArm::MediumBend => "Medium bend",
            HingeArm::BigBend => "Big bend",
        }
    }
}

impl std::fmt::Display for HingeArm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One row of the hinge catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HingeSpec {
    pub id: &'static str,
    pub series: &'static str,
    pub arm: HingeArm,
    pub name: &'static str,
    /// Inclusive K-value range in whole millimeters
    pub k_range: [i32; 2],
    /// Inclusive adjustment range of the hinge's overlay screw, mm
    pub adjustment_range: [f64; 2],
    /// Overlay at K = 0, mm
    #[serde(skip)]
    pub overlay_at_zero: f64,
    /// Overlay gained per millimeter of K
    #[serde(skip)]
    pub overlay_per_k: f64,
}

impl HingeSpec {
    /// Door overlay produced by this hinge at `k` before any adjustment
    pub fn base_overlay(&self, k: i32, profile_offset_mm: f64) -> f64 {
        self.overlay_at_zero + self.overlay_per_k * f64::from(k) + profile_offset_mm
    }

    /// Every K-value this hinge accepts, ascending
    pub fn k_values(&self) -> impl Iterator<Item = i32> {
        self.k_range[0]..=self.k_range[1]
    }
}

/// The full catalog in search order.
pub static HINGE_CATALOG: [HingeSpec; 5] = [
    HingeSpec {
        id: "C80-S",
        series: "C80",
        arm: HingeArm::Straight,
        name: "C80 Full Overlay",
        k_range: [3, 6],
        adjustment_range: [-2.0, 2.0],
        overlay_at_zero: 10.0,
        overlay_per_k: 1.0,
    },
    HingeSpec {
        id: "C80-M",
        series: "C80",
        arm: HingeArm::MediumBend,
        name: "C80 Half Overlay",
        k_range: [3, 6],
        adjustment_range: [-2.0, 2.0],
        overlay_at_zero: 3.5,
        overlay_per_k: 0.9,
    },
    HingeSpec {
        id: "C80-B",
        series: "C80",
        arm: HingeArm::BigBend,
        name: "C80 Inset",
        k_range: [3, 6],
        adjustment_range: [-2.0, 2.0],
        overlay_at_zero: -8.6,
        overlay_per_k: 1.1,
    },
    HingeSpec {
        id: "C25-S",
        series: "Cover25",
        arm: HingeArm::Straight,
        name: "Cover25 Full Overlay",
        k_range: [3, 7],
        adjustment_range: [-2.0, 2.0],
        overlay_at_zero: 19.0,
        overlay_per_k: 1.0,
    },
    HingeSpec {
        id: "C25-M",
        series: "Cover25",
        arm: HingeArm::MediumBend,
        name: "Cover25 Half Overlay",
        k_range: [3, 7],
        adjustment_range: [-2.0, 2.0],
        overlay_at_zero: 12.0,
        overlay_per_k: 0.9,
    },
];

/// Look up a catalog entry by id
pub fn hinge_by_id(id: &str) -> Option<&'static HingeSpec> {
    HINGE_CATALOG.iter().find(|h| h.id == id)
}
