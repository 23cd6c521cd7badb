//! # Cutting Optimization
//!
//! Packs profile cuts into fixed-length stock bars with First-Fit-Decreasing.
//!
//! ## Algorithm
//!
//! 1. Expand every `{length, qty}` request into individual cuts.
//! 2. Sort cuts longest first.
//! 3. Put each cut into the first bar, in the order bars were opened, that
//!    still has room for it plus one saw kerf (no kerf before the first cut
//!    in a bar). Otherwise open a new bar.
//!
//! A bar's used length is `Σ cuts + (count − 1) × kerf`.
//!
//! FFD is a heuristic; it does not promise the minimum bar count.
//!
//! A cut longer than the stock gets a bar of its own and an
//! [`CuttingWarning::OversizedCut`] entry, since no real bar can supply it.
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::cutting::{pack, CutRequest};
//!
//! let plan = pack(&[CutRequest::new(1000.0, 2), CutRequest::new(2000.0, 1)], 6000.0, 5.0);
//! assert_eq!(plan.total_stock_needed, 1);
//! assert_eq!(plan.bars[0], vec![2000.0, 1000.0, 1000.0]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A required cut length and how many pieces of it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutRequest {
    pub length: f64,
    pub qty: u32,
}

impl CutRequest {
    pub fn new(length: f64, qty: u32) -> Self {
        CutRequest { length, qty }
    }
}

/// Something the plan could not honor on real stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CuttingWarning {
    /// The cut exceeds the stock length and sits alone in an unsatisfiable bar
    OversizedCut { length: f64, stock_length: f64 },
}

/// Cuts grouped per stock bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CuttingPlan {
    /// Cut lengths per bar, in placement order
    pub bars: Vec<Vec<f64>>,
    /// Number of stock bars needed
    pub total_stock_needed: usize,
    /// `1 − Σ cuts / (bars × stock)`; 0 when no bar is used
    pub waste_ratio: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CuttingWarning>,
}

impl CuttingPlan {
    /// Sum of every cut length in the plan
    pub fn total_cut_length(&self) -> f64 {
        self.bars.iter().flatten().sum()
    }

    /// Length left on each bar after its cuts and kerfs
    pub fn offcuts(&self, stock_length: f64, kerf: f64) -> Vec<f64> {
        self.bars
            .iter()
            .map(|bar| stock_length - used_length(bar, kerf))
            .collect()
    }

    pub fn is_feasible(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Length of a bar consumed by its cuts plus the kerf between them
pub fn used_length(bar: &[f64], kerf: f64) -> f64 {
    let cuts: f64 = bar.iter().sum();
    if bar.is_empty() {
        0.0
    } else {
        cuts + (bar.len() - 1) as f64 * kerf
    }
}

/// Pack `items` into bars of `stock_length`, losing `kerf` per cut.
pub fn pack(items: &[CutRequest], stock_length: f64, kerf: f64) -> CuttingPlan {
    let mut cuts: Vec<f64> = items
        .iter()
        .flat_map(|item| std::iter::repeat(item.length).take(item.qty as usize))
        .collect();
    cuts.sort_by(|a, b| b.total_cmp(a));

    let mut bars: Vec<Vec<f64>> = Vec::new();
    let mut used: Vec<f64> = Vec::new();
    let mut warnings = Vec::new();

    for cut in cuts {
        let slot = bars.iter().zip(&used).position(|(bar, &u)| {
            let gap = if bar.is_empty() { 0.0 } else { kerf };
            u + gap + cut <= stock_length
        });
        match slot {
            Some(idx) => {
                used[idx] += kerf + cut;
                bars[idx].push(cut);
            }
            None => {
                if cut > stock_length {
                    warn!(length = cut, stock_length, "Cut is longer than stock bar");
                    warnings.push(CuttingWarning::OversizedCut {
                        length: cut,
                        stock_length,
                    });
                }
                used.push(cut);
                bars.push(vec![cut]);
            }
        }
    }

    let total_stock_needed = bars.len();
    let total_cut: f64 = bars.iter().flatten().sum();
    let waste_ratio = if total_stock_needed == 0 || stock_length <= 0.0 {
        0.0
    } else {
        1.0 - total_cut / (total_stock_needed as f64 * stock_length)
    };

    debug!(bars = total_stock_needed, waste_ratio, "Packed cutting plan");

    CuttingPlan {
        bars,
        total_stock_needed,
        waste_ratio,
        warnings,
    }
}
