//! # Design Documents
//!
//! A `Design` bundles everything needed to compute a cabinet: global
//! parameters, the layout tree and the cutting stock settings, plus
//! versioned metadata. Designs serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Design
//! ├── meta: DesignMetadata (schema version, name, timestamps)
//! ├── params: DesignParams (dimensions, profile, connectors, hinges)
//! ├── layout: LayoutTree (containers, dividers, bays)
//! └── cutting: CuttingSettings (stock length, kerf)
//! ```
//!
//! [`compute`] runs the whole pipeline on a design:
//!
//! ```text
//! layout + params → sizes → BOM (+ hinge) → profile cuts → cutting plan
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::design::{compute, Design};
//!
//! let design = Design::new("Hall cabinet");
//! let output = compute(&design);
//! assert!(output.cutting_plan.total_stock_needed > 0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bom::{consolidate, generate_bom_report, profile_cuts, BomItem};
use crate::cutting::{pack, CuttingPlan, CuttingWarning};
use crate::errors::{CabinetError, CabinetResult};
use crate::hinge::HingeSelection;
use crate::layout::LayoutTree;
use crate::params::{CuttingSettings, DesignParams};
use crate::sizing::{size_tree, SizeMap};
use crate::validation::validate_layout;

/// Current schema version for design files
pub const SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignMetadata {
    /// Schema version this document was written with
    pub version: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Root design document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Design {
    pub meta: DesignMetadata,
    pub params: DesignParams,
    #[serde(default)]
    pub layout: LayoutTree,
    #[serde(default)]
    pub cutting: CuttingSettings,
}

impl Design {
    /// Create a design with default parameters and an empty layout
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Design {
            meta: DesignMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            params: DesignParams::default(),
            layout: LayoutTree::default(),
            cutting: CuttingSettings::default(),
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Parse a design, checking the schema version, parameters and layout.
    pub fn from_json(json: &str) -> CabinetResult<Self> {
        let design: Design = serde_json::from_str(json)?;
        validate_version(&design.meta.version)?;
        design.params.validate()?;
        validate_layout(&design.layout)?;
        Ok(design)
    }

    pub fn to_json(&self) -> CabinetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accept files with the same major version. While the schema is 0.x a
/// file with a newer minor version is rejected.
pub fn validate_version(file_version: &str) -> CabinetResult<()> {
    let mismatch = || CabinetError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

/// Everything computed from one design
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignOutput {
    /// Resolved size of every node, keyed by id (mm)
    pub sizes: SizeMap,
    pub bom: Vec<BomItem>,
    pub hinge: HingeSelection,
    pub cutting_plan: CuttingPlan,
    /// Messages to surface to the user
    pub advisories: Vec<String>,
}

impl DesignOutput {
    /// BOM with identical rows merged, for export
    pub fn consolidated_bom(&self) -> Vec<BomItem> {
        consolidate(&self.bom)
    }
}

/// Run sizing, BOM generation, hinge selection and cutting optimization.
pub fn compute(design: &Design) -> DesignOutput {
    let sized = size_tree(&design.layout, &design.params);
    let report = generate_bom_report(&sized, &design.params);
    let cuts = profile_cuts(&report.items);
    let cutting_plan = pack(&cuts, design.cutting.stock_length, design.cutting.kerf);

    let mut advisories = report.advisories;
    advisories.extend(cutting_plan.warnings.iter().map(|warning| match warning {
        CuttingWarning::OversizedCut { length, stock_length } => format!(
            "A {} mm cut is longer than the {} mm stock bar and cannot be cut from it",
            length, stock_length
        ),
    }));

    info!(
        design = %design.meta.name,
        rows = report.items.len(),
        bars = cutting_plan.total_stock_needed,
        waste_ratio = cutting_plan.waste_ratio,
        advisories = advisories.len(),
        "Computed design"
    );

    DesignOutput {
        sizes: sized.sizes,
        bom: report.items,
        hinge: report.hinge,
        cutting_plan,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BayConfig, LayoutNode, Orientation, SizeSpec};

    fn sample_design() -> Design {
        let mut design = Design::new("Test");
        design.layout = LayoutTree::new(
            Orientation::Horizontal,
            vec![
                LayoutNode::bay("a", SizeSpec::Auto, BayConfig::default()),
                LayoutNode::divider("d", 20.0),
                LayoutNode::bay("b", SizeSpec::Auto, BayConfig::default()),
            ],
        );
        design
    }

    #[test]
    fn test_new_design() {
        let design = Design::new("Kitchen");
        assert_eq!(design.meta.version, SCHEMA_VERSION);
        assert_eq!(design.meta.name, "Kitchen");
        assert_eq!(design.meta.created, design.meta.modified);
    }

    #[test]
    fn test_touch_updates_modified() {
        let mut design = Design::new("Kitchen");
        let before = design.meta.modified;
        design.touch();
        assert!(design.meta.modified >= before);
    }

    #[test]
    fn test_json_roundtrip() {
        let design = sample_design();
        let json = design.to_json().unwrap();
        let loaded = Design::from_json(&json).unwrap();
        assert_eq!(loaded, design);
    }

    #[test]
    fn test_from_json_rejects_bad_layout() {
        let mut design = sample_design();
        design.layout.children.push(LayoutNode::divider("trailing", 20.0));
        let json = serde_json::to_string(&design).unwrap();
        let err = Design::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = Design::from_json("{\"meta\": 3}").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_compute_pipeline() {
        let output = compute(&sample_design());
        // 560 inner width, 20 divider, two autos
        assert_eq!(output.sizes["a"], 270.0);
        assert_eq!(output.sizes["b"], 270.0);
        assert!(output.hinge.success);
        assert!(output.advisories.is_empty());

        let pieces: u32 = profile_cuts(&output.bom).iter().map(|c| c.qty).sum();
        let placed: usize = output.cutting_plan.bars.iter().map(Vec::len).sum();
        assert_eq!(placed, pieces as usize);
    }

    #[test]
    fn test_oversized_cut_becomes_advisory() {
        let mut design = sample_design();
        design.cutting.stock_length = 500.0;
        let output = compute(&design);
        assert!(!output.cutting_plan.is_feasible());
        assert!(output.advisories.iter().any(|a| a.contains("500 mm stock")));
    }
}
