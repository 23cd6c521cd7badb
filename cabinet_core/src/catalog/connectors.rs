//! Frame Corner Connectors
//!
//! The connector joining a beam end to a pillar decides how much shorter
//! than the opening the beam must be cut. Brackets that sit inside the slot
//! need no deduction; spacer blocks sit between the beam end and the pillar.

use serde::{Deserialize, Serialize};

/// Static description of a connector type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSpec {
    /// Name used on BOM rows
    pub display_name: &'static str,
    /// Length removed from each beam end, in millimeters
    pub deduction_mm: f64,
}

/// Connector used at the frame corners and shelf beams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorType {
    /// L-shaped bracket bolted into both slots
    #[default]
    AngleBracket,
    /// Hidden bracket inserted into the slot ends
    HiddenCorner,
    /// Cast block between beam end and pillar face
    SpacerBlock,
}

const ANGLE_BRACKET: ConnectorSpec = ConnectorSpec {
    display_name: "Angle Bracket",
    deduction_mm: 0.0,
};

const HIDDEN_CORNER: ConnectorSpec = ConnectorSpec {
    display_name: "Hidden Corner Connector",
    deduction_mm: 0.0,
};

const SPACER_BLOCK: ConnectorSpec = ConnectorSpec {
    display_name: "Spacer Block Connector",
    deduction_mm: 2.0,
};

impl ConnectorType {
    pub const ALL: [ConnectorType; 3] = [
        ConnectorType::AngleBracket,
        ConnectorType::HiddenCorner,
        ConnectorType::SpacerBlock,
    ];

    pub const fn spec(&self) -> ConnectorSpec {
        match self {
            ConnectorType::AngleBracket => ANGLE_BRACKET,
            ConnectorType::HiddenCorner => HIDDEN_CORNER,
            ConnectorType::SpacerBlock => SPACER_BLOCK,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.spec().display_name
    }

    /// Length removed from each end of a beam, in millimeters
    pub fn deduction_mm(&self) -> f64 {
        self.spec().deduction_mm
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
