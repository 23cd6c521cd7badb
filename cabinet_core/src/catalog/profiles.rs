//! Aluminum Extrusion Profiles
//!
//! Slotted aluminum profiles used for the cabinet frame. The designation
//! is the cross-section in millimeters (2020 = 20×20 mm).
//!
//! ## Slot Depth
//!
//! Panels sit in the profile slots, so a panel blank is cut larger than the
//! visible opening by one slot depth on each edge.
//!
//! ## Hinge Mounting Offset
//!
//! Hinge plates are screwed to the profile face. Wider profiles move the
//! plate away from the opening by half of the extra face width.

use serde::{Deserialize, Serialize};

/// Frame profile designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProfileType {
    /// 20×20 mm, 6 mm slot
    #[default]
    #[serde(rename = "2020")]
    P2020,
    /// 30×30 mm, 8 mm slot
    #[serde(rename = "3030")]
    P3030,
    /// 40×40 mm, 10 mm slot
    #[serde(rename = "4040")]
    P4040,
}

impl ProfileType {
    /// All profile types for UI selection
    pub const ALL: [ProfileType; 3] = [ProfileType::P2020, ProfileType::P3030, ProfileType::P4040];

    /// Outer cross-section size in millimeters
    pub const fn size_mm(&self) -> f64 {
        match self {
            ProfileType::P2020 => 20.0,
            ProfileType::P3030 => 30.0,
            ProfileType::P4040 => 40.0,
        }
    }

    /// Depth a panel edge sinks into the slot, in millimeters
    pub const fn slot_depth_mm(&self) -> f64 {
        match self {
            ProfileType::P2020 => 6.0,
            ProfileType::P3030 => 8.0,
            ProfileType::P4040 => 10.0,
        }
    }

    /// Added to every hinge's base overlay when mounted on this profile
    pub fn hinge_offset_mm(&self) -> f64 {
        (self.size_mm() - 20.0) / 2.0
    }

    /// Get display name (e.g., "2020")
    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileType::P2020 => "2020",
            ProfileType::P3030 => "3030",
            ProfileType::P4040 => "4040",
        }
    }

    /// Parse a designation such as "2020", "20x20" or "20"
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "").as_str() {
            "2020" | "20x20" | "20" => Some(ProfileType::P2020),
            "3030" | "30x30" | "30" => Some(ProfileType::P3030),
            "4040" | "40x40" | "40" => Some(ProfileType::P4040),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
