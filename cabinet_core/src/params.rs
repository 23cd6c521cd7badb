//! # Design Parameters
//!
//! Global manufacturing parameters that apply to the whole cabinet: outer
//! dimensions, which profile and connector the frame is built from, door
//! overlay, panel stock and which side panels are fitted.
//!
//! Width, height, depth and profile type are required. Every other field
//! falls back to zero (or `false`, or the first enum variant) when absent,
//! so a half-filled form still yields a best-effort bill of materials.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "width": 600,
//!   "height": 720,
//!   "depth": 560,
//!   "profile_type": "2020",
//!   "connector_type": "angle_bracket",
//!   "overlay": 14,
//!   "panel_thickness": 4,
//!   "tolerance": 1,
//!   "drawer_style": "overlay",
//!   "panels": { "left": true, "right": true, "back": true, "top": false, "bottom": true }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{ConnectorType, ProfileType};
use crate::errors::{CabinetError, CabinetResult};

/// How drawer fronts relate to the bay opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawerStyle {
    /// Front sits inside the opening
    #[default]
    Inset,
    /// Front covers the opening by the door overlay on each side
    Overlay,
}

/// Which enclosure panels are fitted into the frame slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PanelToggles {
    pub left: bool,
    pub right: bool,
    pub back: bool,
    pub top: bool,
    pub bottom: bool,
}

impl PanelToggles {
    pub fn all() -> Self {
        PanelToggles {
            left: true,
            right: true,
            back: true,
            top: true,
            bottom: true,
        }
    }
}

/// Global cabinet parameters. All lengths in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignParams {
    /// Outer width including the frame
    pub width: f64,
    /// Outer height including the frame
    pub height: f64,
    /// Outer depth including the frame
    pub depth: f64,
    pub profile_type: ProfileType,
    #[serde(default)]
    pub connector_type: ConnectorType,
    /// Desired door overlay, drives hinge selection
    #[serde(default)]
    pub overlay: f64,
    #[serde(default)]
    pub panel_thickness: f64,
    /// Clearance subtracted from every panel blank
    #[serde(default)]
    pub tolerance: f64,
    #[serde(default)]
    pub drawer_style: DrawerStyle,
    #[serde(default)]
    pub panels: PanelToggles,
}

impl Default for DesignParams {
    fn default() -> Self {
        DesignParams {
            width: 600.0,
            height: 720.0,
            depth: 560.0,
            profile_type: ProfileType::P2020,
            connector_type: ConnectorType::AngleBracket,
            overlay: 14.0,
            panel_thickness: 4.0,
            tolerance: 1.0,
            drawer_style: DrawerStyle::Inset,
            panels: PanelToggles::all(),
        }
    }
}

impl DesignParams {
    /// Outer size of the frame profile
    pub fn profile_size(&self) -> f64 {
        self.profile_type.size_mm()
    }

    /// Width between the two pillars
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.profile_size()
    }

    /// Height between top and bottom beams
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.profile_size()
    }

    pub fn inner_depth(&self) -> f64 {
        self.depth - 2.0 * self.profile_size()
    }

    /// Reject dimensions that cannot describe a cabinet.
    ///
    /// BOM generation never calls this; it degrades instead. Front ends use
    /// it to warn before computing.
    pub fn validate(&self) -> CabinetResult<()> {
        let min = 2.0 * self.profile_size();
        for (field, value) in [("width", self.width), ("height", self.height), ("depth", self.depth)] {
            if !value.is_finite() || value <= min {
                return Err(CabinetError::invalid_input(
                    field,
                    value.to_string(),
                    format!("Must exceed twice the profile size ({} mm)", min),
                ));
            }
        }
        for (field, value) in [
            ("overlay", self.overlay),
            ("panel_thickness", self.panel_thickness),
            ("tolerance", self.tolerance),
        ] {
            if !value.is_finite() {
                return Err(CabinetError::invalid_input(field, value.to_string(), "Must be a finite number"));
            }
        }
        if self.panel_thickness < 0.0 {
            return Err(CabinetError::invalid_input(
                "panel_thickness",
                self.panel_thickness.to_string(),
                "Panel thickness cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Stock bar and saw settings for the cutting optimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuttingSettings {
    /// Length of one raw profile bar (mm)
    pub stock_length: f64,
    /// Material lost per saw cut (mm)
    pub kerf: f64,
}

impl Default for CuttingSettings {
    fn default() -> Self {
        CuttingSettings {
            stock_length: 6000.0,
            kerf: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_spans() {
        let params = DesignParams::default();
        assert_eq!(params.inner_width(), 560.0);
        assert_eq!(params.inner_height(), 680.0);
        assert_eq!(params.inner_depth(), 520.0);
    }

    #[test]
    fn test_partial_params_default_to_zero() {
        let json = r#"{"width":800,"height":900,"depth":400,"profile_type":"3030"}"#;
        let params: DesignParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.profile_type, ProfileType::P3030);
        assert_eq!(params.overlay, 0.0);
        assert_eq!(params.panel_thickness, 0.0);
        assert_eq!(params.panels, PanelToggles::default());
        assert_eq!(params.connector_type, ConnectorType::AngleBracket);
    }

    #[test]
    fn test_missing_dimension_rejected() {
        let json = r#"{"width":800,"height":900,"profile_type":"2020"}"#;
        assert!(serde_json::from_str::<DesignParams>(json).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(DesignParams::default().validate().is_ok());
        let params = DesignParams {
            width: 30.0,
            ..DesignParams::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
