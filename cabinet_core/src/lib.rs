//! # cabinet_core - Parametric Cabinet Engine
//!
//! `cabinet_core` turns a declarative description of a cabinet (outer
//! dimensions, aluminum profile system, and a tree of bays, dividers and
//! nested containers) into everything needed to build it: resolved bay sizes,
//! a bill of materials, a concealed-hinge choice and a stock-bar cutting plan.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from input to result; edits return new trees
//! - **JSON-First**: All inputs and outputs implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Best Effort**: A half-finished design still produces a BOM
//!
//! ## Quick Start
//!
//! ```rust
//! use cabinet_core::design::{compute, Design};
//! use cabinet_core::editing::{add_shelf, append_item};
//!
//! let mut design = Design::new("Hallway");
//! let layout = append_item(&design.layout, None, 20.0).unwrap();
//! let layout = append_item(&layout, None, 20.0).unwrap();
//! let bay = layout.children[0].id().to_string();
//! design.layout = add_shelf(&layout, &bay, 320.0).unwrap();
//!
//! let output = compute(&design);
//! println!("{} bars of stock", output.cutting_plan.total_stock_needed);
//! ```
//!
//! ## Modules
//!
//! - [`layout`] - Layout tree: containers, dividers, bays
//! - [`validation`] - Parsing and structural validation of layouts
//! - [`sizing`] - Fixed/auto size resolution
//! - [`divider`] - Divider drag preview and commit
//! - [`editing`] - Shelf, drawer, door and node edits
//! - [`hinge`] - Hinge and K-value selection
//! - [`bom`] - Bill of materials
//! - [`cutting`] - First-fit-decreasing stock cutting
//! - [`catalog`] - Profile, connector and hinge tables
//! - [`params`] - Global cabinet parameters
//! - [`design`] - Design documents and the full pipeline
//! - [`errors`] - Structured error types

pub mod bom;
pub mod catalog;
pub mod cutting;
pub mod design;
pub mod divider;
pub mod editing;
pub mod errors;
pub mod hinge;
pub mod layout;
pub mod params;
pub mod sizing;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use bom::{generate_bom, BomItem};
pub use catalog::{ConnectorType, ProfileType};
pub use cutting::{pack, CutRequest, CuttingPlan};
pub use design::{compute, Design, DesignOutput};
pub use divider::{commit_divider_move, preview_divider_move, resolve_divider_move, MIN_SIZE};
pub use errors::{CabinetError, CabinetResult};
pub use hinge::{select_hinge, HingeSelection};
pub use layout::{LayoutNode, LayoutTree, SizeSpec};
pub use params::{CuttingSettings, DesignParams};
pub use sizing::resolve_sizes;
