//! # Hardware Catalog
//!
//! Compile-time tables of the hardware the engine designs with. Nothing in
//! here is built at runtime.
//!
//! - [`profiles`] - Aluminum frame profiles (size, slot depth)
//! - [`connectors`] - Corner connectors and their beam deductions
//! - [`hinges`] - Concealed hinges with K-value geometry

pub mod connectors;
pub mod hinges;
pub mod profiles;

pub use connectors::{ConnectorSpec, ConnectorType};
pub use hinges::{hinge_by_id, HingeArm, HingeSpec, HINGE_CATALOG};
pub use profiles::ProfileType;
