//! # Layout Validation
//!
//! Accepts a JSON layout only after checking both its shape (serde, with
//! unknown fields rejected) and the structural rules serde cannot express:
//!
//! - ids are non-empty and unique across nodes, shelves and drawers
//! - divider thickness is finite and positive; fixed sizes finite and ≥ 0
//! - in each sibling list dividers only sit between two non-divider nodes
//! - nesting stays within [`MAX_DEPTH`]
//! - shelves and drawers have non-negative offsets, drawers positive height

use std::collections::HashSet;

use crate::errors::{CabinetError, CabinetResult};
use crate::layout::{ItemContent, LayoutNode, LayoutTree, SizeSpec};
use crate::sizing::MAX_DEPTH;

/// Parse and validate a layout tree from JSON.
///
/// # Example
///
/// ```rust
/// use cabinet_core::validation::parse_layout;
///
/// let json = r#"{"children":[{"type":"divider","id":"d","thickness":20}]}"#;
/// let err = parse_layout(json).unwrap_err();
/// assert_eq!(err.error_code(), "VALIDATION_FAILED");
/// ```
pub fn parse_layout(json: &str) -> CabinetResult<LayoutTree> {
    let tree: LayoutTree = serde_json::from_str(json).map_err(CabinetError::serialization)?;
    validate_layout(&tree)?;
    Ok(tree)
}

/// Check the structural rules of a layout tree.
pub fn validate_layout(tree: &LayoutTree) -> CabinetResult<()> {
    let mut seen = HashSet::new();
    validate_list(&tree.children, "children", 0, &mut seen)
}

fn validate_list<'a>(
    nodes: &'a [LayoutNode],
    path: &str,
    depth: usize,
    seen: &mut HashSet<&'a str>,
) -> CabinetResult<()> {
    if depth >= MAX_DEPTH {
        return Err(CabinetError::validation(
            path,
            format!("Nesting exceeds {} levels", MAX_DEPTH),
        ));
    }

    if let Some(first) = nodes.first() {
        if first.is_divider() {
            return Err(CabinetError::validation(format!("{}[0]", path), "List starts with a divider"));
        }
    }
    if let Some(last) = nodes.last() {
        if last.is_divider() {
            return Err(CabinetError::validation(
                format!("{}[{}]", path, nodes.len() - 1),
                "List ends with a divider",
            ));
        }
    }

    for (idx, node) in nodes.iter().enumerate() {
        let here = format!("{}[{}]", path, idx);
        register_id(node.id(), &here, seen)?;

        if idx > 0 && node.is_divider() && nodes[idx - 1].is_divider() {
            return Err(CabinetError::validation(here, "Two adjacent dividers"));
        }

        match node {
            LayoutNode::Divider(d) => {
                if !d.thickness.is_finite() || d.thickness <= 0.0 {
                    return Err(CabinetError::validation(
                        here,
                        format!("Divider thickness must be positive, got {}", d.thickness),
                    ));
                }
            }
            LayoutNode::Item(item) => {
                check_size(item.size, &here)?;
                if let ItemContent::Bay(bay) = &item.content {
                    for (i, shelf) in bay.shelves.iter().enumerate() {
                        let at = format!("{}.shelves[{}]", here, i);
                        register_id(&shelf.id, &at, seen)?;
                        check_offset(shelf.y, &at)?;
                    }
                    for (i, drawer) in bay.drawers.iter().enumerate() {
                        let at = format!("{}.drawers[{}]", here, i);
                        register_id(&drawer.id, &at, seen)?;
                        check_offset(drawer.y, &at)?;
                        if !drawer.height.is_finite() || drawer.height <= 0.0 {
                            return Err(CabinetError::validation(at, "Drawer height must be positive"));
                        }
                    }
                }
            }
            LayoutNode::Container(c) => {
                check_size(c.size, &here)?;
                validate_list(&c.children, &format!("{}.children", here), depth + 1, seen)?;
            }
        }
    }
    Ok(())
}

fn register_id<'a>(id: &'a str, path: &str, seen: &mut HashSet<&'a str>) -> CabinetResult<()> {
    if id.trim().is_empty() {
        return Err(CabinetError::validation(path, "Empty id"));
    }
    if !seen.insert(id) {
        return Err(CabinetError::validation(path, format!("Duplicate id '{}'", id)));
    }
    Ok(())
}

fn check_size(size: SizeSpec, path: &str) -> CabinetResult<()> {
    if let SizeSpec::Fixed(v) = size {
        if !v.is_finite() || v < 0.0 {
            return Err(CabinetError::validation(path, format!("Invalid size {}", v)));
        }
    }
    Ok(())
}

fn check_offset(y: f64, path: &str) -> CabinetResult<()> {
    if !y.is_finite() || y < 0.0 {
        return Err(CabinetError::validation(path, format!("Offset y must be ≥ 0, got {}", y)));
    }
    Ok(())
}
