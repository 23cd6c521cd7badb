//! Property-based tests for the sizing, divider and cutting invariants.
//!
//! Run with: cargo test -p cabinet_core -- proptest

use cabinet_core::cutting::{pack, used_length, CutRequest};
use cabinet_core::divider::{commit_divider_move, MIN_SIZE};
use cabinet_core::layout::{BayConfig, LayoutNode, LayoutTree, Orientation, SizeSpec};
use cabinet_core::sizing::{resolve_sizes, SizeMap};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Whole-millimeter size request; `None` means auto
fn arb_size() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![Just(None), (0u32..400).prop_map(Some)]
}

fn arb_entries() -> impl Strategy<Value = Vec<(Option<u32>, u32)>> {
    prop::collection::vec((arb_size(), 1u32..40), 1..8)
}

fn size_spec(size: Option<u32>) -> SizeSpec {
    match size {
        Some(v) => SizeSpec::Fixed(v as f64),
        None => SizeSpec::Auto,
    }
}

/// Bays separated by dividers, ids prefixed so lists can be nested
fn sibling_nodes(prefix: &str, entries: Vec<(Option<u32>, u32)>) -> Vec<LayoutNode> {
    let mut nodes = Vec::new();
    for (idx, (size, thickness)) in entries.into_iter().enumerate() {
        if idx > 0 {
            nodes.push(LayoutNode::divider(format!("{}-d{}", prefix, idx), thickness as f64));
        }
        nodes.push(LayoutNode::bay(format!("{}-n{}", prefix, idx), size_spec(size), BayConfig::default()));
    }
    nodes
}

/// Sibling list of bays separated by dividers
fn arb_sibling_list() -> impl Strategy<Value = Vec<LayoutNode>> {
    arb_entries().prop_map(|entries| sibling_nodes("root", entries))
}

/// Sibling list ending in a container that holds a list of its own
fn arb_nested_list() -> impl Strategy<Value = Vec<LayoutNode>> {
    (arb_entries(), arb_entries(), arb_size(), 1u32..40, any::<bool>()).prop_map(
        |(outer, inner, container_size, thickness, vertical)| {
            let orientation = if vertical {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            let mut nodes = sibling_nodes("outer", outer);
            nodes.push(LayoutNode::divider("outer-box", thickness as f64));
            nodes.push(LayoutNode::container(
                "box",
                orientation,
                size_spec(container_size),
                sibling_nodes("inner", inner),
            ));
            nodes
        },
    )
}

fn arb_cuts() -> impl Strategy<Value = Vec<CutRequest>> {
    prop::collection::vec((1u32..3000, 1u32..5), 0..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(length, qty)| CutRequest::new(length as f64, qty))
            .collect()
    })
}

fn fixed_size(tree: &LayoutTree, idx: usize) -> f64 {
    match tree.children[idx].size() {
        Some(SizeSpec::Fixed(v)) => v,
        other => panic!("expected fixed size, got {:?}", other),
    }
}

/// Check each sibling list against the span it was given: the root list
/// against `available`, a container's children against the container's size.
fn check_sibling_lists(nodes: &[LayoutNode], available: f64, sizes: &SizeMap) -> Result<(), TestCaseError> {
    let committed: f64 = nodes
        .iter()
        .map(|n| match n {
            LayoutNode::Divider(d) => d.thickness,
            other => other.size().and_then(|s| s.fixed()).unwrap_or(0.0),
        })
        .sum();
    let auto_count = nodes.iter().filter(|n| n.size().is_some_and(|s| s.is_auto())).count();
    let total: f64 = nodes.iter().map(|n| sizes[n.id()]).sum();

    // Only lists whose fixed requests fit carry the guarantee
    if committed <= available {
        prop_assert!(total <= available);
        if auto_count > 0 {
            prop_assert!(available - total < auto_count as f64);
        }
    }

    for node in nodes {
        if let LayoutNode::Container(c) = node {
            check_sibling_lists(&c.children, sizes[c.id.as_str()], sizes)?;
        }
    }
    Ok(())
}

// =============================================================================
// Sizing
// =============================================================================

proptest! {
    #[test]
    fn proptest_sizing_never_exceeds_available(nodes in arb_sibling_list(), available in 0u32..4000) {
        let sizes = resolve_sizes(&nodes, available as f64);
        check_sibling_lists(&nodes, available as f64, &sizes)?;
    }

    #[test]
    fn proptest_nested_lists_fit_their_container(nodes in arb_nested_list(), available in 0u32..4000) {
        let sizes = resolve_sizes(&nodes, available as f64);
        check_sibling_lists(&nodes, available as f64, &sizes)?;

        let nested = nodes.last().map_or(0, |n| n.children().len());
        prop_assert_eq!(sizes.len(), nodes.len() + nested);
    }

    #[test]
    fn proptest_every_node_sized(nodes in arb_sibling_list(), available in 0u32..4000) {
        let sizes = resolve_sizes(&nodes, available as f64);
        prop_assert_eq!(sizes.len(), nodes.len());
        prop_assert!(sizes.values().all(|v| *v >= 0.0));
    }
}

// =============================================================================
// Divider moves
// =============================================================================

proptest! {
    #[test]
    fn proptest_divider_move_conserves_pair(
        prev in 40u32..600,
        next in 40u32..600,
        delta in -800i32..800,
    ) {
        let tree = LayoutTree::new(
            Orientation::Horizontal,
            vec![
                LayoutNode::bay("prev", SizeSpec::Fixed(prev as f64), BayConfig::default()),
                LayoutNode::divider("d", 20.0),
                LayoutNode::bay("next", SizeSpec::Fixed(next as f64), BayConfig::default()),
            ],
        );
        let outer = (prev + next) as f64 + 20.0 + 40.0;
        let result = commit_divider_move(&tree, "d", delta as f64, 20.0, outer);
        prop_assert!(result.success);

        let updated = result.tree.unwrap();
        let new_prev = fixed_size(&updated, 0);
        let new_next = fixed_size(&updated, 2);
        prop_assert_eq!(new_prev + new_next, (prev + next) as f64);
        prop_assert!(new_prev >= MIN_SIZE);
        prop_assert!(new_next >= MIN_SIZE);
        prop_assert_eq!(result.total_outer_span, Some(outer));

        // the input tree is never touched
        prop_assert_eq!(fixed_size(&tree, 0), prev as f64);
    }
}

// =============================================================================
// Cutting
// =============================================================================

proptest! {
    #[test]
    fn proptest_cutting_places_every_cut(cuts in arb_cuts()) {
        let plan = pack(&cuts, 6000.0, 3.0);

        let requested: f64 = cuts.iter().map(|c| c.length * c.qty as f64).sum();
        let pieces: usize = cuts.iter().map(|c| c.qty as usize).sum();
        let placed: usize = plan.bars.iter().map(Vec::len).sum();

        prop_assert_eq!(plan.total_cut_length(), requested);
        prop_assert_eq!(placed, pieces);
        prop_assert_eq!(plan.total_stock_needed, plan.bars.len());
    }

    #[test]
    fn proptest_cutting_waste_in_range(cuts in arb_cuts()) {
        let plan = pack(&cuts, 6000.0, 3.0);
        prop_assert!(plan.is_feasible());
        prop_assert!(plan.waste_ratio >= 0.0);
        prop_assert!(plan.waste_ratio < 1.0);
        for bar in &plan.bars {
            prop_assert!(used_length(bar, 3.0) <= 6000.0);
        }
    }
}
