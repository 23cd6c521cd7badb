//! # Cabinet CLI
//!
//! Computes sizes, a bill of materials and a cutting plan for a design file,
//! checks which hinge reaches a given overlay, or lists the built-in
//! catalogs.
//!
//! ```text
//! cabinet_cli [design.json] [--json]
//! cabinet_cli hinge <2020|3030|4040> <overlay_mm> [--json]
//! cabinet_cli catalog [--json]
//! ```
//!
//! Without a design file a built-in demo cabinet is computed. Log output goes
//! to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cabinet_core::bom::BomItem;
use cabinet_core::catalog::{ConnectorType, ProfileType, HINGE_CATALOG};
use cabinet_core::design::{compute, Design, DesignOutput};
use cabinet_core::errors::{CabinetError, CabinetResult};
use cabinet_core::hinge::{select_hinge, HingeSelection};
use cabinet_core::layout::{
    BayConfig, DoorConfig, DoorType, Drawer, HingeSide, LayoutNode, LayoutTree, Orientation, Shelf, SizeSpec,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cabinet_cli")]
#[command(about = "Sizes, bill of materials and cutting plan for an aluminum profile cabinet")]
#[command(version)]
struct Cli {
    /// Design file (JSON); the built-in demo cabinet is used when omitted
    design: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check which hinge reaches an overlay
    Hinge {
        /// Frame profile (2020, 3030 or 4040)
        #[arg(value_parser = parse_profile)]
        profile: ProfileType,

        /// Desired door overlay in mm
        #[arg(allow_negative_numbers = true)]
        overlay: f64,
    },

    /// List frame profiles, corner connectors and hinges
    Catalog,
}

fn parse_profile(s: &str) -> Result<ProfileType, String> {
    ProfileType::from_str_flexible(s).ok_or_else(|| {
        let known: Vec<&str> = ProfileType::ALL.iter().map(ProfileType::display_name).collect();
        format!("expected one of {}", known.join(", "))
    })
}

fn load_design(path: &Path) -> CabinetResult<Design> {
    let text = fs::read_to_string(path).map_err(|e| {
        CabinetError::invalid_input("design", path.display().to_string(), format!("Cannot read file: {}", e))
    })?;
    Design::from_json(&text)
}

/// Two-bay demo: a double-door bay with shelves, then a column with drawers
/// below a single-door cupboard
fn demo_design() -> Design {
    let mut design = Design::new("Demo cabinet");
    design.params.width = 900.0;
    design.params.height = 1200.0;
    design.layout = LayoutTree::new(
        Orientation::Horizontal,
        vec![
            LayoutNode::bay(
                "left",
                SizeSpec::Auto,
                BayConfig {
                    shelves: vec![
                        Shelf { id: "left-s1".into(), y: 380.0 },
                        Shelf { id: "left-s2".into(), y: 760.0 },
                    ],
                    drawers: vec![],
                    door: Some(DoorConfig {
                        enabled: true,
                        kind: DoorType::Double,
                        hinge_side: HingeSide::Left,
                    }),
                },
            ),
            LayoutNode::divider("div-1", 20.0),
            LayoutNode::container(
                "right",
                Orientation::Vertical,
                SizeSpec::Fixed(400.0),
                vec![
                    LayoutNode::bay(
                        "cupboard",
                        SizeSpec::Auto,
                        BayConfig {
                            shelves: vec![],
                            drawers: vec![],
                            door: Some(DoorConfig {
                                enabled: true,
                                kind: DoorType::Single,
                                hinge_side: HingeSide::Right,
                            }),
                        },
                    ),
                    LayoutNode::divider("div-2", 20.0),
                    LayoutNode::bay(
                        "drawers",
                        SizeSpec::Fixed(240.0),
                        BayConfig {
                            shelves: vec![],
                            drawers: vec![
                                Drawer { id: "drawer-1".into(), y: 0.0, height: 115.0 },
                                Drawer { id: "drawer-2".into(), y: 120.0, height: 115.0 },
                            ],
                            door: None,
                        },
                    ),
                ],
            ),
        ],
    );
    design
}

fn print_json<T: serde::Serialize>(value: &T) -> CabinetResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_design(design: &Design, output: &DesignOutput) {
    let p = &design.params;
    println!("═══════════════════════════════════════");
    println!("  {}", design.meta.name);
    println!("═══════════════════════════════════════");
    println!();
    println!("Cabinet:");
    println!("  Size:       {:.0} × {:.0} × {:.0} mm (W × H × D)", p.width, p.height, p.depth);
    println!(
        "  Inner:      {:.0} × {:.0} × {:.0} mm",
        p.inner_width(),
        p.inner_height(),
        p.inner_depth()
    );
    println!("  Profile:    {}", p.profile_type.display_name());
    println!("  Connectors: {}", p.connector_type);
    println!();

    println!("Sizes:");
    for (id, size) in &output.sizes {
        println!("  {:<24} {:>8.0} mm", id, size);
    }
    println!();

    println!("Bill of Materials:");
    for row in output.consolidated_bom() {
        match row {
            BomItem::Profile { name, length_mm, qty, .. } => {
                println!("  [profile]  {:>3} × {:<28} {:>6.0} mm", qty, name, length_mm)
            }
            BomItem::Panel {
                name,
                qty,
                width_mm,
                height_mm,
                thickness_mm,
            } => println!(
                "  [panel]    {:>3} × {:<28} {:>6.0} × {:.0} × {:.0} mm",
                qty, name, width_mm, height_mm, thickness_mm
            ),
            BomItem::Hardware { name, qty, .. } => println!("  [hardware] {:>3} × {}", qty, name),
        }
    }
    println!();

    println!("Hinge:");
    println!("  {}", output.hinge.message);
    println!();

    let plan = &output.cutting_plan;
    println!(
        "Cutting Plan ({:.0} mm stock, {:.0} mm kerf):",
        design.cutting.stock_length, design.cutting.kerf
    );
    let offcuts = plan.offcuts(design.cutting.stock_length, design.cutting.kerf);
    for (idx, (bar, offcut)) in plan.bars.iter().zip(&offcuts).enumerate() {
        let cuts: Vec<String> = bar.iter().map(|c| format!("{:.0}", c)).collect();
        println!("  Bar {:>2}: {}  (offcut {:.0} mm)", idx + 1, cuts.join(" | "), offcut);
    }
    println!(
        "  {} bars, {:.1}% waste",
        plan.total_stock_needed,
        plan.waste_ratio * 100.0
    );

    if !output.advisories.is_empty() {
        println!();
        println!("Advisories:");
        for advisory in &output.advisories {
            println!("  [WARN] {}", advisory);
        }
    }
}

fn print_hinge(profile: ProfileType, overlay: f64, result: &HingeSelection) {
    println!("Hinge check: {} mm overlay on {}", overlay, profile.display_name());
    println!("  {} {}", status_icon(result.success), result.message);
}

fn catalog_json() -> serde_json::Value {
    let profiles: Vec<_> = ProfileType::ALL
        .iter()
        .map(|profile| {
            json!({
                "profile_type": profile,
                "size_mm": profile.size_mm(),
                "slot_depth_mm": profile.slot_depth_mm(),
                "hinge_offset_mm": profile.hinge_offset_mm(),
            })
        })
        .collect();
    let connectors: Vec<_> = ConnectorType::ALL
        .iter()
        .map(|connector| {
            json!({
                "connector_type": connector,
                "name": connector.display_name(),
                "deduction_mm": connector.deduction_mm(),
            })
        })
        .collect();
    json!({
        "profiles": profiles,
        "connectors": connectors,
        "hinges": &HINGE_CATALOG[..],
    })
}

fn print_catalog() {
    println!("═══════════════════════════════════════");
    println!("  Catalog");
    println!("═══════════════════════════════════════");
    println!();
    println!("Profiles:");
    for profile in ProfileType::ALL {
        println!(
            "  {}  slot {:.1} mm, hinge offset {:+.1} mm",
            profile.display_name(),
            profile.slot_depth_mm(),
            profile.hinge_offset_mm()
        );
    }
    println!();
    println!("Connectors:");
    for connector in ConnectorType::ALL {
        println!("  {:<24} {:>4.1} mm per beam end", connector.display_name(), connector.deduction_mm());
    }
    println!();
    println!("Hinges (overlay on 2020):");
    for hinge in &HINGE_CATALOG {
        let [k_min, k_max] = hinge.k_range;
        println!(
            "  {:<6} {:<22} K {}..{}  {:.1}..{:.1} mm",
            hinge.id,
            hinge.name,
            k_min,
            k_max,
            hinge.base_overlay(k_min, 0.0),
            hinge.base_overlay(k_max, 0.0)
        );
    }
}

fn run(cli: Cli) -> CabinetResult<bool> {
    match cli.command {
        Some(Commands::Hinge { profile, overlay }) => {
            let result = select_hinge(profile, overlay);
            if cli.json {
                print_json(&result)?;
            } else {
                print_hinge(profile, overlay, &result);
            }
            Ok(result.success)
        }
        Some(Commands::Catalog) => {
            if cli.json {
                print_json(&catalog_json())?;
            } else {
                print_catalog();
            }
            Ok(true)
        }
        None => {
            let design = match &cli.design {
                Some(path) => load_design(path)?,
                None => demo_design(),
            };
            debug!(name = %design.meta.name, "Computing design");
            let output = compute(&design);
            if cli.json {
                print_json(&output)?;
            } else {
                print_design(&design, &output);
            }
            Ok(true)
        }
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
