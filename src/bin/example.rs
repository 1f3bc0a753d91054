//! Frame Solver Example - Five-node planar frame and a radius sweep

use std::rc::Rc;

use anyhow::Result;
use frame_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Planar Frame ===\n");

    let material = Rc::new(Material::new(210e9).with_density(8000.0));
    let section = Section2D::new(material, Shape2D::circle(0.05)?);

    //   N5
    //   |  \
    //   N4 -- N3
    //   |
    //   N1 ---- N2
    //
    let mut frame = Frame2D::new();
    for (x, y) in [(-4.0, 0.0), (0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (0.0, 4.0)] {
        frame.add_node(x, y);
    }
    for (n1, n2) in [(1, 5), (2, 4), (4, 5), (4, 3)] {
        frame.add_element(n1, n2, &section)?;
    }
    frame.add_fixed_sup(&[1, 2, 3])?;
    frame.add_single_force(5, 200_000.0, -50_000.0)?;
    frame.add_single_moment(5, 5_000.0)?;

    let results = frame.analyze(&AnalysisOptions::linear().with_symmetry_check().with_logging())?;

    println!("Node Displacements:");
    for id in 1..=frame.nodes().len() {
        if let Some(d) = results.node_displacement(id) {
            println!(
                "  N{}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
                id,
                d[0] * 1000.0,
                d[1] * 1000.0,
                d[2]
            );
        }
    }

    println!("\nSupport Reactions:");
    for id in [1, 2, 3] {
        if let Some(r) = results.node_reactions(id) {
            println!(
                "  N{}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
                id,
                r[0] / 1000.0,
                r[1] / 1000.0,
                r[2] / 1000.0
            );
        }
    }

    println!("\nElement Forces:");
    for id in 1..=frame.elements().len() {
        if let Some([start, end]) = results.forces_2d(id) {
            println!(
                "  E{}: P={:.2}kN, Mmax={:.2}kN·m, σ={:.2}MPa",
                id,
                start.axial / 1000.0,
                start.moment.abs().max(end.moment.abs()) / 1000.0,
                results.element_stresses[id - 1] / 1e6
            );
        }
    }

    let summary = &results.summary;
    println!("\nSummary:");
    println!("  Max displacement: {:.4}mm at N{}", summary.max_displacement * 1000.0, summary.max_disp_node);
    println!("  Max reaction: {:.2}kN at N{}", summary.max_reaction / 1000.0, summary.max_reaction_node);
    println!("  Max stress: {:.2}MPa in E{}", summary.max_stress / 1e6, summary.max_stress_element);
    if let Some(weight) = summary.weight {
        println!("  Weight: {:.1}kg", weight);
    }

    println!("\n=== Radius Sweep ===\n");
    for r in [0.02, 0.03, 0.04, 0.05, 0.06] {
        for id in 1..=frame.elements().len() {
            frame.update_shape_params(id, &[("R", r)])?;
        }
        println!(
            "  R={:.3}m: σmax={:.2}MPa, weight={:.1}kg",
            r,
            frame.max_stress()? / 1e6,
            frame.structural_weight()?
        );
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
