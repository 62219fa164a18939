//! Walk through the core operations on a small triangle.
//!
//! Usage:
//!   cargo run -p polyproj --example project_demo
//!   cargo run -p polyproj --example project_demo -- out.svg
//!
//! Prints the system, its shadow on x0, an affine image, and optionally
//! writes the 2-D figure as SVG.

use polyproj::prelude::*;
use polyproj::viz::{render_svg, visualize, EnumerationSolver, Figure, PlotCfg};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // x >= 0, y >= 0, x + y <= 1
    let tri = HRep::from_row_slice(2, &[-1.0, 0.0, 0.0, -1.0, 1.0, 1.0], &[0.0, 0.0, 1.0])?;
    println!("system:\n{tri}");

    let (shadow, stats) = eliminate(tri.clone(), 1, FmCfg::default())?;
    println!("after eliminating x1 ({stats:?}):\n{shadow}");
    println!("shadow interval: {:?}", shadow.interval(DEFAULT_TOL)?);

    let map = AffineMap::new(
        DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 1.0, 1.0]),
        vec![1.0, -1.0],
    )?;
    let (img, path) = image(&tri, &map, DEFAULT_TOL)?;
    println!("image via {path:?}:\n{img}");

    if let Some(out) = std::env::args().nth(1) {
        let cfg = PlotCfg {
            xlim: (-0.5, 1.5),
            ylim: (-0.5, 1.5),
            ..PlotCfg::default()
        };
        let (fig, res) = visualize(&tri, &cfg, Some(&EnumerationSolver::default()))?;
        if let Figure::Planar(p) = fig {
            std::fs::write(&out, render_svg(&p, &cfg, Some("triangle")))?;
            println!("wrote {out} (feasible: {:?})", res.feasible);
        }
    }
    Ok(())
}
