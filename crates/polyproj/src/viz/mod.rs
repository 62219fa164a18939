//! Figures of 2-D and 3-D feasible regions.
//!
//! Purpose
//! - Turn an `HRep` into plot-ready data: sampled feasibility mask, one
//!   boundary per constraint, vertices and their hull (2-D), or vertices and
//!   ordered facets (3-D). `render_svg` draws the 2-D case.
//!
//! Degradation
//! - Vertices come from an injected `VertexSolver`. Without one, or when it
//!   returns `None`, 2-D figures fall back to the grid estimate; 3-D figures
//!   need vertices and fail with `VizError::NeedVertices`.
//!
//! Conventions
//! - Boundaries are drawn across `xlim`; rows with no coefficient above `tol`
//!   have no boundary (either redundant or infeasible).
//! - `PlotResult::feasible` is the grid guess (`None` without `fill`), forced
//!   to `true` whenever vertices exist.

mod hull;
mod solver;
mod svg;

use std::collections::BTreeSet;
use std::fmt;

use nalgebra::{DVector, Vector2, Vector3};

use crate::hrep::cfg::TIGHT_EPS;
use crate::hrep::HRep;

pub use solver::{EnumerationSolver, VertexSolver};
pub use svg::render_svg;

/// Plot window and sampling options.
#[derive(Clone, Copy, Debug)]
pub struct PlotCfg {
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub zlim: (f64, f64),
    /// Sample a feasibility mask (2-D only).
    pub fill: bool,
    /// Samples per axis for the mask.
    pub grid: usize,
    pub show_vertices: bool,
    /// Membership slack for the mask; also the “zero coefficient” test for boundaries.
    pub tol: f64,
}

impl Default for PlotCfg {
    fn default() -> Self {
        Self {
            xlim: (-1.0, 10.0),
            ylim: (-1.0, 10.0),
            zlim: (-1.0, 10.0),
            fill: true,
            grid: 250,
            show_vertices: true,
            tol: 1e-9,
        }
    }
}

/// What the caller learns besides the figure.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotResult {
    pub feasible: Option<bool>,
    pub vertices: Option<Vec<DVector<f64>>>,
}

/// Sampled feasibility on a `nx × ny` grid, stored row by row (y-major).
#[derive(Clone, Debug, PartialEq)]
pub struct FeasibleMask {
    pub nx: usize,
    pub ny: usize,
    pub cells: Vec<bool>,
}

impl FeasibleMask {
    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> bool {
        self.cells[iy * self.nx + ix]
    }
    #[inline]
    pub fn any(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }
}

/// Boundary line of constraint `row`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// `a1 != 0`: graph of `y = (b - a0 x) / a1` between the `xlim` ends.
    Graph {
        row: usize,
        from: Vector2<f64>,
        to: Vector2<f64>,
    },
    /// `a1 == 0`, `a0 != 0`: the line `x = b / a0`.
    Vertical { row: usize, x: f64 },
}

/// 2-D figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Planar {
    pub mask: Option<FeasibleMask>,
    pub boundaries: Vec<Boundary>,
    pub vertices: Option<Vec<Vector2<f64>>>,
    /// Counter-clockwise hull of `vertices` (closing edge implied).
    pub hull: Option<Vec<Vector2<f64>>>,
}

/// One facet: constraint `row` and the cycle of vertex indices on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facet {
    pub row: usize,
    pub cycle: Vec<usize>,
}

/// 3-D figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    pub vertices: Vec<Vector3<f64>>,
    pub facets: Vec<Facet>,
    pub show_vertices: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Figure {
    Planar(Planar),
    Solid(Solid),
}

/// Rendering failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VizError {
    /// Only 2-D and 3-D systems can be drawn.
    UnsupportedDimension { dim: usize },
    /// 3-D needs exact vertices of a full-dimensional polyhedron.
    NeedVertices,
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VizError::UnsupportedDimension { dim } => {
                write!(f, "visualization supports only 2D or 3D, got n={dim}")
            }
            VizError::NeedVertices => write!(
                f,
                "3D visualization requires a vertex solver and a polyhedron with non-empty interior"
            ),
        }
    }
}

impl std::error::Error for VizError {}

/// Build the figure for a 2-D or 3-D system.
pub fn visualize(
    sys: &HRep,
    cfg: &PlotCfg,
    solver: Option<&dyn VertexSolver>,
) -> Result<(Figure, PlotResult), VizError> {
    match sys.dim() {
        2 => Ok(planar(sys, cfg, solver)),
        3 => solid(sys, cfg, solver),
        dim => Err(VizError::UnsupportedDimension { dim }),
    }
}

fn planar(sys: &HRep, cfg: &PlotCfg, solver: Option<&dyn VertexSolver>) -> (Figure, PlotResult) {
    let mask = cfg.fill.then(|| feasible_mask(sys, cfg));
    let boundaries = boundary_lines(sys, cfg);
    let verts = solver.and_then(|s| s.solve(sys));

    let (vertices, hull) = match (&verts, cfg.show_vertices) {
        (Some(vs), true) => {
            let pts: Vec<Vector2<f64>> = vs.iter().map(|v| Vector2::new(v[0], v[1])).collect();
            let hull = hull::convex_hull(&pts);
            (Some(pts), hull)
        }
        _ => (None, None),
    };

    let mut feasible = mask.as_ref().map(FeasibleMask::any);
    if verts.is_some() {
        feasible = Some(true);
    }
    let fig = Figure::Planar(Planar {
        mask,
        boundaries,
        vertices,
        hull,
    });
    (
        fig,
        PlotResult {
            feasible,
            vertices: verts,
        },
    )
}

fn solid(
    sys: &HRep,
    cfg: &PlotCfg,
    solver: Option<&dyn VertexSolver>,
) -> Result<(Figure, PlotResult), VizError> {
    let verts = solver
        .and_then(|s| s.solve(sys))
        .ok_or(VizError::NeedVertices)?;
    let pts: Vec<Vector3<f64>> = verts
        .iter()
        .map(|v| Vector3::new(v[0], v[1], v[2]))
        .collect();

    let mut facets = Vec::new();
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    for i in 0..sys.nrows() {
        let normal = Vector3::new(sys.a()[(i, 0)], sys.a()[(i, 1)], sys.a()[(i, 2)]);
        let norm = normal.norm();
        if norm <= cfg.tol {
            continue;
        }
        let tight: Vec<usize> = (0..pts.len())
            .filter(|&k| (normal.dot(&pts[k]) - sys.b()[i]).abs() <= TIGHT_EPS * norm)
            .collect();
        if tight.len() < 3 || !seen.insert(tight.clone()) {
            continue;
        }
        let face_pts: Vec<Vector3<f64>> = tight.iter().map(|&k| pts[k]).collect();
        let cycle = hull::order_around(&face_pts, normal)
            .into_iter()
            .map(|j| tight[j])
            .collect();
        facets.push(Facet { row: i, cycle });
    }

    let fig = Figure::Solid(Solid {
        vertices: pts,
        facets,
        show_vertices: cfg.show_vertices,
    });
    Ok((
        fig,
        PlotResult {
            feasible: Some(true),
            vertices: Some(verts),
        },
    ))
}

/// `count` evenly spaced samples on `[lo, hi]` (endpoints included).
fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (count - 1) as f64;
            (0..count).map(|i| lo + step * i as f64).collect()
        }
    }
}

fn feasible_mask(sys: &HRep, cfg: &PlotCfg) -> FeasibleMask {
    let xs = linspace(cfg.xlim.0, cfg.xlim.1, cfg.grid);
    let ys = linspace(cfg.ylim.0, cfg.ylim.1, cfg.grid);
    let (a, b) = (sys.a(), sys.b());
    let mut cells = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            let ok = (0..sys.nrows()).all(|i| a[(i, 0)] * x + a[(i, 1)] * y <= b[i] + cfg.tol);
            cells.push(ok);
        }
    }
    FeasibleMask {
        nx: xs.len(),
        ny: ys.len(),
        cells,
    }
}

fn boundary_lines(sys: &HRep, cfg: &PlotCfg) -> Vec<Boundary> {
    let (x0, x1) = cfg.xlim;
    let mut out = Vec::with_capacity(sys.nrows());
    for row in 0..sys.nrows() {
        let (a0, a1, bi) = (sys.a()[(row, 0)], sys.a()[(row, 1)], sys.b()[row]);
        if a1.abs() > cfg.tol {
            out.push(Boundary::Graph {
                row,
                from: Vector2::new(x0, (bi - a0 * x0) / a1),
                to: Vector2::new(x1, (bi - a0 * x1) / a1),
            });
        } else if a0.abs() > cfg.tol {
            out.push(Boundary::Vertical { row, x: bi / a0 });
        }
    }
    out
}
