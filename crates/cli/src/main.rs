mod io;
mod provenance;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use polyproj::affine::{image, image_invertible, image_via_projection, ImagePath};
use polyproj::fm::{eliminate_label, FmCfg};
use polyproj::hrep::cfg::DEFAULT_TOL;
use polyproj::polar::{polar_generators_from_hrep, polar_hrep_from_generators};
use polyproj::sample::{random_bounded_system, SystemToken};
use polyproj::viz::{render_svg, visualize, Boundary, EnumerationSolver, Figure, PlotCfg};
use serde_json::{json, Value};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::io::{read_json, read_system, write_json, write_system, GeneratorsDoc, MapDoc};
use crate::provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "polyproj")]
#[command(about = "Project, map, and draw polyhedra given as A x <= b")]
struct Cmd {
    /// Optional run tag; propagated to provenance sidecars and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Auto,
    Projection,
    Invertible,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolarFrom {
    /// Input is `{"g": ..}`; output is the polar as a system
    Generators,
    /// Input is a cone `A x <= 0`; output is `{"g": ..}`
    Hrep,
}

#[derive(Subcommand)]
enum Action {
    /// Eliminate one variable (by label) with Fourier–Motzkin
    Eliminate {
        #[arg(long)]
        input: PathBuf,
        /// Label of the variable to eliminate
        #[arg(long)]
        var: usize,
        /// Zero the column instead of dropping it
        #[arg(long)]
        keep_column: bool,
        #[arg(long)]
        no_normalize: bool,
        #[arg(long, default_value_t = DEFAULT_TOL)]
        tol: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Image of a system under `y = M x + t`
    Image {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        map: PathBuf,
        #[arg(long, value_enum, default_value_t = Method::Auto)]
        method: Method,
        #[arg(long, default_value_t = DEFAULT_TOL)]
        tol: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Polar cone by transpose
    Polar {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        from: PolarFrom,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the interval of a one-variable system
    Interval {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TOL)]
        tol: f64,
    },
    /// Draw a 2-D system as SVG, or export 2-D/3-D figure data as JSON
    Plot {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 250)]
        grid: usize,
        #[arg(long)]
        no_fill: bool,
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        xlim: Option<Vec<f64>>,
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        ylim: Option<Vec<f64>>,
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        zlim: Option<Vec<f64>>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Write a random bounded system (box plus extra rows) containing the origin
    Demo {
        #[arg(long, default_value_t = 2)]
        dim: usize,
        /// Extra random rows on top of the 2·dim box rows
        #[arg(long, default_value_t = 3)]
        rows: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let tag = cmd.tag.as_deref();
    match cmd.action {
        Action::Eliminate {
            input,
            var,
            keep_column,
            no_normalize,
            tol,
            out,
        } => {
            let cfg = FmCfg {
                tol,
                drop_column: !keep_column,
                normalize: !no_normalize,
            };
            run_eliminate(&input, var, cfg, &out, tag)
        }
        Action::Image {
            input,
            map,
            method,
            tol,
            out,
        } => run_image(&input, &map, method, tol, &out, tag),
        Action::Polar { input, from, out } => run_polar(&input, from, &out, tag),
        Action::Interval { input, tol } => run_interval(&input, tol),
        Action::Plot {
            input,
            out,
            grid,
            no_fill,
            xlim,
            ylim,
            zlim,
            title,
        } => {
            let mut cfg = PlotCfg {
                grid,
                fill: !no_fill,
                ..PlotCfg::default()
            };
            if let Some(v) = xlim {
                cfg.xlim = (v[0], v[1]);
            }
            if let Some(v) = ylim {
                cfg.ylim = (v[0], v[1]);
            }
            if let Some(v) = zlim {
                cfg.zlim = (v[0], v[1]);
            }
            run_plot(&input, &out, &cfg, title.as_deref(), tag)
        }
        Action::Demo {
            dim,
            rows,
            seed,
            radius,
            out,
        } => run_demo(dim, rows, seed, radius, &out, tag),
        Action::Report => report(tag),
    }
}

fn run_eliminate(input: &Path, var: usize, cfg: FmCfg, out: &Path, tag: Option<&str>) -> Result<()> {
    let sys = read_system(input)?;
    tracing::info!(input = %input.display(), var, rows = sys.nrows(), dim = sys.dim(), "eliminate");
    let (res, stats) = eliminate_label(sys, var, cfg)?;
    tracing::info!(
        n_zero = stats.n_zero,
        n_pos = stats.n_pos,
        n_neg = stats.n_neg,
        n_out = stats.n_out,
        "eliminated"
    );
    write_system(out, &res)?;
    let params = json!({
        "command": "eliminate",
        "var": var,
        "tol": cfg.tol,
        "drop_column": cfg.drop_column,
        "normalize": cfg.normalize,
        "n_zero": stats.n_zero,
        "n_pos": stats.n_pos,
        "n_neg": stats.n_neg,
        "n_out": stats.n_out,
    });
    write_sidecar(out, Payload::new(params).input(input).tag(tag))?;
    Ok(())
}

fn run_image(
    input: &Path,
    map_path: &Path,
    method: Method,
    tol: f64,
    out: &Path,
    tag: Option<&str>,
) -> Result<()> {
    let sys = read_system(input)?;
    let map = read_json::<MapDoc>(map_path)?.into_map()?;
    tracing::info!(
        input = %input.display(),
        ?method,
        in_dim = map.in_dim(),
        out_dim = map.out_dim(),
        "image"
    );
    let (img, path) = match method {
        Method::Auto => image(&sys, &map, tol)?,
        Method::Invertible => (image_invertible(&sys, &map, tol)?, ImagePath::Invertible),
        Method::Projection => {
            let (img, stats) = image_via_projection(&sys, &map, tol)?;
            tracing::info!(
                initial = stats.n_constraints_initial,
                final_rows = stats.n_constraints_final,
                eliminated = stats.n_x_eliminated,
                "projection path"
            );
            (img, ImagePath::Projection)
        }
    };
    write_system(out, &img)?;
    let params = json!({
        "command": "image",
        "method": format!("{method:?}").to_lowercase(),
        "path": format!("{path:?}").to_lowercase(),
        "tol": tol,
        "rows": img.nrows(),
    });
    let payload = Payload::new(params).input(input).input(map_path).tag(tag);
    write_sidecar(out, payload)?;
    Ok(())
}

fn run_polar(input: &Path, from: PolarFrom, out: &Path, tag: Option<&str>) -> Result<()> {
    tracing::info!(input = %input.display(), ?from, "polar");
    match from {
        PolarFrom::Generators => {
            let g = read_json::<GeneratorsDoc>(input)?.into_matrix()?;
            write_system(out, &polar_hrep_from_generators(&g))?;
        }
        PolarFrom::Hrep => {
            let sys = read_system(input)?;
            if sys.b().iter().any(|&v| v != 0.0) {
                tracing::warn!("input has a non-zero right-hand side; treating it as the cone A x <= 0");
            }
            let g = polar_generators_from_hrep(sys.a());
            write_json(out, &GeneratorsDoc::from_matrix(&g))?;
        }
    }
    let params = json!({"command": "polar", "from": format!("{from:?}").to_lowercase()});
    write_sidecar(out, Payload::new(params).input(input).tag(tag))?;
    Ok(())
}

fn run_interval(input: &Path, tol: f64) -> Result<()> {
    let sys = read_system(input)?;
    let iv = sys.interval(tol)?;
    if iv.is_empty() {
        println!("infeasible");
    } else {
        println!("[{}, {}]", iv.lo, iv.hi);
    }
    Ok(())
}

fn run_plot(
    input: &Path,
    out: &Path,
    cfg: &PlotCfg,
    title: Option<&str>,
    tag: Option<&str>,
) -> Result<()> {
    let sys = read_system(input)?;
    let solver = EnumerationSolver::default();
    let (fig, res) = visualize(&sys, cfg, Some(&solver))?;
    tracing::info!(
        dim = sys.dim(),
        feasible = ?res.feasible,
        vertices = res.vertices.as_ref().map(Vec::len),
        "plot"
    );

    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match (ext.as_deref(), &fig) {
        (Some("svg"), Figure::Planar(p)) => {
            io::ensure_parent(out)?;
            std::fs::write(out, render_svg(p, cfg, title))
                .with_context(|| format!("writing {}", out.display()))?;
        }
        (Some("svg"), Figure::Solid(_)) => {
            bail!("SVG output supports 2-D systems only; use a .json output for 3-D")
        }
        (Some("json"), _) => write_json(out, &figure_json(&fig, res.feasible))?,
        _ => bail!("unsupported plot output {}; use .svg or .json", out.display()),
    }
    let params = json!({
        "command": "plot",
        "grid": cfg.grid,
        "fill": cfg.fill,
        "xlim": [cfg.xlim.0, cfg.xlim.1],
        "ylim": [cfg.ylim.0, cfg.ylim.1],
        "zlim": [cfg.zlim.0, cfg.zlim.1],
        "feasible": res.feasible,
    });
    write_sidecar(out, Payload::new(params).input(input).tag(tag))?;
    Ok(())
}

fn figure_json(fig: &Figure, feasible: Option<bool>) -> Value {
    match fig {
        Figure::Planar(p) => {
            let boundaries: Vec<Value> = p
                .boundaries
                .iter()
                .map(|b| match *b {
                    Boundary::Graph { row, from, to } => {
                        json!({"row": row, "from": [from.x, from.y], "to": [to.x, to.y]})
                    }
                    Boundary::Vertical { row, x } => json!({"row": row, "x": x}),
                })
                .collect();
            let points = |pts: &Option<Vec<nalgebra::Vector2<f64>>>| {
                pts.as_ref()
                    .map(|v| v.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
            };
            json!({
                "kind": "planar",
                "feasible": feasible,
                "boundaries": boundaries,
                "vertices": points(&p.vertices),
                "hull": points(&p.hull),
                "mask": p.mask.as_ref().map(|m| json!({
                    "nx": m.nx,
                    "ny": m.ny,
                    "feasible_cells": m.cells.iter().filter(|&&c| c).count(),
                })),
            })
        }
        Figure::Solid(s) => json!({
            "kind": "solid",
            "feasible": feasible,
            "vertices": s.vertices.iter().map(|v| [v.x, v.y, v.z]).collect::<Vec<_>>(),
            "facets": s.facets.iter().map(|f| json!({"row": f.row, "cycle": f.cycle})).collect::<Vec<_>>(),
        }),
    }
}

fn run_demo(
    dim: usize,
    rows: usize,
    seed: u64,
    radius: f64,
    out: &Path,
    tag: Option<&str>,
) -> Result<()> {
    let sys = random_bounded_system(dim, rows, radius, SystemToken::new(seed, 0));
    tracing::info!(dim, rows = sys.nrows(), seed, "demo");
    write_system(out, &sys)?;
    let params = json!({
        "command": "demo",
        "dim": dim,
        "extra_rows": rows,
        "seed": seed,
        "radius": radius,
    });
    write_sidecar(out, Payload::new(params).tag(tag))?;
    Ok(())
}

fn report(tag: Option<&str>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "polyproj_version": polyproj::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SystemDoc;
    use tempfile::tempdir;

    fn write_triangle(dir: &Path) -> PathBuf {
        let path = dir.join("tri.json");
        std::fs::write(&path, r#"{"a": [[-1, 0], [0, -1], [1, 1]], "b": [0, 0, 1]}"#).unwrap();
        path
    }

    #[test]
    fn eliminate_writes_system_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = write_triangle(dir.path());
        let out = dir.path().join("shadow.json");
        run_eliminate(&input, 1, FmCfg::default(), &out, Some("t1")).unwrap();

        let doc: SystemDoc = read_json(&out).unwrap();
        assert_eq!(doc.labels, Some(vec![0]));
        let sys = doc.into_hrep().unwrap();
        let iv = sys.interval(DEFAULT_TOL).unwrap();
        assert_eq!((iv.lo, iv.hi), (0.0, 1.0));

        let side: Value = read_json(&dir.path().join("shadow.provenance.json")).unwrap();
        assert_eq!(side["params"]["n_out"], 2);
        assert_eq!(side["tag"], "t1");
    }

    #[test]
    fn unknown_label_is_an_error() {
        let dir = tempdir().unwrap();
        let input = write_triangle(dir.path());
        let out = dir.path().join("never.json");
        let err = run_eliminate(&input, 5, FmCfg::default(), &out, None).unwrap_err();
        assert!(err.to_string().contains('5'));
        assert!(!out.exists());
    }

    #[test]
    fn image_records_chosen_path() {
        let dir = tempdir().unwrap();
        let input = write_triangle(dir.path());
        let map = dir.path().join("sum.json");
        std::fs::write(&map, r#"{"m": [[1, 1]]}"#).unwrap();
        let out = dir.path().join("img.json");
        run_image(&input, &map, Method::Auto, DEFAULT_TOL, &out, None).unwrap();

        let sys = read_system(&out).unwrap();
        let iv = sys.interval(DEFAULT_TOL).unwrap();
        assert!(iv.lo.abs() < 1e-12 && (iv.hi - 1.0).abs() < 1e-12);
        let side: Value = read_json(&dir.path().join("img.provenance.json")).unwrap();
        assert_eq!(side["params"]["path"], "projection");
        assert_eq!(side["inputs"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn forced_invertible_path_rejects_projections() {
        let dir = tempdir().unwrap();
        let input = write_triangle(dir.path());
        let map = dir.path().join("sum.json");
        std::fs::write(&map, r#"{"m": [[1, 1]]}"#).unwrap();
        let out = dir.path().join("img.json");
        assert!(run_image(&input, &map, Method::Invertible, DEFAULT_TOL, &out, None).is_err());
    }

    #[test]
    fn polar_from_generators_and_back() {
        let dir = tempdir().unwrap();
        let gens = dir.path().join("g.json");
        std::fs::write(&gens, r#"{"g": [[1, 0], [0, 1]]}"#).unwrap();
        let cone = dir.path().join("cone.json");
        run_polar(&gens, PolarFrom::Generators, &cone, None).unwrap();
        let sys = read_system(&cone).unwrap();
        assert_eq!(sys.b().as_slice(), &[0.0, 0.0]);

        let back = dir.path().join("back.json");
        run_polar(&cone, PolarFrom::Hrep, &back, None).unwrap();
        let doc: GeneratorsDoc = read_json(&back).unwrap();
        assert_eq!(doc.g, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn plot_outputs_by_extension() {
        let dir = tempdir().unwrap();
        let input = write_triangle(dir.path());
        let cfg = PlotCfg {
            xlim: (-0.5, 1.5),
            ylim: (-0.5, 1.5),
            grid: 21,
            ..PlotCfg::default()
        };
        let svg = dir.path().join("tri.svg");
        run_plot(&input, &svg, &cfg, Some("triangle"), None).unwrap();
        assert!(std::fs::read_to_string(&svg).unwrap().starts_with("<svg"));

        let data = dir.path().join("fig.json");
        run_plot(&input, &data, &cfg, None, None).unwrap();
        let fig: Value = read_json(&data).unwrap();
        assert_eq!(fig["kind"], "planar");
        assert_eq!(fig["feasible"], true);
        assert_eq!(fig["vertices"].as_array().map(Vec::len), Some(3));

        let bad = dir.path().join("tri.png");
        assert!(run_plot(&input, &bad, &cfg, None, None).is_err());
    }

    #[test]
    fn demo_is_reproducible() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.json");
        run_demo(3, 2, 9, 1.0, &a, None).unwrap();
        run_demo(3, 2, 9, 1.0, &b, None).unwrap();
        let (sa, sb) = (read_system(&a).unwrap(), read_system(&b).unwrap());
        assert_eq!(sa.nrows(), 8);
        assert_eq!(sa.labels(), sb.labels());
        assert!((sa.a() - sb.a()).abs().max() < 1e-12);
        assert!(dir.path().join("a.provenance.json").exists());
    }
}
