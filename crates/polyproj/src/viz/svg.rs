//! SVG output for planar figures.

use std::fmt::{self, Write};

use nalgebra::Vector2;

use super::{Boundary, Planar, PlotCfg};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN: f64 = 40.0;
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Draw `fig` in the window of `cfg` (mask, boundaries, hull, vertices).
pub fn render_svg(fig: &Planar, cfg: &PlotCfg, title: Option<&str>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_svg(&mut out, fig, cfg, title);
    out
}

/// Window-to-pixel transform (y axis points up in the window).
struct Frame {
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn px(&self, p: Vector2<f64>) -> (f64, f64) {
        let w = WIDTH - 2.0 * MARGIN;
        let h = HEIGHT - 2.0 * MARGIN;
        let sx = (p.x - self.x.0) / (self.x.1 - self.x.0);
        let sy = (p.y - self.y.0) / (self.y.1 - self.y.0);
        (MARGIN + sx * w, HEIGHT - MARGIN - sy * h)
    }
}

fn write_svg(out: &mut String, fig: &Planar, cfg: &PlotCfg, title: Option<&str>) -> fmt::Result {
    let frame = Frame {
        x: cfg.xlim,
        y: cfg.ylim,
    };
    let (pw, ph) = (WIDTH - 2.0 * MARGIN, HEIGHT - 2.0 * MARGIN);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )?;
    writeln!(
        out,
        r#"<defs><clipPath id="plot"><rect x="{MARGIN}" y="{MARGIN}" width="{pw}" height="{ph}"/></clipPath></defs>"#
    )?;
    writeln!(
        out,
        r#"<rect x="{MARGIN}" y="{MARGIN}" width="{pw}" height="{ph}" fill="white" stroke="black"/>"#
    )?;

    writeln!(out, r#"<g clip-path="url(#plot)">"#)?;
    if let Some(mask) = &fig.mask {
        if mask.nx > 0 && mask.ny > 0 {
            let (cw, ch) = (pw / mask.nx as f64, ph / mask.ny as f64);
            // one rect per horizontal run of feasible cells
            for iy in 0..mask.ny {
                let mut ix = 0;
                while ix < mask.nx {
                    if !mask.get(ix, iy) {
                        ix += 1;
                        continue;
                    }
                    let start = ix;
                    while ix < mask.nx && mask.get(ix, iy) {
                        ix += 1;
                    }
                    let x = MARGIN + start as f64 * cw;
                    let y = HEIGHT - MARGIN - (iy + 1) as f64 * ch;
                    let w = (ix - start) as f64 * cw;
                    writeln!(
                        out,
                        r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{ch:.2}" fill="#1f77b4" fill-opacity="0.18"/>"##
                    )?;
                }
            }
        }
    }
    for boundary in &fig.boundaries {
        let (row, p, q) = match *boundary {
            Boundary::Graph { row, from, to } => (row, from, to),
            Boundary::Vertical { row, x } => (
                row,
                Vector2::new(x, cfg.ylim.0),
                Vector2::new(x, cfg.ylim.1),
            ),
        };
        let (x1, y1) = frame.px(p);
        let (x2, y2) = frame.px(q);
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            continue;
        }
        let color = PALETTE[row % PALETTE.len()];
        writeln!(
            out,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{color}" stroke-width="1.2"/>"#
        )?;
    }
    if let Some(hull) = &fig.hull {
        let pts: Vec<String> = hull
            .iter()
            .map(|&p| {
                let (x, y) = frame.px(p);
                format!("{x:.2},{y:.2}")
            })
            .collect();
        writeln!(
            out,
            r#"<polygon points="{}" fill="none" stroke="black" stroke-width="2"/>"#,
            pts.join(" ")
        )?;
    }
    if let Some(vertices) = &fig.vertices {
        for &v in vertices {
            let (x, y) = frame.px(v);
            writeln!(out, r#"<circle cx="{x:.2}" cy="{y:.2}" r="3" fill="black"/>"#)?;
        }
    }
    writeln!(out, "</g>")?;

    let (lx, ly) = (WIDTH / 2.0, HEIGHT - MARGIN / 4.0);
    writeln!(out, r#"<text x="{lx}" y="{ly}" text-anchor="middle">x0</text>"#)?;
    let my = HEIGHT / 2.0;
    writeln!(
        out,
        r#"<text x="{}" y="{my}" text-anchor="middle" transform="rotate(-90 {} {my})">x1</text>"#,
        MARGIN / 3.0,
        MARGIN / 3.0
    )?;
    if let Some(title) = title {
        writeln!(
            out,
            r#"<text x="{lx}" y="{}" text-anchor="middle" font-weight="bold">{}</text>"#,
            MARGIN * 0.6,
            escape(title)
        )?;
    }
    writeln!(out, "</svg>")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
