//! File formats for systems, maps, and generator matrices.
//!
//! - Systems: JSON `{"a": [[..]], "b": [..]}` (optional `"n"` for row-free
//!   systems, optional `"labels"`), or CSV with a header row where the last
//!   column is `b`. CSV headers of the form `x<label>` carry column labels.
//! - Maps: JSON `{"m": [[..]], "t": [..]}`; `t` defaults to zero.
//! - Generators: JSON `{"g": [[..]]}`, row-major n×r (columns are rays).

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;
use polars::prelude::*;
use polyproj::affine::AffineMap;
use polyproj::HRep;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemDoc {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<usize>>,
}

impl SystemDoc {
    pub fn from_hrep(sys: &HRep) -> Self {
        Self {
            a: (0..sys.nrows()).map(|i| sys.row(i).0).collect(),
            b: sys.b().iter().copied().collect(),
            n: Some(sys.dim()),
            labels: Some(sys.labels().to_vec()),
        }
    }

    pub fn into_hrep(self) -> Result<HRep> {
        let a = matrix_from_rows("a", &self.a, self.n)?;
        let sys = match self.labels {
            Some(labels) => HRep::with_labels(a, self.b, labels)?,
            None => HRep::new(a, self.b)?,
        };
        Ok(sys)
    }
}

#[derive(Debug, Deserialize)]
pub struct MapDoc {
    pub m: Vec<Vec<f64>>,
    #[serde(default)]
    pub t: Option<Vec<f64>>,
    #[serde(default)]
    pub n: Option<usize>,
}

impl MapDoc {
    pub fn into_map(self) -> Result<AffineMap> {
        let m = matrix_from_rows("m", &self.m, self.n)?;
        let map = match self.t {
            Some(t) => AffineMap::new(m, t)?,
            None => AffineMap::linear(m),
        };
        Ok(map)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratorsDoc {
    pub g: Vec<Vec<f64>>,
}

impl GeneratorsDoc {
    pub fn from_matrix(g: &DMatrix<f64>) -> Self {
        Self {
            g: g.row_iter().map(|r| r.iter().copied().collect()).collect(),
        }
    }

    pub fn into_matrix(self) -> Result<DMatrix<f64>> {
        matrix_from_rows("g", &self.g, None)
    }
}

/// Dense matrix from JSON rows. `ncols` fixes the width when there are no rows.
fn matrix_from_rows(what: &str, rows: &[Vec<f64>], ncols: Option<usize>) -> Result<DMatrix<f64>> {
    let width = rows.first().map(Vec::len).or(ncols).unwrap_or(0);
    if let Some(n) = ncols {
        if n != width {
            bail!("{what}: declared {n} columns, rows have {width}");
        }
    }
    if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        bail!("{what}: row {i} has {} entries, expected {width}", r.len());
    }
    Ok(DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j]))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Read a system from `.csv` or JSON (any other extension).
pub fn read_system(path: &Path) -> Result<HRep> {
    if is_csv(path) {
        read_csv_system(path)
    } else {
        read_json::<SystemDoc>(path)?.into_hrep()
    }
}

/// Write a system as `.csv` or JSON (any other extension).
pub fn write_system(path: &Path, sys: &HRep) -> Result<()> {
    if is_csv(path) {
        write_csv_system(path, sys)
    } else {
        write_json(path, &SystemDoc::from_hrep(sys))
    }
}

fn read_csv_system(path: &Path) -> Result<HRep> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    let Some((b_col, a_cols)) = df.get_columns().split_last() else {
        bail!("{}: no columns", path.display());
    };
    tracing::debug!(rows = df.height(), cols = df.width(), "csv system");

    let b = column_values(b_col)?;
    let mut a = DMatrix::zeros(df.height(), a_cols.len());
    for (j, col) in a_cols.iter().enumerate() {
        for (i, v) in column_values(col)?.into_iter().enumerate() {
            a[(i, j)] = v;
        }
    }
    let labels: Option<Vec<usize>> = a_cols
        .iter()
        .map(|c| {
            let name = c.name().to_string();
            name.strip_prefix('x').and_then(|s| s.parse().ok())
        })
        .collect();
    let sys = match labels {
        Some(labels) => HRep::with_labels(a, b, labels)?,
        None => HRep::new(a, b)?,
    };
    Ok(sys)
}

fn column_values(col: &Series) -> Result<Vec<f64>> {
    let values = col.cast(&DataType::Float64)?;
    values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.with_context(|| format!("column {} row {i} is empty", col.name())))
        .collect()
}

fn write_csv_system(path: &Path, sys: &HRep) -> Result<()> {
    let mut columns: Vec<Series> = sys
        .labels()
        .iter()
        .enumerate()
        .map(|(j, label)| {
            let name = format!("x{label}");
            let values: Vec<f64> = sys.a().column(j).iter().copied().collect();
            Series::new(name.as_str().into(), values)
        })
        .collect();
    let b: Vec<f64> = sys.b().iter().copied().collect();
    columns.push(Series::new("b".into(), b));
    let mut df = DataFrame::new(columns)?;

    ensure_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn triangle() -> HRep {
        HRep::from_row_slice(2, &[-1.0, 0.0, 0.0, -1.0, 1.0, 1.0], &[0.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn json_system_round_trip_keeps_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sys.json");
        let sys = HRep::with_labels(
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, -1.0, 0.5]),
            vec![3.0, 4.0],
            vec![2, 7],
        )
        .unwrap();
        write_system(&path, &sys).unwrap();
        assert_eq!(read_system(&path).unwrap(), sys);
    }

    #[test]
    fn json_without_rows_needs_width() {
        let doc: SystemDoc = serde_json::from_str(r#"{"a": [], "b": [], "n": 3}"#).unwrap();
        let sys = doc.into_hrep().unwrap();
        assert_eq!((sys.nrows(), sys.dim()), (0, 3));

        let doc: SystemDoc = serde_json::from_str(r#"{"a": [], "b": []}"#).unwrap();
        assert_eq!(doc.into_hrep().unwrap().dim(), 0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let doc: SystemDoc =
            serde_json::from_str(r#"{"a": [[1, 2], [3]], "b": [1, 2]}"#).unwrap();
        let err = doc.into_hrep().unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 entries"));

        let doc: SystemDoc = serde_json::from_str(r#"{"a": [[1, 2]], "b": [1, 2]}"#).unwrap();
        let err = doc.into_hrep().unwrap_err();
        assert!(err.to_string().contains("b must have shape"));
    }

    #[test]
    fn csv_system_reads_last_column_as_rhs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tri.csv");
        fs::write(&path, "x0,x1,b\n-1,0,0\n0,-1,0\n1,1,1\n").unwrap();
        assert_eq!(read_system(&path).unwrap(), triangle());
    }

    #[test]
    fn csv_round_trip_keeps_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("sys.csv");
        let tri = triangle();
        let sys = HRep::with_labels(tri.a().clone(), tri.b().clone(), vec![4, 9]).unwrap();
        write_system(&path, &sys).unwrap();
        let back = read_system(&path).unwrap();
        assert_eq!(back.labels(), &[4, 9]);
        assert_eq!(back.a(), sys.a());
        assert_eq!(back.b(), sys.b());
    }

    #[test]
    fn csv_with_free_headers_gets_default_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("free.csv");
        fs::write(&path, "u,v,rhs\n1,0,2\n0,1,3\n").unwrap();
        let sys = read_system(&path).unwrap();
        assert_eq!(sys.labels(), &[0, 1]);
        assert_eq!(sys.b().as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn map_offset_defaults_to_zero() {
        let doc: MapDoc = serde_json::from_str(r#"{"m": [[2, 0], [0, 2]]}"#).unwrap();
        let map = doc.into_map().unwrap();
        assert_eq!(map.t().as_slice(), &[0.0, 0.0]);

        let doc: MapDoc = serde_json::from_str(r#"{"m": [[1, 1]], "t": [1, 2]}"#).unwrap();
        assert!(doc.into_map().is_err());
    }

    #[test]
    fn generators_are_row_major() {
        let doc: GeneratorsDoc = serde_json::from_str(r#"{"g": [[1, 0, -1], [1, 1, 2]]}"#).unwrap();
        let g = doc.into_matrix().unwrap();
        assert_eq!(g.shape(), (2, 3));
        assert_eq!(g[(1, 2)], 2.0);
        assert_eq!(GeneratorsDoc::from_matrix(&g).g[0], vec![1.0, 0.0, -1.0]);
    }
}
