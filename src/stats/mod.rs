//! Statistics engine: grouping/coordinate column inference and aggregate
//! distributions over a parsed [`ParticleSet`].

pub mod columns;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::data::model::{FieldValue, ParticleSet};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Per-micrograph particle counts, keyed by the grouping column's value.
/// Iteration order is first-occurrence order — stable for display, but not
/// semantically meaningful.
pub type Distribution = IndexMap<String, u64>;

/// Aggregate snapshot over the per-micrograph distribution. All fields are
/// zero when no grouping column was found or no particle carried a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_particles: usize,
    pub total_micrographs: usize,
    pub avg_particles_per_micrograph: f64,
    pub min_particles_per_micrograph: u64,
    pub max_particles_per_micrograph: u64,
    /// Population standard deviation (divisor N): this feeds display cards,
    /// not an estimator.
    pub std_particles_per_micrograph: f64,
}

/// Coordinate values pulled out of the two inferred axis columns.
///
/// The two sequences are filtered independently: a particle whose x is
/// numeric but whose y is not contributes to `x` only. They are NOT
/// index-aligned pairs and may differ in length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateExtract {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_column: String,
    pub y_column: String,
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl ColumnStatistics {
    fn from_values(values: &[f64]) -> Self {
        ColumnStatistics {
            mean: mean(values),
            std: population_std(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            median: median(values),
        }
    }
}

/// 2-D occupancy grid over the inferred coordinate columns, for density
/// rendering. `counts[i][j]` covers `x_edges[i]..x_edges[i+1]` ×
/// `y_edges[j]..y_edges[j+1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateHeatmap {
    pub counts: Vec<Vec<u64>>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub x_column: String,
    pub y_column: String,
}

// ---------------------------------------------------------------------------
// ParticleStatistics – the engine
// ---------------------------------------------------------------------------

/// Statistics over a borrowed [`ParticleSet`].
///
/// The grouping column is inferred once at construction and cached for the
/// engine's lifetime. All read methods are pure functions of that state, so
/// repeated calls return identical results.
pub struct ParticleStatistics<'a> {
    particles: &'a ParticleSet,
    micrograph_col: Option<String>,
}

impl<'a> ParticleStatistics<'a> {
    pub fn new(particles: &'a ParticleSet) -> Self {
        let micrograph_col =
            columns::find_micrograph_column(&particles.column_names()).map(str::to_string);
        match &micrograph_col {
            Some(col) => debug!("using micrograph column: {col}"),
            None => debug!("no micrograph column detected"),
        }
        ParticleStatistics {
            particles,
            micrograph_col,
        }
    }

    /// The inferred grouping column, if any.
    pub fn micrograph_column(&self) -> Option<&str> {
        self.micrograph_col.as_deref()
    }

    /// Particle counts per micrograph, in first-occurrence order. Particles
    /// without a truthy value in the grouping column are left out; with no
    /// grouping column at all the map is empty.
    pub fn distribution_per_micrograph(&self) -> Distribution {
        let Some(col) = &self.micrograph_col else {
            return Distribution::new();
        };

        let mut distribution = Distribution::new();
        for particle in self.particles {
            let Some(value) = particle.get(col) else {
                continue;
            };
            if !value.is_truthy() {
                continue;
            }
            *distribution.entry(value.to_string()).or_insert(0) += 1;
        }
        distribution
    }

    /// Distinct micrograph names in first-occurrence order.
    pub fn micrograph_names(&self) -> Vec<String> {
        self.distribution_per_micrograph().into_keys().collect()
    }

    /// Totals plus mean/min/max/population-std of the per-micrograph counts.
    pub fn summary_statistics(&self) -> SummaryStatistics {
        let distribution = self.distribution_per_micrograph();
        let counts: Vec<f64> = distribution.values().map(|&c| c as f64).collect();

        SummaryStatistics {
            total_particles: self.particles.len(),
            total_micrographs: distribution.len(),
            avg_particles_per_micrograph: mean(&counts),
            min_particles_per_micrograph: distribution.values().copied().min().unwrap_or(0),
            max_particles_per_micrograph: distribution.values().copied().max().unwrap_or(0),
            std_particles_per_micrograph: population_std(&counts),
        }
    }

    /// Numeric values of the two inferred coordinate columns, each axis
    /// filtered independently. `None` when either axis column cannot be
    /// inferred — no partial extracts.
    pub fn coordinates(&self) -> Option<CoordinateExtract> {
        let available = self.particles.column_names();
        let (Some(x_col), Some(y_col)) = (
            columns::find_x_column(&available),
            columns::find_y_column(&available),
        ) else {
            warn!("could not find coordinate columns; available: {available:?}");
            return None;
        };
        debug!("using coordinate columns: {x_col} / {y_col}");

        Some(CoordinateExtract {
            x: self.axis_values(x_col),
            y: self.axis_values(y_col),
            x_column: x_col.to_string(),
            y_column: y_col.to_string(),
        })
    }

    fn axis_values(&self, col: &str) -> Vec<f64> {
        self.particles
            .iter()
            .filter_map(|p| p.get(col).and_then(FieldValue::as_f64))
            .collect()
    }

    /// Descriptive statistics for every coordinate-like column whose present
    /// values are all numeric.
    pub fn coordinate_statistics(&self) -> BTreeMap<String, ColumnStatistics> {
        self.statistics_for_columns(|lower| {
            ["coordinatex", "coordinatey", "_x", "_y"]
                .iter()
                .any(|hint| lower.contains(hint))
        })
    }

    /// Descriptive statistics for defocus columns (CTF estimation values
    /// carried by RELION particle tables).
    pub fn defocus_statistics(&self) -> BTreeMap<String, ColumnStatistics> {
        self.statistics_for_columns(|lower| lower.contains("defocus"))
    }

    fn statistics_for_columns(
        &self,
        matches: impl Fn(&str) -> bool,
    ) -> BTreeMap<String, ColumnStatistics> {
        let mut out = BTreeMap::new();
        for col in self.particles.column_names() {
            if !matches(&col.to_lowercase()) {
                continue;
            }
            if let Some(values) = self.numeric_column(col) {
                out.insert(col.to_string(), ColumnStatistics::from_values(&values));
            }
        }
        out
    }

    /// All values of a column, provided every present value is numeric
    /// (mixed-type columns don't get aggregate statistics).
    fn numeric_column(&self, col: &str) -> Option<Vec<f64>> {
        let mut values = Vec::new();
        for particle in self.particles {
            if let Some(value) = particle.get(col) {
                values.push(value.as_f64()?);
            }
        }
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    /// Bin particle positions into a 2-D grid with square bins of
    /// `bin_size`. Only particles with numeric values on *both* axes
    /// contribute. `None` when the axis columns are unresolved, no such
    /// particle exists, or `bin_size` is not a positive finite number.
    pub fn coordinate_heatmap(&self, bin_size: f64) -> Option<CoordinateHeatmap> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return None;
        }
        let available = self.particles.column_names();
        let x_col = columns::find_x_column(&available)?;
        let y_col = columns::find_y_column(&available)?;

        let pairs: Vec<(f64, f64)> = self
            .particles
            .iter()
            .filter_map(|p| {
                let x = p.get(x_col).and_then(FieldValue::as_f64)?;
                let y = p.get(y_col).and_then(FieldValue::as_f64)?;
                Some((x, y))
            })
            .collect();
        if pairs.is_empty() {
            return None;
        }

        let x_min = pairs.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
        let x_max = pairs
            .iter()
            .map(|(x, _)| *x)
            .fold(f64::NEG_INFINITY, f64::max);
        let y_min = pairs.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
        let y_max = pairs
            .iter()
            .map(|(_, y)| *y)
            .fold(f64::NEG_INFINITY, f64::max);

        let x_edges = bin_edges(x_min, x_max, bin_size);
        let y_edges = bin_edges(y_min, y_max, bin_size);
        let nx = x_edges.len() - 1;
        let ny = y_edges.len() - 1;

        let mut counts = vec![vec![0u64; ny]; nx];
        for (x, y) in pairs {
            let xi = bin_index(x, x_min, bin_size, nx);
            let yi = bin_index(y, y_min, bin_size, ny);
            counts[xi][yi] += 1;
        }

        Some(CoordinateHeatmap {
            counts,
            x_edges,
            y_edges,
            x_column: x_col.to_string(),
            y_column: y_col.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor N.
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Bin boundaries from `min` in `step` increments until `max` is covered.
/// Always yields at least two edges (one bin), so a single-point dataset
/// still produces a usable grid.
fn bin_edges(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut edges = vec![min];
    let mut edge = min + step;
    while edge < max + step {
        edges.push(edge);
        edge += step;
    }
    if edges.len() < 2 {
        edges.push(min + step);
    }
    edges
}

fn bin_index(value: f64, min: f64, step: f64, bins: usize) -> usize {
    let idx = ((value - min) / step).floor() as usize;
    idx.min(bins - 1)
}
