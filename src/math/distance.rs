//! Distance metrics between circulation states.
//!
//! ## Purpose
//!
//! This module measures how close a candidate circulation field is to the
//! target field. Two metrics are available: a plain Euclidean norm over all
//! grid points, and the Teweles–Wobus score, which compares the spatial
//! gradients of the two fields rather than their values.
//!
//! ## Design notes
//!
//! * **Decoupling**: Metric selection (`DistanceMethod`) is separate from the
//!   per-grid precomputation (`GradientGeometry`) and from the calculator that
//!   binds the two (`AnalogDistanceCalculator`).
//! * **Independence**: Every (target, candidate) distance is a pure function of
//!   the two fields, so a distance table can be filled in any order or in
//!   parallel.
//!
//! ## Key concepts
//!
//! * **Euclidean**: √(Σ(Tₚ − Fₚ)²), unweighted.
//! * **Teweles–Wobus**: `100 · Σ|∇T − ∇F| / Σ max(|∇T|, |∇F|)` over centered
//!   differences at interior points, with longitudinal differences scaled by
//!   `cos(lat) · 2Δlon` and latitudinal ones by `2Δlat`.
//!
//! ## Invariants
//!
//! * Distances are non-negative; a field is at distance zero from itself.
//! * Teweles–Wobus is invariant to adding a constant to both fields.
//!
//! ## Non-goals
//!
//! * This module does not rank distances or apply exclusions.

use core::fmt;
use core::str::FromStr;

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::Grid;

// ============================================================================
// Distance Method
// ============================================================================

/// Metric used to compare circulation states.
///
/// Textual names follow the legacy parameter files: `EUCLIDE` and `TEWELES`
/// (case-insensitive; `euclidean` and `teweles-wobus` are accepted too).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistanceMethod {
    /// Euclidean distance over all grid points.
    #[default]
    Euclidean,

    /// Teweles–Wobus gradient-shape score.
    TewelesWobus,
}

impl FromStr for DistanceMethod {
    type Err = AdjustmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclide" | "euclidean" => Ok(Self::Euclidean),
            "teweles" | "teweles-wobus" | "teweles_wobus" | "teweleswobus" => {
                Ok(Self::TewelesWobus)
            }
            _ => Err(AdjustmentError::UnknownDistanceMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for DistanceMethod {
    type Error = AdjustmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DistanceMethod> for String {
    fn from(method: DistanceMethod) -> Self {
        method.to_string()
    }
}

impl fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("EUCLIDE"),
            Self::TewelesWobus => f.write_str("TEWELES"),
        }
    }
}

// ============================================================================
// Gradient Geometry
// ============================================================================

/// Precomputed grid weights for the Teweles–Wobus score.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientGeometry<T> {
    n_lat: usize,
    n_lon: usize,
    /// `cos(lat_j) · 2Δlon` for every latitude row.
    lon_weights: Vec<T>,
    /// `2Δlat`, shared by all columns.
    lat_weight: T,
}

impl<T: Float> GradientGeometry<T> {
    /// Derive the weights from a grid.
    ///
    /// The spacing is taken from the first two coordinates of each axis.
    pub fn from_grid(grid: &Grid) -> Result<Self, AdjustmentError> {
        let (n_lat, n_lon) = (grid.n_lat(), grid.n_lon());
        if n_lat < 3 || n_lon < 3 {
            return Err(AdjustmentError::GridTooSmall { n_lat, n_lon });
        }

        let dlon = (grid.lons()[1] - grid.lons()[0]).abs();
        let dlat = (grid.lats()[1] - grid.lats()[0]).abs();

        let lon_weights = grid
            .lats()
            .iter()
            .map(|lat| T::from(lat.to_radians().cos() * 2.0 * dlon).unwrap_or_else(T::zero))
            .collect();
        let lat_weight = T::from(2.0 * dlat).unwrap_or_else(T::one);

        Ok(Self {
            n_lat,
            n_lon,
            lon_weights,
            lat_weight,
        })
    }

    /// Number of grid points the geometry expects.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_lat * self.n_lon
    }
}

// ============================================================================
// Distance Computation Functions
// ============================================================================

impl DistanceMethod {
    /// Compute Euclidean distance between two flattened fields.
    #[inline]
    pub fn euclidean<T: Float>(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len(), "Fields must have same size");
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| {
                let diff = ai - bi;
                diff * diff
            })
            .fold(T::zero(), |acc, x| acc + x)
            .sqrt()
    }

    /// Compute the Teweles–Wobus score of `candidate` against `target`.
    ///
    /// Lower is more similar. The conventional range is 0 to 100; fields with
    /// opposing gradients can score up to 200.
    pub fn teweles_wobus<T: Float>(target: &[T], candidate: &[T], geom: &GradientGeometry<T>) -> T {
        debug_assert_eq!(target.len(), geom.n_points());
        debug_assert_eq!(candidate.len(), geom.n_points());

        let n_lon = geom.n_lon;
        let at = |field: &[T], j: usize, i: usize| field[j * n_lon + i];

        let mut diff_lon = T::zero();
        let mut norm_lon = T::zero();
        let mut diff_lat = T::zero();
        let mut norm_lat = T::zero();

        for j in 1..geom.n_lat - 1 {
            let di = geom.lon_weights[j];
            for i in 1..n_lon - 1 {
                let gc = at(candidate, j, i + 1) - at(candidate, j, i - 1);
                let gt = at(target, j, i + 1) - at(target, j, i - 1);
                diff_lon = diff_lon + (gc - gt).abs() / di;
                norm_lon = norm_lon + gc.abs().max(gt.abs()) / di;

                let gc = at(candidate, j + 1, i) - at(candidate, j - 1, i);
                let gt = at(target, j + 1, i) - at(target, j - 1, i);
                diff_lat = diff_lat + (gc - gt).abs() / geom.lat_weight;
                norm_lat = norm_lat + gc.abs().max(gt.abs()) / geom.lat_weight;
            }
        }

        let norm = norm_lon + norm_lat;
        if norm <= T::zero() {
            // Both fields flat over the interior: identical gradient structure.
            return T::zero();
        }
        T::from(100.0).unwrap_or_else(T::one) * (diff_lon + diff_lat) / norm
    }
}

// ============================================================================
// Field Distance Calculator
// ============================================================================

/// Distance between two flattened fields.
pub trait FieldDistance<T: Float> {
    /// Distance of `candidate` from `target`.
    fn distance(&self, target: &[T], candidate: &[T]) -> T;
}

/// Binds a [`DistanceMethod`] to the grid it operates on.
#[derive(Debug, Clone)]
pub struct AnalogDistanceCalculator<T> {
    method: DistanceMethod,
    geometry: Option<GradientGeometry<T>>,
}

impl<T: Float> AnalogDistanceCalculator<T> {
    /// Prepare a calculator for fields on `grid`.
    pub fn new(method: DistanceMethod, grid: &Grid) -> Result<Self, AdjustmentError> {
        let geometry = match method {
            DistanceMethod::Euclidean => None,
            DistanceMethod::TewelesWobus => Some(GradientGeometry::from_grid(grid)?),
        };
        Ok(Self { method, geometry })
    }

    /// The configured metric.
    pub fn method(&self) -> DistanceMethod {
        self.method
    }
}

impl<T: Float> FieldDistance<T> for AnalogDistanceCalculator<T> {
    fn distance(&self, target: &[T], candidate: &[T]) -> T {
        match (&self.method, &self.geometry) {
            (DistanceMethod::TewelesWobus, Some(geom)) => {
                DistanceMethod::teweles_wobus(target, candidate, geom)
            }
            _ => DistanceMethod::euclidean(target, candidate),
        }
    }
}
