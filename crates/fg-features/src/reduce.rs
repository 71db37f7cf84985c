use std::fmt;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use fg_core::sample::{FLOW_COMPONENTS, FRAME_COUNT, FlowSample, MID_FRAME};

use crate::integral::IntegralImage;
use crate::partition::partition_grid;

/// Identité d'une granularité de réduction : blocs `rows × cols`.
///
/// # Example
/// ```
/// use fg_features::reduce::GridSpec;
/// let grid = GridSpec { rows: 4, cols: 10 };
/// assert_eq!(grid.feature_len(), 80);
/// assert_eq!(grid.to_string(), "4x10");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct GridSpec {
    /// Blocs sur l'axe vertical.
    pub rows: usize,
    /// Blocs sur l'axe horizontal.
    pub cols: usize,
}

impl GridSpec {
    /// Longueur du vecteur de features produit : rows × cols × 2.
    #[inline]
    #[must_use]
    pub fn feature_len(&self) -> usize {
        self.rows * self.cols * FLOW_COMPONENTS
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Réduit un échantillon en sommes de blocs, frame par frame.
///
/// Pour chaque frame : image intégrale, puis somme de chaque région de la
/// partition `rows × cols` dans l'ordre row-major. Résultat de forme
/// `(10, rows·cols, 2)`.
///
/// # Panics
/// Panics si `grid` est hors de `1..=40` par axe (voir
/// [`partition_grid`]).
#[must_use]
pub fn reduce_sample(sample: &FlowSample, grid: GridSpec) -> Array3<f32> {
    let regions = partition_grid(grid.rows, grid.cols);
    let mut reduced = Array3::zeros((FRAME_COUNT, regions.len(), FLOW_COMPONENTS));

    for frame_idx in 0..FRAME_COUNT {
        let image = IntegralImage::new(sample.frame(frame_idx));
        for (region_idx, region) in regions.iter().enumerate() {
            let sum = image.region_sum(region);
            for (c, &v) in sum.iter().enumerate() {
                reduced[[frame_idx, region_idx, c]] = v;
            }
        }
    }
    reduced
}

/// Vecteur de features d'un échantillon : la frame représentative
/// (index [`MID_FRAME`]) de la réduction, aplatie région puis composante.
///
/// Longueur garantie : [`GridSpec::feature_len`].
///
/// # Example
/// ```
/// use fg_core::sample::{FlowSample, SAMPLE_LEN};
/// use fg_features::reduce::{GridSpec, feature_vector};
/// let sample = FlowSample::from_values(vec![0.0; SAMPLE_LEN]).unwrap();
/// let features = feature_vector(&sample, GridSpec { rows: 2, cols: 2 });
/// assert_eq!(features.len(), 8);
/// ```
#[must_use]
pub fn feature_vector(sample: &FlowSample, grid: GridSpec) -> Vec<f32> {
    let reduced = reduce_sample(sample, grid);
    reduced
        .index_axis(ndarray::Axis(0), MID_FRAME)
        .iter()
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::sample::{GRID_SIZE, SAMPLE_LEN};
    use ndarray::Array4;

    fn sample_from_fn(f: impl Fn(usize, usize, usize, usize) -> f32) -> FlowSample {
        let data = Array4::from_shape_fn(
            (FRAME_COUNT, GRID_SIZE, GRID_SIZE, FLOW_COMPONENTS),
            |(t, x, y, c)| f(t, x, y, c),
        );
        match FlowSample::from_array(data) {
            Ok(s) => s,
            Err(e) => panic!("échantillon synthétique invalide : {e}"),
        }
    }

    #[test]
    fn feature_vector_length_matches_grid() {
        let sample = match FlowSample::from_values(vec![0.0; SAMPLE_LEN]) {
            Ok(s) => s,
            Err(e) => panic!("échantillon invalide : {e}"),
        };
        for &(rows, cols) in &[(1, 1), (2, 5), (4, 4), (10, 20)] {
            let grid = GridSpec { rows, cols };
            assert_eq!(feature_vector(&sample, grid).len(), grid.feature_len());
        }
    }

    #[test]
    fn constant_sample_end_to_end() {
        // Constante C partout : chaque bloc 2x2 couvre 400 cellules,
        // somme = C·400 par composante, ordre row-major.
        const C: f32 = 3.0;
        let sample = sample_from_fn(|_, _, _, _| C);
        let features = feature_vector(&sample, GridSpec { rows: 2, cols: 2 });
        assert_eq!(features.len(), 8);
        for v in features {
            assert!((v - C * 400.0).abs() < 0.5);
        }
    }

    #[test]
    fn feature_vector_uses_mid_frame() {
        // Seule la frame 4 est non nulle : les features doivent la refléter.
        let sample = sample_from_fn(|t, _, _, _| if t == MID_FRAME { 1.0 } else { 0.0 });
        let features = feature_vector(&sample, GridSpec { rows: 1, cols: 1 });
        assert!((features[0] - 1600.0).abs() < 0.5);
        assert!((features[1] - 1600.0).abs() < 0.5);

        let other = sample_from_fn(|t, _, _, _| if t == 0 { 1.0 } else { 0.0 });
        let features = feature_vector(&other, GridSpec { rows: 1, cols: 1 });
        assert_eq!(features, vec![0.0, 0.0]);
    }

    #[test]
    fn regions_flatten_row_major_then_component() {
        // Quadrants distincts sur la frame du milieu : l'ordre aplati est
        // région 0..3 (ligne puis colonne), composantes x puis y.
        let sample = sample_from_fn(|t, x, y, c| {
            if t != MID_FRAME {
                return 0.0;
            }
            let quadrant = (x / 20) * 10 + y / 20;
            let base = quadrant as f32;
            if c == 0 { base } else { -base }
        });
        let features = feature_vector(&sample, GridSpec { rows: 2, cols: 2 });
        // Région 0 : x<20, y<20 → quadrant 0. Région 1 : x≥20, y<20 → 10.
        // Région 2 : x<20, y≥20 → 1. Région 3 : x≥20, y≥20 → 11.
        let expected = [0.0, 0.0, 4000.0, -4000.0, 400.0, -400.0, 4400.0, -4400.0];
        assert_eq!(features.len(), expected.len());
        for (got, want) in features.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 0.5, "attendu {want}, obtenu {got}");
        }
    }

    #[test]
    fn reduce_sample_shape() {
        let sample = sample_from_fn(|_, _, _, _| 0.25);
        let reduced = reduce_sample(&sample, GridSpec { rows: 4, cols: 10 });
        assert_eq!(reduced.shape(), &[FRAME_COUNT, 40, FLOW_COMPONENTS]);
    }
}
