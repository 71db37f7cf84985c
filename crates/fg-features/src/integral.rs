use ndarray::{Array3, ArrayView3, Axis};

use fg_core::sample::{FLOW_COMPONENTS, GRID_SIZE};

use crate::partition::Region;

/// Image intégrale (summed-area table) d'une frame, forme (40, 40, 2).
///
/// Chaque cellule `[x, y]` contient la somme cumulée 2D de toutes les
/// cellules d'indices `≤ x` et `≤ y`, par composante de flux — somme
/// cumulée sur l'axe 0 composée avec l'axe 1. Permet des requêtes de somme
/// rectangulaire en O(1).
///
/// # Example
/// ```
/// use fg_features::integral::IntegralImage;
/// use ndarray::Array3;
/// let frame = Array3::from_elem((40, 40, 2), 1.0f32);
/// let image = IntegralImage::new(frame.view());
/// assert_eq!(image.at(39, 39, 0), 1600.0);
/// ```
pub struct IntegralImage {
    data: Array3<f32>,
}

impl IntegralImage {
    /// Construit l'image intégrale d'une frame (40, 40, 2).
    #[must_use]
    pub fn new(frame: ArrayView3<'_, f32>) -> Self {
        debug_assert_eq!(
            frame.shape(),
            [GRID_SIZE, GRID_SIZE, FLOW_COMPONENTS],
            "frame shape"
        );
        let mut data = frame.to_owned();
        data.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);
        data.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
        Self { data }
    }

    /// Valeur cumulée en `[x, y]` pour la composante `c`.
    #[inline]
    #[must_use]
    pub fn at(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[[x, y, c]]
    }

    /// Somme des valeurs originales (pré-intégrale) dans `region`, par
    /// composante, via l'identité d'inclusion–exclusion :
    ///
    /// `I[x1,y1] − I[x0−1,y1] − I[x1,y0−1] + I[x0−1,y0−1]`
    ///
    /// Les termes à indice négatif sont omis (jamais enroulés ni clampés).
    ///
    /// # Example
    /// ```
    /// use fg_features::integral::IntegralImage;
    /// use fg_features::partition::Region;
    /// use ndarray::Array3;
    /// let frame = Array3::from_elem((40, 40, 2), 2.0f32);
    /// let image = IntegralImage::new(frame.view());
    /// let sum = image.region_sum(&Region { x0: 10, y0: 10, x1: 19, y1: 19 });
    /// assert_eq!(sum, [200.0, 200.0]);
    /// ```
    #[must_use]
    pub fn region_sum(&self, region: &Region) -> [f32; FLOW_COMPONENTS] {
        let Region { x0, y0, x1, y1 } = *region;
        let mut sum = [0.0f32; FLOW_COMPONENTS];
        for (c, out) in sum.iter_mut().enumerate() {
            let mut value = self.at(x1, y1, c);
            if x0 > 0 && y0 > 0 {
                value += self.at(x0 - 1, y0 - 1, c);
            }
            if x0 > 0 {
                value -= self.at(x0 - 1, y1, c);
            }
            if y0 > 0 {
                value -= self.at(x1, y0 - 1, c);
            }
            *out = value;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition_grid;
    use ndarray::Array3;

    fn frame_from_fn(f: impl Fn(usize, usize, usize) -> f32) -> Array3<f32> {
        Array3::from_shape_fn((GRID_SIZE, GRID_SIZE, FLOW_COMPONENTS), |(x, y, c)| {
            f(x, y, c)
        })
    }

    #[test]
    fn zero_frame_gives_zero_integral() {
        let frame = frame_from_fn(|_, _, _| 0.0);
        let image = IntegralImage::new(frame.view());
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                assert_eq!(image.at(x, y, 0), 0.0);
                assert_eq!(image.at(x, y, 1), 0.0);
            }
        }
    }

    #[test]
    fn full_grid_sum_equals_frame_total() {
        let frame = frame_from_fn(|x, y, c| ((x + 2 * y + c) % 7) as f32 * 0.25);
        let expected: [f32; 2] = [
            frame.index_axis(Axis(2), 0).sum(),
            frame.index_axis(Axis(2), 1).sum(),
        ];
        let image = IntegralImage::new(frame.view());
        let sum = image.region_sum(&Region { x0: 0, y0: 0, x1: 39, y1: 39 });
        assert!((sum[0] - expected[0]).abs() < 0.5);
        assert!((sum[1] - expected[1]).abs() < 0.5);
    }

    #[test]
    fn single_cell_sum_equals_raw_value() {
        let frame = frame_from_fn(|x, y, c| ((x * 3 + y * 5 + c) % 13) as f32);
        let image = IntegralImage::new(frame.view());
        for &(x, y) in &[(0, 0), (0, 17), (23, 0), (12, 31), (39, 39)] {
            let sum = image.region_sum(&Region { x0: x, y0: y, x1: x, y1: y });
            assert!((sum[0] - frame[[x, y, 0]]).abs() < 0.05, "cellule ({x},{y})");
            assert!((sum[1] - frame[[x, y, 1]]).abs() < 0.05, "cellule ({x},{y})");
        }
    }

    #[test]
    fn partition_sums_add_up_to_bounding_box() {
        let frame = frame_from_fn(|x, y, c| ((x * 7 + y * 3 + c) % 11) as f32 - 5.0);
        let image = IntegralImage::new(frame.view());

        // 12x12 laisse un reste : la boîte englobante s'arrête à 35.
        let regions = partition_grid(12, 12);
        let mut total = [0.0f32; 2];
        for region in &regions {
            let s = image.region_sum(region);
            total[0] += s[0];
            total[1] += s[1];
        }
        let bbox = image.region_sum(&Region { x0: 0, y0: 0, x1: 35, y1: 35 });
        assert!((total[0] - bbox[0]).abs() < 0.1);
        assert!((total[1] - bbox[1]).abs() < 0.1);
    }
}
