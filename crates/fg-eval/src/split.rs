use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use fg_core::error::FlowError;
use fg_core::sample::GestureData;
use fg_dataset::table::{FeatureTable, encode_labels};

/// Jeu d'entraînement et de test, labels encodés.
pub struct Split {
    /// Features d'entraînement, une ligne par échantillon.
    pub x_train: Array2<f32>,
    /// Features de test.
    pub x_test: Array2<f32>,
    /// Labels encodés d'entraînement.
    pub y_train: Vec<usize>,
    /// Labels encodés de test.
    pub y_test: Vec<usize>,
    /// Classes dans l'ordre d'encodage.
    pub classes: Vec<String>,
}

/// Split déterministe d'une table de features.
///
/// Mélange seedé ([`StdRng`]) puis découpe : `test_fraction` des lignes
/// (au moins une, au plus n−1) vont au test. Même graine, même découpe.
///
/// # Errors
/// [`FlowError::EmptyDataset`] si la table a moins de deux lignes.
pub fn train_test_split_table(
    table: &FeatureTable,
    test_fraction: f32,
    seed: u64,
) -> Result<Split, FlowError> {
    let width = table.grid.feature_len();
    split_rows(&table.features, &table.labels, width, test_fraction, seed)
}

/// Split déterministe des échantillons bruts, sans réduction : chaque
/// échantillon est aplati en un vecteur de 32 000 valeurs.
///
/// Point d'entrée explicite, distinct du split de table — l'appelant choisit
/// la représentation, il n'y a pas de dispatch sur le type d'entrée.
///
/// # Errors
/// [`FlowError::EmptyDataset`] si `data` contient moins de deux échantillons.
pub fn train_test_split_raw(
    data: &GestureData,
    test_fraction: f32,
    seed: u64,
) -> Result<Split, FlowError> {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (gesture, samples) in data {
        for sample in samples {
            rows.push(sample.flattened());
            labels.push(gesture.clone());
        }
    }
    let width = rows.first().map_or(0, Vec::len);
    split_rows(&rows, &labels, width, test_fraction, seed)
}

fn split_rows(
    rows: &[Vec<f32>],
    labels: &[String],
    width: usize,
    test_fraction: f32,
    seed: u64,
) -> Result<Split, FlowError> {
    let n = rows.len();
    if n < 2 {
        return Err(FlowError::EmptyDataset);
    }

    let (encoded, classes) = encode_labels(labels);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f32 * test_fraction).ceil() as usize).clamp(1, n - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let gather = |idx: &[usize]| -> Result<Array2<f32>, FlowError> {
        let mut flat = Vec::with_capacity(idx.len() * width);
        for &i in idx {
            if rows[i].len() != width {
                return Err(FlowError::ShapeMismatch {
                    expected: width,
                    actual: rows[i].len(),
                });
            }
            flat.extend_from_slice(&rows[i]);
        }
        Array2::from_shape_vec((idx.len(), width), flat).map_err(|_| FlowError::ShapeMismatch {
            expected: idx.len() * width,
            actual: 0,
        })
    };

    Ok(Split {
        x_train: gather(train_idx)?,
        x_test: gather(test_idx)?,
        y_train: train_idx.iter().map(|&i| encoded[i]).collect(),
        y_test: test_idx.iter().map(|&i| encoded[i]).collect(),
        classes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::sample::{FlowSample, SAMPLE_LEN};
    use fg_features::reduce::GridSpec;

    fn table_with_rows(n: usize) -> FeatureTable {
        let grid = GridSpec { rows: 1, cols: 1 };
        FeatureTable {
            grid,
            features: (0..n).map(|i| vec![i as f32, -(i as f32)]).collect(),
            labels: (0..n)
                .map(|i| if i % 2 == 0 { "a".into() } else { "b".into() })
                .collect(),
        }
    }

    #[test]
    fn split_respects_test_fraction() {
        let table = table_with_rows(16);
        let split = match train_test_split_table(&table, 0.25, 42) {
            Ok(s) => s,
            Err(e) => panic!("split : {e}"),
        };
        assert_eq!(split.x_test.nrows(), 4);
        assert_eq!(split.x_train.nrows(), 12);
        assert_eq!(split.y_test.len(), 4);
        assert_eq!(split.y_train.len(), 12);
    }

    #[test]
    fn split_is_deterministic_for_fixed_seed() {
        let table = table_with_rows(20);
        let first = match train_test_split_table(&table, 0.25, 42) {
            Ok(s) => s,
            Err(e) => panic!("split : {e}"),
        };
        let second = match train_test_split_table(&table, 0.25, 42) {
            Ok(s) => s,
            Err(e) => panic!("split : {e}"),
        };
        assert_eq!(first.x_test, second.x_test);
        assert_eq!(first.y_train, second.y_train);

        let other_seed = match train_test_split_table(&table, 0.25, 7) {
            Ok(s) => s,
            Err(e) => panic!("split : {e}"),
        };
        // Même taille, découpe différente (20 lignes distinctes).
        assert_eq!(other_seed.x_test.nrows(), first.x_test.nrows());
        assert_ne!(other_seed.x_test, first.x_test);
    }

    #[test]
    fn tiny_table_is_rejected() {
        let table = table_with_rows(1);
        assert!(matches!(
            train_test_split_table(&table, 0.25, 42),
            Err(FlowError::EmptyDataset)
        ));
    }

    #[test]
    fn raw_split_flattens_full_samples() {
        let mut data = GestureData::new();
        let make = |c: f32| match FlowSample::from_values(vec![c; SAMPLE_LEN]) {
            Ok(s) => s,
            Err(e) => panic!("échantillon invalide : {e}"),
        };
        data.insert("a".into(), vec![make(0.0), make(1.0)]);
        data.insert("b".into(), vec![make(2.0), make(3.0)]);

        let split = match train_test_split_raw(&data, 0.25, 42) {
            Ok(s) => s,
            Err(e) => panic!("split : {e}"),
        };
        assert_eq!(split.x_train.ncols(), SAMPLE_LEN);
        assert_eq!(split.x_test.ncols(), SAMPLE_LEN);
        assert_eq!(split.x_train.nrows() + split.x_test.nrows(), 4);
        // Chaque geste a reçu un label encodé distinct.
        assert_eq!(split.classes.len(), 2);
    }
}
