use anyhow::{Result, bail};
use ndarray::Array2;

use fg_dataset::table::FeatureTable;
use fg_features::reduce::GridSpec;

use crate::classifier::{Classifier, Model};
use crate::metrics::ConfusionMatrix;
use crate::split::train_test_split_table;

/// Produit cartésien des granularités candidates, ordre row-major
/// (lignes puis colonnes).
///
/// # Example
/// ```
/// use fg_eval::sweep::grid_pairs;
/// use fg_features::reduce::GridSpec;
/// let pairs = grid_pairs(&[4, 10]);
/// assert_eq!(pairs[1], GridSpec { rows: 4, cols: 10 });
/// assert_eq!(pairs[2], GridSpec { rows: 10, cols: 4 });
/// ```
#[must_use]
pub fn grid_pairs(divs: &[usize]) -> Vec<GridSpec> {
    let mut pairs = Vec::with_capacity(divs.len() * divs.len());
    for &rows in divs {
        for &cols in divs {
            pairs.push(GridSpec { rows, cols });
        }
    }
    pairs
}

/// Un modèle ajusté sur une table, avec son évaluation.
pub struct FittedModel {
    /// Granularité de la table d'origine.
    pub grid: GridSpec,
    /// Accuracy sur le jeu de test.
    pub accuracy: f32,
    /// Matrice de confusion sur le jeu de test.
    pub confusion: ConfusionMatrix,
    /// Le modèle lui-même, prêt à prédire.
    pub model: Box<dyn Model>,
}

/// Résultat du balayage : matrice d'accuracy `divs × divs` et modèles
/// ajustés, dans l'ordre de [`grid_pairs`].
pub struct SweepOutcome {
    /// Granularités balayées.
    pub divs: Vec<usize>,
    /// `accuracy[[i, j]]` = score pour rows = divs[i], cols = divs[j].
    pub accuracy: Array2<f32>,
    /// Un modèle par case, ordre row-major.
    pub fitted: Vec<FittedModel>,
}

impl SweepOutcome {
    /// La meilleure case du balayage (première en cas d'égalité).
    #[must_use]
    pub fn best(&self) -> Option<&FittedModel> {
        self.fitted
            .iter()
            .reduce(|best, m| if m.accuracy > best.accuracy { m } else { best })
    }
}

/// Entraîne un classifieur par table et relève son accuracy.
///
/// `tables` doit suivre l'ordre de [`grid_pairs`] sur `divs` — une table par
/// case de la matrice. Le split est déterministe (`seed`). Les erreurs du
/// classifieur sont propagées telles quelles.
///
/// # Errors
/// Erreur si `tables` ne couvre pas exactement le produit cartésien, si un
/// split échoue, ou si le classifieur échoue.
pub fn optimize_feature_dimensions(
    divs: &[usize],
    tables: &[FeatureTable],
    classifier: &dyn Classifier,
    test_fraction: f32,
    seed: u64,
) -> Result<SweepOutcome> {
    let pairs = grid_pairs(divs);
    if tables.len() != pairs.len() {
        bail!(
            "{} table(s) fournie(s) pour {} case(s) du balayage",
            tables.len(),
            pairs.len()
        );
    }

    let mut accuracy = Array2::zeros((divs.len(), divs.len()));
    let mut fitted = Vec::with_capacity(pairs.len());

    for (idx, (table, grid)) in tables.iter().zip(&pairs).enumerate() {
        if table.grid != *grid {
            bail!(
                "table {idx} : granularité {grid} attendue, {} trouvée",
                table.grid
            );
        }
        let split = train_test_split_table(table, test_fraction, seed)?;
        let model = classifier.fit(&split.x_train, &split.y_train)?;
        let acc = model.score(&split.x_test, &split.y_test);
        let confusion = ConfusionMatrix::from_predictions(
            &split.y_test,
            &model.predict(&split.x_test),
            split.classes.clone(),
        );

        accuracy[[idx / divs.len(), idx % divs.len()]] = acc;
        log::info!("Score pour {grid} : {acc:.3}");

        fitted.push(FittedModel {
            grid: *grid,
            accuracy: acc,
            confusion,
            model,
        });
    }

    Ok(SweepOutcome {
        divs: divs.to_vec(),
        accuracy,
        fitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NearestCentroid;
    use fg_core::sample::{FlowSample, GestureData, SAMPLE_LEN};
    use fg_dataset::table::FeatureTable;

    fn separable_data() -> GestureData {
        let make = |c: f32| match FlowSample::from_values(vec![c; SAMPLE_LEN]) {
            Ok(s) => s,
            Err(e) => panic!("échantillon invalide : {e}"),
        };
        let mut data = GestureData::new();
        data.insert("slow".into(), vec![make(0.0), make(0.1), make(0.2)]);
        data.insert("fast".into(), vec![make(10.0), make(10.1), make(10.2)]);
        data
    }

    #[test]
    fn pairs_cover_cross_product() {
        let pairs = grid_pairs(&[4, 10, 20]);
        assert_eq!(pairs.len(), 9);
        assert_eq!(pairs[0], GridSpec { rows: 4, cols: 4 });
        assert_eq!(pairs[8], GridSpec { rows: 20, cols: 20 });
    }

    #[test]
    fn sweep_fills_accuracy_matrix() {
        let data = separable_data();
        let divs = [2usize, 4];
        let tables: Vec<FeatureTable> = grid_pairs(&divs)
            .into_iter()
            .map(|grid| FeatureTable::from_gesture_data(&data, grid))
            .collect();

        let outcome = match optimize_feature_dimensions(&divs, &tables, &NearestCentroid, 0.25, 42)
        {
            Ok(o) => o,
            Err(e) => panic!("balayage : {e}"),
        };
        assert_eq!(outcome.accuracy.shape(), &[2, 2]);
        assert_eq!(outcome.fitted.len(), 4);
        // Clusters très séparés : accuracy parfaite sur chaque case.
        for &acc in &outcome.accuracy {
            assert!((acc - 1.0).abs() < f32::EPSILON);
        }
        let best = match outcome.best() {
            Some(b) => b,
            None => panic!("aucun modèle ajusté"),
        };
        assert!((best.accuracy - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_order_tables_are_rejected() {
        let data = separable_data();
        let divs = [2usize, 4];
        let mut tables: Vec<FeatureTable> = grid_pairs(&divs)
            .into_iter()
            .map(|grid| FeatureTable::from_gesture_data(&data, grid))
            .collect();
        tables.swap(0, 1);
        assert!(optimize_feature_dimensions(&divs, &tables, &NearestCentroid, 0.25, 42).is_err());
    }

    #[test]
    fn wrong_table_count_is_rejected() {
        let data = separable_data();
        let tables = vec![FeatureTable::from_gesture_data(
            &data,
            GridSpec { rows: 2, cols: 2 },
        )];
        assert!(optimize_feature_dimensions(&[2, 4], &tables, &NearestCentroid, 0.25, 42).is_err());
    }
}
