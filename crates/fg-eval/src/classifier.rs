use anyhow::Result;
use ndarray::{Array2, ArrayView1};

use fg_core::config::ClassifierChoice;
use fg_core::error::FlowError;

/// Modèle ajusté, prêt à prédire.
///
/// C'est la moitié "sortie" du contrat du collaborateur externe :
/// `predict(features) → labels` et `score(features, labels) → accuracy`.
pub trait Model {
    /// Prédit un label encodé par ligne de `x`.
    fn predict(&self, x: &Array2<f32>) -> Vec<usize>;

    /// Accuracy sur un jeu labellisé : fraction de prédictions exactes.
    fn score(&self, x: &Array2<f32>, y: &[usize]) -> f32 {
        if y.is_empty() {
            return 0.0;
        }
        let predicted = self.predict(x);
        let correct = predicted.iter().zip(y).filter(|(p, t)| p == t).count();
        correct as f32 / y.len() as f32
    }
}

/// Contrat minimal du classifieur : `fit(features, labels) → modèle`.
///
/// Toute implémentation satisfaisant ce contrat est interchangeable ; le
/// harnais de balayage n'en connaît pas davantage. Les deux implémentations
/// fournies sont des baselines volontairement minimales.
pub trait Classifier {
    /// Ajuste un modèle sur `x` (une ligne par échantillon) et `y` (labels
    /// encodés).
    ///
    /// # Errors
    /// Toute erreur du classifieur est propagée telle quelle par le harnais.
    fn fit(&self, x: &Array2<f32>, y: &[usize]) -> Result<Box<dyn Model>>;

    /// Nom lisible pour le rapport.
    fn name(&self) -> &'static str;
}

/// Sélectionne l'implémentation de référence pour un choix de configuration.
#[must_use]
pub fn for_choice(choice: ClassifierChoice, knn_k: usize) -> Box<dyn Classifier> {
    match choice {
        ClassifierChoice::NearestCentroid => Box::new(NearestCentroid),
        ClassifierChoice::Knn => Box::new(Knn { k: knn_k }),
    }
}

#[inline]
fn squared_distance(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&u, &v)| (u - v) * (u - v))
        .sum()
}

/// Centroïde le plus proche : un prototype moyen par classe.
pub struct NearestCentroid;

struct CentroidModel {
    centroids: Array2<f32>,
    populated: Vec<bool>,
}

impl Classifier for NearestCentroid {
    fn fit(&self, x: &Array2<f32>, y: &[usize]) -> Result<Box<dyn Model>> {
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(FlowError::EmptyDataset.into());
        }
        let n_classes = y.iter().max().map_or(0, |&m| m + 1);
        let mut centroids = Array2::<f32>::zeros((n_classes, x.ncols()));
        let mut counts = vec![0usize; n_classes];
        for (row, &label) in x.rows().into_iter().zip(y) {
            let mut centroid = centroids.row_mut(label);
            centroid += &row;
            counts[label] += 1;
        }
        let mut populated = vec![false; n_classes];
        for (i, &count) in counts.iter().enumerate() {
            if count > 0 {
                populated[i] = true;
                centroids.row_mut(i).mapv_inplace(|v| v / count as f32);
            }
        }
        Ok(Box::new(CentroidModel {
            centroids,
            populated,
        }))
    }

    fn name(&self) -> &'static str {
        "nearest-centroid"
    }
}

impl Model for CentroidModel {
    fn predict(&self, x: &Array2<f32>) -> Vec<usize> {
        x.rows()
            .into_iter()
            .map(|row| {
                let mut best = 0usize;
                let mut best_dist = f32::INFINITY;
                for (label, centroid) in self.centroids.rows().into_iter().enumerate() {
                    if !self.populated[label] {
                        continue;
                    }
                    let dist = squared_distance(row, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best = label;
                    }
                }
                best
            })
            .collect()
    }
}

/// k plus proches voisins, vote majoritaire.
///
/// Égalités résolues de façon déterministe : plus petit label encodé.
pub struct Knn {
    /// Nombre de voisins consultés.
    pub k: usize,
}

struct KnnModel {
    x_train: Array2<f32>,
    y_train: Vec<usize>,
    k: usize,
}

impl Classifier for Knn {
    fn fit(&self, x: &Array2<f32>, y: &[usize]) -> Result<Box<dyn Model>> {
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(FlowError::EmptyDataset.into());
        }
        Ok(Box::new(KnnModel {
            x_train: x.clone(),
            y_train: y.to_vec(),
            k: self.k.max(1),
        }))
    }

    fn name(&self) -> &'static str {
        "knn"
    }
}

impl Model for KnnModel {
    fn predict(&self, x: &Array2<f32>) -> Vec<usize> {
        let n_classes = self.y_train.iter().max().map_or(0, |&m| m + 1);
        x.rows()
            .into_iter()
            .map(|row| {
                let mut neighbors: Vec<(f32, usize)> = self
                    .x_train
                    .rows()
                    .into_iter()
                    .zip(&self.y_train)
                    .map(|(train_row, &label)| (squared_distance(row, train_row), label))
                    .collect();
                neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut votes = vec![0usize; n_classes];
                for &(_, label) in neighbors.iter().take(self.k) {
                    votes[label] += 1;
                }
                let mut best = 0usize;
                let mut best_votes = 0usize;
                for (label, &count) in votes.iter().enumerate() {
                    if count > best_votes {
                        best_votes = count;
                        best = label;
                    }
                }
                best
            })
            .collect()
    }
}
