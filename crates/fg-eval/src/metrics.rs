use ndarray::Array2;

/// Matrice de confusion : comptes vérité × prédiction.
///
/// Indexée par labels encodés ; `counts[[t, p]]` compte les échantillons de
/// classe vraie `t` prédits `p`.
///
/// # Example
/// ```
/// use fg_eval::metrics::ConfusionMatrix;
/// let cm = ConfusionMatrix::from_predictions(&[0, 0, 1], &[0, 1, 1], vec!["a".into(), "b".into()]);
/// assert_eq!(cm.counts()[[0, 0]], 1);
/// assert_eq!(cm.counts()[[0, 1]], 1);
/// assert!((cm.accuracy() - 2.0 / 3.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
    classes: Vec<String>,
}

impl ConfusionMatrix {
    /// Construit la matrice depuis des paires (vérité, prédiction).
    ///
    /// Les labels hors de `classes` sont ignorés (ils ne peuvent provenir
    /// que d'un modèle incohérent avec l'encodage).
    #[must_use]
    pub fn from_predictions(truth: &[usize], predicted: &[usize], classes: Vec<String>) -> Self {
        let k = classes.len();
        let mut counts = Array2::zeros((k, k));
        for (&t, &p) in truth.iter().zip(predicted) {
            if t < k && p < k {
                counts[[t, p]] += 1;
            }
        }
        Self { counts, classes }
    }

    /// Comptes bruts.
    #[inline]
    #[must_use]
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Classes dans l'ordre d'encodage.
    #[inline]
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Fraction d'échantillons sur la diagonale. 0 pour une matrice vide.
    #[must_use]
    pub fn accuracy(&self) -> f32 {
        let total: usize = self.counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let diagonal: usize = (0..self.classes.len()).map(|i| self.counts[[i, i]]).sum();
        diagonal as f32 / total as f32
    }

    /// Matrice normalisée par ligne (chaque ligne de vérité somme à 1 ;
    /// lignes vides laissées à zéro).
    #[must_use]
    pub fn normalized(&self) -> Array2<f32> {
        let k = self.classes.len();
        let mut out = Array2::zeros((k, k));
        for t in 0..k {
            let row_total: usize = (0..k).map(|p| self.counts[[t, p]]).sum();
            if row_total == 0 {
                continue;
            }
            for p in 0..k {
                out[[t, p]] = self.counts[[t, p]] as f32 / row_total as f32;
            }
        }
        out
    }

    /// Ligne de synthèse lisible, pour les logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let total: usize = self.counts.iter().sum();
        format!(
            "accuracy={:.4}  (n={}  classes={})",
            self.accuracy(),
            total,
            self.classes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn perfect_predictions_give_accuracy_one() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 2], &[0, 1, 2], classes(&["a", "b", "c"]));
        assert!((cm.accuracy() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_matrix_has_zero_accuracy() {
        let cm = ConfusionMatrix::from_predictions(&[], &[], classes(&["a", "b"]));
        assert_eq!(cm.accuracy(), 0.0);
    }

    #[test]
    fn normalization_is_per_truth_row() {
        let truth = [0, 0, 0, 0, 1, 1];
        let predicted = [0, 0, 0, 1, 1, 1];
        let cm = ConfusionMatrix::from_predictions(&truth, &predicted, classes(&["a", "b"]));
        let norm = cm.normalized();
        assert!((norm[[0, 0]] - 0.75).abs() < 1e-6);
        assert!((norm[[0, 1]] - 0.25).abs() < 1e-6);
        assert!((norm[[1, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn summary_reports_counts() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1], &[0, 0], classes(&["a", "b"]));
        let line = cm.summary();
        assert!(line.contains("n=2"));
        assert!(line.contains("classes=2"));
    }
}
