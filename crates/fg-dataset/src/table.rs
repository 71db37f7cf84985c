use fg_core::sample::GestureData;
use fg_features::reduce::{GridSpec, feature_vector};

/// Table de features labellisée : une ligne par échantillon.
///
/// Construite geste par geste (ordre lexicographique des labels, ordre de
/// chargement des échantillons), chaque ligne porte le vecteur réduit et le
/// label du geste d'origine.
///
/// # Example
/// ```
/// use fg_core::sample::{FlowSample, GestureData, SAMPLE_LEN};
/// use fg_dataset::table::FeatureTable;
/// use fg_features::reduce::GridSpec;
/// let mut data = GestureData::new();
/// data.insert("wave".into(), vec![FlowSample::from_values(vec![1.0; SAMPLE_LEN]).unwrap()]);
/// let table = FeatureTable::from_gesture_data(&data, GridSpec { rows: 2, cols: 2 });
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.features[0].len(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct FeatureTable {
    /// Granularité qui identifie cette table.
    pub grid: GridSpec,
    /// Vecteurs de features, longueur [`GridSpec::feature_len`] chacun.
    pub features: Vec<Vec<f32>>,
    /// Label de geste de chaque ligne.
    pub labels: Vec<String>,
}

impl FeatureTable {
    /// Réduit tous les échantillons de `data` à la granularité `grid`.
    #[must_use]
    pub fn from_gesture_data(data: &GestureData, grid: GridSpec) -> Self {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for (gesture, samples) in data {
            for sample in samples {
                features.push(feature_vector(sample, grid));
                labels.push(gesture.clone());
            }
            log::debug!("{gesture} : {} ligne(s) réduites en {grid}", samples.len());
        }
        Self {
            grid,
            features,
            labels,
        }
    }

    /// Nombre de lignes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` si la table ne contient aucune ligne.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Encode les labels en entiers, ordre de première apparition.
    ///
    /// Retourne les labels encodés ligne par ligne et la liste des classes
    /// (l'entier d'une classe est son index dans cette liste).
    ///
    /// # Example
    /// ```
    /// use fg_dataset::table::encode_labels;
    /// let labels = ["b".to_string(), "a".to_string(), "b".to_string()];
    /// let (encoded, classes) = encode_labels(&labels);
    /// assert_eq!(encoded, vec![0, 1, 0]);
    /// assert_eq!(classes, vec!["b".to_string(), "a".to_string()]);
    /// ```
    #[must_use]
    pub fn encoded_labels(&self) -> (Vec<usize>, Vec<String>) {
        encode_labels(&self.labels)
    }
}

/// Encode une liste de labels en entiers, ordre de première apparition.
#[must_use]
pub fn encode_labels(labels: &[String]) -> (Vec<usize>, Vec<String>) {
    let mut classes: Vec<String> = Vec::new();
    let mut encoded = Vec::with_capacity(labels.len());
    for label in labels {
        let idx = match classes.iter().position(|c| c == label) {
            Some(i) => i,
            None => {
                classes.push(label.clone());
                classes.len() - 1
            }
        };
        encoded.push(idx);
    }
    (encoded, classes)
}
