use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sample::GRID_SIZE;

/// Granularités par défaut du balayage (lignes et colonnes).
pub const DEFAULT_DIVS: &[usize] = &[4, 10, 20];

/// Classifieur utilisé par le harnais d'évaluation.
///
/// Le harnais est générique sur le contrat fit/predict/score ; ce choix ne
/// sélectionne qu'une implémentation de référence.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ClassifierChoice {
    /// Centroïde le plus proche par classe.
    #[default]
    NearestCentroid,
    /// k plus proches voisins (vote majoritaire).
    Knn,
}

/// Configuration complète d'un run d'extraction + balayage.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use fg_core::config::SweepConfig;
/// let config = SweepConfig::default();
/// assert_eq!(config.divs, vec![4, 10, 20]);
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SweepConfig {
    // === Données ===
    /// Dossier des échantillons bruts (.txt / .csv).
    pub data_dir: PathBuf,
    /// Dossier des tables de features persistées.
    pub out_dir: PathBuf,
    /// Supprimer le fichier source d'un échantillon malformé.
    pub remove_malformed: bool,

    // === Balayage ===
    /// Granularités candidates ; le produit cartésien divs × divs est évalué.
    pub divs: Vec<usize>,
    /// Classifieur de référence.
    pub classifier: ClassifierChoice,
    /// Nombre de voisins pour `Knn`.
    pub knn_k: usize,
    /// Fraction du jeu réservée au test [0.05, 0.95].
    pub test_fraction: f32,
    /// Graine du split déterministe.
    pub seed: u64,

    // === Rapport ===
    /// Décimales affichées dans les matrices du rapport.
    pub precision: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw"),
            out_dir: PathBuf::from("data/features"),
            remove_malformed: false,
            divs: DEFAULT_DIVS.to_vec(),
            classifier: ClassifierChoice::NearestCentroid,
            knn_k: 3,
            test_fraction: 0.25,
            seed: 42,
            precision: 2,
        }
    }
}

impl SweepConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.test_fraction = self.test_fraction.clamp(0.05, 0.95);
        self.precision = self.precision.min(10);
        self.knn_k = self.knn_k.clamp(1, 25);
        self.divs.retain(|&d| (1..=GRID_SIZE).contains(&d));
        if self.divs.is_empty() {
            self.divs = DEFAULT_DIVS.to_vec();
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    data: Option<DataSection>,
    sweep: Option<SweepSection>,
    report: Option<ReportSection>,
}

/// Data section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct DataSection {
    dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    remove_malformed: Option<bool>,
}

/// Sweep section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct SweepSection {
    divs: Option<Vec<usize>>,
    classifier: Option<ClassifierChoice>,
    knn_k: Option<usize>,
    test_fraction: Option<f32>,
    seed: Option<u64>,
}

/// Report section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct ReportSection {
    precision: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use fg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SweepConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = SweepConfig::default();

    if let Some(d) = file.data {
        if let Some(v) = d.dir {
            config.data_dir = v;
        }
        if let Some(v) = d.out_dir {
            config.out_dir = v;
        }
        if let Some(v) = d.remove_malformed {
            config.remove_malformed = v;
        }
    }

    if let Some(s) = file.sweep {
        if let Some(v) = s.divs {
            config.divs = v;
        }
        if let Some(v) = s.classifier {
            config.classifier = v;
        }
        if let Some(v) = s.knn_k {
            config.knn_k = v;
        }
        if let Some(v) = s.test_fraction {
            config.test_fraction = v;
        }
        if let Some(v) = s.seed {
            config.seed = v;
        }
    }

    if let Some(r) = file.report {
        if let Some(v) = r.precision {
            config.precision = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SweepConfig::default();
        assert_eq!(config.divs, vec![4, 10, 20]);
        assert!((config.test_fraction - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.precision, 2);
        assert!(!config.remove_malformed);
    }

    #[test]
    fn clamp_discards_invalid_divs() {
        let mut config = SweepConfig {
            divs: vec![0, 4, 41, 20],
            ..SweepConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.divs, vec![4, 20]);
    }

    #[test]
    fn clamp_restores_empty_divs() {
        let mut config = SweepConfig {
            divs: vec![0, 100],
            ..SweepConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.divs, DEFAULT_DIVS.to_vec());
    }

    #[test]
    fn partial_toml_merges_over_defaults() {
        let toml_str = r#"
            [sweep]
            divs = [2, 8]
            test_fraction = 0.5
        "#;
        let file: ConfigFile = match toml::from_str(toml_str) {
            Ok(f) => f,
            Err(e) => panic!("TOML invalide : {e}"),
        };
        let mut config = SweepConfig::default();
        if let Some(s) = file.sweep {
            if let Some(v) = s.divs {
                config.divs = v;
            }
            if let Some(v) = s.test_fraction {
                config.test_fraction = v;
            }
        }
        config.clamp_all();
        assert_eq!(config.divs, vec![2, 8]);
        assert!((config.test_fraction - 0.5).abs() < f32::EPSILON);
        // Champs absents : valeurs par défaut conservées.
        assert_eq!(config.seed, 42);
    }
}
