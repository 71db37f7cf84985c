use std::path::PathBuf;

use clap::Parser;
use fg_core::config::ClassifierChoice;
use fg_core::error::FlowError;

/// flowgest — Optical-flow gesture feature benchmark.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dossier des échantillons bruts (.txt / .csv).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Dossier des tables de features persistées.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Granularités candidates, séparées par des virgules (ex : "4,10,20").
    #[arg(long)]
    pub divs: Option<String>,

    /// Restreindre le chargement à un geste (sous-chaîne du nom de fichier).
    #[arg(long)]
    pub gesture: Option<String>,

    /// Classifieur : "centroid" ou "knn".
    #[arg(long)]
    pub classifier: Option<String>,

    /// Graine du split train/test.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction du jeu réservée au test [0.05, 0.95].
    #[arg(long)]
    pub test_fraction: Option<f32>,

    /// Décimales affichées dans le rapport.
    #[arg(long)]
    pub precision: Option<usize>,

    /// Supprimer le fichier source des échantillons malformés.
    #[arg(long, default_value_t = false)]
    pub remove_malformed: bool,

    /// Afficher la matrice de confusion de la meilleure case.
    #[arg(long, default_value_t = false)]
    pub confusion: bool,

    /// Écrire le rapport de balayage en JSON à ce chemin.
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Parse la liste `--divs` en granularités.
    ///
    /// # Errors
    /// Returns an error if a value is not a positive integer.
    pub fn parse_divs(&self) -> anyhow::Result<Option<Vec<usize>>> {
        let Some(ref raw) = self.divs else {
            return Ok(None);
        };
        let mut divs = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.parse::<usize>() {
                Ok(d) if d >= 1 => divs.push(d),
                _ => {
                    return Err(FlowError::Config(format!(
                        "granularité invalide dans --divs : « {part} »"
                    ))
                    .into());
                }
            }
        }
        if divs.is_empty() {
            return Err(FlowError::Config("--divs ne contient aucune granularité".into()).into());
        }
        Ok(Some(divs))
    }

    /// Parse le choix `--classifier`.
    ///
    /// # Errors
    /// Returns an error on an unknown classifier name.
    pub fn parse_classifier(&self) -> anyhow::Result<Option<ClassifierChoice>> {
        let Some(ref name) = self.classifier else {
            return Ok(None);
        };
        match name.as_str() {
            "centroid" | "nearest-centroid" => Ok(Some(ClassifierChoice::NearestCentroid)),
            "knn" => Ok(Some(ClassifierChoice::Knn)),
            _ => Err(FlowError::Config(format!(
                "classifieur inconnu : {name} (attendu \"centroid\" ou \"knn\")"
            ))
            .into()),
        }
    }
}
