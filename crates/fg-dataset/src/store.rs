use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fg_core::error::FlowError;
use fg_core::sample::GestureData;
use fg_features::reduce::GridSpec;

use crate::table::FeatureTable;

/// Chemin canonique de la table persistée pour une granularité.
///
/// # Example
/// ```
/// use fg_dataset::store::table_path;
/// use fg_features::reduce::GridSpec;
/// use std::path::Path;
/// let path = table_path(Path::new("data/features"), GridSpec { rows: 4, cols: 10 });
/// assert!(path.ends_with("features_4x10.csv"));
/// ```
#[must_use]
pub fn table_path(dir: &Path, grid: GridSpec) -> PathBuf {
    dir.join(format!("features_{grid}.csv"))
}

/// Persiste une table en CSV plat : en-tête `f0..fN,label`, une ligne par
/// échantillon, features puis label en dernière colonne.
///
/// Idempotent au niveau du chemin : un fichier déjà présent court-circuite
/// l'écriture (retourne `false`).
///
/// # Errors
/// Erreur d'E/S si le dossier ne peut être créé ou le fichier écrit.
pub fn save_table(dir: &Path, table: &FeatureTable) -> Result<bool> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Impossible de créer {}", dir.display()))?;
    let path = table_path(dir, table.grid);
    if path.exists() {
        log::info!("Fichier trouvé : {}", path.display());
        return Ok(false);
    }

    let file = fs::File::create(&path)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let width = table.grid.feature_len();
    for i in 0..width {
        write!(out, "f{i},")?;
    }
    writeln!(out, "label")?;

    for (row, label) in table.features.iter().zip(&table.labels) {
        for value in row {
            write!(out, "{value},")?;
        }
        writeln!(out, "{label}")?;
    }
    out.flush()?;

    log::info!("Table sauvegardée : {}", path.display());
    Ok(true)
}

/// Charge une table persistée par son identité `(rows, cols)`.
///
/// # Errors
/// - [`FlowError::DatasetNotFound`] si aucun fichier n'existe pour cette
///   identité — échec dur, jamais de résultat vide silencieux.
/// - [`FlowError::MalformedValue`] sur une valeur illisible.
/// - [`FlowError::ShapeMismatch`] si une ligne n'a pas la largeur attendue.
pub fn load_table(dir: &Path, grid: GridSpec) -> Result<FeatureTable, FlowError> {
    let path = table_path(dir, grid);
    if !path.exists() {
        return Err(FlowError::DatasetNotFound {
            rows: grid.rows,
            cols: grid.cols,
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|_| FlowError::FileNotFound {
        path: path.display().to_string(),
    })?;

    let width = grid.feature_len();
    let mut features = Vec::new();
    let mut labels = Vec::new();
    for line in content.lines().skip(1) {
        if line.is_empty() {
            continue;
        }
        let mut fields: Vec<&str> = line.split(',').collect();
        let label = fields.pop().unwrap_or("");
        if fields.len() != width {
            return Err(FlowError::ShapeMismatch {
                expected: width,
                actual: fields.len(),
            });
        }
        let mut row = Vec::with_capacity(width);
        for field in fields {
            let value = field
                .parse::<f32>()
                .map_err(|_| FlowError::MalformedValue {
                    path: path.display().to_string(),
                    token: field.to_string(),
                })?;
            row.push(value);
        }
        features.push(row);
        labels.push(label.to_string());
    }

    log::info!("Table chargée : {} ({} lignes)", path.display(), features.len());
    Ok(FeatureTable {
        grid,
        features,
        labels,
    })
}

/// Charge la table si elle est persistée, sinon la construit depuis `data`
/// et la persiste. Un fichier présent court-circuite tout recalcul.
///
/// # Errors
/// Propagation des erreurs de lecture, de parsing et d'écriture.
pub fn load_or_build(dir: &Path, data: &GestureData, grid: GridSpec) -> Result<FeatureTable> {
    if table_path(dir, grid).exists() {
        return Ok(load_table(dir, grid)?);
    }
    let table = FeatureTable::from_gesture_data(data, grid);
    save_table(dir, &table)?;
    Ok(table)
}
