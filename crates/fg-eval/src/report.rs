use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::metrics::ConfusionMatrix;
use crate::sweep::SweepOutcome;

/// Rend la matrice d'accuracy en tableau texte aligné.
///
/// `precision` contrôle explicitement les décimales affichées — aucune
/// configuration globale de formatage.
///
/// # Example
/// ```
/// use fg_eval::report::render_accuracy;
/// use fg_eval::sweep::SweepOutcome;
/// use ndarray::array;
/// let outcome = SweepOutcome {
///     divs: vec![2, 4],
///     accuracy: array![[0.5, 0.75], [1.0, 0.25]],
///     fitted: vec![],
/// };
/// let text = render_accuracy(&outcome, "knn", 2);
/// assert!(text.contains("0.75"));
/// ```
#[must_use]
pub fn render_accuracy(outcome: &SweepOutcome, method: &str, precision: usize) -> String {
    let width = precision.max(2) + 6;
    let mut out = String::new();
    out.push_str(&format!(
        "Accuracy vs dimension des features — méthode : {method}\n"
    ));
    out.push_str(&format!("{:>width$}", "rows\\cols"));
    for &cols in &outcome.divs {
        out.push_str(&format!("{cols:>width$}"));
    }
    out.push('\n');
    for (i, &rows) in outcome.divs.iter().enumerate() {
        out.push_str(&format!("{rows:>width$}"));
        for j in 0..outcome.divs.len() {
            let value = outcome.accuracy[[i, j]];
            out.push_str(&format!("{value:>width$.precision$}"));
        }
        out.push('\n');
    }
    out
}

/// Rend une matrice de confusion, brute ou normalisée par ligne.
#[must_use]
pub fn render_confusion(cm: &ConfusionMatrix, precision: usize, normalize: bool) -> String {
    let classes = cm.classes();
    let width = classes
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(precision + 6);
    let mut out = String::new();
    out.push_str(&format!("{:>width$}", ""));
    for class in classes {
        out.push_str(&format!(" {class:>width$}"));
    }
    out.push('\n');
    if normalize {
        let norm = cm.normalized();
        for (t, class) in classes.iter().enumerate() {
            out.push_str(&format!("{class:>width$}"));
            for p in 0..classes.len() {
                let value = norm[[t, p]];
                out.push_str(&format!(" {value:>width$.precision$}"));
            }
            out.push('\n');
        }
    } else {
        for (t, class) in classes.iter().enumerate() {
            out.push_str(&format!("{class:>width$}"));
            for p in 0..classes.len() {
                let value = cm.counts()[[t, p]];
                out.push_str(&format!(" {value:>width$}"));
            }
            out.push('\n');
        }
    }
    out
}

#[derive(Serialize)]
struct CellDoc {
    grid: String,
    rows: usize,
    cols: usize,
    accuracy: f32,
}

#[derive(Serialize)]
struct ReportDoc<'a> {
    method: &'a str,
    divs: &'a [usize],
    accuracy: Vec<Vec<f32>>,
    cells: Vec<CellDoc>,
}

/// Écrit le rapport de balayage en JSON.
///
/// Tout échec (sérialisation, écriture) est une erreur explicite — rien
/// n'est avalé silencieusement.
///
/// # Errors
/// Erreur si le fichier ne peut être écrit.
pub fn write_json(path: &Path, outcome: &SweepOutcome, method: &str) -> Result<()> {
    let accuracy: Vec<Vec<f32>> = outcome
        .accuracy
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();
    let cells = outcome
        .fitted
        .iter()
        .map(|m| CellDoc {
            grid: m.grid.to_string(),
            rows: m.grid.rows,
            cols: m.grid.cols,
            accuracy: m.accuracy,
        })
        .collect();
    let doc = ReportDoc {
        method,
        divs: &outcome.divs,
        accuracy,
        cells,
    };

    let json = serde_json::to_string_pretty(&doc).context("Sérialisation du rapport")?;
    fs::write(path, json).with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Rapport écrit : {}", path.display());
    Ok(())
}

/// Variante développement : formatte la meilleure case en une ligne.
#[must_use]
pub fn best_line(outcome: &SweepOutcome, precision: usize) -> String {
    match outcome.best() {
        Some(best) => {
            let mut line = String::new();
            let _ = write!(
                line,
                "Meilleure granularité : {} (accuracy {:.precision$})",
                best.grid, best.accuracy
            );
            line
        }
        None => "Aucun modèle ajusté".to_string(),
    }
}
