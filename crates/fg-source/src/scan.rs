use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use fg_core::error::FlowError;
use fg_core::sample::GestureData;

use crate::loader::{DiscardPolicy, load_or_discard};

/// Extensions d'enregistrement reconnues.
const DATA_EXTS: &[&str] = &["csv", "txt"];

/// Liste triée des fichiers d'échantillons d'un dossier.
///
/// Filtre optionnel par sous-chaîne du nom de fichier (typiquement un label
/// de geste). Un dossier absent est une erreur dure, jamais un résultat vide
/// silencieux.
///
/// # Errors
/// [`FlowError::FileNotFound`] si `dir` n'existe pas ou n'est pas un dossier.
pub fn data_files(dir: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FlowError::FileNotFound {
            path: dir.display().to_string(),
        }
        .into());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !DATA_EXTS.contains(&ext.to_lowercase().as_str()) {
            continue;
        }
        if let Some(needle) = filter {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !name.contains(needle) {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Label de geste encodé dans le nom de fichier : dernier segment délimité
/// par `'_'`, extension retirée.
///
/// # Example
/// ```
/// use fg_source::scan::gesture_label;
/// use std::path::Path;
/// let label = gesture_label(Path::new("rec_03_open-close.txt"));
/// assert_eq!(label.as_deref(), Some("open-close"));
/// ```
#[must_use]
pub fn gesture_label(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let last = stem.rsplit('_').next()?;
    let label = last.split('.').next().unwrap_or(last);
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Ensemble des gestes uniques présents dans `files`.
///
/// Si `gesture` est fourni, l'ensemble est réduit à ce seul label.
#[must_use]
pub fn gesture_set(files: &[PathBuf], gesture: Option<&str>) -> BTreeSet<String> {
    if let Some(g) = gesture {
        return BTreeSet::from([g.to_string()]);
    }
    files.iter().filter_map(|p| gesture_label(p)).collect()
}

/// Charge tous les échantillons d'un dossier, groupés par geste.
///
/// Les échantillons malformés sont écartés selon `policy` et le chargement
/// continue ; le compte d'écartés est loggé.
///
/// # Errors
/// Propagation des erreurs de scan et de lecture ([`FlowError::FileNotFound`]).
pub fn load_gesture_data(
    dir: &Path,
    gesture: Option<&str>,
    policy: DiscardPolicy,
) -> Result<GestureData> {
    let files = data_files(dir, gesture)?;
    let gestures = gesture_set(&files, gesture);

    let mut data = GestureData::new();
    let mut discarded = 0usize;
    for g in &gestures {
        let mut samples = Vec::new();
        for path in files
            .iter()
            .filter(|p| gesture_label(p).as_deref() == Some(g.as_str()))
        {
            match load_or_discard(path, policy)? {
                Some(sample) => samples.push(sample),
                None => discarded += 1,
            }
        }
        data.insert(g.clone(), samples);
    }

    if discarded > 0 {
        log::warn!("{discarded} échantillon(s) incomplet(s) écarté(s)");
    }
    log::info!(
        "{} geste(s), {} échantillon(s) chargé(s) depuis {}",
        data.len(),
        data.values().map(Vec::len).sum::<usize>(),
        dir.display()
    );
    Ok(data)
}
