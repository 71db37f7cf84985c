use std::fs;
use std::path::Path;

use fg_core::error::FlowError;
use fg_core::sample::{FlowSample, SAMPLE_LEN};

/// Politique appliquée aux échantillons malformés par l'appelant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscardPolicy {
    /// Ignorer l'échantillon, conserver le fichier source.
    #[default]
    Keep,
    /// Ignorer l'échantillon et supprimer le fichier source.
    RemoveFile,
}

/// Parse un fichier brut en échantillon de flux optique.
///
/// Le flux de tokens est obtenu en substituant le caractère `'t'` par une
/// virgule puis en découpant sur les virgules ; les tokens vides (fins de
/// ligne) sont ignorés. Exactement [`SAMPLE_LEN`] valeurs numériques sont
/// attendues — tout autre compte est un échantillon incomplet, rejeté
/// atomiquement sans reshape partiel.
///
/// # Errors
/// - [`FlowError::FileNotFound`] si le fichier ne peut être lu.
/// - [`FlowError::MalformedValue`] sur un token non numérique.
/// - [`FlowError::IncompleteSample`] si le compte de tokens diffère de
///   [`SAMPLE_LEN`].
pub fn load_sample(path: &Path) -> Result<FlowSample, FlowError> {
    let raw = fs::read_to_string(path).map_err(|_| FlowError::FileNotFound {
        path: path.display().to_string(),
    })?;

    let substituted = raw.replace('t', ",");
    let mut values = Vec::with_capacity(SAMPLE_LEN);
    for token in substituted.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<f32>() {
            Ok(v) => values.push(v),
            Err(_) => {
                return Err(FlowError::MalformedValue {
                    path: path.display().to_string(),
                    token: token.to_string(),
                });
            }
        }
    }

    if values.len() != SAMPLE_LEN {
        return Err(FlowError::IncompleteSample {
            path: path.display().to_string(),
            tokens: values.len(),
            expected: SAMPLE_LEN,
        });
    }

    FlowSample::from_values(values)
}

/// Charge un échantillon en appliquant la politique de rejet.
///
/// Un échantillon malformé est écarté (`Ok(None)`) et le traitement du lot
/// continue ; `RemoveFile` supprime en plus le fichier source. Une erreur de
/// lecture du fichier reste une erreur dure.
///
/// # Errors
/// [`FlowError::FileNotFound`] si le fichier ne peut être lu.
pub fn load_or_discard(
    path: &Path,
    policy: DiscardPolicy,
) -> Result<Option<FlowSample>, FlowError> {
    match load_sample(path) {
        Ok(sample) => Ok(Some(sample)),
        Err(err @ FlowError::FileNotFound { .. }) => Err(err),
        Err(err) => {
            log::warn!("Échantillon écarté : {err}");
            if policy == DiscardPolicy::RemoveFile {
                match fs::remove_file(path) {
                    Ok(()) => log::info!("{} supprimé.", path.display()),
                    Err(io) => log::warn!("Suppression impossible de {} : {io}", path.display()),
                }
            }
            Ok(None)
        }
    }
}
