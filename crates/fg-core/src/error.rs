use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file or directory does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Raw sample file with the wrong number of scalar tokens.
    ///
    /// The sample is discarded as a whole; no partial reshape is attempted.
    #[error("Échantillon incomplet : {path} ({tokens} valeurs, {expected} attendues)")]
    IncompleteSample {
        /// Source file of the rejected sample.
        path: String,
        /// Number of tokens actually found.
        tokens: usize,
        /// Number of tokens a valid sample carries.
        expected: usize,
    },

    /// Token that could not be parsed as a flow scalar.
    #[error("Valeur illisible dans {path} : « {token} »")]
    MalformedValue {
        /// Source file of the rejected sample.
        path: String,
        /// The offending token.
        token: String,
    },

    /// A persisted feature table was requested but is absent for this identity.
    #[error("Table de features {rows}x{cols} absente : {path}")]
    DatasetNotFound {
        /// Row granularity of the requested table.
        rows: usize,
        /// Column granularity of the requested table.
        cols: usize,
        /// Path that was probed.
        path: String,
    },

    /// Value buffer whose length does not match the sample tensor shape.
    #[error("Forme invalide : {actual} valeurs pour {expected} attendues")]
    ShapeMismatch {
        /// Expected scalar count.
        expected: usize,
        /// Actual scalar count.
        actual: usize,
    },

    /// Operation on a dataset with no samples.
    #[error("Jeu de données vide")]
    EmptyDataset,
}
