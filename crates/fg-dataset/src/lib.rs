/// Labeled feature tables for flowgest, and their flat-file persistence.
///
/// Une table = une granularité `(rows, cols)` : une ligne de features par
/// échantillon, label en dernière colonne. Le cache disque est idempotent au
/// niveau du chemin — un fichier présent court-circuite le recalcul.

pub mod store;
pub mod table;

pub use store::{load_or_build, load_table, save_table, table_path};
pub use table::{FeatureTable, encode_labels};
