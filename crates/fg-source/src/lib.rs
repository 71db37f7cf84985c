/// Sample loading for flowgest: raw optical-flow recordings on disk.
///
/// Deux responsabilités : parser un fichier brut en tenseur (10, 40, 40, 2)
/// — en rejetant atomiquement les échantillons incomplets — et regrouper les
/// fichiers d'un dossier par label de geste.

pub mod loader;
pub mod scan;

pub use loader::{DiscardPolicy, load_or_discard, load_sample};
pub use scan::{data_files, gesture_label, gesture_set, load_gesture_data};
