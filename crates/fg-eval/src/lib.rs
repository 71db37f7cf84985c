/// Evaluation harness for flowgest.
///
/// Le contrat classifieur (`fit` / `predict` / `score`), le split
/// train/test déterministe, la matrice de confusion, le balayage des
/// granularités et le rendu du rapport. Le harnais est générique sur le
/// contrat — les internals d'un classifieur ne le concernent pas.

pub mod classifier;
pub mod metrics;
pub mod report;
pub mod split;
pub mod sweep;

pub use classifier::{Classifier, Knn, Model, NearestCentroid, for_choice};
pub use metrics::ConfusionMatrix;
pub use split::{Split, train_test_split_raw, train_test_split_table};
pub use sweep::{FittedModel, SweepOutcome, grid_pairs, optimize_feature_dimensions};
