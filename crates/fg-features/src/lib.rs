/// Feature reduction for flowgest: integral images and block sums.
///
/// Le réducteur transforme un tenseur dense (10, 40, 40, 2) en un petit
/// descripteur de longueur fixe : image intégrale par frame, puis somme des
/// blocs d'une partition `rows × cols` de la grille.

pub mod integral;
pub mod partition;
pub mod reduce;

pub use integral::IntegralImage;
pub use partition::{Region, partition_grid};
pub use reduce::{GridSpec, feature_vector, reduce_sample};
