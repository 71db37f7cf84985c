use std::collections::BTreeMap;

use ndarray::{Array4, ArrayView3, Axis};

use crate::error::FlowError;

/// Nombre de frames temporelles par échantillon.
pub const FRAME_COUNT: usize = 10;
/// Côté de la grille spatiale (40×40).
pub const GRID_SIZE: usize = 40;
/// Composantes du vecteur de flux optique (latérale, verticale).
pub const FLOW_COMPONENTS: usize = 2;
/// Nombre total de scalaires d'un échantillon valide.
pub const SAMPLE_LEN: usize = FRAME_COUNT * GRID_SIZE * GRID_SIZE * FLOW_COMPONENTS;
/// Frame représentative : le milieu temporel de l'enregistrement.
pub const MID_FRAME: usize = 4;

/// Un enregistrement de flux optique : tenseur (10, 40, 40, 2).
///
/// Invariant : exactement [`SAMPLE_LEN`] scalaires. Un buffer d'une autre
/// taille est rejeté à la construction — jamais tronqué ni complété.
///
/// # Example
/// ```
/// use fg_core::sample::{FlowSample, SAMPLE_LEN};
/// let sample = FlowSample::from_values(vec![0.0; SAMPLE_LEN]).unwrap();
/// assert_eq!(sample.frame(0).shape(), &[40, 40, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct FlowSample {
    data: Array4<f32>,
}

impl FlowSample {
    /// Construit un échantillon depuis un buffer plat, ordre row-major
    /// (frame, ligne, colonne, composante).
    ///
    /// # Errors
    /// [`FlowError::ShapeMismatch`] si le buffer ne contient pas exactement
    /// [`SAMPLE_LEN`] valeurs.
    pub fn from_values(values: Vec<f32>) -> Result<Self, FlowError> {
        let actual = values.len();
        let data = Array4::from_shape_vec(
            (FRAME_COUNT, GRID_SIZE, GRID_SIZE, FLOW_COMPONENTS),
            values,
        )
        .map_err(|_| FlowError::ShapeMismatch {
            expected: SAMPLE_LEN,
            actual,
        })?;
        Ok(Self { data })
    }

    /// Construit un échantillon depuis un tenseur déjà formé.
    ///
    /// # Errors
    /// [`FlowError::ShapeMismatch`] si la forme n'est pas (10, 40, 40, 2).
    pub fn from_array(data: Array4<f32>) -> Result<Self, FlowError> {
        if data.shape() != [FRAME_COUNT, GRID_SIZE, GRID_SIZE, FLOW_COMPONENTS] {
            return Err(FlowError::ShapeMismatch {
                expected: SAMPLE_LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Vue sur la frame `idx`, forme (40, 40, 2).
    ///
    /// # Panics
    /// Panics si `idx >= FRAME_COUNT`.
    #[inline]
    #[must_use]
    pub fn frame(&self, idx: usize) -> ArrayView3<'_, f32> {
        self.data.index_axis(Axis(0), idx)
    }

    /// La frame représentative (index [`MID_FRAME`]).
    ///
    /// # Example
    /// ```
    /// use fg_core::sample::{FlowSample, SAMPLE_LEN};
    /// let sample = FlowSample::from_values(vec![1.0; SAMPLE_LEN]).unwrap();
    /// assert_eq!(sample.mid_frame()[[0, 0, 0]], 1.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn mid_frame(&self) -> ArrayView3<'_, f32> {
        self.frame(MID_FRAME)
    }

    /// Le tenseur complet.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    /// Aplatissement row-major vers un vecteur de [`SAMPLE_LEN`] valeurs.
    ///
    /// Utilisé par le split "brut" qui entraîne directement sur les
    /// échantillons non réduits.
    #[must_use]
    pub fn flattened(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}

/// Échantillons groupés par label de geste. Construit une fois, itération
/// déterministe (ordre lexicographique des labels).
pub type GestureData = BTreeMap<String, Vec<FlowSample>>;
