use crate::volume::{Sample, Volume};

use ndarray::{Array3, Zip, s};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("front and back volume shapes differ: front is {front:?}, back is {back:?}")]
    ShapeMismatch {
        front: (usize, usize, usize),
        back: (usize, usize, usize),
    },

    #[error(
        "transition width {0} collapses to an empty blend band; pass 0 for a hard cut or at least 2 slices"
    )]
    DegenerateTransition(usize),

    #[error("transition band [{low}, {high}) falls outside the volume depth {depth}")]
    TransitionOutOfBounds {
        low: isize,
        high: isize,
        depth: usize,
    },
}

/// Stitches two same-shaped volumes along the Z axis.
///
/// The front volume supplies the slices below the fusion point, the back
/// volume the slices above it, and a band of `2 * (transition_width / 2)`
/// slices centered on the fusion point is cross-faded linearly between the
/// two, so that small intensity or illumination differences between the
/// acquisitions do not show up as a visible seam.
pub struct SlabMerger;

impl SlabMerger {
    /// Merge `front` and `back` into a new volume.
    ///
    /// The fusion slice sits at `depth / 2 + middle_shift`. The output
    /// inherits the front volume's header (spacing, units, datatype, bitpix
    /// and affine) verbatim; neither input is modified.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::ShapeMismatch`] if the input shapes differ,
    /// [`MergeError::DegenerateTransition`] if `transition_width` is nonzero
    /// but too narrow to form a blend band, and
    /// [`MergeError::TransitionOutOfBounds`] if the band does not fit inside
    /// the volume.
    pub fn merge<T: Sample>(
        front: &Volume<T>,
        back: &Volume<T>,
        middle_shift: isize,
        transition_width: usize,
    ) -> Result<Volume<T>, MergeError> {
        if front.dim() != back.dim() {
            return Err(MergeError::ShapeMismatch {
                front: front.dim(),
                back: back.dim(),
            });
        }
        let (_, _, depth) = front.dim();

        let mid = depth as isize / 2 + middle_shift;
        let half = transition_width / 2;
        if transition_width > 0 && half == 0 {
            // A 1-slice transition floor-halves to an empty band, which
            // would make the blend-weight denominator non-positive.
            return Err(MergeError::DegenerateTransition(transition_width));
        }

        let low = mid - half as isize;
        let high = mid + half as isize;
        if low < 0 || high > depth as isize {
            return Err(MergeError::TransitionOutOfBounds { low, high, depth });
        }
        let (low, high) = (low as usize, high as usize);

        let mut merged = Array3::<T>::zeros(front.dim());
        merged
            .slice_mut(s![.., .., ..low])
            .assign(&front.data().slice(s![.., .., ..low]));
        merged
            .slice_mut(s![.., .., high..])
            .assign(&back.data().slice(s![.., .., high..]));

        for i in 0..2 * half {
            let (w_front, w_back) = blend_weights(half, i);
            let z = low + i;
            let blended = Zip::from(&front.data().slice(s![.., .., z]))
                .and(&back.data().slice(s![.., .., z]))
                .par_map_collect(|&f, &b| T::from_blend(f.as_() * w_front + b.as_() * w_back));
            merged.slice_mut(s![.., .., z]).assign(&blended);
        }
        debug!(
            fusion_slice = mid,
            band_slices = 2 * half,
            "slab merge complete"
        );

        Ok(Volume::new(merged, front.header().clone()))
    }
}

/// Front/back weights for slice offset `i` within a band of `2 * half`
/// slices. The front weight descends from 1 to 0 while the back weight
/// ascends from 0 to 1, summing to 1 at every offset.
fn blend_weights(half: usize, i: usize) -> (f64, f64) {
    let denominator = (2 * half - 1) as f64;
    (
        (2 * half - 1 - i) as f64 / denominator,
        i as f64 / denominator,
    )
}
