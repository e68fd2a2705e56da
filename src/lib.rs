//! # nifti-stitch library
//!
//! This crate merges two NIFTI volumes acquired from opposing scan
//! directions into a single volume.

//!
//! Large cleared-tissue samples are often imaged twice, once from the front
//! (dorsal) and once from the back (ventral), because light does not
//! penetrate the full depth. The two acquisitions cover the same grid and
//! are stitched along the Z axis: the front volume supplies the lower
//! slices, the back volume the upper ones, and a configurable band around
//! the fusion slice is cross-faded linearly so intensity differences between
//! the acquisitions do not leave a visible seam.
//!
//! Volumes are loaded from and saved to `.nii` / `.nii.gz` files. The
//! merged volume inherits the front volume's header, so voxel spacing,
//! units, datatype, bitpix and the affine transform all carry over
//! unchanged. Volumes are assumed to have the following properties:
//!  - 3-dimensional sample array with Z as the last axis
//!  - Identical shape for the front and back inputs
//!  - Unsigned integer samples (8 or 16 bit)
//!
//! A back volume stored at a wider bit depth can be truncated to 8 bit
//! before merging with [`BitDepthConverter`].
//!
//! # Examples
//!
//! ## Merging a front and back acquisition
//!
//! Load both halves, blend them over a 10-slice transition band centered on
//! the middle slice, and save the result.
//!
//! ```no_run
//! # use nifti_stitch::{SlabMerger, VolumeLoader, VolumeSaver};
//! let front = VolumeLoader::load::<u16>("brain_front_16bit.nii.gz")?;
//! let back = VolumeLoader::load::<u16>("brain_back_16bit.nii.gz")?;
//! let merged = SlabMerger::merge(&front, &back, 0, 10)?;
//! VolumeSaver::save(&merged, "brain_wb_16bit.nii.gz")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod convert;
pub mod merge;
pub mod volume;
pub mod volume_io;

pub use convert::BitDepthConverter;
pub use merge::{MergeError, SlabMerger};
pub use volume::{Sample, Volume};
pub use volume_io::{VolumeIoError, VolumeLoader, VolumeSaver};
