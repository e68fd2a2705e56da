use crate::volume::{Sample, Volume};

use ndarray::Ix3;
use nifti::error::NiftiError;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiObject, NiftiType, ReaderOptions, ReaderStreamedOptions};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeIoError {
    #[error("failed to read volume: {0}")]
    Load(#[source] NiftiError),

    #[error("stored datatype is {actual:?}, expected {expected:?}")]
    DatatypeMismatch {
        expected: NiftiType,
        actual: NiftiType,
    },

    #[error("expected a 3-dimensional volume, got {0} dimensions")]
    NotThreeDimensional(usize),

    #[error("failed to write volume: {0}")]
    Save(#[source] NiftiError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a `.nii` / `.nii.gz` file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, if its datatype code does not match
    /// `T`, or if the sample array is not 3-dimensional.
    pub fn load<T: Sample>(path: impl AsRef<Path>) -> Result<Volume<T>, VolumeIoError> {
        let object = ReaderOptions::new()
            .read_file(path.as_ref())
            .map_err(VolumeIoError::Load)?;
        let header = object.header().clone();

        let datatype = header.data_type().map_err(VolumeIoError::Load)?;
        if datatype != T::NIFTI_TYPE {
            return Err(VolumeIoError::DatatypeMismatch {
                expected: T::NIFTI_TYPE,
                actual: datatype,
            });
        }

        let samples = object
            .into_volume()
            .into_ndarray::<T>()
            .map_err(VolumeIoError::Load)?;
        let rank = samples.ndim();
        let samples = samples
            .into_dimensionality::<Ix3>()
            .map_err(|_| VolumeIoError::NotThreeDimensional(rank))?;

        Ok(Volume::new(samples, header))
    }

    /// Read only the header and report the stored datatype, so callers can
    /// pick an element type before loading the full sample array.
    pub fn peek_datatype(path: impl AsRef<Path>) -> Result<NiftiType, VolumeIoError> {
        let object = ReaderStreamedOptions::new()
            .read_file(path.as_ref())
            .map_err(VolumeIoError::Load)?;
        object.header().data_type().map_err(VolumeIoError::Load)
    }
}

pub struct VolumeSaver;

impl VolumeSaver {
    /// Write a volume to a `.nii` / `.nii.gz` file.
    ///
    /// The volume's header is used as the reference header, so spacing,
    /// units, datatype, bitpix and the affine transform all land in the
    /// output file unchanged.
    pub fn save<T: Sample>(volume: &Volume<T>, path: impl AsRef<Path>) -> Result<(), VolumeIoError> {
        WriterOptions::new(path.as_ref())
            .reference_header(volume.header())
            .write_nifti(volume.data())
            .map_err(VolumeIoError::Save)
    }
}
