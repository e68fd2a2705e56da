use bytemuck::Pod;
use ndarray::Array3;
use nifti::{DataElement, NiftiHeader, NiftiType};
use num_traits::{AsPrimitive, Zero};

/// Numeric types a [`Volume`] can store as voxel samples.
///
/// Ties the in-memory element type to the NIFTI datatype code persisted in
/// the header, so the representation of a loaded volume can be validated
/// against the on-disk format instead of being inferred at runtime.
pub trait Sample:
    DataElement + Pod + Copy + PartialOrd + Zero + AsPrimitive<f64> + Send + Sync + 'static
{
    /// NIFTI datatype code matching this element type.
    const NIFTI_TYPE: NiftiType;

    /// Bits per stored sample (the header's `bitpix` field).
    const BIT_DEPTH: i16;

    /// Casts a blended floating-point intensity back to the storage type,
    /// truncating toward zero.
    fn from_blend(value: f64) -> Self;

    /// Direct numeric truncation to the 8-bit unsigned range (low-byte wrap
    /// for wider integers, no rescaling).
    fn truncate_u8(self) -> u8;
}

impl Sample for u8 {
    const NIFTI_TYPE: NiftiType = NiftiType::Uint8;
    const BIT_DEPTH: i16 = 8;

    fn from_blend(value: f64) -> Self {
        value as u8
    }

    fn truncate_u8(self) -> u8 {
        self
    }
}

impl Sample for u16 {
    const NIFTI_TYPE: NiftiType = NiftiType::Uint16;
    const BIT_DEPTH: i16 = 16;

    fn from_blend(value: f64) -> Self {
        value as u16
    }

    fn truncate_u8(self) -> u8 {
        self as u8
    }
}

/// A 3D image with axes (X, Y, Z), where Z is the slice axis along which
/// front/back acquisitions are stitched.
///
/// Carries the full NIFTI header of the file it came from, so voxel spacing,
/// units and the affine transform survive into whatever volume is derived
/// from it.
pub struct Volume<T: Sample> {
    data: Array3<T>,
    header: NiftiHeader,
}

impl<T: Sample> Volume<T> {
    /// Wrap a sample array together with its header. The header's datatype
    /// and bitpix fields are stamped from `T`, keeping the metadata in
    /// agreement with the element type by construction.
    pub fn new(data: Array3<T>, mut header: NiftiHeader) -> Self {
        header.datatype = T::NIFTI_TYPE as i16;
        header.bitpix = T::BIT_DEPTH;
        Self { data, header }
    }

    /// Get the dimensions of the volume (x, y, z)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Get a reference to the NIFTI header this volume carries
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Physical voxel size per spatial axis (pixdim 1 to 3)
    pub fn spacing(&self) -> (f32, f32, f32) {
        (
            self.header.pixdim[1],
            self.header.pixdim[2],
            self.header.pixdim[3],
        )
    }

    /// Raw spatial/temporal units code (the header's `xyzt_units` field)
    pub fn units(&self) -> u8 {
        self.header.xyzt_units
    }

    /// Datatype code of the stored samples
    pub fn datatype(&self) -> NiftiType {
        T::NIFTI_TYPE
    }

    /// Bits per stored sample
    pub fn bit_depth(&self) -> i16 {
        self.header.bitpix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn micron_header() -> NiftiHeader {
        NiftiHeader {
            pixdim: [1.0, 0.025, 0.025, 0.01, 1.0, 1.0, 1.0, 1.0],
            xyzt_units: 2,
            ..NiftiHeader::default()
        }
    }

    #[test]
    fn new_stamps_datatype_from_element_type() {
        let mut header = micron_header();
        // Deliberately wrong on the way in.
        header.datatype = NiftiType::Float64 as i16;
        header.bitpix = 64;

        let volume = Volume::new(Array3::<u8>::zeros((2, 2, 2)), header);
        assert_eq!(volume.header().datatype, NiftiType::Uint8 as i16);
        assert_eq!(volume.bit_depth(), 8);
        assert_eq!(volume.datatype(), NiftiType::Uint8);
    }

    #[test]
    fn spacing_and_units_come_from_header() {
        let volume = Volume::new(Array3::<u16>::zeros((4, 4, 10)), micron_header());
        assert_eq!(volume.spacing(), (0.025, 0.025, 0.01));
        assert_eq!(volume.units(), 2);
        assert_eq!(volume.dim(), (4, 4, 10));
    }
}
