use crate::volume::{Sample, Volume};

pub struct BitDepthConverter;

impl BitDepthConverter {
    /// Truncate a volume's samples to the 8-bit unsigned range.
    ///
    /// This is a direct numeric cast, not a rescale: integer sources keep
    /// their low byte, so values above 255 wrap. Datatype and bitpix are
    /// rewritten for the new storage type while spacing, units and the rest
    /// of the header carry over unchanged.
    pub fn convert_to_8bit<T: Sample>(volume: &Volume<T>) -> Volume<u8> {
        let data = volume.data().mapv(Sample::truncate_u8);
        Volume::new(data, volume.header().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use nifti::{NiftiHeader, NiftiType};

    #[test]
    fn truncation_keeps_the_low_byte() {
        let mut data = Array3::<u16>::zeros((2, 2, 2));
        data[(0, 0, 0)] = 300;
        data[(0, 0, 1)] = 255;
        data[(1, 1, 1)] = 512;
        let volume = Volume::new(data, NiftiHeader::default());

        let converted = BitDepthConverter::convert_to_8bit(&volume);
        assert_eq!(converted.data()[(0, 0, 0)], 44);
        assert_eq!(converted.data()[(0, 0, 1)], 255);
        assert_eq!(converted.data()[(1, 1, 1)], 0);
    }

    #[test]
    fn conversion_rewrites_bit_depth_metadata_only() {
        let header = NiftiHeader {
            pixdim: [1.0, 0.025, 0.025, 0.01, 1.0, 1.0, 1.0, 1.0],
            xyzt_units: 2,
            ..NiftiHeader::default()
        };
        let volume = Volume::new(Array3::<u16>::from_elem((2, 2, 2), 17), header);

        let converted = BitDepthConverter::convert_to_8bit(&volume);
        assert_eq!(converted.datatype(), NiftiType::Uint8);
        assert_eq!(converted.bit_depth(), 8);
        assert_eq!(converted.spacing(), volume.spacing());
        assert_eq!(converted.units(), volume.units());
    }
}
