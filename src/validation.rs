use crate::WatershedError;
use ndarray::Array3;
use num_traits::Float;

pub(crate) struct VolumeValidator<'a, T> {
    volume: &'a Array3<T>,
}

impl<'a, T: Float> VolumeValidator<'a, T> {
    pub(crate) fn new(volume: &'a Array3<T>) -> Self {
        Self { volume }
    }

    pub(crate) fn validate_volume(&self) -> Result<(), WatershedError> {
        if self.volume.is_empty() {
            return Err(WatershedError::EmptyVolume);
        }
        for (n, value) in self.volume.iter().enumerate() {
            if !value.is_finite() {
                return Err(WatershedError::NonFiniteValue(format!(
                    "voxel at linear index {n} is not finite"
                )));
            }
        }
        Ok(())
    }
}
