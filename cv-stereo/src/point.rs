use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point3;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A 3d point relative to the left camera's optical center, where the positive X axis is
/// right, the positive Y axis is down, and the positive Z axis is forwards from the optical
/// center of the camera.
///
/// The unit of distance is the unit the baseline was given in. If the baseline of the
/// [`StereoCalibration`](crate::StereoCalibration) is in centimeters, so is the point.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraPoint(pub Point3<f64>);

impl CameraPoint {
    /// Depth of the point along the optical axis.
    pub fn depth(&self) -> f64 {
        self.0.z
    }
}

/// A triangulated point together with the color of the left image at the pixel it came from.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ReconstructedPoint {
    pub point: CameraPoint,
    pub color: [u8; 3],
}
