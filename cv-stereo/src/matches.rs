use crate::ImagePoint;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A keypoint in the left image matched to a keypoint in the right image.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FeatureMatch<P>(pub P, pub P);

impl<P> FeatureMatch<P>
where
    P: ImagePoint,
{
    /// The horizontal offset `x_l - x_r` between the two keypoints.
    pub fn disparity(&self) -> f64 {
        self.0.image_point().x - self.1.image_point().x
    }

    /// The absolute vertical offset between the two keypoints.
    ///
    /// This is zero for a perfect correspondence on a rectified pair.
    pub fn row_delta(&self) -> f64 {
        (self.0.image_point().y - self.1.image_point().y).abs()
    }
}
