use crate::{CameraPoint, Error, FeatureMatch, ImagePoint, KeyPoint};
use nalgebra::{Matrix3, Point2, Point3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Intrinsic parameters of a camera with square pixels and no skew.
///
/// This is the reduced form of the intrinsic matrix as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters)
/// with `kx = ky = 1`, so a single focal length in pixels serves both axes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub focal: f64,
    pub principal_point: Point2<f64>,
}

impl CameraIntrinsics {
    pub fn new(focal: f64, principal_point: Point2<f64>) -> Self {
        Self {
            focal,
            principal_point,
        }
    }

    /// Creates camera intrinsics that would create an identity intrinsic matrix.
    pub fn identity() -> Self {
        Self::new(1.0, Point2::origin())
    }

    #[must_use]
    pub fn focal(self, focal: f64) -> Self {
        Self { focal, ..self }
    }

    #[must_use]
    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focal, 0.0,        self.principal_point.x,
            0.0,        self.focal, self.principal_point.y,
            0.0,        0.0,        1.0,
        )
    }

    /// Checks that the focal length is positive and every value is finite.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.focal.is_finite() && self.focal > 0.0) {
            return Err(Error::InvalidFocalLength(self.focal));
        }
        let coords = self.principal_point.coords;
        if !coords.iter().all(|n| n.is_finite()) {
            return Err(Error::InvalidPrincipalPoint(coords.x, coords.y));
        }
        Ok(())
    }

    /// Projects a point in front of the camera into pixel coordinates.
    ///
    /// Returns `None` if the point is on or behind the image plane of the optical center.
    pub fn project(&self, point: Point3<f64>) -> Option<KeyPoint> {
        if point.z <= 0.0 {
            return None;
        }
        let scale = self.focal / point.z;
        Some(KeyPoint(self.principal_point + point.xy().coords * scale))
    }

    /// Back-projects a pixel to the given depth along the optical axis.
    pub fn unproject(&self, point: impl ImagePoint, depth: f64) -> CameraPoint {
        let centered = point.image_point() - self.principal_point;
        let scale = depth / self.focal;
        CameraPoint(Point3::new(centered.x * scale, centered.y * scale, depth))
    }
}

/// Calibration of a rectified stereo rig.
///
/// Both cameras share `intrinsics`. The right camera is translated `baseline` units along
/// the left camera's positive X axis. The baseline sets the unit of every reconstructed point.
///
/// ```
/// use cv_stereo::nalgebra::{Point2, Point3};
/// use cv_stereo::{CameraIntrinsics, StereoCalibration};
///
/// let calibration = StereoCalibration::new(
///     CameraIntrinsics::new(500.0, Point2::new(320.0, 240.0)),
///     0.12,
/// )
/// .unwrap();
/// let m = calibration.project(Point3::new(0.5, -0.2, 3.0)).unwrap();
/// assert!((m.disparity() - calibration.disparity_from_depth(3.0)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct StereoCalibration {
    pub intrinsics: CameraIntrinsics,
    pub baseline: f64,
}

impl StereoCalibration {
    /// Creates the calibration, failing if the focal length or baseline are not positive.
    pub fn new(intrinsics: CameraIntrinsics, baseline: f64) -> Result<Self, Error> {
        let calibration = Self {
            intrinsics,
            baseline,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.intrinsics.validate()?;
        if !(self.baseline.is_finite() && self.baseline > 0.0) {
            return Err(Error::InvalidBaseline(self.baseline));
        }
        Ok(())
    }

    /// Depth `b * f / d` of a point seen with disparity `d`.
    ///
    /// Zero disparity gives an infinite depth. Callers that need a finite
    /// point should reject it first, which [`CorrespondenceFilter`](crate::CorrespondenceFilter) does.
    pub fn depth_from_disparity(&self, disparity: f64) -> f64 {
        self.baseline * self.intrinsics.focal / disparity
    }

    /// Disparity `b * f / Z` a point at depth `Z` is observed with.
    pub fn disparity_from_depth(&self, depth: f64) -> f64 {
        self.baseline * self.intrinsics.focal / depth
    }

    /// Projects a point in left camera coordinates into both images.
    ///
    /// Returns `None` if the point is not in front of the rig.
    pub fn project(&self, point: Point3<f64>) -> Option<FeatureMatch<KeyPoint>> {
        let left = self.intrinsics.project(point)?;
        let right = KeyPoint(Point2::new(
            left.x - self.disparity_from_depth(point.z),
            left.y,
        ));
        Some(FeatureMatch(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> StereoCalibration {
        StereoCalibration::new(
            CameraIntrinsics::new(351.32, Point2::new(255.64, 201.12)),
            11.9,
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_positive_focal() {
        let intrinsics = CameraIntrinsics::identity().focal(0.0);
        assert_eq!(
            StereoCalibration::new(intrinsics, 1.0),
            Err(Error::InvalidFocalLength(0.0))
        );
        let intrinsics = CameraIntrinsics::identity().focal(-3.0);
        assert_eq!(
            StereoCalibration::new(intrinsics, 1.0),
            Err(Error::InvalidFocalLength(-3.0))
        );
    }

    #[test]
    fn rejects_non_positive_baseline() {
        let intrinsics = CameraIntrinsics::identity();
        assert_eq!(
            StereoCalibration::new(intrinsics, 0.0),
            Err(Error::InvalidBaseline(0.0))
        );
        assert_eq!(
            StereoCalibration::new(intrinsics, -11.9),
            Err(Error::InvalidBaseline(-11.9))
        );
    }

    #[test]
    fn rejects_nan() {
        let intrinsics = CameraIntrinsics::identity().focal(f64::NAN);
        assert!(matches!(
            StereoCalibration::new(intrinsics, 1.0),
            Err(Error::InvalidFocalLength(_))
        ));
        let intrinsics = CameraIntrinsics::identity().principal_point(Point2::new(f64::NAN, 0.0));
        assert!(matches!(
            StereoCalibration::new(intrinsics, 1.0),
            Err(Error::InvalidPrincipalPoint(..))
        ));
        assert!(matches!(
            StereoCalibration::new(CameraIntrinsics::identity(), f64::INFINITY),
            Err(Error::InvalidBaseline(_))
        ));
    }

    #[test]
    fn matrix_layout() {
        let m = rig().intrinsics.matrix();
        assert_eq!(m[(0, 0)], 351.32);
        assert_eq!(m[(1, 1)], 351.32);
        assert_eq!(m[(0, 2)], 255.64);
        assert_eq!(m[(1, 2)], 201.12);
        assert_eq!(m[(2, 2)], 1.0);
        assert_eq!(m[(0, 1)], 0.0);
    }

    #[test]
    fn projection_agrees_with_matrix() {
        let intrinsics = rig().intrinsics;
        let point = Point3::new(12.0, -4.0, 150.0);
        let kp = intrinsics.project(point).unwrap();
        let homogeneous = intrinsics.matrix() * point.coords;
        assert_relative_eq!(kp.x, homogeneous.x / homogeneous.z, epsilon = 1e-9);
        assert_relative_eq!(kp.y, homogeneous.y / homogeneous.z, epsilon = 1e-9);
    }

    #[test]
    fn unproject_inverts_project() {
        let intrinsics = rig().intrinsics;
        let point = Point3::new(-7.5, 3.25, 88.0);
        let kp = intrinsics.project(point).unwrap();
        let back = intrinsics.unproject(kp, point.z);
        assert_relative_eq!(back.0, point, epsilon = 1e-9);
    }

    #[test]
    fn points_behind_the_rig_do_not_project() {
        assert!(rig().project(Point3::new(1.0, 1.0, 0.0)).is_none());
        assert!(rig().project(Point3::new(1.0, 1.0, -5.0)).is_none());
    }

    #[test]
    fn stereo_projection_keeps_rows() {
        let FeatureMatch(l, r) = rig().project(Point3::new(3.0, 2.0, 100.0)).unwrap();
        assert_eq!(l.y, r.y);
        assert!(l.x > r.x);
    }

    #[test]
    fn depth_and_disparity_are_inverse() {
        let rig = rig();
        let d = rig.disparity_from_depth(209.0);
        assert_relative_eq!(rig.depth_from_disparity(d), 209.0, epsilon = 1e-9);
    }

    #[cfg(feature = "serde-serialize")]
    #[test]
    fn calibration_from_json() {
        let calibration: StereoCalibration = serde_json::from_str(
            r#"{"intrinsics": {"focal": 351.32, "principal_point": [255.64, 201.12]}, "baseline": 11.9}"#,
        )
        .unwrap();
        assert_eq!(calibration, rig());
    }
}
