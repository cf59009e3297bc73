use crate::{Error, FeatureMatch, ImagePoint};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The reason a match was left out of the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Rejection {
    /// The keypoints are `delta` rows apart, which is not less than the row tolerance.
    RowMismatch { delta: f64 },
    /// The keypoints have the same horizontal position, so the point is at infinity.
    ZeroDisparity,
    /// The disparity is outside of the open interval `(min_disparity, max_disparity)`.
    DisparityOutOfRange { disparity: f64 },
}

/// Rejects matches which are not geometrically plausible on a rectified stereo pair.
///
/// A correspondence on an ideal rig lies on the same row of both images, so the first check
/// requires the rows to differ by strictly less than `row_tolerance`. The tolerance absorbs
/// residual rectification error and keypoint localization noise.
///
/// The second check requires the disparity to be strictly inside
/// `(min_disparity, max_disparity)`. A small disparity is a far point, and zero or negative
/// disparity cannot be triangulated in front of the rig. A very large disparity is usually
/// a bad match rather than a point right in front of the cameras. Zero disparity is always
/// rejected, even if the range would allow it.
///
/// Every comparison is written so that a NaN coordinate is rejected instead of accepted.
///
/// ```
/// use cv_stereo::{CorrespondenceFilter, FeatureMatch, KeyPoint, Rejection};
///
/// let filter = CorrespondenceFilter::new(10.0, 0.0, 20000.0).unwrap();
/// let m = FeatureMatch(KeyPoint::new(300.0, 210.0), KeyPoint::new(280.0, 230.0));
/// assert_eq!(filter.check(&m), Err(Rejection::RowMismatch { delta: 20.0 }));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CorrespondenceFilter {
    row_tolerance: f64,
    min_disparity: f64,
    max_disparity: f64,
}

impl CorrespondenceFilter {
    /// Creates a filter, failing if the tolerance is not positive or the range is empty.
    pub fn new(row_tolerance: f64, min_disparity: f64, max_disparity: f64) -> Result<Self, Error> {
        let filter = Self {
            row_tolerance,
            min_disparity,
            max_disparity,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Set the maximum (exclusive) row difference between the two keypoints.
    ///
    /// Default is `10.0`.
    #[must_use]
    pub fn row_tolerance(self, row_tolerance: f64) -> Self {
        Self {
            row_tolerance,
            ..self
        }
    }

    /// Set the exclusive disparity range.
    ///
    /// Default is `(0.0, 20000.0)`.
    #[must_use]
    pub fn disparity_range(self, min_disparity: f64, max_disparity: f64) -> Self {
        Self {
            min_disparity,
            max_disparity,
            ..self
        }
    }

    pub fn get_row_tolerance(&self) -> f64 {
        self.row_tolerance
    }

    pub fn get_disparity_range(&self) -> (f64, f64) {
        (self.min_disparity, self.max_disparity)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.row_tolerance.is_finite() && self.row_tolerance > 0.0) {
            return Err(Error::InvalidRowTolerance(self.row_tolerance));
        }
        // Infinite bounds are allowed to leave one side of the range open.
        if self.min_disparity.is_nan()
            || self.max_disparity.is_nan()
            || self.min_disparity >= self.max_disparity
        {
            return Err(Error::InvalidDisparityRange {
                min: self.min_disparity,
                max: self.max_disparity,
            });
        }
        Ok(())
    }

    /// Checks a match, returning its disparity if it is accepted.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn check<P: ImagePoint>(&self, feature_match: &FeatureMatch<P>) -> Result<f64, Rejection> {
        let delta = feature_match.row_delta();
        if !(delta < self.row_tolerance) {
            return Err(Rejection::RowMismatch { delta });
        }
        let disparity = feature_match.disparity();
        if disparity == 0.0 {
            return Err(Rejection::ZeroDisparity);
        }
        if !(disparity > self.min_disparity && disparity < self.max_disparity) {
            return Err(Rejection::DisparityOutOfRange { disparity });
        }
        Ok(disparity)
    }
}

impl Default for CorrespondenceFilter {
    fn default() -> Self {
        Self {
            row_tolerance: 10.0,
            min_disparity: 0.0,
            max_disparity: 20000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPoint;

    fn pair(l: (f64, f64), r: (f64, f64)) -> FeatureMatch<KeyPoint> {
        FeatureMatch(KeyPoint::new(l.0, l.1), KeyPoint::new(r.0, r.1))
    }

    #[test]
    fn accepts_same_row() {
        let filter = CorrespondenceFilter::default();
        assert_eq!(filter.check(&pair((300.0, 210.0), (280.0, 210.0))), Ok(20.0));
    }

    #[test]
    fn accepts_within_row_tolerance() {
        let filter = CorrespondenceFilter::default();
        assert_eq!(filter.check(&pair((300.0, 210.0), (280.0, 208.0))), Ok(20.0));
    }

    #[test]
    fn row_tolerance_is_exclusive() {
        let filter = CorrespondenceFilter::default();
        assert_eq!(
            filter.check(&pair((300.0, 210.0), (280.0, 200.0))),
            Err(Rejection::RowMismatch { delta: 10.0 })
        );
        assert_eq!(
            filter.check(&pair((300.0, 200.0), (280.0, 210.0))),
            Err(Rejection::RowMismatch { delta: 10.0 })
        );
    }

    #[test]
    fn row_check_comes_before_disparity() {
        let filter = CorrespondenceFilter::default();
        assert_eq!(
            filter.check(&pair((300.0, 210.0), (300.0, 250.0))),
            Err(Rejection::RowMismatch { delta: 40.0 })
        );
    }

    #[test]
    fn zero_disparity() {
        let filter = CorrespondenceFilter::default();
        assert_eq!(
            filter.check(&pair((300.0, 210.0), (300.0, 210.0))),
            Err(Rejection::ZeroDisparity)
        );
        // Even when the range straddles zero.
        let filter = filter.disparity_range(-50.0, 50.0);
        assert_eq!(
            filter.check(&pair((300.0, 210.0), (300.0, 210.0))),
            Err(Rejection::ZeroDisparity)
        );
    }

    #[test]
    fn disparity_bounds_are_exclusive() {
        let filter = CorrespondenceFilter::default().disparity_range(5.0, 40.0);
        assert_eq!(
            filter.check(&pair((105.0, 10.0), (100.0, 10.0))),
            Err(Rejection::DisparityOutOfRange { disparity: 5.0 })
        );
        assert_eq!(
            filter.check(&pair((140.0, 10.0), (100.0, 10.0))),
            Err(Rejection::DisparityOutOfRange { disparity: 40.0 })
        );
        assert_eq!(
            filter.check(&pair((100.0, 10.0), (120.0, 10.0))),
            Err(Rejection::DisparityOutOfRange { disparity: -20.0 })
        );
        assert_eq!(filter.check(&pair((139.0, 10.0), (100.0, 10.0))), Ok(39.0));
    }

    #[test]
    fn nan_is_rejected() {
        let filter = CorrespondenceFilter::default();
        assert!(filter
            .check(&pair((300.0, f64::NAN), (280.0, 210.0)))
            .is_err());
        assert!(filter
            .check(&pair((f64::NAN, 210.0), (280.0, 210.0)))
            .is_err());
    }

    #[test]
    fn invalid_configuration() {
        assert_eq!(
            CorrespondenceFilter::new(0.0, 0.0, 1.0),
            Err(Error::InvalidRowTolerance(0.0))
        );
        assert_eq!(
            CorrespondenceFilter::new(-1.0, 0.0, 1.0),
            Err(Error::InvalidRowTolerance(-1.0))
        );
        assert_eq!(
            CorrespondenceFilter::new(1.0, 5.0, 5.0),
            Err(Error::InvalidDisparityRange { min: 5.0, max: 5.0 })
        );
        assert_eq!(
            CorrespondenceFilter::new(1.0, 9.0, 5.0),
            Err(Error::InvalidDisparityRange { min: 9.0, max: 5.0 })
        );
        assert!(CorrespondenceFilter::new(1.0, 0.0, f64::INFINITY).is_ok());
    }
}
