use crate::{
    CameraPoint, ColorSource, CorrespondenceFilter, Error, FeatureMatch, ImagePoint,
    ReconstructedPoint, Rejection, StereoCalibration,
};
use log::*;
use nalgebra::Point3;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The outcome of triangulating a single match.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Verdict {
    Accepted { disparity: f64, point: CameraPoint },
    Rejected(Rejection),
}

impl Verdict {
    /// Retrieve the point if the match was accepted.
    pub fn accepted(self) -> Option<CameraPoint> {
        match self {
            Verdict::Accepted { point, .. } => Some(point),
            Verdict::Rejected(_) => None,
        }
    }

    /// Retrieve the reason if the match was rejected.
    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Verdict::Accepted { .. } => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Triangulates matches from a rectified stereo pair using their disparity.
///
/// For a match accepted by the [`CorrespondenceFilter`] with disparity `d`, the point is
///
/// ```text
/// X = (b / d) * (x_l - u0)
/// Y = (b / d) * (y_l - v0)
/// Z = (b / d) * f
/// ```
///
/// where `b` is the baseline, `f` the focal length and `(u0, v0)` the principal point of the
/// left camera. The right keypoint only contributes its column through the disparity, so the
/// result is expressed in the left camera's frame.
///
/// This is exact on an ideal rig and very fast, but unlike a bearing based triangulator it does
/// not spread the error of a noisy match between the two views.
///
/// ```
/// use cv_stereo::nalgebra::{Point2, Point3};
/// use cv_stereo::{CameraIntrinsics, CorrespondenceFilter, StereoCalibration, StereoTriangulator};
///
/// let calibration = StereoCalibration::new(
///     CameraIntrinsics::new(700.0, Point2::new(640.0, 360.0)),
///     0.3,
/// )
/// .unwrap();
/// let triangulator = StereoTriangulator::new(calibration, CorrespondenceFilter::default()).unwrap();
///
/// let point = Point3::new(0.4, -0.25, 6.0);
/// let m = calibration.project(point).unwrap();
/// let triangulated = triangulator.triangulate(&m).accepted().unwrap();
/// assert!((triangulated.0 - point).norm() < 1e-9);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct StereoTriangulator {
    calibration: StereoCalibration,
    filter: CorrespondenceFilter,
}

impl StereoTriangulator {
    /// Creates the triangulator.
    ///
    /// Both the calibration and the filter are validated here so that a bad configuration is
    /// reported before any match is looked at.
    pub fn new(calibration: StereoCalibration, filter: CorrespondenceFilter) -> Result<Self, Error> {
        calibration.validate()?;
        filter.validate()?;
        Ok(Self {
            calibration,
            filter,
        })
    }

    pub fn calibration(&self) -> &StereoCalibration {
        &self.calibration
    }

    pub fn filter(&self) -> &CorrespondenceFilter {
        &self.filter
    }

    /// Filters and triangulates a single match.
    pub fn triangulate<P: ImagePoint>(&self, feature_match: &FeatureMatch<P>) -> Verdict {
        match self.filter.check(feature_match) {
            Ok(disparity) => Verdict::Accepted {
                disparity,
                point: self.triangulate_disparity(feature_match.0.image_point(), disparity),
            },
            Err(rejection) => {
                trace!("rejected match: {:?}", rejection);
                Verdict::Rejected(rejection)
            }
        }
    }

    fn triangulate_disparity(&self, left: nalgebra::Point2<f64>, disparity: f64) -> CameraPoint {
        let scale = self.calibration.baseline / disparity;
        let centered = left - self.calibration.intrinsics.principal_point;
        CameraPoint(Point3::new(
            scale * centered.x,
            scale * centered.y,
            self.calibration.depth_from_disparity(disparity),
        ))
    }

    /// Computes the verdict of every match, in input order.
    pub fn verdicts<P>(&self, matches: &[FeatureMatch<P>]) -> Vec<Verdict>
    where
        P: ImagePoint + Sync,
    {
        #[cfg(feature = "rayon")]
        let verdicts: Vec<Verdict> = matches.par_iter().map(|m| self.triangulate(m)).collect();
        #[cfg(not(feature = "rayon"))]
        let verdicts: Vec<Verdict> = matches.iter().map(|m| self.triangulate(m)).collect();
        verdicts
    }

    /// Reconstructs the colored point cloud of a set of matches.
    ///
    /// Rejected matches are left out. The output keeps the relative order of the accepted
    /// matches. Colors are taken from `left_image` at the left keypoint. If any accepted match
    /// lies outside of `left_image`, the whole batch fails and nothing is returned.
    pub fn reconstruct<P, I>(
        &self,
        matches: &[FeatureMatch<P>],
        left_image: &I,
    ) -> Result<Vec<ReconstructedPoint>, Error>
    where
        P: ImagePoint + Sync,
        I: ColorSource + Sync,
    {
        let colorize = |m: &FeatureMatch<P>| -> Option<Result<ReconstructedPoint, Error>> {
            let point = self.triangulate(m).accepted()?;
            Some(
                left_image
                    .sample(m.0.image_point())
                    .map(|color| ReconstructedPoint { point, color }),
            )
        };

        #[cfg(feature = "rayon")]
        let points = matches
            .par_iter()
            .filter_map(colorize)
            .collect::<Result<Vec<_>, Error>>()?;
        #[cfg(not(feature = "rayon"))]
        let points = matches
            .iter()
            .filter_map(colorize)
            .collect::<Result<Vec<_>, Error>>()?;

        debug!(
            "reconstructed {} points from {} matches ({} rejected)",
            points.len(),
            matches.len(),
            matches.len() - points.len()
        );
        Ok(points)
    }
}
