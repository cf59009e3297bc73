//! # Rust CV Stereo
//!
//! This crate turns matched keypoints from a calibrated stereo pair into a sparse, colored
//! 3d point cloud. It assumes a near-ideal stereo rig: both cameras share the same intrinsics,
//! their image planes are coplanar, and the right camera sits `baseline` units to the right of
//! the left camera along the x axis. Under that assumption a correspondence lies on the same
//! image row in both images and the only thing that differs is the horizontal position.
//! The difference `x_l - x_r` is the [disparity](https://en.wikipedia.org/wiki/Binocular_disparity).
//!
//! ## Triangulation
//!
//! The optical centers `L` and `R` are `b` apart. A point `p` at depth `Z` lands at `x_l` on the
//! left image plane and at `x_r` on the right one. By similar triangles `Z = b * f / d`, and
//! the remaining coordinates follow by back-projecting the left keypoint to that depth.
//!
//! - `p` the point we are trying to triangulate
//! - `l` the keypoint in the left image
//! - `r` the keypoint in the right image
//! - `L`, `R` the optical centers
//! - `@` the virtual image plane at focal length `f`
//!
//! ```text
//!                 p
//!                / \
//!               /   \
//!              /     \
//!   @@@@@@@@@@l@@@@@@@r@@@@@@@@@@
//!            /         \
//!           /           \
//!          L------b------R
//! ```
//!
//! Matches are not trusted blindly. A [`CorrespondenceFilter`] rejects pairs that stray too far
//! from the same row and pairs whose disparity is outside a plausible range, which also covers
//! zero disparity (a point at infinity). Every rejection is reported as a [`Rejection`] value
//! rather than an error; only misconfiguration and out-of-bounds color lookups are [`Error`]s.
//!
//! ```
//! use cv_stereo::nalgebra::Point2;
//! use cv_stereo::{CameraIntrinsics, CorrespondenceFilter, FeatureMatch, KeyPoint};
//! use cv_stereo::{StereoCalibration, StereoTriangulator};
//!
//! let intrinsics = CameraIntrinsics::new(351.32, Point2::new(255.64, 201.12));
//! let calibration = StereoCalibration::new(intrinsics, 11.9).unwrap();
//! let filter = CorrespondenceFilter::new(10.0, 0.0, 20000.0).unwrap();
//! let triangulator = StereoTriangulator::new(calibration, filter).unwrap();
//!
//! let m = FeatureMatch(
//!     KeyPoint(Point2::new(300.0, 210.0)),
//!     KeyPoint(Point2::new(280.0, 208.0)),
//! );
//! let point = triangulator.triangulate(&m).accepted().unwrap();
//! assert!((point.z - 209.03).abs() < 0.01);
//! ```

mod calibration;
mod color;
mod error;
mod filter;
mod keypoint;
mod matches;
mod point;
mod triangulation;

pub use calibration::*;
pub use color::*;
pub use error::*;
pub use filter::*;
pub use keypoint::*;
pub use matches::*;
pub use nalgebra;
pub use point::*;
pub use triangulation::*;
