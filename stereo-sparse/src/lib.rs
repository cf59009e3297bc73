//! Sparse colored point clouds from a rectified stereo image pair.
//!
//! This crate wires feature extraction and matching, the [`cv_stereo`] triangulator, and the
//! outputs (annotated images and a PLY point cloud) into the `stereo-sparse` tool.

pub mod export;
pub mod matching;
pub mod render;
pub mod settings;

pub use settings::ReconstructionSettings;
