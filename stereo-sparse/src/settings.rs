use cv_stereo::CorrespondenceFilter;
use log::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The settings for sparse stereo reconstruction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionSettings {
    /// The threshold used for akaze
    #[serde(default = "default_akaze_threshold")]
    pub akaze_threshold: f64,
    /// The difference between the first and second best match above which a match is allowed
    #[serde(default = "default_match_better_by")]
    pub match_better_by: u32,
    /// The maximum (exclusive) row difference between the two keypoints of a match
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: f64,
    /// The exclusive lower bound on disparity
    #[serde(default = "default_min_disparity")]
    pub min_disparity: f64,
    /// The exclusive upper bound on disparity
    #[serde(default = "default_max_disparity")]
    pub max_disparity: f64,
    /// The radius of the circles drawn around accepted keypoints
    #[serde(default = "default_circle_radius")]
    pub circle_radius: i32,
}

impl ReconstructionSettings {
    /// Loads the settings from a JSON file.
    ///
    /// A file that does not exist gives the default settings. Missing fields take their
    /// default value.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }
        let file = std::fs::File::open(path)?;
        let settings = serde_json::from_reader(file)?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn filter(&self) -> Result<CorrespondenceFilter, cv_stereo::Error> {
        CorrespondenceFilter::new(self.row_tolerance, self.min_disparity, self.max_disparity)
    }
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            akaze_threshold: default_akaze_threshold(),
            match_better_by: default_match_better_by(),
            row_tolerance: default_row_tolerance(),
            min_disparity: default_min_disparity(),
            max_disparity: default_max_disparity(),
            circle_radius: default_circle_radius(),
        }
    }
}

fn default_akaze_threshold() -> f64 {
    0.001
}

fn default_match_better_by() -> u32 {
    24
}

fn default_row_tolerance() -> f64 {
    10.0
}

fn default_min_disparity() -> f64 {
    0.0
}

fn default_max_disparity() -> f64 {
    20000.0
}

fn default_circle_radius() -> i32 {
    4
}
