use anyhow::Context;
use cv_stereo::nalgebra::Point2;
use cv_stereo::{CameraIntrinsics, Rejection, StereoCalibration, StereoTriangulator, Verdict};
use log::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use stereo_sparse::render::{render_accepted, Side};
use stereo_sparse::{export, matching, ReconstructionSettings};
use structopt::StructOpt;

#[derive(StructOpt, Clone)]
#[structopt(
    name = "stereo-sparse",
    about = "A tool to triangulate a sparse colored point cloud from a rectified stereo pair",
    rename_all = "kebab-case"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `stereo_sparse::ReconstructionSettings`.
    #[structopt(short, long, default_value = "stereo-settings.json")]
    settings: PathBuf,
    /// A JSON file containing a `cv_stereo::StereoCalibration`.
    ///
    /// If this is provided, the focal, optical center and baseline arguments are ignored.
    #[structopt(short, long, parse(from_os_str))]
    calibration: Option<PathBuf>,
    /// The focal length in pixels
    #[structopt(long, default_value = "351.32")]
    focal: f64,
    /// The x optical center coordinate
    #[structopt(long, default_value = "255.64")]
    x_center: f64,
    /// The y optical center coordinate
    #[structopt(long, default_value = "201.12")]
    y_center: f64,
    /// The distance between the optical centers, which sets the unit of the output
    #[structopt(long, default_value = "11.9")]
    baseline: f64,
    /// Output PLY file to deposit the point cloud.
    ///
    /// If this is not provided, then the point cloud goes to stdout.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Write the left image with accepted keypoints circled to this path
    #[structopt(long, parse(from_os_str))]
    draw_left: Option<PathBuf>,
    /// Write the right image with accepted keypoints circled to this path
    #[structopt(long, parse(from_os_str))]
    draw_right: Option<PathBuf>,
    /// The left image of the stereo pair
    #[structopt(parse(from_os_str))]
    left: PathBuf,
    /// The right image of the stereo pair
    #[structopt(parse(from_os_str))]
    right: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    let settings = ReconstructionSettings::load(&opt.settings)
        .with_context(|| format!("failed to load settings from {}", opt.settings.display()))?;
    let calibration = match &opt.calibration {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open calibration {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse calibration {}", path.display()))?
        }
        None => StereoCalibration {
            intrinsics: CameraIntrinsics::new(opt.focal, Point2::new(opt.x_center, opt.y_center)),
            baseline: opt.baseline,
        },
    };
    info!("using calibration {:?}", calibration);
    let triangulator = StereoTriangulator::new(calibration, settings.filter()?)?;

    let left = image::open(&opt.left)
        .with_context(|| format!("failed to open image {}", opt.left.display()))?;
    let right = image::open(&opt.right)
        .with_context(|| format!("failed to open image {}", opt.right.display()))?;

    let matches = matching::match_features(
        &left,
        &right,
        settings.akaze_threshold,
        settings.match_better_by,
    );
    let verdicts = triangulator.verdicts(&matches);
    log_rejections(&verdicts);

    let points = triangulator.reconstruct(&matches, &left)?;
    info!("reconstructed {} points", points.len());

    for (path, image, side) in [
        (&opt.draw_left, &left, Side::Left),
        (&opt.draw_right, &right, Side::Right),
    ] {
        if let Some(path) = path {
            render_accepted(image, &matches, &verdicts, side, settings.circle_radius)
                .save(path)
                .with_context(|| format!("failed to write image {}", path.display()))?;
            info!("wrote {:?} annotations to {}", side, path.display());
        }
    }

    if let Some(path) = &opt.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::export(BufWriter::new(file), &points)?;
        info!("exported point cloud to {}", path.display());
    } else {
        let stdout = std::io::stdout();
        export::export(stdout.lock(), &points)?;
    }
    Ok(())
}

fn log_rejections(verdicts: &[Verdict]) {
    let (mut row, mut zero, mut range) = (0usize, 0usize, 0usize);
    for verdict in verdicts {
        match verdict.rejection() {
            Some(Rejection::RowMismatch { .. }) => row += 1,
            Some(Rejection::ZeroDisparity) => zero += 1,
            Some(Rejection::DisparityOutOfRange { .. }) => range += 1,
            None => {}
        }
    }
    debug!(
        "{} matches: {} rejected for row mismatch, {} for zero disparity, {} for disparity range",
        verdicts.len(),
        row,
        zero,
        range
    );
}
