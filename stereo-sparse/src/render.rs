use cv_stereo::{FeatureMatch, KeyPoint, Verdict};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing;
use palette::{FromColor, Hsv, RgbHue, Srgb};

/// Which image of the stereo pair to annotate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Draws a hollow circle on a copy of `image` for every accepted match.
///
/// The n-th accepted match gets the same hue on both sides, so the correspondence can be
/// followed by eye between the two annotated images.
pub fn render_accepted(
    image: &DynamicImage,
    matches: &[FeatureMatch<KeyPoint>],
    verdicts: &[Verdict],
    side: Side,
    radius: i32,
) -> RgbaImage {
    let mut canvas = image.to_rgba8();
    let accepted = matches
        .iter()
        .zip(verdicts)
        .filter(|(_, verdict)| verdict.is_accepted())
        .map(|(&FeatureMatch(l, r), _)| match side {
            Side::Left => l,
            Side::Right => r,
        });
    for (ix, key_point) in accepted.enumerate() {
        let center = (key_point.x.round() as i32, key_point.y.round() as i32);
        drawing::draw_hollow_circle_mut(&mut canvas, center, radius, wheel_color(ix));
    }
    canvas
}

/// Rotates through a color wheel on only the most saturated colors.
fn wheel_color(ix: usize) -> Rgba<u8> {
    let hsv = Hsv::new(RgbHue::from_radians(ix as f32 * 0.1), 1.0, 1.0);
    let rgb = Srgb::from_color(hsv);
    Rgba([
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
        255,
    ])
}
