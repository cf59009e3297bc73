use crate::{Error, ImagePoint};
use image::{DynamicImage, GenericImageView, GrayImage, RgbImage, RgbaImage};

/// An image that reconstructed points can take their color from.
///
/// Sampling uses the nearest pixel, `(round(y), round(x))` as `(row, col)`. A point that
/// falls outside of the image is an error rather than being clamped to the border, since a
/// made up color would silently end up in the point cloud.
pub trait ColorSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// The color at `(col, row)`, which is guaranteed to be within [`ColorSource::dimensions`].
    fn color_at(&self, col: u32, row: u32) -> [u8; 3];

    /// Samples the color of the pixel nearest to `point`.
    fn sample(&self, point: impl ImagePoint) -> Result<[u8; 3], Error> {
        let point = point.image_point();
        let (width, height) = self.dimensions();
        let row = pixel_index(point.y);
        let col = pixel_index(point.x);
        if row < 0 || col < 0 || row >= i64::from(height) || col >= i64::from(width) {
            return Err(Error::PixelOutOfBounds {
                row,
                col,
                width,
                height,
            });
        }
        Ok(self.color_at(col as u32, row as u32))
    }
}

fn pixel_index(coordinate: f64) -> i64 {
    if coordinate.is_finite() {
        coordinate.round() as i64
    } else {
        i64::MIN
    }
}

impl ColorSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn color_at(&self, col: u32, row: u32) -> [u8; 3] {
        self.get_pixel(col, row).0
    }
}

impl ColorSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn color_at(&self, col: u32, row: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(col, row).0;
        [r, g, b]
    }
}

impl ColorSource for GrayImage {
    fn dimensions(&self) -> (u32, u32) {
        GrayImage::dimensions(self)
    }

    fn color_at(&self, col: u32, row: u32) -> [u8; 3] {
        let [luma] = self.get_pixel(col, row).0;
        [luma; 3]
    }
}

impl ColorSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn color_at(&self, col: u32, row: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(col, row).0;
        [r, g, b]
    }
}
