//! Blank frame detection for sprite sheets.
//!
//! Sheets often leave the tail of a row empty. Two rules are available and
//! both thresholds come from configuration.

use image::RgbaImage;
use raylib::prelude::Rectangle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlankFrameRule {
    /// A pixel is transparent when `alpha <= alpha_threshold * 255`; the
    /// frame is blank when the transparent share reaches `max_ratio`.
    TransparentRatio { alpha_threshold: f32, max_ratio: f32 },
    /// The frame is blank when its mean alpha (0..1) is at most `threshold`.
    AverageAlpha { threshold: f32 },
}

impl Default for BlankFrameRule {
    fn default() -> Self {
        BlankFrameRule::TransparentRatio {
            alpha_threshold: 0.99,
            max_ratio: 0.9,
        }
    }
}

impl BlankFrameRule {
    /// Evaluate the rule over `frame` of `image`.
    ///
    /// The frame is clipped to the image; a frame with no pixels left is blank.
    pub fn is_blank(&self, image: &RgbaImage, frame: Rectangle) -> bool {
        let x0 = frame.x.max(0.0) as u32;
        let y0 = frame.y.max(0.0) as u32;
        let x1 = ((frame.x + frame.width).max(0.0) as u32).min(image.width());
        let y1 = ((frame.y + frame.height).max(0.0) as u32).min(image.height());
        if x0 >= x1 || y0 >= y1 {
            return true;
        }
        let total = u64::from(x1 - x0) * u64::from(y1 - y0);

        match *self {
            BlankFrameRule::TransparentRatio {
                alpha_threshold,
                max_ratio,
            } => {
                let limit = alpha_threshold * 255.0;
                let mut transparent = 0u64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        if f32::from(image.get_pixel(x, y)[3]) <= limit {
                            transparent += 1;
                        }
                    }
                }
                transparent as f32 / total as f32 >= max_ratio
            }
            BlankFrameRule::AverageAlpha { threshold } => {
                let mut sum = 0u64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        sum += u64::from(image.get_pixel(x, y)[3]);
                    }
                }
                (sum as f32 / total as f32) / 255.0 <= threshold
            }
        }
    }
}
