//! Asset filename conventions.
//!
//! The asset tree encodes what an image is in its filename:
//!
//! - `<name>.<ext>` is a static sprite named `<name>`.
//! - `<name>_<rows>_<framesPerRow>_<frameWidth>_<frameHeight>.<ext>` is an
//!   animation sheet producing one animation per row, named `<name>_1` to
//!   `<name>_<rows>`.
//! - any file whose name contains `Tilemap` is sliced into a tile grid.

use std::path::Path;

use raylib::prelude::Rectangle;

/// Extensions (lowercase) the loader decodes.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp", "jpg", "jpeg"];

/// Substring that marks a file as a tilemap source.
pub const TILEMAP_MARKER: &str = "Tilemap";

/// What a file in the asset tree turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Tilemap,
    Animation,
    Sprite,
}

/// Grid geometry of an animation sheet, decoded from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub rows: u32,
    pub frames_per_row: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SheetLayout {
    /// Source rectangles of the frames of row `row`, left to right.
    pub fn row_frames(&self, row: u32) -> Vec<Rectangle> {
        (0..self.frames_per_row)
            .map(|x| {
                Rectangle::new(
                    (x * self.frame_width) as f32,
                    (row * self.frame_height) as f32,
                    self.frame_width as f32,
                    self.frame_height as f32,
                )
            })
            .collect()
    }

    /// Whether every frame of the sheet lies inside a `width` x `height` image.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        let needed_w = u64::from(self.frames_per_row) * u64::from(self.frame_width);
        let needed_h = u64::from(self.rows) * u64::from(self.frame_height);
        needed_w <= u64::from(width) && needed_h <= u64::from(height)
    }
}

/// Filename without directory and extension.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// True if the path has one of the [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Decide how a file is loaded. Returns `None` for non-image files.
pub fn classify(path: &Path) -> Option<AssetKind> {
    if !is_image(path) {
        return None;
    }
    let file_name = path.file_name()?.to_str()?;
    if file_name.contains(TILEMAP_MARKER) {
        return Some(AssetKind::Tilemap);
    }
    let stem = file_stem(path)?;
    if stem.contains('_') {
        Some(AssetKind::Animation)
    } else {
        Some(AssetKind::Sprite)
    }
}

/// Split an animation stem into its base name and sheet layout.
///
/// The last four `_` tokens are the numeric fields; everything before them is
/// the base name, so `Warrior_Red_6_6_192_192` has base `Warrior_Red`.
/// Returns `None` when a field is missing, not a number, or zero.
pub fn parse_animation_stem(stem: &str) -> Option<(String, SheetLayout)> {
    let mut parts = stem.rsplitn(5, '_');
    let frame_height = parse_field(parts.next()?)?;
    let frame_width = parse_field(parts.next()?)?;
    let frames_per_row = parse_field(parts.next()?)?;
    let rows = parse_field(parts.next()?)?;
    let base = parts.next()?;
    if base.is_empty() {
        return None;
    }
    Some((
        base.to_string(),
        SheetLayout {
            rows,
            frames_per_row,
            frame_width,
            frame_height,
        },
    ))
}

fn parse_field(token: &str) -> Option<u32> {
    token.parse::<u32>().ok().filter(|v| *v > 0)
}

/// Name of the animation built from row `row` (0-based) of a sheet.
pub fn row_animation_name(base: &str, row: u32) -> String {
    format!("{}_{}", base, row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classify_by_name() {
        assert_eq!(
            classify(&PathBuf::from("a/Tilemap_Flat.png")),
            Some(AssetKind::Tilemap)
        );
        assert_eq!(
            classify(&PathBuf::from("a/Knight_2_4_32_32.png")),
            Some(AssetKind::Animation)
        );
        assert_eq!(classify(&PathBuf::from("a/mouse.PNG")), Some(AssetKind::Sprite));
        assert_eq!(classify(&PathBuf::from("a/readme.txt")), None);
        assert_eq!(classify(&PathBuf::from("a/noext")), None);
    }

    #[test]
    fn parse_simple_stem() {
        let (base, layout) = parse_animation_stem("Knight_2_4_32_32").unwrap();
        assert_eq!(base, "Knight");
        assert_eq!(
            layout,
            SheetLayout {
                rows: 2,
                frames_per_row: 4,
                frame_width: 32,
                frame_height: 32
            }
        );
    }

    #[test]
    fn parse_keeps_underscores_in_base() {
        let (base, layout) = parse_animation_stem("Warrior_Red_6_6_192_192").unwrap();
        assert_eq!(base, "Warrior_Red");
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.frame_height, 192);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(parse_animation_stem("Knight_Idle").is_none());
        assert!(parse_animation_stem("Knight_2_4_32").is_none());
        assert!(parse_animation_stem("Knight_0_4_32_32").is_none());
        assert!(parse_animation_stem("_2_4_32_32").is_none());
        assert!(parse_animation_stem("Knight_2_4_x_32").is_none());
    }

    #[test]
    fn row_frames_offsets() {
        let layout = SheetLayout {
            rows: 2,
            frames_per_row: 4,
            frame_width: 32,
            frame_height: 32,
        };
        let xs: Vec<f32> = layout.row_frames(1).iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 32.0, 64.0, 96.0]);
        assert!(layout.row_frames(1).iter().all(|r| r.y == 32.0));
        assert!(layout.fits(128, 64));
        assert!(!layout.fits(127, 64));
        assert_eq!(row_animation_name("Knight", 0), "Knight_1");
    }
}
