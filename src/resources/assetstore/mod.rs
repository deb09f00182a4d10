//! Asset store resource.
//!
//! Owns every image-backed asset of a scene: static sprites, row animations cut
//! from sprite sheets, and tilemaps sliced into tiles. Assets are loaded from a
//! directory tree following the conventions in [`filename`], indexed by name in
//! an [`FxHashMap`], and kept in load order so index-based consumers (the tile
//! placement encoding, the debug viewer) see a deterministic layout.
//!
//! Lookups never fail hard: a missing name resolves to a zero value whose
//! texture is [`TextureId::NONE`] and whose frame list is empty.
//!
//! Texture data (decoded RGBA pixels plus the region of the source file they
//! came from) lives in a table owned by the store and addressed by
//! [`TextureId`]. The renderer uploads from that table; nothing else owns
//! pixels.

pub mod blank;
pub mod catalog;
pub mod error;
pub mod filename;
pub mod slicer;
pub mod tileref;

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use image::RgbaImage;
use log::{debug, info, warn};
use raylib::prelude::Rectangle;
use rustc_hash::FxHashMap;

pub use blank::BlankFrameRule;
pub use error::AssetError;
pub use filename::{AssetKind, SheetLayout};
pub use tileref::{TILE_SLOTS_PER_TILEMAP, TileRef};

/// Default duration of one animation frame in seconds.
pub const DEFAULT_FRAME_TIME: f32 = 0.1;
/// Default edge length of a sliced tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;
/// Reserved subfolder loaded by [`AssetStore::load_additional`] only.
pub const PATCH_DIR: &str = "new";

pub const MAX_SPRITES: usize = 1000;
pub const MAX_ANIMATIONS: usize = 1000;
pub const MAX_TILEMAPS: usize = 32;

/// Handle into the store's texture table. `0` means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    pub const NONE: TextureId = TextureId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// Pixels owned by the store for one texture handle.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// File the pixels were decoded from.
    pub source: PathBuf,
    /// Area of `source` covered by `image`.
    pub region: Rectangle,
    pub image: RgbaImage,
}

/// A single static image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
    pub draw_name: bool,
}

/// One row of a sprite sheet played as a looping frame sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: String,
    pub texture: TextureId,
    /// Source rectangles inside the sheet texture, in playback order.
    pub frames: Vec<Rectangle>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub rows: u32,
    pub frames_per_row: u32,
    /// Sheet row (0-based) this animation was cut from.
    pub row: u32,
    pub current_frame: usize,
    /// Seconds per frame.
    pub frame_time: f32,
    pub elapsed_time: f32,
    pub draw_name: bool,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Zero-value check: a missing animation has no frames and no texture.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() || self.texture.is_none()
    }

    /// Rectangle of the frame currently showing.
    pub fn current_rect(&self) -> Option<Rectangle> {
        self.frames.get(self.current_frame).copied()
    }

    /// Accumulate `dt` seconds and step at most one frame, wrapping at the end.
    pub fn advance(&mut self, dt: f32) {
        if self.frames.is_empty() {
            return;
        }
        let frame_time = if self.frame_time > 0.0 {
            self.frame_time
        } else {
            DEFAULT_FRAME_TIME
        };
        self.elapsed_time += dt;
        if self.elapsed_time >= frame_time {
            self.elapsed_time -= frame_time;
            self.current_frame = (self.current_frame + 1) % self.frames.len();
        }
    }

    pub fn restart(&mut self) {
        self.current_frame = 0;
        self.elapsed_time = 0.0;
    }
}

/// One addressable tile of a tilemap.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub texture: TextureId,
    pub region: Rectangle,
}

/// A source image sliced into a dense grid of tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tilemap {
    pub name: String,
    pub tile_size: u32,
    pub tile_count_x: u32,
    pub tile_count_y: u32,
    /// Row-major.
    pub tiles: Vec<Tile>,
}

impl Tilemap {
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }
}

/// Borrowed result of [`AssetStore::resolve`].
#[derive(Debug, Clone, Copy)]
pub enum AssetRef<'a> {
    Sprite(&'a Sprite),
    Animation(&'a Animation),
    Tilemap(&'a Tilemap),
    Missing,
}

impl AssetRef<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, AssetRef::Missing)
    }

    /// Texture handle; [`TextureId::NONE`] for tilemaps and misses.
    pub fn texture(&self) -> TextureId {
        match self {
            AssetRef::Sprite(s) => s.texture,
            AssetRef::Animation(a) => a.texture,
            AssetRef::Tilemap(_) | AssetRef::Missing => TextureId::NONE,
        }
    }

    /// Frames for animations, tiles for tilemaps, 1 for sprites, 0 on miss.
    pub fn frame_count(&self) -> usize {
        match self {
            AssetRef::Sprite(_) => 1,
            AssetRef::Animation(a) => a.frame_count(),
            AssetRef::Tilemap(t) => t.total_tiles(),
            AssetRef::Missing => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetSlot {
    Sprite(usize),
    Animation(usize),
    Tilemap(usize),
}

/// Upper bounds on how many assets of each kind the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub max_sprites: usize,
    pub max_animations: usize,
    pub max_tilemaps: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_sprites: MAX_SPRITES,
            max_animations: MAX_ANIMATIONS,
            max_tilemaps: MAX_TILEMAPS,
        }
    }
}

/// Counters describing one directory load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub sprites: usize,
    pub animations: usize,
    pub tilemaps: usize,
    /// Files dropped by a capacity limit or a duplicate name.
    pub rejected: usize,
    /// Files or directories that could not be read or decoded.
    pub failed: usize,
}

impl LoadReport {
    fn merge(&mut self, other: LoadReport) {
        self.sprites += other.sprites;
        self.animations += other.animations;
        self.tilemaps += other.tilemaps;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }
}

/// Registry of all loaded sprites, animations and tilemaps.
#[derive(Resource, Debug)]
pub struct AssetStore {
    sprites: Vec<Sprite>,
    animations: Vec<Animation>,
    tilemaps: Vec<Tilemap>,
    names: FxHashMap<String, AssetSlot>,
    textures: Vec<TextureData>,
    limits: StoreLimits,
    tile_size: u32,
    frame_time: f32,
    blank_rule: BlankFrameRule,
    trim_blank_frames: bool,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore {
    /// Create an empty store with default limits, 64 px tiles and 100 ms frames.
    pub fn new() -> Self {
        AssetStore {
            sprites: Vec::new(),
            animations: Vec::new(),
            tilemaps: Vec::new(),
            names: FxHashMap::default(),
            textures: Vec::new(),
            limits: StoreLimits::default(),
            tile_size: DEFAULT_TILE_SIZE,
            frame_time: DEFAULT_FRAME_TIME,
            blank_rule: BlankFrameRule::default(),
            trim_blank_frames: false,
        }
    }

    pub fn with_limits(mut self, limits: StoreLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_frame_time(mut self, frame_time: f32) -> Self {
        self.frame_time = frame_time;
        self
    }

    /// Enable trimming of trailing blank frames using `rule`.
    pub fn with_blank_frame_trimming(mut self, rule: BlankFrameRule, trim: bool) -> Self {
        self.blank_rule = rule;
        self.trim_blank_frames = trim;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    // ------------------------------------------------------------------
    // Directory loading
    // ------------------------------------------------------------------

    /// Load every asset under `root`, recursing into subdirectories in sorted
    /// order and skipping the top-level [`PATCH_DIR`].
    ///
    /// Per-file problems are logged and counted in the report. Only a missing
    /// or unreadable root is an error.
    pub fn load(&mut self, root: impl AsRef<Path>) -> Result<LoadReport, AssetError> {
        let root = root.as_ref();
        if !root.is_dir() {
            warn!("Asset directory {:?} not found", root);
            return Err(AssetError::RootMissing {
                path: root.to_path_buf(),
            });
        }
        let report = self.load_dir(root, Some(PATCH_DIR))?;
        info!(
            "Loaded assets from {:?}: {} sprites, {} animations, {} tilemaps ({} rejected, {} failed)",
            root, report.sprites, report.animations, report.tilemaps, report.rejected, report.failed
        );
        Ok(report)
    }

    /// Load the [`PATCH_DIR`] subfolder of `root` on top of what is already
    /// loaded. Existing indices are not disturbed. A missing patch folder is
    /// not an error.
    pub fn load_additional(&mut self, root: impl AsRef<Path>) -> Result<LoadReport, AssetError> {
        let patch = root.as_ref().join(PATCH_DIR);
        if !patch.is_dir() {
            debug!("No patch assets at {:?}", patch);
            return Ok(LoadReport::default());
        }
        let report = self.load_dir(&patch, None)?;
        info!(
            "Loaded patch assets from {:?}: {} sprites, {} animations, {} tilemaps ({} rejected, {} failed)",
            patch, report.sprites, report.animations, report.tilemaps, report.rejected, report.failed
        );
        Ok(report)
    }

    fn load_dir(&mut self, dir: &Path, skip: Option<&str>) -> Result<LoadReport, AssetError> {
        let mut report = LoadReport::default();
        for path in sorted_entries(dir)? {
            if path.is_dir() {
                let name = path.file_name().and_then(|n| n.to_str());
                if skip.is_some() && name == skip {
                    debug!("Skipping reserved folder {:?}", path);
                    continue;
                }
                match self.load_dir(&path, None) {
                    Ok(sub) => report.merge(sub),
                    Err(e) => {
                        warn!("{}", e);
                        report.failed += 1;
                    }
                }
            } else if path.is_file() {
                self.load_file(&path, &mut report);
            }
        }
        Ok(report)
    }

    fn load_file(&mut self, path: &Path, report: &mut LoadReport) {
        let Some(kind) = filename::classify(path) else {
            return;
        };
        debug!("Loading {:?} as {:?}", path, kind);
        let result = match kind {
            AssetKind::Tilemap => self
                .load_tilemap(path, self.tile_size)
                .map(|_| report.tilemaps += 1),
            AssetKind::Animation => self
                .load_animation_sheet(path)
                .map(|added| report.animations += added.len()),
            AssetKind::Sprite => self.load_sprite(path).map(|_| report.sprites += 1),
        };
        if let Err(e) = result {
            warn!("Skipping {:?}: {}", path, e);
            if e.is_rejection() {
                report.rejected += 1;
            } else {
                report.failed += 1;
            }
        }
    }

    // ------------------------------------------------------------------
    // Single-file loaders
    // ------------------------------------------------------------------

    /// Load one static sprite named after the file stem.
    pub fn load_sprite(&mut self, path: &Path) -> Result<usize, AssetError> {
        if self.sprites.len() >= self.limits.max_sprites {
            return Err(AssetError::CapacityExceeded {
                kind: "sprite",
                limit: self.limits.max_sprites,
            });
        }
        let name = stem_of(path)?;
        self.ensure_unique(&name)?;
        let image = decode(path)?;

        let (width, height) = image.dimensions();
        let region = Rectangle::new(0.0, 0.0, width as f32, height as f32);
        let texture = self.push_texture(path, region, image);
        let index = self.sprites.len();
        self.sprites.push(Sprite {
            name: name.clone(),
            texture,
            width,
            height,
            draw_name: true,
        });
        self.names.insert(name, AssetSlot::Sprite(index));
        Ok(index)
    }

    /// Load a sprite sheet and register one animation per row.
    ///
    /// All rows are validated before anything is registered, so a rejected
    /// sheet leaves the store unchanged. Returns the new animation indices.
    pub fn load_animation_sheet(&mut self, path: &Path) -> Result<Vec<usize>, AssetError> {
        let stem = stem_of(path)?;
        let (base, layout) =
            filename::parse_animation_stem(&stem).ok_or_else(|| AssetError::InvalidSheet {
                path: path.to_path_buf(),
                reason: "expected <name>_<rows>_<framesPerRow>_<frameWidth>_<frameHeight>"
                    .to_string(),
            })?;

        let image = decode(path)?;
        let (width, height) = image.dimensions();
        if !layout.fits(width, height) {
            return Err(AssetError::InvalidSheet {
                path: path.to_path_buf(),
                reason: format!(
                    "{}x{} frames of {}x{} do not fit a {}x{} image",
                    layout.frames_per_row,
                    layout.rows,
                    layout.frame_width,
                    layout.frame_height,
                    width,
                    height
                ),
            });
        }

        let mut rows: Vec<(String, u32, Vec<Rectangle>)> = Vec::with_capacity(layout.rows as usize);
        for row in 0..layout.rows {
            let mut frames = layout.row_frames(row);
            if self.trim_blank_frames {
                while frames
                    .last()
                    .is_some_and(|f| self.blank_rule.is_blank(&image, *f))
                {
                    frames.pop();
                }
                if frames.is_empty() {
                    debug!("Row {} of {:?} is blank, not registered", row + 1, path);
                    continue;
                }
            }
            let name = filename::row_animation_name(&base, row);
            self.ensure_unique(&name)?;
            rows.push((name, row, frames));
        }

        if self.animations.len() + rows.len() > self.limits.max_animations {
            return Err(AssetError::CapacityExceeded {
                kind: "animation",
                limit: self.limits.max_animations,
            });
        }

        let region = Rectangle::new(0.0, 0.0, width as f32, height as f32);
        let texture = self.push_texture(path, region, image);
        let mut added = Vec::with_capacity(rows.len());
        for (name, row, frames) in rows {
            let index = self.animations.len();
            self.animations.push(Animation {
                name: name.clone(),
                texture,
                frames,
                frame_width: layout.frame_width,
                frame_height: layout.frame_height,
                rows: layout.rows,
                frames_per_row: layout.frames_per_row,
                row,
                current_frame: 0,
                frame_time: self.frame_time,
                elapsed_time: 0.0,
                draw_name: true,
            });
            self.names.insert(name, AssetSlot::Animation(index));
            added.push(index);
        }
        Ok(added)
    }

    /// Slice an image into `tile_size` tiles and register it as a tilemap.
    ///
    /// Nothing is registered if the image cannot be decoded.
    pub fn load_tilemap(&mut self, path: &Path, tile_size: u32) -> Result<usize, AssetError> {
        if self.tilemaps.len() >= self.limits.max_tilemaps {
            return Err(AssetError::CapacityExceeded {
                kind: "tilemap",
                limit: self.limits.max_tilemaps,
            });
        }
        let name = stem_of(path)?;
        self.ensure_unique(&name)?;
        let image = decode(path)?;

        let grid = slicer::slice(&image, tile_size);
        if grid.total_tiles() >= TILE_SLOTS_PER_TILEMAP as usize {
            warn!(
                "Tilemap {:?} has {} tiles; only offsets below {} can be placed",
                path,
                grid.total_tiles(),
                TILE_SLOTS_PER_TILEMAP
            );
        }

        let mut tiles = Vec::with_capacity(grid.total_tiles());
        for sliced in grid.tiles {
            let texture = self.push_texture(path, sliced.region, sliced.image);
            tiles.push(Tile {
                texture,
                region: sliced.region,
            });
        }

        let index = self.tilemaps.len();
        info!(
            "Sliced {:?} into {}x{} tiles of {}px",
            path, grid.tile_count_x, grid.tile_count_y, tile_size
        );
        self.tilemaps.push(Tilemap {
            name: name.clone(),
            tile_size,
            tile_count_x: grid.tile_count_x,
            tile_count_y: grid.tile_count_y,
            tiles,
        });
        self.names.insert(name, AssetSlot::Tilemap(index));
        Ok(index)
    }

    fn ensure_unique(&self, name: &str) -> Result<(), AssetError> {
        if self.names.contains_key(name) {
            Err(AssetError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn push_texture(&mut self, source: &Path, region: Rectangle, image: RgbaImage) -> TextureId {
        self.textures.push(TextureData {
            source: source.to_path_buf(),
            region,
            image,
        });
        TextureId(self.textures.len() as u32)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Resolve any asset by name.
    pub fn resolve(&self, name: &str) -> AssetRef<'_> {
        match self.names.get(name) {
            Some(AssetSlot::Sprite(i)) => AssetRef::Sprite(&self.sprites[*i]),
            Some(AssetSlot::Animation(i)) => AssetRef::Animation(&self.animations[*i]),
            Some(AssetSlot::Tilemap(i)) => AssetRef::Tilemap(&self.tilemaps[*i]),
            None => AssetRef::Missing,
        }
    }

    /// Copy of the sprite `name`, or a zero-value sprite when absent.
    pub fn sprite(&self, name: &str) -> Sprite {
        match self.resolve(name) {
            AssetRef::Sprite(s) => s.clone(),
            _ => {
                warn!("Sprite '{}' not found", name);
                Sprite::default()
            }
        }
    }

    /// Copy of the animation `name`, or a zero-value animation when absent.
    pub fn animation(&self, name: &str) -> Animation {
        match self.resolve(name) {
            AssetRef::Animation(a) => a.clone(),
            _ => {
                warn!("Animation '{}' not found", name);
                Animation::default()
            }
        }
    }

    pub fn animation_ref(&self, name: &str) -> Option<&Animation> {
        match self.names.get(name) {
            Some(AssetSlot::Animation(i)) => self.animations.get(*i),
            _ => None,
        }
    }

    pub fn tilemap(&self, name: &str) -> Option<&Tilemap> {
        match self.names.get(name) {
            Some(AssetSlot::Tilemap(i)) => self.tilemaps.get(*i),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn sprite_at(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn animation_at(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    pub fn tilemap_at(&self, index: usize) -> Option<&Tilemap> {
        self.tilemaps.get(index)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn tilemaps(&self) -> &[Tilemap] {
        &self.tilemaps
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn tilemap_count(&self) -> usize {
        self.tilemaps.len()
    }

    /// Pixel data behind a texture handle.
    pub fn texture(&self, id: TextureId) -> Option<&TextureData> {
        if id.is_none() {
            return None;
        }
        self.textures.get(id.0 as usize - 1)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Check a frame of `animation` against the configured blank rule.
    pub fn is_frame_blank(&self, animation: &Animation, frame: usize) -> bool {
        match (self.texture(animation.texture), animation.frames.get(frame)) {
            (Some(tex), Some(rect)) => self.blank_rule.is_blank(&tex.image, *rect),
            _ => true,
        }
    }

    // ------------------------------------------------------------------
    // Playback and teardown
    // ------------------------------------------------------------------

    /// Advance every loaded animation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for animation in self.animations.iter_mut() {
            animation.advance(dt);
        }
    }

    /// Release every asset and texture. The store can be reloaded afterwards.
    pub fn unload(&mut self) {
        info!(
            "Unloading {} textures ({} sprites, {} animations, {} tilemaps)",
            self.textures.len(),
            self.sprites.len(),
            self.animations.len(),
            self.tilemaps.len()
        );
        self.sprites.clear();
        self.animations.clear();
        self.tilemaps.clear();
        self.names.clear();
        self.textures.clear();
    }
}

/// Entries of `dir` sorted by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let io_err = |source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        entries.push(entry.map_err(io_err)?.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn stem_of(path: &Path) -> Result<String, AssetError> {
    filename::file_stem(path)
        .map(str::to_string)
        .ok_or_else(|| AssetError::InvalidSheet {
            path: path.to_path_buf(),
            reason: "file name is not valid UTF-8".to_string(),
        })
}

fn decode(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([200, 100, 50, 255]))
            .save(&path)
            .expect("write png");
        path
    }

    #[test]
    fn load_walks_directories_in_name_order() {
        let temp = TempDir::new().expect("temp");
        let root = temp.path();
        for dir in ["b", "new", "x/new"] {
            fs::create_dir_all(root.join(dir)).expect("mkdir");
        }
        // created out of name order on purpose
        write_png(root, "zeta.png", 8, 8);
        write_png(root, "Ogre_1_2_8_8.png", 16, 8);
        write_png(root, "alpha.png", 8, 8);
        write_png(&root.join("b"), "mid.png", 8, 8);
        write_png(&root.join("new"), "patched.png", 8, 8);
        write_png(&root.join("x/new"), "nested.png", 8, 8);
        write_png(root, "Beast_1_1_8_8.png", 8, 8);

        let mut store = AssetStore::new();
        let report = store.load(root).expect("load");
        assert_eq!((report.sprites, report.animations), (4, 2));

        let sprites: Vec<&str> = (0..store.sprite_count())
            .filter_map(|i| store.sprite_at(i))
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(sprites, ["alpha", "mid", "nested", "zeta"]);
        let animations: Vec<&str> = (0..store.animation_count())
            .filter_map(|i| store.animation_at(i))
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(animations, ["Beast_1", "Ogre_1"]);
        assert!(!store.contains("patched"));

        store.load_additional(root).expect("patch");
        assert_eq!(store.sprite_at(4).map(|s| s.name.as_str()), Some("patched"));
        assert_eq!(store.sprite_at(0).map(|s| s.name.as_str()), Some("alpha"));
    }

    #[test]
    fn sprite_named_after_stem() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "mouse.png", 16, 8);
        let mut store = AssetStore::new();
        let index = store.load_sprite(&path).expect("load");
        assert_eq!(index, 0);
        let sprite = store.sprite("mouse");
        assert_eq!(sprite.width, 16);
        assert_eq!(sprite.height, 8);
        assert!(!sprite.texture.is_none());
        let tex = store.texture(sprite.texture).expect("texture");
        assert_eq!(tex.image.dimensions(), (16, 8));
    }

    #[test]
    fn sheet_rows_become_animations() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "Knight_2_4_32_32.png", 128, 64);
        let mut store = AssetStore::new();
        let added = store.load_animation_sheet(&path).expect("load");
        assert_eq!(added, vec![0, 1]);
        assert_eq!(store.animation_count(), 2);

        let first = store.animation("Knight_1");
        let second = store.animation("Knight_2");
        assert_eq!(first.frame_count(), 4);
        assert_eq!(first.frame_width, 32);
        assert_eq!(first.frame_height, 32);
        assert_eq!(first.texture, second.texture);
        let xs: Vec<f32> = first.frames.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 32.0, 64.0, 96.0]);
        assert!(first.frames.iter().all(|r| r.y == 0.0));
        assert!(second.frames.iter().all(|r| r.y == 32.0));
    }

    #[test]
    fn sheet_larger_than_image_is_rejected() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "Knight_3_4_32_32.png", 128, 64);
        let mut store = AssetStore::new();
        let err = store.load_animation_sheet(&path).unwrap_err();
        assert!(matches!(err, AssetError::InvalidSheet { .. }));
        assert_eq!(store.animation_count(), 0);
        assert_eq!(store.texture_count(), 0);
    }

    #[test]
    fn trailing_blank_frames_trimmed_when_enabled() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("Slime_1_4_8_8.png");
        let mut img = RgbaImage::from_pixel(32, 8, Rgba([0, 0, 0, 0]));
        for y in 0..8 {
            for x in 0..16 {
                img.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        img.save(&path).expect("write png");

        let mut store =
            AssetStore::new().with_blank_frame_trimming(BlankFrameRule::default(), true);
        store.load_animation_sheet(&path).expect("load");
        let anim = store.animation("Slime_1");
        assert_eq!(anim.frame_count(), 2);
        assert!(!store.is_frame_blank(&anim, 1));

        let mut untrimmed = AssetStore::new();
        untrimmed.load_animation_sheet(&path).expect("load");
        let anim = untrimmed.animation("Slime_1");
        assert_eq!(anim.frame_count(), 4);
        assert!(untrimmed.is_frame_blank(&anim, 3));
    }

    #[test]
    fn tilemap_gets_one_texture_per_tile() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "Tilemap_Flat.png", 130, 64);
        let mut store = AssetStore::new();
        let index = store.load_tilemap(&path, 64).expect("load");
        let tilemap = store.tilemap_at(index).expect("tilemap");
        assert_eq!(tilemap.tile_count_x, 2);
        assert_eq!(tilemap.tile_count_y, 1);
        assert_eq!(tilemap.total_tiles(), 2);
        assert_ne!(tilemap.tiles[0].texture, tilemap.tiles[1].texture);
        let tex = store.texture(tilemap.tiles[1].texture).expect("texture");
        assert_eq!(tex.region.x, 64.0);
        assert_eq!(tex.image.dimensions(), (64, 64));
    }

    #[test]
    fn undecodable_tilemap_registers_nothing() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("Tilemap_Broken.png");
        fs::write(&path, b"not a png").expect("write");
        let mut store = AssetStore::new();
        let err = store.load_tilemap(&path, 64).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
        assert_eq!(store.tilemap_count(), 0);
        assert_eq!(store.texture_count(), 0);
        assert!(store.resolve("Tilemap_Broken").is_missing());
    }

    #[test]
    fn sprite_limit_rejects_without_overwriting() {
        let temp = TempDir::new().expect("temp");
        let a = write_png(temp.path(), "a.png", 4, 4);
        let b = write_png(temp.path(), "b.png", 8, 8);
        let mut store = AssetStore::new().with_limits(StoreLimits {
            max_sprites: 1,
            ..StoreLimits::default()
        });
        store.load_sprite(&a).expect("first");
        let err = store.load_sprite(&b).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(store.sprite_count(), 1);
        assert_eq!(store.sprite("a").width, 4);
        assert!(store.resolve("b").is_missing());
    }

    #[test]
    fn animation_limit_is_checked_per_sheet() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "Knight_2_4_32_32.png", 128, 64);
        let mut store = AssetStore::new().with_limits(StoreLimits {
            max_animations: 1,
            ..StoreLimits::default()
        });
        let err = store.load_animation_sheet(&path).unwrap_err();
        assert!(matches!(err, AssetError::CapacityExceeded { .. }));
        assert_eq!(store.animation_count(), 0);
        assert_eq!(store.texture_count(), 0);
    }

    #[test]
    fn duplicate_name_keeps_first() {
        let temp = TempDir::new().expect("temp");
        let sub = temp.path().join("other");
        fs::create_dir(&sub).expect("mkdir");
        let first = write_png(temp.path(), "tree.png", 4, 4);
        let second = write_png(&sub, "tree.png", 9, 9);
        let mut store = AssetStore::new();
        store.load_sprite(&first).expect("first");
        let err = store.load_sprite(&second).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateName { .. }));
        assert_eq!(store.sprite("tree").width, 4);
    }

    #[test]
    fn lookup_miss_is_zero_value() {
        let store = AssetStore::new();
        let miss = store.resolve("doesNotExist");
        assert!(miss.is_missing());
        assert_eq!(miss.frame_count(), 0);
        assert_eq!(miss.texture(), TextureId::NONE);
        let anim = store.animation("doesNotExist");
        assert_eq!(anim.frame_count(), 0);
        assert!(anim.is_empty());
        assert_eq!(store.sprite("doesNotExist").texture.0, 0);
        assert!(store.texture(TextureId::NONE).is_none());
    }

    #[test]
    fn advance_steps_and_wraps() {
        let mut anim = Animation {
            frames: vec![Rectangle::new(0.0, 0.0, 1.0, 1.0); 3],
            texture: TextureId(1),
            frame_time: 0.1,
            ..Animation::default()
        };
        anim.advance(0.05);
        assert_eq!(anim.current_frame, 0);
        anim.advance(0.06);
        assert_eq!(anim.current_frame, 1);
        anim.advance(0.1);
        anim.advance(0.1);
        assert_eq!(anim.current_frame, 0);
        anim.restart();
        assert_eq!(anim.elapsed_time, 0.0);

        let mut empty = Animation::default();
        empty.advance(1.0);
        assert_eq!(empty.current_frame, 0);
    }

    #[test]
    fn unload_releases_everything() {
        let temp = TempDir::new().expect("temp");
        let path = write_png(temp.path(), "mouse.png", 4, 4);
        let mut store = AssetStore::new();
        store.load_sprite(&path).expect("load");
        store.unload();
        assert_eq!(store.texture_count(), 0);
        assert!(store.resolve("mouse").is_missing());
        store.load_sprite(&path).expect("reload");
        assert_eq!(store.sprite("mouse").texture, TextureId(1));
    }
}
