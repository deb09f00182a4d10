//! Binary map file format.
//!
//! ```text
//! i32 version (= 1)
//! i32 width
//! i32 height
//! width * height times, row-major:
//!     i32 count
//!     count x i32 tile index
//!     count x u8 collidable (0 = false)
//! ```
//!
//! Every `i32` is big-endian.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::stack::{PlacedTile, TileStack};

pub const MAP_VERSION: i32 = 1;
/// Largest width or height accepted from a map file.
pub const MAX_MAP_DIMENSION: i32 = 4096;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported map version {found} (expected {MAP_VERSION})")]
    UnsupportedVersion { found: i32 },
    #[error("map data ends early at byte {offset}")]
    Truncated { offset: usize },
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("invalid entry count {count} in cell ({x}, {y})")]
    InvalidCount { x: usize, y: usize, count: i32 },
}

/// A fully parsed map, ready to replace the live grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub width: usize,
    pub height: usize,
    /// Row-major.
    pub cells: Vec<TileStack>,
}

/// Width and height as file header fields, if [`decode`] would accept them.
pub fn checked_dimensions(width: usize, height: usize) -> Result<(i32, i32), MapError> {
    let w = i32::try_from(width).unwrap_or(i32::MAX);
    let h = i32::try_from(height).unwrap_or(i32::MAX);
    if !(1..=MAX_MAP_DIMENSION).contains(&w) || !(1..=MAX_MAP_DIMENSION).contains(&h) {
        return Err(MapError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    Ok((w, h))
}

/// Serialise a grid. Fails for dimensions the loader would refuse.
pub fn encode(width: usize, height: usize, cells: &[TileStack]) -> Result<Vec<u8>, MapError> {
    let (w, h) = checked_dimensions(width, height)?;
    let entries: usize = cells.iter().map(TileStack::count).sum();
    let mut out = Vec::with_capacity(12 + cells.len() * 4 + entries * 5);
    out.extend_from_slice(&MAP_VERSION.to_be_bytes());
    out.extend_from_slice(&w.to_be_bytes());
    out.extend_from_slice(&h.to_be_bytes());
    for cell in cells {
        out.extend_from_slice(&(cell.count() as i32).to_be_bytes());
        for entry in cell.entries() {
            out.extend_from_slice(&entry.index.to_be_bytes());
        }
        for entry in cell.entries() {
            out.push(u8::from(entry.collidable));
        }
    }
    Ok(out)
}

/// Parse a complete map. Nothing is allocated for the grid until the header
/// has been validated.
pub fn decode(bytes: &[u8]) -> Result<MapData, MapError> {
    let mut reader = Reader { bytes, offset: 0 };

    let found = reader.i32()?;
    if found != MAP_VERSION {
        return Err(MapError::UnsupportedVersion { found });
    }
    let width = reader.i32()?;
    let height = reader.i32()?;
    if !(1..=MAX_MAP_DIMENSION).contains(&width) || !(1..=MAX_MAP_DIMENSION).contains(&height) {
        return Err(MapError::InvalidDimensions { width, height });
    }
    let (width, height) = (width as usize, height as usize);
    // Every cell carries at least its count field.
    if width * height * 4 > reader.remaining() {
        return Err(MapError::Truncated {
            offset: reader.bytes.len(),
        });
    }

    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let count = reader.i32()?;
            if count < 0 {
                return Err(MapError::InvalidCount { x, y, count });
            }
            let count = count as usize;
            if count.saturating_mul(5) > reader.remaining() {
                return Err(MapError::Truncated {
                    offset: reader.bytes.len(),
                });
            }
            let mut indices = Vec::with_capacity(count);
            for _ in 0..count {
                indices.push(reader.i32()?);
            }
            let mut entries = Vec::with_capacity(count);
            for index in indices {
                entries.push(PlacedTile::new(index, reader.u8()? != 0));
            }
            cells.push(TileStack::from_entries(entries));
        }
    }

    Ok(MapData {
        width,
        height,
        cells,
    })
}

/// Write `bytes` to `<path>.tmp` then rename it over `path`, so a failed
/// write never leaves a half-written map behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MapError> {
    let io_err = |source| MapError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp_path = temp_path_for(path);
    if let Err(e) = fs::write(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("map.bin");
    path.with_file_name(format!("{file_name}.tmp"))
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], MapError> {
        let end = self.offset + N;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(MapError::Truncated {
                offset: self.offset,
            })?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        self.offset = end;
        Ok(buf)
    }

    fn i32(&mut self) -> Result<i32, MapError> {
        self.take::<4>().map(i32::from_be_bytes)
    }

    fn u8(&mut self) -> Result<u8, MapError> {
        self.take::<1>().map(|[b]| b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: i32, width: i32, height: i32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&width.to_be_bytes());
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    #[test]
    fn big_endian_layout() {
        let mut cell = TileStack::default();
        cell.push(PlacedTile::new(0x0102_0304, true));
        cell.push(PlacedTile::new(7, false));
        let bytes = encode(1, 1, &[cell]).expect("encode");
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 1, // version
                0, 0, 0, 1, // width
                0, 0, 0, 1, // height
                0, 0, 0, 2, // count
                1, 2, 3, 4, // index 0
                0, 0, 0, 7, // index 1
                1, 0, // flags
            ]
        );
    }

    #[test]
    fn decode_reads_what_encode_wrote() {
        let mut a = TileStack::default();
        a.push(PlacedTile::new(1003, true));
        let b = TileStack::default();
        let bytes = encode(2, 1, &[a.clone(), b.clone()]).expect("encode");
        let map = decode(&bytes).expect("decode");
        assert_eq!((map.width, map.height), (2, 1));
        assert_eq!(map.cells, vec![a, b]);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(matches!(
            decode(&header(99, 1, 1)),
            Err(MapError::UnsupportedVersion { found: 99 })
        ));
        assert!(matches!(
            decode(&header(1, 0, 4)),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            decode(&header(1, MAX_MAP_DIMENSION + 1, 1)),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(decode(&[0, 0]), Err(MapError::Truncated { offset: 0 })));
    }

    #[test]
    fn encode_refuses_what_decode_would_reject() {
        let cells = vec![TileStack::default(); 5000];
        assert!(matches!(
            encode(5000, 1, &cells),
            Err(MapError::InvalidDimensions {
                width: 5000,
                height: 1
            })
        ));
        assert!(matches!(
            encode(0, 0, &[]),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            checked_dimensions(usize::MAX, 1),
            Err(MapError::InvalidDimensions {
                width: i32::MAX,
                ..
            })
        ));
        let edge = MAX_MAP_DIMENSION as usize;
        assert_eq!(
            checked_dimensions(edge, 1).ok(),
            Some((MAX_MAP_DIMENSION, 1))
        );
    }

    #[test]
    fn rejects_bad_cells() {
        let mut bytes = header(1, 1, 1);
        bytes.extend_from_slice(&(-3i32).to_be_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(MapError::InvalidCount { count: -3, .. })
        ));

        let mut bytes = header(1, 1, 1);
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.extend_from_slice(&5i32.to_be_bytes());
        assert!(matches!(decode(&bytes), Err(MapError::Truncated { .. })));

        let mut bytes = header(1, 2, 1);
        bytes.extend_from_slice(&0i32.to_be_bytes());
        assert!(matches!(decode(&bytes), Err(MapError::Truncated { .. })));
    }
}
