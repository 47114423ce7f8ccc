/// DSK image data structures

/// Sector definition and FDC status carriage
pub mod sector;
/// Track definition and sector lookup
pub mod track;

pub use sector::{Sector, SectorId};
pub use track::Track;

use crate::format::constants::*;
use crate::format::DskFormat;

/// An in-memory DSK image.
///
/// Tracks are stored in a flat table indexed cylinder-major, side-minor,
/// mirroring the container's track-size table. `None` marks a track the
/// extended dialect declares absent; absent tracks contribute no bytes
/// when the image is emitted.
#[derive(Debug, Clone)]
pub struct DiskImage {
    /// Container dialect this image was read as (or will be written as)
    pub(crate) format: DskFormat,
    /// Cylinder count from the disk header
    pub(crate) cylinders: u8,
    /// Side count from the disk header
    pub(crate) sides: u8,
    /// Declared per-track byte sizes, cylinder-major
    pub(crate) track_sizes: Vec<usize>,
    /// Track table, same indexing as `track_sizes`
    pub(crate) tracks: Vec<Option<Track>>,
}

impl DiskImage {
    /// Create a blank, formatted +3/PCW-180K image.
    ///
    /// Every sector exists with record IDs 1..9 and is filled with 0xE5.
    pub fn new_plus3() -> Self {
        let cylinders = PLUS3_CYLINDERS;
        let mut tracks = Vec::with_capacity(cylinders as usize);
        for cyl in 0..cylinders {
            let mut track = Track::new(cyl, 0);
            for record in 1..=PLUS3_SECTORS_PER_TRACK {
                let id = SectorId::new(cyl, 0, record, PLUS3_SECTOR_SIZE_CODE);
                track.add_sector(Sector::filled(id, FILLER_BYTE));
            }
            tracks.push(Some(track));
        }
        Self {
            format: DskFormat::Extended,
            cylinders,
            sides: PLUS3_SIDES,
            track_sizes: vec![PLUS3_TRACK_BYTES; cylinders as usize],
            tracks,
        }
    }

    /// Container dialect
    pub fn format(&self) -> DskFormat {
        self.format
    }

    /// Cylinder count
    pub fn cylinders(&self) -> u8 {
        self.cylinders
    }

    /// Side count
    pub fn sides(&self) -> u8 {
        self.sides
    }

    /// Declared per-track byte sizes (0 = absent), cylinder-major
    pub fn track_sizes(&self) -> &[usize] {
        &self.track_sizes
    }

    /// The flat track table, cylinder-major, side-minor
    pub fn tracks(&self) -> &[Option<Track>] {
        &self.tracks
    }

    /// Flat index of a cylinder/side pair, if within the declared geometry
    fn track_index(&self, cylinder: u8, side: u8) -> Option<usize> {
        if cylinder >= self.cylinders || side >= self.sides {
            return None;
        }
        Some(cylinder as usize * self.sides as usize + side as usize)
    }

    /// Get a track by cylinder and side; `None` for absent tracks
    pub fn track(&self, cylinder: u8, side: u8) -> Option<&Track> {
        self.track_index(cylinder, side)
            .and_then(|idx| self.tracks.get(idx))
            .and_then(|t| t.as_ref())
    }

    /// Get a mutable track by cylinder and side
    pub fn track_mut(&mut self, cylinder: u8, side: u8) -> Option<&mut Track> {
        let idx = self.track_index(cylinder, side)?;
        self.tracks.get_mut(idx).and_then(|t| t.as_mut())
    }

    /// Get a sector on side 0 by cylinder and record ID
    pub fn sector(&self, cylinder: u8, record_id: u8) -> Option<&Sector> {
        self.track(cylinder, 0)
            .and_then(|t| t.get_sector(record_id))
    }

    /// Number of tracks actually present
    pub fn present_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plus3_geometry() {
        let image = DiskImage::new_plus3();
        assert_eq!(image.format(), DskFormat::Extended);
        assert_eq!(image.cylinders(), 40);
        assert_eq!(image.sides(), 1);
        assert_eq!(image.present_track_count(), 40);
        assert!(image.track_sizes().iter().all(|&s| s == 0x1300));
    }

    #[test]
    fn test_new_plus3_sectors_blank() {
        let image = DiskImage::new_plus3();
        for cyl in 0..40 {
            let track = image.track(cyl, 0).unwrap();
            assert_eq!(track.sector_count(), 9);
            for record in 1..=9 {
                let sector = track.get_sector(record).unwrap();
                assert_eq!(sector.actual_size(), 512);
                assert!(sector.data().iter().all(|&b| b == 0xE5));
            }
        }
    }

    #[test]
    fn test_track_bounds() {
        let image = DiskImage::new_plus3();
        assert!(image.track(39, 0).is_some());
        assert!(image.track(40, 0).is_none());
        assert!(image.track(0, 1).is_none());
    }

    #[test]
    fn test_sector_accessor() {
        let mut image = DiskImage::new_plus3();
        image.track_mut(2, 0).unwrap().get_sector_mut(4).unwrap().data_mut()[0] = 0x55;
        assert_eq!(image.sector(2, 4).unwrap().data()[0], 0x55);
        assert!(image.sector(2, 10).is_none());
    }
}
