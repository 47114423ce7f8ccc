/// Track data structures

use crate::image::sector::Sector;
use std::collections::HashMap;

/// A disk track: an ordered list of sectors plus an ID-indexed lookup.
///
/// Sector order is the on-media insertion order; the ID map is a
/// back-reference only. Record IDs need not be contiguous or sorted.
#[derive(Debug, Clone)]
pub struct Track {
    /// Physical cylinder number
    pub track_number: u8,
    /// Physical side number (0 or 1)
    pub side_number: u8,
    /// Sectors in insertion order
    sectors: Vec<Sector>,
    /// Map from record ID to index in the sector list
    sector_map: HashMap<u8, usize>,
}

impl Track {
    /// Create a new empty track
    pub fn new(track_number: u8, side_number: u8) -> Self {
        Self {
            track_number,
            side_number,
            sectors: Vec::new(),
            sector_map: HashMap::new(),
        }
    }

    /// Append a sector to this track
    pub fn add_sector(&mut self, sector: Sector) {
        let record_id = sector.id.sector;
        let index = self.sectors.len();
        self.sectors.push(sector);
        self.sector_map.insert(record_id, index);
    }

    /// Get all sectors in insertion order
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Get a sector by its record ID
    pub fn get_sector(&self, record_id: u8) -> Option<&Sector> {
        self.sector_map
            .get(&record_id)
            .and_then(|&idx| self.sectors.get(idx))
    }

    /// Get a mutable reference to a sector by its record ID
    pub fn get_sector_mut(&mut self, record_id: u8) -> Option<&mut Sector> {
        self.sector_map
            .get(&record_id)
            .and_then(|&idx| self.sectors.get_mut(idx))
    }

    /// Number of sectors on this track
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Check if this track has any sectors
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Check if this track contains a sector with the given record ID
    pub fn has_sector(&self, record_id: u8) -> bool {
        self.sector_map.contains_key(&record_id)
    }

    /// Total stored payload bytes across all sectors
    pub fn payload_size(&self) -> usize {
        self.sectors.iter().map(|s| s.actual_size()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::sector::SectorId;

    fn nine_sector_track() -> Track {
        let mut track = Track::new(0, 0);
        for r in 1..=9 {
            let id = SectorId::new(0, 0, r, 2);
            track.add_sector(Sector::filled(id, 0xE5));
        }
        track
    }

    #[test]
    fn test_new_track() {
        let track = Track::new(7, 0);
        assert_eq!(track.track_number, 7);
        assert!(track.is_empty());
        assert_eq!(track.sector_count(), 0);
    }

    #[test]
    fn test_lookup_by_id() {
        let track = nine_sector_track();
        assert_eq!(track.sector_count(), 9);
        assert!(track.has_sector(5));
        assert_eq!(track.get_sector(5).unwrap().id.sector, 5);
        assert!(track.get_sector(0xC1).is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut track = Track::new(0, 0);
        // Out-of-order record IDs stay in insertion order
        for r in [9, 1, 5] {
            track.add_sector(Sector::filled(SectorId::new(0, 0, r, 2), 0xE5));
        }
        let ids: Vec<u8> = track.sectors().iter().map(|s| s.id.sector).collect();
        assert_eq!(ids, vec![9, 1, 5]);
        assert_eq!(track.get_sector(1).unwrap().id.sector, 1);
    }

    #[test]
    fn test_payload_size() {
        let track = nine_sector_track();
        assert_eq!(track.payload_size(), 9 * 512);
    }

    #[test]
    fn test_get_sector_mut() {
        let mut track = nine_sector_track();
        track.get_sector_mut(3).unwrap().data_mut()[0] = 0xAA;
        assert_eq!(track.get_sector(3).unwrap().data()[0], 0xAA);
    }
}
