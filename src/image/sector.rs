/// Sector data structures

use crate::fdc::{FdcStatus1, FdcStatus2};
use crate::format::constants::fdc_size_to_bytes;

/// Sector ID (CHRN) - addressing information for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorId {
    /// C - Cylinder number
    pub track: u8,
    /// H - Head/Side number
    pub side: u8,
    /// R - Sector record ID
    pub sector: u8,
    /// N - Size code (2 = 512 bytes)
    pub size_code: u8,
}

impl SectorId {
    /// Create a new sector ID
    pub fn new(track: u8, side: u8, sector: u8, size_code: u8) -> Self {
        Self {
            track,
            side,
            sector,
            size_code,
        }
    }

    /// Get the advertised sector size in bytes from the size code
    pub fn size_bytes(&self) -> usize {
        fdc_size_to_bytes(self.size_code)
    }
}

/// A disk sector: CHRN addressing, FDC status and payload
#[derive(Debug, Clone)]
pub struct Sector {
    /// Sector addressing information (CHRN)
    pub id: SectorId,
    /// FDC Status Register 1
    pub status1: FdcStatus1,
    /// FDC Status Register 2
    pub status2: FdcStatus2,
    /// Stored payload length (may differ from the advertised size)
    pub data_length: u16,
    /// Sector payload
    data: Vec<u8>,
}

impl Sector {
    /// Create a sector filled with the given byte at its advertised size
    pub fn filled(id: SectorId, filler: u8) -> Self {
        let size = id.size_bytes();
        Self {
            id,
            status1: FdcStatus1::default(),
            status2: FdcStatus2::default(),
            data_length: size as u16,
            data: vec![filler; size],
        }
    }

    /// Create a sector with explicit FDC status and payload
    pub fn with_status(
        id: SectorId,
        status1: FdcStatus1,
        status2: FdcStatus2,
        data: Vec<u8>,
    ) -> Self {
        let data_length = data.len() as u16;
        Self {
            id,
            status1,
            status2,
            data_length,
            data,
        }
    }

    /// Get a reference to the payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the payload
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Stored payload length
    pub fn actual_size(&self) -> usize {
        self.data.len()
    }

    /// Size advertised by the size code
    pub fn advertised_size(&self) -> usize {
        self.id.size_bytes()
    }

    /// Check if either FDC status register flags an error
    pub fn has_error(&self) -> bool {
        self.status1.has_error() || self.status2.has_error()
    }
}
