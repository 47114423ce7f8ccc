/// CP/M +3 filesystem reading: disk parameter block, directory, extents

use crate::error::{DskError, Result};
use crate::filesystem::{DirEntry, FileEntry};
use crate::format::constants::*;
use crate::image::DiskImage;
use std::collections::BTreeMap;

/// The 16-byte +3/PCW disk specification stored at track 0, sector 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskParameterBlock {
    /// Format type (0 = Spectrum +3 / PCW single density)
    pub format: u8,
    /// Sidedness (0 = single, 1 = double alternating)
    pub sidedness: u8,
    /// Tracks per side
    pub tracks: u8,
    /// Sectors per track
    pub sectors: u8,
    /// Physical sector shift (2 = 512 bytes)
    pub sector_shift: u8,
    /// Reserved tracks before the data area
    pub reserved_tracks: u8,
    /// Block shift (3 = 1024-byte allocation blocks)
    pub block_shift: u8,
    /// Allocation blocks occupied by the directory
    pub dir_blocks: u8,
    /// Read/write gap length
    pub rw_gap: u8,
    /// Format gap length
    pub format_gap: u8,
}

impl DiskParameterBlock {
    /// The fixed +3/PCW-180K profile
    pub fn plus3() -> Self {
        Self {
            format: 0,
            sidedness: 0,
            tracks: PLUS3_CYLINDERS,
            sectors: PLUS3_SECTORS_PER_TRACK,
            sector_shift: PLUS3_SECTOR_SIZE_CODE,
            reserved_tracks: PLUS3_RESERVED_TRACKS,
            block_shift: 3,
            dir_blocks: DIR_BLOCKS as u8,
            rw_gap: PLUS3_RW_GAP,
            format_gap: PLUS3_FORMAT_GAP,
        }
    }

    /// Serialise to the 16-byte on-disk form (trailing bytes zero)
    pub fn encode(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0] = self.format;
        out[1] = self.sidedness;
        out[2] = self.tracks;
        out[3] = self.sectors;
        out[4] = self.sector_shift;
        out[5] = self.reserved_tracks;
        out[6] = self.block_shift;
        out[7] = self.dir_blocks;
        out[8] = self.rw_gap;
        out[9] = self.format_gap;
        out
    }

    /// Decode from at least 16 bytes of sector data
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < 16 {
            return None;
        }
        Some(Self {
            format: data[0],
            sidedness: data[1],
            tracks: data[2],
            sectors: data[3],
            sector_shift: data[4],
            reserved_tracks: data[5],
            block_shift: data[6],
            dir_blocks: data[7],
            rw_gap: data[8],
            format_gap: data[9],
        })
    }

    /// Whether these parameters describe the +3/PCW-180K layout.
    ///
    /// Matches the recognition used by the platform: format 0, single or
    /// double sided, at least 40x9 geometry, 512-byte sectors, 1 KiB
    /// blocks and a 2-block directory.
    pub fn is_plus3_layout(&self) -> bool {
        self.format == 0
            && self.sidedness <= 1
            && self.tracks >= PLUS3_CYLINDERS
            && self.sectors >= PLUS3_SECTORS_PER_TRACK
            && self.sector_shift == PLUS3_SECTOR_SIZE_CODE
            && self.block_shift == 3
            && self.dir_blocks == DIR_BLOCKS as u8
    }

    /// Allocation block size in bytes
    pub fn block_size(&self) -> usize {
        128 << self.block_shift
    }
}

/// Read the disk specification from track 0, sector 1, if present
pub fn boot_spec(image: &DiskImage) -> Option<DiskParameterBlock> {
    image
        .sector(0, 1)
        .and_then(|s| DiskParameterBlock::decode(s.data()))
}

/// Map an allocation block to its two sectors as (cylinder, record ID).
///
/// Blocks are absolute from the start of the data area at track 1,
/// sector 1, directory blocks included; record IDs wrap 9 -> 1 onto the
/// next cylinder.
pub fn block_sectors(block: usize) -> Result<[(u8, u8); SECTORS_PER_BLOCK]> {
    if block >= TOTAL_BLOCKS {
        return Err(DskError::BlockOutOfRange {
            block,
            total: TOTAL_BLOCKS,
        });
    }
    let spt = PLUS3_SECTORS_PER_TRACK as usize;
    let mut out = [(0u8, 0u8); SECTORS_PER_BLOCK];
    let mut abs = block * SECTORS_PER_BLOCK;
    for slot in out.iter_mut() {
        let track = PLUS3_RESERVED_TRACKS as usize + abs / spt;
        let record = 1 + abs % spt;
        *slot = (track as u8, record as u8);
        abs += 1;
    }
    Ok(out)
}

/// Read-only view of the CP/M +3 filesystem on a disk image
pub struct Plus3FileSystem<'a> {
    image: &'a DiskImage,
    entries: Vec<DirEntry>,
}

impl<'a> Plus3FileSystem<'a> {
    /// Mount the filesystem by reading the directory off track 1.
    ///
    /// A missing +3 disk spec at T0,S1 is only a warning; the directory
    /// is still read from the standard +3 location.
    pub fn open(image: &'a DiskImage) -> Result<Self> {
        if !boot_spec(image).is_some_and(|dpb| dpb.is_plus3_layout()) {
            log::warn!("{}; attempting anyway", DskError::NotPlus3Layout);
        }

        let entries = read_directory(image)?;
        Ok(Self { image, entries })
    }

    /// The raw directory entries, in directory order
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Aggregate directory entries into logical files.
    ///
    /// Entries group by (user, name, ext); extents sort by computed
    /// extent number. Files are returned in (user, name, ext) order.
    pub fn files(&self) -> Vec<FileEntry> {
        let mut groups: BTreeMap<(u8, String, String), Vec<DirEntry>> = BTreeMap::new();
        for entry in &self.entries {
            let key = (entry.user, entry.name_str(), entry.ext_str());
            groups.entry(key).or_default().push(entry.clone());
        }

        groups
            .into_iter()
            .map(|((user, name, ext), mut extents)| {
                extents.sort_by_key(|e| e.extent_number());
                FileEntry::new(user, name, ext, extents)
            })
            .collect()
    }

    /// Reassemble a file's bytes extent by extent.
    ///
    /// Zero block slots are skipped. Each extent's concatenation is cut
    /// to RC x 128 bytes. A block that cannot be read truncates that
    /// extent with a warning; the remaining extents still contribute.
    pub fn read_file(&self, file: &FileEntry) -> Vec<u8> {
        let mut assembled = Vec::with_capacity(file.size_from_rc);
        for extent in &file.extents {
            let mut bytes = Vec::with_capacity(BLOCK_SIZE * 2);
            for &block in &extent.blocks {
                if block == 0 {
                    continue;
                }
                match self.read_block(block as usize) {
                    Ok(chunk) => bytes.extend_from_slice(&chunk),
                    Err(err) => {
                        log::warn!(
                            "block read failed for {}.{}: {}",
                            file.name,
                            file.ext,
                            err
                        );
                        break;
                    }
                }
            }
            let want = (extent.record_count as usize * RECORD_SIZE).min(bytes.len());
            assembled.extend_from_slice(&bytes[..want]);
        }
        assembled
    }

    /// Fetch the 1024-byte payload of an allocation block
    pub fn read_block(&self, block: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(BLOCK_SIZE);
        for (track, record) in block_sectors(block)? {
            let sector = self
                .image
                .sector(track, record)
                .ok_or(DskError::MissingAllocationSector {
                    block,
                    track,
                    sector: record,
                })?;
            if sector.actual_size() != PLUS3_SECTOR_SIZE {
                return Err(DskError::ShortAllocationBlock {
                    block,
                    track,
                    sector: record,
                    len: sector.actual_size(),
                });
            }
            if sector.has_error() {
                log::debug!(
                    "block {}: sector T{} R{} flags FDC status {} {}",
                    block,
                    track,
                    record,
                    sector.status1,
                    sector.status2
                );
            }
            out.extend_from_slice(sector.data());
        }
        Ok(out)
    }
}

/// Read the 2 KiB directory from track 1, sectors 1..4
fn read_directory(image: &DiskImage) -> Result<Vec<DirEntry>> {
    let track = image
        .track(PLUS3_RESERVED_TRACKS, 0)
        .ok_or_else(|| DskError::MissingDirectory("no track 1".to_string()))?;

    let dir_sectors = (DIR_BLOCKS * SECTORS_PER_BLOCK) as u8;
    let mut buffer = Vec::with_capacity(DIR_BLOCKS * BLOCK_SIZE);
    for record in 1..=dir_sectors {
        let sector = track.get_sector(record).ok_or_else(|| {
            DskError::MissingDirectory(format!("missing directory sector R{}", record))
        })?;
        if sector.actual_size() != PLUS3_SECTOR_SIZE {
            return Err(DskError::ShortDirectorySector {
                sector: record,
                len: sector.actual_size(),
            });
        }
        buffer.extend_from_slice(sector.data());
    }

    Ok(buffer
        .chunks(DIR_ENTRY_SIZE)
        .filter_map(DirEntry::parse)
        .collect())
}
