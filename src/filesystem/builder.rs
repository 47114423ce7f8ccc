/// CP/M +3 filesystem write path

use crate::error::{DskError, Result};
use crate::filesystem::cpm::{block_sectors, DiskParameterBlock};
use crate::filesystem::{header, names, DirEntry};
use crate::format::constants::*;
use crate::image::DiskImage;
use std::collections::HashSet;

/// One host file destined for the disk image
#[derive(Debug, Clone)]
pub struct FileItem {
    /// Host file name; decides the 8.3 key and the +3DOS header fields
    pub name: String,
    /// Raw file body, without any +3DOS header
    pub data: Vec<u8>,
}

/// Hands out allocation blocks in strictly increasing order.
///
/// Blocks 0 and 1 hold the directory, so allocation starts at 2. There
/// is no reclamation; a build is append-only.
struct BlockAllocator {
    next: usize,
}

impl BlockAllocator {
    fn new() -> Self {
        Self { next: DIR_BLOCKS }
    }

    /// Reserve `count` consecutive blocks, all or nothing
    fn alloc(&mut self, count: usize) -> Result<Vec<u8>> {
        if self.next + count > TOTAL_BLOCKS {
            return Err(DskError::DiskFull);
        }
        let blocks = (self.next..self.next + count).map(|b| b as u8).collect();
        self.next += count;
        Ok(blocks)
    }
}

/// Build a +3/PCW-180K disk image from a set of host files.
///
/// Files are laid out in case-insensitive name order. A full disk
/// truncates the offending file and a full directory skips it, both
/// with a warning; the build itself keeps going. Files whose 8.3 key
/// cannot be made unique are refused with a warning.
pub fn build_disk(mut items: Vec<FileItem>) -> Result<DiskImage> {
    let mut image = DiskImage::new_plus3();
    write_boot_spec(&mut image);

    items.sort_by_key(|item| item.name.to_lowercase());

    // 2 KiB directory buffer, free slots are 0xE5
    let mut directory = [FILLER_BYTE; DIR_BLOCKS * BLOCK_SIZE];
    let mut dir_index = 0usize;
    let mut allocator = BlockAllocator::new();
    let mut used_keys: HashSet<String> = HashSet::new();

    for item in &items {
        let name83 = match names::unique_key(&used_keys, &item.name) {
            Ok(key) => key,
            Err(err) => {
                log::warn!("{}; skipping {}", err, item.name);
                continue;
            }
        };
        used_keys.insert(name83.clone());

        if dir_index >= DIR_ENTRIES {
            log::warn!("Directory full; skipping {}", item.name);
            continue;
        }

        let (file_type, param1, param2) = header::params_for(&item.name);
        let mut data = header::synthesize(&item.data, file_type, param1, param2).to_vec();
        data.extend_from_slice(&item.data);
        let total = data.len();

        if total == 0 {
            directory[dir_index * DIR_ENTRY_SIZE..(dir_index + 1) * DIR_ENTRY_SIZE]
                .copy_from_slice(&make_entry(&name83, 0, 0, &[]).encode());
            dir_index += 1;
            continue;
        }

        let mut pos = 0usize;
        let mut extent_no = 0usize;
        while pos < total {
            let bytes_this = (total - pos).min(EXTENT_SIZE);
            let need = (bytes_this + BLOCK_SIZE - 1) / BLOCK_SIZE;

            let blocks = match allocator.alloc(need) {
                Ok(blocks) => blocks,
                Err(_) => {
                    log::warn!("Disk full; truncating {}", item.name);
                    break;
                }
            };

            for (i, &block) in blocks.iter().enumerate() {
                let start = pos + i * BLOCK_SIZE;
                let end = (start + BLOCK_SIZE).min(total);
                write_block(&mut image, block as usize, &data[start..end])?;
            }

            if dir_index >= DIR_ENTRIES {
                log::warn!("Directory full; skipping {}", item.name);
                break;
            }
            let rc = ((bytes_this + RECORD_SIZE - 1) / RECORD_SIZE).min(EXTENT_SIZE / RECORD_SIZE) as u8;
            directory[dir_index * DIR_ENTRY_SIZE..(dir_index + 1) * DIR_ENTRY_SIZE]
                .copy_from_slice(&make_entry(&name83, extent_no, rc, &blocks).encode());
            dir_index += 1;

            pos += bytes_this;
            extent_no += 1;
        }
    }

    write_directory(&mut image, &directory)?;
    Ok(image)
}

/// Place the 16-byte +3 disk spec at the front of track 0, sector 1
fn write_boot_spec(image: &mut DiskImage) {
    let spec = DiskParameterBlock::plus3().encode();
    if let Some(track) = image.track_mut(0, 0) {
        if let Some(sector) = track.get_sector_mut(1) {
            sector.data_mut()[..spec.len()].copy_from_slice(&spec);
        }
    }
}

/// Form a directory entry for one extent
fn make_entry(name83: &str, extent_no: usize, rc: u8, blocks: &[u8]) -> DirEntry {
    let bytes = name83.as_bytes();
    let mut name = [b' '; 8];
    let mut ext = [b' '; 3];
    name.copy_from_slice(&bytes[..8]);
    ext.copy_from_slice(&bytes[8..11]);

    let mut slots = [0u8; 16];
    slots[..blocks.len()].copy_from_slice(blocks);

    DirEntry {
        user: 0,
        name,
        ext,
        extent_low: (extent_no & 0x1F) as u8,
        extent_high: ((extent_no >> 5) & 0x07) as u8,
        reserved: 0,
        record_count: rc,
        blocks: slots,
    }
}

/// Write up to 1024 bytes into the two sectors of an allocation block.
///
/// A short final chunk leaves the rest of the block at 0xE5.
fn write_block(image: &mut DiskImage, block: usize, data: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    for (track, record) in block_sectors(block)? {
        if offset >= data.len() {
            break;
        }
        let chunk = (data.len() - offset).min(PLUS3_SECTOR_SIZE);
        let sector = image
            .track_mut(track, 0)
            .and_then(|t| t.get_sector_mut(record))
            .ok_or(DskError::MissingAllocationSector {
                block,
                track,
                sector: record,
            })?;
        sector.data_mut()[..chunk].copy_from_slice(&data[offset..offset + chunk]);
        offset += chunk;
    }
    Ok(())
}

/// Copy the 2 KiB directory buffer onto track 1, sectors 1..4
fn write_directory(image: &mut DiskImage, directory: &[u8]) -> Result<()> {
    let dir_sectors = DIR_BLOCKS * SECTORS_PER_BLOCK;
    for s in 0..dir_sectors {
        let record = (s + 1) as u8;
        let sector = image
            .track_mut(PLUS3_RESERVED_TRACKS, 0)
            .and_then(|t| t.get_sector_mut(record))
            .ok_or_else(|| {
                DskError::MissingDirectory(format!("missing directory sector R{}", record))
            })?;
        sector
            .data_mut()
            .copy_from_slice(&directory[s * PLUS3_SECTOR_SIZE..(s + 1) * PLUS3_SECTOR_SIZE]);
    }
    Ok(())
}
