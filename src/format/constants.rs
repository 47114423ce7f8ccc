/// DSK container magic bytes, header offsets and the +3/PCW-180K profile

/// Standard DSK container signature
pub const STANDARD_DSK_SIGNATURE: &[u8] = b"MV - CPCEMU Disk-File\r\nDisk-Info\r\n";

/// Extended DSK container signature
pub const EXTENDED_DSK_SIGNATURE: &[u8] = b"EXTENDED CPC DSK File\r\nDisk-Info\r\n";

/// Track-Info block marker
pub const TRACK_INFO_MARKER: &[u8] = b"Track-Info\r\n";

/// Creator tag written into emitted disk headers (14-byte field)
pub const CREATOR_TAG: &[u8] = b"plus3dsk 0.1";

/// Size of the disk info block
pub const DISK_INFO_BLOCK_SIZE: usize = 256;

/// Size of the track info block
pub const TRACK_INFO_BLOCK_SIZE: usize = 256;

/// Size of one sector-info record in a track header
pub const SECTOR_INFO_SIZE: usize = 8;

/// Offset of the creator tag in the disk info block
pub const DISK_INFO_CREATOR_OFFSET: usize = 0x22;

/// Offset of the cylinder count in the disk info block
pub const DISK_INFO_CYLINDER_COUNT_OFFSET: usize = 0x30;

/// Offset of the side count in the disk info block
pub const DISK_INFO_SIDE_COUNT_OFFSET: usize = 0x31;

/// Offset of the 16-bit uniform track size (standard dialect)
pub const DISK_INFO_TRACK_SIZE_OFFSET: usize = 0x32;

/// Offset of the per-track size table (extended dialect, one byte x 256)
pub const DISK_INFO_TRACK_TABLE_OFFSET: usize = 0x34;

/// Offset of the cylinder number in a track info block
pub const TRACK_INFO_CYLINDER_OFFSET: usize = 0x10;

/// Offset of the side number in a track info block
pub const TRACK_INFO_SIDE_OFFSET: usize = 0x11;

/// Offset of the sector size code in a track info block
pub const TRACK_INFO_SIZE_CODE_OFFSET: usize = 0x14;

/// Offset of the sector count in a track info block
pub const TRACK_INFO_SECTOR_COUNT_OFFSET: usize = 0x15;

/// Offset of the GAP#3 length in a track info block
pub const TRACK_INFO_GAP_OFFSET: usize = 0x16;

/// Offset of the filler byte in a track info block
pub const TRACK_INFO_FILLER_OFFSET: usize = 0x17;

/// Offset of the first sector-info record in a track info block
pub const TRACK_INFO_SECTOR_LIST_OFFSET: usize = 0x18;

/// FDC sector sizes by size code N (payload is 128 << N)
const FDC_SECTOR_SIZES: [usize; 9] = [128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768];

/// Convert an FDC size code to a byte size; out-of-range codes fall back to 512
#[inline]
pub fn fdc_size_to_bytes(size_code: u8) -> usize {
    *FDC_SECTOR_SIZES.get(size_code as usize).unwrap_or(&512)
}

// The +3/PCW-180K profile. Every build-side value below is fixed by the
// format; readers accept anything the container declares.

/// Cylinders on a 180K single-sided disk
pub const PLUS3_CYLINDERS: u8 = 40;

/// Sides
pub const PLUS3_SIDES: u8 = 1;

/// Sectors per track, record IDs 1..9
pub const PLUS3_SECTORS_PER_TRACK: u8 = 9;

/// Sector payload size in bytes
pub const PLUS3_SECTOR_SIZE: usize = 512;

/// FDC size code for 512-byte sectors
pub const PLUS3_SECTOR_SIZE_CODE: u8 = 2;

/// On-image track size: 256-byte header + 9 x 512-byte sectors
pub const PLUS3_TRACK_BYTES: usize = 0x1300;

/// Reserved (boot) tracks before the data area
pub const PLUS3_RESERVED_TRACKS: u8 = 1;

/// Allocation block size in bytes
pub const BLOCK_SIZE: usize = 1024;

/// Sectors per allocation block
pub const SECTORS_PER_BLOCK: usize = BLOCK_SIZE / PLUS3_SECTOR_SIZE;

/// Allocation blocks occupied by the directory (blocks 0 and 1)
pub const DIR_BLOCKS: usize = 2;

/// Directory capacity in 32-byte entries
pub const DIR_ENTRIES: usize = DIR_BLOCKS * BLOCK_SIZE / DIR_ENTRY_SIZE;

/// Size of one CP/M directory entry
pub const DIR_ENTRY_SIZE: usize = 32;

/// CP/M record size; RC counts these
pub const RECORD_SIZE: usize = 128;

/// Largest slice of a file one directory entry can map
pub const EXTENT_SIZE: usize = 16384;

/// Allocation blocks in the data area, directory included.
/// 39 data tracks x 9 sectors / 2 sectors-per-block, half-block tail dropped.
pub const TOTAL_BLOCKS: usize = (PLUS3_CYLINDERS - PLUS3_RESERVED_TRACKS) as usize
    * PLUS3_SECTORS_PER_TRACK as usize
    / SECTORS_PER_BLOCK;

/// Read/write gap declared in the +3 disk spec
pub const PLUS3_RW_GAP: u8 = 0x2A;

/// Format gap declared in the +3 disk spec and track headers
pub const PLUS3_FORMAT_GAP: u8 = 0x52;

/// CP/M filler byte for formatted, unused space
pub const FILLER_BYTE: u8 = 0xE5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fdc_size_to_bytes() {
        assert_eq!(fdc_size_to_bytes(0), 128);
        assert_eq!(fdc_size_to_bytes(2), 512);
        assert_eq!(fdc_size_to_bytes(8), 32768);
        // Invalid codes fall back to the profile default
        assert_eq!(fdc_size_to_bytes(9), 512);
        assert_eq!(fdc_size_to_bytes(255), 512);
    }

    #[test]
    fn test_profile_arithmetic() {
        assert_eq!(
            PLUS3_TRACK_BYTES,
            TRACK_INFO_BLOCK_SIZE + PLUS3_SECTORS_PER_TRACK as usize * PLUS3_SECTOR_SIZE
        );
        assert_eq!(TOTAL_BLOCKS, 175);
        assert_eq!(DIR_ENTRIES, 64);
    }
}
