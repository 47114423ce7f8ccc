/// EDSK container emitter

use crate::error::{DskError, Result};
use crate::format::constants::*;
use crate::image::{DiskImage, Track};
use std::path::Path;

/// Serialise a DSK image to bytes.
///
/// Output is always the extended dialect: the disk header carries one
/// size byte per track and absent tracks contribute nothing to the
/// stream.
pub fn emit_dsk(image: &DiskImage) -> Result<Vec<u8>> {
    let total = image.cylinders() as usize * image.sides() as usize;
    if DISK_INFO_TRACK_TABLE_OFFSET + total > DISK_INFO_BLOCK_SIZE {
        return Err(DskError::geometry(format!(
            "track size table for {} tracks overruns the disk header",
            total
        )));
    }

    let mut out = Vec::with_capacity(DISK_INFO_BLOCK_SIZE + total * PLUS3_TRACK_BYTES);

    let mut header = [0u8; DISK_INFO_BLOCK_SIZE];
    header[..EXTENDED_DSK_SIGNATURE.len()].copy_from_slice(EXTENDED_DSK_SIGNATURE);
    let creator_len = CREATOR_TAG.len().min(14);
    header[DISK_INFO_CREATOR_OFFSET..DISK_INFO_CREATOR_OFFSET + creator_len]
        .copy_from_slice(&CREATOR_TAG[..creator_len]);
    header[DISK_INFO_CYLINDER_COUNT_OFFSET] = image.cylinders();
    header[DISK_INFO_SIDE_COUNT_OFFSET] = image.sides();

    for (index, track) in image.tracks().iter().enumerate() {
        let size = match track {
            Some(track) => track_byte_size(index, track)?,
            None => 0,
        };
        header[DISK_INFO_TRACK_TABLE_OFFSET + index] = (size / 256) as u8;
    }
    out.extend_from_slice(&header);

    for (index, track) in image.tracks().iter().enumerate() {
        if let Some(track) = track {
            write_track(&mut out, index, track)?;
        }
    }

    Ok(out)
}

/// Write a DSK image to a host file
pub fn write_dsk<P: AsRef<Path>>(image: &DiskImage, path: P) -> Result<()> {
    let bytes = emit_dsk(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// On-image size of one track, rounded up to the 256-byte unit
fn track_byte_size(index: usize, track: &Track) -> Result<usize> {
    let raw = TRACK_INFO_BLOCK_SIZE + track.payload_size();
    let size = (raw + 255) / 256 * 256;
    if size > 255 * 256 {
        return Err(DskError::OversizedTrack {
            track: index,
            declared: 255 * 256,
            actual: size,
        });
    }
    Ok(size)
}

/// Append one track: 256-byte header, then payloads in insertion order
fn write_track(out: &mut Vec<u8>, index: usize, track: &Track) -> Result<()> {
    let sector_count = track.sector_count();
    if TRACK_INFO_SECTOR_LIST_OFFSET + sector_count * SECTOR_INFO_SIZE > TRACK_INFO_BLOCK_SIZE {
        return Err(DskError::bad_track(
            index,
            format!("sector list of {} overruns the track header", sector_count),
        ));
    }

    let declared = track_byte_size(index, track)?;
    let start = out.len();

    let mut header = [0u8; TRACK_INFO_BLOCK_SIZE];
    header[..TRACK_INFO_MARKER.len()].copy_from_slice(TRACK_INFO_MARKER);
    header[TRACK_INFO_CYLINDER_OFFSET] = track.track_number;
    header[TRACK_INFO_SIDE_OFFSET] = track.side_number;
    header[TRACK_INFO_SIZE_CODE_OFFSET] = track
        .sectors()
        .first()
        .map(|s| s.id.size_code)
        .unwrap_or(PLUS3_SECTOR_SIZE_CODE);
    header[TRACK_INFO_SECTOR_COUNT_OFFSET] = sector_count as u8;
    header[TRACK_INFO_GAP_OFFSET] = PLUS3_FORMAT_GAP;
    header[TRACK_INFO_FILLER_OFFSET] = FILLER_BYTE;

    for (s, sector) in track.sectors().iter().enumerate() {
        let record = &mut header
            [TRACK_INFO_SECTOR_LIST_OFFSET + s * SECTOR_INFO_SIZE..][..SECTOR_INFO_SIZE];
        record[0] = sector.id.track;
        record[1] = sector.id.side;
        record[2] = sector.id.sector;
        record[3] = sector.id.size_code;
        record[4] = sector.status1.0;
        record[5] = sector.status2.0;
        record[6..8].copy_from_slice(&sector.data_length.to_le_bytes());
    }
    out.extend_from_slice(&header);

    for sector in track.sectors() {
        out.extend_from_slice(sector.data());
    }

    // Pad to the size declared in the disk header
    out.resize(start + declared, 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::parse_dsk;

    #[test]
    fn test_emit_plus3_image_size() {
        let image = DiskImage::new_plus3();
        let bytes = emit_dsk(&image).unwrap();
        assert_eq!(bytes.len(), 256 + 40 * 0x1300);
    }

    #[test]
    fn test_emit_header_fields() {
        let image = DiskImage::new_plus3();
        let bytes = emit_dsk(&image).unwrap();
        assert!(bytes.starts_with(EXTENDED_DSK_SIGNATURE));
        assert_eq!(bytes[DISK_INFO_CYLINDER_COUNT_OFFSET], 40);
        assert_eq!(bytes[DISK_INFO_SIDE_COUNT_OFFSET], 1);
        // Every track declares 0x1300 / 256 = 0x13 units
        for i in 0..40 {
            assert_eq!(bytes[DISK_INFO_TRACK_TABLE_OFFSET + i], 0x13);
        }
    }

    #[test]
    fn test_emit_track_headers() {
        let image = DiskImage::new_plus3();
        let bytes = emit_dsk(&image).unwrap();
        let track5 = &bytes[256 + 5 * 0x1300..];
        assert!(track5.starts_with(TRACK_INFO_MARKER));
        assert_eq!(track5[TRACK_INFO_CYLINDER_OFFSET], 5);
        assert_eq!(track5[TRACK_INFO_SIDE_OFFSET], 0);
        assert_eq!(track5[TRACK_INFO_SIZE_CODE_OFFSET], 2);
        assert_eq!(track5[TRACK_INFO_SECTOR_COUNT_OFFSET], 9);
        assert_eq!(track5[TRACK_INFO_GAP_OFFSET], 0x52);
        assert_eq!(track5[TRACK_INFO_FILLER_OFFSET], 0xE5);
        // Sector records run 1..9 with 512-byte declared lengths
        for s in 0..9 {
            let record = &track5[TRACK_INFO_SECTOR_LIST_OFFSET + s * 8..][..8];
            assert_eq!(record[2], s as u8 + 1);
            assert_eq!(record[3], 2);
            assert_eq!(u16::from_le_bytes([record[6], record[7]]), 512);
        }
    }

    #[test]
    fn test_emit_parse_round_trip() {
        let mut image = DiskImage::new_plus3();
        image
            .track_mut(3, 0)
            .unwrap()
            .get_sector_mut(7)
            .unwrap()
            .data_mut()
            .copy_from_slice(&[0x5A; 512]);

        let bytes = emit_dsk(&image).unwrap();
        let parsed = parse_dsk(&bytes).unwrap();
        let again = emit_dsk(&parsed).unwrap();
        assert_eq!(bytes, again);
        assert_eq!(parsed.sector(3, 7).unwrap().data(), &[0x5A; 512][..]);
    }
}
