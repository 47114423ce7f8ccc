/// EDSK container parser

use crate::error::{DskError, Result};
use crate::fdc::{FdcStatus1, FdcStatus2};
use crate::format::constants::*;
use crate::format::{detect_format, DskFormat};
use crate::image::{DiskImage, Sector, SectorId, Track};
use std::path::Path;

/// Cursor over the raw image bytes; every underrun is a TruncatedInput
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.data.len() - self.pos;
        if remaining < len {
            return Err(DskError::TruncatedInput {
                offset: self.pos,
                needed: len - remaining,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }
}

/// Parse a DSK image held in memory
pub fn parse_dsk(data: &[u8]) -> Result<DiskImage> {
    let mut reader = ByteReader::new(data);
    let header = reader.take(DISK_INFO_BLOCK_SIZE)?;

    let format = detect_format(header).ok_or(DskError::UnknownContainer)?;

    let cylinders = header[DISK_INFO_CYLINDER_COUNT_OFFSET];
    let sides = header[DISK_INFO_SIDE_COUNT_OFFSET];
    if cylinders == 0 || sides == 0 {
        return Err(DskError::geometry(format!(
            "cylinders/sides {}/{}",
            cylinders, sides
        )));
    }

    let track_sizes = read_track_sizes(header, format, cylinders, sides)?;

    let mut tracks: Vec<Option<Track>> = vec![None; track_sizes.len()];
    for (index, &size) in track_sizes.iter().enumerate() {
        if size == 0 {
            // Absent track in the extended dialect
            continue;
        }
        tracks[index] = Some(read_track(&mut reader, index, size)?);
    }

    Ok(DiskImage {
        format,
        cylinders,
        sides,
        track_sizes,
        tracks,
    })
}

/// Read a DSK image from a host file
pub fn read_dsk<P: AsRef<Path>>(path: P) -> Result<DiskImage> {
    let data = std::fs::read(path)?;
    parse_dsk(&data)
}

/// Build the per-track size table from the disk header
fn read_track_sizes(
    header: &[u8],
    format: DskFormat,
    cylinders: u8,
    sides: u8,
) -> Result<Vec<usize>> {
    let total = cylinders as usize * sides as usize;
    match format {
        DskFormat::Extended => {
            if DISK_INFO_TRACK_TABLE_OFFSET + total > DISK_INFO_BLOCK_SIZE {
                return Err(DskError::geometry(format!(
                    "track size table for {} tracks overruns the disk header",
                    total
                )));
            }
            Ok(header[DISK_INFO_TRACK_TABLE_OFFSET..DISK_INFO_TRACK_TABLE_OFFSET + total]
                .iter()
                .map(|&b| b as usize * 256)
                .collect())
        }
        DskFormat::Standard => {
            let mut size = u16::from_le_bytes([
                header[DISK_INFO_TRACK_SIZE_OFFSET],
                header[DISK_INFO_TRACK_SIZE_OFFSET + 1],
            ]) as usize;
            if size == 0 {
                size = PLUS3_TRACK_BYTES;
            }
            Ok(vec![size; total])
        }
    }
}

/// Read one track: 256-byte header, sector payloads, then declared padding
fn read_track(reader: &mut ByteReader, index: usize, declared_size: usize) -> Result<Track> {
    let header = reader.take(TRACK_INFO_BLOCK_SIZE)?;
    if !header.starts_with(TRACK_INFO_MARKER) {
        return Err(DskError::bad_track(index, "missing Track-Info marker"));
    }

    let cylinder = header[TRACK_INFO_CYLINDER_OFFSET];
    let side = header[TRACK_INFO_SIDE_OFFSET];
    let sector_count = header[TRACK_INFO_SECTOR_COUNT_OFFSET] as usize;
    if sector_count == 0 {
        return Err(DskError::bad_track(index, "no sectors declared"));
    }
    if TRACK_INFO_SECTOR_LIST_OFFSET + sector_count * SECTOR_INFO_SIZE > TRACK_INFO_BLOCK_SIZE {
        return Err(DskError::bad_track(
            index,
            format!("sector list of {} overruns the track header", sector_count),
        ));
    }

    let mut track = Track::new(cylinder, side);
    let mut consumed = TRACK_INFO_BLOCK_SIZE;

    for s in 0..sector_count {
        let record = &header[TRACK_INFO_SECTOR_LIST_OFFSET + s * SECTOR_INFO_SIZE..];
        let id = SectorId::new(record[0], record[1], record[2], record[3]);
        let status1 = FdcStatus1::new(record[4]);
        let status2 = FdcStatus2::new(record[5]);
        let declared_len = u16::from_le_bytes([record[6], record[7]]) as usize;

        // A zero data length means the advertised size rules
        let payload_len = if declared_len > 0 {
            declared_len
        } else {
            fdc_size_to_bytes(id.size_code)
        };

        consumed += payload_len;
        if consumed > declared_size {
            return Err(DskError::OversizedTrack {
                track: index,
                declared: declared_size,
                actual: consumed,
            });
        }

        let payload = reader.take(payload_len)?.to_vec();
        track.add_sector(Sector::with_status(id, status1, status2, payload));
    }

    // Remainder up to the declared track size is padding
    reader.skip(declared_size - consumed)?;

    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writer::emit_dsk;

    #[test]
    fn test_parse_rejects_unknown_container() {
        let mut data = vec![0u8; 256];
        data[..5].copy_from_slice(b"JUNK!");
        assert!(matches!(parse_dsk(&data), Err(DskError::UnknownContainer)));
    }

    #[test]
    fn test_parse_rejects_short_input() {
        let result = parse_dsk(&[0u8; 64]);
        assert!(matches!(result, Err(DskError::TruncatedInput { .. })));
    }

    #[test]
    fn test_parse_rejects_zero_geometry() {
        let mut data = vec![0u8; 256];
        data[..EXTENDED_DSK_SIGNATURE.len()].copy_from_slice(EXTENDED_DSK_SIGNATURE);
        data[DISK_INFO_CYLINDER_COUNT_OFFSET] = 0;
        data[DISK_INFO_SIDE_COUNT_OFFSET] = 1;
        assert!(matches!(parse_dsk(&data), Err(DskError::BadGeometry(_))));
    }

    #[test]
    fn test_parse_skips_absent_tracks() {
        // Two-cylinder extended image where only cylinder 1 exists
        let mut data = vec![0u8; 256];
        data[..EXTENDED_DSK_SIGNATURE.len()].copy_from_slice(EXTENDED_DSK_SIGNATURE);
        data[DISK_INFO_CYLINDER_COUNT_OFFSET] = 2;
        data[DISK_INFO_SIDE_COUNT_OFFSET] = 1;
        data[DISK_INFO_TRACK_TABLE_OFFSET] = 0;
        data[DISK_INFO_TRACK_TABLE_OFFSET + 1] = ((256 + 512) / 256) as u8;

        let mut track = vec![0u8; 256];
        track[..TRACK_INFO_MARKER.len()].copy_from_slice(TRACK_INFO_MARKER);
        track[TRACK_INFO_CYLINDER_OFFSET] = 1;
        track[TRACK_INFO_SECTOR_COUNT_OFFSET] = 1;
        track[TRACK_INFO_SECTOR_LIST_OFFSET..TRACK_INFO_SECTOR_LIST_OFFSET + 8]
            .copy_from_slice(&[1, 0, 1, 2, 0, 0, 0x00, 0x02]);
        data.extend_from_slice(&track);
        data.extend_from_slice(&[0xAB; 512]);

        let image = parse_dsk(&data).unwrap();
        assert!(image.track(0, 0).is_none());
        let track = image.track(1, 0).unwrap();
        assert_eq!(track.sector_count(), 1);
        assert_eq!(track.get_sector(1).unwrap().data()[0], 0xAB);
    }

    #[test]
    fn test_parse_standard_dialect() {
        // One cylinder, one side, a 768-byte uniform track size at 0x32
        let mut data = vec![0u8; 256];
        data[..STANDARD_DSK_SIGNATURE.len()].copy_from_slice(STANDARD_DSK_SIGNATURE);
        data[DISK_INFO_CYLINDER_COUNT_OFFSET] = 1;
        data[DISK_INFO_SIDE_COUNT_OFFSET] = 1;
        data[DISK_INFO_TRACK_SIZE_OFFSET..DISK_INFO_TRACK_SIZE_OFFSET + 2]
            .copy_from_slice(&768u16.to_le_bytes());

        let mut track = vec![0u8; 256];
        track[..TRACK_INFO_MARKER.len()].copy_from_slice(TRACK_INFO_MARKER);
        track[TRACK_INFO_SECTOR_COUNT_OFFSET] = 1;
        track[TRACK_INFO_SECTOR_LIST_OFFSET..TRACK_INFO_SECTOR_LIST_OFFSET + 8]
            .copy_from_slice(&[0, 0, 1, 2, 0, 0, 0x00, 0x02]);
        data.extend_from_slice(&track);
        data.extend_from_slice(&[0xCD; 512]);

        let image = parse_dsk(&data).unwrap();
        assert_eq!(image.format(), DskFormat::Standard);
        assert_eq!(image.present_track_count(), 1);
        assert_eq!(image.sector(0, 1).unwrap().data()[0], 0xCD);
    }

    #[test]
    fn test_parse_bad_track_marker() {
        let image = DiskImage::new_plus3();
        let mut data = emit_dsk(&image).unwrap();
        // Corrupt the first track header
        data[256] = b'X';
        assert!(matches!(parse_dsk(&data), Err(DskError::BadTrack { track: 0, .. })));
    }

    #[test]
    fn test_parse_truncated_track() {
        let image = DiskImage::new_plus3();
        let mut data = emit_dsk(&image).unwrap();
        data.truncate(256 + 256 + 100);
        assert!(matches!(parse_dsk(&data), Err(DskError::TruncatedInput { .. })));
    }

    #[test]
    fn test_zero_data_length_uses_size_code() {
        let mut data = vec![0u8; 256];
        data[..EXTENDED_DSK_SIGNATURE.len()].copy_from_slice(EXTENDED_DSK_SIGNATURE);
        data[DISK_INFO_CYLINDER_COUNT_OFFSET] = 1;
        data[DISK_INFO_SIDE_COUNT_OFFSET] = 1;
        data[DISK_INFO_TRACK_TABLE_OFFSET] = ((256 + 512) / 256) as u8;

        let mut track = vec![0u8; 256];
        track[..TRACK_INFO_MARKER.len()].copy_from_slice(TRACK_INFO_MARKER);
        track[TRACK_INFO_SECTOR_COUNT_OFFSET] = 1;
        // N=2, data length 0 -> payload is 128 << 2 = 512
        track[TRACK_INFO_SECTOR_LIST_OFFSET..TRACK_INFO_SECTOR_LIST_OFFSET + 8]
            .copy_from_slice(&[0, 0, 1, 2, 0, 0, 0, 0]);
        data.extend_from_slice(&track);
        data.extend_from_slice(&[0x11; 512]);

        let image = parse_dsk(&data).unwrap();
        assert_eq!(image.sector(0, 1).unwrap().actual_size(), 512);
    }

    #[test]
    fn test_oversized_track_detected() {
        let mut data = vec![0u8; 256];
        data[..EXTENDED_DSK_SIGNATURE.len()].copy_from_slice(EXTENDED_DSK_SIGNATURE);
        data[DISK_INFO_CYLINDER_COUNT_OFFSET] = 1;
        data[DISK_INFO_SIDE_COUNT_OFFSET] = 1;
        // Declares one 256-byte unit: too small for header + 512-byte sector
        data[DISK_INFO_TRACK_TABLE_OFFSET] = 1;

        let mut track = vec![0u8; 256];
        track[..TRACK_INFO_MARKER.len()].copy_from_slice(TRACK_INFO_MARKER);
        track[TRACK_INFO_SECTOR_COUNT_OFFSET] = 1;
        track[TRACK_INFO_SECTOR_LIST_OFFSET..TRACK_INFO_SECTOR_LIST_OFFSET + 8]
            .copy_from_slice(&[0, 0, 1, 2, 0, 0, 0x00, 0x02]);
        data.extend_from_slice(&track);
        data.extend_from_slice(&[0; 512]);

        assert!(matches!(
            parse_dsk(&data),
            Err(DskError::OversizedTrack { track: 0, .. })
        ));
    }
}
