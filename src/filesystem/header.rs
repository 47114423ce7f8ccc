/// +3DOS 128-byte file header codec

use serde::Serialize;

/// Signature at the front of every +3DOS header
pub const PLUS3DOS_SIGNATURE: &[u8] = b"PLUS3DOS";

/// Size of the header in bytes
pub const HEADER_SIZE: usize = 128;

/// File type byte for a BASIC program
pub const TYPE_PROGRAM: u8 = 0;

/// File type byte for code and screen files
pub const TYPE_CODE: u8 = 3;

/// Decoded +3DOS header fields, shaped for metadata output
#[derive(Debug, Clone, Serialize)]
pub struct Plus3Header {
    /// Always `PLUS3DOS`
    pub signature: String,
    /// Issue number (1 on files this crate writes)
    pub issue: u8,
    /// Version number (0 on files this crate writes)
    pub version: u8,
    /// Declared length of header plus body
    pub total_length: u32,
    /// +3 BASIC file type byte
    #[serde(rename = "type")]
    pub file_type: u8,
    /// Human name for the file type
    pub basic_type: String,
    /// Declared body length
    pub data_length: u16,
    /// First type-dependent parameter
    pub param1: u16,
    /// Second type-dependent parameter
    pub param2: u16,
    /// Stored checksum byte
    pub checksum: u8,
    /// Whether the stored checksum matches the first 127 bytes
    pub checksum_ok: bool,
    /// Load address, exposed for code/screen files (type 3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_address: Option<u16>,
}

/// Sum of the first 127 header bytes, modulo 256
pub fn checksum(header: &[u8]) -> u8 {
    header[..HEADER_SIZE - 1]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Build a 128-byte +3DOS header for the given body and parameters
pub fn synthesize(body: &[u8], file_type: u8, param1: u16, param2: u16) -> [u8; HEADER_SIZE] {
    let mut h = [0u8; HEADER_SIZE];
    h[..PLUS3DOS_SIGNATURE.len()].copy_from_slice(PLUS3DOS_SIGNATURE);
    h[8] = 0x1A;
    h[9] = 1; // issue
    h[10] = 0; // version
    h[11..15].copy_from_slice(&((body.len() + HEADER_SIZE) as u32).to_le_bytes());
    h[15] = file_type;
    h[16..18].copy_from_slice(&(body.len() as u16).to_le_bytes());
    h[18..20].copy_from_slice(&param1.to_le_bytes());
    h[20..22].copy_from_slice(&param2.to_le_bytes());
    h[127] = checksum(&h);
    h
}

/// Detect a +3DOS header at the front of `data`.
///
/// Returns the decoded header and the body slice, or `None` when no
/// header is present. A checksum mismatch does not reject the header;
/// it is reported through `checksum_ok`. The body is sliced by the
/// declared data length, clamped to the bytes actually available.
pub fn peel(data: &[u8]) -> Option<(Plus3Header, &[u8])> {
    if data.len() < HEADER_SIZE {
        return None;
    }
    let h = &data[..HEADER_SIZE];
    if !h.starts_with(PLUS3DOS_SIGNATURE) || h[8] != 0x1A {
        return None;
    }

    let total_length = u32::from_le_bytes([h[11], h[12], h[13], h[14]]);
    let file_type = h[15];
    let data_length = u16::from_le_bytes([h[16], h[17]]);
    let param1 = u16::from_le_bytes([h[18], h[19]]);
    let param2 = u16::from_le_bytes([h[20], h[21]]);

    let header = Plus3Header {
        signature: "PLUS3DOS".to_string(),
        issue: h[9],
        version: h[10],
        total_length,
        file_type,
        basic_type: basic_type_name(file_type).to_string(),
        data_length,
        param1,
        param2,
        checksum: h[127],
        checksum_ok: checksum(h) == h[127],
        load_address: (file_type == TYPE_CODE).then_some(param1),
    };

    // The declared length may overshoot the bytes we actually hold
    let body_len = (data_length as usize).min(data.len() - HEADER_SIZE);
    Some((header, &data[HEADER_SIZE..HEADER_SIZE + body_len]))
}

/// Name a +3 BASIC file type byte
pub fn basic_type_name(file_type: u8) -> &'static str {
    match file_type {
        0 => "program",
        1 => "numeric_array",
        2 => "char_array",
        3 => "code_or_screen",
        _ => "",
    }
}

/// Derive header type and parameters from a host file name.
///
/// The extension decides the type and default load parameters; a `@N`
/// suffix in the base name overrides param1 with N (0 < N < 65536).
pub fn params_for(name: &str) -> (u8, u16, u16) {
    let upper = name.to_uppercase();
    let ext = match upper.rfind('.') {
        Some(i) => &upper[i..],
        None => "",
    };

    let (file_type, mut param1, param2) = match ext {
        ".SCR" => (TYPE_CODE, 16384, 0),
        ".BAS" => (TYPE_PROGRAM, 0x8000, 0),
        ".BIN" | ".CODE" => (TYPE_CODE, 32768, 0),
        _ => (TYPE_CODE, 32768, 0),
    };

    if let Some(n) = at_suffix(name) {
        param1 = n;
    }
    (file_type, param1, param2)
}

/// Parse a `@N` load-address suffix out of a host file name
fn at_suffix(name: &str) -> Option<u16> {
    let at = name.rfind('@')?;
    let mut digits = &name[at + 1..];
    if let Some(dot) = digits.rfind('.') {
        digits = &digits[..dot];
    }
    match digits.parse::<u32>() {
        Ok(n) if n > 0 && n < 65536 => Some(n as u16),
        _ => None,
    }
}
