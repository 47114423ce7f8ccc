/// 8.3 name normalisation and collision resolution

use crate::error::{DskError, Result};
use std::collections::HashSet;

/// Characters allowed in a CP/M name besides letters and digits
const EXTRA_CHARS: &str = "-_$~!#%&()@^{}'";

/// Normalise a host file name to a fixed-width 11-character 8.3 key.
///
/// Uppercases, splits at the last dot, strips characters CP/M cannot
/// store, truncates to 8+3 and pads both parts with spaces. An empty
/// base becomes `NONAME`.
pub fn normalize_83(name: &str) -> String {
    let upper = name.to_uppercase();
    let (base, ext) = match upper.rfind('.') {
        Some(i) => (&upper[..i], &upper[i + 1..]),
        None => (upper.as_str(), ""),
    };

    let mut base = filter_part(base);
    let mut ext = filter_part(ext);
    if base.is_empty() {
        base = "NONAME".to_string();
    }
    base.truncate(8);
    ext.truncate(3);

    format!("{:<8}{:<3}", base, ext)
}

fn filter_part(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || EXTRA_CHARS.contains(*c))
        .collect()
}

/// Normalise `name` to a key unique within `used`.
///
/// On collision the 8th name character is replaced by a decimal digit,
/// walking 1..9 in sequence (digit 0 is never used). When no digit
/// yields an unused key the name is refused.
///
/// The returned key is not inserted into `used`; the caller decides.
pub fn unique_key(used: &HashSet<String>, name: &str) -> Result<String> {
    let key = normalize_83(name);
    if !used.contains(&key) {
        return Ok(key);
    }

    let mut bytes = key.clone().into_bytes();
    for attempt in 1u8..=10 {
        let digit = attempt % 10;
        if digit == 0 {
            continue;
        }
        bytes[7] = b'0' + digit;
        let candidate = String::from_utf8_lossy(&bytes).into_owned();
        if !used.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(DskError::NameCollision { key })
}
