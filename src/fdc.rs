/// Floppy Disk Controller (FDC) status register definitions
///
/// The NEC uPD765 status bytes ST1/ST2 are stored verbatim in each EDSK
/// sector-info record. A freshly formatted +3 disk carries 0 in both.

use std::fmt;

/// FDC Status Register 1 (ST1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FdcStatus1(pub u8);

impl FdcStatus1 {
    /// End of Cylinder (EN) - Bit 7
    pub const EN: u8 = 0x80;
    /// Data Error (DE) - Bit 5, CRC error in ID or data field
    pub const DE: u8 = 0x20;
    /// Overrun (OR) - Bit 4
    pub const OR: u8 = 0x10;
    /// No Data (ND) - Bit 2, sector not found
    pub const ND: u8 = 0x04;
    /// Not Writable (NW) - Bit 1
    pub const NW: u8 = 0x02;
    /// Missing Address Mark (MA) - Bit 0
    pub const MA: u8 = 0x01;

    /// Names for the bits this register can carry, highest first
    const FLAGS: [(u8, &'static str); 6] = [
        (Self::EN, "EN"),
        (Self::DE, "DE"),
        (Self::OR, "OR"),
        (Self::ND, "ND"),
        (Self::NW, "NW"),
        (Self::MA, "MA"),
    ];

    /// Wrap a raw ST1 byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus1(value)
    }

    /// Check if any error flag is set
    #[inline]
    pub fn has_error(&self) -> bool {
        self.0 != 0
    }

    /// Check if the data-error (CRC) bit is set
    #[inline]
    pub fn data_error(&self) -> bool {
        (self.0 & Self::DE) != 0
    }
}

impl fmt::Display for FdcStatus1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_flags(f, self.0, &Self::FLAGS)
    }
}

/// FDC Status Register 2 (ST2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FdcStatus2(pub u8);

impl FdcStatus2 {
    /// Control Mark (CM) - Bit 6, deleted data address mark
    pub const CM: u8 = 0x40;
    /// Data Error in Data Field (DD) - Bit 5
    pub const DD: u8 = 0x20;
    /// Wrong Cylinder (WC) - Bit 4
    pub const WC: u8 = 0x10;
    /// Bad Cylinder (BC) - Bit 1
    pub const BC: u8 = 0x02;
    /// Missing Address Mark in Data Field (MD) - Bit 0
    pub const MD: u8 = 0x01;

    /// Names for the bits this register can carry, highest first
    const FLAGS: [(u8, &'static str); 5] = [
        (Self::CM, "CM"),
        (Self::DD, "DD"),
        (Self::WC, "WC"),
        (Self::BC, "BC"),
        (Self::MD, "MD"),
    ];

    /// Wrap a raw ST2 byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus2(value)
    }

    /// Check if the sector carries a deleted data address mark
    #[inline]
    pub fn is_deleted(&self) -> bool {
        (self.0 & Self::CM) != 0
    }

    /// Check if any error flag is set (a deleted mark is not an error)
    #[inline]
    pub fn has_error(&self) -> bool {
        (self.0 & !Self::CM) != 0
    }
}

impl fmt::Display for FdcStatus2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_flags(f, self.0, &Self::FLAGS)
    }
}

fn format_flags(f: &mut fmt::Formatter<'_>, value: u8, flags: &[(u8, &str)]) -> fmt::Result {
    if value == 0 {
        return write!(f, "OK");
    }
    let names: Vec<&str> = flags
        .iter()
        .filter(|(bit, _)| value & bit != 0)
        .map(|&(_, name)| name)
        .collect();
    write!(f, "{}", names.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_st1_errors() {
        let st1 = FdcStatus1::new(FdcStatus1::EN | FdcStatus1::DE);
        assert!(st1.has_error());
        assert!(st1.data_error());

        assert!(!FdcStatus1::default().has_error());
    }

    #[test]
    fn test_st2_deleted_is_not_error() {
        let st2 = FdcStatus2::new(FdcStatus2::CM);
        assert!(st2.is_deleted());
        assert!(!st2.has_error());

        let st2 = FdcStatus2::new(FdcStatus2::CM | FdcStatus2::DD);
        assert!(st2.has_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(FdcStatus1::new(0).to_string(), "OK");
        assert_eq!(
            FdcStatus1::new(FdcStatus1::EN | FdcStatus1::ND).to_string(),
            "EN|ND"
        );
        assert_eq!(
            FdcStatus2::new(FdcStatus2::CM | FdcStatus2::BC).to_string(),
            "CM|BC"
        );
    }
}
