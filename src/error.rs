use thiserror::Error;

/// Result type alias for DSK operations
pub type Result<T> = std::result::Result<T, DskError>;

/// Errors that can occur when working with DSK images
#[derive(Debug, Error)]
pub enum DskError {
    /// I/O error occurred while reading or writing a host file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The disk header does not carry a known container signature
    #[error("not a DSK image (unknown container signature)")]
    UnknownContainer,

    /// The disk header declares an unusable geometry
    #[error("bad geometry: {0}")]
    BadGeometry(String),

    /// A track header or sector list could not be parsed
    #[error("bad track {track}: {reason}")]
    BadTrack {
        /// Flat track index (cylinder-major, side-minor)
        track: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The input ended before a declared structure was complete
    #[error("truncated input at offset {offset} ({needed} more bytes needed)")]
    TruncatedInput {
        /// Byte offset where reading stopped
        offset: usize,
        /// How many further bytes were required
        needed: usize,
    },

    /// A track's header plus sector payloads exceed its declared size
    #[error("track {track} overruns its declared size ({actual} > {declared})")]
    OversizedTrack {
        /// Flat track index
        track: usize,
        /// Size declared in the disk header
        declared: usize,
        /// Bytes actually required
        actual: usize,
    },

    /// Track 1 or one of its directory sectors is absent
    #[error("CP/M directory not found: {0}")]
    MissingDirectory(String),

    /// A directory sector is not the required 512 bytes
    #[error("directory sector R{sector} is {len} bytes (need 512)")]
    ShortDirectorySector {
        /// Sector record ID (1..4)
        sector: u8,
        /// Actual payload length
        len: usize,
    },

    /// A sector backing an allocation block is not the required 512 bytes
    #[error("allocation block {block}: sector T{track} R{sector} is {len} bytes (need 512)")]
    ShortAllocationBlock {
        /// Allocation block number
        block: usize,
        /// Cylinder holding the sector
        track: u8,
        /// Sector record ID
        sector: u8,
        /// Actual payload length
        len: usize,
    },

    /// A sector backing an allocation block does not exist on the image
    #[error("allocation block {block}: missing sector T{track} R{sector}")]
    MissingAllocationSector {
        /// Allocation block number
        block: usize,
        /// Cylinder the sector should be on
        track: u8,
        /// Sector record ID
        sector: u8,
    },

    /// An allocation block number points past the end of the data area
    #[error("allocation block {block} out of range (disk has {total})")]
    BlockOutOfRange {
        /// Offending block number
        block: usize,
        /// Total allocation blocks on this profile
        total: usize,
    },

    /// The image carries no +3/PCW disk specification at track 0, sector 1
    #[error("not a +3 (PCW-180K) layout: no +3 disk spec at T0,S1")]
    NotPlus3Layout,

    /// All 64 directory entries are in use
    #[error("directory full")]
    DirectoryFull,

    /// No free allocation blocks remain
    #[error("disk full: no free allocation blocks")]
    DiskFull,

    /// Digit substitution could not make an 8.3 name unique
    #[error("cannot make 8.3 name {key:?} unique")]
    NameCollision {
        /// The colliding 11-character key
        key: String,
    },
}

impl DskError {
    /// Create a bad-geometry error
    pub fn geometry<S: Into<String>>(message: S) -> Self {
        DskError::BadGeometry(message.into())
    }

    /// Create a bad-track error with context
    pub fn bad_track<S: Into<String>>(track: usize, reason: S) -> Self {
        DskError::BadTrack {
            track,
            reason: reason.into(),
        }
    }
}
