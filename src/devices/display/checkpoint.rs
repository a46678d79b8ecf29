//! Binary checkpoint format for the display.
//!
//! ## Layout
//!
//! All integers are little-endian.
//!
//! | Offset | Size | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 4    | Magic `"UKDS"`                         |
//! | 4      | 4    | Version (`u32`)                        |
//! | 8      | 1    | Mode flag: 1 = double-size, 0 = normal |
//! | 9      | 2    | Cursor (`u16`, < 2048)                 |
//! | 11     | 2048 | Display memory                         |
//!
//! A record is self-delimiting: restoring reads exactly `CHECKPOINT_SIZE`
//! bytes, so records from several devices can share one stream.

use std::io::{self, Read, Write};

use super::geometry::{Mode, DISPLAY_SIZE};
use super::DisplayError;

/// Current checkpoint format version.
///
/// Increment this when making breaking changes to the format.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Magic number at the start of every record ("UKDS").
pub const CHECKPOINT_MAGIC: [u8; 4] = [b'U', b'K', b'D', b'S'];

/// Size of the fixed header (magic + version + mode + cursor).
const HEADER_SIZE: usize = 4 + 4 + 1 + 2;

/// Total size of one record.
pub const CHECKPOINT_SIZE: usize = HEADER_SIZE + DISPLAY_SIZE;

/// Why a checkpoint could not be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointFault {
    /// Stream ended before a full record was read.
    Truncated,
    /// Record does not start with `CHECKPOINT_MAGIC`.
    BadMagic([u8; 4]),
    /// Record was written by an unknown format version.
    UnsupportedVersion(u32),
    /// Mode flag is neither 0 nor 1.
    InvalidMode(u8),
    /// Cursor points outside display memory.
    CursorOutOfRange(u16),
}

impl std::fmt::Display for CheckpointFault {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CheckpointFault::Truncated => write!(f, "checkpoint truncated"),
            CheckpointFault::BadMagic(magic) => {
                write!(f, "invalid checkpoint magic number {:02X?}", magic)
            }
            CheckpointFault::UnsupportedVersion(version) => write!(
                f,
                "incompatible checkpoint version: expected {}, got {}",
                CHECKPOINT_VERSION, version
            ),
            CheckpointFault::InvalidMode(flag) => {
                write!(f, "invalid display mode flag 0x{:02X}", flag)
            }
            CheckpointFault::CursorOutOfRange(cursor) => {
                write!(f, "cursor 0x{:04X} outside display memory", cursor)
            }
        }
    }
}

/// Complete display state, staged outside the device during restore.
pub(crate) struct Snapshot {
    pub(crate) mode: Mode,
    pub(crate) cursor: u16,
    pub(crate) buffer: Box<[u8; DISPLAY_SIZE]>,
}

impl Snapshot {
    /// Serialize the record to `stream`.
    pub(crate) fn write_to<W: Write + ?Sized>(&self, stream: &mut W) -> io::Result<()> {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&CHECKPOINT_MAGIC);
        header[4..8].copy_from_slice(&CHECKPOINT_VERSION.to_le_bytes());
        header[8] = self.mode.to_flag();
        header[9..11].copy_from_slice(&self.cursor.to_le_bytes());

        stream.write_all(&header)?;
        stream.write_all(&self.buffer[..])?;
        Ok(())
    }

    /// Read and validate one record from `stream`.
    pub(crate) fn read_from<R: Read + ?Sized>(stream: &mut R) -> Result<Self, DisplayError> {
        let mut header = [0u8; HEADER_SIZE];
        read_record(stream, &mut header)?;

        let magic = [header[0], header[1], header[2], header[3]];
        if magic != CHECKPOINT_MAGIC {
            return Err(DisplayError::CorruptCheckpoint(CheckpointFault::BadMagic(
                magic,
            )));
        }

        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if version != CHECKPOINT_VERSION {
            return Err(DisplayError::CorruptCheckpoint(
                CheckpointFault::UnsupportedVersion(version),
            ));
        }

        let mode = Mode::from_flag(header[8]).ok_or(DisplayError::CorruptCheckpoint(
            CheckpointFault::InvalidMode(header[8]),
        ))?;

        let cursor = u16::from_le_bytes([header[9], header[10]]);
        if cursor as usize >= DISPLAY_SIZE {
            return Err(DisplayError::CorruptCheckpoint(
                CheckpointFault::CursorOutOfRange(cursor),
            ));
        }

        let mut buffer = Box::new([0u8; DISPLAY_SIZE]);
        read_record(stream, &mut buffer[..])?;

        Ok(Self {
            mode,
            cursor,
            buffer,
        })
    }
}

/// `read_exact`, with running out of data reported as a corrupt record.
fn read_record<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8]) -> Result<(), DisplayError> {
    stream.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => DisplayError::CorruptCheckpoint(CheckpointFault::Truncated),
        _ => DisplayError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut buffer = Box::new([0x20u8; DISPLAY_SIZE]);
        buffer[0] = b'A';
        buffer[DISPLAY_SIZE - 1] = b'Z';
        Snapshot {
            mode: Mode::Normal,
            cursor: 0x07FF,
            buffer,
        }
    }

    fn encoded() -> Vec<u8> {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes
    }

    fn fault(bytes: &[u8]) -> CheckpointFault {
        match Snapshot::read_from(&mut &bytes[..]) {
            Err(DisplayError::CorruptCheckpoint(fault)) => fault,
            Err(other) => panic!("expected corrupt checkpoint, got {other}"),
            Ok(_) => panic!("expected corrupt checkpoint, got a snapshot"),
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = encoded();
        assert_eq!(bytes.len(), CHECKPOINT_SIZE);
        assert_eq!(&bytes[0..4], b"UKDS");
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(bytes[8], 0);
        assert_eq!(&bytes[9..11], &[0xFF, 0x07]);
        assert_eq!(bytes[11], b'A');
        assert_eq!(bytes[CHECKPOINT_SIZE - 1], b'Z');
    }

    #[test]
    fn test_read_back() {
        let bytes = encoded();
        let snapshot = Snapshot::read_from(&mut &bytes[..]).unwrap();
        assert_eq!(snapshot.mode, Mode::Normal);
        assert_eq!(snapshot.cursor, 0x07FF);
        assert_eq!(snapshot.buffer[..], sample().buffer[..]);
    }

    #[test]
    fn test_stops_at_end_of_record() {
        let mut bytes = encoded();
        bytes.extend_from_slice(b"next device");

        let mut stream = &bytes[..];
        Snapshot::read_from(&mut stream).unwrap();
        assert_eq!(stream, b"next device");
    }

    #[test]
    fn test_magic_validation() {
        let mut bytes = encoded();
        bytes[0] = b'X';
        assert_eq!(fault(&bytes), CheckpointFault::BadMagic(*b"XKDS"));
    }

    #[test]
    fn test_version_validation() {
        let mut bytes = encoded();
        bytes[4..8].copy_from_slice(&999u32.to_le_bytes());
        assert_eq!(fault(&bytes), CheckpointFault::UnsupportedVersion(999));
        assert!(fault(&bytes).to_string().contains("version"));
    }

    #[test]
    fn test_mode_and_cursor_validation() {
        let mut bytes = encoded();
        bytes[8] = 7;
        assert_eq!(fault(&bytes), CheckpointFault::InvalidMode(7));

        let mut bytes = encoded();
        bytes[9..11].copy_from_slice(&0x0800u16.to_le_bytes());
        assert_eq!(fault(&bytes), CheckpointFault::CursorOutOfRange(0x0800));
    }

    #[test]
    fn test_truncation() {
        let bytes = encoded();
        assert_eq!(fault(&[]), CheckpointFault::Truncated);
        assert_eq!(fault(&bytes[..HEADER_SIZE - 1]), CheckpointFault::Truncated);
        assert_eq!(fault(&bytes[..CHECKPOINT_SIZE - 1]), CheckpointFault::Truncated);
    }
}
