//! # Brother QL Status Frames
//!
//! The printer reports its state in fixed 32-byte frames, either in answer
//! to `ESC i S` or unsolicited while a job is printing.
//!
//! ## Frame Layout
//!
//! | Offset | Content |
//! |--------|---------|
//! | 0 | print head mark, `0x80` |
//! | 1 | frame size, `0x20` |
//! | 2 | Brother code, `'B'` |
//! | 3 | series code, `'4'` |
//! | 4 | model code |
//! | 8 | error information 1 |
//! | 9 | error information 2 |
//! | 10 | media width (mm) |
//! | 11 | media type |
//! | 17 | media length (mm) |
//! | 18 | status type |
//! | 19 | phase type |
//! | 22 | notification number |
//!
//! ## Typical Job
//!
//! ```text
//! host ── raster data ──► printer
//!      ◄── Phase change: Printing state
//!      ◄── Printing completed
//!      ◄── Phase change: Waiting to receive
//! ```

use std::fmt;

use thiserror::Error;

/// Size of one status frame in bytes
pub const FRAME_LEN: usize = 32;

/// Fixed header bytes: head mark, size, 'B', series '4'
pub const FRAME_HEADER: [u8; 4] = [0x80, 0x20, 0x42, 0x34];

/// Why a byte sequence is not a status frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusDecodeError {
    #[error("status frame too short: {0} bytes")]
    TooShort(usize),

    #[error("unexpected status frame header: {0:02x?}")]
    BadHeader([u8; 4]),
}

/// Error conditions reported in bytes 8 and 9
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterFault {
    NoMedia,
    EndOfMedia,
    CutterJam,
    PrinterInUse,
    PrinterTurnedOff,
    HighVoltageAdapter,
    FanFailure,
    ReplaceMedia,
    ExpansionBufferFull,
    CommunicationError,
    CommunicationBufferFull,
    CoverOpen,
    CancelKey,
    MediaCannotBeFed,
    SystemError,
}

/// (byte, bit mask, fault) for every defined error flag
const FAULT_BITS: [(usize, u8, PrinterFault); 15] = [
    (8, 0x01, PrinterFault::NoMedia),
    (8, 0x02, PrinterFault::EndOfMedia),
    (8, 0x04, PrinterFault::CutterJam),
    (8, 0x10, PrinterFault::PrinterInUse),
    (8, 0x20, PrinterFault::PrinterTurnedOff),
    (8, 0x40, PrinterFault::HighVoltageAdapter),
    (8, 0x80, PrinterFault::FanFailure),
    (9, 0x01, PrinterFault::ReplaceMedia),
    (9, 0x02, PrinterFault::ExpansionBufferFull),
    (9, 0x04, PrinterFault::CommunicationError),
    (9, 0x08, PrinterFault::CommunicationBufferFull),
    (9, 0x10, PrinterFault::CoverOpen),
    (9, 0x20, PrinterFault::CancelKey),
    (9, 0x40, PrinterFault::MediaCannotBeFed),
    (9, 0x80, PrinterFault::SystemError),
];

/// Byte 18
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    ReplyToStatusRequest,
    PrintingCompleted,
    ErrorOccurred,
    TurnedOff,
    Notification,
    PhaseChange,
    Unknown(u8),
}

impl From<u8> for StatusType {
    fn from(b: u8) -> Self {
        match b {
            0x00 => StatusType::ReplyToStatusRequest,
            0x01 => StatusType::PrintingCompleted,
            0x02 => StatusType::ErrorOccurred,
            0x04 => StatusType::TurnedOff,
            0x05 => StatusType::Notification,
            0x06 => StatusType::PhaseChange,
            other => StatusType::Unknown(other),
        }
    }
}

/// Byte 19
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseType {
    WaitingToReceive,
    Printing,
    Unknown(u8),
}

impl From<u8> for PhaseType {
    fn from(b: u8) -> Self {
        match b {
            0x00 => PhaseType::WaitingToReceive,
            0x01 => PhaseType::Printing,
            other => PhaseType::Unknown(other),
        }
    }
}

/// Byte 11
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    None,
    Continuous,
    DieCut,
    Unknown(u8),
}

impl From<u8> for MediaType {
    fn from(b: u8) -> Self {
        match b {
            0x00 => MediaType::None,
            0x0A | 0x4A => MediaType::Continuous,
            0x0B | 0x4B => MediaType::DieCut,
            other => MediaType::Unknown(other),
        }
    }
}

/// A decoded status frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFrame {
    pub model_code: u8,
    pub errors: Vec<PrinterFault>,
    pub media_width_mm: u8,
    pub media_type: MediaType,
    pub media_length_mm: u8,
    pub status_type: StatusType,
    pub phase_type: PhaseType,
}

/// What a status frame means for a running job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatusEvent {
    PrintingCompleted,
    PhaseChange { phase: PhaseType },
    Error { errors: Vec<PrinterFault> },
    Other(StatusType),
}

impl StatusFrame {
    /// Decode a raw frame. Extra trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, StatusDecodeError> {
        if data.len() < FRAME_LEN {
            return Err(StatusDecodeError::TooShort(data.len()));
        }

        let header = [data[0], data[1], data[2], data[3]];
        if header != FRAME_HEADER {
            return Err(StatusDecodeError::BadHeader(header));
        }

        let errors = FAULT_BITS
            .iter()
            .filter(|(byte, mask, _)| data[*byte] & mask != 0)
            .map(|(_, _, fault)| *fault)
            .collect();

        Ok(Self {
            model_code: data[4],
            errors,
            media_width_mm: data[10],
            media_type: MediaType::from(data[11]),
            media_length_mm: data[17],
            status_type: StatusType::from(data[18]),
            phase_type: PhaseType::from(data[19]),
        })
    }

    pub fn event(&self) -> DeviceStatusEvent {
        match self.status_type {
            StatusType::PrintingCompleted => DeviceStatusEvent::PrintingCompleted,
            StatusType::PhaseChange => DeviceStatusEvent::PhaseChange {
                phase: self.phase_type,
            },
            StatusType::ErrorOccurred => DeviceStatusEvent::Error {
                errors: self.errors.clone(),
            },
            other => DeviceStatusEvent::Other(other),
        }
    }

    /// Build the raw bytes of a frame. Used for tests and simulated devices.
    pub fn encode(
        status: u8,
        phase: u8,
        error_info: [u8; 2],
    ) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&FRAME_HEADER);
        frame[4] = 0x38; // QL-800
        frame[5] = 0x30;
        frame[8] = error_info[0];
        frame[9] = error_info[1];
        frame[10] = 62;
        frame[11] = 0x0A;
        frame[18] = status;
        frame[19] = phase;
        frame
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} / {:?}, media {}mm {:?}",
            self.status_type, self.phase_type, self.media_width_mm, self.media_type
        )?;
        if !self.errors.is_empty() {
            write!(f, ", errors {:?}", self.errors)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_printing_completed() {
        let frame = StatusFrame::decode(&StatusFrame::encode(0x01, 0x01, [0, 0])).unwrap();
        assert_eq!(frame.status_type, StatusType::PrintingCompleted);
        assert_eq!(frame.phase_type, PhaseType::Printing);
        assert_eq!(frame.media_width_mm, 62);
        assert_eq!(frame.media_type, MediaType::Continuous);
        assert!(frame.errors.is_empty());
        assert_eq!(frame.event(), DeviceStatusEvent::PrintingCompleted);
    }

    #[test]
    fn test_decode_phase_change() {
        let frame = StatusFrame::decode(&StatusFrame::encode(0x06, 0x00, [0, 0])).unwrap();
        assert_eq!(
            frame.event(),
            DeviceStatusEvent::PhaseChange {
                phase: PhaseType::WaitingToReceive
            }
        );
    }

    #[test]
    fn test_decode_error_flags() {
        let frame = StatusFrame::decode(&StatusFrame::encode(0x02, 0x00, [0x01, 0x10])).unwrap();
        assert_eq!(
            frame.errors,
            vec![PrinterFault::NoMedia, PrinterFault::CoverOpen]
        );
        assert_eq!(
            frame.event(),
            DeviceStatusEvent::Error {
                errors: vec![PrinterFault::NoMedia, PrinterFault::CoverOpen]
            }
        );
    }

    #[test]
    fn test_decode_other_status() {
        let frame = StatusFrame::decode(&StatusFrame::encode(0x00, 0x00, [0, 0])).unwrap();
        assert_eq!(
            frame.event(),
            DeviceStatusEvent::Other(StatusType::ReplyToStatusRequest)
        );
        let frame = StatusFrame::decode(&StatusFrame::encode(0x09, 0x07, [0, 0])).unwrap();
        assert_eq!(frame.status_type, StatusType::Unknown(0x09));
        assert_eq!(frame.phase_type, PhaseType::Unknown(0x07));
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(
            StatusFrame::decode(&[0x80, 0x20]),
            Err(StatusDecodeError::TooShort(2))
        );
        assert_eq!(StatusFrame::decode(&[]), Err(StatusDecodeError::TooShort(0)));
    }

    #[test]
    fn test_decode_bad_header() {
        let mut raw = StatusFrame::encode(0x01, 0x00, [0, 0]);
        raw[2] = b'X';
        assert!(matches!(
            StatusFrame::decode(&raw),
            Err(StatusDecodeError::BadHeader(_))
        ));
    }

    #[test]
    fn test_display_mentions_errors() {
        let frame = StatusFrame::decode(&StatusFrame::encode(0x02, 0x00, [0x04, 0])).unwrap();
        assert!(frame.to_string().contains("CutterJam"));
    }
}
