//! # Brother QL Raster Commands
//!
//! This module implements the raster command protocol used by Brother QL
//! label printers (QL-500 through QL-1100 series).
//!
//! ## Protocol Overview
//!
//! A print job is a stream of commands, most of them `ESC i` sequences,
//! followed by one raster line command per printed row:
//!
//! ```text
//! 00 × 200          invalidate (flush any partial command)
//! ESC @             initialize
//! ESC i a 01        switch to raster mode
//! ESC i S           request status
//! ESC i z ...       print information (media, raster line count)
//! ESC i M / A / K   cut settings
//! ESC i d n1 n2     feed margin
//! g 00 n data...    raster lines, one per row
//! 1A                print with feeding
//! ```
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding.
//!
//! ## Reference
//!
//! Based on "Brother QL Series Raster Command Reference" (QL-800 series).

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// `i` - Second byte of all printer-setting commands (`ESC i ...`)
pub const ESC_I: u8 = b'i';

/// Number of zero bytes sent to clear the printer's command parser
pub const INVALIDATE_LEN: usize = 200;

/// Convert a u16 to little-endian bytes
#[inline]
pub fn u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Invalidate (NULL × 200)
///
/// A run of zero bytes. If a previous job was aborted mid-command, the
/// printer discards the remainder and resynchronizes.
#[inline]
pub fn invalidate() -> Vec<u8> {
    vec![0x00; INVALIDATE_LEN]
}

/// # Initialize (ESC @)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use labelprint::protocol::ql::commands;
///
/// assert_eq!(commands::initialize(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn initialize() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Switch Dynamic Command Mode (ESC i a)
///
/// Selects raster mode (`01`). Models with a P-touch Template mode start in
/// that mode and ignore raster data until switched.
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | ESC i a 1   |
/// | Hex     | 1B 69 61 01 |
#[inline]
pub fn switch_to_raster() -> Vec<u8> {
    vec![ESC, ESC_I, b'a', 0x01]
}

/// # Status Information Request (ESC i S)
///
/// The printer answers with one 32-byte status frame
/// (see [`status`](super::status)).
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, ESC_I, b'S']
}

// ============================================================================
// PRINT INFORMATION
// ============================================================================

/// Media type byte used in `ESC i z`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MediaKind {
    /// Continuous length tape
    Continuous = 0x0A,
    /// Die-cut labels
    DieCut = 0x0B,
}

/// # Print Information Command (ESC i z)
///
/// | Byte | Meaning |
/// |------|---------|
/// | n1 | validity flags: `0x02` kind, `0x04` width, `0x08` length, `0x40` quality, `0x80` recovery |
/// | n2 | media type |
/// | n3 | media width (mm) |
/// | n4 | media length (mm, 0 for continuous) |
/// | n5..n8 | raster line count, u32 little-endian |
/// | n9 | page: 0 = starting page |
/// | n10 | fixed 0 |
///
/// ```
/// use labelprint::protocol::ql::commands::{media_and_quality, MediaKind};
///
/// let cmd = media_and_quality(MediaKind::Continuous, 62, 0, 1392, true);
/// assert_eq!(&cmd[..7], &[0x1B, 0x69, 0x7A, 0xCE, 0x0A, 62, 0]);
/// assert_eq!(&cmd[7..11], &1392u32.to_le_bytes());
/// ```
pub fn media_and_quality(
    kind: MediaKind,
    width_mm: u8,
    length_mm: u8,
    raster_lines: u32,
    high_quality: bool,
) -> Vec<u8> {
    let mut flags = 0x80 | 0x02 | 0x04 | 0x08;
    if high_quality {
        flags |= 0x40;
    }

    let mut cmd = vec![ESC, ESC_I, b'z', flags, kind as u8, width_mm, length_mm];
    cmd.extend(raster_lines.to_le_bytes());
    cmd.extend([0x00, 0x00]);
    cmd
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// # Various Mode Settings (ESC i M)
///
/// Bit 6 enables the automatic cutter.
#[inline]
pub fn autocut(enabled: bool) -> Vec<u8> {
    vec![ESC, ESC_I, b'M', if enabled { 0x40 } else { 0x00 }]
}

/// # Cut Every N Labels (ESC i A)
#[inline]
pub fn cut_every(labels: u8) -> Vec<u8> {
    vec![ESC, ESC_I, b'A', labels.max(1)]
}

/// # Expanded Mode (ESC i K)
///
/// | Bit | Meaning |
/// |-----|---------|
/// | 3 | cut at end |
/// | 6 | 600 dpi (high resolution) |
pub fn expanded_mode(cut_at_end: bool, high_res: bool) -> Vec<u8> {
    let mut flags = 0x00;
    if cut_at_end {
        flags |= 0x08;
    }
    if high_res {
        flags |= 0x40;
    }
    vec![ESC, ESC_I, b'K', flags]
}

/// # Specify Margin Amount (ESC i d)
///
/// Feed amount in dots before and after the printed area.
#[inline]
pub fn margins(dots: u16) -> Vec<u8> {
    let [lo, hi] = u16_le(dots);
    vec![ESC, ESC_I, b'd', lo, hi]
}

// ============================================================================
// RASTER DATA
// ============================================================================

/// # Raster Graphics Transfer (g 00 n d1...dn)
///
/// One row of pins, packed MSB first, 1 = black.
pub fn raster_line(row: &[u8]) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(row.len() + 3);
    cmd.extend([b'g', 0x00, row.len() as u8]);
    cmd.extend_from_slice(row);
    cmd
}

/// # Print Command with Feeding (1A)
///
/// Ends the last page of a job.
#[inline]
pub fn print_with_feed() -> Vec<u8> {
    vec![0x1A]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate() {
        let cmd = invalidate();
        assert_eq!(cmd.len(), 200);
        assert!(cmd.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_initialize() {
        assert_eq!(initialize(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_switch_to_raster() {
        assert_eq!(switch_to_raster(), vec![0x1B, 0x69, 0x61, 0x01]);
    }

    #[test]
    fn test_status_request() {
        assert_eq!(status_request(), vec![0x1B, 0x69, 0x53]);
    }

    #[test]
    fn test_media_and_quality_continuous() {
        let cmd = media_and_quality(MediaKind::Continuous, 62, 0, 0x0102_0304, true);
        assert_eq!(
            cmd,
            vec![0x1B, 0x69, 0x7A, 0xCE, 0x0A, 62, 0, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_media_and_quality_draft() {
        let cmd = media_and_quality(MediaKind::DieCut, 29, 90, 10, false);
        assert_eq!(cmd[3], 0x8E);
        assert_eq!(cmd[4], 0x0B);
    }

    #[test]
    fn test_cut_settings() {
        assert_eq!(autocut(true), vec![0x1B, 0x69, 0x4D, 0x40]);
        assert_eq!(autocut(false), vec![0x1B, 0x69, 0x4D, 0x00]);
        assert_eq!(cut_every(1), vec![0x1B, 0x69, 0x41, 0x01]);
        assert_eq!(cut_every(0), vec![0x1B, 0x69, 0x41, 0x01]);
        assert_eq!(expanded_mode(true, false), vec![0x1B, 0x69, 0x4B, 0x08]);
        assert_eq!(expanded_mode(true, true), vec![0x1B, 0x69, 0x4B, 0x48]);
    }

    #[test]
    fn test_margins() {
        assert_eq!(margins(35), vec![0x1B, 0x69, 0x64, 0x23, 0x00]);
        assert_eq!(margins(0x0123), vec![0x1B, 0x69, 0x64, 0x23, 0x01]);
    }

    #[test]
    fn test_raster_line() {
        let row = [0xFFu8; 90];
        let cmd = raster_line(&row);
        assert_eq!(&cmd[..3], &[0x67, 0x00, 90]);
        assert_eq!(cmd.len(), 93);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(u16_le(35), [0x23, 0x00]);
    }
}
