//! # Label Pipeline Tests
//!
//! End-to-end runs through the public API with file-backed collaborators:
//!
//! - **Asset labels**: id expression → inventory snapshot → ZPL batch →
//!   spooler (a shell command capturing stdin)
//! - **Box labels**: sheet export → SVG template → bitmap → QL raster job
//!
//! Fixtures live in `tests/fixtures/`; templates are the shipped ones.

use std::fs;
use std::path::PathBuf;

use labelprint::{
    Delivery, LabelError, TagCodec,
    inventory::JsonInventory,
    job::{AssetLabelSession, BoxLabelSession},
    label::LabelKind,
    protocol::ql::{RasterJob, RasterOptions, StatusFrame},
    render::RasterCompositor,
    sheet::{DEFAULT_BOX_URL_BASE, JsonSheet, SheetSource},
    template::TemplateDir,
    transport::{
        PollSettings, PrinterTransport, RasterSession, RawSpoolTransport, SessionState,
        StatusChannel,
    },
};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn templates() -> TemplateDir {
    TemplateDir::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"))
}

/// A spooler that appends every job to `capture`.
fn capturing_spooler(capture: &std::path::Path) -> RawSpoolTransport {
    let script = format!("cat >> {}", capture.display());
    RawSpoolTransport::new("Zebra_Technologies_ZTC_GK420d").with_command(["sh", "-c", script.as_str()])
}

// ============================================================================
// ASSET LABELS
// ============================================================================

#[test]
fn test_asset_labels_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("spool.zpl");

    let mut session = AssetLabelSession::new(
        TagCodec::new("EMF"),
        "https://inventory.example",
        Box::new(JsonInventory::load(&fixture("inventory.json")).unwrap()),
        Box::new(capturing_spooler(&capture)),
    );

    let ids = session.codec().parse_id_list("EMF00010,20").unwrap();
    let records = session.records(&ids, LabelKind::Box.wants_contents()).unwrap();
    let delivery = session.print(&records, LabelKind::Box, 1).unwrap();
    assert_eq!(delivery, Delivery::Submitted);

    let expected = concat!(
        "^XA\n",
        "^XFE:BOX.ZPL^FS\n",
        "^FN1^FDCrate 1^FS\n",
        "^FN2^FDEMF00010^FS\n",
        "^FN3^FDQA,https://inventory.example/hardware/10^FS\n",
        "^FN4^FD2 x Cisco WS-C2960\\&1 x APC Smart-UPS\\&Spare patch leads\\&Cable ties & velcro^FS\n",
        "^PQ1\n",
        "^XZ\n",
        "^XA\n",
        "^XFE:BOX.ZPL^FS\n",
        "^FN1^FDCore switch^FS\n",
        "^FN2^FDEMF00020^FS\n",
        "^FN3^FDQA,https://inventory.example/hardware/20^FS\n",
        "^FN4^FD^FS\n",
        "^PQ1\n",
        "^XZ\n",
    );
    assert_eq!(fs::read_to_string(&capture).unwrap(), expected);
}

#[test]
fn test_template_upload_precedes_labels() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("spool.zpl");

    let mut session = AssetLabelSession::new(
        TagCodec::new("EMF"),
        "https://inventory.example",
        Box::new(JsonInventory::load(&fixture("inventory.json")).unwrap()),
        Box::new(capturing_spooler(&capture)),
    );
    assert_eq!(session.initialise(&templates()).unwrap(), 2);

    let ids = session.codec().parse_id_list("EMF00011").unwrap();
    let records = session.records(&ids, false).unwrap();
    session.print(&records, LabelKind::Asset, 1).unwrap();

    let spooled = fs::read_to_string(&capture).unwrap();
    let asset_format = spooled.find("^DFE:ASSET.ZPL").unwrap();
    let box_format = spooled.find("^DFE:BOX.ZPL").unwrap();
    let label = spooled.find("^XFE:ASSET.ZPL").unwrap();
    assert!(asset_format < box_format && box_format < label);
}

#[test]
fn test_malformed_id_expression() {
    let codec = TagCodec::new("EMF");
    assert!(matches!(
        codec.parse_id_list("EMF00001,banana"),
        Err(LabelError::MalformedTag(_))
    ));
}

// ============================================================================
// BOX LABELS
// ============================================================================

#[test]
fn test_box_labels_from_sheet() {
    let rows = JsonSheet::load(&fixture("sheet.json"), DEFAULT_BOX_URL_BASE)
        .unwrap()
        .box_rows()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].qr_url, "https://s.emf.camp/i/1");

    let session = BoxLabelSession::new(
        templates().svg("box.svg").unwrap(),
        RasterCompositor::without_system_fonts(),
        RasterOptions::default(),
        Box::new(RawSpoolTransport::new("unused")),
    );

    for row in &rows {
        let bitmap = session.render(row).unwrap();
        assert_eq!(bitmap.height(), 696);

        let job = RasterJob::build(&bitmap, &RasterOptions::default()).unwrap();
        // Rotated: the label's width becomes its length on the tape
        assert_eq!(job.rows(), bitmap.width());
        // Every raster line is "g 00 5A" + 90 bytes
        let lines = job.as_bytes().windows(3).filter(|w| *w == [0x67, 0x00, 0x5A]).count();
        assert!(lines >= job.rows() as usize);
    }
}

// ============================================================================
// STATUS POLLING
// ============================================================================

/// A simulated printer that answers a write with a scripted frame sequence.
struct SimulatedPrinter {
    frames: Vec<[u8; 32]>,
}

impl StatusChannel for SimulatedPrinter {
    fn write_payload(&mut self, data: &[u8]) -> Result<(), labelprint::TransportError> {
        assert!(!data.is_empty());
        self.frames = vec![
            StatusFrame::encode(0x06, 0x01, [0, 0]),
            StatusFrame::encode(0x01, 0x01, [0, 0]),
            StatusFrame::encode(0x06, 0x00, [0, 0]),
        ];
        self.frames.reverse();
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, labelprint::TransportError> {
        Ok(self.frames.pop().map(|f| f.to_vec()))
    }
}

#[test]
fn test_raster_session_against_simulated_printer() {
    let bitmap = image::GrayImage::from_pixel(696, 100, image::Luma([255]));
    let job = RasterJob::build(
        &bitmap,
        &RasterOptions {
            rotation: labelprint::protocol::ql::Rotation::None,
            ..Default::default()
        },
    )
    .unwrap();

    let printer = SimulatedPrinter { frames: Vec::new() };
    let state = RasterSession::new(printer, PollSettings::default())
        .run(job.as_bytes())
        .unwrap();
    assert_eq!(state, SessionState::Completed);
}

#[test]
fn test_spooler_failure_surfaces() {
    let transport = RawSpoolTransport::new("Zebra_Technologies_ZTC_GK420d").with_command(["false"]);
    assert!(matches!(
        transport.send_raw(b"^XA^XZ"),
        Err(LabelError::Transport(_))
    ));
}
