//! # Print Workflows
//!
//! The two ways labels get printed:
//!
//! | Session | Source | Printer | Pipeline |
//! |---------|--------|---------|----------|
//! | [`AssetLabelSession`] | inventory | Zebra | fields → ZPL batch → spooler |
//! | [`BoxLabelSession`] | storage sheet | Brother QL | fields → SVG → bitmap → raster → USB |
//!
//! A session lives for one interactive run. Everything it caches (the full
//! asset list, model descriptions, the SVG template and fonts) is dropped
//! with it.

use image::GrayImage;
use tracing::{debug, info, warn};

use crate::error::LabelError;
use crate::inventory::{AssetRecord, Inventory, RecordCache};
use crate::label::{BoxLabel, LabelKind, PrintJob, TruncationPolicy, asset_fields};
use crate::protocol::ql::{RasterJob, RasterOptions};
use crate::protocol::zpl;
use crate::render::{RasterCompositor, SvgTemplate, svg_from_template};
use crate::sheet::BoxRow;
use crate::tag::{IdList, TagCodec};
use crate::template::TemplateDir;
use crate::transport::{Delivery, PrinterTransport};

// ============================================================================
// ASSET LABELS (ZPL)
// ============================================================================

pub struct AssetLabelSession {
    codec: TagCodec,
    inventory_url: String,
    inventory: Box<dyn Inventory>,
    cache: RecordCache,
    transport: Box<dyn PrinterTransport>,
}

impl AssetLabelSession {
    pub fn new(
        codec: TagCodec,
        inventory_url: impl Into<String>,
        inventory: Box<dyn Inventory>,
        transport: Box<dyn PrinterTransport>,
    ) -> Self {
        Self {
            codec,
            inventory_url: inventory_url.into(),
            inventory,
            cache: RecordCache::new(),
            transport,
        }
    }

    pub fn codec(&self) -> &TagCodec {
        &self.codec
    }

    /// Upload the stored formats the labels recall.
    pub fn initialise(&self, templates: &TemplateDir) -> Result<usize, LabelError> {
        templates.upload_zpl_templates(self.transport.as_ref())
    }

    /// Fetch a record for every ID, in order.
    ///
    /// With `with_contents`, each record carries the box contents listing.
    pub fn records(&mut self, ids: &IdList, with_contents: bool) -> Result<Vec<AssetRecord>, LabelError> {
        let mut records = Vec::new();
        for id in ids.iter() {
            let tag = self.codec.encode(id)?;
            let asset = self.inventory.get_record_by_tag(&tag)?;
            let contents = if with_contents {
                Some(self.cache.contents_of(self.inventory.as_ref(), &asset)?)
            } else {
                None
            };
            debug!(tag = %asset.asset_tag, name = %asset.name, "Fetched asset");
            records.push(AssetRecord::from_asset(&asset, contents));
        }
        Ok(records)
    }

    /// Print `copies` labels per record. A copy count of 0 prints one.
    pub fn print(&self, records: &[AssetRecord], kind: LabelKind, copies: u32) -> Result<Delivery, LabelError> {
        let copies = copies.max(1);
        let mut job = PrintJob::new();
        for record in records {
            job.push(asset_fields(record, &self.inventory_url), copies);
        }

        info!(
            assets = records.len(),
            labels = job.label_count(),
            template = kind.template_name(),
            "Printing asset labels"
        );
        let payload = zpl::encode_job(kind.template_name(), &job);
        self.transport.send_raw(&payload)
    }
}

// ============================================================================
// BOX LABELS (QL RASTER)
// ============================================================================

pub struct BoxLabelSession {
    template: SvgTemplate,
    compositor: RasterCompositor,
    raster: RasterOptions,
    policy: TruncationPolicy,
    transport: Box<dyn PrinterTransport>,
}

impl BoxLabelSession {
    pub fn new(
        template: SvgTemplate,
        compositor: RasterCompositor,
        raster: RasterOptions,
        transport: Box<dyn PrinterTransport>,
    ) -> Self {
        Self {
            template,
            compositor,
            raster,
            policy: TruncationPolicy::default(),
            transport,
        }
    }

    pub fn with_policy(mut self, policy: TruncationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Label stock the operator must load
    pub fn stock(&self) -> String {
        self.raster.media.stock()
    }

    /// Render one box label at the printable width of the loaded media.
    pub fn render(&self, row: &BoxRow) -> Result<GrayImage, LabelError> {
        let label = BoxLabel::prepare(
            &row.box_id,
            &row.box_name,
            &row.qr_url,
            &row.contents,
            self.policy,
        )?;
        let document = svg_from_template(&self.template, &label.fields())?;
        self.compositor
            .rasterize(&document, self.raster.media.printable_width_dots)
    }

    pub fn print(&self, row: &BoxRow) -> Result<Delivery, LabelError> {
        let bitmap = self.render(row)?;
        let job = RasterJob::build(&bitmap, &self.raster)?;
        info!(box_id = %row.box_id, rows = job.rows(), "Printing box label");
        self.transport.send_raw(job.as_bytes())
    }

    /// Print every row, one outcome per row.
    ///
    /// A row that fails is reported and the run goes on. Once no printer is
    /// found, that row and all later ones are marked [`BoxOutcome::NotSent`].
    pub fn print_rows(&self, rows: &[BoxRow]) -> Vec<BoxOutcome> {
        let mut outcomes = Vec::new();
        let mut device_missing = false;

        for row in rows {
            if device_missing {
                outcomes.push(BoxOutcome::NotSent);
                continue;
            }
            let outcome = match self.print(row) {
                Ok(delivery) => BoxOutcome::Sent(delivery),
                Err(LabelError::NoDeviceFound) => {
                    warn!(box_id = %row.box_id, "No printer found");
                    device_missing = true;
                    BoxOutcome::NotSent
                }
                Err(e) => BoxOutcome::Failed(e),
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// What happened to one box label
#[derive(Debug)]
pub enum BoxOutcome {
    Sent(Delivery),
    Failed(LabelError),
    /// No printer was attached; nothing was transmitted
    NotSent,
}

// ============================================================================
// TESTS
// ============================================================================
