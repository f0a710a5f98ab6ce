//! # labelprint CLI
//!
//! Command-line interface for asset and storage-box labels.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive asset labels on the only Zebra queue
//! labelprint assets --inventory snapshot.json
//!
//! # Box labels (with contents) for a range of assets, two copies each
//! labelprint assets --inventory snapshot.json -t box --ids EMF00010-EMF00015 --copies 2 --yes
//!
//! # Storage box labels on a Brother QL-800
//! labelprint boxes --sheet storage.json
//!
//! # Render storage box labels to PNG instead of printing
//! labelprint boxes --sheet storage.json --png previews/
//!
//! # Upload ZPL templates only
//! labelprint templates -p Zebra_Technologies_ZTC_GK420d
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use labelprint::{
    Config, Delivery, LabelError, PrinterBackend, TagCodec,
    inventory::JsonInventory,
    job::{AssetLabelSession, BoxLabelSession, BoxOutcome},
    label::{LabelKind, TruncationPolicy},
    logging,
    printer::is_zebra_printer,
    protocol::ql::RasterOptions,
    render::RasterCompositor,
    sheet::{JsonSheet, SheetSource},
    template::TemplateDir,
    transport::list_queues,
};

/// SVG template used for storage box labels
const BOX_SVG_TEMPLATE: &str = "box.svg";

/// labelprint - Asset and storage label printing
#[derive(Parser, Debug)]
#[command(name = "labelprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print asset or box labels for inventory assets on a Zebra printer
    Assets {
        /// Printer queue (defaults to the only Zebra queue)
        #[arg(long, short)]
        printer: Option<String>,

        /// Label template: asset or box
        #[arg(long, short, default_value = "asset")]
        template: LabelKind,

        /// Inventory snapshot (JSON)
        #[arg(long, value_name = "FILE")]
        inventory: PathBuf,

        /// Asset IDs or tags, e.g. "EMF00001-EMF00005,12" (prompts if omitted)
        #[arg(long)]
        ids: Option<String>,

        /// Copies per asset
        #[arg(long, default_value_t = 1)]
        copies: u32,

        /// Print without asking for confirmation
        #[arg(long)]
        yes: bool,

        /// Do not upload ZPL templates before printing
        #[arg(long)]
        skip_templates: bool,
    },

    /// Print storage box labels from a sheet export on a Brother QL printer
    Boxes {
        /// Sheet export (JSON array of rows)
        #[arg(long, value_name = "FILE")]
        sheet: PathBuf,

        /// Write PNG previews to this directory instead of printing
        #[arg(long, value_name = "DIR")]
        png: Option<PathBuf>,

        /// Fail instead of truncating contents that do not fit
        #[arg(long)]
        strict: bool,
    },

    /// Upload ZPL templates to a Zebra printer
    Templates {
        /// Printer queue (defaults to the only Zebra queue)
        #[arg(long, short)]
        printer: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init_logging(Some(&config.log_level));
    let templates = TemplateDir::new(&config.template_dir);

    match cli.command {
        Commands::Assets {
            printer,
            template,
            inventory,
            ids,
            copies,
            yes,
            skip_templates,
        } => {
            let printer = resolve_printer(printer)?;
            let inventory_url = config.require_inventory_url()?.to_string();
            let inventory = JsonInventory::load(&inventory)?;
            let mut session = AssetLabelSession::new(
                TagCodec::new(&config.asset_prefix),
                inventory_url,
                Box::new(inventory),
                PrinterBackend::for_printer(&printer),
            );

            if !skip_templates {
                println!("Initialising printer {}...", printer);
                session.initialise(&templates)?;
            }
            println!(
                "You are printing {} labels - ensure you have {} label stock loaded.",
                template.template_name(),
                template.stock()
            );

            match ids {
                Some(expr) => print_assets(&mut session, template, &expr, copies, yes),
                None => {
                    while let Some(expr) = prompt("Enter asset IDs or tags: ")? {
                        if expr.is_empty() {
                            continue;
                        }
                        // A failed job never ends the interactive session
                        if let Err(e) = print_assets(&mut session, template, &expr, copies, yes) {
                            eprintln!("Error: {}", e);
                        }
                    }
                    Ok(())
                }
            }
        }

        Commands::Boxes { sheet, png, strict } => {
            let rows = JsonSheet::load(&sheet, config.box_url_base.clone())?.box_rows()?;
            if rows.is_empty() {
                println!("No boxes marked for printing.");
                return Ok(());
            }

            let policy = if strict {
                TruncationPolicy::Strict
            } else {
                TruncationPolicy::Lenient
            };
            let session = BoxLabelSession::new(
                templates.svg(BOX_SVG_TEMPLATE)?,
                RasterCompositor::new(),
                RasterOptions::default(),
                PrinterBackend::BrotherQl.into_transport(),
            )
            .with_policy(policy);

            if let Some(dir) = png {
                return write_previews(&session, &rows, &dir);
            }

            println!("Ensure you have {} label stock loaded.", session.stock());
            let outcomes = session.print_rows(&rows);
            for (row, outcome) in rows.iter().zip(&outcomes) {
                match outcome {
                    BoxOutcome::Sent(Delivery::Unconfirmed) => {
                        println!("Box {}: sent, printing potentially not successful", row.box_id)
                    }
                    BoxOutcome::Sent(_) => println!("Box {}: printed", row.box_id),
                    BoxOutcome::Failed(e) => eprintln!("Box {}: Error: {}", row.box_id, e),
                    BoxOutcome::NotSent => println!("Box {}: not sent", row.box_id),
                }
            }
            if outcomes.iter().any(|o| matches!(o, BoxOutcome::NotSent)) {
                println!("No printer found. Connect the printer and run again.");
            }
            Ok(())
        }

        Commands::Templates { printer } => {
            let printer = resolve_printer(printer)?;
            let transport = PrinterBackend::for_printer(&printer);
            let count = templates.upload_zpl_templates(transport.as_ref())?;
            println!("Uploaded {} templates to {}", count, printer);
            Ok(())
        }
    }
}

/// Look up, confirm and print one batch of assets.
fn print_assets(
    session: &mut AssetLabelSession,
    kind: LabelKind,
    expr: &str,
    copies: u32,
    yes: bool,
) -> Result<(), LabelError> {
    let ids = session.codec().parse_id_list(expr)?;
    let records = session.records(&ids, kind.wants_contents())?;
    if records.is_empty() {
        println!("No assets selected.");
        return Ok(());
    }

    println!("Will print labels for:");
    println!("  {:<12} {:<24} Contents", "Tag", "Name");
    for record in &records {
        let contents = record.contents.as_deref().unwrap_or("").replace('\n', "; ");
        println!("  {:<12} {:<24} {}", record.tag, record.name, contents);
    }

    let mut copies = copies;
    if !yes {
        match prompt("Print these assets (y/n)? ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {}
            _ => return Ok(()),
        }
        if let Some(answer) = prompt("How many copies? ")? {
            copies = answer.parse().unwrap_or(1);
        }
    }

    println!("Printing labels for {} assets...", records.len());
    session.print(&records, kind, copies)?;
    Ok(())
}

fn write_previews(
    session: &BoxLabelSession,
    rows: &[labelprint::sheet::BoxRow],
    dir: &Path,
) -> Result<(), LabelError> {
    std::fs::create_dir_all(dir)?;
    for row in rows {
        let bitmap = session.render(row)?;
        let path = dir.join(format!("box-{}.png", row.box_id));
        bitmap
            .save(&path)
            .map_err(|e| LabelError::Rasterization(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Saved preview");
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// The given Zebra queue, or the only one configured.
fn resolve_printer(printer: Option<String>) -> Result<String, LabelError> {
    if let Some(printer) = printer {
        if !is_zebra_printer(&printer) {
            return Err(LabelError::Config(format!(
                "'{}' is not a Zebra printer",
                printer
            )));
        }
        return Ok(printer);
    }

    let mut zebras: Vec<String> = list_queues()?
        .into_iter()
        .filter(|name| is_zebra_printer(name))
        .collect();
    match zebras.len() {
        0 => Err(LabelError::Config("No supported printers found".to_string())),
        1 => Ok(zebras.remove(0)),
        _ => Err(LabelError::Config(format!(
            "Multiple supported printers found: {}",
            zebras.join(", ")
        ))),
    }
}

/// Read one trimmed line from stdin. `None` at end of input.
fn prompt(message: &str) -> Result<Option<String>, LabelError> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
