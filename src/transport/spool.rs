//! # Raw Spool Transport
//!
//! Submits a payload to a CUPS raw queue by piping it into `lp`:
//!
//! ```bash
//! lp -d Zebra_Technologies_ZTC_GK420d -o raw -s -
//! ```
//!
//! The spooler accepts the job and returns immediately, so delivery is
//! reported as [`Delivery::Submitted`]; CUPS does not tell us when the label
//! has actually printed.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::{Delivery, PrinterTransport};
use crate::error::{LabelError, TransportError};

/// Placeholder replaced with the printer name in the spooler command
pub const PRINTER_PLACEHOLDER: &str = "{printer}";

/// Default spooler command line
pub const DEFAULT_SPOOLER: [&str; 7] = ["lp", "-d", PRINTER_PLACEHOLDER, "-o", "raw", "-s", "-"];

/// Sends raw bytes to a named spooler queue.
#[derive(Debug, Clone)]
pub struct RawSpoolTransport {
    printer: String,
    command: Vec<String>,
}

impl RawSpoolTransport {
    pub fn new(printer: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
            command: DEFAULT_SPOOLER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the spooler command line. `{printer}` in any argument is
    /// substituted with the printer name.
    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn printer(&self) -> &str {
        &self.printer
    }

    fn failed(&self, status: impl Into<String>) -> LabelError {
        TransportError::SpoolerFailed {
            printer: self.printer.clone(),
            status: status.into(),
        }
        .into()
    }
}

impl PrinterTransport for RawSpoolTransport {
    fn send_raw(&self, data: &[u8]) -> Result<Delivery, LabelError> {
        let args: Vec<String> = self
            .command
            .iter()
            .map(|arg| arg.replace(PRINTER_PLACEHOLDER, &self.printer))
            .collect();
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| self.failed("empty spooler command"))?;

        debug!(printer = %self.printer, command = ?args, bytes = data.len(), "Spooling job");

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| self.failed(format!("cannot run {}: {}", program, e)))?;

        // Write then drop stdin so the spooler sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(data),
            None => Ok(()),
        };

        // Reap the child before reporting a write error; a non-zero exit wins
        let status = child
            .wait()
            .map_err(|e| self.failed(format!("wait failed: {}", e)))?;
        if !status.success() {
            return Err(self.failed(status.to_string()));
        }
        if let Err(e) = written {
            return Err(self.failed(format!("write failed: {}", e)));
        }

        info!(printer = %self.printer, bytes = data.len(), "Job submitted");
        Ok(Delivery::Submitted)
    }
}

/// Names of the configured spooler queues, from `lpstat -p`.
pub fn list_queues() -> Result<Vec<String>, LabelError> {
    let output = Command::new("lpstat")
        .arg("-p")
        .output()
        .map_err(|e| LabelError::Config(format!("cannot run lpstat: {}", e)))?;
    Ok(parse_lpstat(&String::from_utf8_lossy(&output.stdout)))
}

/// Queue names from `lpstat -p` output lines such as
/// `printer Zebra_Technologies_ZTC_GK420d is idle.  enabled since ...`
pub fn parse_lpstat(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.starts_with("printer "))
        .filter_map(|line| line.split(' ').nth(1))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_command() {
        let transport = RawSpoolTransport::new("zebra_technologies_zd420");
        assert_eq!(transport.printer(), "zebra_technologies_zd420");
        assert_eq!(
            transport.command,
            vec!["lp", "-d", "{printer}", "-o", "raw", "-s", "-"]
        );
    }

    #[test]
    fn test_payload_reaches_spooler_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let capture = dir.path().join("zebra_technologies_test.zpl");
        let script = format!("cat > {}/{{printer}}.zpl", dir.path().display());

        let transport =
            RawSpoolTransport::new("zebra_technologies_test").with_command(["sh", "-c", script.as_str()]);
        let delivery = transport.send_raw(b"^XA\n^XZ\n").unwrap();

        assert_eq!(delivery, Delivery::Submitted);
        assert_eq!(std::fs::read(&capture).unwrap(), b"^XA\n^XZ\n");
    }

    #[test]
    fn test_nonzero_exit_is_error() {
        let transport = RawSpoolTransport::new("zebra_technologies_test")
            .with_command(["sh", "-c", "cat > /dev/null; exit 3"]);
        let err = transport.send_raw(b"^XA^XZ").unwrap_err();
        match err {
            LabelError::Transport(TransportError::SpoolerFailed { printer, status }) => {
                assert_eq!(printer, "zebra_technologies_test");
                assert!(status.contains('3'), "status: {}", status);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_early_exit_reports_exit_status() {
        let transport =
            RawSpoolTransport::new("zebra_technologies_test").with_command(["sh", "-c", "exit 5"]);
        let err = transport.send_raw(&vec![b'A'; 1 << 20]).unwrap_err();
        match err {
            LabelError::Transport(TransportError::SpoolerFailed { status, .. }) => {
                assert!(status.contains('5'), "status: {}", status);
                assert!(!status.contains("write failed"), "status: {}", status);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_lpstat() {
        let output = "printer Zebra_Technologies_ZTC_GK420d is idle.  enabled since Sat 01 Jun\n\
                      \tForm mounted:\n\
                      printer Brother_QL-800 disabled since Sat 01 Jun -\n";
        assert_eq!(
            parse_lpstat(output),
            vec!["Zebra_Technologies_ZTC_GK420d", "Brother_QL-800"]
        );
        assert!(parse_lpstat("").is_empty());
    }

    #[test]
    fn test_missing_spooler_is_error() {
        let transport =
            RawSpoolTransport::new("zebra_technologies_test").with_command(["/nonexistent/lp"]);
        assert!(matches!(
            transport.send_raw(b"x"),
            Err(LabelError::Transport(TransportError::SpoolerFailed { .. }))
        ));
    }
}
