//! # Raster Session Polling
//!
//! A raster printer reports progress through 32-byte status frames. One
//! session sends a single payload and then polls until the printer has both
//! finished printing and returned to the receive phase.
//!
//! ## States
//!
//! ```text
//! Idle ──► DeviceOpened ──► Transmitting ──► Polling ──┬──► Completed
//!                                 │                    ├──► TimedOut
//!                                 └────────────────────┴──► Errored
//! ```
//!
//! The timeout runs from the start of transmission. Terminal states are
//! final: [`RasterSession::run`] consumes the session.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::error::{LabelError, TransportError};
use crate::protocol::ql::{DeviceStatusEvent, PhaseType, StatusFrame};

/// Default overall timeout for one job
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default back-off when no frame is available
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A bidirectional link to a raster printer
pub trait StatusChannel {
    /// Send the complete job in one write.
    fn write_payload(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read one status frame, or `None` if nothing is available yet.
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}

/// Timing of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Tracks the two conditions that together mean the job is done.
///
/// They may arrive in either order and each only needs to be seen once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    printing_completed: bool,
    waiting_to_receive: bool,
}

impl CompletionTracker {
    pub fn observe(&mut self, event: &DeviceStatusEvent) {
        match event {
            DeviceStatusEvent::PrintingCompleted => self.printing_completed = true,
            DeviceStatusEvent::PhaseChange {
                phase: PhaseType::WaitingToReceive,
            } => self.waiting_to_receive = true,
            _ => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        self.printing_completed && self.waiting_to_receive
    }
}

/// Where a raster session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    DeviceOpened,
    Transmitting,
    Polling,
    Completed,
    TimedOut,
    Errored,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::TimedOut | SessionState::Errored
        )
    }
}

/// One job on one opened device.
pub struct RasterSession<C> {
    channel: C,
    settings: PollSettings,
    state: SessionState,
}

impl<C: StatusChannel> RasterSession<C> {
    /// Wrap an opened channel.
    pub fn new(channel: C, settings: PollSettings) -> Self {
        Self {
            channel,
            settings,
            state: SessionState::DeviceOpened,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send `payload` and poll for completion.
    ///
    /// Returns [`SessionState::Completed`] or [`SessionState::TimedOut`];
    /// write and read failures end in `Errored` and are returned as errors.
    pub fn run(mut self, payload: &[u8]) -> Result<SessionState, LabelError> {
        let started = Instant::now();

        self.transition(SessionState::Transmitting);
        if let Err(e) = self.channel.write_payload(payload) {
            self.transition(SessionState::Errored);
            return Err(e.into());
        }
        debug!(bytes = payload.len(), "Payload sent");

        self.transition(SessionState::Polling);
        let mut tracker = CompletionTracker::default();

        loop {
            if started.elapsed() >= self.settings.timeout {
                self.transition(SessionState::TimedOut);
                warn!(
                    timeout_ms = self.settings.timeout.as_millis() as u64,
                    "Printing potentially not successful"
                );
                return Ok(self.state);
            }

            let raw = match self.channel.read_frame() {
                Ok(Some(raw)) if !raw.is_empty() => raw,
                Ok(_) => {
                    thread::sleep(self.settings.interval);
                    continue;
                }
                Err(e) => {
                    self.transition(SessionState::Errored);
                    return Err(e.into());
                }
            };

            let frame = match StatusFrame::decode(&raw) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, len = raw.len(), "Ignoring unparseable status frame");
                    continue;
                }
            };
            debug!(status = %frame, "Status frame");

            let event = frame.event();
            match &event {
                DeviceStatusEvent::Error { errors } => error!(?errors, "Printer reported an error"),
                _ if !frame.errors.is_empty() => error!(errors = ?frame.errors, "Printer error flags set"),
                _ => {}
            }

            tracker.observe(&event);
            if tracker.is_complete() {
                self.transition(SessionState::Completed);
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Printing completed"
                );
                return Ok(self.state);
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Raster session");
        self.state = next;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted reads.
    #[derive(Default)]
    struct ScriptedChannel {
        reads: VecDeque<Result<Option<Vec<u8>>, TransportError>>,
        fail_write: bool,
    }

    impl ScriptedChannel {
        fn with_frames(frames: &[[u8; 32]]) -> Self {
            Self {
                reads: frames.iter().map(|f| Ok(Some(f.to_vec()))).collect(),
                ..Default::default()
            }
        }
    }

    impl StatusChannel for ScriptedChannel {
        fn write_payload(&mut self, data: &[u8]) -> Result<(), TransportError> {
            if self.fail_write {
                return Err(TransportError::ShortWrite {
                    written: 0,
                    expected: data.len(),
                });
            }
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
            self.reads.pop_front().unwrap_or(Ok(None))
        }
    }

    fn fast() -> PollSettings {
        PollSettings {
            timeout: Duration::from_millis(40),
            interval: Duration::from_millis(1),
        }
    }

    fn completed() -> [u8; 32] {
        StatusFrame::encode(0x01, 0x00, [0, 0])
    }

    fn waiting() -> [u8; 32] {
        StatusFrame::encode(0x06, 0x00, [0, 0])
    }

    fn printing() -> [u8; 32] {
        StatusFrame::encode(0x06, 0x01, [0, 0])
    }

    #[test]
    fn test_completes_after_both_conditions() {
        let channel = ScriptedChannel::with_frames(&[printing(), completed(), waiting()]);
        let session = RasterSession::new(channel, fast());
        assert_eq!(session.state(), SessionState::DeviceOpened);
        assert_eq!(session.run(b"job").unwrap(), SessionState::Completed);
    }

    #[test]
    fn test_conditions_in_either_order() {
        let channel = ScriptedChannel::with_frames(&[waiting(), completed()]);
        let state = RasterSession::new(channel, fast()).run(b"job").unwrap();
        assert_eq!(state, SessionState::Completed);
    }

    #[test]
    fn test_single_condition_times_out() {
        let channel = ScriptedChannel::with_frames(&[completed()]);
        let state = RasterSession::new(channel, fast()).run(b"job").unwrap();
        assert_eq!(state, SessionState::TimedOut);
    }

    #[test]
    fn test_silent_device_times_out() {
        let started = Instant::now();
        let state = RasterSession::new(ScriptedChannel::default(), fast())
            .run(b"job")
            .unwrap();
        assert_eq!(state, SessionState::TimedOut);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_garbage_and_errors_do_not_stop_polling() {
        let mut channel = ScriptedChannel::with_frames(&[
            StatusFrame::encode(0x02, 0x00, [0x01, 0x00]),
            completed(),
        ]);
        channel.reads.insert(0, Ok(Some(vec![0xFF; 7])));
        channel.reads.push_back(Ok(Some(waiting().to_vec())));
        let state = RasterSession::new(channel, fast()).run(b"job").unwrap();
        assert_eq!(state, SessionState::Completed);
    }

    #[test]
    fn test_write_failure_is_error() {
        let channel = ScriptedChannel {
            fail_write: true,
            ..Default::default()
        };
        let err = RasterSession::new(channel, fast()).run(b"job").unwrap_err();
        assert!(matches!(
            err,
            LabelError::Transport(TransportError::ShortWrite { expected: 3, .. })
        ));
    }

    #[test]
    fn test_read_failure_is_error() {
        let mut channel = ScriptedChannel::default();
        channel
            .reads
            .push_back(Err(TransportError::Usb("No such device".into())));
        let err = RasterSession::new(channel, fast()).run(b"job").unwrap_err();
        assert!(matches!(err, LabelError::Transport(TransportError::Usb(_))));
    }

    #[test]
    fn test_tracker() {
        let mut tracker = CompletionTracker::default();
        tracker.observe(&DeviceStatusEvent::PhaseChange {
            phase: PhaseType::Printing,
        });
        tracker.observe(&DeviceStatusEvent::PrintingCompleted);
        assert!(!tracker.is_complete());
        tracker.observe(&DeviceStatusEvent::PhaseChange {
            phase: PhaseType::WaitingToReceive,
        });
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::TimedOut.is_terminal());
        assert!(!SessionState::Polling.is_terminal());
    }
}
