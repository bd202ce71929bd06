//! Replay command implementation.
//!
//! Drives a [`Monitor`] from a recorded session on a manual clock, standing in
//! for a live frame loop plus a control plane.

use std::io::BufRead;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::cli::args::{OutputFormat, ReplayArgs};
use crate::config::Config;
use crate::core::{LandmarkFrame, ManualClock};
use crate::error::PostureError;
use crate::features::monitor::Monitor;
use crate::output::{format_alert, format_control, format_poll, format_stats, format_status};

/// Control-plane operation recorded in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Start,
    Pause,
    Snooze,
    Status,
    Stats,
    Poll,
}

/// One line of a recorded session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordedEvent {
    /// A control-plane call.
    Control {
        t: f64,
        control: ControlKind,
        #[serde(default)]
        seconds: Option<f64>,
    },
    /// A perception frame.
    Frame {
        t: f64,
        #[serde(flatten)]
        frame: LandmarkFrame,
    },
}

impl RecordedEvent {
    /// Timestamp of the event.
    #[must_use]
    pub const fn t(&self) -> f64 {
        match self {
            Self::Control { t, .. } | Self::Frame { t, .. } => *t,
        }
    }
}

/// Parse one recorded line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns `PostureError::InvalidInput` when the line is neither a frame nor a
/// control event.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<RecordedEvent>, PostureError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| PostureError::InvalidInput(format!("line {line_no}: {e}")))
}

/// Frame and control counts for one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayCounts {
    /// Frames fed to the engine.
    pub frames: usize,
    /// Frames skipped by a pause or snooze.
    pub skipped: usize,
    /// Control events applied.
    pub controls: usize,
}

/// Applies recorded events to a monitor in order.
pub struct Replayer {
    clock: Arc<ManualClock>,
    monitor: Monitor,
    format: OutputFormat,
    last_t: f64,
    counts: ReplayCounts,
}

impl Replayer {
    /// Build a replayer around a fresh monitor.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` if the configuration fails validation.
    pub fn new(config: &Config, format: OutputFormat) -> Result<Self, PostureError> {
        let clock = Arc::new(ManualClock::new());
        let monitor = Monitor::new(config, clock.clone())?;
        Ok(Self {
            clock,
            monitor,
            format,
            last_t: 0.0,
            counts: ReplayCounts::default(),
        })
    }

    fn advance(&mut self, line_no: usize, t: f64) -> Result<(), PostureError> {
        if !t.is_finite() || t < 0.0 {
            return Err(PostureError::InvalidInput(format!(
                "line {line_no}: timestamp must be a finite, non-negative number (got {t})"
            )));
        }
        if t < self.last_t {
            return Err(PostureError::InvalidInput(format!(
                "line {line_no}: timestamp {t} precedes previous timestamp {}",
                self.last_t
            )));
        }
        self.clock.set_secs(t).map_err(|_| {
            PostureError::InvalidInput(format!("line {line_no}: timestamp {t} is out of range"))
        })?;
        self.last_t = t;
        Ok(())
    }

    /// Apply one event, returning the rendered output lines it produced.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-order timestamps, invalid snooze durations
    /// or output formatting failures.
    pub fn apply(
        &mut self,
        line_no: usize,
        event: &RecordedEvent,
    ) -> Result<Vec<String>, PostureError> {
        let t = event.t();
        self.advance(line_no, t)?;

        let mut lines = Vec::new();
        match event {
            RecordedEvent::Frame { frame, .. } => {
                let result = self.monitor.process_frame(frame);
                self.counts.frames += 1;
                if result.paused_or_suppressed {
                    self.counts.skipped += 1;
                }
                for alert in &result.raised {
                    lines.push(format_alert(t, alert, self.format)?);
                }
            }
            RecordedEvent::Control {
                control, seconds, ..
            } => {
                self.counts.controls += 1;
                debug!("event=replay_control t={t} control={control:?}");
                match control {
                    ControlKind::Start => {
                        self.monitor.start();
                        lines.push(format_control(t, "monitoring started", self.format)?);
                    }
                    ControlKind::Pause => {
                        self.monitor.pause();
                        lines.push(format_control(t, "monitoring paused", self.format)?);
                    }
                    ControlKind::Snooze => {
                        let snoozed = match seconds {
                            Some(secs) => self.monitor.snooze(*secs),
                            None => self.monitor.snooze_default(),
                        };
                        snoozed.map_err(|e| {
                            PostureError::InvalidInput(format!("line {line_no}: {e}"))
                        })?;
                        lines.push(format_control(t, "alerts snoozed", self.format)?);
                    }
                    ControlKind::Status => {
                        lines.push(format_status(t, &self.monitor.status(), self.format)?);
                    }
                    ControlKind::Stats => {
                        lines.push(format_stats(t, &self.monitor.stats(), self.format)?);
                    }
                    ControlKind::Poll => {
                        let message = self.monitor.poll_alert();
                        lines.push(format_poll(t, message.as_deref(), self.format)?);
                    }
                }
            }
        }
        Ok(lines)
    }

    /// Rendered final statistics.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Parse` if JSON serialization fails.
    pub fn summary(&self) -> Result<String, PostureError> {
        format_stats(self.last_t, &self.monitor.stats(), self.format)
    }

    /// Counts so far.
    #[must_use]
    pub const fn counts(&self) -> ReplayCounts {
        self.counts
    }

    /// The monitor being driven.
    #[must_use]
    pub const fn monitor(&self) -> &Monitor {
        &self.monitor
    }
}

/// Replay every event from `reader`, collecting rendered output.
///
/// # Errors
///
/// Stops at the first unreadable line, malformed event or out-of-order
/// timestamp.
pub fn replay_from<R: BufRead>(
    reader: R,
    config: &Config,
    format: OutputFormat,
    summary: bool,
) -> Result<String, PostureError> {
    let mut replayer = Replayer::new(config, format)?;
    let mut output = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if let Some(event) = parse_line(line_no, &line)? {
            output.extend(replayer.apply(line_no, &event)?);
        }
    }

    let counts = replayer.counts();
    debug!(
        "event=replay_done frames={} skipped={} controls={}",
        counts.frames, counts.skipped, counts.controls
    );

    if summary {
        output.push(replayer.summary()?);
    }
    Ok(output.join("\n"))
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the replay fails.
pub fn replay(
    args: &ReplayArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, PostureError> {
    let file = std::fs::File::open(&args.file).map_err(|e| {
        PostureError::InvalidInput(format!("cannot open {}: {e}", args.file.display()))
    })?;
    replay_from(std::io::BufReader::new(file), config, format, args.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{"t": 1.5, "width": 640, "height": 480}"#;

    #[test]
    fn test_parse_frame_line() {
        let event = parse_line(1, FRAME).unwrap().unwrap();
        assert_eq!(event.t(), 1.5);
        if let RecordedEvent::Frame { frame, .. } = event {
            assert_eq!(frame.width, 640);
            assert!(frame.pose.is_none());
        } else {
            panic!("Expected frame");
        }
    }

    #[test]
    fn test_parse_control_line() {
        let event = parse_line(1, r#"{"t": 100, "control": "snooze", "seconds": 300}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            RecordedEvent::Control {
                t: 100.0,
                control: ControlKind::Snooze,
                seconds: Some(300.0),
            }
        );
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert!(parse_line(1, "   ").unwrap().is_none());
        assert!(parse_line(2, "# recorded 2024-05-01").unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_line(7, r#"{"t": 1, "control": "explode"}"#).unwrap_err();
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_out_of_order_timestamps_rejected() {
        let input = format!("{{\"t\": 5, \"width\": 640, \"height\": 480}}\n{FRAME}\n");
        let err = replay_from(input.as_bytes(), &Config::default(), OutputFormat::Json, false)
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_controls_produce_output() {
        let input = r#"
{"t": 0, "control": "status"}
{"t": 1, "control": "snooze", "seconds": 60}
{"t": 2, "control": "status"}
{"t": 3, "width": 640, "height": 480}
{"t": 4, "control": "poll"}
{"t": 5, "control": "pause"}
{"t": 6, "width": 640, "height": 480}
"#;
        let mut replayer = Replayer::new(&Config::default(), OutputFormat::Json).unwrap();
        let mut lines = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            if let Some(event) = parse_line(idx + 1, line).unwrap() {
                lines.extend(replayer.apply(idx + 1, &event).unwrap());
            }
        }

        assert_eq!(lines.len(), 5);
        let status: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert_eq!(status["status"]["suppressed"], true);
        assert_eq!(status["status"]["remaining_suppression_secs"], 59.0);
        let poll: serde_json::Value = serde_json::from_str(&lines[3]).unwrap();
        assert_eq!(poll["alert"], "none");

        let counts = replayer.counts();
        assert_eq!(counts.frames, 2);
        assert_eq!(counts.skipped, 2);
        assert_eq!(counts.controls, 5);
        assert!(!replayer.monitor().status().active);
    }

    #[test]
    fn test_negative_snooze_is_invalid_input() {
        let input = r#"{"t": 0, "control": "snooze", "seconds": -5}"#;
        let err = replay_from(input.as_bytes(), &Config::default(), OutputFormat::Pretty, false)
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidInput(_)));
    }

    #[test]
    fn test_huge_timestamp_is_invalid_input() {
        let input = concat!(
            "{\"t\": 1, \"width\": 640, \"height\": 480}\n",
            "{\"t\": 1.8e19, \"control\": \"status\"}",
        );
        let err = replay_from(input.as_bytes(), &Config::default(), OutputFormat::Json, false)
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidInput(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_huge_snooze_is_invalid_input() {
        let input = r#"{"t": 0, "control": "snooze", "seconds": 1.8e19}"#;
        let err = replay_from(input.as_bytes(), &Config::default(), OutputFormat::Json, false)
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidInput(_)));
    }

    #[test]
    fn test_default_snooze_uses_config() {
        let mut config = Config::default();
        config.monitoring.default_snooze_secs = 10.0;
        let input = concat!(
            "{\"t\": 0, \"control\": \"snooze\"}\n",
            "{\"t\": 5, \"control\": \"status\"}\n",
            "{\"t\": 11, \"control\": \"status\"}",
        );

        let output = replay_from(input.as_bytes(), &config, OutputFormat::Json, false).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        let during: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        let after: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(during["status"]["suppressed"], true);
        assert_eq!(after["status"]["suppressed"], false);
    }
}
