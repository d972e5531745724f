// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads a recording from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Sessions become duration spans on thread 1; everything else is an
//! instant event on thread 0. Session, acquire and resize events carry no
//! timestamp of their own and are stamped with the most recent tick's time.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use alight_core::time::Timebase;
use alight_core::trace::{AcquireOutcome, SessionTransition};
use alight_core::viewport::ResizeOutcome;

use crate::recorder::RecordedEvent;

const TID_FRAMES: u32 = 0;
const TID_SESSIONS: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(
    events: &[RecordedEvent],
    timebase: Timebase,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());
    let mut last_ts = 0.0;

    for recorded in events {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                last_ts = timebase.ticks_to_micros(e.now.ticks());
                out.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Loop",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "session": e.session.map(|s| s.0),
                    }
                }));
            }
            RecordedEvent::FrameSkipped(e) => {
                last_ts = timebase.ticks_to_micros(e.now.ticks());
                out.push(json!({
                    "ph": "i",
                    "name": "FrameSkipped",
                    "cat": "Loop",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Session(e) => {
                let ph = match e.transition {
                    SessionTransition::Began => "B",
                    SessionTransition::Ended => "E",
                };
                out.push(json!({
                    "ph": ph,
                    "name": format!("Session {}", e.session.0),
                    "cat": "Session",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_SESSIONS,
                    "args": {
                        "session": e.session.0,
                    }
                }));
            }
            RecordedEvent::Acquire(e) => {
                let (name, error) = match &e.outcome {
                    AcquireOutcome::Requested => ("SourceRequested", None),
                    AcquireOutcome::Ready => ("SourceReady", None),
                    AcquireOutcome::Failed(err) => ("SourceFailed", Some(err.to_string())),
                    AcquireOutcome::Stale => ("SourceStale", None),
                };
                out.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "HitTest",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_SESSIONS,
                    "s": "t",
                    "args": {
                        "session": e.session.0,
                        "error": error,
                    }
                }));
            }
            RecordedEvent::Placement(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Placement",
                    "cat": "Loop",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "session": e.session.0,
                        "position": e.position.to_array(),
                    }
                }));
            }
            RecordedEvent::Render(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Render",
                    "cat": "Loop",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "xr": e.xr,
                        "has_target": e.has_target,
                    }
                }));
            }
            RecordedEvent::Resize(e) => {
                let outcome = match e.outcome {
                    ResizeOutcome::Applied { .. } => "applied",
                    ResizeOutcome::Ignored => "ignored",
                    ResizeOutcome::Degenerate => "degenerate",
                };
                out.push(json!({
                    "ph": "i",
                    "name": "Resize",
                    "cat": "Viewport",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "p",
                    "args": {
                        "width": e.width,
                        "height": e.height,
                        "outcome": outcome,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                out.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": timebase.ticks_to_micros(s.now.ticks()),
                    "pid": 0,
                    "tid": TID_FRAMES,
                    "s": "t",
                    "args": {
                        "frame_index": s.frame_index,
                        "session": s.session.0,
                        "source": format!("{:?}", s.source),
                        "hit": s.hit,
                        "placed": s.placed,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use alight_core::error::AcquireError;
    use alight_core::session::SessionId;
    use alight_core::time::{FrameTick, HostTime};
    use alight_core::trace::{AcquireEvent, FrameTickEvent, SessionEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent::new(&FrameTick::new(HostTime(16_000), 1), None));
        rec.on_session(&SessionEvent {
            session: SessionId(1),
            transition: SessionTransition::Began,
        });
        rec.on_acquire(&AcquireEvent {
            session: SessionId(1),
            outcome: AcquireOutcome::Failed(AcquireError::Unsupported),
        });
        rec.on_session(&SessionEvent {
            session: SessionId(1),
            transition: SessionTransition::Ended,
        });

        let mut out = Vec::new();
        export(rec.events(), Timebase::MICROS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "FrameTick");
        assert_eq!(parsed[0]["ts"], 16_000.0);

        // The session span opens and closes on its own thread.
        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "Session 1");
        assert_eq!(parsed[1]["tid"], 1);
        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["name"], "Session 1");

        // Untimed events inherit the last tick's timestamp.
        assert_eq!(parsed[2]["name"], "SourceFailed");
        assert_eq!(parsed[2]["ts"], 16_000.0);
        assert!(parsed[2]["args"]["error"].is_string());
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
