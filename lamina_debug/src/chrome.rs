// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry no clock readings, so each event is stamped with its
//! sequence number in microseconds. The timeline shows ordering and nesting,
//! not durations.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// # Errors
///
/// Returns any error from serializing to `writer`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        let event = match recorded {
            RecordedEvent::PassBegin(e) => json!({
                "ph": "B",
                "name": format!("{:?}", e.pass),
                "cat": "Pass",
                "ts": ts,
                "pid": 0,
                "tid": 0,
            }),
            RecordedEvent::PassEnd(e) => json!({
                "ph": "E",
                "name": format!("{:?}", e.pass),
                "cat": "Pass",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "args": {
                    "completed": e.completed,
                }
            }),
            RecordedEvent::RenderSummary(s) => json!({
                "ph": "i",
                "name": "RenderSummary",
                "cat": "Summary",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": {
                    "layers_visited": s.layers_visited,
                    "transforms_recomputed": s.transforms_recomputed,
                    "meshes_built": s.meshes_built,
                    "meshes_released": s.meshes_released,
                }
            }),
            RecordedEvent::Transform {
                depth,
                layer,
                transform_world,
            } => {
                let [x, y, _] = transform_world.transform_point(0.0, 0.0, 0.0);
                json!({
                    "ph": "i",
                    "name": "Transform",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "depth": depth,
                        "layer": layer,
                        "origin": [x, y],
                    }
                })
            }
            RecordedEvent::Mesh {
                depth,
                layer,
                attachment,
                layout,
                change,
            } => json!({
                "ph": "i",
                "name": format!("Mesh{change:?}"),
                "cat": "Rich",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": {
                    "depth": depth,
                    "layer": layer,
                    "attachment": attachment,
                    "layout": format!("{layout:?}"),
                }
            }),
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
