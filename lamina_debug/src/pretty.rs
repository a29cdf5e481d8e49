// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::layer::{LayerId, RenderChanges};
use lamina_core::mesh::VertexLayout;
use lamina_core::trace::{
    MeshChange, MeshEvent, PassBeginEvent, PassEndEvent, PassKind, TraceSink, TransformEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    passes: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, passes: 0 }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn pass_name(pass: PassKind) -> &'static str {
    match pass {
        PassKind::Render => "render",
        PassKind::Draw => "draw",
    }
}

/// Formats a layer handle, naming the pass root `root`.
fn layer_name(layer: Option<LayerId>) -> String {
    layer.map_or_else(|| "root".to_owned(), |id| id.index().to_string())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.passes += 1;
        let _ = writeln!(
            self.writer,
            "[pass:begin] #{} {}",
            self.passes,
            pass_name(e.pass),
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let status = if e.completed { "ok" } else { "ABORTED" };
        let _ = writeln!(
            self.writer,
            "[pass:end] #{} {} {status}",
            self.passes,
            pass_name(e.pass),
        );
    }

    fn on_render_summary(&mut self, s: &RenderChanges) {
        let _ = writeln!(
            self.writer,
            "[summary] visited={} transforms={} built={} released={}",
            s.layers_visited, s.transforms_recomputed, s.meshes_built, s.meshes_released,
        );
    }

    fn on_transform(&mut self, e: &TransformEvent) {
        let [x, y, _] = e.transform_world.transform_point(0.0, 0.0, 0.0);
        let _ = writeln!(
            self.writer,
            "[transform] depth={} layer={} origin=({x:.1}, {y:.1})",
            e.depth,
            layer_name(e.layer),
        );
    }

    fn on_mesh(&mut self, e: &MeshEvent) {
        let layout = match e.layout {
            VertexLayout::Colour => "colour",
            VertexLayout::Texture => "texture",
        };
        let change = match e.change {
            MeshChange::Released => "released",
            MeshChange::Built => "built",
        };
        let _ = writeln!(
            self.writer,
            "[mesh] depth={} layer={} attachment={} {layout} {change}",
            e.depth,
            layer_name(e.layer),
            e.attachment.index(),
        );
    }
}
