// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the render and draw passes.
//!
//! The passes report to a [`TraceSink`]. Every sink method has an empty
//! default body; a sink overrides the handful of events it consumes.
//!
//! The passes never see a sink directly, only a [`Tracer`]. Built without
//! the `trace` feature, a `Tracer` is a zero-sized marker and its methods
//! are empty. With it, a method is a single `Option` check plus a virtual
//! call.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`TransformEvent`] and
//!   [`MeshEvent`] plus the corresponding `TraceSink` methods.

use crate::layer::RenderChanges;
#[cfg(feature = "trace-rich")]
use crate::layer::{AttachmentId, LayerId};
#[cfg(feature = "trace-rich")]
use crate::mesh::VertexLayout;
#[cfg(feature = "trace-rich")]
use crate::transform::Transform3d;

/// Which pass over the layer tree is being traced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Transform and mesh recomputation ([`Layer::render`](crate::layer::Layer::render)).
    Render,
    /// Draw submission, driven by a renderer crate.
    Draw,
}

/// What happened to an attachment mesh.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshChange {
    /// A stale mesh was handed back to the backend.
    Released,
    /// A new mesh was created.
    Built,
}

/// Marks the beginning of a pass.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Which pass is starting.
    pub pass: PassKind,
}

/// Marks the end of a pass.
#[derive(Clone, Copy, Debug)]
pub struct PassEndEvent {
    /// Which pass is ending.
    pub pass: PassKind,
    /// `false` if the pass was cut short by a backend error.
    pub completed: bool,
}

/// Emitted for every world transform the render pass recomputes.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct TransformEvent {
    /// Depth below the render root (the root is 0).
    pub depth: u32,
    /// Handle of the layer within its parent; `None` for the render root.
    pub layer: Option<LayerId>,
    /// The recomputed world transform.
    pub transform_world: Transform3d,
}

/// Emitted for every mesh the render pass releases or builds.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct MeshEvent {
    /// Depth of the owning layer below the render root.
    pub depth: u32,
    /// Handle of the owning layer within its parent; `None` for the render root.
    pub layer: Option<LayerId>,
    /// Handle of the attachment within its layer.
    pub attachment: AttachmentId,
    /// Vertex layout of the mesh.
    pub layout: VertexLayout,
    /// Whether the mesh was released or built.
    pub change: MeshChange,
}

/// Receives trace events from the render and draw passes.
pub trait TraceSink {
    /// Called at the beginning of a pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called with the counts of a completed render pass.
    fn on_render_summary(&mut self, s: &RenderChanges) {
        _ = s;
    }

    /// Called for each recomputed world transform (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_transform(&mut self, e: &TransformEvent) {
        _ = e;
    }

    /// Called for each released or built mesh (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_mesh(&mut self, e: &MeshEvent) {
        _ = e;
    }
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Handle the passes emit events through.
///
/// Holds the sink only when the `trace` feature is enabled.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Forwards events to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Returns a tracer with no sink attached.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a render summary.
    #[inline]
    pub fn render_summary(&mut self, s: &RenderChanges) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_render_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`TransformEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn transform(&mut self, e: &TransformEvent) {
        if let Some(s) = &mut self.sink {
            s.on_transform(e);
        }
    }

    /// Emits a [`MeshEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn mesh(&mut self, e: &MeshEvent) {
        if let Some(s) = &mut self.sink {
            s.on_mesh(e);
        }
    }
}
