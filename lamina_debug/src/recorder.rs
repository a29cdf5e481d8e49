// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event log for post-mortem analysis.
//!
//! Each event becomes one record: a one-byte tag followed by its fields in
//! little-endian order. [`RecorderSink`] appends records as the passes run;
//! [`decode`] replays a finished log.
//!
//! Layer and attachment handles are stored as their raw values, which is
//! all a post-mortem reader needs to tell siblings apart.

use lamina_core::layer::RenderChanges;
use lamina_core::mesh::VertexLayout;
use lamina_core::trace::{
    MeshChange, MeshEvent, PassBeginEvent, PassEndEvent, PassKind, TraceSink, TransformEvent,
};
use lamina_core::transform::Transform3d;

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PASS_END: u8 = 2;
const TAG_RENDER_SUMMARY: u8 = 3;
const TAG_TRANSFORM: u8 = 4;
const TAG_MESH: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// Appends every event to a byte log.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates a recorder with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the log recorded so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the log, consuming the recorder.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        self.write_u8(u8::from(v.is_some()));
        self.write_u32(v.unwrap_or(0));
    }

    fn write_pass(&mut self, p: PassKind) {
        self.write_u8(match p {
            PassKind::Render => 0,
            PassKind::Draw => 1,
        });
    }

    fn write_transform(&mut self, t: &Transform3d) {
        for v in t.cols.iter().flatten() {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_pass(e.pass);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_pass(e.pass);
        self.write_u8(u8::from(e.completed));
    }

    fn on_render_summary(&mut self, s: &RenderChanges) {
        self.write_u8(TAG_RENDER_SUMMARY);
        self.write_count(s.layers_visited);
        self.write_count(s.transforms_recomputed);
        self.write_count(s.meshes_built);
        self.write_count(s.meshes_released);
    }

    fn on_transform(&mut self, e: &TransformEvent) {
        self.write_u8(TAG_TRANSFORM);
        self.write_u32(e.depth);
        self.write_option_u32(e.layer.map(|id| id.index()));
        self.write_transform(&e.transform_world);
    }

    fn on_mesh(&mut self, e: &MeshEvent) {
        self.write_u8(TAG_MESH);
        self.write_u32(e.depth);
        self.write_option_u32(e.layer.map(|id| id.index()));
        self.write_u32(e.attachment.index());
        self.write_u8(match e.layout {
            VertexLayout::Colour => 0,
            VertexLayout::Texture => 1,
        });
        self.write_u8(match e.change {
            MeshChange::Released => 0,
            MeshChange::Built => 1,
        });
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// One event read back from a log.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// A render pass summary.
    RenderSummary(RenderChanges),
    /// A recomputed world transform.
    Transform {
        /// Depth below the render root.
        depth: u32,
        /// Raw handle of the layer, `None` for the render root.
        layer: Option<u32>,
        /// The recomputed world transform.
        transform_world: Transform3d,
    },
    /// A released or built mesh.
    Mesh {
        /// Depth of the owning layer below the render root.
        depth: u32,
        /// Raw handle of the owning layer, `None` for the render root.
        layer: Option<u32>,
        /// Raw handle of the attachment.
        attachment: u32,
        /// Vertex layout of the mesh.
        layout: VertexLayout,
        /// Whether the mesh was released or built.
        change: MeshChange,
    },
}

/// Replays a log produced by [`RecorderSink`].
///
/// Iteration stops at the first truncated record or unknown tag.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator returned by [`decode`].
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u64()?).ok()
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some((present != 0).then_some(val))
    }

    fn read_pass(&mut self) -> Option<PassKind> {
        Some(match self.read_u8()? {
            0 => PassKind::Render,
            _ => PassKind::Draw,
        })
    }

    fn read_transform(&mut self) -> Option<Transform3d> {
        let mut cols = [[0.0; 4]; 4];
        for v in cols.iter_mut().flatten() {
            *v = self.read_f64()?;
        }
        Some(Transform3d { cols })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass: self.read_pass()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            pass: self.read_pass()?,
            completed: self.read_u8()? != 0,
        }))
    }

    fn decode_render_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderSummary(RenderChanges {
            layers_visited: self.read_count()?,
            transforms_recomputed: self.read_count()?,
            meshes_built: self.read_count()?,
            meshes_released: self.read_count()?,
        }))
    }

    fn decode_transform(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transform {
            depth: self.read_u32()?,
            layer: self.read_option_u32()?,
            transform_world: self.read_transform()?,
        })
    }

    fn decode_mesh(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Mesh {
            depth: self.read_u32()?,
            layer: self.read_option_u32()?,
            attachment: self.read_u32()?,
            layout: match self.read_u8()? {
                0 => VertexLayout::Colour,
                _ => VertexLayout::Texture,
            },
            change: match self.read_u8()? {
                0 => MeshChange::Released,
                _ => MeshChange::Built,
            },
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_RENDER_SUMMARY => self.decode_render_summary(),
            TAG_TRANSFORM => self.decode_transform(),
            TAG_MESH => self.decode_mesh(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::attachment::ColourFill;
    use lamina_core::backend::HeadlessBackend;
    use lamina_core::kurbo::{Size, Vec2};
    use lamina_core::layer::{Layer, LayerProperties};
    use lamina_core::trace::Tracer;

    fn recorded_render() -> Vec<RecordedEvent> {
        let mut backend = HeadlessBackend::new();
        let mut root = Layer::new(Size::new(100.0, 100.0));
        let child = root.add_child(LayerProperties {
            position: Vec2::new(10.0, 20.0),
            ..LayerProperties::with_size(Size::new(10.0, 10.0))
        });
        root.child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::default());

        let mut rec = RecorderSink::new();
        root.render_traced(&mut backend, &mut Tracer::new(&mut rec))
            .unwrap();
        decode(rec.as_bytes()).collect()
    }

    #[test]
    fn render_pass_is_recorded_in_order() {
        let events = recorded_render();
        assert_eq!(events.len(), 6, "got: {events:?}");
        assert!(matches!(
            events[0],
            RecordedEvent::PassBegin(PassBeginEvent {
                pass: PassKind::Render
            })
        ));
        assert!(matches!(
            events[1],
            RecordedEvent::Transform {
                depth: 0,
                layer: None,
                ..
            }
        ));
        assert!(matches!(
            events[2],
            RecordedEvent::Transform {
                depth: 1,
                layer: Some(0),
                ..
            }
        ));
        assert!(matches!(
            events[3],
            RecordedEvent::Mesh {
                layer: Some(0),
                attachment: 0,
                layout: VertexLayout::Colour,
                change: MeshChange::Built,
                ..
            }
        ));
        assert!(matches!(
            events[4],
            RecordedEvent::PassEnd(PassEndEvent {
                pass: PassKind::Render,
                completed: true
            })
        ));
        let RecordedEvent::RenderSummary(summary) = events[5] else {
            panic!("expected a summary, got {:?}", events[5]);
        };
        assert_eq!(summary.meshes_built, 1);
        assert_eq!(summary.transforms_recomputed, 2);
    }

    #[test]
    fn transform_survives_recording() {
        let events = recorded_render();
        let RecordedEvent::Transform {
            transform_world, ..
        } = events[2]
        else {
            panic!("expected a transform, got {:?}", events[2]);
        };
        assert_eq!(transform_world.transform_point(0.0, 0.0, 0.0), [10.0, 20.0, 0.0]);
    }

    #[test]
    fn empty_log_replays_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass: PassKind::Draw,
        });
        rec.on_render_summary(&RenderChanges::default());
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1);
    }
}
