// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The incremental render pass.
//!
//! The pass walks the tree top-down. For each layer it:
//!
//! 1. **TRANSFORM**: if set, recomputes `transform_world` as
//!    `parent_transform_world · local_transform(parent_size)`.
//! 2. **MESH**: renders every attachment against the layer's current size;
//!    attachments without [`AttachmentDirt::MESH`](crate::dirty::AttachmentDirt::MESH)
//!    are left alone.
//! 3. Copies its size and world transform into the render state of every
//!    child that needs them (all children if this layer's transform was
//!    recomputed, otherwise only children whose own transform is stale),
//!    then recurses into each child in paint order.
//! 4. Clears **TRANSFORM**.
//!
//! A second pass over an unchanged tree therefore touches no transform and
//! no mesh.
//!
//! If the backend fails, the pass stops at that attachment and returns the
//! error. Layers whose subtree was not finished keep
//! [`LayerDirt::TRANSFORM`] set, so the next pass resumes the work.

use super::Layer;
use super::id::LayerId;
use crate::backend::MeshBackend;
use crate::dirty::LayerDirt;
use crate::trace::{PassBeginEvent, PassEndEvent, PassKind, Tracer};
#[cfg(feature = "trace-rich")]
use crate::trace::{MeshChange, MeshEvent, TransformEvent};

/// Counts of the work a single [`Layer::render`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderChanges {
    /// Layers the pass visited, including clean ones.
    pub layers_visited: usize,
    /// Layers whose world transform was recomputed.
    pub transforms_recomputed: usize,
    /// Attachment meshes created.
    pub meshes_built: usize,
    /// Stale attachment meshes handed back to the backend.
    pub meshes_released: usize,
}

impl RenderChanges {
    /// Returns whether the pass recomputed or rebuilt nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.transforms_recomputed == 0 && self.meshes_built == 0 && self.meshes_released == 0
    }
}

impl<M> Layer<M> {
    /// Runs the render pass over this layer and its subtree.
    ///
    /// Called on the root of a tree, this brings every world transform and
    /// every attachment mesh up to date and clears all dirty flags.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if an attachment mesh cannot be created.
    /// The failed attachment and every layer whose subtree was not finished
    /// stay dirty, so a later call picks up where this one stopped.
    pub fn render<B>(&mut self, backend: &mut B) -> Result<RenderChanges, B::Error>
    where
        B: MeshBackend<Mesh = M>,
    {
        self.render_traced(backend, &mut Tracer::none())
    }

    /// Like [`render`](Self::render), but reports pass boundaries and the
    /// resulting [`RenderChanges`] to `tracer`.
    ///
    /// With the `trace-rich` feature, every recomputed transform and every
    /// released or built mesh is reported as well.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if an attachment mesh cannot be created.
    pub fn render_traced<B>(
        &mut self,
        backend: &mut B,
        tracer: &mut Tracer<'_>,
    ) -> Result<RenderChanges, B::Error>
    where
        B: MeshBackend<Mesh = M>,
    {
        tracer.pass_begin(&PassBeginEvent {
            pass: PassKind::Render,
        });
        let mut changes = RenderChanges::default();
        let result = self.render_node(backend, tracer, &mut changes, 0, None);
        tracer.pass_end(&PassEndEvent {
            pass: PassKind::Render,
            completed: result.is_ok(),
        });
        result?;
        tracer.render_summary(&changes);
        Ok(changes)
    }

    fn render_node<B>(
        &mut self,
        backend: &mut B,
        tracer: &mut Tracer<'_>,
        changes: &mut RenderChanges,
        depth: u32,
        layer: Option<LayerId>,
    ) -> Result<(), B::Error>
    where
        B: MeshBackend<Mesh = M>,
    {
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = layer;
        }
        changes.layers_visited += 1;

        let transform_dirty = self.dirt.contains(LayerDirt::TRANSFORM);
        if transform_dirty {
            let state = &mut self.render_state;
            state.transform_world =
                state.parent_transform_world * self.properties.local_transform(state.parent_size);
            changes.transforms_recomputed += 1;
            #[cfg(feature = "trace-rich")]
            tracer.transform(&TransformEvent {
                depth,
                layer,
                transform_world: state.transform_world,
            });
        }

        let size = self.properties.size;
        for (attachment, &attachment_id) in self.attachments.iter_mut().zip(&self.attachment_ids) {
            let update = attachment.render(size, backend)?;
            changes.meshes_released += usize::from(update.released);
            changes.meshes_built += usize::from(update.built);
            #[cfg(feature = "trace-rich")]
            {
                let event = |change| MeshEvent {
                    depth,
                    layer,
                    attachment: attachment_id,
                    layout: attachment.kind().layout(),
                    change,
                };
                if update.released {
                    tracer.mesh(&event(MeshChange::Released));
                }
                if update.built {
                    tracer.mesh(&event(MeshChange::Built));
                }
            }
            #[cfg(not(feature = "trace-rich"))]
            {
                _ = attachment_id;
            }
        }

        let transform_world = self.render_state.transform_world;
        for (child, &child_id) in self.children.iter_mut().zip(&self.child_ids) {
            if transform_dirty || child.dirt.contains(LayerDirt::TRANSFORM) {
                child.render_state.parent_size = size;
                child.render_state.parent_transform_world = transform_world;
            }
            child.render_node(backend, tracer, changes, depth + 1, Some(child_id))?;
        }

        self.dirt.remove(LayerDirt::TRANSFORM);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::ColourFill;
    use crate::backend::{HeadlessBackend, HeadlessError, HeadlessMesh};
    use crate::dirty::AttachmentDirt;
    use crate::layer::LayerProperties;
    use crate::mesh::ColourVertex;
    use crate::paint::Rgba;
    use crate::transform::Transform3d;
    use kurbo::{Size, Vec2};

    type TestLayer = Layer<HeadlessMesh>;

    fn origin_of(layer: &TestLayer) -> [f64; 3] {
        layer.transform_world().transform_point(0.0, 0.0, 0.0)
    }

    #[test]
    fn centered_child_lands_mid_parent() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(200.0, 100.0));
        let child = root.add_child(LayerProperties {
            anchor: Vec2::new(0.5, 0.5),
            ..LayerProperties::with_size(Size::new(50.0, 50.0))
        });
        let fill = root
            .child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::solid(Rgba::WHITE));

        let changes = root.render(&mut backend).unwrap();
        assert_eq!(
            changes,
            RenderChanges {
                layers_visited: 2,
                transforms_recomputed: 2,
                meshes_built: 1,
                meshes_released: 0,
            }
        );

        let c = root.child(child).unwrap();
        assert_eq!(origin_of(c), [100.0, 50.0, 0.0]);
        assert_eq!(c.render_state().parent_size, Size::new(200.0, 100.0));

        let mesh = c.attachment(fill).unwrap().mesh().unwrap();
        let vertices = mesh.typed_vertices::<ColourVertex>().unwrap();
        assert_eq!(vertices.len(), 4);
        let corners: [[f32; 3]; 4] = core::array::from_fn(|i| vertices[i].xyz);
        assert_eq!(
            corners,
            [
                [0.0, 0.0, 0.0],
                [50.0, 0.0, 0.0],
                [0.0, 50.0, 0.0],
                [50.0, 50.0, 0.0],
            ]
        );
        assert!(vertices.iter().all(|v| v.rgba == [1.0; 4]));
    }

    #[test]
    fn second_render_is_a_no_op() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        root.add_attachment_colour(ColourFill::default());
        let child = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        root.child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::default());

        let first = root.render(&mut backend).unwrap();
        assert!(!first.is_empty());

        let second = root.render(&mut backend).unwrap();
        assert!(second.is_empty());
        assert_eq!(second.layers_visited, 2);
        assert_eq!(backend.created(), 2);
        assert!(root.walk().all(|(_, l)| l.dirt().is_empty()));
        assert!(
            root.walk()
                .flat_map(|(_, l)| l.attachments())
                .all(|(_, a)| a.dirt().is_empty() && a.mesh().is_some())
        );
    }

    #[test]
    fn transform_is_deterministic() {
        let build = || {
            let mut root = TestLayer::new(Size::new(300.0, 200.0));
            let child = root.add_child(LayerProperties {
                anchor: Vec2::new(0.25, 0.75),
                origin: Vec2::new(0.5, 0.5),
                position: Vec2::new(7.0, -3.0),
                scale: Vec2::new(1.5, 0.5),
                shear: Vec2::new(0.2, 0.1),
                rotation: 30.0,
                ..LayerProperties::with_size(Size::new(40.0, 20.0))
            });
            (root, child)
        };
        let mut backend = HeadlessBackend::new();
        let (mut a, ca) = build();
        let (mut b, cb) = build();
        a.render(&mut backend).unwrap();
        b.render(&mut backend).unwrap();
        // Rendering again without changes leaves the result untouched.
        a.render(&mut backend).unwrap();
        assert_eq!(
            a.child(ca).unwrap().transform_world(),
            b.child(cb).unwrap().transform_world()
        );
    }

    #[test]
    fn moving_root_shifts_every_descendant() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        let child = root.add_child(LayerProperties {
            position: Vec2::new(5.0, 5.0),
            ..LayerProperties::with_size(Size::new(10.0, 10.0))
        });
        let grandchild = root.child_mut(child).unwrap().add_child(LayerProperties {
            position: Vec2::new(1.0, 2.0),
            ..LayerProperties::with_size(Size::new(5.0, 5.0))
        });
        root.render(&mut backend).unwrap();
        let before = origin_of(root.child(child).unwrap().child(grandchild).unwrap());
        assert_eq!(before, [6.0, 7.0, 0.0]);

        root.set_position(Vec2::new(10.0, 0.0));
        let changes = root.render(&mut backend).unwrap();
        assert_eq!(changes.transforms_recomputed, 3);
        assert_eq!(changes.meshes_built, 0);

        let c = root.child(child).unwrap();
        assert_eq!(origin_of(c), [15.0, 5.0, 0.0]);
        assert_eq!(origin_of(c.child(grandchild).unwrap()), [16.0, 7.0, 0.0]);
    }

    #[test]
    fn child_change_leaves_parent_and_siblings_alone() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        let a = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        let b = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        root.render(&mut backend).unwrap();

        root.child_mut(b).unwrap().set_position(Vec2::new(4.0, 0.0));
        let changes = root.render(&mut backend).unwrap();
        assert_eq!(changes.transforms_recomputed, 1);
        assert_eq!(origin_of(root.child(a).unwrap()), [0.0, 0.0, 0.0]);
        assert_eq!(origin_of(root.child(b).unwrap()), [4.0, 0.0, 0.0]);
        assert_eq!(
            root.child(b).unwrap().render_state().parent_transform_world,
            Transform3d::IDENTITY
        );
    }

    #[test]
    fn resize_rebuilds_mesh_but_move_does_not() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        let fill = root.add_attachment_colour(ColourFill::default());
        root.render(&mut backend).unwrap();

        root.set_position(Vec2::new(1.0, 1.0));
        let moved = root.render(&mut backend).unwrap();
        assert_eq!(moved.meshes_built, 0);
        assert_eq!(moved.transforms_recomputed, 1);

        root.set_size(Size::new(30.0, 40.0));
        let resized = root.render(&mut backend).unwrap();
        assert_eq!(resized.meshes_built, 1);
        assert_eq!(resized.meshes_released, 1);
        assert_eq!(backend.live(), 1);

        let mesh = root.attachment(fill).unwrap().mesh().unwrap();
        let vertices = mesh.typed_vertices::<ColourVertex>().unwrap();
        assert_eq!(vertices[3].xyz, [30.0, 40.0, 0.0]);
    }

    #[test]
    fn resize_propagates_new_parent_size() {
        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        let child = root.add_child(LayerProperties {
            anchor: Vec2::new(1.0, 1.0),
            ..LayerProperties::with_size(Size::new(10.0, 10.0))
        });
        root.render(&mut backend).unwrap();
        assert_eq!(origin_of(root.child(child).unwrap()), [100.0, 100.0, 0.0]);

        root.set_size(Size::new(60.0, 40.0));
        root.render(&mut backend).unwrap();
        assert_eq!(origin_of(root.child(child).unwrap()), [60.0, 40.0, 0.0]);
    }

    #[test]
    fn backend_error_propagates_and_pass_resumes() {
        let mut backend = HeadlessBackend::with_limit(1);
        let mut root = TestLayer::new(Size::new(100.0, 100.0));
        let first = root.add_attachment_colour(ColourFill::default());
        let child = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        let pending = root
            .child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::default());

        let err = root.render(&mut backend).unwrap_err();
        assert_eq!(err, HeadlessError::Exhausted { limit: 1 });
        assert!(root.dirt().contains(LayerDirt::TRANSFORM));
        let c = root.child(child).unwrap();
        assert!(c.attachment(pending).unwrap().mesh().is_none());
        assert!(
            c.attachment(pending)
                .unwrap()
                .dirt()
                .contains(AttachmentDirt::MESH)
        );

        // Freeing a slot lets the next pass finish the job.
        root.remove_attachment(first, &mut backend);
        let changes = root.render(&mut backend).unwrap();
        assert_eq!(changes.meshes_built, 1);
        assert_eq!(changes.transforms_recomputed, 2);
        assert!(root.walk().all(|(_, l)| l.dirt().is_empty()));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn render_traced_reports_pass_and_summary() {
        use crate::trace::TraceSink;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Sink {
            ends: Vec<bool>,
            summaries: Vec<RenderChanges>,
        }
        impl TraceSink for Sink {
            fn on_pass_end(&mut self, e: &PassEndEvent) {
                self.ends.push(e.completed);
            }
            fn on_render_summary(&mut self, s: &RenderChanges) {
                self.summaries.push(*s);
            }
        }

        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(10.0, 10.0));
        root.add_attachment_colour(ColourFill::default());
        let mut sink = Sink::default();
        let changes = root
            .render_traced(&mut backend, &mut Tracer::new(&mut sink))
            .unwrap();
        assert_eq!(sink.ends, [true]);
        assert_eq!(sink.summaries, [changes]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn rich_events_name_layer_and_attachment() {
        use crate::trace::TraceSink;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Sink {
            transforms: Vec<(u32, Option<LayerId>)>,
            meshes: Vec<(Option<LayerId>, MeshChange)>,
        }
        impl TraceSink for Sink {
            fn on_transform(&mut self, e: &TransformEvent) {
                self.transforms.push((e.depth, e.layer));
            }
            fn on_mesh(&mut self, e: &MeshEvent) {
                self.meshes.push((e.layer, e.change));
            }
        }

        let mut backend = HeadlessBackend::new();
        let mut root = TestLayer::new(Size::new(10.0, 10.0));
        let child = root.add_child(LayerProperties::with_size(Size::new(5.0, 5.0)));
        root.child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::default());
        root.render(&mut backend).unwrap();
        root.child_mut(child).unwrap().set_size(Size::new(6.0, 6.0));

        let mut sink = Sink::default();
        root.render_traced(&mut backend, &mut Tracer::new(&mut sink))
            .unwrap();
        assert_eq!(sink.transforms, [(1, Some(child))]);
        assert_eq!(
            sink.meshes,
            [
                (Some(child), MeshChange::Released),
                (Some(child), MeshChange::Built)
            ]
        );
    }
}
