// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport projection and the read-only draw walk.

use lamina_core::layer::Layer;
use lamina_core::trace::{PassBeginEvent, PassEndEvent, PassKind, Tracer};
use lamina_core::transform::Transform3d;

use crate::plan::{DrawItem, DrawPlan, Program};

/// Executes draw items, typically by recording GPU draw calls.
pub trait DrawTarget<M> {
    /// Draws one item.
    ///
    /// `projection_view` is the same for every item of a frame; targets that
    /// upload it once per frame may compare it against the previous value.
    fn draw(&mut self, projection_view: &[f32; 16], item: &DrawItem<'_, M>);
}

/// Walks a rendered layer tree and issues one draw per attachment.
///
/// Layer pixel space has its origin at the top-left of the viewport with Y
/// pointing down. The drawer's projection-view matrix maps that space onto
/// clip space, with pixel `(0, 0)` at clip `(-1, 1)` and pixel
/// `(width, height)` at clip `(1, -1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drawer {
    width: f64,
    height: f64,
    projection_view: Transform3d,
}

impl Drawer {
    /// Creates a drawer for a viewport of `width` × `height` pixels.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            projection_view: projection_view(width, height),
        }
    }

    /// Changes the viewport size.
    pub fn resize(&mut self, width: f64, height: f64) {
        *self = Self::new(width, height);
    }

    /// Returns the viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Returns the projection-view matrix.
    #[must_use]
    pub const fn projection_view(&self) -> Transform3d {
        self.projection_view
    }

    /// Builds the draw plan for the tree rooted at `root`.
    ///
    /// Items follow paint order: depth-first pre-order over layers, each
    /// layer's attachments in insertion order before any of its children.
    ///
    /// Only state the render pass has brought up to date is drawn. An
    /// attachment is skipped while it has no mesh or its mesh is stale, and
    /// a layer is skipped while its world transform is stale. Render the
    /// tree after mutating it and before planning.
    #[must_use]
    pub fn plan<'a, M>(&self, root: &'a Layer<M>) -> DrawPlan<'a, M> {
        let mut plan = DrawPlan::new(self.projection_view.to_cols_array_f32());
        self.plan_into(root, &mut plan);
        plan
    }

    /// Like [`plan`](Self::plan), but reuses a caller-provided plan.
    pub fn plan_into<'a, M>(&self, root: &'a Layer<M>, plan: &mut DrawPlan<'a, M>) {
        plan.clear();
        plan.projection_view = self.projection_view.to_cols_array_f32();
        for (depth, layer) in root.walk() {
            if !layer.dirt().is_empty() {
                continue;
            }
            let model = layer.transform_world().to_cols_array_f32();
            for (attachment_id, attachment) in layer.attachments() {
                let Some(mesh) = attachment.mesh() else {
                    continue;
                };
                if !attachment.dirt().is_empty() {
                    continue;
                }
                plan.items.push(DrawItem {
                    program: Program::for_kind(attachment.kind()),
                    model,
                    mesh,
                    texture: attachment.texture_source().copied(),
                    depth,
                    attachment: attachment_id,
                });
            }
        }
    }

    /// Draws the tree rooted at `root` into `target`, back to front.
    ///
    /// Returns the number of items drawn.
    pub fn draw<M, T>(&self, root: &Layer<M>, target: &mut T) -> usize
    where
        T: DrawTarget<M> + ?Sized,
    {
        self.draw_traced(root, target, &mut Tracer::none())
    }

    /// Like [`draw`](Self::draw), but reports the draw pass to `tracer`.
    pub fn draw_traced<M, T>(
        &self,
        root: &Layer<M>,
        target: &mut T,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        T: DrawTarget<M> + ?Sized,
    {
        tracer.pass_begin(&PassBeginEvent {
            pass: PassKind::Draw,
        });
        let plan = self.plan(root);
        for item in &plan.items {
            target.draw(&plan.projection_view, item);
        }
        tracer.pass_end(&PassEndEvent {
            pass: PassKind::Draw,
            completed: true,
        });
        plan.items.len()
    }
}

fn projection_view(width: f64, height: f64) -> Transform3d {
    let (hw, hh) = (width / 2.0, height / 2.0);
    Transform3d::orthographic(-hw, hw, -hh, hh, 0.0, 1.0) * Transform3d::from_translation(-hw, -hh, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use lamina_core::attachment::{ColourFill, TextureFill};
    use lamina_core::backend::{HeadlessBackend, HeadlessMesh};
    use lamina_core::layer::LayerProperties;
    use lamina_core::kurbo::{Size, Vec2};
    use lamina_core::texture::{TextureId, TextureRef};

    #[derive(Default)]
    struct Recorder {
        meshes: Vec<u64>,
        programs: Vec<Program>,
    }

    impl DrawTarget<HeadlessMesh> for Recorder {
        fn draw(&mut self, _: &[f32; 16], item: &DrawItem<'_, HeadlessMesh>) {
            self.meshes.push(item.mesh.id());
            self.programs.push(item.program);
        }
    }

    fn assert_clip(d: &Drawer, x: f64, y: f64, expected: [f64; 2]) {
        let p = d.projection_view().transform_point(x, y, 0.0);
        assert!(
            (p[0] - expected[0]).abs() < 1e-12 && (p[1] - expected[1]).abs() < 1e-12,
            "pixel ({x}, {y}) mapped to {p:?}, expected {expected:?}"
        );
    }

    #[test]
    fn projection_maps_pixels_to_clip_space() {
        let d = Drawer::new(800.0, 600.0);
        assert_clip(&d, 0.0, 0.0, [-1.0, 1.0]);
        assert_clip(&d, 800.0, 600.0, [1.0, -1.0]);
        assert_clip(&d, 400.0, 300.0, [0.0, 0.0]);
    }

    #[test]
    fn resize_recomputes_projection() {
        let mut d = Drawer::new(800.0, 600.0);
        d.resize(100.0, 50.0);
        assert_eq!(d.width(), 100.0);
        assert_eq!(d.height(), 50.0);
        assert_clip(&d, 100.0, 50.0, [1.0, -1.0]);
    }

    #[test]
    fn items_follow_paint_order_and_skip_meshless() {
        let mut backend = HeadlessBackend::new();
        let mut root = Layer::new(Size::new(100.0, 100.0));
        root.add_attachment_colour(ColourFill::default());
        let a = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        let b = root.add_child(LayerProperties {
            position: Vec2::new(20.0, 0.0),
            ..LayerProperties::with_size(Size::new(10.0, 10.0))
        });
        root.child_mut(a)
            .unwrap()
            .add_attachment_texture(TextureFill::new(TextureRef::flat(TextureId(1), 4, 4)));
        root.child_mut(b).unwrap().add_attachment_texture(TextureFill::new(
            TextureRef::array(TextureId(2), 4, 4, 2),
        ));
        root.add_attachment_colour(ColourFill::default());
        root.render(&mut backend).unwrap();

        // Added after the render pass: no mesh yet.
        root.add_attachment_colour(ColourFill::default());

        let drawer = Drawer::new(100.0, 100.0);
        let mut target = Recorder::default();
        assert_eq!(drawer.draw(&root, &mut target), 4);
        assert_eq!(
            target.programs,
            [
                Program::Colour,
                Program::Colour,
                Program::Texture2d,
                Program::Texture2dArray
            ]
        );

        let plan = drawer.plan(&root);
        let b_item = plan.items[3];
        assert_eq!(b_item.depth, 1);
        assert_eq!(b_item.texture.map(|t| t.id), Some(TextureId(2)));
        assert_eq!(
            b_item.model,
            root.child(b).unwrap().transform_world().to_cols_array_f32()
        );
        assert_eq!(b_item.model[12], 20.0);
    }

    #[test]
    fn stale_state_is_not_drawn() {
        let mut backend = HeadlessBackend::new();
        let mut root = Layer::new(Size::new(100.0, 100.0));
        let fill = root.add_attachment_colour(ColourFill::default());
        let child = root.add_child(LayerProperties::with_size(Size::new(10.0, 10.0)));
        root.child_mut(child)
            .unwrap()
            .add_attachment_colour(ColourFill::default());
        root.render(&mut backend).unwrap();

        let drawer = Drawer::new(100.0, 100.0);
        assert_eq!(drawer.plan(&root).items.len(), 2);

        // Recoloured but not re-rendered: the cached mesh is stale.
        root.attachment_mut(fill)
            .unwrap()
            .set_top_left(lamina_core::paint::Rgba::BLACK);
        // Moved but not re-rendered: the cached transform is stale.
        root.child_mut(child)
            .unwrap()
            .set_position(Vec2::new(5.0, 5.0));
        assert!(drawer.plan(&root).items.is_empty());

        root.render(&mut backend).unwrap();
        let plan = drawer.plan(&root);
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[1].model[12], 5.0);
    }
}
