// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop over a small layer tree.
//!
//! Builds a scene on a [`HeadlessBackend`], runs a few frames of
//! mutate / render / draw while printing every trace event, and finally
//! exports the recorded events as a Chrome trace.
//!
//! Usage: `scene_demo [trace.json]`. Without a path the trace is written to
//! stdout after the frame log.

use std::fs::File;
use std::io::{BufWriter, Write};

use lamina_core::attachment::{ColourFill, TextureFill};
use lamina_core::backend::{HeadlessBackend, HeadlessMesh};
use lamina_core::kurbo::{Size, Vec2};
use lamina_core::layer::{AttachmentId, Layer, LayerId, LayerProperties, RenderChanges};
use lamina_core::paint::Rgba;
use lamina_core::texture::{TextureId, TextureRef};
use lamina_core::trace::{MeshEvent, PassBeginEvent, PassEndEvent, TraceSink, Tracer, TransformEvent};
use lamina_debug::pretty::PrettyPrintSink;
use lamina_debug::recorder::RecorderSink;
use lamina_render::{DrawItem, DrawTarget, Drawer};

const VIEWPORT: Size = Size::new(320.0, 240.0);
const FRAME_COUNT: u32 = 4;

/// Forwards every event to both sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.pretty.on_pass_begin(e);
        self.recorder.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.pretty.on_pass_end(e);
        self.recorder.on_pass_end(e);
    }

    fn on_render_summary(&mut self, s: &RenderChanges) {
        self.pretty.on_render_summary(s);
        self.recorder.on_render_summary(s);
    }

    fn on_transform(&mut self, e: &TransformEvent) {
        self.pretty.on_transform(e);
        self.recorder.on_transform(e);
    }

    fn on_mesh(&mut self, e: &MeshEvent) {
        self.pretty.on_mesh(e);
        self.recorder.on_mesh(e);
    }
}

/// Prints each draw call instead of submitting it.
struct PrintTarget;

impl DrawTarget<HeadlessMesh> for PrintTarget {
    fn draw(&mut self, _: &[f32; 16], item: &DrawItem<'_, HeadlessMesh>) {
        println!(
            "  draw {:?} mesh={} depth={} at=({}, {})",
            item.program,
            item.mesh.id(),
            item.depth,
            item.model[12],
            item.model[13],
        );
    }
}

struct Scene {
    root: Layer<HeadlessMesh>,
    panel: LayerId,
    sprite: LayerId,
    sprite_cell: AttachmentId,
}

fn build_scene() -> Scene {
    let mut root = Layer::new(VIEWPORT);
    root.add_attachment_colour(ColourFill::solid(Rgba::new(0.1, 0.1, 0.15, 1.0)));

    let panel = root.add_child(LayerProperties {
        anchor: Vec2::new(0.5, 0.5),
        origin: Vec2::new(0.5, 0.5),
        ..LayerProperties::with_size(Size::new(160.0, 120.0))
    });
    if let Some(layer) = root.child_mut(panel) {
        layer.add_attachment_colour(ColourFill::new(
            Rgba::WHITE,
            Rgba::WHITE,
            Rgba::BLACK,
            Rgba::BLACK,
        ));
    }
    let mut sprite_layer = Layer::from_properties(LayerProperties {
        position: Vec2::new(16.0, 16.0),
        ..LayerProperties::with_size(Size::new(32.0, 32.0))
    });
    let sprite_cell = sprite_layer.add_attachment_texture(TextureFill::new(TextureRef::array(
        TextureId(7),
        32,
        32,
        4,
    )));
    let sprite = root.add_child_layer(sprite_layer);

    Scene {
        root,
        panel,
        sprite,
        sprite_cell,
    }
}

fn main() {
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut backend = HeadlessBackend::new();
    let drawer = Drawer::new(VIEWPORT.width, VIEWPORT.height);
    let Scene {
        mut root,
        panel,
        sprite,
        sprite_cell,
    } = build_scene();

    for frame in 0..FRAME_COUNT {
        println!("frame {frame}");

        // Mutate: frame 1 moves the sprite, frame 2 resizes the panel,
        // frame 3 advances the sprite's animation cell.
        match frame {
            1 => {
                if let Some(layer) = root.child_mut(sprite) {
                    layer.set_position(Vec2::new(64.0, 16.0));
                }
            }
            2 => {
                if let Some(layer) = root.child_mut(panel) {
                    layer.set_size(Size::new(200.0, 100.0));
                    layer.set_rotation(15.0);
                }
            }
            3 => {
                if let Some(attachment) = root
                    .child_mut(sprite)
                    .and_then(|layer| layer.attachment_mut(sprite_cell))
                {
                    attachment.set_source_index(frame);
                }
            }
            _ => {}
        }

        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        let changes = root
            .render_traced(&mut backend, &mut tracer)
            .expect("headless backend has no mesh limit");
        if changes.is_empty() {
            println!("  nothing to render");
        }
        drawer.draw_traced(&root, &mut PrintTarget, &mut tracer);
    }

    root.remove_child(sprite, &mut backend);
    let released = root.destroy(&mut backend);
    println!(
        "meshes: released={released} created={} destroyed={} live={}",
        backend.created(),
        backend.destroyed(),
        backend.live()
    );

    let bytes = recorder.into_bytes();
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::create(&path).expect("failed to create trace file");
            let mut writer = BufWriter::new(file);
            lamina_debug::chrome::export(&bytes, &mut writer).expect("failed to write Chrome trace");
            writer.flush().expect("failed to flush Chrome trace");
            println!("Wrote {path}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            lamina_debug::chrome::export(&bytes, &mut stdout).expect("failed to write Chrome trace");
            writeln!(stdout).expect("failed to write to stdout");
        }
    }
}
