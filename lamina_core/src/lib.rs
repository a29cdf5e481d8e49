// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree, attachments and incremental render pass for a 2D scene graph.
//!
//! `lamina_core` owns the data model of a 2D rendering engine: a tree of
//! positioned, transformable [`Layer`](layer::Layer)s, each carrying zero or
//! more drawable [`Attachment`](attachment::Attachment)s. It is `no_std`
//! compatible (with `alloc`). Each node literally owns its children and
//! attachments; there are no back-pointers.
//!
//! # Architecture
//!
//! A frame moves through three stages:
//!
//! ```text
//!   setters (set_size, set_position, ...)
//!       │  mark TRANSFORM on the subtree, MESH on attachments
//!       ▼
//!   Layer::render(backend) ──► RenderChanges
//!       │  recompute dirty world transforms top-down,
//!       │  rebuild dirty meshes through the MeshBackend
//!       ▼
//!   draw pass (lamina_render) ──► DrawTarget
//! ```
//!
//! **[`layer`]**: Owned layer tree with per-parent handles. Layout
//! properties are set by the caller; world transforms are computed by the
//! render pass.
//!
//! **[`attachment`]**: Colour and texture quads. Each owns at most one
//! backend mesh, rebuilt only when its `MESH` bit is set.
//!
//! **[`dirty`]**: `bitflags` sets for the two dirty reasons. `TRANSFORM`
//! propagates to descendants; `MESH` is local to one attachment.
//!
//! **[`backend`]**: The [`MeshBackend`](backend::MeshBackend) trait that
//! graphics backends implement, plus [`HeadlessBackend`](backend::HeadlessBackend)
//! for tests and tooling.
//!
//! **[`mesh`]**: Fixed vertex layouts and the [`MeshData`](mesh::MeshData)
//! handed to backends.
//!
//! **[`transform`]**: Column-major 4×4 transform and the constructors the
//! render and draw passes need.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! render-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `libm` (disabled by default): Forwards `libm` float support to `kurbo`.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   transform and per-attachment mesh events.
//!
//! # Example
//!
//! ```
//! use lamina_core::kurbo::{Size, Vec2};
//! use lamina_core::attachment::ColourFill;
//! use lamina_core::backend::HeadlessBackend;
//! use lamina_core::layer::{Layer, LayerProperties};
//! use lamina_core::paint::Rgba;
//!
//! let mut backend = HeadlessBackend::new();
//! let mut root = Layer::new(Size::new(200.0, 100.0));
//! let child = root.add_child(LayerProperties {
//!     anchor: Vec2::new(0.5, 0.5),
//!     ..LayerProperties::with_size(Size::new(50.0, 50.0))
//! });
//! root.child_mut(child)
//!     .unwrap()
//!     .add_attachment_colour(ColourFill::solid(Rgba::WHITE));
//!
//! let changes = root.render(&mut backend).unwrap();
//! assert_eq!(changes.meshes_built, 1);
//!
//! let origin = root.child(child).unwrap().transform_world().transform_point(0.0, 0.0, 0.0);
//! assert_eq!(origin, [100.0, 50.0, 0.0]);
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod attachment;
pub mod backend;
pub mod dirty;
pub mod layer;
pub mod mesh;
pub mod paint;
pub mod texture;
pub mod trace;
pub mod transform;

pub use kurbo;
