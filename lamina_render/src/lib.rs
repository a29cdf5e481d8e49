// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw planning for lamina layer trees.
//!
//! This crate turns a rendered [`lamina_core`] layer tree into draw calls.
//! It never mutates the tree and never allocates GPU resources; it only reads
//! the meshes and world transforms the render pass cached. It defines:
//!
//! - [`Drawer`]: the projection for a viewport and the tree walk
//! - [`DrawItem`]: one draw call, one per attachment with a mesh
//! - [`DrawPlan`]: the draw calls for one frame, back to front
//! - [`DrawTarget`]: the trait a graphics backend implements to execute them
//! - [`Program`]: which of the three shader programs an item needs
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Forwards to `lamina_core/trace`, so that
//!   [`Drawer::draw_traced`] reports draw pass boundaries.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod drawer;
mod plan;

pub use drawer::{DrawTarget, Drawer};
pub use plan::{DrawItem, DrawPlan, Program};
