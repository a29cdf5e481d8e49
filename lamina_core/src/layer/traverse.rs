// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;
use core::fmt;
use core::iter::Zip;
use core::slice;

use super::Layer;
use super::id::{AttachmentId, LayerId};
use crate::attachment::Attachment;

/// An iterator over the direct children of a layer, in paint order.
///
/// Created by [`Layer::children`].
pub struct Children<'a, M> {
    inner: Zip<slice::Iter<'a, LayerId>, slice::Iter<'a, Layer<M>>>,
}

impl<'a, M> Children<'a, M> {
    pub(super) fn new(ids: &'a [LayerId], layers: &'a [Layer<M>]) -> Self {
        Self {
            inner: ids.iter().zip(layers),
        }
    }
}

impl<'a, M> Iterator for Children<'a, M> {
    type Item = (LayerId, &'a Layer<M>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&id, layer)| (id, layer))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<M> ExactSizeIterator for Children<'_, M> {}

impl<M> fmt::Debug for Children<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("remaining", &self.inner.len())
            .finish_non_exhaustive()
    }
}

/// An iterator over the attachments of a layer, in paint order.
///
/// Created by [`Layer::attachments`].
pub struct Attachments<'a, M> {
    inner: Zip<slice::Iter<'a, AttachmentId>, slice::Iter<'a, Attachment<M>>>,
}

impl<'a, M> Attachments<'a, M> {
    pub(super) fn new(ids: &'a [AttachmentId], attachments: &'a [Attachment<M>]) -> Self {
        Self {
            inner: ids.iter().zip(attachments),
        }
    }
}

impl<'a, M> Iterator for Attachments<'a, M> {
    type Item = (AttachmentId, &'a Attachment<M>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&id, attachment)| (id, attachment))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<M> ExactSizeIterator for Attachments<'_, M> {}

impl<M> fmt::Debug for Attachments<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachments")
            .field("remaining", &self.inner.len())
            .finish_non_exhaustive()
    }
}

/// A depth-first, pre-order walk over a subtree.
///
/// Yields each layer with its depth below the starting layer (which has depth
/// 0). Children are visited in paint order, so drawing every layer's
/// attachments in the order yielded paints the tree back to front.
///
/// Created by [`Layer::walk`].
pub struct Walk<'a, M> {
    stack: Vec<(u32, &'a Layer<M>)>,
}

impl<'a, M> Iterator for Walk<'a, M> {
    type Item = (u32, &'a Layer<M>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, layer) = self.stack.pop()?;
        self.stack
            .extend(layer.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, layer))
    }
}

impl<M> fmt::Debug for Walk<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<M> Layer<M> {
    /// Walks this layer and all of its descendants in pre-order.
    #[must_use]
    pub fn walk(&self) -> Walk<'_, M> {
        let mut stack = Vec::new();
        stack.push((0, self));
        Walk { stack }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerProperties;
    use kurbo::Size;

    fn sized(w: f64) -> LayerProperties {
        LayerProperties::with_size(Size::new(w, 1.0))
    }

    #[test]
    fn walk_is_pre_order_in_paint_order() {
        let mut root: Layer<()> = Layer::new(Size::new(0.0, 1.0));
        let a = root.add_child(sized(1.0));
        root.add_child(sized(4.0));
        {
            let a = root.child_mut(a).unwrap();
            a.add_child(sized(2.0));
            a.add_child(sized(3.0));
        }

        let visited: Vec<(u32, f64)> = root
            .walk()
            .map(|(depth, layer)| (depth, layer.size().width))
            .collect();
        assert_eq!(
            visited,
            [(0, 0.0), (1, 1.0), (2, 2.0), (2, 3.0), (1, 4.0)]
        );
    }

    #[test]
    fn children_iterator_is_exact_size() {
        let mut root: Layer<()> = Layer::new(Size::ZERO);
        root.add_child(sized(1.0));
        root.add_child(sized(2.0));
        let mut children = root.children();
        assert_eq!(children.len(), 2);
        children.next();
        assert_eq!(children.len(), 1);
    }
}
