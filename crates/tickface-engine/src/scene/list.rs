use crate::coords::Rect;

use super::{DrawCmd, SortKey, ZIndex};

/// A single draw item: sort key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Scissor rect in logical pixels. `None` = no clipping (draw everywhere).
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for a frame.
///
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
///
/// # Clipping
///
/// Use [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) to scope draw
/// commands to a scissor rect. Clips are intersected with the current parent.
///
/// ```ignore
/// draw_list.push_clip(layer_bounds);
/// // ... push hands ...
/// draw_list.pop_clip();
/// ```
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Stack of active scissor rects (logical pixels).
    /// The top is always the current effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command with the given z-index.
    ///
    /// The item inherits the current clip rect from the clip stack.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });

        self.sorted_dirty = true;
    }

    /// Begins a scissor region. Commands pushed until [`pop_clip`](Self::pop_clip)
    /// are clipped to `rect` (intersected with any parent clip rect).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap yields a zero-area rect so the renderer skips those draws.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Iterates items in paint order (back-to-front) without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // SortKey includes insertion order, so equal z stays stable.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::shapes::LineCap;

    fn line_width(item: &DrawItem) -> f32 {
        match &item.cmd {
            DrawCmd::Line(l) => l.width,
            DrawCmd::Rect(_) => -1.0,
        }
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut dl = DrawList::new();
        let (a, b) = (Vec2::zero(), Vec2::new(1.0, 1.0));
        dl.push_line(ZIndex::new(1), a, b, 1.0, Color::black(), LineCap::Round);
        dl.push_line(ZIndex::new(0), a, b, 2.0, Color::black(), LineCap::Round);
        dl.push_line(ZIndex::new(1), a, b, 3.0, Color::black(), LineCap::Round);

        let widths: Vec<f32> = dl.iter_in_paint_order().map(line_width).collect();
        assert_eq!(widths, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn items_inherit_nested_clip() {
        let mut dl = DrawList::new();
        dl.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        dl.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::black());
        dl.pop_clip();
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::black());
        dl.pop_clip();
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::black());

        let clips: Vec<Option<Rect>> = dl.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(50.0, 50.0, 50.0, 50.0)),
                Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
                None,
            ]
        );
    }

    #[test]
    fn disjoint_clip_becomes_zero_area() {
        let mut dl = DrawList::new();
        dl.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        dl.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 1.0, 1.0), Color::black());
        assert_eq!(dl.items()[0].clip_rect, Some(Rect::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn clear_resets_items_and_clips() {
        let mut dl = DrawList::new();
        dl.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 1.0, 1.0), Color::black());
        dl.clear();
        assert!(dl.is_empty());
        dl.push_solid_rect(ZIndex::default(), Rect::new(0.0, 0.0, 1.0, 1.0), Color::black());
        assert_eq!(dl.items()[0].clip_rect, None);
        assert_eq!(dl.items()[0].key.order, 0);
    }
}
