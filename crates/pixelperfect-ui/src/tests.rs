#[cfg(test)]
mod tests {
    use crate::*;
    use pixelperfect_core::{Color, ComputedBox, PixelBuffer};
    use pixelperfect_text::builtin_font;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::Arc;

    const RED: Color = Color::from_rgb(255, 0, 0);
    const GREEN: Color = Color::from_rgb(0, 255, 0);
    const BLUE: Color = Color::from_rgb(0, 0, 255);

    /// A widget that cannot size itself.
    struct Blank;

    impl Widget for Blank {
        fn paint(&mut self, buf: &mut PixelBuffer, _ctx: &FrameContext) {
            buf.fill(Color::WHITE);
        }

        fn debug_name(&self) -> &'static str {
            "blank"
        }
    }

    fn frame(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::filled(w, h, Color::BLACK)
    }

    fn at(now: f64) -> FrameContext {
        FrameContext::new(now, now as u64)
    }

    fn ascii(buf: &PixelBuffer) -> String {
        (0..buf.height() as i32)
            .map(|y| {
                (0..buf.width() as i32)
                    .map(|x| match buf.get(x, y) {
                        Some(Color::WHITE) => '#',
                        Some(Color::BLACK) => '.',
                        _ => '+',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_get_box_before_solve() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(8.0, 8.0))
            .unwrap();
        assert!(matches!(tree.get_box(root), Err(UiError::LayoutNotComputed(n)) if n == root));
        tree.compute_layout(root, pixelperfect_core::Size::new(8, 8))
            .unwrap();
        assert_eq!(tree.get_box(root).unwrap(), ComputedBox::new(0, 0, 8, 8));
    }

    #[test]
    fn test_unknown_node() {
        let tree = LayoutTree::new();
        let ghost = NodeId::from(999u64);
        assert!(matches!(tree.get_box(ghost), Err(UiError::UnknownNode(_))));
    }

    #[test]
    fn test_column_layout_boxes() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(32.0, 16.0))
            .unwrap();
        let top = tree
            .insert(ContainerNode::new(), LayoutStyle::new().height(4.0).flex_grow(0.0))
            .unwrap();
        let rest = tree.insert(ContainerNode::new(), LayoutStyle::new()).unwrap();
        let dot = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(2.0, 2.0).flex_grow(0.0))
            .unwrap();
        tree.add_child(root, top).unwrap();
        tree.add_child(root, rest).unwrap();
        tree.add_child(rest, dot).unwrap();

        tree.draw(root, &mut frame(32, 16), &at(0.0)).unwrap();
        assert_eq!(tree.get_box(top).unwrap(), ComputedBox::new(0, 0, 32, 4));
        assert_eq!(tree.get_box(rest).unwrap(), ComputedBox::new(0, 4, 32, 12));
        assert_eq!(tree.get_box(dot).unwrap(), ComputedBox::new(0, 0, 2, 2));
        assert_eq!(tree.absolute_box(dot).unwrap(), ComputedBox::new(0, 4, 2, 2));
        assert_eq!(tree.descendants(root), vec![root, top, rest, dot]);
    }

    #[test]
    fn test_solves_once_per_frame() {
        let font = Arc::new(builtin_font());
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(32.0, 16.0))
            .unwrap();
        let label = tree
            .insert(TextNode::fixed(font, "HI"), LayoutStyle::new())
            .unwrap();
        tree.add_child(root, label).unwrap();

        let mut out = frame(32, 16);
        tree.draw(root, &mut out, &at(0.0)).unwrap();
        assert_eq!(tree.solve_count(), 1);

        // Nothing changed.
        tree.draw(root, &mut out, &at(1.0)).unwrap();
        tree.draw(root, &mut out, &at(2.0)).unwrap();
        assert_eq!(tree.solve_count(), 1);

        for _ in 0..3 {
            let extra = tree
                .insert(ContainerNode::new(), LayoutStyle::new().height(2.0).flex_grow(0.0))
                .unwrap();
            tree.add_child(root, extra).unwrap();
        }
        assert!(tree.is_dirty(root).unwrap());
        tree.draw(root, &mut out, &at(3.0)).unwrap();
        assert_eq!(tree.solve_count(), 2);
        assert!(!tree.is_dirty(root).unwrap());
    }

    #[test]
    fn test_detached_node_goes_stale() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(8.0, 8.0))
            .unwrap();
        let child = tree.insert(ContainerNode::new(), LayoutStyle::new()).unwrap();
        tree.add_child(root, child).unwrap();
        tree.draw(root, &mut frame(8, 8), &at(0.0)).unwrap();
        assert!(tree.get_box(child).is_ok());

        tree.remove_child(root, child).unwrap();
        assert_eq!(tree.parent(child), None);
        assert!(matches!(tree.get_box(child), Err(UiError::LayoutNotComputed(_))));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_unmeasurable_leaf_errors() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(8.0, 8.0))
            .unwrap();
        let leaf = tree.insert(Blank, LayoutStyle::new()).unwrap();
        tree.add_child(root, leaf).unwrap();
        let err = tree.draw(root, &mut frame(8, 8), &at(0.0)).unwrap_err();
        assert!(matches!(err, UiError::Unmeasurable { node, widget: "blank" } if node == leaf));
        assert_eq!(tree.solve_count(), 0);

        // An explicit size needs no measure.
        tree.set_style(leaf, LayoutStyle::new().size(3.0, 3.0).flex_grow(0.0))
            .unwrap();
        tree.draw(root, &mut frame(8, 8), &at(0.0)).unwrap();
        assert_eq!(tree.get_box(leaf).unwrap().size(), pixelperfect_core::Size::new(3, 3));
    }

    #[test]
    fn test_widget_downcast() {
        let mut tree = LayoutTree::new();
        let node = tree.insert(ContainerNode::new(), LayoutStyle::new()).unwrap();
        assert!(tree.widget::<Carousel>(node).is_none());
        tree.widget_mut::<ContainerNode>(node).unwrap().background = RED;
        assert_eq!(tree.widget::<ContainerNode>(node).unwrap().background, RED);
        assert_eq!(tree.debug_name(node).unwrap(), "container");
    }

    #[test]
    fn test_frame_snapshot() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(6.0, 3.0).row())
            .unwrap();
        let bar = tree
            .insert(
                ContainerNode::new().background(Color::WHITE),
                LayoutStyle::new().size(2.0, 1.0).flex_grow(0.0).margin(1.0),
            )
            .unwrap();
        tree.add_child(root, bar).unwrap();
        let mut out = frame(6, 3);
        tree.draw(root, &mut out, &at(0.0)).unwrap();
        insta::assert_snapshot!(ascii(&out), @r"
        ......
        .##...
        ......
        ");
    }

    #[test]
    fn test_debug_border_drawn() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(4.0, 4.0))
            .unwrap();
        tree.set_debug_border(root, Some(Color::WHITE)).unwrap();
        let mut out = frame(4, 4);
        tree.draw(root, &mut out, &at(0.0)).unwrap();
        assert_eq!(out.get(0, 0), Some(Color::WHITE));
        assert_eq!(out.get(3, 3), Some(Color::WHITE));
        assert_eq!(out.get(1, 1), Some(Color::BLACK));
    }

    struct Rotation {
        tree: LayoutTree,
        root: NodeId,
        carousel: NodeId,
        panels: Vec<NodeId>,
    }

    fn rotation(panels: &[Color], door: Option<Rc<Cell<bool>>>) -> Rotation {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(16.0, 8.0))
            .unwrap();
        let mut carousel = Carousel::new().background(BLUE);
        let mut ids = Vec::new();
        for &color in panels {
            let id = tree
                .insert(ContainerNode::new().background(color), LayoutStyle::new())
                .unwrap();
            carousel.add_panel(ClosurePanel::new(id));
            ids.push(id);
        }
        if let Some(door) = door {
            let id = tree
                .insert(ContainerNode::new().background(Color::WHITE), LayoutStyle::new())
                .unwrap();
            let (visible, priority) = (door.clone(), door);
            carousel.add_panel(
                ClosurePanel::new(id)
                    .visible_when(move |_| visible.get())
                    .priority(move |_| if priority.get() { 10.0 } else { 0.0 }),
            );
            ids.push(id);
        }
        let node = tree.insert(carousel, LayoutStyle::new()).unwrap();
        tree.add_child(root, node).unwrap();
        Rotation {
            tree,
            root,
            carousel: node,
            panels: ids,
        }
    }

    #[test]
    fn test_carousel_rotates_by_slice() {
        let mut r = rotation(&[RED, GREEN], None);
        let mut out = frame(16, 8);
        for t in 0..15 {
            r.tree.draw(r.root, &mut out, &at(t as f64)).unwrap();
            let expected = if (5..10).contains(&t) { 1 } else { 0 };
            assert_eq!(r.tree.children(r.carousel).unwrap(), vec![r.panels[expected]], "t={t}");
            let color = if expected == 1 { GREEN } else { RED };
            assert_eq!(out.get(8, 4), Some(color), "t={t}");
        }
        // Initial layout plus the swaps at 5 and 10.
        assert_eq!(r.tree.solve_count(), 3);
    }

    #[test]
    fn test_carousel_same_slice_same_panel() {
        let mut r = rotation(&[RED, GREEN, BLUE], None);
        let mut out = frame(16, 8);
        r.tree.draw(r.root, &mut out, &at(12.0)).unwrap();
        let first = r.tree.children(r.carousel).unwrap();
        r.tree.draw(r.root, &mut out, &at(13.0)).unwrap();
        assert_eq!(r.tree.children(r.carousel).unwrap(), first);
        assert_eq!(first, vec![r.panels[2]]);
        assert_eq!(r.tree.solve_count(), 1);
    }

    #[test]
    fn test_priority_panel_preempts() {
        let door = Rc::new(Cell::new(false));
        let mut r = rotation(&[RED], Some(door.clone()));
        let mut out = frame(16, 8);

        r.tree.draw(r.root, &mut out, &at(0.0)).unwrap();
        assert_eq!(out.get(0, 0), Some(RED));

        door.set(true);
        r.tree.draw(r.root, &mut out, &at(1.0)).unwrap();
        assert_eq!(out.get(0, 0), Some(Color::WHITE));
        r.tree.draw(r.root, &mut out, &at(2.0)).unwrap();
        assert_eq!(r.tree.solve_count(), 2);

        door.set(false);
        r.tree.draw(r.root, &mut out, &at(3.0)).unwrap();
        assert_eq!(out.get(0, 0), Some(RED));
        assert_eq!(r.tree.solve_count(), 3);
        let active = r.tree.widget::<Carousel>(r.carousel).unwrap().active_drawable();
        assert_eq!(active, Some(r.panels[0]));
    }

    #[test]
    fn test_carousel_with_nothing_visible() {
        let door = Rc::new(Cell::new(false));
        let mut r = rotation(&[], Some(door));
        let mut out = frame(16, 8);
        r.tree.draw(r.root, &mut out, &at(0.0)).unwrap();
        assert!(r.tree.children(r.carousel).unwrap().is_empty());
        assert_eq!(out.get(8, 4), Some(BLUE));
        assert_eq!(r.tree.widget::<Carousel>(r.carousel).unwrap().active_panel(), None);
    }

    fn text_tree(policy: TextDirtyPolicy, text: Rc<RefCell<String>>, pulls: Rc<Cell<u32>>) -> (LayoutTree, NodeId) {
        let font = Arc::new(builtin_font());
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(ContainerNode::new(), LayoutStyle::new().size(32.0, 16.0))
            .unwrap();
        let node = TextNode::new(font, move |_| {
            pulls.set(pulls.get() + 1);
            text.borrow().clone()
        })
        .dirty_policy(policy);
        let label = tree
            .insert(node, LayoutStyle::new().flex_grow(0.0))
            .unwrap();
        tree.add_child(root, label).unwrap();
        (tree, root)
    }

    #[test]
    fn test_text_content_change_relayouts() {
        let text = Rc::new(RefCell::new("12".to_string()));
        let pulls = Rc::new(Cell::new(0));
        let (mut tree, root) = text_tree(TextDirtyPolicy::ContentChanged, text.clone(), pulls.clone());
        let mut out = frame(32, 16);
        tree.draw(root, &mut out, &at(0.0)).unwrap();
        *text.borrow_mut() = "34".into();
        tree.draw(root, &mut out, &at(1.0)).unwrap();
        assert_eq!(tree.solve_count(), 2);
        // One pull per frame, shared by measure and paint.
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_text_length_policy_ignores_same_length() {
        let text = Rc::new(RefCell::new("12".to_string()));
        let pulls = Rc::new(Cell::new(0));
        let (mut tree, root) = text_tree(TextDirtyPolicy::LengthChanged, text.clone(), pulls);
        let mut out = frame(32, 16);
        tree.draw(root, &mut out, &at(0.0)).unwrap();
        *text.borrow_mut() = "34".into();
        tree.draw(root, &mut out, &at(1.0)).unwrap();
        assert_eq!(tree.solve_count(), 1);
        *text.borrow_mut() = "345".into();
        tree.draw(root, &mut out, &at(2.0)).unwrap();
        assert_eq!(tree.solve_count(), 2);
    }

    #[test]
    fn test_text_label_sizes_to_content() {
        let text = Rc::new(RefCell::new("HI".to_string()));
        let (mut tree, root) = text_tree(TextDirtyPolicy::default(), text, Rc::new(Cell::new(0)));
        tree.draw(root, &mut frame(32, 16), &at(0.0)).unwrap();
        let label = tree.children(root).unwrap()[0];
        // Stretched across the column; one 6px line tall.
        assert_eq!(tree.get_box(label).unwrap(), ComputedBox::new(0, 0, 32, 6));
    }
}
