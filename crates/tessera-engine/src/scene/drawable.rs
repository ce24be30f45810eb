use super::{SortKey, ZIndex};

/// One independently ordered layer of a drawable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerSlot {
    pub z: ZIndex,
    pub visible: bool,
}

/// Participant in frame composition.
///
/// A drawable may contribute several layers at different depths (a tilemap draws its
/// ground below sprites and its upper layer above them). The traversal calls
/// `before_composite` for every visible layer in back-to-front order, then
/// `composite` in the same order.
pub trait Drawable {
    fn layers(&self) -> Vec<LayerSlot>;

    /// Prepares state for `layer`, e.g. rebuilds dirty buffers.
    fn before_composite(&mut self, layer: usize);

    /// Issues the draw for `layer`.
    fn composite(&mut self, layer: usize);
}

/// Composites one frame of `drawables`.
pub fn composite_frame(drawables: &mut [&mut dyn Drawable]) {
    let order = paint_order(drawables);
    for &(d, layer) in &order {
        drawables[d].before_composite(layer);
    }
    for &(d, layer) in &order {
        drawables[d].composite(layer);
    }
}

/// (drawable index, layer index) pairs, back to front. Hidden layers are skipped.
pub fn paint_order(drawables: &[&mut dyn Drawable]) -> Vec<(usize, usize)> {
    let mut keyed = Vec::new();
    let mut next = 0u32;
    for (d, drawable) in drawables.iter().enumerate() {
        for (layer, slot) in drawable.layers().into_iter().enumerate() {
            let key = SortKey::for_layer(&slot, next);
            next = next.wrapping_add(1);
            if slot.visible {
                keyed.push((key, d, layer));
            }
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, d, layer)| (d, layer)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        slots: Vec<LayerSlot>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drawable for Probe {
        fn layers(&self) -> Vec<LayerSlot> {
            self.slots.clone()
        }

        fn before_composite(&mut self, layer: usize) {
            self.log.borrow_mut().push(format!("prepare {}{layer}", self.name));
        }

        fn composite(&mut self, layer: usize) {
            self.log.borrow_mut().push(format!("draw {}{layer}", self.name));
        }
    }

    fn slot(z: i32) -> LayerSlot {
        LayerSlot { z: ZIndex(z), visible: true }
    }

    #[test]
    fn layers_interleave_by_z_then_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut map = Probe { name: "map", slots: vec![slot(0), slot(200)], log: Rc::clone(&log) };
        let mut sprite = Probe { name: "sprite", slots: vec![slot(100)], log: Rc::clone(&log) };
        let mut shadow = Probe { name: "shadow", slots: vec![slot(0)], log: Rc::clone(&log) };

        composite_frame(&mut [&mut map, &mut sprite, &mut shadow]);

        assert_eq!(
            *log.borrow(),
            [
                "prepare map0", "prepare shadow0", "prepare sprite0", "prepare map1",
                "draw map0", "draw shadow0", "draw sprite0", "draw map1",
            ]
        );
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut map = Probe {
            name: "map",
            slots: vec![slot(0), LayerSlot { z: ZIndex(200), visible: false }],
            log: Rc::clone(&log),
        };
        composite_frame(&mut [&mut map]);
        assert_eq!(*log.borrow(), ["prepare map0", "draw map0"]);
    }

    struct Fixed(Vec<LayerSlot>);

    impl Drawable for Fixed {
        fn layers(&self) -> Vec<LayerSlot> {
            self.0.clone()
        }

        fn before_composite(&mut self, _: usize) {}

        fn composite(&mut self, _: usize) {}
    }

    proptest! {
        #[test]
        fn paint_order_is_sorted_and_stable(
            layers in proptest::collection::vec(
                proptest::collection::vec((-3i32..3, any::<bool>()), 0..4),
                0..6,
            ),
        ) {
            let mut fixed: Vec<Fixed> = layers
                .iter()
                .map(|slots| Fixed(slots.iter().map(|&(z, visible)| LayerSlot { z: ZIndex(z), visible }).collect()))
                .collect();
            let mut refs: Vec<&mut dyn Drawable> = fixed.iter_mut().map(|f| f as &mut dyn Drawable).collect();
            let order = paint_order(&refs);

            let visible = layers.iter().flatten().filter(|(_, v)| *v).count();
            prop_assert_eq!(order.len(), visible);
            for pair in order.windows(2) {
                let (a, b) = (layers[pair[0].0][pair[0].1], layers[pair[1].0][pair[1].1]);
                prop_assert!(a.0 < b.0 || (a.0 == b.0 && pair[0] < pair[1]));
            }
            composite_frame(&mut refs);
        }
    }
}
