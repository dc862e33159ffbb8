use canvasflow_core::Node;
use canvasflow_core::geom::size;
use canvasflow_render::{Primitive, SceneOptions, Surface, assemble_scene};
use proptest::prelude::*;

fn node_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (
        -5000.0f64..5000.0,
        -5000.0f64..5000.0,
        1.0f64..800.0,
        1.0f64..800.0,
    )
}

proptest! {
    #[test]
    fn both_surfaces_put_every_node_at_its_model_position(
        raw in prop::collection::vec(node_strategy(), 1..12),
        vw in 100.0f64..3000.0,
        vh in 100.0f64..3000.0,
    ) {
        let nodes: Vec<Node> = raw
            .iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| Node::new(format!("n{i}"), *x, *y, *w, *h))
            .collect();
        let scene = assemble_scene(&nodes, &[], &SceneOptions::default());
        let vector = Surface::vector(scene.bounds);
        let sketch = Surface::sketch(scene.bounds, size(vw, vh), 5.0);

        prop_assert!(sketch.size.width >= scene.bounds.width());
        prop_assert!(sketch.size.height >= scene.bounds.height());

        for (p, n) in scene.primitives.iter().zip(&nodes) {
            let Primitive::Rect(r) = p else { unreachable!() };
            let a = vector.to_container(vector.to_local(r.rect.origin));
            let b = sketch.to_container(sketch.to_local(r.rect.origin));
            prop_assert!((a - b).length() < 1e-9);
            prop_assert!((a - n.position()).length() < 1e-6);
            // Nothing is drawn outside the layer.
            let local = vector.to_local(r.rect.origin);
            prop_assert!(local.x >= -1e-9 && local.y >= -1e-9);
        }
    }
}
