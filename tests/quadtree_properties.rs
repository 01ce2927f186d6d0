use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quadflock::{Rectangle, SpatialIndex, SpatialNode};

fn world() -> Rectangle {
    Rectangle::new(-200.0, -100.0, 200.0, 100.0)
}

fn random_points(rng: &mut StdRng, count: usize, bounds: &Rectangle) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(bounds.min_x()..=bounds.max_x()),
                rng.gen_range(bounds.min_y()..=bounds.max_y()),
            )
        })
        .collect()
}

fn build(points: &[Vec2], capacity: usize) -> SpatialIndex<usize> {
    let mut index = SpatialIndex::new(world(), capacity);
    let rejected = index.rebuild(points.iter().copied().enumerate());
    assert_eq!(rejected, 0);
    index
}

fn brute_force(points: &[Vec2], center: Vec2, radius: f32) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.distance(center) <= radius)
        .map(|(i, _)| i)
        .collect()
}

fn children_inside(node: &SpatialNode<usize>) -> bool {
    match node.children() {
        None => true,
        Some(children) => children
            .iter()
            .all(|child| node.bounds().contains_bounds(child.bounds()) && children_inside(child)),
    }
}

#[test]
fn circle_queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(0xB01D);
    for round in 0..20 {
        let count = 50 + round * 40;
        let capacity = 1 + round % 6;
        let points = random_points(&mut rng, count, &world());
        let index = build(&points, capacity);

        for _ in 0..50 {
            let center = Vec2::new(rng.gen_range(-260.0..260.0), rng.gen_range(-160.0..160.0));
            let radius = rng.gen_range(0.0..80.0);
            let mut found = index.query_circle(center, radius);
            found.sort_unstable();
            assert_eq!(found, brute_force(&points, center, radius));
        }
    }
}

#[test]
fn leaves_hold_exactly_what_was_inserted() {
    let mut rng = StdRng::seed_from_u64(42);
    let points = random_points(&mut rng, 1_000, &world());
    let index = build(&points, 4);

    let mut stored: Vec<usize> = index
        .leaves()
        .flat_map(|leaf| leaf.points().iter().map(|e| e.item))
        .collect();
    stored.sort_unstable();
    assert_eq!(stored, (0..points.len()).collect::<Vec<_>>());
    assert_eq!(index.len(), points.len());

    // Internal nodes never keep entries of their own
    assert!(index
        .nodes()
        .filter(|n| n.is_divided())
        .all(|n| n.points().is_empty()));

    // Every entry sits in a leaf whose bounds contain it
    for leaf in index.leaves() {
        for entry in leaf.points() {
            assert!(leaf.bounds().contains(entry.position));
        }
    }
}

#[test]
fn children_are_contained_in_their_parents() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = random_points(&mut rng, 2_000, &world());
    let index = build(&points, 3);
    assert!(index.root().is_divided());
    assert!(children_inside(index.root()));
}

#[test]
fn enclosing_circle_returns_every_item_once() {
    let mut rng = StdRng::seed_from_u64(99);
    let points = random_points(&mut rng, 777, &world());
    let index = build(&points, 5);
    let bounds = world();
    let radius = bounds.width().hypot(bounds.height());
    let mut found = index.query_circle(bounds.center(), radius);
    assert_eq!(found.len(), points.len());
    found.sort_unstable();
    found.dedup();
    assert_eq!(found.len(), points.len());
}

#[test]
fn clearing_twice_leaves_one_empty_leaf() {
    let mut rng = StdRng::seed_from_u64(1);
    let points = random_points(&mut rng, 300, &world());
    let mut index = build(&points, 2);
    index.clear();
    index.clear();
    assert_eq!(index.node_count(), 1);
    assert!(index.root().is_leaf());
    assert!(index.root().points().is_empty());
    assert_eq!(index.bounds(), &world());
    assert!(index.query_circle(Vec2::ZERO, 1_000.0).is_empty());
}

#[test]
fn points_on_the_world_edge_are_indexed() {
    let bounds = world();
    let corners = vec![
        bounds.min(),
        bounds.max(),
        Vec2::new(bounds.min_x(), bounds.max_y()),
        Vec2::new(bounds.max_x(), bounds.min_y()),
        bounds.center(),
        Vec2::new(bounds.center().x, bounds.max_y()),
    ];
    let index = build(&corners, 1);
    for (i, p) in corners.iter().enumerate() {
        assert!(index.query_circle(*p, 0.0).contains(&i));
    }
}
