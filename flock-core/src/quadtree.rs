use crate::types::BoidId;
use glam::Vec2;

/// Maximum split depth of the tree.
///
/// Coincident points would otherwise force capacity-triggered splits
/// forever; a node at this depth stores points beyond its capacity
/// instead of subdividing.
const MAX_DEPTH: usize = 8;

/// An axis-aligned rectangle described by its center and half-extents.
///
/// Containment is inclusive on all four edges; intersection is the usual
/// separating-axis test. Invariant: `half.x >= 0` and `half.y >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Returns `true` if `point` lies within this rectangle (edges included).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.center.x - self.half.x
            && point.x <= self.center.x + self.half.x
            && point.y >= self.center.y - self.half.y
            && point.y <= self.center.y + self.half.y
    }

    /// Returns `true` unless `other` lies entirely outside this rectangle
    /// on at least one axis.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.center.x - other.half.x > self.center.x + self.half.x
            || other.center.x + other.half.x < self.center.x - self.half.x
            || other.center.y - other.half.y > self.center.y + self.half.y
            || other.center.y + other.half.y < self.center.y - self.half.y)
    }
}

/// A coordinate pair plus the id of the boid that produced it.
///
/// The id is a non-owning back-reference into `World::boids`; the index
/// stores no boid state of its own.
#[derive(Clone, Copy, Debug)]
pub struct IndexedPoint {
    pub pos: Vec2,
    pub boid: BoidId,
}

/// A node of the quad-tree spatial index.
///
/// The tree covers a fixed rectangular region and supports three
/// operations:
///
/// - [`QuadTree::insert`] — add one point, splitting eagerly when a node
///   exceeds its capacity.
/// - [`QuadTree::query`] — collect every stored point inside a rectangular
///   range, pruning subtrees whose boundary misses the range.
/// - [`QuadTree::clear`] — reset to a single empty node.
///
/// There is no deletion or point relocation: the index is cleared and
/// rebuilt from scratch every tick, so queries always run against a tree
/// built from current positions.
#[derive(Debug)]
pub struct QuadTree {
    boundary: Rect,
    capacity: usize,
    depth: usize,
    points: Vec<IndexedPoint>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// Creates an empty tree over `boundary`.
    ///
    /// `capacity` is the number of points a node holds before splitting;
    /// it is shared by every node of the tree.
    pub fn new(boundary: Rect, capacity: usize) -> Self {
        Self::with_depth(boundary, capacity, 0)
    }

    fn with_depth(boundary: Rect, capacity: usize, depth: usize) -> Self {
        Self {
            boundary,
            capacity,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    /// The region this node covers.
    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Inserts a point, returning `false` if it lies outside this node's
    /// boundary.
    ///
    /// A point outside the root boundary is therefore silently dropped;
    /// callers tolerate the miss rather than treating it as an error.
    ///
    /// An unsplit node with spare capacity stores the point locally.
    /// Inserting into a full node splits it first, redistributing its
    /// stored points into the children, and then routes the new point to
    /// the first child that accepts it (tried in NW, NE, SW, SE order).
    /// Nodes at [`MAX_DEPTH`] never split and store points beyond
    /// capacity instead.
    pub fn insert(&mut self, point: IndexedPoint) -> bool {
        if !self.boundary.contains(point.pos) {
            return false;
        }

        if let Some(children) = &mut self.children {
            return children.iter_mut().any(|child| child.insert(point));
        }

        if self.points.len() < self.capacity || self.depth >= MAX_DEPTH {
            self.points.push(point);
            return true;
        }

        self.subdivide().iter_mut().any(|child| child.insert(point))
    }

    /// Splits this node into four children quartering its boundary and
    /// moves the locally stored points down into them.
    fn subdivide(&mut self) -> &mut [QuadTree; 4] {
        let Rect { center, half } = self.boundary;
        let quarter = half * 0.5;
        let capacity = self.capacity;
        let depth = self.depth + 1;

        let child = |dx: f32, dy: f32| {
            Self::with_depth(
                Rect::new(center + Vec2::new(dx, dy), quarter),
                capacity,
                depth,
            )
        };

        let children = self.children.insert(Box::new([
            child(-quarter.x, -quarter.y), // NW
            child(quarter.x, -quarter.y),  // NE
            child(-quarter.x, quarter.y),  // SW
            child(quarter.x, quarter.y),   // SE
        ]));

        // A split node keeps no local points; every drained point was
        // inside the parent, so some child accepts it.
        for point in std::mem::take(&mut self.points) {
            children.iter_mut().any(|child| child.insert(point));
        }

        children
    }

    /// Collects every stored point inside `range` into `found`.
    ///
    /// Subtrees whose boundary does not intersect `range` are pruned
    /// without being visited. `found` is not cleared first, so callers can
    /// reuse one allocation across many queries; result order carries no
    /// meaning.
    pub fn query(&self, range: &Rect, found: &mut Vec<IndexedPoint>) {
        if !self.boundary.intersects(range) {
            return;
        }

        for point in &self.points {
            if range.contains(point.pos) {
                found.push(*point);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, found);
            }
        }
    }

    /// Resets the tree to a single unsplit node with no points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }

    /// Calls `visit` with the boundary and depth of every node, parents
    /// before children. Used by the view layer to overlay the tree.
    pub fn visit_boundaries(&self, visit: &mut impl FnMut(Rect, usize)) {
        visit(self.boundary, self.depth);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.visit_boundaries(visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn point(x: f32, y: f32, boid: BoidId) -> IndexedPoint {
        IndexedPoint {
            pos: Vec2::new(x, y),
            boid,
        }
    }

    fn query_ids(tree: &QuadTree, range: &Rect) -> Vec<BoidId> {
        let mut found = Vec::new();
        tree.query(range, &mut found);
        let mut ids: Vec<BoidId> = found.iter().map(|p| p.boid).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn rect_contains_is_inclusive_on_edges() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(-10.0, 10.0)));
        assert!(rect.contains(Vec2::new(0.0, -10.0)));
        assert!(!rect.contains(Vec2::new(10.001, 0.0)));
        assert!(!rect.contains(Vec2::new(0.0, -10.001)));
    }

    #[test]
    fn rect_intersects_uses_separating_axis() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

        // Overlapping, touching, and disjoint on each axis.
        assert!(rect.intersects(&Rect::new(Vec2::new(15.0, 0.0), Vec2::new(6.0, 6.0))));
        assert!(rect.intersects(&Rect::new(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0))));
        assert!(!rect.intersects(&Rect::new(Vec2::new(25.0, 0.0), Vec2::new(4.0, 4.0))));
        assert!(!rect.intersects(&Rect::new(Vec2::new(0.0, -30.0), Vec2::new(10.0, 5.0))));
    }

    #[test]
    fn insert_rejects_points_outside_the_root_boundary() {
        let mut tree = QuadTree::new(Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0)), 4);

        assert!(!tree.insert(point(11.0, 0.0, 0)));
        assert!(tree.insert(point(10.0, 10.0, 1)));

        let ids = query_ids(&tree, &Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)));
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn capacity_overflow_splits_once_and_redistributes() {
        let mut tree = QuadTree::new(Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0)), 4);

        // One point per quadrant plus a fifth to trigger the split.
        let pts = [
            point(-5.0, -5.0, 0),
            point(5.0, -5.0, 1),
            point(-5.0, 5.0, 2),
            point(5.0, 5.0, 3),
            point(-2.0, -2.0, 4),
        ];
        for p in pts {
            assert!(tree.insert(p));
        }

        assert!(tree.children.is_some());
        assert!(
            tree.points.is_empty(),
            "a split node must hold no local points"
        );

        let children = tree.children.as_ref().unwrap();
        let child_total: usize = children.iter().map(|c| c.points.len()).sum();
        assert_eq!(child_total, 5);
        for child in children.iter() {
            assert!(child.children.is_none(), "one overflow splits one level");
        }

        let ids = query_ids(&tree, &Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0)));
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn children_quarter_the_parent_boundary() {
        let mut tree = QuadTree::new(Rect::new(Vec2::new(4.0, 4.0), Vec2::new(8.0, 8.0)), 1);
        tree.insert(point(0.0, 0.0, 0));
        tree.insert(point(6.0, 6.0, 1));

        let children = tree.children.as_ref().unwrap();
        let expected_centers = [
            Vec2::new(0.0, 0.0), // NW
            Vec2::new(8.0, 0.0), // NE
            Vec2::new(0.0, 8.0), // SW
            Vec2::new(8.0, 8.0), // SE
        ];
        for (child, expected) in children.iter().zip(expected_centers) {
            assert_eq!(child.boundary.center, expected);
            assert_eq!(child.boundary.half, Vec2::new(4.0, 4.0));
        }
    }

    #[test]
    fn query_matches_brute_force_filtering() {
        let bounds = Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        let mut tree = QuadTree::new(bounds, 4);
        let mut rng = StdRng::seed_from_u64(42);

        let points: Vec<IndexedPoint> = (0..200)
            .map(|boid| IndexedPoint {
                pos: Vec2::new(rng.random_range(0.0..=100.0), rng.random_range(0.0..=100.0)),
                boid,
            })
            .collect();
        for p in &points {
            assert!(tree.insert(*p));
        }

        let ranges = [
            Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)),
            Rect::new(Vec2::new(20.0, 70.0), Vec2::new(15.0, 10.0)),
            Rect::new(Vec2::new(90.0, 10.0), Vec2::new(25.0, 25.0)),
            Rect::new(Vec2::new(-50.0, -50.0), Vec2::new(10.0, 10.0)),
        ];

        for range in &ranges {
            let mut expected: Vec<BoidId> = points
                .iter()
                .filter(|p| range.contains(p.pos))
                .map(|p| p.boid)
                .collect();
            expected.sort_unstable();

            assert_eq!(query_ids(&tree, range), expected);
        }
    }

    #[test]
    fn rebuild_from_the_same_points_yields_identical_query_sets() {
        let bounds = Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        let mut tree = QuadTree::new(bounds, 4);
        let mut rng = StdRng::seed_from_u64(7);

        let points: Vec<IndexedPoint> = (0..100)
            .map(|boid| IndexedPoint {
                pos: Vec2::new(rng.random_range(0.0..=100.0), rng.random_range(0.0..=100.0)),
                boid,
            })
            .collect();
        for p in &points {
            tree.insert(*p);
        }

        let range = Rect::new(Vec2::new(40.0, 60.0), Vec2::new(20.0, 20.0));
        let before = query_ids(&tree, &range);

        tree.clear();
        assert!(tree.children.is_none());
        assert!(query_ids(&tree, &bounds).is_empty());

        for p in &points {
            tree.insert(*p);
        }
        assert_eq!(query_ids(&tree, &range), before);
    }

    #[test]
    fn coincident_points_stop_splitting_at_the_depth_cap() {
        let bounds = Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        let mut tree = QuadTree::new(bounds, 1);

        // Identical coordinates can never be separated by subdividing;
        // without the depth cap this would recurse forever.
        for boid in 0..20 {
            assert!(tree.insert(point(5.0, 5.0, boid)));
        }

        let ids = query_ids(&tree, &Rect::new(Vec2::new(5.0, 5.0), Vec2::new(1.0, 1.0)));
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }
}
