//! 2D k-d tree for spatial indexing
//!
//! Provides O(log n) nearest-neighbor, k-nearest-neighbor and radius
//! queries. Used by the point-based neighbor builders and by point pattern
//! analysis (nearest-neighbor distances, K and L functions).
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use std::cmp::Ordering;

use super::Point;

/// A balanced 2D k-d tree.
///
/// Nodes live in an arena; children are arena indices. Points keep their
/// input order, so `Neighbor::index` refers to the slice passed to `build`.
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    points: Vec<Point>,
}

/// A tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct KdNode {
    /// Index of the point in the input slice
    pub index: usize,
    pub point: Point,
    /// Split axis: 0 = x, 1 = y
    pub axis: usize,
    /// Splitting coordinate along `axis`
    pub split: f64,
    left: Option<usize>,
    right: Option<usize>,
}

/// Result of a neighbor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub point: Point,
    pub distance: f64,
}

impl KdTree {
    /// Build a k-d tree from points.
    ///
    /// Construction is O(n log² n): every level sorts its slice along the
    /// level's axis and splits at the median.
    pub fn build(points: &[Point]) -> Self {
        let points = points.to_vec();
        let mut nodes = Vec::with_capacity(points.len());

        if !points.is_empty() {
            let mut indices: Vec<usize> = (0..points.len()).collect();
            build_recursive(&points, &mut indices, 0, &mut nodes);
        }

        Self { nodes, points }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Root node, `None` for an empty tree.
    pub fn root(&self) -> Option<&KdNode> {
        self.nodes.first()
    }

    pub fn left_of(&self, node: &KdNode) -> Option<&KdNode> {
        node.left.map(|i| &self.nodes[i])
    }

    pub fn right_of(&self, node: &KdNode) -> Option<&KdNode> {
        node.right.map(|i| &self.nodes[i])
    }

    /// Find the single nearest point to `query`.
    ///
    /// Returns `None` if the tree is empty.
    pub fn nearest(&self, query: Point) -> Option<Neighbor> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best_dist_sq = f64::MAX;
        let mut best_idx = 0;
        self.nearest_recursive(0, &query, &mut best_dist_sq, &mut best_idx);

        Some(self.neighbor(best_idx, best_dist_sq))
    }

    /// Find the `k` nearest points to `query`, sorted by ascending distance.
    ///
    /// `k` larger than the tree is clamped to its size.
    pub fn knn(&self, query: Point, k: usize) -> Vec<Neighbor> {
        let k = k.min(self.len());
        if k == 0 {
            return Vec::new();
        }

        // Candidates sorted descending by distance; heap[0] is the k-th best
        let mut heap: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        self.knn_recursive(0, &query, k, &mut heap);

        heap.iter()
            .rev()
            .map(|&(dist_sq, idx)| self.neighbor(idx, dist_sq))
            .collect()
    }

    /// Find all points within `radius` of `query`, sorted by ascending distance.
    pub fn radius_search(&self, query: Point, radius: f64) -> Vec<Neighbor> {
        if self.nodes.is_empty() || radius < 0.0 {
            return Vec::new();
        }

        let radius_sq = radius * radius;
        let mut found = Vec::new();
        self.radius_recursive(0, &query, radius_sq, &mut found);

        found.sort_by(|a: &(f64, usize), b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        found
            .into_iter()
            .map(|(dist_sq, idx)| self.neighbor(idx, dist_sq))
            .collect()
    }

    fn neighbor(&self, idx: usize, dist_sq: f64) -> Neighbor {
        Neighbor {
            index: idx,
            point: self.points[idx],
            distance: dist_sq.sqrt(),
        }
    }

    /// Signed offset from the node's splitting plane and the near/far children.
    fn sides(node: &KdNode, query: &Point) -> (f64, Option<usize>, Option<usize>) {
        let diff = query.coord(node.axis) - node.split;
        if diff < 0.0 {
            (diff, node.left, node.right)
        } else {
            (diff, node.right, node.left)
        }
    }

    fn nearest_recursive(
        &self,
        node_idx: usize,
        query: &Point,
        best_dist_sq: &mut f64,
        best_idx: &mut usize,
    ) {
        let node = &self.nodes[node_idx];
        let dist_sq = node.point.dist_sq(query);

        if dist_sq < *best_dist_sq {
            *best_dist_sq = dist_sq;
            *best_idx = node.index;
        }

        let (diff, near, far) = Self::sides(node, query);

        if let Some(child) = near {
            self.nearest_recursive(child, query, best_dist_sq, best_idx);
        }

        // The far side can only help if the splitting plane is closer than the best
        if diff * diff < *best_dist_sq {
            if let Some(child) = far {
                self.nearest_recursive(child, query, best_dist_sq, best_idx);
            }
        }
    }

    fn knn_recursive(&self, node_idx: usize, query: &Point, k: usize, heap: &mut Vec<(f64, usize)>) {
        let node = &self.nodes[node_idx];
        let dist_sq = node.point.dist_sq(query);

        if heap.len() < k || dist_sq < heap[0].0 {
            if heap.len() >= k {
                heap.remove(0);
            }
            let pos = heap
                .binary_search_by(|probe| {
                    probe
                        .0
                        .partial_cmp(&dist_sq)
                        .unwrap_or(Ordering::Equal)
                        .reverse()
                })
                .unwrap_or_else(|e| e);
            heap.insert(pos, (dist_sq, node.index));
        }

        let (diff, near, far) = Self::sides(node, query);

        if let Some(child) = near {
            self.knn_recursive(child, query, k, heap);
        }

        let threshold = if heap.len() >= k { heap[0].0 } else { f64::MAX };
        if diff * diff < threshold {
            if let Some(child) = far {
                self.knn_recursive(child, query, k, heap);
            }
        }
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        query: &Point,
        radius_sq: f64,
        found: &mut Vec<(f64, usize)>,
    ) {
        let node = &self.nodes[node_idx];
        let dist_sq = node.point.dist_sq(query);

        if dist_sq <= radius_sq {
            found.push((dist_sq, node.index));
        }

        let (diff, near, far) = Self::sides(node, query);

        if let Some(child) = near {
            self.radius_recursive(child, query, radius_sq, found);
        }
        if diff * diff <= radius_sq {
            if let Some(child) = far {
                self.radius_recursive(child, query, radius_sq, found);
            }
        }
    }
}

/// Recursively build the tree, returning the arena index of the subtree root.
fn build_recursive(
    points: &[Point],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let n = indices.len();
    let axis = depth % 2;

    // Stable sort keeps input order among equal coordinates
    indices.sort_by(|&a, &b| {
        points[a]
            .coord(axis)
            .partial_cmp(&points[b].coord(axis))
            .unwrap_or(Ordering::Equal)
    });

    let median = n / 2;
    let index = indices[median];
    let point = points[index];

    let node_idx = nodes.len();
    nodes.push(KdNode {
        index,
        point,
        axis,
        split: point.coord(axis),
        left: None,
        right: None,
    });

    if median > 0 {
        let left_idx = build_recursive(points, &mut indices[..median], depth + 1, nodes);
        nodes[node_idx].left = Some(left_idx);
    }

    if median + 1 < n {
        let right_idx = build_recursive(points, &mut indices[median + 1..], depth + 1, nodes);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}
