//! Spatial indexing for nearest-site lookups and vertex snapping

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for 2D spatial queries
///
/// Used by diagram repair (radius queries over boundary vertices) and by the
/// nearest-site surface (point-to-site lookups per pixel).
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    /// `None` when built from an empty point set
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
}

impl SpatialIndex {
    /// Build spatial index from points
    ///
    /// Item ids returned by queries are indices into `points`.
    ///
    /// # Example
    ///
    /// ```
    /// use shattered_glass::SpatialIndex;
    /// use glam::DVec2;
    ///
    /// let points = vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
    /// let index = SpatialIndex::new(&points);
    /// assert_eq!(index.find_nearest(DVec2::new(8.0, 1.0)), Some(1));
    /// ```
    pub fn new(points: &[DVec2]) -> Self {
        if points.is_empty() {
            return Self { tree: None, len: 0 };
        }

        let entries: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&entries)),
            len: points.len(),
        }
    }

    /// Number of indexed points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the index of the point nearest to `position`
    ///
    /// Returns `None` only for an empty index.
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }

    /// Find all points within `radius` of `position`, nearest first
    ///
    /// Points exactly `radius` away are included.
    pub fn within(&self, position: DVec2, radius: f64) -> Vec<usize> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };

        tree.within::<SquaredEuclidean>(&[position.x, position.y], radius * radius)
            .into_iter()
            .map(|neighbour| neighbour.item as usize)
            .collect()
    }
}
