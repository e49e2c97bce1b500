use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BorderError, Result};
use crate::estimator::BorderEstimator;
use crate::geom::{Point, Shape};
use crate::table::MidpointTable;

/// Unordered pair of shape ids, stored as `(min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapePairKey {
    lo: usize,
    hi: usize,
}

impl ShapePairKey {
    pub fn new(a: usize, b: usize) -> Self {
        ShapePairKey {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> usize {
        self.lo
    }

    pub fn hi(&self) -> usize {
        self.hi
    }
}

impl fmt::Display for ShapePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl FromStr for ShapePairKey {
    type Err = BorderError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || BorderError::InvalidPairKey(value.to_string());
        let (a, b) = value.trim().split_once('-').ok_or_else(bad)?;
        let a = a.trim().parse::<usize>().map_err(|_| bad())?;
        let b = b.trim().parse::<usize>().map_err(|_| bad())?;
        Ok(ShapePairKey::new(a, b))
    }
}

impl Serialize for ShapePairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapePairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Border midpoints by unordered shape pair. Entries are geometric
/// constants: once stored they are never recomputed.
#[derive(Clone, Debug, Default)]
pub struct MidpointCache {
    entries: HashMap<ShapePairKey, Point>,
}

impl MidpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with a precomputed table.
    pub fn from_table(table: &MidpointTable) -> Self {
        Self {
            entries: table.iter().map(|(k, p)| (*k, *p)).collect(),
        }
    }

    pub fn get(&self, a: usize, b: usize) -> Option<Point> {
        self.entries.get(&ShapePairKey::new(a, b)).copied()
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.entries.contains_key(&ShapePairKey::new(a, b))
    }

    /// Returns the stored midpoint, computing it with `compute(lo, hi)` on
    /// the first request. Errors are passed through and nothing is stored.
    pub fn get_or_insert_with<F>(&mut self, a: usize, b: usize, compute: F) -> Result<Point>
    where
        F: FnOnce(usize, usize) -> Result<Point>,
    {
        let key = ShapePairKey::new(a, b);
        if let Some(p) = self.entries.get(&key) {
            return Ok(*p);
        }
        let p = compute(key.lo, key.hi)?;
        self.entries.insert(key, p);
        Ok(p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Midpoints do not depend on coloring state, so a
    /// session reset does not need this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapePairKey, &Point)> {
        self.entries.iter()
    }

    pub fn to_table(&self) -> MidpointTable {
        let mut table = MidpointTable::new();
        for (k, p) in &self.entries {
            table.insert(*k, *p);
        }
        table
    }
}

/// Session object answering "where does the conflict marker for this pair
/// go". Owns the shapes, the chosen estimator and the cache.
pub struct BorderMarkers {
    shapes: Vec<Shape>,
    estimator: Box<dyn BorderEstimator>,
    cache: MidpointCache,
}

impl BorderMarkers {
    pub fn new(shapes: Vec<Shape>, estimator: Box<dyn BorderEstimator>) -> Self {
        Self {
            shapes,
            estimator,
            cache: MidpointCache::new(),
        }
    }

    pub fn with_cache(mut self, cache: MidpointCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn cache(&self) -> &MidpointCache {
        &self.cache
    }

    pub fn into_cache(self) -> MidpointCache {
        self.cache
    }

    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// Border midpoint for shapes `a` and `b`, estimated at most once per
    /// unordered pair.
    pub fn midpoint(&mut self, a: usize, b: usize) -> Result<Point> {
        let shapes = &self.shapes;
        let estimator = &self.estimator;
        self.cache.get_or_insert_with(a, b, |lo, hi| {
            let sa = shape_at(shapes, lo)?;
            let sb = shape_at(shapes, hi)?;
            log::debug!("estimating border {lo}-{hi} ({})", estimator.name());
            estimator.estimate(sa, sb)
        })
    }
}

fn shape_at(shapes: &[Shape], id: usize) -> Result<&Shape> {
    let s = shapes.get(id).ok_or(BorderError::UnknownShape(id))?;
    if s.is_empty() {
        return Err(BorderError::empty(format!("#{id}")));
    }
    Ok(s)
}

/// Endpoints of the two diagonal strokes of a conflict marker cross.
pub fn marker_segments(center: Point, half_len: f64) -> [(Point, Point); 2] {
    let Point { x, y } = center;
    [
        (
            Point::new(x - half_len, y - half_len),
            Point::new(x + half_len, y + half_len),
        ),
        (
            Point::new(x - half_len, y + half_len),
            Point::new(x + half_len, y - half_len),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_path;
    use crate::sampler::Outline;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        calls: Rc<Cell<usize>>,
    }

    impl BorderEstimator for Counting {
        fn estimate(&self, _a: &dyn Outline, _b: &dyn Outline) -> Result<Point> {
            self.calls.set(self.calls.get() + 1);
            Ok(Point::new(self.calls.get() as f64, 0.0))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn squares() -> Vec<Shape> {
        vec![
            parse_path("M0 0 L1 0 L1 1 L0 1 Z"),
            parse_path("M1 0 L2 0 L2 1 L1 1 Z"),
            parse_path("M0 1 L1 1 L1 2 L0 2 Z"),
        ]
    }

    #[test]
    fn key_is_commutative() {
        assert_eq!(ShapePairKey::new(3, 12), ShapePairKey::new(12, 3));
        assert_eq!(ShapePairKey::new(12, 3).to_string(), "3-12");
        assert_eq!("12-3".parse::<ShapePairKey>().unwrap(), ShapePairKey::new(3, 12));
    }

    #[test]
    fn key_ordering_is_numeric() {
        assert!(ShapePairKey::new(2, 3) < ShapePairKey::new(10, 11));
    }

    #[test]
    fn bad_keys_are_rejected() {
        for s in ["", "3", "a-b", "3-", "-3", "1-2-3"] {
            assert!(s.parse::<ShapePairKey>().is_err(), "{s}");
        }
    }

    #[test]
    fn estimator_runs_once_per_pair() {
        let calls = Rc::new(Cell::new(0));
        let mut markers = BorderMarkers::new(
            squares(),
            Box::new(Counting {
                calls: calls.clone(),
            }),
        );
        let first = markers.midpoint(0, 1).unwrap();
        let again = markers.midpoint(1, 0).unwrap();
        assert_eq!(first, again);
        assert_eq!(calls.get(), 1);
        markers.midpoint(0, 2).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(markers.cache().len(), 2);
    }

    #[test]
    fn seeded_cache_skips_estimator() {
        let calls = Rc::new(Cell::new(0));
        let mut table = MidpointTable::new();
        table.insert(ShapePairKey::new(0, 1), Point::new(1.0, 0.5));
        let mut markers = BorderMarkers::new(
            squares(),
            Box::new(Counting {
                calls: calls.clone(),
            }),
        )
        .with_cache(MidpointCache::from_table(&table));
        assert_eq!(markers.midpoint(1, 0).unwrap(), Point::new(1.0, 0.5));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unknown_and_empty_shapes_fail_without_caching() {
        let calls = Rc::new(Cell::new(0));
        let mut shapes = squares();
        shapes.push(parse_path("M 1"));
        let mut markers = BorderMarkers::new(
            shapes,
            Box::new(Counting {
                calls: calls.clone(),
            }),
        );
        assert!(matches!(
            markers.midpoint(0, 9),
            Err(BorderError::UnknownShape(9))
        ));
        assert!(matches!(
            markers.midpoint(3, 0),
            Err(BorderError::EmptyShape { .. })
        ));
        assert_eq!(calls.get(), 0);
        assert!(markers.cache().is_empty());
    }

    #[test]
    fn compute_errors_are_not_stored() {
        let mut cache = MidpointCache::new();
        let r = cache.get_or_insert_with(1, 2, |_, _| Err(BorderError::UnknownShape(2)));
        assert!(r.is_err());
        assert!(!cache.contains(2, 1));
        let p = cache
            .get_or_insert_with(2, 1, |lo, hi| {
                assert_eq!((lo, hi), (1, 2));
                Ok(Point::new(4.0, 4.0))
            })
            .unwrap();
        assert_eq!(p, Point::new(4.0, 4.0));
        assert_eq!(cache.get(1, 2), Some(p));
    }

    #[test]
    fn cache_exports_rounded_table_and_clears() {
        let mut cache = MidpointCache::new();
        cache
            .get_or_insert_with(4, 1, |_, _| Ok(Point::new(1.26, -0.04)))
            .unwrap();
        cache
            .get_or_insert_with(0, 2, |_, _| Ok(Point::new(10.0, 2.25)))
            .unwrap();
        let table = cache.to_table();
        let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["0-2", "1-4"]);
        assert_eq!(table.get(4, 1), Some(Point::new(1.3, 0.0)));
        assert_eq!(table.get(2, 0), Some(Point::new(10.0, 2.3)));
        // the cache itself keeps full precision
        assert_eq!(cache.get(1, 4), Some(Point::new(1.26, -0.04)));
        assert_eq!(MidpointCache::from_table(&table).len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(1, 4), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn marker_cross_is_centered() {
        let [(a0, a1), (b0, b1)] = marker_segments(Point::new(10.0, 20.0), 3.0);
        assert_eq!(a0.midpoint(a1), Point::new(10.0, 20.0));
        assert_eq!(b0.midpoint(b1), Point::new(10.0, 20.0));
        assert_eq!(a0, Point::new(7.0, 17.0));
        assert_eq!(b1, Point::new(13.0, 17.0));
    }
}
