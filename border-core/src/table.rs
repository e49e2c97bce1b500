use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cache::ShapePairKey;
use crate::error::Result;
use crate::geom::Point;

/// Rounds to one decimal, halves up, so regenerated tables stay byte-stable.
pub fn round1(v: f64) -> f64 {
    (v * 10.0 + 0.5).floor() / 10.0
}

/// Precomputed midpoints, serialized as a flat `{"i-j": {"x", "y"}}` object
/// ordered by pair. Loaded entries go through [`MidpointTable::insert`], so
/// they are rounded too; `"i-j"` and `"j-i"` in one table is an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MidpointTable {
    entries: BTreeMap<ShapePairKey, Point>,
}

impl MidpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `p` rounded to one decimal under the canonical key.
    pub fn insert(&mut self, key: ShapePairKey, p: Point) {
        self.entries.insert(
            key,
            Point {
                x: round1(p.x),
                y: round1(p.y),
            },
        );
    }

    pub fn get(&self, a: usize, b: usize) -> Option<Point> {
        self.entries.get(&ShapePairKey::new(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapePairKey, &Point)> {
        self.entries.iter()
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let mut s = serde_json::to_string_pretty(self)?;
        s.push('\n');
        Ok(s)
    }
}

impl<'de> Deserialize<'de> for MidpointTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Point>::deserialize(deserializer)?;
        let mut table = MidpointTable::new();
        for (k, p) in raw {
            let key: ShapePairKey = k.parse().map_err(D::Error::custom)?;
            if table.entries.contains_key(&key) {
                return Err(D::Error::custom(format!("pair {key} listed twice")));
            }
            table.insert(key, p);
        }
        Ok(table)
    }
}
