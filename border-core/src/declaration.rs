//! Static map declaration consumed by the offline table builder.
//!
//! ```json
//! {
//!   "regions": [{ "name": "North", "d": "M0 0 L10 0 ..." }, ...],
//!   "adjacency": [[0, 1], [1, 2]],
//!   "estimator": { "strategy": "dense", "match_threshold": 5.0 }
//! }
//! ```
//!
//! A region's id is its position in `regions`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cache::{BorderMarkers, ShapePairKey};
use crate::error::{BorderError, Result};
use crate::estimator::{EstimatorConfig, Strategy};
use crate::geom::Shape;
use crate::path::parse_path;
use crate::table::MidpointTable;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Region {
    pub name: Option<String>,
    /// Path description of the outline.
    pub d: String,
}

/// Strategy plus optional overrides of its preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSpec {
    #[serde(default)]
    pub strategy: Strategy,
    pub samples: Option<usize>,
    pub match_threshold: Option<f64>,
    pub run_gap: Option<f64>,
    pub centroid_snap: Option<f64>,
}

impl EstimatorSpec {
    pub fn config(&self) -> EstimatorConfig {
        let mut c = self.strategy.preset();
        if let Some(v) = self.samples {
            c = c.with_samples(v);
        }
        if let Some(v) = self.match_threshold {
            c = c.with_match_threshold(v);
        }
        if let Some(v) = self.run_gap {
            c = c.with_run_gap(v);
        }
        if let Some(v) = self.centroid_snap {
            c = c.with_centroid_snap(v);
        }
        c
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapDeclaration {
    pub regions: Vec<Region>,
    #[serde(default)]
    pub adjacency: Vec<[usize; 2]>,
    #[serde(default)]
    pub estimator: EstimatorSpec,
}

impl MapDeclaration {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.regions.iter().map(|r| parse_path(&r.d)).collect()
    }

    pub fn region_label(&self, id: usize) -> String {
        match self.regions.get(id).and_then(|r| r.name.as_deref()) {
            Some(name) => format!("#{id} ({name})"),
            None => format!("#{id}"),
        }
    }

    /// Rejects adjacency entries that point past `regions` or pair a
    /// region with itself.
    pub fn validate(&self) -> Result<()> {
        let n = self.regions.len();
        for (index, &[a, b]) in self.adjacency.iter().enumerate() {
            let reason = if a >= n || b >= n {
                "unknown region"
            } else if a == b {
                "region paired with itself"
            } else {
                continue;
            };
            return Err(BorderError::InvalidAdjacency {
                index,
                a,
                b,
                reason,
            });
        }
        Ok(())
    }

    /// Canonical pairs in declaration order, duplicates and reversed
    /// duplicates removed.
    pub fn unique_pairs(&self) -> Vec<ShapePairKey> {
        let mut seen = HashSet::new();
        self.adjacency
            .iter()
            .map(|&[a, b]| ShapePairKey::new(a, b))
            .filter(|k| seen.insert(*k))
            .collect()
    }
}

/// Runs the estimator configured in the declaration over every adjacency.
pub fn build_table(decl: &MapDeclaration) -> Result<MidpointTable> {
    build_table_with(decl, decl.estimator.strategy, decl.estimator.config())
}

/// Parses every region and computes one midpoint per unique adjacent pair.
pub fn build_table_with(
    decl: &MapDeclaration,
    strategy: Strategy,
    config: EstimatorConfig,
) -> Result<MidpointTable> {
    decl.validate()?;
    let shapes = decl.shapes();
    let pairs = decl.unique_pairs();
    for key in &pairs {
        for id in [key.lo(), key.hi()] {
            if shapes[id].is_empty() {
                return Err(BorderError::empty(decl.region_label(id)));
            }
        }
    }

    let mut markers = BorderMarkers::new(shapes, strategy.build(config));
    log::debug!(
        "{} unique pair(s), estimator {}",
        pairs.len(),
        markers.estimator_name()
    );
    for key in pairs {
        let p = markers.midpoint(key.lo(), key.hi())?;
        log::debug!("{key}: ({:.1}, {:.1})", p.x, p.y);
    }
    // the cache only ever holds the pairs asked for above
    Ok(markers.into_cache().to_table())
}
