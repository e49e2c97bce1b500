//! Shared-border point estimation.
//!
//! Both strategies walk outline A by arc length, pair every sample with the
//! nearest of `N + 1` evenly spaced samples of outline B, and keep the pair
//! midpoints that fall under the match threshold. They differ in how the
//! kept points are reduced to one:
//!
//! * [`DenseRunEstimator`] keeps the longest spatially contiguous run and
//!   returns its middle element. Used for the precomputed table.
//! * [`LiveCentroidEstimator`] returns the centroid, snapped onto the
//!   closest shared point when the centroid drifts off the border. Cheaper,
//!   meant for queries against geometry only known at render time.
//!
//! When nothing matches the two bounding-box centers are averaged instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CENTROID_SNAP, DENSE_MATCH_THRESHOLD, DENSE_SAMPLES, LIVE_MATCH_THRESHOLD, LIVE_SAMPLES,
    RUN_GAP,
};
use crate::error::{BorderError, Result};
use crate::geom::Point;
use crate::sampler::{Outline, uniform_samples};

/// Tuning for the estimators. Distances are in shape units, so these need
/// rescaling when the coordinate magnitude changes (see [`scaled`]).
///
/// [`scaled`]: EstimatorConfig::scaled
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Samples per outline; `samples + 1` points are taken.
    pub samples: usize,
    /// Two samples closer than this count as shared border.
    pub match_threshold: f64,
    /// Consecutive shared points closer than this belong to one run.
    pub run_gap: f64,
    /// Live strategy only: max centroid offset before snapping.
    pub centroid_snap: f64,
}

impl EstimatorConfig {
    pub fn dense() -> Self {
        Self {
            samples: DENSE_SAMPLES,
            match_threshold: DENSE_MATCH_THRESHOLD,
            run_gap: RUN_GAP,
            centroid_snap: CENTROID_SNAP,
        }
    }

    pub fn live() -> Self {
        Self {
            samples: LIVE_SAMPLES,
            match_threshold: LIVE_MATCH_THRESHOLD,
            run_gap: RUN_GAP,
            centroid_snap: CENTROID_SNAP,
        }
    }

    /// Multiplies every distance by `factor`; sample count is kept.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            match_threshold: self.match_threshold * factor,
            run_gap: self.run_gap * factor,
            centroid_snap: self.centroid_snap * factor,
            ..self
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_run_gap(mut self, gap: f64) -> Self {
        self.run_gap = gap;
        self
    }

    pub fn with_centroid_snap(mut self, snap: f64) -> Self {
        self.centroid_snap = snap;
        self
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::dense()
    }
}

/// Common contract: a point plausibly on the border shared by `a` and `b`.
pub trait BorderEstimator {
    fn estimate(&self, a: &dyn Outline, b: &dyn Outline) -> Result<Point>;

    /// Name of the strategy (for logs).
    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    #[serde(alias = "offline")]
    Dense,
    #[serde(alias = "runtime")]
    Live,
}

impl Strategy {
    pub fn preset(self) -> EstimatorConfig {
        match self {
            Strategy::Dense => EstimatorConfig::dense(),
            Strategy::Live => EstimatorConfig::live(),
        }
    }

    pub fn build(self, config: EstimatorConfig) -> Box<dyn BorderEstimator> {
        match self {
            Strategy::Dense => Box::new(DenseRunEstimator::new(config)),
            Strategy::Live => Box::new(LiveCentroidEstimator::new(config)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Dense => f.write_str("dense"),
            Strategy::Live => f.write_str("live"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" | "offline" => Ok(Strategy::Dense),
            "live" | "runtime" => Ok(Strategy::Live),
            other => Err(format!("unknown strategy '{other}', expected dense or live")),
        }
    }
}

/// Offline strategy: longest contiguous run of shared points, middle element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenseRunEstimator {
    pub config: EstimatorConfig,
}

impl DenseRunEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl Default for DenseRunEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::dense())
    }
}

impl BorderEstimator for DenseRunEstimator {
    fn estimate(&self, a: &dyn Outline, b: &dyn Outline) -> Result<Point> {
        let shared = shared_points(a, b, &self.config)?;
        match run_midpoint(&shared, self.config.run_gap) {
            Some(p) => Ok(p),
            None => bbox_fallback(a, b),
        }
    }

    fn name(&self) -> &'static str {
        "dense"
    }
}

/// Runtime strategy: centroid of shared points, snapped when it floats off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveCentroidEstimator {
    pub config: EstimatorConfig,
}

impl LiveCentroidEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl Default for LiveCentroidEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::live())
    }
}

impl BorderEstimator for LiveCentroidEstimator {
    fn estimate(&self, a: &dyn Outline, b: &dyn Outline) -> Result<Point> {
        let shared = shared_points(a, b, &self.config)?;
        match centroid_snap(&shared, self.config.centroid_snap) {
            Some(p) => Ok(p),
            None => bbox_fallback(a, b),
        }
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

/// Nearest candidate by squared distance; the first of equal minima wins.
fn nearest(p: Point, candidates: &[Point]) -> Option<(Point, f64)> {
    let mut best: Option<(Point, f64)> = None;
    for &q in candidates {
        let d2 = p.dist2(q);
        if best.is_none_or(|(_, bd)| d2 < bd) {
            best = Some((q, d2));
        }
    }
    best
}

/// Midpoints of every (A sample, nearest B sample) pair closer than the
/// match threshold, in A's sampling order.
pub fn shared_points(
    a: &dyn Outline,
    b: &dyn Outline,
    config: &EstimatorConfig,
) -> Result<Vec<Point>> {
    let n = config.samples.max(1);
    let len_a = a.total_length();
    if a.point_at_length(len_a, 0.0).is_none() {
        return Err(BorderError::empty("first"));
    }
    let samples_b = uniform_samples(b, n).ok_or_else(|| BorderError::empty("second"))?;
    let limit = config.match_threshold * config.match_threshold;

    let mut out = Vec::new();
    for i in 0..=n {
        let Some(pa) = a.point_at_length(len_a, len_a * i as f64 / n as f64) else {
            continue;
        };
        if let Some((pb, d2)) = nearest(pa, &samples_b)
            && d2 < limit
        {
            out.push(pa.midpoint(pb));
        }
    }
    Ok(out)
}

/// Longest run of consecutive candidates each within `max_gap` of the
/// previous one, as `(start, len)`. Ties go to the earliest run.
pub fn longest_run(candidates: &[Point], max_gap: f64) -> Option<(usize, usize)> {
    if candidates.is_empty() {
        return None;
    }
    let gap2 = max_gap * max_gap;
    let (mut best_start, mut best_len) = (0, 1);
    let mut start = 0;
    for i in 1..candidates.len() {
        if candidates[i - 1].dist2(candidates[i]) >= gap2 {
            start = i;
        }
        let len = i - start + 1;
        if len > best_len {
            best_start = start;
            best_len = len;
        }
    }
    Some((best_start, best_len))
}

/// Middle element of the longest contiguous run.
pub fn run_midpoint(candidates: &[Point], max_gap: f64) -> Option<Point> {
    let (start, len) = longest_run(candidates, max_gap)?;
    log::debug!(
        "border run {start}..{} of {} shared point(s)",
        start + len,
        candidates.len()
    );
    Some(candidates[start + len / 2])
}

/// Centroid of the candidates, or the candidate closest to it when even
/// that one is farther than `snap` away.
pub fn centroid_snap(candidates: &[Point], snap: f64) -> Option<Point> {
    if candidates.is_empty() {
        return None;
    }
    let n = candidates.len() as f64;
    let sum = candidates
        .iter()
        .fold(Point::default(), |acc, q| Point::new(acc.x + q.x, acc.y + q.y));
    let centroid = Point::new(sum.x / n, sum.y / n);
    let (closest, d2) = nearest(centroid, candidates)?;
    if d2.sqrt() > snap {
        log::debug!("centroid off border by {:.2}, snapping", d2.sqrt());
        Some(closest)
    } else {
        Some(centroid)
    }
}

/// Average of the two bounding-box centers, for pairs with no shared border
/// inside tolerance.
pub fn bbox_fallback(a: &dyn Outline, b: &dyn Outline) -> Result<Point> {
    let ca = a.bounds().ok_or_else(|| BorderError::empty("first"))?.center();
    let cb = b.bounds().ok_or_else(|| BorderError::empty("second"))?.center();
    log::debug!("no shared border within tolerance, using bounding-box centers");
    Ok(ca.midpoint(cb))
}
