/// Estimator defaults.
/// Distances are expressed in the shapes' own coordinate units (SVG viewBox
/// units for the maps these were tuned on) and scale with them.

/// Fixed subdivision count used to linearize one cubic Bézier segment.
pub const BEZIER_STEPS: usize = 10;

/// Samples per shape for the dense (offline) estimator.
pub const DENSE_SAMPLES: usize = 200;
/// Match distance between the two outlines for the dense estimator.
pub const DENSE_MATCH_THRESHOLD: f64 = 5.0;

/// Samples per shape for the live (runtime) estimator.
pub const LIVE_SAMPLES: usize = 60;
/// Match distance between the two outlines for the live estimator.
pub const LIVE_MATCH_THRESHOLD: f64 = 4.0;

/// Max distance between consecutive candidates of one contiguous border run.
pub const RUN_GAP: f64 = 40.0;
/// Centroid farther than this from every shared point snaps to the closest one.
pub const CENTROID_SNAP: f64 = 15.0;

/// Half length of each stroke of a conflict marker cross.
pub const MARKER_HALF_LEN: f64 = 6.0;
