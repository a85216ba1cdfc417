//! Angle conventions for arcs, chords and pies.
//!
//! Angles are in degrees, measured from the 3 o'clock position, and a
//! positive sweep runs counter-clockwise on screen.

/// Normalises an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Returns whether `angle` lies on the sweep starting at `start`.
pub fn sweep_contains(start: f64, sweep: f64, angle: f64) -> bool {
    if sweep.abs() >= 360.0 {
        return true;
    }
    if sweep >= 0.0 {
        normalize_degrees(angle - start) <= sweep
    } else {
        normalize_degrees(start - angle) <= -sweep
    }
}
