/// Multiplier on heat-pump electrical draw for outdoor-coil defrost cycles.
///
/// Implementations should return at least 1.0; the model clamps anything
/// lower (or non-finite) back to 1.0. Any `Fn(f64, f64) -> f64` taking
/// `(outdoor_temp_f, humidity_pct)` works as a penalty.
pub trait DefrostPenalty: Send + Sync {
    fn multiplier(&self, outdoor_temp_f: f64, humidity_pct: f64) -> f64;
}

impl<F> DefrostPenalty for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn multiplier(&self, outdoor_temp_f: f64, humidity_pct: f64) -> f64 {
        self(outdoor_temp_f, humidity_pct)
    }
}

/// Up to 15% extra draw, scaled by humidity, between 20°F and 45°F.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDefrost;

impl DefrostPenalty for StandardDefrost {
    fn multiplier(&self, outdoor_temp_f: f64, humidity_pct: f64) -> f64 {
        if outdoor_temp_f > 20.0 && outdoor_temp_f < 45.0 {
            1.0 + 0.15 * (humidity_pct / 100.0)
        } else {
            1.0
        }
    }
}

/// No defrost losses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefrost;

impl DefrostPenalty for NoDefrost {
    fn multiplier(&self, _outdoor_temp_f: f64, _humidity_pct: f64) -> f64 {
        1.0
    }
}
