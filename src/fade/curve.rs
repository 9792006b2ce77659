use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// Shape of a volume ramp.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurve {
    /// Constant rate of change.
    #[default]
    Linear,
    /// sin/cos pair; keeps perceived loudness roughly constant across a
    /// crossfade.
    #[serde(alias = "equal_power", alias = "constant-power")]
    EqualPower,
    /// Smooth start and finish: 0.5 × (1 − cos(π t)).
    #[serde(alias = "s_curve", alias = "scurve")]
    SCurve,
}

impl FadeCurve {
    /// Volume at progress `t` ∈ [0, 1] of a ramp from `from` to `to`.
    ///
    /// The endpoints are exact: `t = 0` gives `from`, `t = 1` gives `to`.
    pub fn level(self, from: f32, to: f32, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let shaped = match self {
            FadeCurve::Linear => t,
            FadeCurve::SCurve => 0.5 * (1.0 - (PI * t).cos()),
            // Rising ramps follow sin(tπ/2); falling ramps follow cos(tπ/2),
            // expressed as progress 1 − cos(tπ/2).
            FadeCurve::EqualPower if to >= from => (t * FRAC_PI_2).sin(),
            FadeCurve::EqualPower => 1.0 - (t * FRAC_PI_2).cos(),
        };
        if t >= 1.0 {
            return to;
        }
        from + (to - from) * shaped
    }
}
