/// Easing applied across a keyframe segment.
///
/// `apply` does not clamp its input: a phase outside `[0, 1]` is extrapolated
/// with the same formula, so tracks can be evaluated slightly outside their
/// authored range during interactive scrubbing.
///
/// All kinds except [`Ease::Elastic`] map `[0, 1]` into `[0, 1]`; `Elastic`
/// overshoots past 1 while settling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity; the default for newly created keyframes.
    #[default]
    Linear,
    /// Quadratic acceleration from rest.
    InQuad,
    /// Quadratic deceleration to rest.
    OutQuad,
    /// Quadratic acceleration then deceleration.
    InOutQuad,
    /// Cubic acceleration from rest.
    InCubic,
    /// Cubic deceleration to rest.
    OutCubic,
    /// Cubic acceleration then deceleration.
    InOutCubic,
    /// Decaying-bounce arrival. Stays within `[0, 1]` for phases in `[0, 1]`.
    Bounce,
    /// Spring arrival. Overshoots `[0, 1]` near the end of the phase.
    Elastic,
}

impl Ease {
    /// Map a normalized phase to an eased phase.
    pub fn apply(self, u: f64) -> f64 {
        match self {
            Self::Linear => u,
            Self::InQuad => u * u,
            Self::OutQuad => 1.0 - (1.0 - u) * (1.0 - u),
            Self::InOutQuad => {
                if u < 0.5 {
                    2.0 * u * u
                } else {
                    1.0 - ((-2.0 * u + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => u * u * u,
            Self::OutCubic => 1.0 - (1.0 - u).powi(3),
            Self::InOutCubic => {
                if u < 0.5 {
                    4.0 * u * u * u
                } else {
                    1.0 - ((-2.0 * u + 2.0).powi(3) / 2.0)
                }
            }
            Self::Bounce => bounce_out(u),
            Self::Elastic => elastic_out(u),
        }
    }
}

fn bounce_out(u: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if u < 1.0 / D {
        N * u * u
    } else if u < 2.0 / D {
        let u = u - 1.5 / D;
        N * u * u + 0.75
    } else if u < 2.5 / D {
        let u = u - 2.25 / D;
        N * u * u + 0.9375
    } else {
        let u = u - 2.625 / D;
        N * u * u + 0.984_375
    }
}

fn elastic_out(u: f64) -> f64 {
    const C4: f64 = std::f64::consts::TAU / 3.0;
    if u == 0.0 || u == 1.0 {
        return u;
    }
    2f64.powf(-10.0 * u) * ((u * 10.0 - 0.75) * C4).sin() + 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
