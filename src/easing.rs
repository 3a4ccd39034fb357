// Easing curves: map elapsed fraction [0,1] to progress [0,1].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[serde(rename = "quadratic_easein")]
    QuadraticIn,
    #[serde(rename = "quadratic_easeout")]
    QuadraticOut,
    #[serde(rename = "quadratic_easeinout")]
    QuadraticInOut,
    #[serde(rename = "cubic_easein")]
    CubicIn,
    #[serde(rename = "cubic_easeout")]
    CubicOut,
    #[default]
    #[serde(rename = "cubic_easeinout")]
    CubicInOut,
    #[serde(rename = "circular_easein")]
    CircularIn,
    #[serde(rename = "circular_easeout")]
    CircularOut,
    #[serde(rename = "circular_easeinout")]
    CircularInOut,
    #[serde(rename = "sine_easeinout")]
    SineInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CircularIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircularOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Easing::CircularInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Easing::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 11] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::CircularIn,
        Easing::CircularOut,
        Easing::CircularInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn every_curve_is_pinned_at_both_ends() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?} at 1");
        }
    }

    #[test]
    fn every_curve_is_monotonic() {
        for e in ALL {
            let mut last = 0.0;
            for i in 1..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= last, "{e:?} dips at step {i}");
                last = v;
            }
        }
    }

    #[test]
    fn in_out_curves_are_half_way_at_midpoint() {
        for e in [Easing::QuadraticInOut, Easing::CubicInOut, Easing::CircularInOut, Easing::SineInOut] {
            assert!((e.apply(0.5) - 0.5).abs() < 1e-6, "{e:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::CubicIn.apply(2.0), 1.0);
    }

    #[test]
    fn names_match_config_spelling() {
        #[derive(Deserialize)]
        struct Wrap {
            e: Easing,
        }
        let w: Wrap = toml::from_str("e = \"circular_easeinout\"").unwrap();
        assert_eq!(w.e, Easing::CircularInOut);
        let w: Wrap = toml::from_str("e = \"linear\"").unwrap();
        assert_eq!(w.e, Easing::Linear);
    }
}
