use serde::Serialize;

/// Dash full-scale for the circular meters. Offsets are computed against
/// this constant, not the raw percentage.
pub const FULL_SCALE: f64 = 125.0;

/// Values above this render in the danger color.
pub const CRITICAL_ABOVE: u8 = 80;

/// One gauge's identity and the band its mock data is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct GaugeSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
}

pub const GAUGES: &[GaugeSpec] = &[
    GaugeSpec { id: "cpu", label: "CPU Load", min: 12, max: 38 },
    GaugeSpec { id: "mem", label: "Memory", min: 55, max: 78 },
];

/// Source of one pseudo-random draw per gauge per tick. Production wires a
/// `rand` RNG through the blanket impl; tests inject fixed sequences.
pub trait TelemetrySource {
    /// Draw the next raw sample; the caller clamps it into the gauge band.
    fn next_sample(&mut self, min: u8, max: u8) -> u8;
}

impl<R: rand::Rng> TelemetrySource for R {
    fn next_sample(&mut self, min: u8, max: u8) -> u8 {
        self.gen_range(min..=max)
    }
}

/// A sampled gauge value and its visual offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub value: u8,
    /// Dash offset against `FULL_SCALE`; 0.0 is a full meter.
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Nominal,
    Critical,
}

impl Reading {
    pub fn from_value(value: u8) -> Self {
        Self {
            value,
            offset: FULL_SCALE - f64::from(value) / 100.0 * FULL_SCALE,
        }
    }

    /// Fraction of the meter that is filled, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (FULL_SCALE - self.offset) / FULL_SCALE
    }

    pub fn severity(&self) -> Severity {
        if self.value > CRITICAL_ABOVE {
            Severity::Critical
        } else {
            Severity::Nominal
        }
    }
}

/// Sample one gauge, clamping whatever the source returns into its band.
pub fn sample(spec: &GaugeSpec, src: &mut dyn TelemetrySource) -> Reading {
    let raw = src.next_sample(spec.min, spec.max);
    Reading::from_value(raw.clamp(spec.min, spec.max))
}

/// Sample every gauge in `GAUGES` order.
pub fn sample_all(src: &mut dyn TelemetrySource) -> Vec<(&'static str, Reading)> {
    GAUGES.iter().map(|g| (g.id, sample(g, src))).collect()
}

/// Linear interpolation between the previously displayed value and the new
/// sample, for smoothing the label over a fixed duration.
pub fn lerp(prev: u8, next: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f64::from(prev) + (f64::from(next) - f64::from(prev)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence, ignoring the requested band. Exercises the
    /// clamping path with out-of-band values.
    struct Replay {
        seq: Vec<u8>,
        at: usize,
    }

    impl TelemetrySource for Replay {
        fn next_sample(&mut self, _min: u8, _max: u8) -> u8 {
            let v = self.seq[self.at % self.seq.len()];
            self.at += 1;
            v
        }
    }

    #[test]
    fn samples_clamped_into_band() {
        let mut src = Replay { seq: vec![0, 5, 12, 38, 99, 255], at: 0 };
        let cpu = &GAUGES[0];
        for _ in 0..24 {
            let r = sample(cpu, &mut src);
            assert!(
                (cpu.min..=cpu.max).contains(&r.value),
                "{} outside [{}, {}]",
                r.value,
                cpu.min,
                cpu.max
            );
        }
    }

    #[test]
    fn rng_samples_stay_in_band() {
        use rand::{rngs::SmallRng, SeedableRng};
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            for (id, r) in sample_all(&mut rng) {
                let g = GAUGES.iter().find(|g| g.id == id).unwrap();
                assert!((g.min..=g.max).contains(&r.value));
            }
        }
    }

    #[test]
    fn offset_maps_linearly_against_full_scale() {
        assert!((Reading::from_value(0).offset - FULL_SCALE).abs() < 1e-9);
        assert!(Reading::from_value(100).offset.abs() < 1e-9);
        let half = Reading::from_value(50);
        assert!((half.offset - FULL_SCALE / 2.0).abs() < 1e-9);
        assert!((half.fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn severity_threshold() {
        assert_eq!(Reading::from_value(80).severity(), Severity::Nominal);
        assert_eq!(Reading::from_value(81).severity(), Severity::Critical);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(20, 60, 0.0), 20);
        assert_eq!(lerp(20, 60, 1.0), 60);
        assert_eq!(lerp(20, 60, 0.5), 40);
        assert_eq!(lerp(20, 60, 7.0), 60, "t is clamped");
    }

    #[test]
    fn gauge_bands_are_sane() {
        for g in GAUGES {
            assert!(g.min < g.max, "{}: band inverted", g.id);
            assert!(g.max <= 100, "{}: band above 100%", g.id);
        }
    }
}
