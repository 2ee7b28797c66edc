/// Upper bound on generated ticks per axis
const MAX_TICKS: usize = 50;

/// Relative spread below which data is treated as constant
const FLAT_TOLERANCE: f64 = 1e-9;

/// Linear axis with tick generation and data -> pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Auto-scale with "nice number" ticks covering `[data_min, data_max]`.
    ///
    /// Always returns a non-empty, finite axis with `min < max` and at most
    /// `MAX_TICKS + 1` ticks, whatever the magnitude of the data.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);

        let span = nice_max / step - nice_min / step;
        // A step below the float resolution at this magnitude never advances
        if !step.is_finite()
            || step <= 0.0
            || nice_min + step == nice_min
            || !(span <= MAX_TICKS as f64)
        {
            return Self::two_ticks(nice_min, nice_max);
        }

        let count = span.round() as usize;
        let tick_positions: Vec<f64> = (0..=count)
            .map(|i| (nice_min + step * i as f64).min(nice_max))
            .collect();
        let tick_labels = tick_positions.iter().map(|v| format_tick(*v, step)).collect();

        Self {
            min: nice_min,
            max: nice_max,
            label: String::new(),
            tick_positions,
            tick_labels,
        }
    }

    fn two_ticks(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: vec![min, max],
            tick_labels: vec![
                format_tick(min, f64::INFINITY),
                format_tick(max, f64::INFINITY),
            ],
        }
    }

    /// Axis over `count` categories centred on 0..count-1.
    /// At most ~10 integer ticks are labelled.
    pub fn categorical(count: usize) -> Self {
        let step = ((count as f64) / 10.0).ceil().max(1.0) as usize;
        let tick_positions: Vec<f64> = (0..count).step_by(step).map(|i| i as f64).collect();
        let tick_labels = tick_positions.iter().map(|v| format!("{}", *v as i64)).collect();
        Self {
            min: -0.5,
            max: count.max(1) as f64 - 0.5,
            label: String::new(),
            tick_positions,
            tick_labels,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to a pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let span = self.max - self.min;
        let frac = if span.is_finite() {
            (value - self.min) / span
        } else {
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        px_min + frac * (px_max - px_min)
    }
}

/// Finite extent of `values`, `None` when there is none.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// "Nice numbers" algorithm for pleasant tick spacing.
///
/// Flat data is padded by 1 (or 5% of its magnitude when 1 is below the
/// float resolution). Bounds are clamped to finite values.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    let magnitude = data_min.abs().max(data_max.abs());
    let (lo, hi) = if data_max - data_min <= magnitude * FLAT_TOLERANCE {
        let pad = (magnitude * 0.05).max(1.0);
        (clamp_finite(data_min - pad), clamp_finite(data_max + pad))
    } else {
        (data_min, data_max)
    };

    let intervals = (target_ticks.max(2) - 1) as f64;
    let range = hi - lo;
    let rough_step = if range.is_finite() {
        range / intervals
    } else {
        (hi / 2.0 - lo / 2.0) / intervals * 2.0
    };
    let step = nice_step(rough_step);
    // Subnormal spans round the step to zero, huge ones to infinity
    if !step.is_finite() || step <= 0.0 {
        return (lo, hi, step);
    }
    let nice_min = clamp_finite((lo / step).floor() * step);
    let nice_max = clamp_finite((hi / step).ceil() * step);
    (nice_min, nice_max, step)
}

fn clamp_finite(value: f64) -> f64 {
    value.clamp(f64::MIN, f64::MAX)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    if !step.is_finite() || value.abs() >= 1e15 || step >= 1e15 {
        return format!("{:e}", value);
    }
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    // Avoid "-0"
    let value = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_covers_data() {
        let ax = Axis::auto_linear(0.3, 9.7, 6);
        assert!(ax.min <= 0.3);
        assert!(ax.max >= 9.7);
        assert!(!ax.tick_positions.is_empty());
        assert_eq!(ax.tick_positions.len(), ax.tick_labels.len());
    }

    #[test]
    fn auto_linear_constant_data() {
        let ax = Axis::auto_linear(5.0, 5.0, 6);
        assert!(ax.min < 5.0 && ax.max > 5.0);
        assert_eq!(ax.tick_labels, vec!["4.0", "4.5", "5.0", "5.5", "6.0"]);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert!((px - 250.0).abs() < 1.0);
    }

    #[test]
    fn categorical_ticks_are_thinned() {
        let ax = Axis::categorical(3);
        assert_eq!(ax.tick_labels, vec!["0", "1", "2"]);
        assert_eq!((ax.min, ax.max), (-0.5, 2.5));

        let wide = Axis::categorical(95);
        assert_eq!(wide.tick_positions.len(), 10);
    }

    #[test]
    fn extent_skips_non_finite() {
        assert_eq!(extent(&[]), None);
        assert_eq!(extent(&[f64::NAN, 2.0, -1.0, f64::INFINITY]), Some((-1.0, 2.0)));
    }

    fn assert_sane(ax: &Axis) {
        assert!(ax.min.is_finite() && ax.max.is_finite());
        assert!(ax.min < ax.max);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.tick_positions.len() <= MAX_TICKS + 1);
        assert_eq!(ax.tick_positions.len(), ax.tick_labels.len());
        assert!(ax.tick_positions.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn auto_linear_large_constant() {
        let ax = Axis::auto_linear(1e25, 1e25, 6);
        assert_sane(&ax);
        assert!(ax.min < 1e25 && ax.max > 1e25);
        assert!(ax.tick_labels.iter().all(|l| !l.contains("9223372036854775807")));

        for v in [1e15, 1e18, 1e20, 1e21, -3e300, f64::MAX] {
            assert_sane(&Axis::auto_linear(v, v, 6));
        }
    }

    #[test]
    fn auto_linear_overflowing_range() {
        let ax = Axis::auto_linear(-1.7e308, 1.7e308, 6);
        assert_sane(&ax);
        assert!(ax.min <= -1.7e308 && ax.max >= 1.7e308);

        let mid = ax.data_to_pixel(0.0, 0.0, 500.0);
        let top = ax.data_to_pixel(1.7e308, 0.0, 500.0);
        assert!((mid - 250.0).abs() < 1.0);
        assert!(top.is_finite() && top <= 500.0);

        assert_sane(&Axis::auto_linear(f64::MIN, f64::MAX, 2));
        assert_sane(&Axis::auto_linear(0.0, 1e-320, 6));
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
    }
}
