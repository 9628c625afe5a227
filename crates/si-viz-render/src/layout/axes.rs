/// Linear axis with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Auto-scale with "nice number" ticks; `padding` widens the data range
    /// by that fraction on each side first.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize, padding: f64) -> Self {
        let pad = (data_max - data_min).abs() * padding.max(0.0);
        let (lo, hi) = (data_min - pad, data_max + pad);
        let (nice_min, nice_max, step) = nice_range(lo, hi, target_ticks);
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let n = ((nice_max - nice_min) / step).round() as usize;
        for i in 0..=n {
            let v = nice_min + i as f64 * step;
            ticks.push(v);
            labels.push(format_tick(v, step));
        }
        Self { min: nice_min, max: nice_max, label: String::new(), tick_positions: ticks, tick_labels: labels }
    }

    /// Scale to the finite values of `data`; an empty slice gives `[0, 1]`.
    pub fn for_data(data: &[f64], target_ticks: usize, padding: f64) -> Self {
        let (lo, hi) = data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo > hi {
            return Self::auto_linear(0.0, 1.0, target_ticks, 0.0);
        }
        Self::auto_linear(lo, hi, target_ticks, padding)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
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
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    format!("{:.prec$}", v, prec = decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_cover_data() {
        let ax = Axis::auto_linear(0.3, 11.7, 6, 0.0);
        assert!(ax.min <= 0.3 && ax.max >= 11.7);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
        assert_eq!(ax.tick_positions.len(), ax.tick_labels.len());
        let step = ax.tick_positions[1] - ax.tick_positions[0];
        assert!((step - 2.0).abs() < 1e-12);
    }

    #[test]
    fn fractional_steps_and_negative_zero() {
        let ax = Axis::auto_linear(-1.9, 1.7, 6, 0.0);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("-2.0"));
        assert!(ax.tick_labels.contains(&"0.0".to_string()));
        assert!(!ax.tick_labels.contains(&"-0.0".to_string()));
    }

    #[test]
    fn degenerate_and_empty_data() {
        let flat = Axis::for_data(&[2.0, 2.0], 5, 0.05);
        assert!(flat.min < 2.0 && flat.max > 2.0);
        let empty = Axis::for_data(&[], 5, 0.05);
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }

    #[test]
    fn pixel_mapping() {
        let ax = Axis::auto_linear(0.0, 10.0, 6, 0.0);
        assert_eq!(ax.data_to_pixel(ax.min, 50.0, 150.0), 50.0);
        assert_eq!(ax.data_to_pixel(ax.max, 50.0, 150.0), 150.0);
        // Inverted range for the y axis.
        assert_eq!(ax.data_to_pixel(ax.min, 300.0, 100.0), 300.0);
    }
}
