//! Progress bar state and formatting
//!
//! Everything here is pure: the render thread feeds samples in and asks
//! for the line to draw.

use super::theme::BarStyle;
use std::time::{Duration, Instant};

/// Samples averaged plainly before the moving average takes over.
const WARMUP_SAMPLES: u32 = 10;

/// Exponentially weighted moving average with an age-derived decay.
#[derive(Debug, Clone)]
pub struct Ewma {
    decay: f64,
    value: f64,
    count: u32,
}

impl Ewma {
    /// Average over roughly the last `age` samples.
    pub fn new(age: f64) -> Self {
        Self {
            decay: 2.0 / (age + 1.0),
            value: 0.0,
            count: 0,
        }
    }

    pub fn add(&mut self, sample: f64) {
        if self.count < WARMUP_SAMPLES {
            self.count += 1;
            self.value += (sample - self.value) / f64::from(self.count);
        } else {
            self.value = sample * self.decay + self.value * (1.0 - self.decay);
        }
    }

    /// Current average, zero before the first sample.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Format a byte count in binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Format a remaining time as `1h2m3s`, `4m5s` or `6s`.
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

/// Draw the bar body for `current` of `total` bytes.
pub fn render_bar(current: u64, total: u64, style: &BarStyle) -> String {
    let inner = style.width.saturating_sub(2);
    let filled = if total == 0 {
        inner
    } else {
        ((current.min(total) as f64 / total as f64) * inner as f64) as usize
    };

    let mut bar = String::with_capacity(style.width);
    bar.push(style.left);
    if filled >= inner {
        bar.extend(std::iter::repeat_n(style.fill, inner));
    } else if filled > 0 {
        bar.extend(std::iter::repeat_n(style.fill, filled - 1));
        bar.push(style.tip);
        bar.extend(std::iter::repeat_n(style.empty, inner - filled));
    } else {
        bar.extend(std::iter::repeat_n(style.empty, inner));
    }
    bar.push(style.right);
    bar
}

/// Byte counts and averages behind one progress bar.
#[derive(Debug, Clone)]
pub struct ProgressState {
    total: u64,
    current: u64,
    sampled_at: Instant,
    sampled_bytes: u64,
    eta: Ewma,
    speed: Ewma,
    style: BarStyle,
}

impl ProgressState {
    pub fn new(total: u64, style: BarStyle, now: Instant) -> Self {
        Self {
            total,
            current: 0,
            sampled_at: now,
            sampled_bytes: 0,
            eta: Ewma::new(style.eta_age),
            speed: Ewma::new(style.speed_age),
            style,
        }
    }

    pub fn advance(&mut self, bytes: u64) {
        self.current = self.current.saturating_add(bytes);
    }

    /// Fold the bytes moved since the last sample into the averages.
    pub fn sample(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.sampled_at).as_secs_f64();
        let moved = self.current - self.sampled_bytes;
        if elapsed <= 0.0 || moved == 0 {
            return;
        }

        self.speed.add(moved as f64 / elapsed);
        self.eta.add(elapsed / moved as f64);
        self.sampled_at = now;
        self.sampled_bytes = self.current;
    }

    /// Remaining time at the averaged pace, if any pace is known yet.
    pub fn eta(&self) -> Option<Duration> {
        let per_byte = self.eta.value();
        (per_byte > 0.0).then(|| {
            let remaining = self.total.saturating_sub(self.current) as f64;
            Duration::from_secs_f64(remaining * per_byte)
        })
    }

    /// Full status line: counters, bar, remaining time and speed.
    pub fn line(&self) -> String {
        let eta = self.eta().map_or_else(|| "0s".to_string(), format_eta);
        format!(
            "{} / {} {} {eta} ] {}/s",
            format_bytes(self.current),
            format_bytes(self.total),
            render_bar(self.current, self.total, &self.style),
            format_bytes(self.speed.value() as u64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GiB");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(Duration::from_secs(0)), "0s");
        assert_eq!(format_eta(Duration::from_secs(59)), "59s");
        assert_eq!(format_eta(Duration::from_secs(245)), "4m5s");
        assert_eq!(format_eta(Duration::from_secs(3723)), "1h2m3s");
    }

    #[test]
    fn test_bar_geometry() {
        let style = BarStyle::default();

        let empty = render_bar(0, 100, &style);
        let half = render_bar(50, 100, &style);
        let full = render_bar(100, 100, &style);

        for bar in [&empty, &half, &full] {
            assert_eq!(bar.chars().count(), 60);
            assert!(bar.starts_with('['));
            assert!(bar.ends_with('|'));
        }
        assert!(!empty.contains('='));
        assert!(half.contains('>'));
        assert!(!full.contains('-'));
    }

    #[test]
    fn test_ewma_warms_up_then_decays() {
        let mut avg = Ewma::new(60.0);
        for _ in 0..WARMUP_SAMPLES {
            avg.add(10.0);
        }
        assert!((avg.value() - 10.0).abs() < f64::EPSILON);

        avg.add(100.0);
        assert!(avg.value() > 10.0 && avg.value() < 100.0);
    }

    #[test]
    fn test_state_estimates_remaining_time() {
        let start = Instant::now();
        let mut state = ProgressState::new(2048, BarStyle::default(), start);
        assert!(state.eta().is_none());

        state.advance(1024);
        state.sample(start + Duration::from_secs(1));

        // 1 KiB/s with 1 KiB left
        assert_eq!(state.eta().unwrap().as_secs(), 1);
        let line = state.line();
        assert!(line.starts_with("1.00 KiB / 2.00 KiB ["));
        assert!(line.ends_with("1s ] 1.00 KiB/s"));
    }
}
