use crate::library::SilentInterval;

/// Loudness is measured over windows of this length.
pub const WINDOW_MS: u64 = 10;
pub const THRESHOLD_RANGE_DB: (f32, f32) = (-90.0, 0.0);
pub const MIN_SILENCE_RANGE_MS: (u64, u64) = (50, 60_000);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SilenceParams {
    /// Windows quieter than this (dBFS) count as silent.
    pub threshold_db: f32,
    /// Shorter silent runs are ignored.
    pub min_silence_ms: u64,
}

impl Default for SilenceParams {
    fn default() -> Self {
        Self {
            threshold_db: -46.0,
            min_silence_ms: 500,
        }
    }
}

impl SilenceParams {
    /// Parameters forced into their valid ranges. A non-finite threshold
    /// falls back to the default.
    pub fn clamped(self) -> Self {
        let (lo, hi) = THRESHOLD_RANGE_DB;
        let threshold_db = if self.threshold_db.is_finite() {
            self.threshold_db.clamp(lo, hi)
        } else {
            Self::default().threshold_db
        };
        let (min_lo, min_hi) = MIN_SILENCE_RANGE_MS;
        Self {
            threshold_db,
            min_silence_ms: self.min_silence_ms.clamp(min_lo, min_hi),
        }
    }
}

fn window_db(sum_squares: f64, count: usize) -> f32 {
    if count == 0 || sum_squares <= 0.0 {
        return f32::NEG_INFINITY;
    }
    let rms = (sum_squares / count as f64).sqrt();
    (20.0 * rms.log10()) as f32
}

/// Tracks the current run of silent windows, in frames.
struct Runs {
    params: SilenceParams,
    sample_rate: u64,
    cursor: u64,
    run_start: Option<u64>,
    found: Vec<SilentInterval>,
}

impl Runs {
    fn to_ms(&self, frames: u64) -> u64 {
        frames * 1000 / self.sample_rate
    }

    fn window(&mut self, frames: u64, db: f32) {
        if db < self.params.threshold_db {
            self.run_start.get_or_insert(self.cursor);
        } else {
            self.close();
        }
        self.cursor += frames;
    }

    fn close(&mut self) {
        if let Some(start) = self.run_start.take() {
            let (start_ms, end_ms) = (self.to_ms(start), self.to_ms(self.cursor));
            if end_ms.saturating_sub(start_ms) >= self.params.min_silence_ms {
                self.found.extend(SilentInterval::new(start_ms, end_ms));
            }
        }
    }
}

/// Find silent intervals in an interleaved stream of samples in [-1.0, 1.0].
///
/// The stream is consumed once; nothing is buffered beyond one window. A
/// silent run that reaches the end of the stream ends there.
pub fn detect_silence<I>(
    samples: I,
    channels: u16,
    sample_rate: u32,
    params: SilenceParams,
) -> Vec<SilentInterval>
where
    I: IntoIterator<Item = f32>,
{
    let channels = usize::from(channels.max(1));
    let sample_rate = u64::from(sample_rate.max(1));
    let window_samples = (sample_rate * WINDOW_MS / 1000).max(1) as usize * channels;

    let mut runs = Runs {
        params: params.clamped(),
        sample_rate,
        cursor: 0,
        run_start: None,
        found: Vec::new(),
    };

    let mut sum_squares = 0.0f64;
    let mut count = 0usize;
    for sample in samples {
        let s = f64::from(sample);
        sum_squares += s * s;
        count += 1;
        if count == window_samples {
            runs.window((count / channels) as u64, window_db(sum_squares, count));
            sum_squares = 0.0;
            count = 0;
        }
    }
    if count > 0 {
        runs.window(count.div_ceil(channels) as u64, window_db(sum_squares, count));
    }
    runs.close();

    runs.found
}
