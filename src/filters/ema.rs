use num_traits::AsPrimitive;

use crate::filters::MAX_RAW_SAMPLE;
use crate::source::SampleSource;

/// Fixed-point scale of the accumulator.
const SHIFT: u32 = 8;

/// Alpha giving full weight to the newest sample.
const ALPHA_FULL: i64 = 255;

/// Half of one raw unit in accumulator scale.
const HALF_UNIT: u32 = 1 << (SHIFT - 1);

/// Exponential moving average over an unsigned [`SampleSource`].
///
/// Each step: `acc += alpha * (raw * 256 - acc) / 255`
///
/// The accumulator is scaled by 256 so raw samples up to 24 bits fit a `u32`.
/// `alpha = 0` freezes the output at its seed, `alpha = 255` tracks the raw
/// input with no lag. The step and the output both round to nearest, so a
/// constant input settles exactly on that constant from either side. The
/// output is `acc / 256` passed through `convert`.
#[derive(Debug, Clone, Copy)]
pub struct EmaInput<S, O = u32> {
    source: S,
    alpha: u8,
    accumulator: u32,
    convert: fn(u32) -> O,
}

fn cast<O>(raw: u32) -> O
where
    O: Copy + 'static,
    u32: AsPrimitive<O>,
{
    raw.as_()
}

impl<S, O> EmaInput<S, O>
where
    S: SampleSource<u32>,
    O: Copy + 'static,
    u32: AsPrimitive<O>,
{
    /// Create a filter seeded at `initial_raw`, output cast to `O`.
    pub fn new(source: S, initial_raw: u32, alpha: u8) -> Self {
        Self::with_conversion(source, initial_raw, alpha, cast::<O>)
    }

    /// Create a filter seeded from the first reading of `source`.
    pub fn seeded(source: S, alpha: u8) -> Self {
        Self::seeded_with_conversion(source, alpha, cast::<O>)
    }
}

impl<S, O> EmaInput<S, O>
where
    S: SampleSource<u32>,
{
    /// Create a filter seeded at `initial_raw` whose output is `convert(filtered_raw)`.
    pub fn with_conversion(source: S, initial_raw: u32, alpha: u8, convert: fn(u32) -> O) -> Self {
        debug_assert!(
            initial_raw <= MAX_RAW_SAMPLE,
            "EMA raw sample must fit 24 bits, got {}",
            initial_raw
        );

        Self {
            source,
            alpha,
            accumulator: initial_raw << SHIFT,
            convert,
        }
    }

    /// Create a filter seeded from the first reading of `source`, output `convert(filtered_raw)`.
    pub fn seeded_with_conversion(mut source: S, alpha: u8, convert: fn(u32) -> O) -> Self {
        let initial_raw = source.read_raw();
        Self::with_conversion(source, initial_raw, alpha, convert)
    }

    /// Read one sample and blend it into the average.
    pub fn run(&mut self) {
        let raw = self.source.read_raw();
        debug_assert!(
            raw <= MAX_RAW_SAMPLE,
            "EMA raw sample must fit 24 bits, got {}",
            raw
        );

        let target = i64::from(raw) << SHIFT;
        let previous = i64::from(self.accumulator);

        // Rounds half away from zero, so the result stays between previous and target.
        let weighted = i64::from(self.alpha) * (target - previous);
        let delta = (weighted.abs() + ALPHA_FULL / 2) / ALPHA_FULL;
        let next = if weighted < 0 { previous - delta } else { previous + delta };
        self.accumulator = next as u32;
    }

    /// Filtered value after conversion.
    #[inline]
    pub fn filtered_value(&self) -> O {
        (self.convert)(self.filtered_raw())
    }

    /// Filtered value in raw sample units, before conversion.
    #[inline]
    pub fn filtered_raw(&self) -> u32 {
        (self.accumulator + HALF_UNIT) >> SHIFT
    }

    /// Weight of the newest sample, in 255ths.
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Re-seed the average at `raw`, dropping all history.
    pub fn reset(&mut self, raw: u32) {
        debug_assert!(raw <= MAX_RAW_SAMPLE, "EMA raw sample must fit 24 bits, got {}", raw);
        debug!("EMA reset to {}", raw);
        self.accumulator = raw << SHIFT;
    }

    /// Give back the sample source.
    pub fn release(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn seed_is_output() {
        let filter: EmaInput<_> = EmaInput::new(|| 0_u32, 700, 128);
        assert_eq!(filter.filtered_value(), 700);
    }

    #[test]
    fn seeded_reads_source_once() {
        let reads = Cell::new(0_u32);
        let filter: EmaInput<_> = EmaInput::seeded(
            || {
                reads.set(reads.get() + 1);
                321
            },
            10,
        );
        assert_eq!(reads.get(), 1);
        assert_eq!(filter.filtered_raw(), 321);
    }

    #[test]
    fn half_weight_single_step() {
        let mut filter: EmaInput<_> = EmaInput::new(|| 1024_u32, 0, 128);
        filter.run();
        // (128 * 262144 + 127) / 255 = 131586, rounded >> 8 = 514
        assert_eq!(filter.filtered_raw(), 514);
    }

    #[test]
    fn full_alpha_tracks() {
        let raw = Cell::new(0_u32);
        let mut filter: EmaInput<_> = EmaInput::new(|| raw.get(), 0, 255);
        for sample in [5, 1000, 3, MAX_RAW_SAMPLE, 0] {
            raw.set(sample);
            filter.run();
            assert_eq!(filter.filtered_raw(), sample);
        }
    }

    #[test]
    fn settles_on_constant_from_either_side() {
        let raw = Cell::new(1024_u32);
        let mut filter: EmaInput<_> = EmaInput::new(|| raw.get(), 0, 1);
        for _ in 0..3_000 {
            filter.run();
        }
        assert_eq!(filter.filtered_raw(), 1024);

        raw.set(0);
        for _ in 0..3_000 {
            filter.run();
        }
        assert_eq!(filter.filtered_raw(), 0);
    }

    #[test]
    fn reset_reseeds() {
        let mut filter: EmaInput<_> = EmaInput::new(|| 1000_u32, 0, 64);
        filter.run();
        filter.reset(42);
        assert_eq!(filter.filtered_raw(), 42);
    }
}
