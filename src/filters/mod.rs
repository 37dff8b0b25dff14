//! Noise filtering implementations
//!
//! Filters smooth noisy ADC readings in fixed-point integer space, so no
//! floating point support is needed on target.

mod ema;

pub use ema::EmaInput;

/// Largest raw sample the fixed-point accumulator holds without overflow.
pub const MAX_RAW_SAMPLE: u32 = (1 << 24) - 1;
