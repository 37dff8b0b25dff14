#![no_std]

#[macro_use]
mod fmt;

pub mod source;

#[cfg(feature = "debounce")]
pub mod debounce;

#[cfg(feature = "filter-ema")]
pub mod filters;

pub use source::{Clock, FnClock, ManualClock, SampleSource};

#[cfg(feature = "embedded-hal")]
pub use source::PinSource;

#[cfg(feature = "debounce")]
pub use debounce::{DEBOUNCE_TIME_MILLIS, DebounceInput, Edge};

#[cfg(feature = "filter-ema")]
pub use filters::EmaInput;
