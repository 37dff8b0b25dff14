//! Clock and raw sample capabilities consumed by the filters.
//!
//! Filters never touch hardware directly. The host hands each filter a
//! [`Clock`] and a [`SampleSource`] at construction, so the same filter runs
//! against a HAL on target and against virtual time and scripted samples on
//! the host.

use core::cell::Cell;

/// Monotonically non-decreasing millisecond counter.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_millis(&self) -> u32;
}

impl<C> Clock for &C
where
    C: Clock + ?Sized,
{
    #[inline]
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// Adapts a free function such as a HAL's `millis()` into a [`Clock`].
#[derive(Debug, Clone, Copy)]
pub struct FnClock<F>(pub F);

impl<F> Clock for FnClock<F>
where
    F: Fn() -> u32,
{
    #[inline]
    fn now_millis(&self) -> u32 {
        (self.0)()
    }
}

/// Virtual clock driven by hand.
///
/// Interior mutability lets one clock be shared by reference between several
/// filters while the polling loop moves time forward.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    /// Create a clock reading `start_millis`.
    pub const fn new(start_millis: u32) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    /// Jump to `millis`, which must not be earlier than now.
    pub fn set(&self, millis: u32) {
        debug_assert!(
            millis >= self.now.get(),
            "clock must not run backwards ({} -> {})",
            self.now.get(),
            millis
        );
        self.now.set(millis);
    }

    /// Move time forward by `millis`.
    pub fn advance(&self, millis: u32) {
        self.now.set(self.now.get().wrapping_add(millis));
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}

/// Source of raw, unfiltered readings.
///
/// Filters read their source at most once per step.
pub trait SampleSource<T> {
    fn read_raw(&mut self) -> T;
}

impl<T, F> SampleSource<T> for F
where
    F: FnMut() -> T,
{
    #[inline]
    fn read_raw(&mut self) -> T {
        self()
    }
}

/// Digital sample source backed by an `embedded-hal` input pin.
///
/// A failed read repeats the last good level (low before the first good
/// read), so a broken pin debounces to a constant value with no edges.
#[cfg(feature = "embedded-hal")]
#[derive(Debug)]
pub struct PinSource<P> {
    pin: P,
    last_level: bool,
}

#[cfg(feature = "embedded-hal")]
impl<P> PinSource<P>
where
    P: embedded_hal::digital::InputPin,
{
    /// Wrap `pin`, treating it as low until the first good read.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_level: false,
        }
    }

    /// Give back the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(feature = "embedded-hal")]
impl<P> SampleSource<bool> for PinSource<P>
where
    P: embedded_hal::digital::InputPin,
{
    fn read_raw(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => self.last_level = level,
            Err(_) => {
                trace!("pin read failed, holding last level");
            }
        }
        self.last_level
    }
}
