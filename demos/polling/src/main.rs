//! Simulated polling loop driving a debounced button and an EMA filtered ADC.
//!
//! Time is virtual: one loop iteration per millisecond.

use core::cell::Cell;

use input_conditioning::{DebounceInput, EmaInput, ManualClock};

fn adc_to_millivolts(raw: u32) -> u32 {
    raw * 3300 / 4095
}

fn main() {
    println!("=== input-conditioning polling demo ===\n");

    let clock = ManualClock::new(0);
    let button = Cell::new(false);
    let adc = Cell::new(2048_u32);

    let mut debounced = DebounceInput::new(|| button.get(), &clock);
    let mut filtered = EmaInput::with_conversion(|| adc.get(), 2048, 32, adc_to_millivolts);

    // Button pressed at 200ms with 20ms of contact bounce, released at 600ms.
    // ADC noise of +-60 counts around a slow ramp.
    let mut noise = 0x1234_u32;
    for t in 0..1_000_u32 {
        clock.set(t);

        button.set(match t {
            200..=219 => t % 3 != 0,
            220..=599 => true,
            600..=619 => t % 3 == 0,
            _ => false,
        });

        noise = noise.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let jitter = (noise >> 16) % 121;
        adc.set((2000 + t + jitter).saturating_sub(60));

        debounced.run();
        filtered.run();

        if debounced.rose() {
            println!("{:4}ms  button pressed", t);
        }
        if debounced.fell() {
            println!("{:4}ms  button released", t);
        }
        if t % 100 == 0 {
            println!(
                "{:4}ms  adc raw {:4} -> filtered {:4} ({} mV)",
                t,
                adc.get(),
                filtered.filtered_raw(),
                filtered.filtered_value()
            );
        }
    }
}
