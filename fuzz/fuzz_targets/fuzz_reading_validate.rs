//! Fuzz target: reading validation and rule evaluation
//!
//! Builds readings from raw bytes (including NaN, infinities and
//! subnormals) and verifies:
//! - `Reading::validate` never panics
//! - A reading that validates always evaluates to at most one action per
//!   device class, for both occupancy values
//!
//! cargo fuzz run fuzz_reading_validate

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartroom::rules::{DeviceClass, evaluate_cycle};
use smartroom::sensors::{Reading, ReadingLimits, TimeSlot};

fn f32_at(data: &[u8], i: usize) -> f32 {
    let mut buf = [0u8; 4];
    for (k, b) in buf.iter_mut().enumerate() {
        *b = data.get(i * 4 + k).copied().unwrap_or(0);
    }
    f32::from_le_bytes(buf)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 {
        return;
    }
    let flags = data[16];
    let slot = match flags & 0b11 {
        0 => TimeSlot::Day,
        1 => TimeSlot::Night,
        2 => TimeSlot::HighTariff,
        _ => TimeSlot::LowTariff,
    };
    let mut reading = Reading::new(f32_at(data, 0), f32_at(data, 1)).with_time_slot(slot);
    if flags & 0b100 != 0 {
        reading = reading.with_humidity(f32_at(data, 2));
    }
    if flags & 0b1000 != 0 {
        reading = reading.with_power(f32_at(data, 3));
    }

    if reading.validate(&ReadingLimits::default()).is_err() {
        return;
    }
    for occupied in [false, true] {
        let agg = evaluate_cycle(&reading, occupied);
        for class in DeviceClass::ALL {
            let n = agg.actions.iter().filter(|a| a.device_class() == Some(class)).count();
            assert!(n <= 1, "{class:?} got {n} actions for {reading:?}");
        }
    }
});
