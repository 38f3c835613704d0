//! # fixcap Demo
//!
//! This example simulates a small sensor hub. Raw readings stream into a
//! frame ring, a debounce filter decides when a sensor is "hot", and a
//! fixed map keeps the latest reading per sensor.
//!
//! Run with: `cargo run --example demo`

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use fixcap::{
    check, AssertionLog, FixedMap, FrameRing, MapSlot, RingConfig, SchmittTrigger,
    SharedFrameRing, TriggerConfig,
};

const SENSORS: usize = 4;

fn main() -> Result<()> {
    // Initialize logging so we can see what's happening
    fixcap::init_logging();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           fixcap Demo                                      ║");
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║ Two producer threads push readings into a shared ring,     ║");
    println!("║ then the ring is drained into a fixed map.                 ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let config = RingConfig::small_telemetry();
    println!("📦 Configuration:");
    println!("   Ring capacity: {} frames", config.capacity);
    println!("   Frame size: {} bytes", config.frame_size);
    println!("   Storage needed: {} bytes", config.needed_bytes());
    println!();

    // All storage is allocated up front, here on the caller side
    let mut ring_storage = vec![0u8; config.needed_bytes()];
    let ring = FrameRing::from_config(&config, &mut ring_storage)
        .context("Failed to create frame ring")?;
    let shared = SharedFrameRing::new(ring);

    println!("🛰️  Simulating sensor traffic...");
    thread::scope(|s| {
        for producer in 0..2u8 {
            let shared = &shared;
            s.spawn(move || {
                for tick in 0..40u8 {
                    let sensor = (tick + producer) % SENSORS as u8;
                    let reading = i16::from(tick) * 2 - 30 + i16::from(producer) * 5;
                    let mut frame = [0u8; 3];
                    frame[0] = sensor;
                    frame[1..].copy_from_slice(&reading.to_le_bytes());
                    shared.push_frame(&frame, Utc::now().timestamp_micros());
                    thread::sleep(Duration::from_micros(200));
                }
            });
        }
    });

    println!(
        "   Pushed {} readings, ring holds {} ({:.0}% full)",
        shared.update_count(),
        shared.frame_count(),
        shared.fill_percentage() * 100.0
    );
    println!();

    // Drain the ring
    let mut slots: [MapSlot<i16>; SENSORS] = Default::default();
    let mut latest = FixedMap::new(&mut slots);
    let mut trigger = SchmittTrigger::from_config(&TriggerConfig::default())
        .context("Failed to create debounce filter")?;
    let mut failure_storage = vec![0u8; AssertionLog::needed_bytes(8)];
    let mut failures = AssertionLog::new(8, &mut failure_storage)?;

    let mut ring = shared.into_inner();
    let mut out = [0u8; 3];
    let mut transitions = 0;

    while let Some(popped) = ring.pop(&mut out) {
        check!(failures, popped.length == 3);

        let reading = i16::from_le_bytes([out[1], out[2]]);
        let was_hot = trigger.state();
        if trigger.drive(i32::from(reading)) != was_hot {
            transitions += 1;
        }

        let count = latest.relate(reading, i32::from(out[0]));
        check!(failures, count != 0);
    }

    println!("📊 Latest reading per sensor:");
    for (sensor, reading) in latest.iter() {
        println!("   sensor {} -> {}", sensor, reading);
    }
    println!("   Debounce transitions: {}", transitions);
    println!();

    if failures.count() == 0 {
        println!("✅ No failed checks");
    } else {
        println!("⚠️  {} failed checks:", failures.count());
        for item in failures.iter() {
            println!("   {}:{}", item.file_name, item.line);
        }
    }

    println!("👋 Demo complete!");
    Ok(())
}
