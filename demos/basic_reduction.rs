//! Basic example of reducing a GPS track in each projection.
//!
//! Run with: RUST_LOG=debug cargo run --example basic_reduction

use chrono::{Duration, TimeZone, Utc};
use track_reducer::{geo_utils, reduce, ProjectionMode, ReduceConfig, TrackPoint};

fn main() {
    env_logger::init();

    // A one-second recording of a loop around a London park, with a hill and
    // a coffee stop half way.
    let start = Utc.with_ymd_and_hms(2023, 5, 1, 8, 0, 0).unwrap();
    let mut elapsed = 0;
    let track: Vec<TrackPoint> = (0..600)
        .map(|i| {
            let angle = i as f64 / 600.0 * std::f64::consts::TAU;
            let wobble = (i as f64 * 0.35).sin() * 0.00002;
            elapsed += if i == 300 { 900 } else { 1 };
            TrackPoint::new(51.5074 + angle.sin() * 0.004 + wobble, -0.1278 + angle.cos() * 0.006)
                .with_elevation(20.0 + (angle * 2.0).sin().max(0.0) * 35.0)
                .with_time(start + Duration::seconds(elapsed))
        })
        .collect();

    println!("Track Reduction Examples\n");
    println!(
        "Input: {} points, {:.0}m, average speed {:.2} m/s\n",
        track.len(),
        geo_utils::polyline_length(&track),
        geo_utils::average_speed(&track).unwrap_or(geo_utils::DEFAULT_AVERAGE_SPEED)
    );

    let modes = [
        ProjectionMode::Planar,
        ProjectionMode::SpaceTime,
        ProjectionMode::Ellipsoidal,
        ProjectionMode::Auto,
    ];

    for (n, mode) in modes.into_iter().enumerate() {
        let config = ReduceConfig {
            target_points: 40,
            mode,
            ..ReduceConfig::default()
        };

        println!("{}. {:?} (resolves to {:?}):", n + 1, mode, mode.resolve(&track));
        match reduce(&track, &config) {
            Ok(reduction) => {
                let reduced = reduction.apply(&track);
                println!("   Kept: {} of {} points", reduction.kept_count(), reduction.len());
                println!("   Length: {:.0}m", geo_utils::polyline_length(&reduced));
                let stop_kept = reduction.kept_indices().iter().any(|&i| (299..=301).contains(&i));
                println!("   Coffee stop kept: {}\n", stop_kept);
            }
            Err(e) => println!("   Error: {}\n", e),
        }
    }
}
