//! Replaying Synthetic Frames
//!
//! This example drives a counting session over scripted synthetic hands.
//!
//! Key concepts:
//! - Building a session with `SessionBuilder`
//! - Stepping frames as effects and committing their reports
//! - A seeded environment with a stepped clock for repeatable runs
//!
//! Run with: cargo run --example replay

use chrono::Utc;
use fumble::builder::SessionBuilder;
use fumble::confirm::Progress;
use fumble::core::{synth, Frame, Resolution};
use fumble::effects::LiveEnv;
use fumble::gags::GagConfig;
use std::time::Duration;
use stillwater::effect::Effect;

fn script() -> Vec<Frame> {
    let mut frames = vec![Frame::new(synth::hands_showing(3)); 32];
    frames.extend(vec![Frame::empty(); 2]);
    frames.extend(vec![Frame::new(synth::hands_showing(2)); 21]);
    frames
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== Replay ===\n");

    let mut session = SessionBuilder::new()
        .capture(Resolution::new(640, 480))
        .required_frames(10)
        .gags(GagConfig::disabled())
        .build()?;
    let env = LiveEnv::seeded(7)
        .with_stepped_clock(Utc::now(), Duration::from_millis(33))
        .without_stalls();

    for frame in script() {
        let output = session.step(frame).run(&env).await?;
        let report = session.apply_result(output);

        match &report.progress {
            Some(Progress::Accepted { .. }) => println!(
                "frame {:>2}: unit {} of {:?} confirmed",
                report.index,
                report.state.current_count,
                report.state.target_count
            ),
            Some(Progress::Completed { total, .. }) => {
                println!("frame {:>2}: DONE! Counted {total}", report.index)
            }
            None if report.reset.is_some() => {
                println!("frame {:>2}: no hands, starting over", report.index)
            }
            _ if report.index % 10 == 0 => println!(
                "frame {:>2}: {:?} at {}%",
                report.index,
                report.phase,
                report.progress_percent().unwrap_or(0)
            ),
            _ => {}
        }
    }

    let state = session.machine().state();
    println!("\nFinal: {} of {:?}", state.current_count, state.target_count);
    Ok(())
}
