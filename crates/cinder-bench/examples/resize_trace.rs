//! Replays a short workload with resize tracing enabled.
//!
//! ```text
//! RUST_LOG=cinder_buffer=trace cargo run -p cinder-bench --example resize_trace
//! ```

use cinder_bench::{replay, WorkloadProfile};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinder_buffer=trace")),
        )
        .init();

    let profile = WorkloadProfile {
        ops: 32,
        max_count: 16,
        ..WorkloadProfile::shared_heavy()
    };
    let (buffer, stats) = replay(&profile.generate(2024))?;

    println!("final length:     {}", buffer.len());
    println!("released:         {}", stats.released);
    println!("shrunk in place:  {}", stats.shrunk_in_place);
    println!("reallocated:      {}", stats.reallocated);
    println!("writes:           {}", stats.writes);
    Ok(())
}
