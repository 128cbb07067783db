//! Native messaging host for the Daily Life dashboard.
//!
//! Runs as a standalone process started by the browser and talks to it over
//! stdin/stdout using the native messaging protocol.

use dailylife_lib::{config::TrackerConfig, native_host::NativeHost, open_default_tracker};
use std::io;

#[allow(clippy::print_stderr, reason = "stdout carries the protocol; stderr is the browser's log")]
fn main() {
    let tracker = match open_default_tracker(TrackerConfig::default()) {
        Ok(tracker) => tracker,
        Err(e) => {
            eprintln!("Initialization error: {e}");
            std::process::exit(1);
        }
    };

    let mut host = NativeHost::new(tracker);

    // Serve until the browser closes the connection
    if let Err(e) = host.run(io::stdin().lock(), io::stdout().lock()) {
        eprintln!("Native host error: {e}");
        std::process::exit(1);
    }
}
