//! One full probe run: intro, endpoint checks, simulation, outro.

use std::future::Future;
use std::io::{self, Write};

use chrono::Local;
use comfyprobe_comfyui::progress;

use crate::checks::{Probe, Target};
use crate::report::ReportWriter;

/// Run every check and write the report to `out`.
///
/// Checks race against `interrupt`. If it resolves first, the in-flight
/// request is dropped, remaining targets are skipped, and the simulation
/// and outro are still written. Returns `out` once everything is flushed.
pub async fn run_session<W: Write>(
    probe: &Probe,
    out: W,
    interrupt: impl Future<Output = ()>,
) -> io::Result<W> {
    let mut report = ReportWriter::new(out);
    report.intro(Local::now());

    tokio::pin!(interrupt);

    for (index, target) in Target::ALL.into_iter().enumerate() {
        report.group_header(index + 1, target);

        let interrupted = tokio::select! {
            _ = probe.run_observed(target, &mut report) => false,
            () = &mut interrupt => true,
        };

        if interrupted {
            tracing::info!(
                service = target.service_name(),
                "Interrupted, skipping remaining checks",
            );
            report.interrupted();
            break;
        }
    }

    report.simulation(Target::ALL.len() + 1, &progress::demo_states());
    report.outro(probe.config());
    report.finish()
}
