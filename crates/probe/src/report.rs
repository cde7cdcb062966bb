//! Console report.
//!
//! All output goes through an [`io::Write`] so the same code drives
//! stdout in the binary and an in-memory buffer in tests. Check results
//! are written as they arrive via [`ReportWriter`]'s [`CheckObserver`]
//! impl.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use comfyprobe_comfyui::api::Endpoint;
use comfyprobe_comfyui::progress::{self, ProgressState};
use comfyprobe_comfyui::status::{ProgressSnapshot, QueueSnapshot};

use crate::checks::{CheckObserver, CheckOutcome, EndpointCheck, Target};
use crate::config::ProbeConfig;

const INDENT: &str = "   ";
const RULE_WIDTH: usize = 60;

/// Capabilities the progress integration is expected to provide.
const FEATURES: [&str; 5] = [
    "Real-time progress polling every 500ms",
    "Human-readable operation names",
    "ETA calculation",
    "Queue status monitoring",
    "Seamless integration with Open WebUI",
];

/// Streams the report into a writer.
///
/// The first write error is kept and every later write is skipped; it
/// surfaces from [`finish`](Self::finish).
pub struct ReportWriter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    pub fn intro(&mut self, started_at: DateTime<Local>) {
        self.emit(|out| {
            write_intro(out, started_at)?;
            write_checks_header(out)
        });
    }

    /// Heading for the `section`-th target.
    pub fn group_header(&mut self, section: usize, target: Target) {
        self.emit(|out| write_group_header(out, section, target));
    }

    pub fn interrupted(&mut self) {
        self.emit(|out| write_interrupted(out));
    }

    pub fn simulation(&mut self, section: usize, states: &[ProgressState]) {
        self.emit(|out| write_simulation(out, section, states));
    }

    pub fn outro(&mut self, config: &ProbeConfig) {
        self.emit(|out| write_outro(out, config));
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        // Flushed per call so a hung request shows what came before it.
        if let Err(e) = f(&mut self.out).and_then(|()| self.out.flush()) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> CheckObserver for ReportWriter<W> {
    fn request_started(&mut self, target: Target, endpoint: Endpoint, path: &str) {
        self.emit(|out| write_request_line(out, target, endpoint, path));
    }

    fn check_finished(&mut self, target: Target, check: &EndpointCheck) {
        self.emit(|out| write_check_result(out, target, check));
    }

    fn target_unreachable(&mut self, target: Target, base_url: &str, error: &str) {
        self.emit(|out| write_unreachable(out, target, base_url, error));
    }
}

pub fn write_intro(out: &mut impl Write, started_at: DateTime<Local>) -> io::Result<()> {
    let title = "ComfyUI Progress Bar Integration Test";
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.len()))?;
    writeln!(out)?;
    writeln!(out, "Started at {}", started_at.format("%Y-%m-%d %H:%M:%S %:z"))?;
    writeln!(
        out,
        "This test verifies the real-time progress tracking functionality."
    )?;
    writeln!(out, "Features implemented:")?;
    for feature in FEATURES {
        writeln!(out, "• {feature}")?;
    }
    writeln!(out)
}

/// Banner printed before the endpoint checks start.
pub fn write_checks_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🧪 Testing ComfyUI Progress Bar Integration")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// `section` is the 1-based section number shown in the heading.
pub fn write_group_header(out: &mut impl Write, section: usize, target: Target) -> io::Result<()> {
    let heading = match target {
        Target::Backend => "Testing direct ComfyUI endpoints",
        Target::Gateway => "Testing Open WebUI proxy endpoints",
    };
    writeln!(out)?;
    writeln!(out, "{section}. {heading}:")
}

pub fn write_request_line(
    out: &mut impl Write,
    target: Target,
    endpoint: Endpoint,
    path: &str,
) -> io::Result<()> {
    let icon = match endpoint {
        Endpoint::Progress => "📊",
        Endpoint::Queue => "📋",
    };
    match target {
        Target::Backend => writeln!(out, "{INDENT}{icon} Testing {path} endpoint..."),
        Target::Gateway => writeln!(out, "{INDENT}{icon} Testing {path}..."),
    }
}

pub fn write_check_result(
    out: &mut impl Write,
    target: Target,
    check: &EndpointCheck,
) -> io::Result<()> {
    let label = result_label(target, check.endpoint);
    match &check.outcome {
        CheckOutcome::Success(body) => {
            writeln!(out, "{INDENT}✅ {label}: {body}")?;
            write_summary(out, check.endpoint, body)
        }
        CheckOutcome::Failed { status } => writeln!(out, "{INDENT}❌ {label} failed: {status}"),
    }
}

pub fn write_unreachable(
    out: &mut impl Write,
    target: Target,
    base_url: &str,
    error: &str,
) -> io::Result<()> {
    let service = target.service_name();
    writeln!(out, "{INDENT}❌ {service} connection failed: {error}")?;
    writeln!(
        out,
        "{INDENT}💡 Make sure {service} is running on {}",
        host_and_port(base_url)
    )
}

pub fn write_interrupted(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "🛑 Test interrupted by user")
}

/// Write the canned progress walk-through.
pub fn write_simulation(
    out: &mut impl Write,
    section: usize,
    states: &[ProgressState],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{section}. Simulating Progress Bar Display:")?;
    writeln!(
        out,
        "{INDENT}🎨 This is how the progress would appear in Open WebUI:"
    )?;
    writeln!(out)?;
    for state in states {
        writeln!(out, "{INDENT}{}", state.render_line())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{INDENT}✅ Progress bar would update every 500ms with real-time data!"
    )
}

pub fn write_outro(out: &mut impl Write, config: &ProbeConfig) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "🎉 Integration Test Complete!")?;
    writeln!(out)?;
    writeln!(out, "Next steps:")?;
    writeln!(
        out,
        "1. Start Open WebUI with the progress bar integration on {}",
        host_and_port(&config.open_webui_url)
    )?;
    writeln!(
        out,
        "2. Start ComfyUI on {}",
        host_and_port(&config.comfyui_url)
    )?;
    writeln!(out, "3. Generate an image and watch the real-time progress!")?;
    writeln!(out)?;
    writeln!(out, "The progress bar will show:")?;
    writeln!(out, "• Current operation (Loading Model, Sampling, etc.)")?;
    writeln!(out, "• Progress percentage and step count")?;
    writeln!(out, "• Estimated time remaining")?;
    writeln!(out, "• Queue status if multiple generations are pending")
}

/// Parsed one-line summary under a successful response, when its shape is known.
fn write_summary(
    out: &mut impl Write,
    endpoint: Endpoint,
    body: &serde_json::Value,
) -> io::Result<()> {
    match endpoint {
        Endpoint::Progress => {
            if let Some(snap) = ProgressSnapshot::from_value(body) {
                let label = match &snap.node {
                    Some(node) => format!("Node {node}"),
                    None => "Executing".to_string(),
                };
                writeln!(
                    out,
                    "{INDENT}   {}",
                    progress::render_line(snap.value, snap.max, &label)
                )?;
            }
        }
        Endpoint::Queue => {
            if let Some(queue) = QueueSnapshot::from_value(body) {
                writeln!(
                    out,
                    "{INDENT}   {} running, {} pending",
                    queue.running(),
                    queue.pending()
                )?;
            }
        }
    }
    Ok(())
}

fn result_label(target: Target, endpoint: Endpoint) -> &'static str {
    match (target, endpoint) {
        (Target::Backend, Endpoint::Progress) => "Progress",
        (Target::Backend, Endpoint::Queue) => "Queue",
        (Target::Gateway, Endpoint::Progress) => "Progress proxy",
        (Target::Gateway, Endpoint::Queue) => "Queue proxy",
    }
}

/// `host:port` of a base URL, or the URL itself if it does not parse.
fn host_and_port(base_url: &str) -> String {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            let host = url.host_str()?.to_string();
            let port = url.port_or_known_default()?;
            Some(format!("{host}:{port}"))
        })
        .unwrap_or_else(|| base_url.to_string())
}
