//! Colorful console output for shadowcat events.
//!
//! Provides a custom `tracing` layer that formats assembly and solve events
//! with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Configuration built, constraints loaded, solve start and end
//! - **WARN**: Solves without a usable selection, solver failures
//! - **DEBUG/TRACE**: Per-constraint and per-entity parsing (not formatted)

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static STEPS: AtomicU64 = AtomicU64::new(0);

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "shadowcat_solver=info,shadowcat_config=info,shadowcat_core=info";

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing. `RUST_LOG` overrides
/// [`DEFAULT_FILTER`].
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();
        EPOCH.get_or_init(Instant::now);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ShadowCatConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

fn print_banner() {
    let banner = r#"
     _               _                          _
 ___| |__   __ _  __| | _____      _____ __ _| |_
/ __| '_ \ / _` |/ _` |/ _ \ \ /\ / / __/ _` | __|
\__ \ | | | (_| | (_| | (_) \ V  V / (_| (_| | |_
|___/_| |_|\__,_|\__,_|\___/ \_/\_/ \___\__,_|\__|
"#;

    let version_line = format!("          v{} - Shadow-Test Assembly for CAT\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats shadowcat events with colors.
pub struct ShadowCatConsoleLayer;

impl<S: Subscriber> Layer<S> for ShadowCatConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("shadowcat") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    id: Option<String>,
    status: Option<String>,
    error: Option<String>,
    objective: Option<f64>,
    test_length: Option<u64>,
    item_count: Option<u64>,
    passage_count: Option<u64>,
    constraint_count: Option<u64>,
    skipped: Option<u64>,
    eligible_count: Option<u64>,
    administered_count: Option<u64>,
    selected_count: Option<u64>,
    duration_ms: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "id" => self.id = Some(s),
            "status" => self.status = Some(s),
            "error" => self.error = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "test_length" => self.test_length = Some(value),
            "item_count" => self.item_count = Some(value),
            "passage_count" => self.passage_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "skipped" => self.skipped = Some(value),
            "eligible_count" => self.eligible_count = Some(value),
            "administered_count" => self.administered_count = Some(value),
            "selected_count" => self.selected_count = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "objective" {
            self.objective = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "config_built" => format_config_built(v),
        "constraints_loaded" => format_constraints_loaded(v),
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "solve_failed" => format_solve_failed(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn count(value: Option<u64>) -> String {
    value
        .unwrap_or(0)
        .to_formatted_string(&Locale::en)
        .bright_yellow()
        .to_string()
}

fn format_config_built(v: &EventVisitor) -> String {
    let id = v.id.as_deref().filter(|id| !id.is_empty()).unwrap_or("test");
    let mut output = format!(
        "{} {} {} │ length {} │ {} items",
        format_elapsed(),
        "●".bright_green().bold(),
        id.white().bold(),
        count(v.test_length),
        count(v.item_count),
    );
    if v.passage_count.unwrap_or(0) > 0 {
        output.push_str(&format!(" │ {} passages", count(v.passage_count)));
    }
    output.push_str(&format!(" │ {} constraints", count(v.constraint_count)));
    output
}

fn format_constraints_loaded(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} constraints loaded",
        format_elapsed(),
        "≡".bright_blue(),
        count(v.constraint_count),
    );
    let skipped = v.skipped.unwrap_or(0);
    if skipped > 0 {
        output.push_str(&format!(
            " │ {} skipped",
            skipped.to_formatted_string(&Locale::en).bright_black()
        ));
    }
    output
}

fn format_solve_start(v: &EventVisitor) -> String {
    let step = STEPS.fetch_add(1, Ordering::Relaxed) + 1;
    format!(
        "{} {} Step {} │ {} eligible of {} │ {} administered │ {} constraints",
        format_elapsed(),
        "▶".bright_green().bold(),
        step.to_formatted_string(&Locale::en).white().bold(),
        count(v.eligible_count),
        count(v.item_count),
        count(v.administered_count),
        count(v.constraint_count),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("OTHER");
    format!(
        "{} {} {} │ objective {} │ {} selected │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(status),
        format_objective(v.objective.unwrap_or(0.0)),
        count(v.selected_count),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_solve_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} Solver failed │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.error.as_deref().unwrap_or("unknown error").bright_red(),
    )
}

fn format_status(status: &str) -> String {
    match status {
        "OPTIMAL" => status.bright_green().bold().to_string(),
        "UNFINISHED" => status.bright_yellow().bold().to_string(),
        "INFEASIBLE" | "UNBOUNDED" => status.bright_red().bold().to_string(),
        _ => status.white().bold().to_string(),
    }
}

fn format_objective(objective: f64) -> String {
    format!("{:.4}", objective).bright_magenta().to_string()
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_format() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_status_keeps_text() {
        for status in ["OPTIMAL", "UNFINISHED", "INFEASIBLE", "UNBOUNDED", "OTHER"] {
            assert!(format_status(status).contains(status));
        }
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let visitor = EventVisitor {
            event: Some("constraint_parsed".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_constraints_loaded_mentions_skipped() {
        let visitor = EventVisitor {
            event: Some("constraints_loaded".to_string()),
            constraint_count: Some(1200),
            skipped: Some(3),
            ..EventVisitor::default()
        };
        let output = format_event(&visitor);
        assert!(output.contains("1,200"));
        assert!(output.contains("skipped"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
