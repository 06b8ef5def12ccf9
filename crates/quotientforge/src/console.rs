//! Colorful console output for planner events.
//!
//! Provides a custom `tracing` layer that formats orchestrator events with
//! colors. Enabled by the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "quotientforge_planner=info,quotientforge=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing beyond the banner if another global subscriber is already set.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PlannerConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
  ___              _   _            _   _____
 / _ \ _   _  ___ | |_(_) ___ _ __ | |_|  ___|__  _ __ __ _  ___
| | | | | | |/ _ \| __| |/ _ \ '_ \| __| |_ / _ \| '__/ _` |/ _ \
| |_| | |_| | (_) | |_| |  __/ | | | |_|  _| (_) | | | (_| |  __/
 \__\_\\__,_|\___/ \__|_|\___|_| |_|\__|_|  \___/|_|  \__, |\___|
                                                      |___/
"#;

    let version_line = format!(
        "                   v{} - Quotient-Space Motion Planner\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("quotientforge") {
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

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    planner: Option<String>,
    status: Option<String>,
    dimensions: Option<String>,
    levels: Option<u64>,
    level: Option<u64>,
    from: Option<u64>,
    to: Option<u64>,
    frontier: Option<u64>,
    stop_level: Option<u64>,
    states: Option<u64>,
    samples: Option<u64>,
    iterations: Option<u64>,
    duration_ms: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "planner" => self.planner = Some(s),
            "status" => self.status = Some(s),
            "dimensions" => self.dimensions = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "levels" => self.levels = Some(value),
            "level" => self.level = Some(value),
            "from" => self.from = Some(value),
            "to" => self.to = Some(value),
            "frontier" => self.frontier = Some(value),
            "stop_level" => self.stop_level = Some(value),
            "states" => self.states = Some(value),
            "samples" => self.samples = Some(value),
            "iterations" => self.iterations = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "planner" => self.planner = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "setup" => format_setup(v),
        "solve_start" => format_solve_start(v),
        "level_solved" => format_level_solved(v),
        "frontier_advanced" => format_frontier_advanced(v),
        "solve_end" => format_solve_end(v),
        _ => String::new(),
    }
}

fn format_setup(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} on {} levels, dimensions {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Orchestrator]".bright_cyan(),
        v.planner.as_deref().unwrap_or("Unknown").white().bold(),
        v.levels.unwrap_or(0).to_string().bright_yellow(),
        v.dimensions.as_deref().unwrap_or("[]").bright_magenta()
    )
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Solving started: frontier ({}), stop level ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Orchestrator]".bright_cyan(),
        v.frontier.unwrap_or(0).to_string().yellow(),
        v.stop_level.unwrap_or(0).to_string().yellow()
    )
}

fn format_level_solved(v: &EventVisitor) -> String {
    format!(
        "    {} Level {:>2} solved | path states ({}), samples ({})",
        "->".bright_blue(),
        v.level.unwrap_or(0).to_string().white().bold(),
        v.states.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.samples.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta()
    )
}

fn format_frontier_advanced(v: &EventVisitor) -> String {
    format!(
        "    {} Frontier {} -> {}",
        "->".bright_blue(),
        v.from.unwrap_or(0).to_string().yellow(),
        v.to.unwrap_or(0).to_string().bright_yellow().bold()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("Unknown");
    let duration_ms = v.duration_ms.unwrap_or(0);
    let iterations = v.iterations.unwrap_or(0);
    let status_colored = if status == "Exact solution" {
        status.bright_green().bold().to_string()
    } else {
        status.yellow().bold().to_string()
    };

    format!(
        "{} {} {} Solving ended: status ({}), frontier ({}), time spent ({}), grow steps ({}), speed ({}/sec)",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Orchestrator]".bright_cyan(),
        status_colored,
        v.frontier.unwrap_or(0).to_string().yellow(),
        format_duration_ms(duration_ms).yellow(),
        iterations.to_formatted_string(&Locale::en).white(),
        steps_per_second(iterations, duration_ms)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold()
    )
}

fn steps_per_second(iterations: u64, duration_ms: u64) -> u64 {
    if duration_ms == 0 {
        return 0;
    }
    iterations.saturating_mul(1000) / duration_ms
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
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
