use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// One line per event: a coloured level marker, then the event fields.
/// Debug and trace events also name the module they came from, which tells
/// probe, search and run diagnostics apart.
pub struct SelftestFormatter;

impl<S, N> FormatEvent<S, N> for SelftestFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let marker = match *meta.level() {
            Level::TRACE => "[ ]".dimmed(),
            Level::DEBUG => "[?]".blue(),
            Level::INFO => "[+]".green().bold(),
            Level::WARN => "[*]".yellow().bold(),
            Level::ERROR => "[-]".red().bold(),
        };
        write!(writer, "{marker} ")?;

        if *meta.level() >= Level::DEBUG {
            write!(writer, "{}: ", meta.target().dimmed())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,ariel_selftest=debug"
    } else {
        "warn"
    }
}

/// Diagnostics go to stderr; stdout carries the report. `RUST_LOG` wins
/// over the verbosity default.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // a second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(SelftestFormatter)
        .try_init();
}
