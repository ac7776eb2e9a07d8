//! Log output: diagnostics on the console, the tick series in a rotated file.
//!
//! Tick lines (`<avg>,<peers>,<0|1>` under [`TICK_TARGET`]) are written bare
//! to the console and as `<time>,<line>` records to the file. Everything else
//! goes to the console only, filtered by `RUST_LOG` or `-v`.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;
use swarmguard_core::guard::TICK_TARGET;
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, Targets};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log files kept before the oldest is deleted (one per day)
const MAX_LOG_FILES: usize = 5;

/// `<time>,<message>` records for the tick series
struct CsvRecord;

impl<S, N> FormatEvent<S, N> for CsvRecord
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        SystemTime.format_time(&mut writer)?;
        writer.write_char(',')?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn ticks_only() -> Targets {
    Targets::new().with_target(TICK_TARGET, LevelFilter::INFO)
}

fn diagnostics(verbose: bool) -> Result<EnvFilter> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    Ok(filter.add_directive(format!("{TICK_TARGET}=off").parse::<Directive>()?))
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init(log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("swarmguard")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .without_time()
        .with_target(false)
        .with_filter(diagnostics(verbose)?);
    let console_ticks = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_filter(ticks_only());
    let file = fmt::layer()
        .with_ansi(false)
        .event_format(CsvRecord)
        .with_writer(file_writer)
        .with_filter(ticks_only());

    tracing_subscriber::registry()
        .with(console)
        .with(console_ticks)
        .with(file)
        .try_init()?;

    Ok(guard)
}
