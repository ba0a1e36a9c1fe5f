use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Default filter directive when RUST_LOG is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "exambank=debug,warn"
    } else {
        "exambank=warn,error"
    }
}

/// `LEVEL [HH:MM:SS] target: message`, where the target names the stage module
/// (exambank::lexer, exambank::parser, exambank::semantics, ...)
pub struct StageFormatter;

impl<S, N> FormatEvent<S, N> for StageFormatter
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
        let metadata = event.metadata();
        let timestamp = Local::now().format("%H:%M:%S");

        let level_str = match *metadata.level() {
            tracing::Level::TRACE => "TRACE",
            tracing::Level::DEBUG => "DEBUG",
            tracing::Level::INFO => "INFO ",
            tracing::Level::WARN => "WARN ",
            tracing::Level::ERROR => "ERROR",
        };

        write!(
            writer,
            "{} [{}] {}: ",
            level_str,
            timestamp,
            metadata.target()
        )?;

        // Message and any other fields
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "exambank=debug,warn");
        assert_eq!(default_filter(false), "exambank=warn,error");
    }
}
