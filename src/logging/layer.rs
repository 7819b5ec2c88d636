//! Event formatting on top of `tracing_subscriber::fmt`.
//!
//! fmt keeps span fields (rendered by [`JsonFields`]) and drives the writer;
//! [`EntryFormat`] turns an event plus its span scope into an [`Entry`] and
//! hands it to the configured encoder.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde_json::{Map, Value};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, JsonFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

use crate::logging::encoder::{Caller, Entry, EntryEncoder};
use crate::logging::level::at_least;
use crate::logging::sink::Output;

/// A logger's complete layer: level filter in front of the fmt layer.
pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the layer that filters by `level`, formats with `format` and
/// writes to `output`.
pub(crate) fn entry_layer(level: LevelFilter, format: EntryFormat, output: Output) -> BoxedLayer {
    let fmt_layer = tracing_subscriber::fmt::layer::<Registry>()
        .fmt_fields(JsonFields::new())
        .event_format(format)
        .with_writer(output)
        .log_internal_errors(false);

    Box::new(level.and_then(fmt_layer))
}

/// Formats events as encoded entries.
#[derive(Clone)]
pub(crate) struct EntryFormat {
    encoder: Arc<dyn EntryEncoder>,
    disable_caller: bool,
    stack_level: Option<Level>,
}

impl EntryFormat {
    pub(crate) fn new(
        encoder: Arc<dyn EntryEncoder>,
        disable_caller: bool,
        stack_level: Option<Level>,
    ) -> Self {
        Self {
            encoder,
            disable_caller,
            stack_level,
        }
    }
}

/// Fields rendered by [`JsonFields`], back as a map.
fn parse_fields(rendered: &str) -> Map<String, Value> {
    match serde_json::from_str(rendered) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

impl<S> FormatEvent<S, JsonFields> for EntryFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, JsonFields>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        // Span fields from root to leaf, then the event's own.
        let mut fields = Map::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(rendered) = extensions.get::<FormattedFields<JsonFields>>() {
                    fields.extend(parse_fields(&rendered.fields));
                }
            }
        }

        let mut rendered = String::new();
        ctx.format_fields(Writer::new(&mut rendered), event)?;
        let mut event_fields = parse_fields(&rendered);
        let message = match event_fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        fields.extend(event_fields);

        let stack = self
            .stack_level
            .filter(|threshold| at_least(metadata.level(), threshold))
            .map(|_| Backtrace::force_capture().to_string());

        let caller = (!self.disable_caller).then(|| Caller {
            file: metadata.file().map(str::to_string),
            line: metadata.line(),
        });

        let entry = Entry {
            level: *metadata.level(),
            time: Local::now(),
            caller,
            message,
            fields,
            stack,
        };

        let mut line = String::with_capacity(256);
        self.encoder.encode(&entry, &mut line);
        writer.write_str(&line)
    }
}
