//! Entry encoders.
//!
//! # Responsibilities
//! - Turn a captured [`Entry`] into bytes for the sinks
//! - Keep the `level`, `msg` and `caller` keys stable across encodings
//!
//! # Design Decisions
//! - JSON keys are written in a fixed order: level, ts, caller, msg, fields,
//!   stacktrace
//! - Console output is tab separated, with context fields as a trailing
//!   JSON object
//! - Reserved keys always win over same-named fields

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, Offset, TimeZone};
use serde_json::{Map, Value};
use tracing::Level;

use crate::logging::level::{ansi_color, capital_label, lowercase_label};
use crate::logging::options::{EncoderConfig, Encoding, LevelStyle, TimeStyle};

/// Source location of a log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Caller {
    /// Short form: last directory and file name, e.g. `logging/sink.rs:42`.
    pub fn short(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{}:{}", trim_path(file), line),
            (Some(file), None) => trim_path(file).to_string(),
            _ => "undefined".to_string(),
        }
    }
}

fn trim_path(file: &str) -> &str {
    let mut separators = file.rmatch_indices(['/', '\\']);
    match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}

/// A single log entry, ready to encode.
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Local>,
    pub caller: Option<Caller>,
    pub message: String,
    pub fields: Map<String, Value>,
    pub stack: Option<String>,
}

/// Serializes entries into a line-oriented format.
pub trait EntryEncoder: Send + Sync {
    /// Append the encoded entry, including the trailing newline, to `buf`.
    fn encode(&self, entry: &Entry, buf: &mut String);
}

/// Build the encoder for an encoding.
pub fn encoder_for(encoding: Encoding, config: EncoderConfig) -> Arc<dyn EntryEncoder> {
    match encoding {
        Encoding::Json => Arc::new(JsonEncoder::new(config)),
        Encoding::Console => Arc::new(ConsoleEncoder::new(config)),
    }
}

fn render_level(style: LevelStyle, level: &Level) -> String {
    match style {
        LevelStyle::Lowercase => lowercase_label(level).to_string(),
        LevelStyle::CapitalColor => {
            format!("\x1b[{}m{}\x1b[0m", ansi_color(level), capital_label(level))
        }
    }
}

fn render_time(style: TimeStyle, time: &DateTime<Local>) -> Value {
    match style {
        TimeStyle::EpochSeconds => {
            let secs = time.timestamp() as f64;
            let nanos = f64::from(time.timestamp_subsec_nanos()) / 1e9;
            serde_json::Number::from_f64(secs + nanos)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        }
        TimeStyle::Iso8601 => Value::String(iso8601(time)),
    }
}

/// `2006-01-02T15:04:05.000-0700`, with `Z` in place of a zero offset.
fn iso8601<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let stamp = time.format("%Y-%m-%dT%H:%M:%S%.3f");
    if time.offset().fix().local_minus_utc() == 0 {
        format!("{stamp}Z")
    } else {
        format!("{stamp}{}", time.format("%z"))
    }
}

/// One JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl EntryEncoder for JsonEncoder {
    fn encode(&self, entry: &Entry, buf: &mut String) {
        let cfg = &self.config;
        let mut object = Map::new();

        // Escape codes have no place in a machine-readable document.
        object.insert(
            cfg.level_key.to_string(),
            Value::String(lowercase_label(&entry.level).to_string()),
        );
        object.insert(cfg.time_key.to_string(), render_time(cfg.time_style, &entry.time));
        if let Some(caller) = &entry.caller {
            object.insert(cfg.caller_key.to_string(), Value::String(caller.short()));
        }
        object.insert(cfg.message_key.to_string(), Value::String(entry.message.clone()));

        for (key, value) in &entry.fields {
            if is_reserved(cfg, key) {
                continue;
            }
            object.insert(key.clone(), value.clone());
        }

        if let Some(stack) = &entry.stack {
            object.insert(cfg.stacktrace_key.to_string(), Value::String(stack.clone()));
        }

        buf.push_str(&Value::Object(object).to_string());
        buf.push('\n');
    }
}

fn is_reserved(cfg: &EncoderConfig, key: &str) -> bool {
    [
        cfg.level_key,
        cfg.time_key,
        cfg.caller_key,
        cfg.message_key,
        cfg.stacktrace_key,
    ]
    .contains(&key)
}

/// Tab-separated text for terminals.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl EntryEncoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, buf: &mut String) {
        let cfg = &self.config;
        let mut columns: Vec<String> = Vec::with_capacity(5);

        columns.push(match render_time(cfg.time_style, &entry.time) {
            Value::String(s) => s,
            other => other.to_string(),
        });
        columns.push(render_level(cfg.level_style, &entry.level));
        if let Some(caller) = &entry.caller {
            columns.push(caller.short());
        }
        columns.push(entry.message.clone());
        if !entry.fields.is_empty() {
            columns.push(Value::Object(entry.fields.clone()).to_string());
        }

        buf.push_str(&columns.join("\t"));
        if let Some(stack) = &entry.stack {
            buf.push('\n');
            buf.push_str(stack.trim_end());
        }
        buf.push('\n');
    }
}
