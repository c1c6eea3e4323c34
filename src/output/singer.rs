//! Singer message stream
//!
//! Records are emitted as newline-delimited JSON: one `SCHEMA` message for
//! the stream, then one `RECORD` message per extracted page.

use crate::pipeline::Record;
use crate::TapError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
enum Message<'a> {
    Schema {
        stream: &'a str,
        schema: Value,
        key_properties: [&'static str; 1],
    },
    Record {
        stream: &'a str,
        record: &'a Record,
        time_extracted: DateTime<Utc>,
    },
}

/// JSON schema describing a [`Record`]
pub fn record_schema() -> Value {
    let metadata = json!({
        "type": "object",
        "properties": {
            "source": { "type": "string" },
            "page_url": { "type": "string" }
        }
    });

    json!({
        "type": "object",
        "properties": {
            "source": { "type": "string" },
            "page_url": { "type": "string" },
            "page_content": { "type": "string" },
            "metadata": metadata
        },
        "required": ["source", "page_url", "page_content"]
    })
}

/// Writes Singer messages for one stream
pub struct SingerWriter<W: Write> {
    writer: W,
    stream: String,
    records_written: usize,
}

impl<W: Write> SingerWriter<W> {
    pub fn new(writer: W, stream: impl Into<String>) -> Self {
        Self {
            writer,
            stream: stream.into(),
            records_written: 0,
        }
    }

    pub fn write_schema(&mut self) -> Result<(), TapError> {
        let message = Message::Schema {
            stream: &self.stream,
            schema: record_schema(),
            key_properties: ["source"],
        };
        serde_json::to_writer(&mut self.writer, &message)?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Writes a record stamped with the current time
    pub fn write_record(&mut self, record: &Record) -> Result<(), TapError> {
        self.write_record_at(record, Utc::now())
    }

    pub fn write_record_at(
        &mut self,
        record: &Record,
        time_extracted: DateTime<Utc>,
    ) -> Result<(), TapError> {
        let message = Message::Record {
            stream: &self.stream,
            record,
            time_extracted,
        };
        serde_json::to_writer(&mut self.writer, &message)?;
        writeln!(self.writer)?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<(), TapError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
