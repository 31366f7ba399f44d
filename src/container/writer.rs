//! Container encoder
//!
//! Produces byte-exact V1 and V2 containers from a [`Trace`]. Used to build
//! fixtures and demo data; the analysis path never writes containers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;

use super::api::ApiVersion;
use super::compression::Compression;
use super::trace::{SampleKind, Trace};

/// Errors that can occur while encoding a container
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The trace cannot be represented in the requested layout
    #[error("cannot encode trace as {api}: {reason}")]
    Unrepresentable {
        /// Target layout
        api: ApiVersion,
        /// What does not fit
        reason: String,
    },
}

/// Encoder settings
#[derive(Debug, Clone, Copy)]
pub struct TraceWriter {
    /// Target layout
    pub api: ApiVersion,
    /// Outer compression
    pub compression: Compression,
    /// Rows per payload chunk (V2 only)
    pub buffer_rows: u64,
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self {
            api: ApiVersion::V2,
            compression: Compression::Bzip2,
            buffer_rows: 10_000,
        }
    }
}

impl TraceWriter {
    /// Writer for the given layout with default compression
    pub fn new(api: ApiVersion) -> Self {
        Self {
            api,
            ..Default::default()
        }
    }

    /// Set the outer compression
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the V2 chunk size
    pub fn buffer_rows(mut self, rows: u64) -> Self {
        self.buffer_rows = rows.max(1);
        self
    }

    /// Encode `trace` into a new file at `path`
    pub fn write_file<P: AsRef<Path>>(&self, trace: &Trace, path: P) -> Result<(), WriterError> {
        let file = BufWriter::new(File::create(path)?);
        self.write(trace, file)
    }

    /// Encode `trace` into `sink`, compressing as configured
    pub fn write<W: Write>(&self, trace: &Trace, sink: W) -> Result<(), WriterError> {
        match self.compression {
            Compression::Bzip2 => {
                let mut encoder = BzEncoder::new(sink, bzip2::Compression::default());
                self.write_uncompressed(trace, &mut encoder)?;
                encoder.finish()?.flush()?;
            }
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(sink, flate2::Compression::default());
                self.write_uncompressed(trace, &mut encoder)?;
                encoder.finish()?.flush()?;
            }
            Compression::None => {
                let mut sink = sink;
                self.write_uncompressed(trace, &mut sink)?;
                sink.flush()?;
            }
        }
        Ok(())
    }

    /// Encode tag, header and payload without compression
    pub fn write_uncompressed<W: Write>(&self, trace: &Trace, out: &mut W) -> Result<(), WriterError> {
        out.write_all(self.api.tag())?;
        match self.api {
            ApiVersion::V1 => self.write_v1(trace, out),
            ApiVersion::V2 => self.write_v2(trace, out),
        }
    }

    fn write_v1<W: Write>(&self, trace: &Trace, out: &mut W) -> Result<(), WriterError> {
        let meta = trace.metadata();
        let iterations = u32::try_from(meta.iteration_count)
            .map_err(|_| self.unrepresentable("iteration count exceeds u32"))?;
        let blocks = u32::try_from(trace.block_count())
            .map_err(|_| self.unrepresentable("block count exceeds u32"))?;

        out.write_f64::<LittleEndian>(meta.step_size)?;
        out.write_u32::<LittleEndian>(iterations)?;
        out.write_u32::<LittleEndian>(blocks)?;
        for name in trace.block_names() {
            let len = u16::try_from(name.len())
                .map_err(|_| self.unrepresentable(format!("block name {} is too long", name)))?;
            out.write_u16::<LittleEndian>(len)?;
            out.write_all(name.as_bytes())?;
        }

        for (name, values) in trace.blocks() {
            for &value in values {
                if value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
                    return Err(self.unrepresentable(format!(
                        "block {} holds {}, which is not a u32 count",
                        name, value
                    )));
                }
                out.write_u32::<LittleEndian>(value as u32)?;
            }
        }
        Ok(())
    }

    fn write_v2<W: Write>(&self, trace: &Trace, out: &mut W) -> Result<(), WriterError> {
        let meta = trace.metadata();
        out.write_f64::<LittleEndian>(meta.step_size)?;
        out.write_u64::<LittleEndian>(meta.iteration_count)?;
        out.write_u64::<LittleEndian>(self.buffer_rows.max(1))?;
        out.write_u64::<LittleEndian>(trace.block_count() as u64)?;

        let mut kinds = Vec::with_capacity(trace.block_count());
        for (name, values) in trace.blocks() {
            if name.as_bytes().contains(&0) {
                return Err(self.unrepresentable(format!("block name {:?} contains NUL", name)));
            }
            let kind = sample_kind(values);
            out.write_all(name.as_bytes())?;
            out.write_u8(0)?;
            out.write_u8(kind.tag())?;
            kinds.push(kind);
        }

        let columns: Vec<&[f64]> = trace.blocks().map(|(_, values)| values).collect();
        let chunk = usize::try_from(self.buffer_rows.max(1)).unwrap_or(usize::MAX);
        let total = meta.iteration_count as usize;
        let mut start = 0;
        while start < total {
            let end = start.saturating_add(chunk).min(total);
            for (values, kind) in columns.iter().zip(&kinds) {
                for &value in &values[start..end] {
                    match kind {
                        SampleKind::Int => out.write_i64::<LittleEndian>(value as i64)?,
                        SampleKind::Double => out.write_f64::<LittleEndian>(value)?,
                    }
                }
            }
            start = end;
        }
        Ok(())
    }

    fn unrepresentable(&self, reason: impl Into<String>) -> WriterError {
        WriterError::Unrepresentable {
            api: self.api,
            reason: reason.into(),
        }
    }
}

/// Integral series are stored as integers, anything else as doubles
fn sample_kind(values: &[f64]) -> SampleKind {
    let integral = values
        .iter()
        .all(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64);
    if integral {
        SampleKind::Int
    } else {
        SampleKind::Double
    }
}
