use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::api::read_api_tag;
use super::compression::Compression;
use super::error::ContainerError;
use super::trace::{Trace, TraceHeader};

/// Entry point for reading MCell binary containers.
///
/// Compression is detected from the file's leading bytes, the API tag selects
/// the decoder, and the result is a version-independent [`Trace`].
pub struct ContainerReader;

impl ContainerReader {
    /// Read only the header of a container file.
    ///
    /// No samples are decoded, so this is cheap even for very large files.
    pub fn open_header<P: AsRef<Path>>(path: P) -> Result<TraceHeader, ContainerError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let header = Self::read_header(file)?;
        debug!(
            "{}: {} with {} blocks",
            path.display(),
            header.api,
            header.block_count()
        );
        Ok(header)
    }

    /// Read a container file completely
    pub fn open_full<P: AsRef<Path>>(path: P) -> Result<Trace, ContainerError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let trace = Self::read_trace(file)?;
        debug!(
            "{}: {} with {} blocks x {} iterations",
            path.display(),
            trace.api(),
            trace.block_count(),
            trace.metadata().iteration_count
        );
        Ok(trace)
    }

    /// Read only the header from a (possibly compressed) stream
    pub fn read_header<R: Read>(reader: R) -> Result<TraceHeader, ContainerError> {
        let (_, mut stream) = Compression::decompress(BufReader::new(reader))?;
        Self::decode_header(&mut stream)
    }

    /// Read header and data from a (possibly compressed) stream
    pub fn read_trace<R: Read>(reader: R) -> Result<Trace, ContainerError> {
        let (_, mut stream) = Compression::decompress(BufReader::new(reader))?;
        let header = Self::decode_header(&mut stream)?;
        let samples = header.api.decoder().decode_data(&mut stream, &header)?;
        Ok(Trace::from_parts(header, samples)?)
    }

    fn decode_header(stream: &mut dyn Read) -> Result<TraceHeader, ContainerError> {
        let api = read_api_tag(stream)?;
        api.decoder().decode_header(stream)
    }
}
