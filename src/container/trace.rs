use std::collections::HashMap;

use super::api::ApiVersion;
use super::error::FormatError;

/// Simulation parameters needed to interpret a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceMetadata {
    /// Simulation time step in seconds
    pub step_size: f64,
    /// Number of output iterations; every block holds this many samples
    pub iteration_count: u64,
    /// Number of named data blocks
    pub block_count: u64,
}

/// Sample encoding of a V2 data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Double,
}

impl SampleKind {
    /// Decode the on-disk kind tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SampleKind::Int),
            1 => Some(SampleKind::Double),
            _ => None,
        }
    }

    /// On-disk kind tag
    pub fn tag(self) -> u8 {
        match self {
            SampleKind::Int => 0,
            SampleKind::Double => 1,
        }
    }
}

/// Version-specific payload layout recorded while decoding the header
#[derive(Debug, Clone, PartialEq)]
pub enum BlockLayout {
    /// Block-major `u32` samples
    V1,
    /// Row-chunked samples with a per-block kind
    V2 {
        /// Rows per payload chunk
        buffer_rows: u64,
        /// Sample kind of each block, in header order
        kinds: Vec<SampleKind>,
    },
}

/// Everything a container header describes, without any samples
#[derive(Debug, Clone, PartialEq)]
pub struct TraceHeader {
    /// API version that produced this header
    pub api: ApiVersion,
    /// Interpretation parameters
    pub metadata: TraceMetadata,
    /// Block names in on-disk order
    pub block_names: Vec<String>,
    /// Payload layout
    pub layout: BlockLayout,
}

impl TraceHeader {
    /// Number of named data blocks
    pub fn block_count(&self) -> usize {
        self.block_names.len()
    }
}

/// Decoded contents of one container: named sample series of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    api: ApiVersion,
    metadata: TraceMetadata,
    names: Vec<String>,
    samples: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl Trace {
    /// Build a trace, enforcing unique names and equal sample counts.
    ///
    /// `metadata.block_count` is recomputed from `blocks`.
    pub fn new(
        api: ApiVersion,
        step_size: f64,
        iteration_count: u64,
        blocks: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, FormatError> {
        let mut names = Vec::with_capacity(blocks.len());
        let mut samples = Vec::with_capacity(blocks.len());
        let mut index = HashMap::with_capacity(blocks.len());

        for (name, values) in blocks {
            if values.len() as u64 != iteration_count {
                return Err(FormatError::SampleCountMismatch {
                    block: name,
                    expected: iteration_count,
                    actual: values.len() as u64,
                });
            }
            if index.insert(name.clone(), names.len()).is_some() {
                return Err(FormatError::DuplicateBlock(name));
            }
            names.push(name);
            samples.push(values);
        }

        Ok(Self {
            api,
            metadata: TraceMetadata {
                step_size,
                iteration_count,
                block_count: names.len() as u64,
            },
            names,
            samples,
            index,
        })
    }

    /// Pair a decoded header with its payload
    pub(crate) fn from_parts(header: TraceHeader, samples: Vec<Vec<f64>>) -> Result<Self, FormatError> {
        let TraceHeader {
            api,
            metadata,
            block_names,
            ..
        } = header;
        if block_names.len() != samples.len() {
            return Err(FormatError::InvalidHeader(format!(
                "header names {} blocks but payload holds {}",
                block_names.len(),
                samples.len()
            )));
        }
        Self::new(
            api,
            metadata.step_size,
            metadata.iteration_count,
            block_names.into_iter().zip(samples).collect(),
        )
    }

    /// API version of the container this trace was decoded from
    pub fn api(&self) -> ApiVersion {
        self.api
    }

    /// Interpretation parameters
    pub fn metadata(&self) -> &TraceMetadata {
        &self.metadata
    }

    /// Samples of the named block
    pub fn block(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.samples[i].as_slice())
    }

    /// Block names in insertion order
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Blocks in insertion order
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.samples.iter().map(Vec::as_slice))
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.names.len()
    }
}
