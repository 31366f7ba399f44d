//! `MCELL_BINARY_API_2` layout
//!
//! ```text
//! f64  step_size
//! u64  iteration_count
//! u64  buffer_rows
//! u64  block_count
//! block_count × { NUL-terminated name (UTF-8), u8 sample kind }
//! payload, row-chunked: for each chunk of up to buffer_rows rows,
//!     every block in header order contributes its rows (i64 or f64)
//! ```
//!
//! The chunked payload mirrors how the simulator flushes its output buffer:
//! all blocks are written once per full buffer, so a reader has to stitch the
//! chunks back into per-block series.

use std::collections::HashSet;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use super::api::{capped_capacity, check_step_size, ApiVersion, VersionedDecoder};
use super::error::{truncated, ContainerError, FormatError};
use super::trace::{BlockLayout, SampleKind, TraceHeader, TraceMetadata};

/// Longest block name accepted before the header is considered corrupt
const MAX_NAME_LENGTH: usize = 4096;

/// Decoder for the second container layout
pub struct V2Decoder;

impl V2Decoder {
    fn read_name(reader: &mut dyn Read) -> Result<String, ContainerError> {
        let mut raw = Vec::new();
        loop {
            let byte = reader.read_u8().map_err(truncated("V2 block name"))?;
            if byte == 0 {
                break;
            }
            if raw.len() == MAX_NAME_LENGTH {
                return Err(FormatError::InvalidHeader(format!(
                    "block name exceeds {} bytes",
                    MAX_NAME_LENGTH
                ))
                .into());
            }
            raw.push(byte);
        }
        String::from_utf8(raw)
            .map_err(|_| FormatError::InvalidHeader("block name is not UTF-8".to_string()).into())
    }
}

impl VersionedDecoder for V2Decoder {
    fn decode_header(&self, reader: &mut dyn Read) -> Result<TraceHeader, ContainerError> {
        let step_size = reader
            .read_f64::<LittleEndian>()
            .map_err(truncated("V2 step size"))?;
        let step_size = check_step_size(step_size)?;
        let iteration_count = reader
            .read_u64::<LittleEndian>()
            .map_err(truncated("V2 iteration count"))?;
        let buffer_rows = reader
            .read_u64::<LittleEndian>()
            .map_err(truncated("V2 buffer size"))?;
        let block_count = reader
            .read_u64::<LittleEndian>()
            .map_err(truncated("V2 block count"))?;

        if buffer_rows == 0 && iteration_count > 0 {
            return Err(FormatError::InvalidHeader("buffer size of zero rows".to_string()).into());
        }

        let mut block_names = Vec::with_capacity(capped_capacity(block_count));
        let mut kinds = Vec::with_capacity(block_names.capacity());
        let mut seen = HashSet::with_capacity(block_names.capacity());
        for _ in 0..block_count {
            let name = Self::read_name(reader)?;
            let tag = reader.read_u8().map_err(truncated("V2 sample kind"))?;
            let kind = SampleKind::from_tag(tag).ok_or_else(|| {
                FormatError::InvalidHeader(format!("unknown sample kind {} for block {}", tag, name))
            })?;
            if !seen.insert(name.clone()) {
                return Err(FormatError::DuplicateBlock(name).into());
            }
            block_names.push(name);
            kinds.push(kind);
        }

        Ok(TraceHeader {
            api: ApiVersion::V2,
            metadata: TraceMetadata {
                step_size,
                iteration_count,
                block_count,
            },
            block_names,
            layout: BlockLayout::V2 { buffer_rows, kinds },
        })
    }

    fn decode_data(
        &self,
        reader: &mut dyn Read,
        header: &TraceHeader,
    ) -> Result<Vec<Vec<f64>>, ContainerError> {
        let (buffer_rows, kinds) = match &header.layout {
            BlockLayout::V2 { buffer_rows, kinds } => (*buffer_rows, kinds),
            BlockLayout::V1 => {
                return Err(FormatError::InvalidHeader(
                    "V2 payload requested for a V1 header".to_string(),
                )
                .into())
            }
        };

        let total = header.metadata.iteration_count;
        let mut blocks: Vec<Vec<f64>> = kinds
            .iter()
            .map(|_| Vec::with_capacity(capped_capacity(total)))
            .collect();

        // Without blocks there is nothing to read per row
        if blocks.is_empty() {
            return Ok(blocks);
        }

        let mut remaining = total;
        while remaining > 0 {
            let rows = remaining.min(buffer_rows);
            for (values, kind) in blocks.iter_mut().zip(kinds) {
                for _ in 0..rows {
                    let sample = match kind {
                        SampleKind::Int => reader
                            .read_i64::<LittleEndian>()
                            .map_err(truncated("V2 payload"))? as f64,
                        SampleKind::Double => reader
                            .read_f64::<LittleEndian>()
                            .map_err(truncated("V2 payload"))?,
                    };
                    values.push(sample);
                }
            }
            remaining -= rows;
        }

        Ok(blocks)
    }
}
