//! `MCELL_BINARY_API_1` layout
//!
//! ```text
//! f64  step_size
//! u32  iteration_count
//! u32  block_count
//! block_count × { u16 name_len, name bytes (UTF-8) }
//! payload, block-major: block_count × iteration_count × u32
//! ```

use std::collections::HashSet;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use super::api::{capped_capacity, check_step_size, ApiVersion, VersionedDecoder};
use super::error::{truncated, ContainerError, FormatError};
use super::trace::{BlockLayout, TraceHeader, TraceMetadata};

/// Decoder for the first container layout
pub struct V1Decoder;

impl VersionedDecoder for V1Decoder {
    fn decode_header(&self, reader: &mut dyn Read) -> Result<TraceHeader, ContainerError> {
        let step_size = reader
            .read_f64::<LittleEndian>()
            .map_err(truncated("V1 step size"))?;
        let step_size = check_step_size(step_size)?;
        let iteration_count = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("V1 iteration count"))?;
        let block_count = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("V1 block count"))?;

        let mut block_names = Vec::with_capacity(capped_capacity(block_count as u64));
        let mut seen = HashSet::with_capacity(block_names.capacity());
        for _ in 0..block_count {
            let len = reader
                .read_u16::<LittleEndian>()
                .map_err(truncated("V1 block name length"))?;
            let mut raw = vec![0u8; len as usize];
            reader
                .read_exact(&mut raw)
                .map_err(truncated("V1 block name"))?;
            let name = String::from_utf8(raw)
                .map_err(|_| FormatError::InvalidHeader("block name is not UTF-8".to_string()))?;
            if !seen.insert(name.clone()) {
                return Err(FormatError::DuplicateBlock(name).into());
            }
            block_names.push(name);
        }

        Ok(TraceHeader {
            api: ApiVersion::V1,
            metadata: TraceMetadata {
                step_size,
                iteration_count: iteration_count as u64,
                block_count: block_count as u64,
            },
            block_names,
            layout: BlockLayout::V1,
        })
    }

    fn decode_data(
        &self,
        reader: &mut dyn Read,
        header: &TraceHeader,
    ) -> Result<Vec<Vec<f64>>, ContainerError> {
        let rows = header.metadata.iteration_count;
        let mut blocks = Vec::with_capacity(header.block_count());

        for _ in &header.block_names {
            let mut values = Vec::with_capacity(capped_capacity(rows));
            for _ in 0..rows {
                let sample = reader
                    .read_u32::<LittleEndian>()
                    .map_err(truncated("V1 payload"))?;
                values.push(sample as f64);
            }
            blocks.push(values);
        }

        Ok(blocks)
    }
}
