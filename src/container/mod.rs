//! # MCell Binary Container Module
//!
//! Reads the compressed binary reaction-data files written by MCell and turns
//! them into a version-independent [`Trace`]: a set of named sample series,
//! one sample per output iteration.
//!
//! ## Container Structure
//!
//! ```text
//! compressed stream (bzip2, gzip or none)
//! └── API tag (18 ASCII bytes, e.g. "MCELL_BINARY_API_2")
//!     ├── header  (layout depends on the tag)
//!     └── payload (layout depends on the tag)
//! ```
//!
//! The tag is matched against [`ApiVersion`], and the matching
//! [`VersionedDecoder`] reads the rest. Header-only reads
//! ([`ContainerReader::open_header`]) never touch the payload.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcellrel::container::ContainerReader;
//!
//! let header = ContainerReader::open_header("run.0001.bin.bz2")?;
//! println!("{} blocks", header.block_count());
//!
//! let trace = ContainerReader::open_full("run.0001.bin.bz2")?;
//! if let Some(samples) = trace.block("bound_vesicle_1_1_syt_8.0001.dat") {
//!     println!("{} samples", samples.len());
//! }
//! # Ok::<(), mcellrel::container::ContainerError>(())
//! ```

mod api;
mod compression;
mod error;
mod reader;
mod trace;
mod v1;
mod v2;
pub mod writer;


pub use api::{ApiVersion, VersionedDecoder, API1_TAG, API2_TAG, API_TAG_LENGTH};
pub use compression::Compression;
pub use error::{ContainerError, FormatError};
pub use reader::ContainerReader;
pub use trace::{BlockLayout, SampleKind, Trace, TraceHeader, TraceMetadata};
pub use v1::V1Decoder;
pub use v2::V2Decoder;
pub use writer::{TraceWriter, WriterError};
