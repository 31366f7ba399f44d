//! API version negotiation
//!
//! Every container starts with a fixed-width ASCII tag naming the binary
//! layout that follows. Each supported tag maps to one [`ApiVersion`]
//! variant, and each variant carries the decoder for its layout.

use std::fmt;
use std::io::Read;

use super::error::{ContainerError, FormatError};
use super::trace::TraceHeader;
use super::v1::V1Decoder;
use super::v2::V2Decoder;

/// Tag of the first binary layout
pub const API1_TAG: &[u8] = b"MCELL_BINARY_API_1";
/// Tag of the second binary layout
pub const API2_TAG: &[u8] = b"MCELL_BINARY_API_2";
/// Width of the tag at the start of every container
pub const API_TAG_LENGTH: usize = API2_TAG.len();

/// Supported container layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// `MCELL_BINARY_API_1`
    V1,
    /// `MCELL_BINARY_API_2`
    V2,
}

impl ApiVersion {
    /// All supported versions
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V1, ApiVersion::V2];

    /// The tag written at the start of a container of this version
    pub fn tag(self) -> &'static [u8] {
        match self {
            ApiVersion::V1 => API1_TAG,
            ApiVersion::V2 => API2_TAG,
        }
    }

    /// Match a tag read from a container
    pub fn from_tag(tag: &[u8]) -> Result<Self, FormatError> {
        Self::ALL
            .into_iter()
            .find(|api| api.tag() == tag)
            .ok_or_else(|| FormatError::UnknownVersion(tag.to_vec()))
    }

    /// Decoder for this version's layout
    pub fn decoder(self) -> &'static dyn VersionedDecoder {
        match self {
            ApiVersion::V1 => &V1Decoder,
            ApiVersion::V2 => &V2Decoder,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.tag()))
    }
}

/// Header and payload codec for one on-disk layout.
///
/// Decoders only know block names and raw samples. They consume exactly their
/// own bytes and normalize every sample to `f64`.
pub trait VersionedDecoder: Sync {
    /// Decode the header that follows the API tag
    fn decode_header(&self, reader: &mut dyn Read) -> Result<TraceHeader, ContainerError>;

    /// Decode the payload described by `header`, one sample vector per block
    fn decode_data(
        &self,
        reader: &mut dyn Read,
        header: &TraceHeader,
    ) -> Result<Vec<Vec<f64>>, ContainerError>;
}

/// Read the API tag, distinguishing a short stream from an unknown tag
pub(crate) fn read_api_tag(reader: &mut dyn Read) -> Result<ApiVersion, ContainerError> {
    let mut tag = [0u8; API_TAG_LENGTH];
    let mut filled = 0;
    while filled < API_TAG_LENGTH {
        match reader.read(&mut tag[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    if filled < API_TAG_LENGTH {
        return Err(FormatError::EmptyOrTruncated {
            expected: API_TAG_LENGTH,
            actual: filled,
        }
        .into());
    }

    Ok(ApiVersion::from_tag(&tag)?)
}

/// Accept only step sizes that give finite, non-negative times
pub(crate) fn check_step_size(step_size: f64) -> Result<f64, FormatError> {
    if step_size.is_finite() && step_size >= 0.0 {
        Ok(step_size)
    } else {
        Err(FormatError::InvalidHeader(format!(
            "step size {} is not a finite non-negative number",
            step_size
        )))
    }
}

/// Upper bound on speculative preallocation driven by header counts
pub(crate) const MAX_PREALLOC: usize = 1 << 16;

/// Capacity hint that a corrupt header cannot blow up
pub(crate) fn capped_capacity(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX).min(MAX_PREALLOC)
}
