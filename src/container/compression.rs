use std::io::{BufRead, BufReader, Read};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;

/// Outer compression wrapping a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// bzip2, the simulator's native output compression
    #[default]
    Bzip2,
    /// gzip
    Gzip,
    /// Uncompressed container
    None,
}

impl Compression {
    /// Identify the compression from the leading bytes of a stream
    pub fn sniff(magic: &[u8]) -> Self {
        if magic.starts_with(b"BZh") {
            Compression::Bzip2
        } else if magic.starts_with(&[0x1f, 0x8b]) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    /// Conventional file suffix, including the dot
    pub fn extension(self) -> &'static str {
        match self {
            Compression::Bzip2 => ".bz2",
            Compression::Gzip => ".gz",
            Compression::None => "",
        }
    }

    /// Peek at `reader` and wrap it in the matching decompressor.
    ///
    /// The returned reader owns `reader`, so dropping it releases both.
    pub fn decompress<'a, R: BufRead + 'a>(
        mut reader: R,
    ) -> std::io::Result<(Self, Box<dyn Read + 'a>)> {
        let compression = Self::sniff(reader.fill_buf()?);
        let stream: Box<dyn Read + 'a> = match compression {
            // concatenated streams decode as one container
            Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(reader))),
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            Compression::None => Box::new(reader),
        };
        Ok((compression, stream))
    }
}

