//! Response-compression codecs, negotiated by name through the
//! `accept-encoding` and `content-encoding` headers.

use anyhow::Result;

use super::request::Compression;

/// Decodes a compressed response body.
pub trait ContentCodec: Send + Sync {
    /// Name used in the encoding headers.
    fn encoding(&self) -> &'static str;

    /// Decompresses a whole response body.
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Codec for the requested compression, if one is compiled into this
/// build. `Compression::None` needs no codec.
pub fn codec_for(compression: Compression) -> Option<Box<dyn ContentCodec>> {
    match compression {
        Compression::None => None,
        #[cfg(feature = "snappy")]
        Compression::Snappy => Some(Box::new(SnappyCodec)),
        #[cfg(not(feature = "snappy"))]
        Compression::Snappy => None,
    }
}

/// Raw-block snappy, the format the API server emits.
#[cfg(feature = "snappy")]
pub struct SnappyCodec;

#[cfg(feature = "snappy")]
impl ContentCodec for SnappyCodec {
    fn encoding(&self) -> &'static str {
        "snappy"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        use anyhow::Context;

        snap::raw::Decoder::new()
            .decompress_vec(data)
            .context("Failed to decompress snappy response body")
    }
}
