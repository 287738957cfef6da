use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Error, Result};

/// Reversible mapping between raw bytes and text that is safe to carry in a
/// query value and to sign.
///
/// Implementations must round-trip: `unsanitize(&sanitize(b)) == b` for every
/// byte string, the empty one included.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, data: &[u8]) -> String;
    fn unsanitize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Unpadded base64url.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64Sanitizer;

impl Sanitizer for Base64Sanitizer {
    fn sanitize(&self, data: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(data)
    }

    fn unsanitize(&self, text: &str) -> Result<Vec<u8>> {
        URL_SAFE_NO_PAD
            .decode(text.trim())
            .map_err(|e| Error::malformed(format!("base64 decode: {}", e)))
    }
}
