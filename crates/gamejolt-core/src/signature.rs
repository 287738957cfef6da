use md5::{Digest, Md5};

use crate::params::ParameterSet;

/// Length of a rendered signature (hex MD5).
pub const SIGNATURE_HEX_LEN: usize = 32;

/// Computes request signatures with the game's private key.
#[derive(Clone)]
pub struct Signer {
    private_key: String,
}

impl Signer {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
        }
    }

    /// Lowercase hex MD5 of `base_url + params.to_query() + private_key`.
    pub fn sign(&self, base_url: &str, params: &ParameterSet) -> String {
        sign(base_url, params, &self.private_key)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

pub fn sign(base_url: &str, params: &ParameterSet, private_key: &str) -> String {
    let mut input = String::with_capacity(base_url.len() + private_key.len() + 64);
    input.push_str(base_url);
    input.push_str(&params.to_query());
    input.push_str(private_key);
    hex::encode(Md5::digest(input.as_bytes()))
}
