//! Deterministic hash helpers for feature schemas and artefact identifiers.

/// Extremely small non-cryptographic hash (FNV-1a, 32 bit).
#[derive(Copy, Clone, Debug)]
pub struct SimpleHash(u32);

impl SimpleHash {
    /// Create a new hash state with the FNV offset basis.
    pub fn new() -> Self {
        Self(2_166_136_261)
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ (*b as u32)).wrapping_mul(16_777_619);
        }
    }

    /// Feed an ordered list of names, separated so that `["ab","c"]` and
    /// `["a","bc"]` hash differently.
    pub fn update_names<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.update(name.as_ref().as_bytes());
            self.update(&[0x1f]);
        }
    }

    /// Finalise the hash and return a 32-bit value.
    pub fn finish32(&self) -> u32 {
        self.0
    }

    /// Finalise the hash and return an 8-character lowercase hex string.
    pub fn finish_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
}

impl Default for SimpleHash {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint an ordered column list.
pub fn fingerprint<S: AsRef<str>>(names: &[S]) -> String {
    let mut hasher = SimpleHash::new();
    hasher.update_names(names);
    hasher.finish_hex()
}
