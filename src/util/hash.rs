//! Hashing utilities for fingerprinting resolved configurations.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Add a tagged, length-prefixed list, so adjacent lists cannot trade
    /// items without changing the hash.
    pub fn update_list<'a>(
        &mut self,
        tag: &str,
        items: impl ExactSizeIterator<Item = &'a str>,
    ) -> &mut Self {
        self.update_str(tag);
        self.hasher.update((items.len() as u64).to_le_bytes());
        for s in items {
            self.update_str(s);
        }
        self
    }

    /// Add an optional string component.
    pub fn update_opt(&mut self, opt: Option<&str>) -> &mut Self {
        match opt {
            Some(s) => {
                self.hasher.update(b"\x01"); // Present marker
                self.update_str(s);
            }
            None => {
                self.hasher.update(b"\x00"); // Absent marker
            }
        }
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tag: &str, items: &[&str]) -> String {
        let mut fp = Fingerprint::new();
        fp.update_list(tag, items.iter().copied());
        fp.finish()
    }

    #[test]
    fn test_fingerprint() {
        assert_eq!(list("include", &["a", "b"]), list("include", &["a", "b"]));
        assert_ne!(list("include", &["a", "b"]), list("include", &["b", "a"]));
        assert_ne!(list("include", &["a"]), list("libpath", &["a"]));
    }

    #[test]
    fn test_optional_marker() {
        let mut some_empty = Fingerprint::new();
        some_empty.update_opt(Some(""));
        let mut none = Fingerprint::new();
        none.update_opt(None);
        assert_ne!(some_empty.finish(), none.finish());
    }
}
