//! Random opaque identifiers for account tokens and ids.

use anyhow::{Context, Result};
use rand::{rngs::OsRng, RngCore};

/// Bytes of entropy behind an account token (200 hex chars).
pub const TOKEN_BYTES: usize = 100;

/// Bytes of entropy behind a public account id (40 hex chars).
pub const ID_BYTES: usize = 20;

/// Draw `byte_len` bytes from the OS random source and hex-encode them.
///
/// # Errors
/// Returns an error if the OS random source is unavailable.
pub fn generate(byte_len: usize) -> Result<String> {
    let mut bytes = vec![0u8; byte_len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to read from the OS random source")?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_returns_lowercase_hex_of_double_length() -> Result<()> {
        for len in [0, 1, ID_BYTES, TOKEN_BYTES] {
            let value = generate(len)?;
            assert_eq!(value.len(), len * 2);
            assert!(value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
        Ok(())
    }

    #[test]
    fn generate_does_not_repeat() -> Result<()> {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate(ID_BYTES)?));
        }
        Ok(())
    }
}
