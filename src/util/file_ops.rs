// File Operations for RSA Encryption/Decryption
// Handles payload files, ciphertext files and JSON key files

use std::fs;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RsaError};
use crate::rsa::{KeyMaterial, RsaKey};

/// Key pair as stored on disk: decimal strings for `n`, `e` and `d`.
///
/// Nothing here is protected; the file holds the private exponent in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub n: String,
    pub e: String,
    pub d: String,
}

impl From<&KeyMaterial> for KeyFile {
    fn from(key: &KeyMaterial) -> Self {
        Self {
            n: key.n().to_string(),
            e: key.e().to_string(),
            d: key.d().to_string(),
        }
    }
}

impl KeyFile {
    /// `(e, n)` for encryption
    pub fn public_key(&self) -> Result<RsaKey> {
        Ok(RsaKey::new(parse_field("e", &self.e)?, parse_field("n", &self.n)?))
    }

    /// `(d, n)` for decryption
    pub fn private_key(&self) -> Result<RsaKey> {
        Ok(RsaKey::new(parse_field("d", &self.d)?, parse_field("n", &self.n)?))
    }
}

fn parse_field(name: &str, value: &str) -> Result<BigUint> {
    value
        .trim()
        .parse()
        .map_err(|_| RsaError::InvalidKey(format!("key file field {name} is not a decimal integer")))
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)?;
    debug!(path = %path.display(), size = %format_file_size(data.len() as u64), "read file");
    Ok(data)
}

/// Read a text file such as a ciphertext stream
pub fn read_text(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write data to file, replacing any previous contents
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    debug!(path = %path.display(), size = %format_file_size(data.len() as u64), "wrote file");
    Ok(())
}

/// Save `{n, e, d}` as pretty-printed JSON
pub fn save_keys(path: &Path, key: &KeyMaterial) -> Result<()> {
    let json = serde_json::to_string_pretty(&KeyFile::from(key))?;
    write_file(path, json.as_bytes())
}

pub fn load_keys(path: &Path) -> Result<KeyFile> {
    let text = read_text(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
