// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Textual armor around the election public key.
//!
//! Lines starting with `-----` (the BEGIN/END markers) are dropped, the
//! remaining lines are joined and base64 decoded into the DER key.

use base64::{prelude::BASE64_STANDARD, Engine};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::codec::PublicKey;
use crate::error::{Error, Result};

const ARMOR_PREFIX: &str = "-----";

/// Strip the armor and return the DER bytes.
pub fn dearmor(text: &str) -> Result<Vec<u8>> {
    let body: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(ARMOR_PREFIX))
        .collect();
    if body.is_empty() {
        return Err(Error::Armor("no base64 body found".to_string()));
    }
    BASE64_STANDARD
        .decode(body.as_bytes())
        .map_err(|err| Error::Armor(err.to_string()))
}

/// Parse an armored public key.
pub fn parse_public_key(text: &str) -> Result<PublicKey> {
    PublicKey::from_der(&dearmor(text)?)
}

/// Read and parse the armored public key at `path`.
pub fn load_public_key(path: &Path) -> Result<PublicKey> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let key = parse_public_key(&text)?;
    debug!(path = %path.display(), bits = key.h.bits(), "loaded public key");
    Ok(key)
}
