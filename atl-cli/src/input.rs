//! Reading long text such as descriptions and page bodies from stdin.

use std::io::{self, Read};

use anyhow::{Context, Result};

/// Read all of `reader`, dropping trailing line breaks
pub fn read_trimmed(mut reader: impl Read) -> io::Result<String> {
  let mut buf = String::new();
  reader.read_to_string(&mut buf)?;
  Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}

/// Read the whole of stdin
pub fn read_stdin() -> Result<String> {
  read_trimmed(io::stdin().lock()).context("Failed to read from stdin")
}
