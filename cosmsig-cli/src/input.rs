//! Reading binary inputs from the command line.

use alloy_primitives::hex;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;

use crate::config::Encoding;
use crate::error::CliError;

/// Resolves an argument to bytes.
///
/// `@path` reads the file at `path`; anything else is the literal text. The
/// text is then decoded with `encoding`. Surrounding whitespace is ignored
/// for hex and base64.
///
/// # Errors
///
/// Returns [`CliError::ReadInput`] if the file cannot be read, or a decoding
/// error if the text does not match `encoding`.
pub fn read_input(arg: &str, encoding: Encoding) -> Result<Vec<u8>, CliError> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                path: path.to_owned(),
                source,
            })?;
            decode(&text, encoding)
        }
        None => decode(arg, encoding),
    }
}

/// Decodes text with `encoding`.
///
/// # Errors
///
/// Returns [`CliError::Hex`] or [`CliError::Base64`] for malformed input.
pub fn decode(text: &str, encoding: Encoding) -> Result<Vec<u8>, CliError> {
    match encoding {
        Encoding::Hex => Ok(hex::decode(text.trim())?),
        Encoding::Base64 => Ok(STANDARD.decode(text.trim())?),
        Encoding::Raw => Ok(text.as_bytes().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_each_encoding() {
        assert_eq!(decode("0x7b7d", Encoding::Hex).unwrap(), b"{}");
        assert_eq!(decode(" 7b7d\n", Encoding::Hex).unwrap(), b"{}");
        assert_eq!(decode("e30=", Encoding::Base64).unwrap(), b"{}");
        assert_eq!(decode("{}", Encoding::Raw).unwrap(), b"{}");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(decode("xyz", Encoding::Hex), Err(CliError::Hex(_))));
        assert!(matches!(
            decode("!!", Encoding::Base64),
            Err(CliError::Base64(_))
        ));
    }

    #[test]
    fn test_reads_file_input() {
        let path = std::env::temp_dir().join(format!("cosmsig-input-{}.hex", std::process::id()));
        fs::write(&path, "7b7d\n").unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(read_input(&arg, Encoding::Hex).unwrap(), b"{}");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_input("@/nonexistent/cosmsig/doc", Encoding::Raw),
            Err(CliError::ReadInput { path, .. }) if path == "/nonexistent/cosmsig/doc"
        ));
    }
}
