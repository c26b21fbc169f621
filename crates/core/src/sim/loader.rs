//! Program-image loader.
//!
//! A program is a text stream of whitespace-separated 2-character hex
//! tokens, each forming one byte of the image in ascending address order.
//! The resulting byte buffer is indexed directly by PC and its length is
//! the fetch bound (`max_pc`).

use std::path::Path;

use thiserror::Error;

/// Errors produced while loading a program image.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("failed to read program file: {0}")]
    Io(#[from] std::io::Error),

    /// A token was not a 2-character hex byte.
    #[error("invalid hex byte token {token:?} at position {position}")]
    BadToken {
        /// The offending token.
        token: String,
        /// Zero-based token index in the stream.
        position: usize,
    },
}

/// Parses a hex text stream into the program byte image.
pub fn parse_hex_image(text: &str) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();
    for (position, token) in text.split_whitespace().enumerate() {
        if token.len() != 2 {
            return Err(LoadError::BadToken {
                token: token.to_string(),
                position,
            });
        }
        let byte = u8::from_str_radix(token, 16).map_err(|_| LoadError::BadToken {
            token: token.to_string(),
            position,
        })?;
        image.push(byte);
    }
    Ok(image)
}

/// Reads and parses a program file.
pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    parse_hex_image(&text)
}
