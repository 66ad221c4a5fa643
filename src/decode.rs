// src/decode.rs

//! Decoding of buffered output chunks.
//!
//! - No encoding (or [`Encoding::Native`]): the chunks are read as UTF-8
//!   (lossily) and trailing whitespace is trimmed.
//! - [`Encoding::Buffer`], or a label that is not a known charset: the raw
//!   concatenated bytes.
//! - A known charset label: the bytes decoded with that charset.

use std::fmt;

use crate::types::Encoding;

/// Decoded output of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Text(String),
    Bytes(Vec<u8>),
}

impl Output {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            Output::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Output::Text(text) => text.as_bytes(),
            Output::Bytes(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Output::Text(text) => text.into_bytes(),
            Output::Bytes(bytes) => bytes,
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Output::Bytes(_))
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Text(text) => f.write_str(text),
            Output::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

/// Text encodings recognised by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Latin1,
    Ascii,
    Hex,
    Base64,
    Base64Url,
}

impl TextEncoding {
    /// Look up an encoding label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Some(TextEncoding::Utf16Le),
            "latin1" | "binary" => Some(TextEncoding::Latin1),
            "ascii" => Some(TextEncoding::Ascii),
            "hex" => Some(TextEncoding::Hex),
            "base64" => Some(TextEncoding::Base64),
            "base64url" => Some(TextEncoding::Base64Url),
            _ => None,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Utf16Le => {
                // A trailing odd byte is dropped.
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Ascii => bytes.iter().map(|&b| char::from(b & 0x7f)).collect(),
            TextEncoding::Hex => bytes.iter().map(|b| format!("{b:02x}")).collect(),
            TextEncoding::Base64 => base64_encode(bytes, BASE64_STANDARD, true),
            TextEncoding::Base64Url => base64_encode(bytes, BASE64_URL, false),
        }
    }
}

/// Decode accumulated chunks according to `encoding`.
///
/// An empty chunk list decodes to an empty string or an empty byte vector.
pub fn decode_chunks(chunks: &[Vec<u8>], encoding: Option<&Encoding>) -> Output {
    let bytes = chunks.concat();

    match encoding {
        None | Some(Encoding::Native) => {
            let text = String::from_utf8_lossy(&bytes);
            Output::Text(text.trim_end().to_string())
        }
        Some(Encoding::Buffer) => Output::Bytes(bytes),
        Some(Encoding::Named(label)) => match TextEncoding::from_label(label) {
            Some(charset) => Output::Text(charset.decode(&bytes)),
            None => Output::Bytes(bytes),
        },
    }
}

const BASE64_STANDARD: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_URL: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn base64_encode(bytes: &[u8], alphabet: &[u8; 64], pad: bool) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for group in bytes.chunks(3) {
        let b0 = group[0];
        let b1 = group.get(1).copied().unwrap_or(0);
        let b2 = group.get(2).copied().unwrap_or(0);
        let n = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        let symbols = group.len() + 1;
        for i in 0..4 {
            if i < symbols {
                let index = ((n >> (18 - 6 * i)) & 0x3f) as usize;
                out.push(char::from(alphabet[index]));
            } else if pad {
                out.push('=');
            }
        }
    }

    out
}
