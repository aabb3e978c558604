// Text Encoding (output decoding)
//
// Labels are WHATWG encoding labels. Decoding is strict: an invalid sequence
// is an error, never a replacement character. A leading byte-order mark for
// the chosen encoding is dropped.

use encoding_rs::{DecoderResult, Encoding, REPLACEMENT, UTF_8};

use super::error::{DomainError, Result};

/// Output encoding resolved from a decoder label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    pub fn utf8() -> Self {
        TextEncoding(UTF_8)
    }

    /// Resolve a decoder label (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Errors
    /// - DomainError::UnsupportedEncoding for unknown labels and the
    ///   `replacement` pseudo-encoding
    pub fn from_label(label: &str) -> Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) if encoding != REPLACEMENT => Ok(TextEncoding(encoding)),
            _ => Err(DomainError::UnsupportedEncoding(label.to_string())),
        }
    }

    /// Canonical encoding name (e.g. `UTF-8`, `windows-1252`)
    pub fn label(&self) -> &'static str {
        self.0.name()
    }

    /// Decode bytes strictly
    ///
    /// # Errors
    /// - DomainError::Decode with the byte offset of the first invalid sequence
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let skipped = match Encoding::for_bom(bytes) {
            Some((encoding, bom_len)) if encoding == self.0 => bom_len,
            _ => 0,
        };
        let body = &bytes[skipped..];

        let mut decoder = self.0.new_decoder_without_bom_handling();
        let mut text = String::with_capacity(
            decoder
                .max_utf8_buffer_length_without_replacement(body.len())
                .unwrap_or(body.len()),
        );

        let mut consumed = 0;
        loop {
            let (result, read) =
                decoder.decode_to_string_without_replacement(&body[consumed..], &mut text, true);
            consumed += read;

            match result {
                DecoderResult::InputEmpty => return Ok(text),
                DecoderResult::OutputFull => {
                    let remaining = body.len() - consumed;
                    text.reserve(
                        decoder
                            .max_utf8_buffer_length_without_replacement(remaining)
                            .unwrap_or(remaining)
                            .max(4),
                    );
                }
                DecoderResult::Malformed(bad, after) => {
                    let offset = skipped + consumed - bad as usize - after as usize;
                    return Err(DomainError::Decode {
                        encoding: self.label().to_string(),
                        offset,
                    });
                }
            }
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
