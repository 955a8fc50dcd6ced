use super::DocumentParser;
use crate::{core::model::document::DocumentType, error::KennisbankError};

/// Reads the input bytes as UTF-8 text directly.
#[derive(Debug, Default)]
pub struct TextParser;

impl DocumentParser for TextParser {
    fn parse(&self, input: &[u8]) -> Result<String, KennisbankError> {
        Ok(String::from_utf8(input.to_vec())?)
    }

    fn dtype(&self) -> DocumentType {
        DocumentType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_utf8() {
        let out = TextParser.parse("Magnesium bij spierkrampen".as_bytes()).unwrap();
        assert_eq!(out, "Magnesium bij spierkrampen");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            TextParser.parse(&[0xff, 0xfe, 0x00]),
            Err(KennisbankError::Utf8(_))
        ));
    }
}
