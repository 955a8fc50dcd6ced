use crate::{core::model::document::DocumentType, error::KennisbankError};
use docx::DocxParser;
use pdf::PdfParser;
use text::TextParser;

pub mod docx;
pub mod pdf;
pub mod text;

/// Implement on anything that has to parse document bytes.
pub trait DocumentParser {
    fn dtype(&self) -> DocumentType;

    fn parse(&self, input: &[u8]) -> Result<String, KennisbankError>;
}

/// Enumeration of all supported parser types. Images never reach a parser;
/// the ingestion service synthesizes their content instead.
#[derive(Debug)]
pub enum Parser {
    Text(TextParser),
    Pdf(PdfParser),
    Docx(DocxParser),
}

impl Parser {
    /// Returns the parser for a document type.
    pub fn new(ty: DocumentType) -> Result<Self, KennisbankError> {
        match ty {
            DocumentType::Text => Ok(Self::Text(TextParser)),
            DocumentType::Docx => Ok(Self::Docx(DocxParser)),
            DocumentType::Pdf => Ok(Self::Pdf(PdfParser)),
            DocumentType::Image(format) => {
                Err(KennisbankError::UnsupportedFileType(format.to_string()))
            }
        }
    }
}

impl DocumentParser for Parser {
    fn parse(&self, input: &[u8]) -> Result<String, KennisbankError> {
        match self {
            Self::Text(p) => p.parse(input),
            Self::Pdf(p) => p.parse(input),
            Self::Docx(p) => p.parse(input),
        }
    }

    fn dtype(&self) -> DocumentType {
        match self {
            Self::Text(p) => p.dtype(),
            Self::Pdf(p) => p.dtype(),
            Self::Docx(p) => p.dtype(),
        }
    }
}
