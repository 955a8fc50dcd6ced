use super::DocumentParser;
use crate::{core::model::document::DocumentType, error::KennisbankError};
use lopdf::Object;
use std::{
    fmt::Write,
    io::{Error, ErrorKind},
    time::Instant,
};
use tracing::debug;

/// Parses PDFs. Pages are extracted in order and concatenated with newlines.
/// Scanned pages yield no text; there is no OCR.
#[derive(Debug, Default)]
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn parse(&self, input: &[u8]) -> Result<String, KennisbankError> {
        let start = Instant::now();

        let mut input = lopdf::Document::load_mem(input)?;

        // Filter unwanted objects.
        input.objects.retain(filter_object);

        let mut out = String::new();

        for (page_num, page_id) in input
            .page_iter()
            .enumerate()
            .map(|(page_num, oid)| (page_num as u32 + 1, oid))
        {
            let text = input.extract_text(&[page_num]).map_err(|e| {
                Error::new(
                    ErrorKind::Other,
                    format!("Failed to extract text from page {page_num} id={page_id:?}: {e:?}"),
                )
            })?;

            for line in text.lines() {
                let line = line.trim();

                // Skip line numbers in output.
                if line == page_num.to_string() {
                    continue;
                }

                let _ = writeln!(out, "{line}");
            }
        }

        debug!(
            "Finished processing PDF, took {}ms",
            Instant::now().duration_since(start).as_millis()
        );

        Ok(out)
    }

    fn dtype(&self) -> DocumentType {
        DocumentType::Pdf
    }
}

static IGNORE: &[&str] = &[
    "Length",
    "BBox",
    "FormType",
    "Matrix",
    "Type",
    "XObject",
    "Subtype",
    "Filter",
    "ColorSpace",
    "Width",
    "Height",
    "BitsPerComponent",
    "Length1",
    "Length2",
    "Length3",
    "PTEX.FileName",
    "PTEX.PageNumber",
    "PTEX.InfoDict",
    "FontDescriptor",
    "ExtGState",
    "MediaBox",
    "Annot",
];

/// Filters unwanted properties in an object and
/// returns whether to keep it or not.
///
/// * `object`: PDF object.
fn filter_object(_: &(u32, u16), object: &mut Object) -> bool {
    if IGNORE.contains(&object.type_name().unwrap_or_default()) {
        return false;
    }

    if let Ok(d) = object.as_dict_mut() {
        d.remove(b"Producer");
        d.remove(b"ModDate");
        d.remove(b"Creator");
        d.remove(b"ProcSet");
        d.remove(b"XObject");
        d.remove(b"MediaBox");
        d.remove(b"Annots");
        if d.is_empty() {
            return false;
        }
    }

    true
}
