use super::DocumentParser;
use crate::{core::model::document::DocumentType, error::KennisbankError};
use docx_rs::{read_docx, Paragraph, ParagraphChild, RunChild};
use std::{fmt::Write, time::Instant};
use tracing::debug;

/// Parses DOCX files. Only paragraph text is extracted; tables, headers,
/// footers and embedded objects are skipped.
#[derive(Debug, Default)]
pub struct DocxParser;

impl DocumentParser for DocxParser {
    fn parse(&self, input: &[u8]) -> Result<String, KennisbankError> {
        let start = Instant::now();

        let input = read_docx(input)?;
        let mut out = String::new();

        for el in input.document.children {
            match el {
                docx_rs::DocumentChild::Paragraph(ref el) => {
                    let mut paragraph = String::new();
                    let text = extract_paragraph(el);
                    for text in text {
                        let text = text.trim();
                        if text.is_empty() {
                            continue;
                        }
                        let _ = write!(paragraph, "{text} ");
                    }
                    let _ = writeln!(out, "{}", paragraph.trim_end());
                }
                el => debug!("Skipping DOCX element {:?}", el),
            }
        }

        debug!(
            "Finished processing DOCX, took {}ms",
            Instant::now().duration_since(start).as_millis()
        );

        Ok(out)
    }

    fn dtype(&self) -> DocumentType {
        DocumentType::Docx
    }
}

fn extract_paragraph(p: &Paragraph) -> Vec<&str> {
    let mut out = vec![];

    for child in p.children.iter() {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                for rchild in run.children.iter() {
                    let RunChild::Text(t) = rchild else { continue };
                    out.push(t.text.as_str());
                }
            }
            docx_rs::ParagraphChild::Hyperlink(hl) => {
                for rchild in hl.children.iter() {
                    let ParagraphChild::Run(run) = rchild else {
                        continue;
                    };
                    for rchild in run.children.iter() {
                        let RunChild::Text(t) = rchild else { continue };
                        out.push(t.text.as_str());
                    }
                }
            }
            el => debug!("Skipping DOCX element {:?}", el),
        }
    }

    out
}
