//! Prompt templates for RAG generation
//!
//! A template is plain text with two placeholders:
//!
//! - `{documents}` expands to the content of every retrieved document, one
//!   per line. Continuation lines repeat the whitespace that precedes the
//!   placeholder on its own line.
//! - `{question}` expands to the question.
//!
//! `{{` and `}}` produce literal braces. Anything else in braces is rejected
//! when the template is compiled.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Documents { indent: String },
    Question,
}

/// Compiled prompt template
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    source: String,
    segments: Vec<Segment>,
}

impl PromptBuilder {
    /// Compile a template, failing on unknown placeholders or stray braces
    pub fn new(template: &str) -> Result<Self> {
        Ok(Self {
            source: template.to_string(),
            segments: parse(template)?,
        })
    }

    /// The template text this builder was compiled from
    pub fn template(&self) -> &str {
        &self.source
    }

    /// Fill the template with documents (in the given order) and the question
    pub fn build<D: AsRef<str>>(&self, question: &str, documents: &[D]) -> String {
        let mut prompt = String::with_capacity(
            self.source.len()
                + question.len()
                + documents.iter().map(|d| d.as_ref().len() + 8).sum::<usize>(),
        );

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => prompt.push_str(text),
                Segment::Question => prompt.push_str(question),
                Segment::Documents { indent } => {
                    for (i, doc) in documents.iter().enumerate() {
                        if i > 0 {
                            prompt.push('\n');
                            prompt.push_str(indent);
                        }
                        prompt.push_str(doc.as_ref());
                    }
                }
            }
        }

        prompt
    }
}

fn parse(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => {
                            return Err(Error::template(format!(
                                "unclosed placeholder at byte {}",
                                pos
                            )))
                        }
                        Some((_, ch)) => name.push(ch),
                    }
                }

                let segment = match name.trim() {
                    "documents" => Segment::Documents {
                        indent: line_indent(&literal),
                    },
                    "question" => Segment::Question,
                    other => {
                        return Err(Error::template(format!(
                            "unknown placeholder {{{}}} at byte {}",
                            other, pos
                        )))
                    }
                };

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(Error::template(format!("unmatched '}}' at byte {}", pos)));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Whitespace between the last line break and the end of `text`, if that is
/// all the current line holds
fn line_indent(text: &str) -> String {
    let line = text.rsplit('\n').next().unwrap_or("");
    if line.chars().all(|c| c == ' ' || c == '\t') {
        line.to_string()
    } else {
        String::new()
    }
}
