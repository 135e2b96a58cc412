//! Placeholder templates for search results

use super::SearchResult;
use crate::error::{RagIndexError, Result};

const FIELDS: &str = "file_path, score, content, chunk_index";

/// Substitute `{field}` placeholders; `{{` and `}}` are literal braces
pub fn render_template(template: &str, result: &SearchResult) -> Result<String> {
    let mut out = String::with_capacity(template.len() + result.content.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => {
                            return Err(RagIndexError::InvalidInput(format!(
                                "Unclosed placeholder in template: {{{}",
                                field
                            )))
                        }
                    }
                }
                out.push_str(&substitute(&field, result)?);
            }
            '}' => {
                return Err(RagIndexError::InvalidInput(
                    "Unmatched '}' in template".to_string(),
                ))
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn substitute(field: &str, result: &SearchResult) -> Result<String> {
    let (name, format_spec) = match field.split_once(':') {
        Some((name, format_spec)) => (name, Some(format_spec)),
        None => (field, None),
    };

    let value = match (name, format_spec) {
        ("file_path", None) => result.file_path().to_string(),
        ("content", None) => result.content.clone(),
        ("chunk_index", None) => result.chunk_index.to_string(),
        ("score", None) => result.score.to_string(),
        ("score", Some(format_spec)) => {
            let precision = format_spec
                .strip_prefix('.')
                .and_then(|p| p.strip_suffix('f').or(Some(p)))
                .and_then(|p| p.parse::<usize>().ok())
                .ok_or_else(|| {
                    RagIndexError::InvalidInput(format!("Invalid score format: {}", format_spec))
                })?;
            format!("{:.*}", precision, result.score)
        }
        _ => {
            return Err(RagIndexError::InvalidInput(format!(
                "Invalid field in template: {}. Available fields: {}",
                field, FIELDS
            )))
        }
    };

    Ok(value)
}
