//! Markdown frontmatter handling

use crate::error::PipelineError;
use serde_yaml::Value;

/// Title used when neither frontmatter nor a heading provides one
pub const UNTITLED: &str = "Untitled";

/// A markdown article split into metadata and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArticle {
    /// Frontmatter `title`, else the first `# ` heading, else "Untitled"
    pub title: String,
    /// Everything after the frontmatter block
    pub body: String,
    /// Raw frontmatter mapping, if there was one
    pub frontmatter: Option<serde_yaml::Mapping>,
}

/// Split a leading `---` YAML block from the body and resolve the title
///
/// A block that is never closed is treated as body text.
pub fn parse_article(markdown: &str) -> Result<ParsedArticle, PipelineError> {
    let markdown = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);

    let (yaml, body) = match split_frontmatter(markdown) {
        Some(parts) => parts,
        None => {
            return Ok(ParsedArticle {
                title: heading_title(markdown).unwrap_or_else(|| UNTITLED.to_string()),
                body: markdown.to_string(),
                frontmatter: None,
            })
        }
    };

    let frontmatter = match serde_yaml::from_str::<Value>(yaml)
        .map_err(|e| PipelineError::Frontmatter(e.to_string()))?
    {
        Value::Null => None,
        Value::Mapping(map) => Some(map),
        _ => {
            return Err(PipelineError::Frontmatter(
                "frontmatter must be a key/value mapping".to_string(),
            ))
        }
    };

    let title = frontmatter
        .as_ref()
        .and_then(|map| map.get("title"))
        .and_then(scalar_to_string)
        .or_else(|| heading_title(body))
        .unwrap_or_else(|| UNTITLED.to_string());

    Ok(ParsedArticle {
        title,
        body: body.to_string(),
        frontmatter,
    })
}

fn split_frontmatter(markdown: &str) -> Option<(&str, &str)> {
    let first_line_end = markdown.find('\n')?;
    if markdown[..first_line_end].trim_end() != "---" {
        return None;
    }

    let rest = &markdown[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

fn heading_title(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
