//! Sentence-level heuristics for articles written in markdown

use milagre_domain::Importance;

const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "inc.", "ltd.", "co.", "corp.",
    "vs.", "etc.", "e.g.", "i.e.", "u.s.", "u.k.", "jan.", "feb.", "mar.", "apr.", "jun.",
    "jul.", "aug.", "sep.", "sept.", "oct.", "nov.", "dec.", "no.", "sra.", "dra.",
];

const OPINION_MARKERS: &[&str] = &[
    "i think", "i believe", "i feel", "in my opinion", "we believe", "we think",
    "personally", "eu acho", "na minha opinião", "acreditamos", "acredito",
];

const SPECULATION_MARKERS: &[&str] = &[
    "could", "might", "may ", "will likely", "would", "should", "poderá", "pode ser",
];

const REPORTING_MARKERS: &[&str] = &[
    "according to", "announced", "reported", "confirmed", "launched", "released",
    "approved", "segundo", "de acordo com", "anunciou", "confirmou", "lançou", "aprovou",
];

/// Remove markdown syntax that never carries claims
///
/// Drops fenced code blocks, headings, tables, images and horizontal rules;
/// unwraps links to their text; strips emphasis, list and quote markers.
pub fn strip_markdown(body: &str) -> String {
    let mut out = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence
            || trimmed.starts_with('#')
            || trimmed.starts_with('|')
            || trimmed.starts_with("![")
            || is_rule(trimmed)
        {
            out.push(String::new());
            continue;
        }

        let without_marker = strip_block_marker(trimmed);
        out.push(strip_inline(without_marker));
    }

    out.join("\n")
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-' || c == '*' || c == '_')
}

fn strip_block_marker(line: &str) -> &str {
    let line = line.trim_start_matches('>').trim_start();
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest;
        }
    }
    // Ordered list: "12. item"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest;
        }
    }
    line
}

fn strip_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' | '_' | '`' => {}
            '[' => {
                // [text](url) -> text
                let mut text = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    text.push(next);
                }
                out.push_str(&text);
                if closed && chars.peek() == Some(&'(') {
                    for next in chars.by_ref() {
                        if next == ')' {
                            break;
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Split prose into sentences
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace (or the end of
/// the text), unless the word is a known abbreviation. Blank lines always end
/// a sentence, so list items and paragraphs never run together.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for paragraph in text.split("\n\n") {
        let joined = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut current = String::new();
        let mut chars = joined.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if at_boundary && !ends_with_abbreviation(&current) {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
        push_sentence(&mut sentences, &current);
    }

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, sentence: &str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

fn ends_with_abbreviation(current: &str) -> bool {
    let last_word = current
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .to_lowercase();
    ABBREVIATIONS.contains(&last_word.as_str())
}

/// Whether a sentence reads like a checkable factual assertion
pub fn is_factual(sentence: &str, min_words: usize) -> bool {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.len() < min_words || sentence.trim_end().ends_with('?') {
        return false;
    }

    let lower = sentence.to_lowercase();
    if OPINION_MARKERS.iter().any(|m| lower.starts_with(m) || lower.contains(&format!(" {}", m))) {
        return false;
    }

    let has_number = sentence.chars().any(|c| c.is_ascii_digit());
    let has_proper_noun = words
        .iter()
        .skip(1)
        .any(|w| w.chars().next().is_some_and(char::is_uppercase));
    let has_reporting = REPORTING_MARKERS.iter().any(|m| lower.contains(m));
    let speculative = SPECULATION_MARKERS.iter().any(|m| lower.contains(m));

    if speculative && !has_reporting {
        return false;
    }

    has_number || has_proper_noun || has_reporting
}

/// Importance assigned to a heuristically extracted claim
pub fn importance_of(sentence: &str) -> Importance {
    if sentence.chars().any(|c| c.is_ascii_digit() || c == '%' || c == '$') {
        Importance::High
    } else {
        Importance::Medium
    }
}
