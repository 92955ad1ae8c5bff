//! Pure text-extraction helpers for the response parser.
//!
//! Each function is total: bad input yields `None` or an empty collection,
//! never a panic. The heuristics here exist because the upstream model is
//! not contractually bound to emit valid JSON.

/// Strip a surrounding Markdown code fence, if present.
///
/// Models frequently wrap the requested JSON in ```json fences even when
/// told not to.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = &rest[newline + 1..];
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}

/// Find a labeled section by heading, case-insensitively.
///
/// Matches `Heading: inline content` as well as a heading line followed by a
/// block; the block ends at a blank line or the next heading. Headings are
/// given without the trailing colon.
pub fn find_section(text: &str, headings: &[&str]) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let Some(inline) = match_heading(line, headings) else {
            continue;
        };
        let mut parts: Vec<String> = Vec::new();
        let inline = inline.trim().trim_matches('"').trim();
        if !inline.is_empty() {
            parts.push(inline.to_string());
        }
        for following in &lines[idx + 1..] {
            let trimmed = following.trim();
            if trimmed.is_empty() || is_heading_line(trimmed) {
                break;
            }
            parts.push(trimmed.to_string());
        }
        if !parts.is_empty() {
            return Some(parts.join("\n"));
        }
    }
    None
}

fn match_heading<'a>(line: &'a str, headings: &[&str]) -> Option<&'a str> {
    // Tolerate markdown decoration: "## Strengths:", "**Strengths:** ..."
    let stripped = line
        .trim()
        .trim_start_matches(['#', '*', '>'])
        .trim_start();
    let lower = stripped.to_lowercase();
    for heading in headings {
        let mut wanted = heading.to_lowercase();
        wanted.push(':');
        // ASCII headings keep their byte length under lowercasing
        if lower.starts_with(&wanted) {
            return Some(stripped[wanted.len()..].trim_start_matches('*').trim_start());
        }
        if lower.trim_end_matches(':') == wanted.trim_end_matches(':') {
            return Some("");
        }
    }
    None
}

fn is_heading_line(line: &str) -> bool {
    let trimmed = line.trim_end_matches('*').trim_end();
    trimmed.ends_with(':') && trimmed.len() <= 60
}

/// Split a section block into list items (numbered or bulleted)
pub fn list_items(block: &str) -> Vec<String> {
    block
        .lines()
        .filter_map(|line| strip_list_marker(line.trim()))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> Option<&str> {
    for marker in ["-", "*", "•"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return Some(rest.trim_start());
        }
    }
    None
}

/// Extract a labeled numeric score such as `Confidence: 0.85`,
/// `Quality Score: 8/10` or `Rating: 85%`, normalized to the 0..1 range
/// where the notation implies one.
pub fn labeled_score(text: &str, labels: &[&str]) -> Option<f64> {
    let lower = text.to_lowercase();
    for label in labels {
        let label = label.to_lowercase();
        let mut from = 0;
        while let Some(pos) = lower[from..].find(&label) {
            let after = &lower[from + pos + label.len()..];
            let after =
                after.trim_start_matches(|c: char| c == ':' || c == '=' || c.is_whitespace());
            if let Some(score) = leading_number(after) {
                return Some(score);
            }
            from += pos + label.len();
        }
    }
    None
}

fn leading_number(text: &str) -> Option<f64> {
    let len = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();
    if len == 0 {
        return None;
    }
    let value: f64 = text[..len].parse().ok()?;
    let rest = text[len..].trim_start();
    if let Some(denom_text) = rest.strip_prefix('/') {
        let denom_text = denom_text.trim_start();
        let denom_len = denom_text
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .count();
        let denom: f64 = denom_text[..denom_len].parse().ok()?;
        return (denom > 0.0).then(|| value / denom);
    }
    if rest.starts_with('%') {
        return Some(value / 100.0);
    }
    Some(value)
}

const QUALITATIVE_SCORES: &[(&str, f64)] = &[
    ("very poor", 0.2),
    ("terrible", 0.2),
    ("exceptional", 0.9),
    ("outstanding", 0.9),
    ("excellent", 0.9),
    ("good", 0.8),
    ("strong", 0.8),
    ("solid", 0.8),
    ("adequate", 0.6),
    ("satisfactory", 0.6),
    ("acceptable", 0.6),
    ("poor", 0.4),
    ("weak", 0.4),
    ("inadequate", 0.4),
];

/// Map qualitative assessment language to a coarse confidence
pub fn qualitative_score(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    QUALITATIVE_SCORES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, score)| *score)
}

/// First non-empty paragraph of the text
pub fn first_paragraph(text: &str) -> Option<&str> {
    text.split("\n\n")
        .map(str::trim)
        .find(|paragraph| !paragraph.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
        assert_eq!(strip_code_fence("plain"), "plain");
    }

    #[test]
    fn finds_inline_section() {
        let text = "Some intro.\n\nRefined Prompt: \"Build a responsive layout\"\n\nMore text.";
        let section = find_section(text, &["refined prompt"]).unwrap();
        assert_eq!(section, "Build a responsive layout");
    }

    #[test]
    fn finds_block_section_case_insensitively() {
        let text = "STRENGTHS:\n- clear scope\n- good structure\n\nOther:\nstuff";
        let section = find_section(text, &["strengths"]).unwrap();
        assert_eq!(list_items(&section), vec!["clear scope", "good structure"]);
    }

    #[test]
    fn section_stops_at_next_heading() {
        let text = "Strengths:\n- one\nWeaknesses:\n- two";
        let section = find_section(text, &["strengths"]).unwrap();
        assert_eq!(list_items(&section), vec!["one"]);
    }

    #[test]
    fn tolerates_markdown_heading_decoration() {
        let text = "## Recommendations:\n1. Add constraints\n2. Name the framework";
        let section = find_section(text, &["recommendations"]).unwrap();
        assert_eq!(
            list_items(&section),
            vec!["Add constraints", "Name the framework"]
        );
    }

    #[test]
    fn numbered_and_bulleted_items() {
        let block = "1. first\n2) second\n- third\n* fourth\n• fifth";
        assert_eq!(
            list_items(block),
            vec!["first", "second", "third", "fourth", "fifth"]
        );
    }

    #[test]
    fn extracts_plain_confidence() {
        assert_eq!(
            labeled_score("Confidence: 0.85", &["confidence"]),
            Some(0.85)
        );
    }

    #[test]
    fn extracts_ratio_and_percent_scores() {
        assert_eq!(
            labeled_score("Quality Score: 8/10", &["quality score"]),
            Some(0.8)
        );
        assert_eq!(labeled_score("Rating: 85%", &["rating"]), Some(0.85));
    }

    #[test]
    fn missing_score_is_none() {
        assert_eq!(labeled_score("no numbers here", &["confidence"]), None);
        assert_eq!(labeled_score("Confidence: high", &["confidence"]), None);
    }

    #[test]
    fn qualitative_keywords_map_to_scores() {
        assert_eq!(qualitative_score("This is excellent work"), Some(0.9));
        assert_eq!(qualitative_score("a very poor attempt"), Some(0.2));
        assert_eq!(qualitative_score("quite adequate overall"), Some(0.6));
        assert_eq!(qualitative_score("nothing evaluative"), None);
    }

    #[test]
    fn first_paragraph_skips_leading_blanks() {
        assert_eq!(first_paragraph("\n\nbody here\n\nrest"), Some("body here"));
    }
}
