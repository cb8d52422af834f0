//! Plain-text sanitization for meta values written through the API.
//!
//! [`sanitize_text_field`] applies, in order:
//! - drop control characters other than whitespace
//! - escape a `<` that does not open a tag as `&lt;`
//! - strip markup tags, dropping `<script>` and `<style>` contents entirely
//! - drop percent-encoded octets (`%3C`, `%0a`, ...)
//! - collapse runs of spaces, tabs and line breaks into one space, then trim

/// Elements whose contents are removed along with their tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Sanitize a free-text value for storage.
pub fn sanitize_text_field(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let stripped = strip_tags(&cleaned);
    let decoded = strip_percent_octets(&stripped);
    collapse_whitespace(&decoded)
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !opens_tag {
            out.push_str("&lt;");
            rest = after;
            continue;
        }
        let Some(end) = after.find('>') else {
            // Unterminated tag: everything after it is markup.
            rest = "";
            break;
        };
        let tag = &after[..end];
        rest = &after[end + 1..];
        if let Some(name) = raw_text_element(tag) {
            let closing = format!("</{name}");
            rest = match find_ascii_case_insensitive(rest, &closing) {
                Some(close) => match rest[close..].find('>') {
                    Some(gt) => &rest[close + gt + 1..],
                    None => "",
                },
                None => "",
            };
        }
    }
    out.push_str(rest);
    out
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.iter().copied().find(|el| *el == name)
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(&needle.to_ascii_lowercase())
}

fn strip_percent_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut copied_from = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push_str(&input[copied_from..i]);
            i += 3;
            copied_from = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&input[copied_from..]);
    out
}

fn collapse_whitespace(input: &str) -> String {
    input
        .split(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
