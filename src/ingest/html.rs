//! Tolerant HTML extraction helpers.
//!
//! The telemetry pages are served by systems we do not control, so the
//! helpers here avoid brittle whole-document patterns: tag detection is
//! case-insensitive, attribute order and quoting style do not matter, and
//! text extraction strips markup, decodes the common entities, and
//! collapses whitespace. Scanning stays local to known blocks
//! (`<table>…</table>`, row and cell ranges) rather than regex-ing the
//! full document.
//!
//! All searches are byte-wise over ASCII needles, so the returned offsets
//! always sit on UTF-8 character boundaries even in Thai-language markup.

/// Case-insensitive (ASCII) substring search starting at `from`.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    let last = h.len() - n.len();
    if from > last {
        return None;
    }
    (from..=last).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

fn find_byte(haystack: &str, byte: u8, from: usize) -> Option<usize> {
    haystack.as_bytes()[from..]
        .iter()
        .position(|&b| b == byte)
        .map(|i| from + i)
}

/// Finds an opening tag `<name`, rejecting longer tag names that merely
/// share the prefix (`<td` must not match `<tdata`).
fn find_tag_open(html: &str, tag: &str, from: usize) -> Option<usize> {
    let open = format!("<{}", tag);
    let mut pos = from;
    while let Some(i) = find_ci(html, &open, pos) {
        match html.as_bytes().get(i + open.len()) {
            Some(b) if b.is_ascii_alphanumeric() => pos = i + 1,
            _ => return Some(i),
        }
    }
    None
}

/// Value of `attr` inside a single opening tag, tolerating single quotes,
/// double quotes, bare values, and spacing around `=`.
pub fn attr_value(open_tag: &str, attr: &str) -> Option<String> {
    let bytes = open_tag.as_bytes();
    let mut pos = 0;
    loop {
        let i = find_ci(open_tag, attr, pos)?;
        let preceded_by_space = i > 0 && bytes[i - 1].is_ascii_whitespace();
        let mut j = i + attr.len();
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if !preceded_by_space || j >= bytes.len() || bytes[j] != b'=' {
            pos = i + 1;
            continue;
        }
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() {
            return None;
        }
        return Some(match bytes[j] {
            quote @ (b'"' | b'\'') => {
                let rest = &open_tag[j + 1..];
                match rest.find(quote as char) {
                    Some(end) => rest[..end].to_string(),
                    None => rest.trim_end_matches('>').to_string(),
                }
            }
            _ => {
                let rest = &open_tag[j..];
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                    .unwrap_or(rest.len());
                rest[..end].to_string()
            }
        });
    }
}

/// Inner content of the first `tag` element carrying `id="<id>"`.
pub fn element_inner_by_id<'a>(html: &'a str, tag: &str, id: &str) -> Option<&'a str> {
    let close = format!("</{}", tag);
    let mut pos = 0;
    while let Some(start) = find_tag_open(html, tag, pos) {
        let gt = find_byte(html, b'>', start)?;
        if attr_value(&html[start..=gt], "id").as_deref() == Some(id) {
            let content_start = gt + 1;
            let end = find_ci(html, &close, content_start).unwrap_or(html.len());
            return Some(&html[content_start..end]);
        }
        pos = gt + 1;
    }
    None
}

/// `attr` of the first `tag` element that carries it.
pub fn first_tag_attr(html: &str, tag: &str, attr: &str) -> Option<String> {
    let mut pos = 0;
    while let Some(start) = find_tag_open(html, tag, pos) {
        let gt = find_byte(html, b'>', start)?;
        if let Some(value) = attr_value(&html[start..=gt], attr) {
            return Some(value);
        }
        pos = gt + 1;
    }
    None
}

/// Inner contents of every `tag` element, in document order.
///
/// A missing close tag ends the block at the next sibling open tag —
/// table markup in the wild drops `</td>` often enough to matter.
pub fn inner_blocks<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    let close = format!("</{}", tag);
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_tag_open(html, tag, pos) {
        let Some(gt) = find_byte(html, b'>', start) else {
            break;
        };
        let content_start = gt + 1;
        let close_at = find_ci(html, &close, content_start);
        let next_open = find_tag_open(html, tag, content_start);
        let end = match (close_at, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => html.len(),
        };
        out.push(&html[content_start..end]);
        pos = if end > content_start { end } else { content_start + 1 };
    }

    out
}

/// Visible text of a fragment: tags stripped, common entities decoded,
/// whitespace collapsed to single spaces.
pub fn text_content(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    // `&amp;` last, so "&amp;lt;" decodes to the literal "&lt;".
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
