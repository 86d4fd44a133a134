use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Comments, tags and `<!`/`<?` declarations. A `<` not followed by a letter,
/// `/`, `!` or `?` is literal text, as in an HTML tokenizer.
static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>|<[!?][^>]*>").expect("valid markup regex")
});

static CHAR_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,7});")
        .expect("valid character reference regex")
});

/// Plain text of a suggestion that may carry markup (e.g. `<em>` highlights):
/// tags and comments are dropped and character references decoded.
pub fn sanitize_text(raw: &str) -> String {
    let stripped = MARKUP.replace_all(raw, "");
    CHAR_REF
        .replace_all(&stripped, |caps: &Captures<'_>| {
            decode_reference(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_reference(body: &str) -> Option<String> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(ch.to_string())
}

/// Upper-cases the first character of every word and lower-cases the rest.
/// A word starts at an alphanumeric character or `_` and runs to the next
/// whitespace; leading punctuation is left alone.
pub fn to_title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_word = false;
            out.push(ch);
        } else if in_word {
            out.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() || ch == '_' {
            in_word = true;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
