use unicode_normalization::UnicodeNormalization;

/// How non-ASCII input is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlugMode {
    /// NFKD, then drop everything outside ASCII.
    #[default]
    Ascii,
    /// NFKC, keep Unicode letters and digits.
    Unicode,
}

/// Filesystem-safe, lowercase, hyphen-separated form of `text`.
pub fn slugify(text: &str) -> String {
    slugify_with(text, SlugMode::Ascii)
}

pub fn slugify_with(text: &str, mode: SlugMode) -> String {
    let normalized: String = match mode {
        SlugMode::Ascii => text.nfkd().filter(char::is_ascii).collect(),
        SlugMode::Unicode => text.nfkc().collect(),
    };

    let mut out = String::with_capacity(normalized.len());
    let mut pending_separator = false;
    for c in normalized.chars().flat_map(char::to_lowercase) {
        if c == '-' || c.is_whitespace() {
            pending_separator = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        }
        // Anything else is dropped without breaking the current word.
    }
    out
}
