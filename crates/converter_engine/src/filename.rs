const FALLBACK_STEM: &str = "converted";
const MAX_STEM_CHARS: usize = 120;

/// Download name for a converted source:
/// `<source without trailing .pdf><version_tag>.<extension>`.
///
/// Characters that are not allowed in file names are replaced with `_`, and
/// the stem is cut to `MAX_STEM_CHARS` characters.
pub fn output_filename(source_name: &str, version_tag: &str, extension: &str) -> String {
    let stem = sanitize_stem(strip_pdf_suffix(source_name.trim()));
    format!("{stem}{version_tag}.{extension}")
}

fn strip_pdf_suffix(name: &str) -> &str {
    const SUFFIX: &str = ".pdf";
    match name.len().checked_sub(SUFFIX.len()) {
        Some(split) if name.is_char_boundary(split) => {
            let (stem, tail) = name.split_at(split);
            if tail.eq_ignore_ascii_case(SUFFIX) {
                stem
            } else {
                name
            }
        }
        _ => name,
    }
}

fn sanitize_stem(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .take(MAX_STEM_CHARS)
        .collect();
    let mut stem = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
