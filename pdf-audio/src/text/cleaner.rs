//! Text cleanup applied to extracted PDF text before segmenting.

/// Characters that trip up speech synthesis and their replacements.
const PROBLEMATIC_CHARS: &[(char, &str)] = &[
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201c}', "\""),  // Left double quote
    ('\u{201d}', "\""),  // Right double quote
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "-"),   // Em dash
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00ad}', ""),    // Soft hyphen (PDF line-break artifact)
    ('\u{200b}', ""),    // Zero-width space
    ('\u{200c}', ""),    // Zero-width non-joiner
    ('\u{200d}', ""),    // Zero-width joiner
    ('\u{feff}', ""),    // BOM
    ('\u{fb01}', "fi"),  // Ligatures left behind by PDF extraction
    ('\u{fb02}', "fl"),
];

/// Clean extracted text for synthesis.
///
/// Line breaks become spaces, runs of whitespace collapse to a single space,
/// control characters are dropped and typographic punctuation is replaced with
/// plain ASCII. The result is trimmed.
pub fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = true;

    for c in text.chars() {
        if let Some((_, r)) = PROBLEMATIC_CHARS.iter().find(|(ch, _)| *ch == c) {
            for rc in r.chars() {
                push_char(&mut result, rc, &mut prev_was_space);
            }
        } else {
            push_char(&mut result, c, &mut prev_was_space);
        }
    }

    let trimmed_len = result.trim_end().len();
    result.truncate(trimmed_len);
    result
}

fn push_char(out: &mut String, c: char, prev_was_space: &mut bool) {
    if c.is_whitespace() {
        if !*prev_was_space {
            out.push(' ');
            *prev_was_space = true;
        }
    } else if !c.is_control() {
        out.push(c);
        *prev_was_space = false;
    }
}
