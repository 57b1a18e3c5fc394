//! Text normalization shared by the query builder and the ranker.
//!
//! Both sides of every comparison go through the same pipeline: strip
//! parenthetical edition/volume annotations, fold Latin diacritics,
//! lowercase, collapse whitespace. CJK text passes through untouched apart
//! from the annotation stripping; it tokenizes per character instead,
//! since book titles carry no word boundaries there.

/// Normalize free text for search queries and similarity comparison.
pub fn normalize(text: &str) -> String {
    let stripped = strip_parentheticals(text);
    let folded: String = stripped.chars().flat_map(fold_char).collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized comparison tokens. Latin-script words split on whitespace
/// and punctuation; each CJK character is its own token.
pub fn tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in normalize(text).chars() {
        if is_cjk(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(c.to_string());
        } else if c.is_alphanumeric() {
            word.push(c);
        } else if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Drop `(...)` and `（…）` runs: edition notes, volume annotations,
/// original-title glosses. Nested parentheses collapse with the outermost
/// pair; unbalanced closers pass through.
fn strip_parentheticals(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }
    result
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{3040}'..='\u{30FF}'   // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
    )
}

/// Lowercase and fold the Latin diacritics that show up in romanized
/// author and title text. Anything unrecognized passes through lowercased.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    let folded: &'static str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ß' => "ss",
        _ => return Folded::Char(c.to_lowercase()),
    };
    Folded::Str(folded.chars())
}

enum Folded {
    Char(std::char::ToLowercase),
    Str(std::str::Chars<'static>),
}
impl Iterator for Folded {
    type Item = char;
    fn next(&mut self) -> Option<char> {
        match self {
            Folded::Char(iter) => iter.next(),
            Folded::Str(iter) => iter.next(),
        }
    }
}
