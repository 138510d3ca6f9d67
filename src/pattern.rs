//! Token normalization.
//!
//! Two views of each input token are built: a *pattern* (coarse, truncated,
//! matches the n-gram store vocabulary) and a *lexeme* (close to the surface
//! form, used for lexical features). All case and digit tests are ASCII.

/// Capitalized tokens longer than this become `N` in patterns.
const NAMED_ENTITY_CUTOFF: usize = 4;

/// Patterns are cut to this many bytes.
pub const TRUNCATION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PronounClass {
    Masculine,
    Feminine,
    Neuter,
    Plural,
    FirstSingular,
    Second,
    FirstPlural,
}

pub fn pronoun_class(token: &[u8]) -> Option<PronounClass> {
    use PronounClass::*;
    let class = match token.to_ascii_lowercase().as_slice() {
        b"he" | b"him" | b"himself" | b"his" => Masculine,
        b"her" | b"herself" | b"hers" | b"she" => Feminine,
        b"it" | b"its" | b"itself" => Neuter,
        b"their" | b"theirs" | b"them" | b"themselves" | b"they" => Plural,
        b"i" | b"me" | b"my" | b"mine" | b"myself" => FirstSingular,
        b"you" | b"your" | b"yours" | b"yourselves" | b"yourself" => Second,
        b"we" | b"our" | b"ours" | b"ourselves" | b"us" => FirstPlural,
        _ => return None,
    };
    Some(class)
}

/// Root form for common irregular verbs and clitics.
pub fn irregularize(token: &[u8]) -> &[u8] {
    match token {
        b"is" | b"'s" | b"am" | b"'m" | b"are" | b"'re" | b"were" | b"was" => b"be",
        b"have" | b"had" | b"'ve" => b"has",
        b"does" | b"did" => b"do",
        b"'d" => b"would",
        b"'ll" => b"will",
        b"said" | b"says" => b"say",
        other => other,
    }
}

/// Penn Treebank escapes back to the bracket they stand for.
fn unescape_ptb(token: &[u8]) -> Option<&'static [u8]> {
    let bracket: &'static [u8] = match token {
        b"\\/" => b"/",
        b"-LRB-" => b"(",
        b"-RRB-" => b")",
        b"-LSB-" => b"[",
        b"-RSB-" => b"]",
        b"-LCB-" => b"{",
        b"-RCB-" => b"}",
        _ => return None,
    };
    Some(bracket)
}

fn is_capitalized(token: &[u8]) -> bool {
    token.first().is_some_and(|b| b.is_ascii_uppercase())
}

fn is_all_caps(token: &[u8]) -> bool {
    token.iter().all(|b| b.is_ascii_uppercase())
}

/// Collapses each run of digits into a single `#`: `507th` -> `#th`.
pub fn replace_digits(token: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(token.len());
    let mut in_digits = false;
    for &b in token {
        if b.is_ascii_digit() {
            if !in_digits {
                out.push(b'#');
            }
            in_digits = true;
        } else {
            out.push(b);
            in_digits = false;
        }
    }
    out
}

/// Pattern form used to query the n-gram store. Works on raw bytes: the
/// store vocabulary was cut at [`TRUNCATION`] bytes, even mid-character.
pub fn patternize_token(token: &[u8]) -> Vec<u8> {
    let token = unescape_ptb(token).unwrap_or(token);
    if (token.len() > NAMED_ENTITY_CUTOFF && is_capitalized(token))
        || (token.len() > 1 && is_all_caps(token))
    {
        return b"N".to_vec();
    }
    let lower = token.to_ascii_lowercase();
    let mut digits = replace_digits(irregularize(&lower));
    if pronoun_class(&digits).is_some() {
        // "he needs its friend" should match "it needs its friend"
        b"P".to_vec()
    } else {
        digits.truncate(TRUNCATION);
        digits
    }
}

/// Escapes characters that carry meaning in the weights file.
pub fn norm_word(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '#' => '|',
            ':' => ';',
            c if c.is_ascii_digit() => '0',
            c => c,
        })
        .collect()
}

/// Lexeme form, given the previous lexeme (empty at sentence start) and the
/// raw next token (empty at sentence end).
pub fn generalize_token(token: &str, previous: &str, next: &str) -> String {
    let token = match token {
        "n't" => "not",
        other => unescape_ptb(other.as_bytes())
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or(other),
    };
    let token = match (previous, token) {
        ("It" | "it" | "That" | "that" | "What" | "what" | "Who" | "who" | "There" | "there"
        | "He" | "he" | "She" | "she", "'s") => "is",
        (_, "Wo" | "wo") if next == "not" || next == "n't" => "will",
        (_, other) => other,
    };
    if !previous.is_empty()
        && token != "It"
        && token != "it"
        && is_capitalized(token.as_bytes())
        && token.len() > 1
    {
        return "NE".to_string();
    }
    token.to_string()
}
