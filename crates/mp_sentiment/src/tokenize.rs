/// Words that flip the polarity of the next scored word.
pub const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "cannot", "can't", "cant", "don't",
    "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt", "aren't", "arent",
    "wasn't", "wasnt", "won't", "wont", "shouldn't", "wouldn't", "couldn't",
];

pub fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token)
}

/// True for the `t` left behind when a word tokenizer splits a negated
/// contraction, e.g. `don` + `t`.
pub fn is_split_negator(prev: Option<&str>, token: &str) -> bool {
    token == "t" && prev.map_or(false, |prev| is_negator(&format!("{}'t", prev)))
}

/// Lowercases and splits on anything that is not a letter, digit,
/// apostrophe or hyphen, so contractions and hyphenated terms stay whole.
pub fn lexicon_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plain word tokenizer: runs of letters, digits and underscores.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
