/// Counts whitespace-delimited tokens. No linguistic rules: "well-known" is one
/// word and unspaced CJK text is one word.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
