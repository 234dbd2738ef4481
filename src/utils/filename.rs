//! Audio filename normalization
//!
//! Maps display text (German words, phrases, level names) to the file name
//! used for its pre-generated pronunciation clip. The game and the audio
//! generator both go through here so they always agree on the name.

/// Umlaut and sharp-s substitutions applied before stripping.
const SUBSTITUTIONS: [(char, &str); 7] = [
    ('Ä', "AE"),
    ('Ö', "OE"),
    ('Ü', "UE"),
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('ß', "SS"),
];

/// Normalize text into a filesystem-safe stem.
///
/// Surrounding whitespace is ignored. Inner spaces become underscores, German
/// diacritics are spelled out and anything outside `[A-Za-z0-9_]` is dropped.
pub fn normalize_filename(text: &str) -> String {
    let text = text.trim();
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        if c == ' ' {
            result.push('_');
        } else if let Some((_, replacement)) = SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            result.push_str(replacement);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        }
    }

    result
}

/// File name of the pronunciation clip for `text`
pub fn audio_file_name(text: &str) -> String {
    format!("{}.mp3", normalize_filename(text).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlauts_spelled_out() {
        assert_eq!(normalize_filename("Bär"), "Baer");
        assert_eq!(normalize_filename("Öl"), "OEl");
        assert_eq!(normalize_filename("Übung"), "UEbung");
        assert_eq!(normalize_filename("Straße"), "StraSSe");
    }

    #[test]
    fn test_spaces_and_punctuation() {
        assert_eq!(normalize_filename("Super gemacht!"), "Super_gemacht");
        assert_eq!(normalize_filename("a, b."), "a_b");
        assert_eq!(normalize_filename("Level 1: Grundreihe"), "Level_1_Grundreihe");
    }

    #[test]
    fn test_non_ascii_stripped() {
        assert_eq!(normalize_filename("Café 🎉"), "Caf_");
        assert_eq!(normalize_filename(""), "");
    }

    #[test]
    fn test_audio_file_name_lowercases() {
        assert_eq!(audio_file_name("Fuß"), "fuss.mp3");
        assert_eq!(audio_file_name("Äpfel essen"), "aepfel_essen.mp3");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(normalize_filename(" Haus "), "Haus");
        assert_eq!(audio_file_name("\tGuten Tag \n"), "guten_tag.mp3");
    }

    #[test]
    fn test_distinct_case_collapses() {
        // Level data may repeat a word in different case; they share one clip
        assert_eq!(audio_file_name("HAUS"), audio_file_name("Haus"));
    }
}
