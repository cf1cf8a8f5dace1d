/// Characters that end a lookup span
const PUNCTUATION: &[char] = &[
    '。', '！', '？', '…', '―', '.', '＆', '、', '「', '」', '『', '』', '（', '）', '\n',
];

/// Character index of the first punctuation mark at or after `position`,
/// or the character length of `text` when there is none
pub fn find_word_boundary(text: &str, position: usize) -> usize {
    let mut length = 0;
    for (index, c) in text.chars().enumerate() {
        if index >= position && PUNCTUATION.contains(&c) {
            return index;
        }
        length = index + 1;
    }
    length
}

/// The span starting at character `position` up to the next boundary
pub fn lookup_span(text: &str, position: usize) -> String {
    let end = find_word_boundary(text, position);
    text.chars()
        .skip(position)
        .take(end.saturating_sub(position))
        .collect()
}

fn is_japanese_char(c: char) -> bool {
    matches!(c,
        '\u{2E80}'..='\u{2EFF}'     // CJK radicals
        | '\u{3000}'..='\u{303F}'   // CJK symbols and punctuation
        | '\u{3040}'..='\u{30FF}'   // hiragana, katakana
        | '\u{31C0}'..='\u{31FF}'   // strokes, katakana extensions
        | '\u{3200}'..='\u{33FF}'   // enclosed and compatibility
        | '\u{3400}'..='\u{4DBF}'   // extension A
        | '\u{4E00}'..='\u{9FFF}'   // unified ideographs
        | '\u{F900}'..='\u{FAFF}'   // compatibility ideographs
        | '\u{FE30}'..='\u{FE4F}'   // compatibility forms
        | '\u{FF00}'..='\u{FFEF}'   // half and full width forms
        | '\u{1B000}'..='\u{1B0FF}' // kana supplement
        | '\u{20000}'..='\u{2FA1F}' // extensions B-F, compatibility supplement
        | '\u{30000}'..='\u{3134F}' // extension G
    )
}

/// True when `text` has at least one kana, kanji or Japanese symbol
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_stops_at_first_punctuation() {
        assert_eq!(find_word_boundary("食べた。寝た", 0), 3);
        assert_eq!(find_word_boundary("「はい」", 1), 3);
    }

    #[test]
    fn boundary_ignores_marks_before_position() {
        assert_eq!(find_word_boundary("はい、いいえ。", 3), 6);
    }

    #[test]
    fn boundary_without_punctuation_is_text_length() {
        assert_eq!(find_word_boundary("食べなかった", 2), 6);
        assert_eq!(find_word_boundary("", 0), 0);
    }

    #[test]
    fn lookup_span_cuts_at_boundary() {
        assert_eq!(lookup_span("彼は食べた。寝た", 2), "食べた");
        assert_eq!(lookup_span("短い", 5), "");
    }

    #[test]
    fn japanese_detection() {
        assert!(contains_japanese("hello 世界"));
        assert!(contains_japanese("ｶﾅ"));
        assert!(contains_japanese("𠮟る"));
        assert!(!contains_japanese("hello, world"));
    }
}
