//! Kana script conversion and long vowel mark expansion.
//!
//! Dictionary keys are hiragana: every spelling and reading goes through
//! [`katakana_to_hiragana`] before it is indexed or looked up.

use unicode_normalization::UnicodeNormalization;

pub const LONG_VOWEL_MARK: char = 'ー';

/// Upper bound on the spellings produced by [`long_vowel_mark_to_kana`]
pub const MAX_LONG_VOWEL_VARIANTS: usize = 8;

const SCRIPT_OFFSET: u32 = 0x60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

impl Vowel {
    /// Hiragana a long vowel mark after this vowel can stand for, most likely first
    fn expansions(self) -> &'static [char] {
        match self {
            Vowel::A => &['あ'],
            Vowel::I => &['い'],
            Vowel::U => &['う'],
            Vowel::E => &['え', 'い'],
            Vowel::O => &['お', 'う'],
        }
    }
}

fn to_hiragana_char(c: char) -> char {
    match c {
        'ァ'..='ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - SCRIPT_OFFSET).unwrap_or(c),
        _ => c,
    }
}

fn to_katakana_char(c: char) -> char {
    match c {
        'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + SCRIPT_OFFSET).unwrap_or(c),
        _ => c,
    }
}

fn is_katakana_char(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c) || ('\u{31F0}'..='\u{31FF}').contains(&c)
}

fn vowel_of(c: char) -> Option<Vowel> {
    let vowel = match to_hiragana_char(c) {
        'あ' | 'か' | 'が' | 'さ' | 'ざ' | 'た' | 'だ' | 'な' | 'は' | 'ば' | 'ぱ' | 'ま' | 'や'
        | 'ら' | 'わ' | 'ぁ' | 'ゃ' | 'ゎ' | 'ゕ' => Vowel::A,
        'い' | 'き' | 'ぎ' | 'し' | 'じ' | 'ち' | 'ぢ' | 'に' | 'ひ' | 'び' | 'ぴ' | 'み' | 'り'
        | 'ゐ' | 'ぃ' => Vowel::I,
        'う' | 'く' | 'ぐ' | 'す' | 'ず' | 'つ' | 'づ' | 'ぬ' | 'ふ' | 'ぶ' | 'ぷ' | 'む' | 'ゆ'
        | 'る' | 'ゔ' | 'ぅ' | 'ゅ' => Vowel::U,
        'え' | 'け' | 'げ' | 'せ' | 'ぜ' | 'て' | 'で' | 'ね' | 'へ' | 'べ' | 'ぺ' | 'め' | 'れ'
        | 'ゑ' | 'ぇ' | 'ゖ' => Vowel::E,
        'お' | 'こ' | 'ご' | 'そ' | 'ぞ' | 'と' | 'ど' | 'の' | 'ほ' | 'ぼ' | 'ぽ' | 'も' | 'よ'
        | 'ろ' | 'を' | 'ぉ' | 'ょ' => Vowel::O,
        _ => return None,
    };
    Some(vowel)
}

/// Canonical key: compatibility characters are folded (NFKC) and katakana is
/// shifted to hiragana. A single compatibility glyph may expand to several
/// characters, e.g. `㌀` becomes `あぱーと`.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.nfkc().map(to_hiragana_char).collect()
}

/// Shift hiragana to katakana; other characters pass through untouched
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars().map(to_katakana_char).collect()
}

/// True when every character of a non-empty `text` is katakana (the long vowel mark included)
pub fn is_katakana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_katakana_char)
}

/// Spellings obtained by replacing each long vowel mark with the vowel it
/// continues. `e` and `o` are ambiguous and yield two spellings each, so
/// `オー` gives `オオ` and `オウ`. Marks without a kana before them are kept.
/// Text without marks comes back normalized to hiragana as the only element.
pub fn long_vowel_mark_to_kana(text: &str) -> Vec<String> {
    if !text.contains(LONG_VOWEL_MARK) {
        return vec![katakana_to_hiragana(text)];
    }

    let mut variants = vec![String::with_capacity(text.len())];
    let mut previous: Option<char> = None;

    for c in text.chars() {
        let vowel = if c == LONG_VOWEL_MARK {
            previous.and_then(vowel_of)
        } else {
            previous = Some(c);
            None
        };

        let Some(vowel) = vowel else {
            variants.iter_mut().for_each(|v| v.push(c));
            continue;
        };

        let katakana = previous.is_some_and(is_katakana_char);
        let choices: Vec<char> = vowel
            .expansions()
            .iter()
            .map(|&v| if katakana { to_katakana_char(v) } else { v })
            .collect();

        variants = variants
            .iter()
            .flat_map(|variant| {
                choices.iter().map(move |&choice| {
                    let mut next = variant.clone();
                    next.push(choice);
                    next
                })
            })
            .take(MAX_LONG_VOWEL_VARIANTS)
            .collect();
    }

    variants
}
