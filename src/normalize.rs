//! Arabic text and collection-label normalization
//!
//! Stored text mixes several Unicode representations of the same logical
//! letters; every search path depends on folding those to one comparison
//! form before matching.

/// Normalize Arabic text for matching: removes diacritics and tatweel,
/// folds alef/yaa/taa-marbuta variants. Pure and idempotent; empty input
/// yields an empty string.
pub fn normalize_arabic(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            match c {
                // Tashkeel, superscript alef, tatweel
                '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}' => None,
                '\u{0671}' => Some('ا'),
                'أ' | 'إ' | 'آ' => Some('ا'),
                'ؤ' => Some('و'),
                'ئ' | 'ى' => Some('ي'),
                'ة' | 'ۃ' => Some('ه'),
                'ک' | 'گ' | 'ڭ' => Some('ك'),
                'ی' | 'ے' => Some('ي'),
                'ۀ' | 'ە' => Some('ه'),
                'ٹ' => Some('ت'),
                'پ' => Some('ب'),
                'چ' => Some('ج'),
                'ژ' => Some('ز'),
                'ڤ' => Some('ف'),
                'ڨ' => Some('ق'),
                _ => Some(c),
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a collection label for alias lookup: lowercase, strip
/// whitespace/hyphens/apostrophes, fold the macrons and emphatic-dot
/// letters common in scholarly transliteration ("Abī Dāwūd").
pub fn normalize_collection_label(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => None,
            '-' | '\'' | '’' | '`' | 'ʾ' | 'ʿ' => None,
            'ā' => Some('a'),
            'ī' => Some('i'),
            'ū' => Some('u'),
            'ḥ' => Some('h'),
            'ṣ' => Some('s'),
            'ḍ' => Some('d'),
            'ṭ' => Some('t'),
            'ẓ' => Some('z'),
            _ => Some(c),
        })
        .collect()
}

/// True iff the text contains at least one character in the Arabic
/// Unicode blocks (including presentation forms).
pub fn is_arabic_text(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
    })
}

/// Escape regex metacharacters so arbitrary user input can be embedded
/// in a match pattern.
pub fn escape_for_match(text: &str) -> String {
    regex::escape(text)
}
