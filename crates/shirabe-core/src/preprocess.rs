use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default JP preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Width and compatibility folding (NFKC); line breaks never belong to a lookup
        text.nfkc().filter(|c| !matches!(c, '\n' | '\r' | '\u{200b}')).collect()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
