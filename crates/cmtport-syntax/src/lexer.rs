//! Word tokenization of logical requirements lines
//!
//! A logical line is split on whitespace. A word opening with `"` or `'`
//! starts a quoted span that swallows the following words until one ends
//! with the same quote; the span becomes a single token with the quotes
//! removed. An unterminated span absorbs the rest of the line.

/// Quoting state of the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    /// Not inside a quoted span
    Outside,
    /// Inside a `"…"` span
    InDouble,
    /// Inside a `'…'` span
    InSingle,
}

impl QuoteState {
    fn opened_by(quote: char) -> Self {
        if quote == '"' {
            Self::InDouble
        } else {
            Self::InSingle
        }
    }

    /// Quote character that closes the current span
    pub fn closing_quote(&self) -> Option<char> {
        match self {
            Self::Outside => None,
            Self::InDouble => Some('"'),
            Self::InSingle => Some('\''),
        }
    }
}

/// Word tokenizer driven one whitespace-delimited word at a time
#[derive(Debug)]
pub struct Tokenizer {
    state: QuoteState,
    /// Text of the span being assembled, without its opening quote
    span: String,
    tokens: Vec<String>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: QuoteState::Outside,
            span: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Current quoting state
    pub fn state(&self) -> QuoteState {
        self.state
    }

    /// Feed the next word of the line
    pub fn feed(&mut self, word: &str) {
        match self.state.closing_quote() {
            None => self.feed_outside(word),
            Some(quote) => self.feed_inside(word, quote),
        }
    }

    fn feed_outside(&mut self, word: &str) {
        let quote = match word.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => {
                self.tokens.push(word.to_string());
                return;
            }
        };

        if word.len() == 1 {
            self.state = QuoteState::opened_by(quote);
            self.span.clear();
            return;
        }

        let body = &word[1..];
        if closes_span(body, quote) {
            self.tokens.push(unescape(&body[..body.len() - 1]));
        } else {
            self.state = QuoteState::opened_by(quote);
            self.span = body.to_string();
        }
    }

    fn feed_inside(&mut self, word: &str, quote: char) {
        if word.len() == 1 && word.starts_with(quote) {
            self.close_span();
            return;
        }

        let closing = closes_span(word, quote);
        let text = if closing {
            &word[..word.len() - 1]
        } else {
            word
        };
        if !self.span.is_empty() {
            self.span.push(' ');
        }
        self.span.push_str(text);

        if closing {
            self.close_span();
        }
    }

    fn close_span(&mut self) {
        let span = std::mem::take(&mut self.span);
        self.tokens.push(unescape(&span));
        self.state = QuoteState::Outside;
    }

    /// Finish the line, flushing an unterminated span as the last token
    pub fn finish(mut self) -> Vec<String> {
        if self.state != QuoteState::Outside {
            self.close_span();
        }
        self.tokens
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize a logical line into words, honoring quoted spans
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokenizer = Tokenizer::new();
    for word in line.split_whitespace() {
        tokenizer.feed(word);
    }
    tokenizer.finish()
}

/// An escaped quote (`\"`) never closes a span.
fn closes_span(word: &str, quote: char) -> bool {
    if !word.ends_with(quote) {
        return false;
    }
    let before = &word[..word.len() - 1];
    !before.ends_with('\\')
}

fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(
            tokenize("use  AtlasPolicy\tAtlasPolicy-*"),
            words(&["use", "AtlasPolicy", "AtlasPolicy-*"])
        );
    }

    #[test]
    fn test_double_quoted_span() {
        assert_eq!(
            tokenize(r#"macro c_opt_flags "" x86_64-slc5&gcc46 "-O2 -mtune=core2""#),
            words(&["macro", "c_opt_flags", "", "x86_64-slc5&gcc46", "-O2 -mtune=core2"])
        );
    }

    #[test]
    fn test_single_quoted_span() {
        assert_eq!(
            tokenize("set FOO 'a b  c'"),
            words(&["set", "FOO", "a b c"])
        );
    }

    #[test]
    fn test_single_quote_inside_double_span() {
        assert_eq!(
            tokenize(r#"macro x "it's fine""#),
            words(&["macro", "x", "it's fine"])
        );
    }

    #[test]
    fn test_standalone_quote_toggles() {
        assert_eq!(tokenize(r#"macro x " a b ""#), words(&["macro", "x", "a b"]));
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        assert_eq!(
            tokenize(r#"macro x "say \" twice \" now""#),
            words(&["macro", "x", r#"say " twice " now"#])
        );
    }

    #[test]
    fn test_quote_in_middle_of_word_is_literal() {
        assert_eq!(
            tokenize(r#"macro_append pp_cppflags -DTDAQ_PACKAGE_NAME="$(package)""#),
            words(&["macro_append", "pp_cppflags", r#"-DTDAQ_PACKAGE_NAME="$(package)""#])
        );
    }

    #[test]
    fn test_unterminated_span_absorbs_rest() {
        let mut tokenizer = Tokenizer::new();
        for word in ["macro", "x", "\"abc", "def"] {
            tokenizer.feed(word);
        }
        assert_eq!(tokenizer.state(), QuoteState::InDouble);
        assert_eq!(tokenizer.finish(), words(&["macro", "x", "abc def"]));
    }

    #[test]
    fn test_empty_line() {
        assert!(tokenize("   ").is_empty());
    }
}
