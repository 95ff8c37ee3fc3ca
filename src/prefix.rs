//! `[key:value]` tokens at the start of a line or message.

use crate::record::{LogRecord, Value};

/// One `[key:value]` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixToken<'a> {
    pub key: &'a str,
    pub value: TokenValue<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue<'a> {
    Bool(bool),
    Str(&'a str),
}

impl<'a> TokenValue<'a> {
    /// Exactly `true` and `false` are booleans, everything else is text.
    pub fn parse(raw: &'a str) -> Self {
        match raw {
            "true" => TokenValue::Bool(true),
            "false" => TokenValue::Bool(false),
            other => TokenValue::Str(other),
        }
    }
}

impl PrefixToken<'_> {
    /// Booleans overwrite, strings append to an existing string.
    pub fn apply(&self, record: &mut LogRecord) {
        match self.value {
            TokenValue::Bool(b) => record.set(self.key, Value::Bool(b)),
            TokenValue::Str(s) => record.add_str(self.key, s),
        }
    }
}

/// Pull leading `[key:value]` tokens off `text`.
///
/// Stops at the first position that is not a complete token (no `[`, no
/// `:`, or no `]` after the `:`) and returns the tokens in order together with
/// the unconsumed rest.
pub fn extract_prefix_tokens(mut text: &str) -> (Vec<PrefixToken<'_>>, &str) {
    let mut tokens = Vec::new();

    while text.starts_with('[') {
        let Some(colon) = text.find(':') else {
            break;
        };
        let Some(close) = text[colon..].find(']').map(|i| colon + i) else {
            break;
        };

        tokens.push(PrefixToken {
            key: &text[1..colon],
            value: TokenValue::parse(&text[colon + 1..close]),
        });
        text = &text[close + 1..];
    }

    (tokens, text)
}

/// Extract the leading tokens of `text` into `record` and return the rest.
pub fn apply_prefix_tokens<'a>(text: &'a str, record: &mut LogRecord) -> &'a str {
    let (tokens, rest) = extract_prefix_tokens(text);
    for token in &tokens {
        token.apply(record);
    }
    rest
}
