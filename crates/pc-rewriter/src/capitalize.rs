//! Sentence capitalizer: the last pass over rewritten text.
//!
//! Two states. `AtSentenceStart` holds from the beginning of the text and
//! after every terminal character (`.`, `!`, `?`) followed by whitespace; the
//! first alphabetic character seen in that state is upper-cased. Digits,
//! quotes and other non-letters leave the state unchanged. Protected regions
//! are copied verbatim and count as sentence content.

use crate::protect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AtSentenceStart,
    InSentence,
}

pub fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

pub fn capitalize_sentences(text: &str) -> String {
    let protected = protect::detect(text);
    let mut out = String::with_capacity(text.len());
    let mut state = State::AtSentenceStart;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if protect::contains(&protected, i) {
            out.push(ch);
            state = State::InSentence;
            continue;
        }
        if state == State::AtSentenceStart && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            state = State::InSentence;
            continue;
        }
        out.push(ch);
        if is_terminal(ch) && chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            while let Some((_, ws)) = chars.next_if(|(_, c)| c.is_whitespace()) {
                out.push(ws);
            }
            state = State::AtSentenceStart;
        }
    }

    out
}
