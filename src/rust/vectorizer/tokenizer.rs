use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::entities;

/// Splits raw text into an ordered sequence of string tokens.
///
/// Implemented by [`TweetTokenizer`] and by any `Fn(&str) -> Vec<String>`,
/// so callers can plug in their own segmentation.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

// scheme or `domain.tld/` prefix, then a run without brackets ending in a
// non-punctuation character
const URLS: &str = r#"(?:https?:(?:/{1,3}|[a-z0-9%])|[a-z0-9.\-]+[.][a-z]{2,13}/)[^\s()<>{}\[\]]+[^\s`!()\[\]{};:'".,<>?«»“”‘’]"#;

const NAKED_DOMAINS: &str = r"[a-z0-9]+(?:[.\-][a-z0-9]+)*[.][a-z]{2,13}\b/?";

const EMAILS: &str = r"[\w.+\-]+@[\w\-]+\.(?:[\w\-]\.?)+[\w\-]";

const PHONE_NUMBERS: &str = r"(?:(?:\+?[01][ *\-.)]*)?(?:\(?\d{3}[ *\-.)]*)?\d{3}[ *\-.)]*\d{4})";

// eyes, optional nose, mouth; the mirrored form; hearts
const EMOTICONS: &str = r"(?:[<>]?[:;=8][\-o*']?[)\](\[dDpP/:}{@|\\]|[)\](\[dDpP/:}{@|\\][\-o*']?[:;=8][<>]?|</?3)";

// Alternatives are tried left to right at each position. Emails sit ahead of
// naked domains so `foo.na@example.com` stays one token.
const TOKEN_PATTERNS: &[&str] = &[
    URLS,
    EMAILS,
    NAKED_DOMAINS,
    PHONE_NUMBERS,
    EMOTICONS,
    // html tags
    r"<[^>\s]+>",
    // ascii arrows
    r"-+>|<-+",
    // @mentions
    r"@\w+",
    // hashtags
    r"#+\w+[\w'\-]*\w+",
    // words with inner apostrophes or dashes
    r"[^\W\d_](?:[^\W\d_]|['\-_])+[^\W\d_]",
    // numbers, including fractions, decimals and times
    r"[+\-]?\d+[,/.:\-]\d+[+\-]?",
    // plain words
    r"\w+",
    // ellipsis
    r"\.(?:\s*\.)+",
    // everything else that is not whitespace
    r"\S",
];

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(&format!("(?i){}", TOKEN_PATTERNS.join("|")))
        .expect("token patterns are valid");
    static ref EMOTICON_RE: Regex = Regex::new(&format!("(?i){}", EMOTICONS))
        .expect("emoticon pattern is valid");
    static ref HANDLE_RE: Regex = Regex::new(r"(^|[^\w!@#$%&*])@\w{1,15}")
        .expect("handle pattern is valid");
    static ref ENTITY_RE: Regex = Regex::new(r"&(#?(x?))([^&;\s]+);")
        .expect("entity pattern is valid");
}

/// A tokenizer tuned for short, informal social-media style text.
///
/// Keeps emoticons (`:-)`, `<3`), hashtags, `@mentions`, URLs and contractions
/// (`don't`, `Penny's`) as single tokens. HTML entities are decoded before
/// splitting and runs of four or more identical punctuation characters are
/// shortened to three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweetTokenizer {
    /// Keep the original casing. When false every token is lowercased unless it contains an emoticon.
    pub preserve_case: bool,
    /// Cap any run of three or more identical characters at three (`waaaay` -> `waaay`).
    pub reduce_len: bool,
    /// Drop `@handles` before tokenizing.
    pub strip_handles: bool,
}

impl Default for TweetTokenizer {
    fn default() -> Self {
        Self {
            preserve_case: true,
            reduce_len: false,
            strip_handles: false,
        }
    }
}

impl TweetTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preserve_case(mut self, preserve_case: bool) -> Self {
        self.preserve_case = preserve_case;
        self
    }

    pub fn with_reduce_len(mut self, reduce_len: bool) -> Self {
        self.reduce_len = reduce_len;
        self
    }

    pub fn with_strip_handles(mut self, strip_handles: bool) -> Self {
        self.strip_handles = strip_handles;
        self
    }

    fn preprocess(&self, text: &str) -> String {
        let mut text = decode_html_entities(text);
        if self.strip_handles {
            text = HANDLE_RE.replace_all(&text, "${1} ").into_owned();
        }
        if self.reduce_len {
            text = cap_runs(&text, |_| true);
        }
        cap_runs(&text, |c| !c.is_ascii_alphanumeric())
    }
}

impl Tokenize for TweetTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = self.preprocess(text);
        TOKEN_RE
            .find_iter(&text)
            .map(|m| m.as_str())
            .map(|token| {
                if self.preserve_case || EMOTICON_RE.is_match(token) {
                    token.to_string()
                } else {
                    token.to_lowercase()
                }
            })
            .collect()
    }
}

/// Limits runs of the same character to three when `applies` holds for it.
fn cap_runs(text: &str, applies: impl Fn(char) -> bool) -> String {
    const MAX_RUN: usize = 3;

    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    let mut run = 0;
    for c in text.chars() {
        if prev == Some(c) {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run <= MAX_RUN || !applies(c) {
            out.push(c);
        }
    }
    out
}

/// Replaces numeric (`&#39;`, `&#x27;`) and named (`&eacute;`) HTML entities.
///
/// Entities that do not decode to a valid character are removed, including
/// unknown names and the code points cp1252 leaves undefined.
fn decode_html_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[3];
            let code = if caps[1].is_empty() {
                entities::lookup(body)
            } else {
                let radix = if caps[2].is_empty() { 10 } else { 16 };
                u32::from_str_radix(body, radix).ok().and_then(windows_1252)
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Reads `0x80..=0x9f` as cp1252, where browsers put them in practice.
fn windows_1252(code: u32) -> Option<u32> {
    // zero marks the five undefined slots
    const CP1252: [u32; 32] = [
        0x20ac, 0, 0x201a, 0x0192, 0x201e, 0x2026, 0x2020, 0x2021, 0x02c6, 0x2030, 0x0160,
        0x2039, 0x0152, 0, 0x017d, 0, 0, 0x2018, 0x2019, 0x201c, 0x201d, 0x2022, 0x2013,
        0x2014, 0x02dc, 0x2122, 0x0161, 0x203a, 0x0153, 0, 0x017e, 0x0178,
    ];
    match code {
        0x80..=0x9f => Some(CP1252[(code - 0x80) as usize]).filter(|&c| c != 0),
        _ => Some(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        TweetTokenizer::default().tokenize(text)
    }

    #[test]
    fn test_plain_words_and_punctuation() {
        assert_eq!(tokens("cat dog"), vec!["cat", "dog"]);
        assert_eq!(tokens("Hello, world!"), vec!["Hello", ",", "world", "!"]);
    }

    #[test]
    fn test_social_media_tokens_stay_whole() {
        let result = tokens("@sheldon loves #BazingaTime :-) <3 http://t.co/abc");
        assert_eq!(
            result,
            vec!["@sheldon", "loves", "#BazingaTime", ":-)", "<3", "http://t.co/abc"]
        );
    }

    #[test]
    fn test_contractions_and_numbers() {
        assert_eq!(tokens("Penny's here, don't go"), vec!["Penny's", "here", ",", "don't", "go"]);
        assert_eq!(tokens("It's 3.14 at 10:30"), vec!["It's", "3.14", "at", "10:30"]);
    }

    #[test]
    fn test_ellipsis_and_hang_shortening() {
        assert_eq!(tokens("wait... what"), vec!["wait", "...", "what"]);
        assert_eq!(tokens("no!!!!!!"), vec!["no", "!", "!", "!"]);
    }

    #[test]
    fn test_html_entities_are_decoded() {
        assert_eq!(tokens("Tom &amp; Jerry"), vec!["Tom", "&", "Jerry"]);
        assert_eq!(tokens("it&#39;s"), vec!["it's"]);
        assert_eq!(tokens("caf&eacute; time"), vec!["café", "time"]);
        assert_eq!(tokens("&hearts;&#x2665;"), vec!["♥", "♥"]);
        assert_eq!(tokens("&#150;"), vec!["\u{2013}"]);
    }

    #[test]
    fn test_undecodable_entities_are_removed() {
        assert!(tokens("&unknownentity;").is_empty());
        assert_eq!(tokens("x&#129;y"), vec!["xy"]);
        assert_eq!(tokens("a&#x110000;b &#xzz;"), vec!["ab"]);
    }

    #[test]
    fn test_naked_domains_and_emails() {
        assert_eq!(tokens("Hi.How are you google.com"), vec!["Hi.How", "are", "you", "google.com"]);
        assert_eq!(tokens("see WWW.Example.ORG/path now"), vec!["see", "WWW.Example.ORG/path", "now"]);
        assert_eq!(tokens("mail foo.na@example.com"), vec!["mail", "foo.na@example.com"]);
    }

    #[test]
    fn test_lowercasing_keeps_tokens_containing_emoticons() {
        let tokenizer = TweetTokenizer::new().with_preserve_case(false);
        assert_eq!(tokenizer.tokenize("See http://T.co/ABC"), vec!["see", "http://T.co/ABC"]);
    }

    #[test]
    fn test_lowercasing_keeps_emoticons() {
        let tokenizer = TweetTokenizer::new().with_preserve_case(false);
        assert_eq!(tokenizer.tokenize("Hi Leonard :D"), vec!["hi", "leonard", ":D"]);
    }

    #[test]
    fn test_reduce_len_and_strip_handles() {
        let tokenizer = TweetTokenizer::new()
            .with_reduce_len(true)
            .with_strip_handles(true);
        assert_eq!(tokenizer.tokenize("@raj waaaaay cool"), vec!["waaay", "cool"]);
    }

    #[test]
    fn test_closure_tokenizer() {
        let whitespace = |text: &str| -> Vec<String> {
            text.split_whitespace().map(String::from).collect()
        };
        assert_eq!(whitespace.tokenize("a  b"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t").is_empty());
    }
}
