pub const TERMINATOR: u8 = 0xff;
pub const SPACE: u8 = 0x00;

enum Rule {
    PushText(String),
    /// Drops the matched bytes.
    Skip,
    Stop,
}

pub struct ParserBuilder {
    rules: patricia_tree::PatriciaMap<Rule>,
}

impl ParserBuilder {
    fn add_rule(mut self, pat: &[u8], rule: Rule) -> Self {
        self.rules.insert(Box::from(pat), rule);
        self
    }

    pub fn add_stop_rule(self, pat: &[u8]) -> Self {
        self.add_rule(pat, Rule::Stop)
    }

    pub fn add_text_rule(self, pat: &[u8], s: &str) -> Self {
        self.add_rule(pat, Rule::PushText(s.to_string()))
    }

    /// Maps `charset[i]` to the single byte `base + i`.
    pub fn add_charset_rules(self, charset: &str, base: u8) -> Self {
        let mut this = self;
        for (i, c) in charset.chars().enumerate() {
            this = this.add_text_rule(&[base + i as u8][..], c.encode_utf8(&mut [0u8; 4]));
        }
        this
    }

    pub fn build(self) -> Parser {
        Parser {
            rules: self.rules,
            unmapped_rule: Rule::Skip,
        }
    }
}

pub struct Parser {
    rules: patricia_tree::PatriciaMap<Rule>,
    unmapped_rule: Rule,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder {
            rules: patricia_tree::PatriciaMap::new(),
        }
    }

    /// Bytes that match no rule are dropped one at a time.
    pub fn parse(&self, mut buf: &[u8]) -> String {
        let mut out = String::new();

        while !buf.is_empty() {
            let (prefix, rule) = self
                .rules
                .get_longest_common_prefix(buf)
                .unwrap_or_else(|| (&buf[..1], &self.unmapped_rule));

            buf = &buf[prefix.len()..];
            match rule {
                Rule::PushText(t) => {
                    out.push_str(t);
                }
                Rule::Skip => {}
                Rule::Stop => {
                    break;
                }
            }
        }

        out
    }
}

const HIRAGANA: &str = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをん\
                        ぁぃぅぇぉゃゅょがぎぐげござじずぜぞだぢづでどばびぶべぼぱぴぷぺぽっ";
const KATAKANA: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン\
                        ァィゥェォャュョガギグゲゴザジズゼゾダヂヅデドバビブベボパピプペポッ";
const DIGITS: &str = "0123456789";
const PUNCTUATION: &str = "!?.-・…“”‘’♂♀$,×/";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

const CHARSET_BLOCKS: &[(&str, u8)] = &[
    (HIRAGANA, 0x01),
    (KATAKANA, 0x51),
    (DIGITS, 0xa1),
    (PUNCTUATION, 0xab),
    (UPPERCASE, 0xbb),
    (LOWERCASE, 0xd5),
];

// Plain ASCII quotes have no glyph of their own.
const ENCODE_ALIASES: &[(char, u8)] = &[('\'', 0xb4), ('"', 0xb2)];

static PARSER: once_cell::sync::Lazy<Parser> = once_cell::sync::Lazy::new(|| {
    CHARSET_BLOCKS
        .iter()
        .fold(
            Parser::builder()
                .add_stop_rule(&[TERMINATOR])
                .add_text_rule(&[SPACE], " "),
            |builder, (charset, base)| builder.add_charset_rules(charset, *base),
        )
        .build()
});

static ENCODE_TABLE: once_cell::sync::Lazy<std::collections::HashMap<char, u8>> = once_cell::sync::Lazy::new(|| {
    CHARSET_BLOCKS
        .iter()
        .flat_map(|(charset, base)| charset.chars().enumerate().map(move |(i, c)| (c, base + i as u8)))
        .chain(std::iter::once((' ', SPACE)))
        .chain(ENCODE_ALIASES.iter().cloned())
        .collect()
});

/// Decodes game text up to the first terminator. Bytes without a glyph are dropped.
pub fn decode(buf: &[u8]) -> String {
    PARSER.parse(buf)
}

/// Encodes `s` into exactly `width` bytes, padding with the terminator.
///
/// Characters without a glyph become spaces. Input longer than `width` is truncated.
pub fn encode(s: &str, width: usize) -> Vec<u8> {
    s.chars()
        .take(width)
        .map(|c| ENCODE_TABLE.get(&c).copied().unwrap_or(SPACE))
        .chain(std::iter::repeat(TERMINATOR))
        .take(width)
        .collect()
}
