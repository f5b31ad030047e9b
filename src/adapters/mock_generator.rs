use fake::faker::address::en::{CityName, CountryName, PostCode, StateAbbr, StreetName};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Map, Value};

use crate::domain::{
    FakerKind, MockError, SchemaKind, SchemaNode, DEFAULT_MAX_DEPTH, MAX_PATTERN_REPEAT,
};

/// Probability that an optional node is materialized at all
const OPTIONAL_PRESENCE: f64 = 0.5;
/// Probability that an optional object child is considered for inclusion
const CHILD_INCLUSION: f64 = 0.8;
const MIN_ARRAY_ITEMS: usize = 1;
const MAX_ARRAY_ITEMS: usize = 4;
const DEFAULT_INT_RANGE: (i64, i64) = (0, 1000);
const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 1000.0);
/// Upper bound for generated timestamps (2100-01-01T00:00:00Z)
const MAX_TIMESTAMP: i64 = 4_102_444_800;

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Return a string node's recorded example instead of random text
    pub use_recorded_example: bool,
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            use_recorded_example: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Synthesizes JSON values from schema trees.
///
/// Randomness always comes from the caller-supplied generator, so a seeded
/// `StdRng` yields a reproducible value.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    options: GenerateOptions,
}

impl MockGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate one value for `node`. `Ok(None)` means no body.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        node: Option<&SchemaNode>,
        rng: &mut R,
    ) -> Result<Option<Value>, MockError> {
        match node {
            None => Ok(None),
            Some(node) => self.generate_node(node, 0, rng),
        }
    }

    /// Convert a stored schema document and generate from it
    pub fn generate_document<R: Rng + ?Sized>(
        &self,
        document: Option<&Value>,
        rng: &mut R,
    ) -> Result<Option<Value>, MockError> {
        match document {
            None | Some(Value::Null) => Ok(None),
            Some(doc) => {
                let node = SchemaNode::from_value(doc, self.options.max_depth)?;
                self.generate(Some(&node), rng)
            }
        }
    }

    fn generate_node<R: Rng + ?Sized>(
        &self,
        node: &SchemaNode,
        depth: usize,
        rng: &mut R,
    ) -> Result<Option<Value>, MockError> {
        if !node.required && rng.gen_bool(OPTIONAL_PRESENCE) {
            return Ok(None);
        }
        self.generate_value(node, depth, rng).map(Some)
    }

    /// Generate a value regardless of the node's own optionality
    fn generate_value<R: Rng + ?Sized>(
        &self,
        node: &SchemaNode,
        depth: usize,
        rng: &mut R,
    ) -> Result<Value, MockError> {
        if depth > self.options.max_depth {
            return Err(MockError::DepthExceeded {
                limit: self.options.max_depth,
                path: node.name.clone(),
            });
        }

        match &node.kind {
            SchemaKind::Boolean => Ok(Value::Bool(rng.gen())),
            SchemaKind::Int => Ok(json!(self.generate_int(node, rng))),
            SchemaKind::Float => Ok(json!(self.generate_float(node, rng))),
            SchemaKind::String => Ok(Value::String(self.generate_string(node, rng))),
            SchemaKind::Array { element } => {
                let count = rng.gen_range(MIN_ARRAY_ITEMS..=MAX_ARRAY_ITEMS);
                let items = (0..count)
                    .map(|_| self.generate_value(element, depth + 1, rng))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            }
            SchemaKind::Object { children } => {
                let mut object = Map::new();
                for child in children {
                    if !child.required && !rng.gen_bool(CHILD_INCLUSION) {
                        continue;
                    }
                    if let Some(value) = self.generate_node(child, depth + 1, rng)? {
                        object.insert(child.name.clone(), value);
                    }
                }
                Ok(Value::Object(object))
            }
        }
    }

    fn generate_int<R: Rng + ?Sized>(&self, node: &SchemaNode, rng: &mut R) -> i64 {
        let (default_min, default_max) = DEFAULT_INT_RANGE;
        let rule = node.mock.as_ref();
        let min = rule
            .and_then(|m| m.min)
            .map(|v| v.ceil() as i64)
            .unwrap_or(default_min);
        let max = rule
            .and_then(|m| m.max)
            .map(|v| v.floor() as i64)
            .unwrap_or(default_max.max(min));
        if min >= max {
            return min;
        }
        rng.gen_range(min..=max)
    }

    fn generate_float<R: Rng + ?Sized>(&self, node: &SchemaNode, rng: &mut R) -> f64 {
        let (default_min, default_max) = DEFAULT_FLOAT_RANGE;
        let rule = node.mock.as_ref();
        let min = rule.and_then(|m| m.min).unwrap_or(default_min);
        let max = rule.and_then(|m| m.max).unwrap_or(default_max.max(min));
        if min >= max {
            return min;
        }
        if !min.is_finite() || !max.is_finite() {
            return min.clamp(f64::MIN, f64::MAX);
        }
        let t: f64 = rng.gen();
        let value = min * (1.0 - t) + max * t;
        let rounded = (value * 100.0).floor() / 100.0;
        if rounded.is_finite() && rounded >= min && rounded < max {
            rounded
        } else if value < max {
            value.max(min)
        } else {
            min
        }
    }

    fn generate_string<R: Rng + ?Sized>(&self, node: &SchemaNode, rng: &mut R) -> String {
        if self.options.use_recorded_example {
            if let Some(example) = &node.example {
                return example.clone();
            }
        }

        if let Some(rule) = &node.mock {
            if let Some(choice) = rule.enum_values.as_deref().and_then(|v| v.choose(rng)) {
                return choice.clone();
            }
            if let Some(pattern) = &rule.pattern {
                return expand_pattern(pattern, rng);
            }
            if let Some(kind) = rule.faker {
                return fake_string(kind, rng);
            }
        }

        Word().fake_with_rng(rng)
    }
}

fn fake_string<R: Rng + ?Sized>(kind: FakerKind, rng: &mut R) -> String {
    match kind {
        // Personal
        FakerKind::FirstName => FirstName().fake_with_rng(rng),
        FakerKind::LastName => LastName().fake_with_rng(rng),
        FakerKind::FullName => Name().fake_with_rng(rng),
        FakerKind::Username => Username().fake_with_rng(rng),

        // Contact
        FakerKind::Email => SafeEmail().fake_with_rng(rng),
        FakerKind::Phone => PhoneNumber().fake_with_rng(rng),

        // Address
        FakerKind::StreetAddress => StreetName().fake_with_rng(rng),
        FakerKind::City => CityName().fake_with_rng(rng),
        FakerKind::State => StateAbbr().fake_with_rng(rng),
        FakerKind::Country => CountryName().fake_with_rng(rng),
        FakerKind::PostalCode => PostCode().fake_with_rng(rng),

        // Text
        FakerKind::Word => Word().fake_with_rng(rng),
        FakerKind::Sentence => Sentence(1..10).fake_with_rng(rng),
        FakerKind::Paragraph => Paragraph(1..3).fake_with_rng(rng),

        FakerKind::Uuid => uuid::Builder::from_random_bytes(rng.gen())
            .into_uuid()
            .to_string(),
        FakerKind::DateTime => {
            let secs = rng.gen_range(0..=MAX_TIMESTAMP);
            chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default()
        }
    }
}

/// Expand a character pattern into a random string.
///
/// - `#` digit, `?` lowercase letter, `*` either
/// - `\d` digit, `\a` lowercase, `\A` uppercase, `\x` hex digit, `\\` backslash
/// - `[abc]` or `[a-z]` one character from the class
/// - `{n}` / `{n,m}` repeat the previous character, at most
///   [`MAX_PATTERN_REPEAT`] times; `{0}` drops it
pub fn expand_pattern<R: Rng + ?Sized>(pattern: &str, rng: &mut R) -> String {
    let mut result = String::new();
    let mut chars = pattern.chars().peekable();
    let mut last_char: Option<char> = None;

    while let Some(ch) = chars.next() {
        let generated = match ch {
            '#' => Some(random_digit(rng)),
            '?' => Some(rng.gen_range('a'..='z')),
            '*' => {
                if rng.gen_bool(0.5) {
                    Some(random_digit(rng))
                } else {
                    Some(rng.gen_range('a'..='z'))
                }
            }
            '\\' => chars.next().map(|next| match next {
                'd' => random_digit(rng),
                'a' => rng.gen_range('a'..='z'),
                'A' => rng.gen_range('A'..='Z'),
                'x' => {
                    let hex = b"0123456789abcdef";
                    hex[rng.gen_range(0..hex.len())] as char
                }
                other => other,
            }),
            '[' => {
                let mut class: Vec<char> = Vec::new();
                while let Some(c) = chars.next() {
                    if c == ']' {
                        break;
                    }
                    if chars.peek() == Some(&'-') {
                        chars.next();
                        match chars.peek().copied() {
                            Some(end) if end != ']' => {
                                chars.next();
                                class.extend(c..=end);
                            }
                            _ => {
                                class.push(c);
                                class.push('-');
                            }
                        }
                    } else {
                        class.push(c);
                    }
                }
                class.choose(rng).copied()
            }
            '{' => {
                let mut quantifier = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    quantifier.push(c);
                }
                let (min, max) = match quantifier.split_once(',') {
                    Some((lo, hi)) => {
                        let lo = parse_repeat(lo).unwrap_or(1);
                        let hi = parse_repeat(hi).unwrap_or(lo);
                        (lo, hi.max(lo))
                    }
                    None => {
                        let n = parse_repeat(&quantifier).unwrap_or(1);
                        (n, n)
                    }
                };
                let count = rng.gen_range(min..=max);
                // One instance is already in the output
                if let Some(c) = last_char {
                    if count == 0 {
                        result.pop();
                        last_char = None;
                    }
                    for _ in 1..count {
                        result.push(c);
                    }
                }
                None
            }
            other => Some(other),
        };

        if let Some(c) = generated {
            result.push(c);
            last_char = Some(c);
        }
    }

    result
}

fn parse_repeat(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(raw.parse::<usize>().map_or(MAX_PATTERN_REPEAT, |n| n.min(MAX_PATTERN_REPEAT)))
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}
