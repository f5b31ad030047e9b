//! Resolves request paths against registered endpoint patterns.
//!
//! A pattern is split on `/` into segments. Each segment is one of:
//! - a literal, which must equal the request segment and adds 1 to the weight
//! - a whole-segment parameter `{name}`, which captures anything
//! - a segment with embedded parameters such as `report-{year}.{ext}`, which
//!   is compiled to an anchored regex
//!
//! The surviving candidate with the highest weight wins; equal weights are
//! resolved in favour of the earliest registered candidate.

use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::{EndpointPattern, MatchResult, MockError};

/// Placeholder expansion for embedded parameters
const PARAM_CAPTURE: &str = r"([^/\s]+)";

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
    Embedded { regex: Regex, names: Vec<String> },
}

/// A path pattern split and compiled for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    segments: Vec<Segment>,
}

impl CompiledPattern {
    pub fn compile(pattern: &str) -> Result<Self, MockError> {
        let segments = split_segments(pattern)
            .into_iter()
            .map(|segment| compile_segment(pattern, segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Names of every parameter in the pattern, left to right
    pub fn param_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(_) => {}
                Segment::Param(name) => names.push(name.as_str()),
                Segment::Embedded { names: inner, .. } => {
                    names.extend(inner.iter().map(String::as_str))
                }
            }
        }
        names
    }

    /// Match pre-split request segments, returning the weight and captures
    pub fn matches(&self, request: &[&str]) -> Option<(usize, HashMap<String, String>)> {
        if request.len() != self.segments.len() {
            return None;
        }

        let mut weight = 0;
        let mut params = HashMap::new();

        for (segment, actual) in self.segments.iter().zip(request) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != actual {
                        return None;
                    }
                    weight += 1;
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode(actual));
                }
                Segment::Embedded { regex, names } => {
                    let captures = regex.captures(actual)?;
                    for (i, name) in names.iter().enumerate() {
                        if let Some(m) = captures.get(i + 1) {
                            params.insert(name.clone(), decode(m.as_str()));
                        }
                    }
                }
            }
        }

        Some((weight, params))
    }
}

pub struct PathMatcher;

impl PathMatcher {
    /// Select the most specific candidate for `request_path`.
    ///
    /// Candidates registered for another method are skipped. Returns `None`
    /// when nothing survives, including for an empty candidate list.
    pub fn match_path(
        request_path: &str,
        method: &str,
        candidates: &[EndpointPattern],
    ) -> Option<MatchResult> {
        let request = split_segments(request_path);
        let mut best: Option<MatchResult> = None;

        for candidate in candidates {
            if !candidate.method.eq_ignore_ascii_case(method) {
                continue;
            }

            let compiled = match CompiledPattern::compile(&candidate.path_pattern) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping endpoint {}: {}", candidate.id, e);
                    continue;
                }
            };

            let Some((weight, params)) = compiled.matches(&request) else {
                continue;
            };

            match &best {
                Some(current) if weight < current.weight => {}
                Some(current) if weight == current.weight => {
                    debug!(
                        "Pattern {} ties with {} at weight {} for {}, keeping first registered",
                        candidate.path_pattern, current.pattern_id, weight, request_path
                    );
                }
                _ => {
                    best = Some(MatchResult {
                        pattern_id: candidate.id.clone(),
                        weight,
                        params,
                    });
                }
            }
        }

        if let Some(result) = &best {
            debug!(
                "{} {} matched endpoint {} (weight {})",
                method, request_path, result.pattern_id, result.weight
            );
        }
        best
    }
}

/// Split a path into its non-empty segments
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn compile_segment(pattern: &str, segment: &str) -> Result<Segment, MockError> {
    if let Some(name) = whole_segment_param(segment) {
        return Ok(Segment::Param(name.to_string()));
    }

    let mut expr = String::from("^");
    let mut names = Vec::new();
    let mut rest = segment;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        if let Some(inner) = name.rfind('{') {
            // Only the innermost brace opens a placeholder
            let literal_end = start + 1 + inner;
            expr.push_str(&regex::escape(&rest[..literal_end]));
            rest = &rest[literal_end..];
            continue;
        }
        if name.is_empty() {
            // "{}" is not a placeholder
            expr.push_str(&regex::escape(&rest[..start + 2]));
        } else {
            expr.push_str(&regex::escape(&rest[..start]));
            expr.push_str(PARAM_CAPTURE);
            names.push(name.to_string());
        }
        rest = &rest[start + len + 2..];
    }

    if names.is_empty() {
        return Ok(Segment::Literal(segment.to_string()));
    }

    expr.push_str(&regex::escape(rest));
    expr.push('$');

    let regex = Regex::new(&expr).map_err(|e| MockError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Segment::Embedded { regex, names })
}

fn whole_segment_param(segment: &str) -> Option<&str> {
    if segment.len() <= 2 || !segment.starts_with('{') || !segment.ends_with('}') {
        return None;
    }
    let inner = &segment[1..segment.len() - 1];
    if inner.contains('{') || inner.contains('}') {
        return None;
    }
    Some(inner)
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
