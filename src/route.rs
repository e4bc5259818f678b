//! Route Model for the Routegen Core
//!
//! Shared vocabulary for the scan -> compile -> emit pipeline: segment
//! variants, route descriptors, compiled match rules, the ordered route
//! table, and the synthesis error type.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SCAN: &str = "RG001";
pub const ERR_INVALID_ROUTE: &str = "RG002";
pub const ERR_MANIFEST: &str = "RG003";
pub const ERR_AMBIGUOUS_ROUTE: &str = "RG004";
pub const ERR_SIZE_BUDGET: &str = "RG005";
pub const ERR_EMIT: &str = "RG006";

fn get_guidance(code: &str) -> &'static str {
    match code {
        ERR_SCAN => "The pages directory must exist and be readable before synthesis runs.",
        ERR_INVALID_ROUTE => {
            "Catch-all segments may only appear as the final segment of a route."
        }
        ERR_MANIFEST => {
            "Run the framework build and static export before deploying, and keep data routes out of exported sites."
        }
        ERR_AMBIGUOUS_ROUTE => {
            "Two page files claim the same URL shape. Rename or restructure one of them."
        }
        ERR_SIZE_BUDGET => {
            "The edge function is size-capped. Reduce the number of page types; static paths under an existing dynamic route do not count."
        }
        ERR_EMIT => "The generated function body must parse as a valid edge runtime script.",
        _ => "Unknown synthesis failure.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTH ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Build-time synthesis failure. Every variant is fatal and non-retryable;
/// the caller has to change the input and rerun the whole pipeline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SynthError {
    Scan {
        path: String,
        message: String,
    },
    InvalidRoute {
        source_path: String,
        message: String,
    },
    Manifest {
        message: String,
    },
    AmbiguousRoute {
        pattern: String,
        first: String,
        second: String,
    },
    SizeBudgetExceeded {
        measured_bytes: u32,
        limit_bytes: u32,
        route_count: u32,
    },
    Emit {
        message: String,
    },
}

impl SynthError {
    pub fn code(&self) -> &'static str {
        match self {
            SynthError::Scan { .. } => ERR_SCAN,
            SynthError::InvalidRoute { .. } => ERR_INVALID_ROUTE,
            SynthError::Manifest { .. } => ERR_MANIFEST,
            SynthError::AmbiguousRoute { .. } => ERR_AMBIGUOUS_ROUTE,
            SynthError::SizeBudgetExceeded { .. } => ERR_SIZE_BUDGET,
            SynthError::Emit { .. } => ERR_EMIT,
        }
    }

    pub fn guidance(&self) -> &'static str {
        get_guidance(self.code())
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Scan { path, message } => {
                write!(f, "[{}] failed to scan pages at {}: {}", ERR_SCAN, path, message)
            }
            SynthError::InvalidRoute {
                source_path,
                message,
            } => {
                write!(
                    f,
                    "[{}] invalid route in {}: {}",
                    ERR_INVALID_ROUTE, source_path, message
                )
            }
            SynthError::Manifest { message } => {
                write!(f, "[{}] routes manifest rejected: {}", ERR_MANIFEST, message)
            }
            SynthError::AmbiguousRoute {
                pattern,
                first,
                second,
            } => {
                write!(
                    f,
                    "[{}] ambiguous route shape {}: {} and {} resolve to the same requests",
                    ERR_AMBIGUOUS_ROUTE, pattern, first, second
                )
            }
            SynthError::SizeBudgetExceeded {
                measured_bytes,
                limit_bytes,
                route_count,
            } => {
                write!(
                    f,
                    "[{}] edge function is {} bytes for {} routes, platform limit is {} bytes",
                    ERR_SIZE_BUDGET, measured_bytes, route_count, limit_bytes
                )
            }
            SynthError::Emit { message } => {
                write!(f, "[{}] emitted function rejected: {}", ERR_EMIT, message)
            }
        }
    }
}

impl std::error::Error for SynthError {}

// ═══════════════════════════════════════════════════════════════════════════════
// SEGMENT GRAMMAR
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref OPTIONAL_CATCH_ALL_RE: Regex =
        Regex::new(r"^\[\[\.\.\.([A-Za-z0-9_$-]+)\]\]$").unwrap();
    static ref CATCH_ALL_RE: Regex = Regex::new(r"^\[\.\.\.([A-Za-z0-9_$-]+)\]$").unwrap();
    static ref DYNAMIC_RE: Regex = Regex::new(r"^\[([A-Za-z0-9_$-]+)\]$").unwrap();
}

/// One path segment's matching rule. The variant set is closed so the
/// matcher stays a single exhaustive switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentSpec {
    Literal(String),
    Dynamic(String),
    CatchAll(String),
    OptionalCatchAll(String),
}

impl SegmentSpec {
    /// Parse a single path component. Anything that is not bracket syntax is
    /// a literal, matching the page-directory naming convention.
    pub fn parse(raw: &str) -> SegmentSpec {
        if let Some(cap) = OPTIONAL_CATCH_ALL_RE.captures(raw) {
            SegmentSpec::OptionalCatchAll(cap[1].to_string())
        } else if let Some(cap) = CATCH_ALL_RE.captures(raw) {
            SegmentSpec::CatchAll(cap[1].to_string())
        } else if let Some(cap) = DYNAMIC_RE.captures(raw) {
            SegmentSpec::Dynamic(cap[1].to_string())
        } else {
            SegmentSpec::Literal(raw.to_string())
        }
    }

    /// The component as it appears in the page tree and in exported file
    /// names, brackets included.
    pub fn raw(&self) -> String {
        match self {
            SegmentSpec::Literal(name) => name.clone(),
            SegmentSpec::Dynamic(param) => format!("[{}]", param),
            SegmentSpec::CatchAll(param) => format!("[...{}]", param),
            SegmentSpec::OptionalCatchAll(param) => format!("[[...{}]]", param),
        }
    }
}

/// Parse a route path such as `/majors/[majorId]/apps` into segments.
pub fn parse_route_path(path: &str) -> Vec<SegmentSpec> {
    path.split('/')
        .filter(|part| !part.is_empty())
        .map(SegmentSpec::parse)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE DESCRIPTOR
// ═══════════════════════════════════════════════════════════════════════════════

/// One discovered page. Created once during scanning and immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub segments: Vec<SegmentSpec>,
    /// The literal exported file this route serves, e.g. `/posts/[id].html`.
    pub exported_file: String,
    /// Where the route came from (page file or manifest entry), for errors.
    pub source_path: String,
}

impl RouteDescriptor {
    /// The URL path pattern with bracket names preserved, `/` for the root.
    pub fn route_path(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(&segment.raw());
        }
        path
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MATCH RULE
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-position matcher: a literal text or any single segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPart {
    Literal(String),
    Any,
}

/// Variable-length suffix matcher. `CatchAll` needs at least one remaining
/// segment, `Optional` also matches the bare prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TailMatch {
    None,
    CatchAll,
    Optional,
}

/// Compiled, comparison-ready form of a descriptor's segments. Parameter
/// names are erased: only literal text and wildcard positions decide a match,
/// and the rewrite target is the stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRule {
    pub parts: Vec<MatchPart>,
    pub tail: TailMatch,
}

impl MatchRule {
    pub fn from_segments(segments: &[SegmentSpec]) -> Result<MatchRule, String> {
        let mut parts = Vec::new();
        let mut tail = TailMatch::None;
        let last = segments.len().saturating_sub(1);

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                SegmentSpec::Literal(name) => parts.push(MatchPart::Literal(name.clone())),
                SegmentSpec::Dynamic(_) => parts.push(MatchPart::Any),
                SegmentSpec::CatchAll(param) => {
                    if index != last {
                        return Err(format!(
                            "catch-all segment [...{}] must be the final segment",
                            param
                        ));
                    }
                    tail = TailMatch::CatchAll;
                }
                SegmentSpec::OptionalCatchAll(param) => {
                    if index != last {
                        return Err(format!(
                            "optional catch-all segment [[...{}]] must be the final segment",
                            param
                        ));
                    }
                    tail = TailMatch::Optional;
                }
            }
        }

        Ok(MatchRule { parts, tail })
    }

    /// Whether this rule matches the given request path segments.
    pub fn matches(&self, segments: &[&str]) -> bool {
        match self.tail {
            TailMatch::None => {
                if segments.len() != self.parts.len() {
                    return false;
                }
            }
            TailMatch::CatchAll => {
                if segments.len() < self.parts.len() + 1 {
                    return false;
                }
            }
            TailMatch::Optional => {
                if segments.len() < self.parts.len() {
                    return false;
                }
            }
        }

        for (part, segment) in self.parts.iter().zip(segments) {
            match part {
                MatchPart::Literal(text) => {
                    if text != segment {
                        return false;
                    }
                }
                MatchPart::Any => {}
            }
        }

        true
    }

    /// Human-readable shape, used in ambiguity reports: literals verbatim,
    /// `*` for a dynamic segment, `**` / `**?` for the catch-all tails.
    pub fn shape_string(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            out.push('/');
            match part {
                MatchPart::Literal(text) => out.push_str(text),
                MatchPart::Any => out.push('*'),
            }
        }
        match self.tail {
            TailMatch::None => {}
            TailMatch::CatchAll => out.push_str("/**"),
            TailMatch::Optional => out.push_str("/**?"),
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    /// Specificity key: per position, literal beats dynamic beats catch-all
    /// beats optional catch-all, with literal text as the deterministic
    /// tiebreaker. Lexicographic comparison makes earlier segments dominate
    /// later ones, and a shorter rule sorts before any rule it prefixes.
    fn specificity_key(&self) -> Vec<(u8, &str)> {
        let mut key: Vec<(u8, &str)> = self
            .parts
            .iter()
            .map(|part| match part {
                MatchPart::Literal(text) => (0u8, text.as_str()),
                MatchPart::Any => (1u8, ""),
            })
            .collect();
        match self.tail {
            TailMatch::None => {}
            TailMatch::CatchAll => key.push((2, "")),
            TailMatch::Optional => key.push((3, "")),
        }
        key
    }
}

impl Ord for MatchRule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.specificity_key().cmp(&other.specificity_key())
    }
}

impl PartialOrd for MatchRule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE TABLE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub rule: MatchRule,
    pub exported_file: String,
    pub source_path: String,
}

/// Specificity-ordered lookup table. Entry order is the resolution order;
/// the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    pub entries: Vec<RouteEntry>,
    pub fallback_file: Option<String>,
}

impl RouteTable {
    /// Resolve a request path against the ordered entries. `None` means no
    /// rule matched; whether that falls back or passes through is the
    /// caller's concern.
    pub fn resolve(&self, uri: &str) -> Option<&str> {
        let segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();
        for entry in &self.entries {
            if entry.rule.matches(&segments) {
                return Some(&entry.exported_file);
            }
        }
        None
    }

    /// Resolution with the fallback applied, mirroring the emitted function.
    pub fn resolve_or_fallback(&self, uri: &str) -> Option<&str> {
        self.resolve(uri).or(self.fallback_file.as_deref())
    }
}
