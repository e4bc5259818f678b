//! Size-Budget Code Emitter
//!
//! Serializes a route table into the body of a viewer-request edge function
//! and enforces the platform's hard artifact-size ceiling. The routing data
//! is embedded as inline arrays so the body grows linearly with the number
//! of route shapes, never with the number of static paths beneath them.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::route::{MatchPart, RouteTable, SynthError, TailMatch};

/// Hard platform ceiling for a viewer-request edge function, in bytes.
pub const MAX_EDGE_FUNCTION_BYTES: u32 = 10240;

// ═══════════════════════════════════════════════════════════════════════════════
// ARTIFACT
// ═══════════════════════════════════════════════════════════════════════════════

/// The terminal artifact of the core. Immutable after creation; the wiring
/// collaborator treats the body as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct RoutingArtifact {
    pub emitted_body: String,
    pub estimated_size: u32,
    pub route_count: u32,
    pub fallback_file: Option<String>,
    pub content_hash: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TABLE ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// The inline data the function body embeds.
///
/// Fully-literal routes whose exported file is just the route plus `.html`
/// collapse into a flat string array; membership rewrites to `uri + ".html"`.
/// That array is always the most specific possible match, so checking it
/// first preserves the compiler's resolution order. Everything else becomes
/// an ordered `[pattern, file, tail]` triple: pattern elements are literal
/// strings or the number 1 (any single segment), and tail is 0 for a fixed
/// length, 1 for a catch-all, 2 for an optional catch-all.
pub(crate) struct EncodedTable {
    pub statics: Vec<String>,
    pub entries: Vec<serde_json::Value>,
    pub root_file: String,
}

pub(crate) fn encode_table(table: &RouteTable) -> EncodedTable {
    let root_file = table.resolve("/").unwrap_or("/index.html").to_string();

    let mut statics = Vec::new();
    let mut entries = Vec::new();

    for entry in &table.entries {
        let rule = &entry.rule;

        // The root route is carried entirely by the empty-path rewrite.
        if rule.parts.is_empty() && rule.tail == TailMatch::None {
            continue;
        }

        let all_literal = rule
            .parts
            .iter()
            .all(|part| matches!(part, MatchPart::Literal(_)));

        if all_literal && rule.tail == TailMatch::None {
            let mut uri = String::new();
            for part in &rule.parts {
                if let MatchPart::Literal(text) = part {
                    uri.push('/');
                    uri.push_str(text);
                }
            }
            if entry.exported_file == format!("{}.html", uri) {
                statics.push(uri);
                continue;
            }
        }

        let pattern: Vec<serde_json::Value> = rule
            .parts
            .iter()
            .map(|part| match part {
                MatchPart::Literal(text) => json!(text),
                MatchPart::Any => json!(1),
            })
            .collect();
        let tail = match rule.tail {
            TailMatch::None => 0,
            TailMatch::CatchAll => 1,
            TailMatch::Optional => 2,
        };
        entries.push(json!([pattern, entry.exported_file, tail]));
    }

    EncodedTable {
        statics,
        entries,
        root_file,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMISSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Serialize the route table into a complete edge function body.
///
/// The body is authored compact, validated as a script, then measured
/// against the platform ceiling. Nothing truncated or unparseable is ever
/// returned; on failure the caller gets the measured size and has to reduce
/// route-shape cardinality.
pub fn emit_function(table: &RouteTable) -> Result<RoutingArtifact, SynthError> {
    let encoded = encode_table(table);

    let statics_json = to_inline_json(&encoded.statics)?;
    let entries_json = to_inline_json(&encoded.entries)?;
    let root_json = to_inline_json(&encoded.root_file)?;

    let mut body = String::with_capacity(1024);
    body.push_str("function handler(event){var q=event.request;var u=q.uri;");
    // Requests for real files (framework assets, anything with an
    // extension) bypass the table entirely.
    body.push_str(
        "function x(p){var a=p.split('/');var l=a.pop();return !!l&&l.indexOf('.')!==-1}",
    );
    body.push_str("if(u.startsWith('/_next')||x(u)){return q}");
    body.push_str("if(u.endsWith('/')){u=u.slice(0,-1)}");
    body.push_str("if(u===''){q.uri=");
    body.push_str(&root_json);
    body.push_str(";return q}");
    body.push_str("var s=");
    body.push_str(&statics_json);
    body.push_str(";for(var i=0;i<s.length;i++){if(s[i]===u){q.uri=u+'.html';return q}}");
    body.push_str("var d=");
    body.push_str(&entries_json);
    body.push_str(";var g=u.split('/').filter(Boolean);");
    body.push_str("for(var k=0;k<d.length;k++){var p=d[k][0];var t=d[k][2];");
    body.push_str("if(t===0){if(g.length!==p.length){continue}}");
    body.push_str("else if(t===1){if(g.length<p.length+1){continue}}");
    body.push_str("else if(g.length<p.length){continue}");
    body.push_str("var m=true;");
    body.push_str("for(var j=0;j<p.length;j++){if(p[j]!==1&&p[j]!==g[j]){m=false;break}}");
    body.push_str("if(m){q.uri=d[k][1];return q}}");
    if let Some(fallback) = &table.fallback_file {
        body.push_str("q.uri=");
        body.push_str(&to_inline_json(fallback)?);
        body.push(';');
    }
    body.push_str("return q}");

    validate_script(&body)?;

    let estimated_size = body.len() as u32;
    let route_count = table.entries.len() as u32;

    if estimated_size > MAX_EDGE_FUNCTION_BYTES {
        return Err(SynthError::SizeBudgetExceeded {
            measured_bytes: estimated_size,
            limit_bytes: MAX_EDGE_FUNCTION_BYTES,
            route_count,
        });
    }

    let content_hash = compute_hash(&body);

    eprintln!(
        "[Routegen] Emitted edge function: {} bytes for {} routes",
        estimated_size, route_count
    );

    Ok(RoutingArtifact {
        emitted_body: body,
        estimated_size,
        route_count,
        fallback_file: table.fallback_file.clone(),
        content_hash,
    })
}

fn to_inline_json<T: Serialize>(value: &T) -> Result<String, SynthError> {
    serde_json::to_string(value).map_err(|e| SynthError::Emit {
        message: format!("failed to serialize route data: {}", e),
    })
}

/// The body must parse cleanly for the edge runtime before it is accepted.
fn validate_script(source: &str) -> Result<(), SynthError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default();
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        return Err(SynthError::Emit {
            message: format!(
                "generated body failed to parse ({} errors)",
                ret.errors.len()
            ),
        });
    }
    Ok(())
}

pub(crate) fn compute_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}
