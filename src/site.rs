//! Site Plan Assembly
//!
//! The outward-facing surface: input props with sensible defaults, the
//! declarative bucket/distribution/deployment configuration handed to the
//! provisioning collaborators, and the synthesis pipelines that tie the
//! scanner, compiler, and emitter together.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compile::compile_route_table;
use crate::emit::{emit_function, RoutingArtifact};
use crate::manifest::load_routes_manifest;
use crate::route::SynthError;
use crate::scan::scan_pages;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE CONTROL
// ═══════════════════════════════════════════════════════════════════════════════

/// For content-hashed assets, invalidation handles rollover.
pub const CACHE_CONTROL_FOREVER: &str = "public,max-age=31536000,immutable";

/// Long CDN cache, no browser cache, for everything that can change in place.
pub const CACHE_CONTROL_SERVER_LONG_NO_BROWSER: &str =
    "public,max-age=0,s-maxage=2678400,must-revalidate";

/// Upload globs that carry a content hash in their file name.
const HASHED_ASSET_GLOBS: [&str; 2] = ["*.js", "*.css"];

// ═══════════════════════════════════════════════════════════════════════════════
// PROPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Synthesis input. Every field has a conventional default so a sparse JSON
/// props object deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct SiteProps {
    /// Root of the page source tree.
    pub pages_dir: String,
    /// Directory containing the fully exported static site.
    pub export_dir: String,
    /// Build output directory; only used to confirm the export actually ran.
    pub build_dir: String,
    /// Exported file served when no route matches. Absent means unmatched
    /// requests pass through to the origin untouched.
    pub fallback_file: Option<String>,
    pub bucket: BucketProps,
    pub distribution: DistributionProps,
}

impl Default for SiteProps {
    fn default() -> Self {
        SiteProps {
            pages_dir: "./pages".to_string(),
            export_dir: "./out".to_string(),
            build_dir: "./.next".to_string(),
            fallback_file: None,
            bucket: BucketProps::default(),
            distribution: DistributionProps::default(),
        }
    }
}

/// Locked-down bucket configuration: the distribution is the only reader,
/// and tearing the site down removes everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct BucketProps {
    pub public_read_access: bool,
    pub block_public_access: String,
    pub auto_delete_objects: bool,
    pub removal_policy: String,
}

impl Default for BucketProps {
    fn default() -> Self {
        BucketProps {
            public_read_access: false,
            block_public_access: "BLOCK_ALL".to_string(),
            auto_delete_objects: true,
            removal_policy: "DESTROY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseProps {
    pub http_status: u32,
    pub response_page_path: String,
}

/// Cache policy tuned for exported sites: vary on the full query string and
/// cookies, never on headers, and let the CDN keep objects up to a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct CachePolicyProps {
    pub query_string_behavior: String,
    pub header_behavior: String,
    pub cookie_behavior: String,
    pub default_ttl_seconds: u32,
    pub max_ttl_seconds: u32,
    pub min_ttl_seconds: u32,
    pub enable_accept_encoding_brotli: bool,
    pub enable_accept_encoding_gzip: bool,
    pub comment: String,
}

impl Default for CachePolicyProps {
    fn default() -> Self {
        CachePolicyProps {
            query_string_behavior: "all".to_string(),
            header_behavior: "none".to_string(),
            cookie_behavior: "all".to_string(),
            default_ttl_seconds: 0,
            max_ttl_seconds: 31_536_000,
            min_ttl_seconds: 0,
            enable_accept_encoding_brotli: true,
            enable_accept_encoding_gzip: true,
            comment: "Static export dynamic routing site cache policy".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct DistributionProps {
    pub default_root_object: String,
    pub error_responses: Vec<ErrorResponseProps>,
    pub viewer_protocol_policy: String,
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub compress: bool,
    pub cache_policy: CachePolicyProps,
}

impl Default for DistributionProps {
    fn default() -> Self {
        let methods = vec![
            "GET".to_string(),
            "HEAD".to_string(),
            "OPTIONS".to_string(),
        ];
        DistributionProps {
            default_root_object: "index.html".to_string(),
            error_responses: vec![
                ErrorResponseProps {
                    http_status: 403,
                    response_page_path: "/404.html".to_string(),
                },
                ErrorResponseProps {
                    http_status: 404,
                    response_page_path: "/404.html".to_string(),
                },
            ],
            viewer_protocol_policy: "redirect-to-https".to_string(),
            allowed_methods: methods.clone(),
            cached_methods: methods,
            compress: true,
            cache_policy: CachePolicyProps::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEPLOYMENT PLAN
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct DeploymentGroup {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub cache_control: String,
    pub prune: bool,
    pub invalidate_distribution: bool,
}

/// Upload instructions for the publisher collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPlan {
    pub source_dir: String,
    pub groups: Vec<DeploymentGroup>,
}

/// Two upload groups over the export directory: hashed assets are cached
/// forever and rolled over by invalidation; everything else gets the long
/// server-side policy and triggers a distribution invalidation.
pub fn deployment_plan(export_dir: &str) -> DeploymentPlan {
    let hashed: Vec<String> = HASHED_ASSET_GLOBS.iter().map(|g| g.to_string()).collect();
    DeploymentPlan {
        source_dir: export_dir.to_string(),
        groups: vec![
            DeploymentGroup {
                name: "hashed-assets".to_string(),
                include: hashed.clone(),
                exclude: Vec::new(),
                cache_control: CACHE_CONTROL_FOREVER.to_string(),
                prune: false,
                invalidate_distribution: false,
            },
            DeploymentGroup {
                name: "default".to_string(),
                include: Vec::new(),
                exclude: hashed,
                cache_control: CACHE_CONTROL_SERVER_LONG_NO_BROWSER.to_string(),
                prune: false,
                invalidate_distribution: true,
            },
        ],
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTHESIS
// ═══════════════════════════════════════════════════════════════════════════════

/// The complete declarative output: the routing artifact for the wiring
/// collaborator plus bucket, distribution, and upload configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct SitePlan {
    pub routing: RoutingArtifact,
    pub bucket: BucketProps,
    pub distribution: DistributionProps,
    pub deployments: DeploymentPlan,
}

/// The pure core pipeline: page tree in, routing artifact out. No state,
/// no side effects beyond reading the tree once.
pub fn synth_routing(
    pages_dir: &Path,
    fallback_file: Option<String>,
) -> Result<RoutingArtifact, SynthError> {
    let descriptors = scan_pages(pages_dir)?;
    let table = compile_route_table(&descriptors, fallback_file)?;
    emit_function(&table)
}

/// Full synthesis: confirm the export ran, generate the routing artifact,
/// and assemble the plan for the provisioning collaborators.
pub fn synth_site(props: &SiteProps) -> Result<SitePlan, SynthError> {
    load_routes_manifest(Path::new(&props.build_dir))?;

    let routing = synth_routing(Path::new(&props.pages_dir), props.fallback_file.clone())?;

    Ok(SitePlan {
        routing,
        bucket: props.bucket.clone(),
        distribution: props.distribution.clone(),
        deployments: deployment_plan(&props.export_dir),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn synth_site_native(props_json: serde_json::Value) -> napi::Result<serde_json::Value> {
    let props: SiteProps = serde_json::from_value(props_json)
        .map_err(|e| napi::Error::from_reason(format!("Invalid props: {}", e)))?;

    let plan = synth_site(&props).map_err(|e| napi::Error::from_reason(e.to_string()))?;

    serde_json::to_value(&plan).map_err(|e| napi::Error::from_reason(e.to_string()))
}
