//! # Routegen Native Core
//!
//! Deploys a statically exported page-based site behind a CDN without losing
//! client-side dynamic routing: `/posts/42` must serve the single exported
//! `/posts/[id].html` no matter the id. The core is a three-stage build-time
//! pipeline; provisioning and uploads are external collaborators that only
//! consume its declarative output.
//!
//! ## Pipeline Invariants
//!
//! 1. **Specificity order**: at every segment position a literal outranks a
//!    dynamic segment, which outranks a catch-all, which outranks an
//!    optional catch-all. Earlier positions dominate later ones. The route
//!    table's entry order IS the resolution order.
//!
//! 2. **No silent ambiguity**: two pages collapsing to the same match shape
//!    abort synthesis with both source paths. Ordering never papers over a
//!    genuine collision.
//!
//! 3. **Hard size ceiling**: the emitted function body is measured in bytes
//!    against the platform limit at build time. Exceeding it fails the whole
//!    synthesis; no truncated artifact ever ships.
//!
//! 4. **Determinism**: identical input trees produce byte-identical
//!    artifacts. Traversal is sorted, ordering is stable, and nothing
//!    serialized depends on map iteration order, timestamps, or randomness.
//!
//! 5. **Pass-through on miss**: with no fallback configured, an unmatched
//!    request leaves the edge function untouched and the origin's normal
//!    404 handling applies. That is a serving condition, not an error.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod compile;
mod emit;
mod manifest;
mod route;
mod scan;
mod site;

pub use compile::compile_route_table;
pub use emit::{emit_function, RoutingArtifact, MAX_EDGE_FUNCTION_BYTES};
pub use manifest::{
    load_routes_manifest, routes_from_manifest, validate_manifest, DataRoute, ManifestRoute,
    RoutesManifest, SUPPORTED_MANIFEST_VERSION,
};
pub use route::{
    parse_route_path, MatchPart, MatchRule, RouteDescriptor, RouteEntry, RouteTable, SegmentSpec,
    SynthError, TailMatch, ERR_AMBIGUOUS_ROUTE, ERR_EMIT, ERR_INVALID_ROUTE, ERR_MANIFEST,
    ERR_SCAN, ERR_SIZE_BUDGET,
};
pub use scan::scan_pages;
pub use site::{
    deployment_plan, synth_routing, synth_site, BucketProps, CachePolicyProps, DeploymentGroup,
    DeploymentPlan, DistributionProps, ErrorResponseProps, SitePlan, SiteProps,
    CACHE_CONTROL_FOREVER, CACHE_CONTROL_SERVER_LONG_NO_BROWSER,
};

#[cfg(feature = "napi")]
pub use site::synth_site_native;

#[cfg(feature = "napi")]
#[napi]
pub fn routegen_bridge() -> String {
    "Routegen Native Bridge Connected".to_string()
}

#[cfg(test)]
mod compile_tests;
#[cfg(test)]
mod manifest_tests;
