//! Routes Manifest Support
//!
//! Serde model and validation for the build output's `routes-manifest.json`.
//! Loading it proves the framework build and static export actually ran;
//! its route entries can also seed the compiler directly when a caller
//! prefers the build manifest over walking the page tree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::route::{parse_route_path, RouteDescriptor, SynthError};

/// The only manifest layout this core understands.
pub const SUPPORTED_MANIFEST_VERSION: u32 = 3;

const MANIFEST_FILE_NAME: &str = "routes-manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRoute {
    pub page: String,
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub named_regex: Option<String>,
    #[serde(default)]
    pub route_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRoute {
    pub page: String,
    #[serde(default)]
    pub data_route_regex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesManifest {
    pub version: u32,
    #[serde(rename = "pages404", default)]
    pub pages_404: bool,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub static_routes: Vec<ManifestRoute>,
    #[serde(default)]
    pub dynamic_routes: Vec<ManifestRoute>,
    #[serde(default)]
    pub data_routes: Vec<DataRoute>,
    #[serde(default)]
    pub redirects: Vec<serde_json::Value>,
    #[serde(default)]
    pub rewrites: Vec<serde_json::Value>,
    #[serde(default)]
    pub headers: Vec<serde_json::Value>,
}

/// Load and validate the manifest from the build output directory.
pub fn load_routes_manifest(build_dir: &Path) -> Result<RoutesManifest, SynthError> {
    let manifest_path = build_dir.join(MANIFEST_FILE_NAME);

    if !manifest_path.is_file() {
        return Err(SynthError::Manifest {
            message: format!(
                "could not find {} in {}; run the framework build and static export before deploying",
                MANIFEST_FILE_NAME,
                build_dir.display()
            ),
        });
    }

    let raw = fs::read_to_string(&manifest_path).map_err(|e| SynthError::Manifest {
        message: format!("failed to read {}: {}", manifest_path.display(), e),
    })?;

    let manifest: RoutesManifest = serde_json::from_str(&raw).map_err(|e| SynthError::Manifest {
        message: format!("failed to parse {}: {}", manifest_path.display(), e),
    })?;

    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Reject manifests this core cannot deploy faithfully.
pub fn validate_manifest(manifest: &RoutesManifest) -> Result<(), SynthError> {
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        return Err(SynthError::Manifest {
            message: format!(
                "routes manifest version {} is unsupported, expected {}",
                manifest.version, SUPPORTED_MANIFEST_VERSION
            ),
        });
    }

    if !manifest.data_routes.is_empty() {
        return Err(SynthError::Manifest {
            message: format!(
                "{} data routes detected; incremental static regeneration cannot be served from a static export",
                manifest.data_routes.len()
            ),
        });
    }

    Ok(())
}

/// Derive route descriptors from the manifest's static and dynamic route
/// entries, through the same segment grammar the scanner uses.
pub fn routes_from_manifest(manifest: &RoutesManifest) -> Vec<RouteDescriptor> {
    let mut descriptors = Vec::new();

    for route in manifest
        .static_routes
        .iter()
        .chain(manifest.dynamic_routes.iter())
    {
        if route.page.is_empty() {
            continue;
        }
        let segments = parse_route_path(&route.page);
        let exported_file = if segments.is_empty() {
            "/index.html".to_string()
        } else {
            format!("{}.html", route.page)
        };
        descriptors.push(RouteDescriptor {
            segments,
            exported_file,
            source_path: route.page.clone(),
        });
    }

    descriptors
}
