//! Page Topology Scanner
//!
//! Recursively walks the page source tree and yields one route descriptor
//! per page file, in sorted traversal order. Non-route files (assets,
//! framework files, API handlers) are skipped.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::route::{RouteDescriptor, SegmentSpec, SynthError};

/// Source extensions that produce an exported page.
const PAGE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Scan the page source tree. The root must exist and be fully readable;
/// anything less aborts synthesis before a partial table can be built.
pub fn scan_pages(pages_dir: &Path) -> Result<Vec<RouteDescriptor>, SynthError> {
    if !pages_dir.is_dir() {
        return Err(SynthError::Scan {
            path: pages_dir.display().to_string(),
            message: "directory does not exist".to_string(),
        });
    }

    let files = find_page_files(pages_dir)?;

    let mut descriptors = Vec::new();
    for file_path in files {
        if let Some(descriptor) = descriptor_for_page(pages_dir, &file_path) {
            descriptors.push(descriptor);
        }
    }

    eprintln!(
        "[Routegen] Discovered {} routes under {}",
        descriptors.len(),
        pages_dir.display()
    );

    Ok(descriptors)
}

/// Recursively find all page source files, sorted by file name so the
/// descriptor order is identical on every run.
fn find_page_files(dir: &Path) -> Result<Vec<PathBuf>, SynthError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| SynthError::Scan {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if PAGE_EXTENSIONS.contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Derive the route descriptor for one page file, or `None` if the file is
/// not route-bearing.
fn descriptor_for_page(root: &Path, file_path: &Path) -> Option<RouteDescriptor> {
    let relative = file_path.strip_prefix(root).ok()?;

    let mut components: Vec<String> = Vec::new();
    for component in relative.components() {
        components.push(component.as_os_str().to_str()?.to_string());
    }

    // Framework-internal files (_app, _document) and dotfiles never export.
    if components
        .iter()
        .any(|c| c.starts_with('_') || c.starts_with('.'))
    {
        return None;
    }

    // API handlers run server-side and have no HTML export.
    if components.first().map(String::as_str) == Some("api") {
        return None;
    }

    // Replace the file name with its stem; `index` collapses into the
    // parent directory's own route.
    let file_name = components.pop()?;
    let stem = Path::new(&file_name).file_stem()?.to_str()?.to_string();
    if stem != "index" {
        components.push(stem);
    }

    let segments: Vec<SegmentSpec> = components.iter().map(|c| SegmentSpec::parse(c)).collect();

    // The export writes one file per route: the route path with bracket
    // names preserved plus `.html`, with the root landing in `/index.html`.
    let exported_file = if segments.is_empty() {
        "/index.html".to_string()
    } else {
        let mut path = String::new();
        for segment in &segments {
            path.push('/');
            path.push_str(&segment.raw());
        }
        path.push_str(".html");
        path
    };

    Some(RouteDescriptor {
        segments,
        exported_file,
        source_path: file_path.display().to_string(),
    })
}
