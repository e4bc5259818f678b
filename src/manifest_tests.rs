#[cfg(test)]
mod tests {
    use crate::manifest::{load_routes_manifest, routes_from_manifest, validate_manifest};
    use crate::route::{SegmentSpec, ERR_MANIFEST};
    use std::fs;

    const VALID_MANIFEST: &str = r#"{
        "version": 3,
        "pages404": true,
        "basePath": "",
        "redirects": [],
        "rewrites": [],
        "headers": [],
        "staticRoutes": [
            { "page": "/", "regex": "^/(?:/)?$", "routeKeys": {}, "namedRegex": "^/(?:/)?$" },
            { "page": "/about", "regex": "^/about(?:/)?$", "routeKeys": {}, "namedRegex": "^/about(?:/)?$" }
        ],
        "dynamicRoutes": [
            {
                "page": "/posts/[id]",
                "regex": "^/posts/([^/]+?)(?:/)?$",
                "routeKeys": { "id": "id" },
                "namedRegex": "^/posts/(?<id>[^/]+?)(?:/)?$"
            }
        ],
        "dataRoutes": []
    }"#;

    #[test]
    fn loads_and_converts_a_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("routes-manifest.json"), VALID_MANIFEST).unwrap();

        let manifest = load_routes_manifest(dir.path()).unwrap();
        assert_eq!(manifest.version, 3);
        assert!(manifest.pages_404);

        let descriptors = routes_from_manifest(&manifest);
        assert_eq!(descriptors.len(), 3);

        let root = &descriptors[0];
        assert!(root.segments.is_empty());
        assert_eq!(root.exported_file, "/index.html");

        let posts = descriptors
            .iter()
            .find(|d| d.source_path == "/posts/[id]")
            .unwrap();
        assert_eq!(
            posts.segments,
            vec![
                SegmentSpec::Literal("posts".to_string()),
                SegmentSpec::Dynamic("id".to_string())
            ]
        );
        assert_eq!(posts.exported_file, "/posts/[id].html");
    }

    #[test]
    fn rejects_unsupported_versions() {
        let mut manifest: crate::manifest::RoutesManifest =
            serde_json::from_str(VALID_MANIFEST).unwrap();
        manifest.version = 1;
        let err = validate_manifest(&manifest).unwrap_err();
        assert_eq!(err.code(), ERR_MANIFEST);
        assert!(err.to_string().contains("version 1"));
    }

    #[test]
    fn rejects_data_routes() {
        let raw = VALID_MANIFEST.replace(
            r#""dataRoutes": []"#,
            r#""dataRoutes": [{ "page": "/live/[id]", "dataRouteRegex": "^/_next/data/x$" }]"#,
        );
        let manifest: crate::manifest::RoutesManifest = serde_json::from_str(&raw).unwrap();
        let err = validate_manifest(&manifest).unwrap_err();
        assert_eq!(err.code(), ERR_MANIFEST);
        assert!(err.to_string().contains("data routes"));
    }

    #[test]
    fn missing_manifest_points_at_the_build_step() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_routes_manifest(dir.path()).unwrap_err();
        assert_eq!(err.code(), ERR_MANIFEST);
        assert!(err.to_string().contains("routes-manifest.json"));
        assert!(err.guidance().contains("build"));
    }

    #[test]
    fn sparse_manifest_fields_default() {
        let raw = r#"{ "version": 3, "staticRoutes": [{ "page": "/about" }] }"#;
        let manifest: crate::manifest::RoutesManifest = serde_json::from_str(raw).unwrap();
        assert!(validate_manifest(&manifest).is_ok());
        assert_eq!(routes_from_manifest(&manifest).len(), 1);
    }
}
