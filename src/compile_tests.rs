#[cfg(test)]
mod tests {
    use crate::compile::compile_route_table;
    use crate::route::{
        parse_route_path, RouteDescriptor, SegmentSpec, SynthError, ERR_AMBIGUOUS_ROUTE,
        ERR_INVALID_ROUTE,
    };
    use pretty_assertions::assert_eq;

    fn desc(route: &str, file: &str, source: &str) -> RouteDescriptor {
        RouteDescriptor {
            segments: parse_route_path(route),
            exported_file: file.to_string(),
            source_path: source.to_string(),
        }
    }

    #[test]
    fn resolves_static_dynamic_and_optional_catch_all() {
        let table = compile_route_table(
            &[
                desc("/about", "about.html", "pages/about.js"),
                desc("/posts/[id]", "posts.html", "pages/posts/[id].js"),
                desc("/docs/[[...slug]]", "docs.html", "pages/docs/[[...slug]].js"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(table.resolve("/about"), Some("about.html"));
        assert_eq!(table.resolve("/posts/42"), Some("posts.html"));
        assert_eq!(table.resolve("/docs/a/b"), Some("docs.html"));
        assert_eq!(table.resolve("/docs"), Some("docs.html"));
        // No fallback configured: an unmatched path is the caller's
        // pass-through condition, never a crash.
        assert_eq!(table.resolve("/unknown"), None);
        assert_eq!(table.resolve_or_fallback("/unknown"), None);
    }

    #[test]
    fn fallback_applies_only_when_nothing_matches() {
        let table = compile_route_table(
            &[desc("/about", "/about.html", "pages/about.js")],
            Some("/404.html".to_string()),
        )
        .unwrap();

        assert_eq!(table.resolve_or_fallback("/about"), Some("/about.html"));
        assert_eq!(table.resolve_or_fallback("/missing"), Some("/404.html"));
    }

    #[test]
    fn identical_dynamic_shapes_are_ambiguous() {
        let err = compile_route_table(
            &[
                desc("/[id]", "/[id].html", "pages/[id].js"),
                desc("/[slug]", "/[slug].html", "pages/[slug].js"),
            ],
            None,
        )
        .unwrap_err();

        assert_eq!(err.code(), ERR_AMBIGUOUS_ROUTE);
        match err {
            SynthError::AmbiguousRoute {
                pattern,
                first,
                second,
            } => {
                assert_eq!(pattern, "/*");
                assert_eq!(first, "pages/[id].js");
                assert_eq!(second, "pages/[slug].js");
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn identical_literal_shapes_are_ambiguous() {
        let err = compile_route_table(
            &[
                desc("/about", "/about.html", "pages/about.js"),
                desc("/about", "/about.html", "pages/about/index.js"),
            ],
            None,
        )
        .unwrap_err();
        assert_eq!(err.code(), ERR_AMBIGUOUS_ROUTE);
    }

    #[test]
    fn literal_beats_dynamic_beats_catch_all_at_same_depth() {
        let table = compile_route_table(
            &[
                desc(
                    "/posts/[...rest]",
                    "/posts/[...rest].html",
                    "pages/posts/[...rest].js",
                ),
                desc("/posts/create", "/posts/create.html", "pages/posts/create.js"),
                desc("/posts/[id]", "/posts/[id].html", "pages/posts/[id].js"),
            ],
            None,
        )
        .unwrap();

        let order: Vec<&str> = table
            .entries
            .iter()
            .map(|e| e.exported_file.as_str())
            .collect();
        assert_eq!(
            order,
            vec![
                "/posts/create.html",
                "/posts/[id].html",
                "/posts/[...rest].html"
            ]
        );

        assert_eq!(table.resolve("/posts/create"), Some("/posts/create.html"));
        assert_eq!(table.resolve("/posts/other"), Some("/posts/[id].html"));
        assert_eq!(
            table.resolve("/posts/2024/05/01"),
            Some("/posts/[...rest].html")
        );
    }

    #[test]
    fn earlier_segments_dominate_later_ones() {
        // A literal first segment wins even when its tail is the less
        // specific variant.
        let table = compile_route_table(
            &[
                desc("/[y]", "/[y].html", "pages/[y].js"),
                desc(
                    "/z/[[...rest]]",
                    "/z/[[...rest]].html",
                    "pages/z/[[...rest]].js",
                ),
            ],
            None,
        )
        .unwrap();

        assert_eq!(table.resolve("/z"), Some("/z/[[...rest]].html"));
        assert_eq!(table.resolve("/anything-else"), Some("/[y].html"));
    }

    #[test]
    fn ordered_rules_match_across_depths() {
        // A request can skip past a shallower literal route and still land
        // on the rule that actually fits its depth.
        let table = compile_route_table(
            &[
                desc("/a/b", "/a/b.html", "pages/a/b.js"),
                desc("/a/[x]/c", "/a/[x]/c.html", "pages/a/[x]/c.js"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(table.resolve("/a/b"), Some("/a/b.html"));
        assert_eq!(table.resolve("/a/b/c"), Some("/a/[x]/c.html"));
        assert_eq!(table.resolve("/a/b/d"), None);
    }

    #[test]
    fn fixed_rules_precede_their_variable_length_overlaps() {
        let table = compile_route_table(
            &[
                desc(
                    "/docs/[[...slug]]",
                    "/docs/[[...slug]].html",
                    "pages/docs/[[...slug]].js",
                ),
                desc("/docs", "/docs.html", "pages/docs/index.js"),
                desc("/docs/[page]", "/docs/[page].html", "pages/docs/[page].js"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(table.resolve("/docs"), Some("/docs.html"));
        assert_eq!(table.resolve("/docs/intro"), Some("/docs/[page].html"));
        assert_eq!(
            table.resolve("/docs/intro/setup"),
            Some("/docs/[[...slug]].html")
        );
    }

    #[test]
    fn catch_all_must_be_the_final_segment() {
        let descriptor = RouteDescriptor {
            segments: vec![
                SegmentSpec::CatchAll("parts".to_string()),
                SegmentSpec::Literal("trailing".to_string()),
            ],
            exported_file: "/broken.html".to_string(),
            source_path: "pages/[...parts]/trailing.js".to_string(),
        };

        let err = compile_route_table(&[descriptor], None).unwrap_err();
        assert_eq!(err.code(), ERR_INVALID_ROUTE);
    }

    #[test]
    fn compilation_is_deterministic_and_input_order_independent() {
        let descriptors = vec![
            desc("/about", "/about.html", "pages/about.js"),
            desc("/posts/[id]", "/posts/[id].html", "pages/posts/[id].js"),
            desc("/posts/create", "/posts/create.html", "pages/posts/create.js"),
            desc(
                "/docs/[[...slug]]",
                "/docs/[[...slug]].html",
                "pages/docs/[[...slug]].js",
            ),
        ];
        let mut reversed = descriptors.clone();
        reversed.reverse();

        let table_a = compile_route_table(&descriptors, None).unwrap();
        let table_b = compile_route_table(&descriptors, None).unwrap();
        let table_c = compile_route_table(&reversed, None).unwrap();

        assert_eq!(table_a, table_b);
        assert_eq!(table_a, table_c);
    }
}
