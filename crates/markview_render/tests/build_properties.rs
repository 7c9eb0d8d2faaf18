//! Behavioral tests for the tree builder and the view lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use markview_ast::Node;
use markview_parser::{MarkdownParser, Parser};
use markview_render::style::{AmbientTheme, Color, Merge, TargetPlatform, TextStyle};
use markview_render::{
    BuildOptions, ExtensionRegistry, InteractionManager, LinkCallback, MarkdownView, RenderNode, Role, StyleConfig,
    ThemeKind, TreeBuilder, ViewConfig, compose_root, merge, resolve_theme,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn theme_style() -> StyleConfig {
    resolve_theme(ThemeKind::Primary, &AmbientTheme::light(), TargetPlatform::Linux)
}

fn parse(source: &str) -> Vec<Node> {
    MarkdownParser::new().parse(source).unwrap()
}

fn build(nodes: &[Node], style: &StyleConfig, interactions: &mut InteractionManager) -> Vec<RenderNode> {
    let registry = ExtensionRegistry::new();
    let options = BuildOptions::default();
    TreeBuilder::new(style, &registry, &options, interactions).build(nodes)
}

type Seen = Arc<Mutex<Vec<String>>>;

fn counting_callback() -> (Arc<AtomicUsize>, Seen, LinkCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen: Seen = Arc::default();
    let (count_clone, seen_clone) = (Arc::clone(&count), Arc::clone(&seen));
    let callback: LinkCallback = Arc::new(move |href: &str| {
        count_clone.fetch_add(1, Ordering::SeqCst);
        seen_clone.lock().push(href.to_string());
    });
    (count, seen, callback)
}

mod build_output {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_builds_nothing() {
        let mut interactions = InteractionManager::new();
        assert!(build(&[], &theme_style(), &mut interactions).is_empty());
    }

    #[rstest]
    #[case::paragraph("hello")]
    #[case::heading("# Title")]
    #[case::list("- a\n- b")]
    #[case::table("| a | b |\n|---|---|\n| 1 | 2 |")]
    #[case::code("```\ncode\n```")]
    #[case::rule("---")]
    fn non_empty_document_builds_something(#[case] source: &str) {
        let mut interactions = InteractionManager::new();
        assert!(!build(&parse(source), &theme_style(), &mut interactions).is_empty());
    }

    #[test]
    fn rebuilding_is_structurally_identical_with_fresh_handles() {
        let nodes = parse("A [link](https://example.test) and **bold**.\n\n- one\n- two");
        let style = theme_style();
        let mut interactions = InteractionManager::new();

        let first = build(&nodes, &style, &mut interactions);
        let first_handles: Vec<_> = first.iter().flat_map(|n| n.link_handles()).cloned().collect();
        let second = build(&nodes, &style, &mut interactions);
        let second_handles: Vec<_> = second.iter().flat_map(|n| n.link_handles()).cloned().collect();

        assert_eq!(first, second);
        assert_eq!(first_handles.len(), 1);
        assert!(!first_handles[0].ptr_eq(&second_handles[0]));
        assert!(first_handles[0].is_disposed());
        assert!(!second_handles[0].is_disposed());
    }

    #[rstest]
    #[case::emphasis("alpha\n*beta*")]
    #[case::link("alpha\n[beta](https://example.test)")]
    #[case::code_span("alpha\n`beta`")]
    #[case::crlf("alpha\r\n*beta*")]
    fn soft_break_before_inline_element_is_a_space(#[case] source: &str) {
        let mut interactions = InteractionManager::new();

        let out = build(&parse(source), &theme_style(), &mut interactions);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].plain_text(), "alpha beta");
    }

    #[test]
    fn soft_break_before_inline_element_as_line_break() {
        let style = theme_style();
        let registry = ExtensionRegistry::new();
        let options = BuildOptions {
            soft_line_break: true,
            ..BuildOptions::default()
        };
        let mut interactions = InteractionManager::new();

        let out = TreeBuilder::new(&style, &registry, &options, &mut interactions).build(&parse("alpha\n*beta*"));

        let RenderNode::Block(paragraph) = &out[0] else {
            panic!("expected a paragraph, got {out:?}");
        };
        assert_eq!(paragraph.children.len(), 3);
        assert!(matches!(&paragraph.children[0], RenderNode::Text(span) if span.text == "alpha"));
        assert_eq!(paragraph.children[1], RenderNode::LineBreak);
        assert!(matches!(&paragraph.children[2], RenderNode::Text(span) if span.text == "beta"));
    }

    #[test]
    fn unknown_tag_renders_children_with_ambient_style() {
        let style = theme_style();
        let mut interactions = InteractionManager::new();
        let nodes = [Node::element("foo", vec![Node::text("bar")])];

        let out = build(&nodes, &style, &mut interactions);

        assert_eq!(out, vec![RenderNode::text("bar", style.role(Role::Paragraph).text.clone())]);
    }

    #[test]
    fn broken_tag_does_not_affect_siblings() {
        let nodes = [
            Node::element("p", vec![Node::text("before")]),
            Node::element(
                "ul",
                vec![Node::element(
                    "li",
                    vec![Node::empty("input").with_attr("type", "checkbox").with_attr("checked", "??")],
                )],
            ),
            Node::element("p", vec![Node::text("after")]),
        ];
        let mut interactions = InteractionManager::new();

        let out = build(&nodes, &theme_style(), &mut interactions);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].plain_text(), "before");
        assert_eq!(out[1].plain_text(), "☐");
        assert_eq!(out[2].plain_text(), "after");
    }

    #[test]
    fn single_top_level_node_is_not_wrapped() {
        let mut interactions = InteractionManager::new();
        let mut nodes = build(&parse("# Only"), &theme_style(), &mut interactions);
        let only = nodes[0].clone();

        assert_eq!(compose_root(std::mem::take(&mut nodes), false, 8.0), only);
    }

    #[test]
    fn multiple_top_level_nodes_share_one_column() {
        let mut interactions = InteractionManager::new();
        let nodes = build(&parse("one\n\ntwo\n\nthree"), &theme_style(), &mut interactions);

        let root = compose_root(nodes, false, 8.0);

        let RenderNode::Column { stretch, children, .. } = root else {
            panic!("expected a column, got {root:?}");
        };
        assert!(stretch);
        assert_eq!(children.len(), 3);
    }
}

mod tasks_and_links {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::done("- [x] done", true, "☑")]
    #[case::todo("- [ ] todo", false, "☐")]
    fn task_items_render_disabled_checkbox(#[case] source: &str, #[case] checked: bool, #[case] glyph: &str) {
        let nodes = parse(source);
        let item = &nodes[0].children()[0];
        assert_eq!(item.children()[0].attr("checked"), Some(checked.to_string().as_str()));

        let mut interactions = InteractionManager::new();
        let out = build(&nodes, &theme_style(), &mut interactions);

        let RenderNode::List(list) = &out[0] else {
            panic!("expected a list, got {out:?}");
        };
        let RenderNode::ListItem(item) = &list.items[0] else {
            panic!("expected a list item");
        };
        assert!(item.marker.is_none());
        let RenderNode::Checkbox(checkbox) = &item.children[0] else {
            panic!("expected a checkbox, got {:?}", item.children);
        };
        assert_eq!(checkbox.checked, checked);
        assert!(!checkbox.enabled);
        assert_eq!(checkbox.glyph.to_string(), glyph);
    }

    #[test]
    fn tapping_link_invokes_callback_once_with_href() {
        let (count, seen, callback) = counting_callback();
        let nodes = [Node::element("a", vec![Node::text("click")]).with_attr("href", "https://example.test")];
        let style = theme_style();
        let registry = ExtensionRegistry::new();
        let options = BuildOptions::default();
        let mut interactions = InteractionManager::new();

        let out = TreeBuilder::new(&style, &registry, &options, &mut interactions)
            .with_link_callback(Some(callback))
            .build(&nodes);

        let handles = out[0].link_handles();
        assert_eq!(handles.len(), 1);
        assert!(handles[0].tap());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock(), vec!["https://example.test".to_string()]);
    }

    #[test]
    fn tapping_without_callback_is_swallowed() {
        let nodes = [Node::element("a", vec![Node::text("click")]).with_attr("href", "https://example.test")];
        let mut interactions = InteractionManager::new();

        let out = build(&nodes, &theme_style(), &mut interactions);

        assert!(!out[0].link_handles()[0].tap());
    }
}

mod lifecycle {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_live_handles_after_builds_and_teardown() {
        let (count, _, callback) = counting_callback();
        let mut view = MarkdownView::new(ViewConfig::new(), ExtensionRegistry::new());
        view.set_on_tap_link(Some(callback));
        let theme = AmbientTheme::light();
        let mut stale = Vec::new();

        for i in 0..5 {
            let ast = Arc::new(parse(&format!("[a](#a{i}) [b](#b{i}) [c](#c{i})")));
            let root = view.render(Some(ast), None, &theme).unwrap();
            stale.extend(root.link_handles().into_iter().cloned());
            assert_eq!(view.live_handles(), 3);
        }

        view.dispose();

        assert_eq!(view.live_handles(), 0);
        assert_eq!(view.build_count(), 5);
        assert!(stale.iter().all(|handle| handle.is_disposed()));
        assert!(stale.iter().all(|handle| !handle.tap()));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_view_disposes_handles() {
        let ast = Arc::new(parse("[a](#a)"));
        let handle = {
            let mut view = MarkdownView::new(ViewConfig::new(), ExtensionRegistry::new());
            let root = view.render(Some(ast), None, &AmbientTheme::light()).unwrap();
            let handle = root.link_handles()[0].clone();
            handle
        };
        assert!(handle.is_disposed());
    }

    #[test]
    fn override_style_reaches_render_tree() {
        let red = Color::rgb(0xff, 0, 0);
        let style = Arc::new(StyleConfig::new().with_text(
            Role::Paragraph,
            TextStyle {
                color: Some(red),
                ..TextStyle::default()
            },
        ));
        let mut view = MarkdownView::new(ViewConfig::new(), ExtensionRegistry::new());

        let root = view.render(Some(Arc::new(parse("hi"))), Some(style), &AmbientTheme::light()).unwrap();

        let RenderNode::Block(block) = root else {
            panic!("expected a paragraph, got {root:?}");
        };
        let RenderNode::Text(span) = &block.children[0] else {
            panic!("expected text");
        };
        assert_eq!(span.style.color, Some(red));
        assert_eq!(span.style.font_size, Some(14.0));
    }
}

mod style_merge {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_override() -> StyleConfig {
        StyleConfig {
            list_indent: Some(40.0),
            ..StyleConfig::new()
                .with_text(
                    Role::H2,
                    TextStyle {
                        font_size: Some(99.0),
                        ..TextStyle::default()
                    },
                )
                .with_text(
                    Role::Link,
                    TextStyle {
                        color: Some(Color::rgb(1, 2, 3)),
                        ..TextStyle::default()
                    },
                )
        }
    }

    #[rstest]
    #[case::primary(ThemeKind::Primary)]
    #[case::alternate(ThemeKind::Alternate)]
    fn override_fields_win_and_base_fields_survive(#[case] kind: ThemeKind) {
        let base = resolve_theme(kind, &AmbientTheme::dark(), TargetPlatform::Android);
        let over = sample_override();

        let merged = merge(&base, Some(&over));

        for role in Role::ALL {
            let expected = base.role(role).merge(over.role(role));
            assert_eq!(merged.role(role), &expected, "{role:?}");
        }
        assert_eq!(merged.role(Role::H2).text.font_size, Some(99.0));
        assert_eq!(merged.role(Role::H2).text.font_weight, base.role(Role::H2).text.font_weight);
        assert_eq!(merged.role(Role::Link).text.color, Some(Color::rgb(1, 2, 3)));
        assert_eq!(merged.role(Role::Link).text.decoration, base.role(Role::Link).text.decoration);
        assert_eq!(merged.list_indent, Some(40.0));
        assert_eq!(merged.block_spacing, base.block_spacing);
    }
}
