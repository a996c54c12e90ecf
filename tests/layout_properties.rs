//! Size negotiation properties checked through the public diagram API.
//! Each test lays out a small tree and inspects sizes and parent-relative
//! positions of named nodes.

use pretty_assertions::assert_eq;

use trellis::layout::{
    Diagram, EstimatedTextMeasure, FontStyle, HorizontalAlignment, Insets, LaidOut, LayoutConfig,
    LayoutError, Node, NodeKind, Point, Reference, Scope, Sequence, Size, SizeInterval,
    TextMeasure, TextMetrics, VerticalAlignment,
};

fn lay_out(root: Node, scope: Scope) -> Result<Diagram<LaidOut>, LayoutError> {
    lay_out_with(root, scope, &LayoutConfig::default())
}

fn lay_out_with(
    root: Node,
    scope: Scope,
    config: &LayoutConfig,
) -> Result<Diagram<LaidOut>, LayoutError> {
    Diagram::declare(root, scope)?.layout(config, &EstimatedTextMeasure::default())
}

fn size(diagram: &Diagram<LaidOut>, name: &str) -> Size {
    diagram.size(&Reference::name(name)).unwrap()
}

fn position(diagram: &Diagram<LaidOut>, name: &str) -> Point {
    diagram.local_position(&Reference::name(name)).unwrap()
}

/// Three named rects inside a sequence node named `seq`
fn sequence(scope: &mut Scope, build: impl FnOnce(Vec<Node>) -> Node) -> Node {
    let children = [("a", 10.0, 4.0), ("b", 20.0, 8.0), ("c", 30.0, 6.0)]
        .into_iter()
        .map(|(name, w, h)| Node::rect(w, h).named(scope.name(name).unwrap()))
        .collect();
    build(children).named(scope.name("seq").unwrap())
}

#[test]
fn test_leaf_reports_intrinsic_size() {
    let mut scope = Scope::new();
    let leaf = scope.name("leaf").unwrap();
    let circle = scope.name("dot").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::rect(40.0, 25.0).named(leaf), Node::circle(6.0).named(circle)]),
        scope,
    )
    .unwrap();
    assert_eq!(size(&diagram, "leaf"), Size::new(40.0, 25.0));
    assert_eq!(size(&diagram, "dot"), Size::new(12.0, 12.0));
}

#[test]
fn test_leaf_overflow_is_reported_unchanged() {
    let mut scope = Scope::new();
    let wide = scope.name("wide").unwrap();
    let config = LayoutConfig::new().with_canvas_size(100.0, 100.0);
    let diagram = lay_out_with(
        Node::canvas([Node::rect(600.0, 10.0).named(wide)]),
        scope,
        &config,
    )
    .unwrap();
    assert_eq!(size(&diagram, "wide"), Size::new(600.0, 10.0));
    assert_eq!(diagram.root_size(), Size::new(100.0, 100.0));
}

#[test]
fn test_path_size_is_point_extent() {
    let mut scope = Scope::new();
    let arrow = scope.name("arrow").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::path([
            Point::new(-5.0, 0.0),
            Point::new(15.0, 10.0),
            Point::new(-5.0, 20.0),
        ])
        .named(arrow)]),
        scope,
    )
    .unwrap();
    assert_eq!(size(&diagram, "arrow"), Size::new(20.0, 20.0));
}

#[test]
fn test_row_with_fixed_spacing() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| {
        Node::row(Sequence::spacing(5.0), children).valign(VerticalAlignment::Top)
    });
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();

    assert_eq!(size(&diagram, "seq"), Size::new(70.0, 8.0));
    assert_eq!(position(&diagram, "a"), Point::new(0.0, 0.0));
    assert_eq!(position(&diagram, "b"), Point::new(15.0, 0.0));
    assert_eq!(position(&diagram, "c"), Point::new(40.0, 0.0));
}

#[test]
fn test_row_with_total_width_round_trips() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| Node::row(Sequence::total(100.0), children));
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();

    // derived spacing (100 - 60) / 2 = 20
    assert_eq!(size(&diagram, "seq").width, 100.0);
    assert_eq!(position(&diagram, "b").x, 30.0);
    assert_eq!(position(&diagram, "c").x, 70.0);
}

#[test]
fn test_row_vertical_alignment() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| {
        Node::row(Sequence::spacing(0.0), children).valign(VerticalAlignment::Bottom)
    });
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();
    assert_eq!(position(&diagram, "a").y, 4.0);
    assert_eq!(position(&diagram, "b").y, 0.0);
    assert_eq!(position(&diagram, "c").y, 2.0);

    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| Node::row(Sequence::spacing(0.0), children));
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();
    assert_eq!(position(&diagram, "a").y, 2.0);
    assert_eq!(position(&diagram, "c").y, 1.0);
}

#[test]
fn test_single_child_row_with_total() {
    let mut scope = Scope::new();
    let only = scope.name("only").unwrap();
    let seq = scope.name("seq").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::row(Sequence::total(80.0), [Node::rect(20.0, 5.0).named(only)]).named(seq)]),
        scope,
    )
    .unwrap();
    assert_eq!(size(&diagram, "seq"), Size::new(80.0, 5.0));
    assert_eq!(position(&diagram, "only"), Point::new(0.0, 0.0));
}

#[test]
fn test_column_is_vertical_dual_of_row() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| {
        Node::column(Sequence::spacing(2.0), children).halign(HorizontalAlignment::Right)
    });
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();

    assert_eq!(size(&diagram, "seq"), Size::new(30.0, 22.0));
    assert_eq!(position(&diagram, "a"), Point::new(20.0, 0.0));
    assert_eq!(position(&diagram, "b"), Point::new(10.0, 6.0));
    assert_eq!(position(&diagram, "c"), Point::new(0.0, 16.0));
}

#[test]
fn test_column_with_total_height() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| {
        Node::column(Sequence::total(48.0), children).halign(HorizontalAlignment::Left)
    });
    let diagram = lay_out(Node::canvas([root]), scope).unwrap();

    // derived spacing (48 - 18) / 2 = 15
    assert_eq!(size(&diagram, "seq"), Size::new(30.0, 48.0));
    assert_eq!(position(&diagram, "b"), Point::new(0.0, 19.0));
    assert_eq!(position(&diagram, "c"), Point::new(0.0, 42.0));
}

#[test]
fn test_layout_is_idempotent() {
    let build = || {
        let mut scope = Scope::new();
        let root = sequence(&mut scope, |children| Node::row(Sequence::spacing(3.5), children));
        let diagram = lay_out(Node::canvas([root]), scope).unwrap();
        ["a", "b", "c", "seq"].map(|name| (size(&diagram, name), position(&diagram, name)))
    };
    assert_eq!(build(), build());
}

#[test]
fn test_padding_adds_insets() {
    let mut scope = Scope::new();
    let inner = scope.name("inner").unwrap();
    let pad = scope.name("pad").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::padding(4.0, Node::rect(10.0, 6.0).named(inner)).named(pad)]),
        scope,
    )
    .unwrap();
    assert_eq!(size(&diagram, "pad"), Size::new(18.0, 14.0));
    assert_eq!(position(&diagram, "inner"), Point::new(4.0, 4.0));
}

#[test]
fn test_asymmetric_padding() {
    let mut scope = Scope::new();
    let inner = scope.name("inner").unwrap();
    let pad = scope.name("pad").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::padding_insets(
            Insets::new(1.0, 2.0, 3.0, 4.0),
            Node::rect(10.0, 10.0).named(inner),
        )
        .named(pad)]),
        scope,
    )
    .unwrap();
    assert_eq!(size(&diagram, "pad"), Size::new(16.0, 14.0));
    assert_eq!(position(&diagram, "inner"), Point::new(4.0, 1.0));
}

#[test]
fn test_padding_requires_exactly_one_child() {
    let padding = Node::padding(2.0, Node::rect(1.0, 1.0)).with_child(Node::rect(1.0, 1.0));
    let err = lay_out(Node::canvas([padding]), Scope::new()).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidLayout { .. }));
}

#[test]
fn test_canvas_places_children_at_offsets() {
    let mut scope = Scope::new();
    let a = scope.name("a").unwrap();
    let b = scope.name("b").unwrap();
    let diagram = lay_out(
        Node::canvas([Node::rect(5.0, 5.0).named(a), Node::rect(5.0, 5.0).named(b).at(40.0, 12.5)]),
        scope,
    )
    .unwrap();
    assert_eq!(position(&diagram, "a"), Point::new(0.0, 0.0));
    assert_eq!(position(&diagram, "b"), Point::new(40.0, 12.5));
}

#[test]
fn test_canvas_requires_bounded_interval() {
    let config = LayoutConfig::new().with_canvas(SizeInterval::unbounded());
    let err = lay_out_with(Node::canvas([]), Scope::new(), &config).unwrap_err();
    assert!(matches!(err, LayoutError::UnderconstrainedLayout { .. }));
}

#[test]
fn test_sequence_without_spacing_is_malformed() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| Node::row(Sequence::default(), children));
    let err = lay_out(Node::canvas([root]), scope).unwrap_err();
    assert!(matches!(err, LayoutError::MalformedSequenceLayout { node } if node == "seq"));
}

#[test]
fn test_default_spacing_rescues_bare_sequence() {
    let mut scope = Scope::new();
    let root = sequence(&mut scope, |children| Node::column(Sequence::default(), children));
    let config = LayoutConfig::new().with_default_spacing(1.0);
    let diagram = lay_out_with(Node::canvas([root]), scope, &config).unwrap();
    assert_eq!(size(&diagram, "seq").height, 20.0);
}

#[test]
fn test_rect_missing_dimension_is_underconstrained() {
    let leaf = Node::new(NodeKind::Rect {
        width: Some(3.0),
        height: None,
    });
    let err = lay_out(Node::canvas([leaf]), Scope::new()).unwrap_err();
    assert!(matches!(err, LayoutError::UnderconstrainedLayout { .. }));
}

#[test]
fn test_empty_text_is_underconstrained() {
    let err = lay_out(Node::canvas([Node::text("")]), Scope::new()).unwrap_err();
    assert!(matches!(err, LayoutError::UnderconstrainedLayout { .. }));
}

/// Every string measures 7 per character, 10 tall
struct Monospace;

impl TextMeasure for Monospace {
    fn measure(&self, text: &str, font: &FontStyle) -> TextMetrics {
        TextMetrics {
            width: 7.0 * text.len() as f64,
            advance_height: 10.0 * font.size / 12.0,
            descent: 2.0,
        }
    }
}

#[test]
fn test_text_size_comes_from_measure() {
    let mut scope = Scope::new();
    let label = scope.name("label").unwrap();
    let big = scope.name("big").unwrap();
    let root = Node::canvas([
        Node::text("hello").named(label),
        Node::text_with_font("hi", FontStyle::new("serif", 24.0)).named(big),
    ]);
    let diagram = Diagram::declare(root, scope)
        .unwrap()
        .layout(&LayoutConfig::default(), &Monospace)
        .unwrap();
    assert_eq!(size(&diagram, "label"), Size::new(35.0, 10.0));
    assert_eq!(size(&diagram, "big"), Size::new(14.0, 20.0));
}
