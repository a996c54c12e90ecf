//! Relational operators and their translation into linear constraints
//!
//! Relations live on groups. Each reference in a relation resolves to a
//! [`Placement`]: the group member that contains the target, the target's
//! offset inside that member and its laid-out size. Member positions are
//! the only unknowns, so every coordinate is `member.x + offset + k·width`.

use std::fmt;

use super::anchor::Anchor;
use super::error::LayoutError;
use super::node::{Sequence, Spacing};
use super::solver::{
    Comparison, ConstraintSource, LayoutConstraint, LayoutProperty, LayoutVariable, LinearExpr,
};
use super::symbol::Reference;
use super::types::{Point, Size, Style};

/// Which edge or centre line an [`Relation::Align`] equates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontally,
    CenterVertically,
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Alignment {
    /// Fractions of width and height that are constrained; `None` leaves the axis free
    pub fn fractions(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Left => (Some(0.0), None),
            Self::Right => (Some(1.0), None),
            Self::CenterHorizontally => (Some(0.5), None),
            Self::Top => (None, Some(0.0)),
            Self::Bottom => (None, Some(1.0)),
            Self::CenterVertically => (None, Some(0.5)),
            Self::Center => (Some(0.5), Some(0.5)),
            Self::TopLeft => (Some(0.0), Some(0.0)),
            Self::TopRight => (Some(1.0), Some(0.0)),
            Self::BottomLeft => (Some(0.0), Some(1.0)),
            Self::BottomRight => (Some(1.0), Some(1.0)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::CenterHorizontally => "center-horizontally",
            Self::CenterVertically => "center-vertically",
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "center-horizontally" | "centerhorizontally" | "center-x" => {
                Some(Self::CenterHorizontally)
            }
            "center-vertically" | "centervertically" | "center-y" => Some(Self::CenterVertically),
            "center" => Some(Self::Center),
            "top-left" | "topleft" => Some(Self::TopLeft),
            "top-right" | "topright" => Some(Self::TopRight),
            "bottom-left" | "bottomleft" => Some(Self::BottomLeft),
            "bottom-right" | "bottomright" => Some(Self::BottomRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Evenly spaced placement of independently positioned nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Distribute {
    pub direction: Direction,
    pub sequence: Sequence,
    /// Lower bound on a solved gap
    pub min_spacing: Option<f64>,
    pub refs: Vec<Reference>,
}

/// A drawn connector, optionally with a label centred between its ends
#[derive(Debug, Clone, PartialEq)]
pub struct Connect {
    pub from: Reference,
    pub to: Reference,
    pub label: Option<Reference>,
    pub directed: bool,
    pub style: Style,
}

/// One `coefficient * reference.property` term of a raw constraint
#[derive(Debug, Clone, PartialEq)]
pub struct RawTerm {
    pub coefficient: f64,
    pub reference: Reference,
    pub property: LayoutProperty,
}

/// `Σ terms + constant <cmp> 0` written against node names
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRelation {
    pub terms: Vec<RawTerm>,
    pub constant: f64,
    pub comparison: Comparison,
    pub description: String,
}

const SPACING_HINT: &str = "operators must be surrounded by spaces";

/// The operator embedded in a token that should have been split on it.
///
/// Hyphens are legal inside names, so `-` only counts when it follows the
/// property (`a.x-5`).
fn glued_operator(token: &str) -> Option<&'static str> {
    ["<=", ">=", "==", "=", "<", ">", "+"]
        .into_iter()
        .find(|op| token.contains(op))
        .or_else(|| {
            token
                .rsplit_once('.')
                .filter(|(_, property)| property.contains('-'))
                .map(|_| "-")
        })
}

impl LinearRelation {
    /// Parse `lhs (=|>=|<=) rhs` where each side is a sum of numbers and
    /// `[coef*]reference.property` terms. Binary operators must be separated
    /// by whitespace because names may contain hyphens.
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let malformed = |reason: &str| LayoutError::invalid_layout(source, reason);
        let tokens: Vec<&str> = source.split_whitespace().collect();

        let comparisons: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(**t, "=" | "==" | ">=" | "<="))
            .map(|(i, _)| i)
            .collect();
        let [split] = comparisons[..] else {
            if let Some(token) = tokens.iter().find(|t| glued_operator(t).is_some()) {
                return Err(malformed(&format!(
                    "'{}' joins a comparison to its operand; {}",
                    token, SPACING_HINT
                )));
            }
            return Err(malformed("expected exactly one of =, >=, <="));
        };
        let comparison = match tokens[split] {
            ">=" => Comparison::GreaterOrEqual,
            "<=" => Comparison::LessOrEqual,
            _ => Comparison::Equal,
        };

        let (mut terms, lhs_constant) = parse_side(&tokens[..split], source)?;
        let (rhs_terms, rhs_constant) = parse_side(&tokens[split + 1..], source)?;
        terms.extend(rhs_terms.into_iter().map(|mut t| {
            t.coefficient = -t.coefficient;
            t
        }));

        Ok(Self {
            terms,
            constant: lhs_constant - rhs_constant,
            comparison,
            description: source.trim().to_string(),
        })
    }
}

fn parse_side(tokens: &[&str], source: &str) -> Result<(Vec<RawTerm>, f64), LayoutError> {
    let malformed = |reason: String| LayoutError::invalid_layout(source, reason);
    if tokens.is_empty() {
        return Err(malformed("empty side of constraint".to_string()));
    }

    let mut terms = Vec::new();
    let mut constant = 0.0;
    let mut sign = 1.0;
    let mut expect_term = true;
    for (position, token) in tokens.iter().enumerate() {
        match *token {
            "+" | "-" if !expect_term || position == 0 => {
                sign = if *token == "-" { -1.0 } else { 1.0 };
                expect_term = true;
            }
            "+" | "-" => {
                return Err(malformed(format!(
                    "'{}' follows another operator; {} and signed numbers are written like -5",
                    token, SPACING_HINT
                )))
            }
            _ if expect_term => {
                if let Ok(number) = token.parse::<f64>() {
                    constant += sign * number;
                } else {
                    if let Some(op) = glued_operator(token) {
                        return Err(malformed(format!(
                            "'{}' contains '{}'; {}",
                            token, op, SPACING_HINT
                        )));
                    }
                    let (coefficient, rest) = match token.split_once('*') {
                        Some((c, rest)) => (
                            c.parse::<f64>()
                                .map_err(|_| malformed(format!("bad coefficient '{}'", c)))?,
                            rest,
                        ),
                        None => (1.0, *token),
                    };
                    let (reference, property) = rest
                        .rsplit_once('.')
                        .ok_or_else(|| malformed(format!("'{}' has no property", rest)))?;
                    let property = LayoutProperty::parse(property)
                        .ok_or_else(|| malformed(format!("unknown property '{}'", property)))?;
                    terms.push(RawTerm {
                        coefficient: sign * coefficient,
                        reference: Reference::parse(reference)?,
                        property,
                    });
                }
                sign = 1.0;
                expect_term = false;
            }
            other => {
                return Err(malformed(format!(
                    "expected an operator before '{}'; {}",
                    other, SPACING_HINT
                )))
            }
        }
    }
    if expect_term {
        return Err(malformed("dangling operator".to_string()));
    }
    Ok((terms, constant))
}

/// A relation declared on a group
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    Align {
        alignment: Alignment,
        refs: Vec<Reference>,
    },
    Distribute(Distribute),
    Connect(Connect),
    Constrain(LinearRelation),
}

impl Relation {
    pub fn align<R: Into<Reference>>(
        alignment: Alignment,
        refs: impl IntoIterator<Item = R>,
    ) -> Self {
        Self::Align {
            alignment,
            refs: refs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn distribute<R: Into<Reference>>(
        direction: Direction,
        sequence: Sequence,
        refs: impl IntoIterator<Item = R>,
    ) -> Self {
        Self::Distribute(Distribute {
            direction,
            sequence,
            min_spacing: None,
            refs: refs.into_iter().map(Into::into).collect(),
        })
    }

    pub fn connect(from: impl Into<Reference>, to: impl Into<Reference>) -> Self {
        Self::Connect(Connect {
            from: from.into(),
            to: to.into(),
            label: None,
            directed: true,
            style: Style::default(),
        })
    }

    pub fn connect_labeled(
        from: impl Into<Reference>,
        to: impl Into<Reference>,
        label: impl Into<Reference>,
    ) -> Self {
        Self::Connect(Connect {
            from: from.into(),
            to: to.into(),
            label: Some(label.into()),
            directed: true,
            style: Style::default(),
        })
    }

    pub fn constrain(source: &str) -> Result<Self, LayoutError> {
        LinearRelation::parse(source).map(Self::Constrain)
    }

    /// Every reference the relation names, in declaration order
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            Self::Align { refs, .. } => refs.iter().collect(),
            Self::Distribute(d) => d.refs.iter().collect(),
            Self::Connect(c) => std::iter::once(&c.from)
                .chain(std::iter::once(&c.to))
                .chain(c.label.iter())
                .collect(),
            Self::Constrain(raw) => raw.terms.iter().map(|t| &t.reference).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Align { .. } => "align",
            Self::Distribute(_) => "distribute",
            Self::Connect(_) => "connect",
            Self::Constrain(_) => "constrain",
        }
    }

    /// Translate into constraints over member position variables.
    ///
    /// `group` and `index` identify the relation for extra variables and
    /// error messages.
    pub fn constraints(
        &self,
        group: &str,
        index: usize,
        resolver: &impl PlacementResolver,
    ) -> Result<Vec<LayoutConstraint>, LayoutError> {
        let label = format!("{} {}#{}", group, self.kind(), index);
        match self {
            Self::Align { alignment, refs } => {
                let placements = resolve_all(refs, resolver)?;
                Ok(align_constraints(*alignment, &placements, &label))
            }
            Self::Distribute(distribute) => {
                let placements = resolve_all(&distribute.refs, resolver)?;
                distribute_constraints(distribute, &placements, &label)
            }
            Self::Connect(connect) => {
                let Some(label_ref) = &connect.label else {
                    return Ok(vec![]);
                };
                let from = resolver.placement(&connect.from)?;
                let to = resolver.placement(&connect.to)?;
                let text = resolver.placement(label_ref)?;
                Ok(midpoint_constraints(&text, &from, &to, &label))
            }
            Self::Constrain(raw) => raw_constraint(raw, resolver).map(|c| vec![c]),
        }
    }
}

/// Geometry of a reference target relative to the group member containing it
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Variable prefix of the containing member
    pub member: String,
    /// Target origin relative to the member origin
    pub offset: Point,
    pub size: Size,
    /// Anchor written on the reference
    pub explicit: Option<Anchor>,
    /// Guide anchor declared on the target node
    pub guide: Option<Anchor>,
}

impl Placement {
    /// Explicit anchor, falling back to the node's guide
    pub fn anchor(&self) -> Option<Anchor> {
        self.explicit.or(self.guide)
    }

    /// `member.x + offset.x + fraction * width`
    pub fn x_at(&self, fraction: f64) -> LinearExpr {
        LinearExpr::variable(LayoutVariable::x(&self.member))
            .plus_constant(self.offset.x + fraction * self.size.width)
    }

    /// `member.y + offset.y + fraction * height`
    pub fn y_at(&self, fraction: f64) -> LinearExpr {
        LinearExpr::variable(LayoutVariable::y(&self.member))
            .plus_constant(self.offset.y + fraction * self.size.height)
    }

    fn point(&self, default: Anchor) -> (LinearExpr, LinearExpr) {
        let (fx, fy) = self.anchor().unwrap_or(default).fractions();
        (self.x_at(fx), self.y_at(fy))
    }
}

/// Resolves references to member-relative geometry once members are sized
pub trait PlacementResolver {
    fn placement(&self, reference: &Reference) -> Result<Placement, LayoutError>;
}

fn resolve_all(
    refs: &[Reference],
    resolver: &impl PlacementResolver,
) -> Result<Vec<Placement>, LayoutError> {
    refs.iter().map(|r| resolver.placement(r)).collect()
}

fn align_constraints(
    alignment: Alignment,
    placements: &[Placement],
    label: &str,
) -> Vec<LayoutConstraint> {
    let Some((first, rest)) = placements.split_first() else {
        return vec![];
    };
    let (fx, fy) = alignment.fractions();
    let anchored = |p: &Placement| p.anchor().map(|a| a.fractions());

    let mut constraints = Vec::new();
    if let Some(fx) = fx {
        let x = |p: &Placement| p.x_at(anchored(p).map_or(fx, |(ax, _)| ax));
        for other in rest {
            constraints.push(LayoutConstraint::equal(
                x(other),
                x(first),
                ConstraintSource::relation(format!("{} ({})", label, alignment.name())),
            ));
        }
    }
    if let Some(fy) = fy {
        let y = |p: &Placement| p.y_at(anchored(p).map_or(fy, |(_, ay)| ay));
        for other in rest {
            constraints.push(LayoutConstraint::equal(
                y(other),
                y(first),
                ConstraintSource::relation(format!("{} ({})", label, alignment.name())),
            ));
        }
    }
    constraints
}

fn distribute_constraints(
    distribute: &Distribute,
    placements: &[Placement],
    label: &str,
) -> Result<Vec<LayoutConstraint>, LayoutError> {
    let Some(mode) = distribute.sequence.mode() else {
        return Err(LayoutError::malformed_sequence(label));
    };
    if placements.len() < 2 {
        return Ok(vec![]);
    }

    let leading = |p: &Placement| match distribute.direction {
        Direction::Horizontal => p.x_at(0.0),
        Direction::Vertical => p.y_at(0.0),
    };
    let trailing = |p: &Placement| match distribute.direction {
        Direction::Horizontal => p.x_at(1.0),
        Direction::Vertical => p.y_at(1.0),
    };

    let mut constraints = Vec::new();
    let gap = match mode {
        Spacing::Fixed(spacing) => LinearExpr::constant(spacing),
        Spacing::Total(total) => {
            let gap = LayoutVariable::new(label.replace(' ', "/"), LayoutProperty::Gap);
            let (first, last) = (&placements[0], &placements[placements.len() - 1]);
            constraints.push(LayoutConstraint::equal(
                trailing(last).minus(leading(first)),
                LinearExpr::constant(total),
                ConstraintSource::relation(format!("{} total extent {}", label, total)),
            ));
            if let Some(min) = distribute.min_spacing {
                constraints.push(LayoutConstraint::greater_or_equal(
                    LinearExpr::variable(gap.clone()),
                    LinearExpr::constant(min),
                    ConstraintSource::relation(format!("{} minimum spacing {}", label, min)),
                ));
            }
            LinearExpr::variable(gap)
        }
    };

    for pair in placements.windows(2) {
        constraints.push(LayoutConstraint::equal(
            leading(&pair[1]),
            trailing(&pair[0]).plus(gap.clone()),
            ConstraintSource::relation(format!("{} spacing", label)),
        ));
    }
    Ok(constraints)
}

fn midpoint_constraints(
    text: &Placement,
    from: &Placement,
    to: &Placement,
    label: &str,
) -> Vec<LayoutConstraint> {
    let (lx, ly) = text.point(Anchor::Center);
    let (fx, fy) = from.point(Anchor::Center);
    let (tx, ty) = to.point(Anchor::Center);
    vec![
        LayoutConstraint::equal(
            lx.scaled(2.0),
            fx.plus(tx),
            ConstraintSource::relation(format!("{} label midpoint x", label)),
        ),
        LayoutConstraint::equal(
            ly.scaled(2.0),
            fy.plus(ty),
            ConstraintSource::relation(format!("{} label midpoint y", label)),
        ),
    ]
}

fn raw_constraint(
    raw: &LinearRelation,
    resolver: &impl PlacementResolver,
) -> Result<LayoutConstraint, LayoutError> {
    let mut expr = LinearExpr::constant(raw.constant);
    for term in &raw.terms {
        let placement = resolver.placement(&term.reference)?;
        let fractions = placement.explicit.map(|a| a.fractions());
        let value = match term.property {
            LayoutProperty::X => placement.x_at(fractions.map_or(0.0, |(fx, _)| fx)),
            LayoutProperty::Y => placement.y_at(fractions.map_or(0.0, |(_, fy)| fy)),
            LayoutProperty::Width => LinearExpr::constant(placement.size.width),
            LayoutProperty::Height => LinearExpr::constant(placement.size.height),
            LayoutProperty::Gap => {
                return Err(LayoutError::invalid_layout(
                    &raw.description,
                    "gap is not a node property",
                ))
            }
        };
        expr = expr.plus(value.scaled(term.coefficient));
    }
    Ok(LayoutConstraint {
        expr,
        comparison: raw.comparison,
        source: ConstraintSource::user(raw.description.clone()),
    })
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Align { alignment, refs } => {
                write!(f, "align {} ({} refs)", alignment.name(), refs.len())
            }
            Self::Distribute(d) => {
                let direction = match d.direction {
                    Direction::Horizontal => "horizontally",
                    Direction::Vertical => "vertically",
                };
                write!(f, "distribute {} ({} refs)", direction, d.refs.len())
            }
            Self::Connect(_) => write!(f, "connect"),
            Self::Constrain(raw) => write!(f, "constrain {}", raw.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::layout::solver::ConstraintSolver;
    use crate::layout::symbol::RefRoot;

    /// Each named reference is its own member with a fixed size
    struct Boxes(HashMap<&'static str, Size>);

    impl PlacementResolver for Boxes {
        fn placement(&self, reference: &Reference) -> Result<Placement, LayoutError> {
            let RefRoot::Name(name) = &reference.root else {
                panic!("test references are by name");
            };
            let size = self
                .0
                .get(name.as_str())
                .copied()
                .ok_or_else(|| LayoutError::unresolvable(name, vec![]))?;
            Ok(Placement {
                member: name.clone(),
                offset: Point::default(),
                size,
                explicit: reference.anchor,
                guide: None,
            })
        }
    }

    fn boxes(entries: &[(&'static str, f64, f64)]) -> Boxes {
        Boxes(
            entries
                .iter()
                .map(|(n, w, h)| (*n, Size::new(*w, *h)))
                .collect(),
        )
    }

    fn solve(relation: &Relation, resolver: &Boxes) -> crate::layout::solver::Solution {
        let mut solver = ConstraintSolver::new();
        let mut names: Vec<_> = resolver.0.keys().copied().collect();
        names.sort();
        for name in names {
            solver.register(LayoutVariable::x(name));
            solver.register(LayoutVariable::y(name));
        }
        solver.add_constraints(relation.constraints("g", 0, resolver).unwrap());
        solver.solve().unwrap()
    }

    #[test]
    fn test_align_center_horizontally() {
        let resolver = boxes(&[("a", 100.0, 10.0), ("b", 40.0, 10.0)]);
        let relation = Relation::align(
            Alignment::CenterHorizontally,
            [Reference::name("a"), Reference::name("b")],
        );
        let solution = solve(&relation, &resolver);
        let ax = solution.get(&LayoutVariable::x("a")).unwrap();
        let bx = solution.get(&LayoutVariable::x("b")).unwrap();
        assert_eq!(ax + 50.0, bx + 20.0);
    }

    #[test]
    fn test_align_uses_explicit_anchor() {
        let resolver = boxes(&[("a", 100.0, 10.0), ("b", 40.0, 10.0)]);
        let relation = Relation::align(
            Alignment::Left,
            [
                Reference::name("a").at(Anchor::CenterRight),
                Reference::name("b"),
            ],
        );
        let solution = solve(&relation, &resolver);
        let ax = solution.get(&LayoutVariable::x("a")).unwrap();
        let bx = solution.get(&LayoutVariable::x("b")).unwrap();
        assert_eq!(ax + 100.0, bx);
    }

    #[test]
    fn test_distribute_total_solves_gap() {
        let resolver = boxes(&[("a", 30.0, 10.0), ("b", 50.0, 10.0)]);
        let relation = Relation::distribute(
            Direction::Horizontal,
            Sequence::total(200.0),
            [Reference::name("a"), Reference::name("b")],
        );
        let solution = solve(&relation, &resolver);
        let ax = solution.get(&LayoutVariable::x("a")).unwrap();
        let bx = solution.get(&LayoutVariable::x("b")).unwrap();
        let gap = solution
            .get(&LayoutVariable::new("g/distribute#0", LayoutProperty::Gap))
            .unwrap();
        assert_eq!(gap, 200.0 - 30.0 - 50.0);
        assert_eq!(bx, ax + 30.0 + gap);
    }

    #[test]
    fn test_distribute_without_spacing_is_malformed() {
        let resolver = boxes(&[("a", 30.0, 10.0)]);
        let relation = Relation::distribute(
            Direction::Vertical,
            Sequence::default(),
            [Reference::name("a")],
        );
        assert!(matches!(
            relation.constraints("g", 3, &resolver),
            Err(LayoutError::MalformedSequenceLayout { .. })
        ));
    }

    #[test]
    fn test_connect_without_label_adds_nothing() {
        let resolver = boxes(&[("a", 10.0, 10.0), ("b", 10.0, 10.0)]);
        let relation = Relation::connect(Reference::name("a"), Reference::name("b"));
        assert!(relation.constraints("g", 0, &resolver).unwrap().is_empty());
    }

    #[test]
    fn test_connect_label_sits_on_midpoint() {
        let resolver = boxes(&[("a", 10.0, 10.0), ("b", 10.0, 10.0), ("t", 20.0, 6.0)]);
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            0.0,
            ConstraintSource::user("a.x"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::y("a"),
            0.0,
            ConstraintSource::user("a.y"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("b"),
            100.0,
            ConstraintSource::user("b.x"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::y("b"),
            40.0,
            ConstraintSource::user("b.y"),
        ));
        let relation = Relation::connect_labeled(
            Reference::name("a"),
            Reference::name("b"),
            Reference::name("t"),
        );
        solver.add_constraints(relation.constraints("g", 0, &resolver).unwrap());
        let solution = solver.solve().unwrap();

        // centres: a (5, 5), b (105, 45), midpoint (55, 25)
        assert_eq!(solution.get(&LayoutVariable::x("t")).unwrap() + 10.0, 55.0);
        assert_eq!(solution.get(&LayoutVariable::y("t")).unwrap() + 3.0, 25.0);
    }

    #[test]
    fn test_parse_raw_constraint() {
        let raw = LinearRelation::parse("b.x = a.x + a.width + 10").unwrap();
        assert_eq!(raw.comparison, Comparison::Equal);
        assert_eq!(raw.constant, -10.0);
        let coefficients: Vec<f64> = raw.terms.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![1.0, -1.0, -1.0]);
        assert_eq!(raw.terms[2].property, LayoutProperty::Width);
    }

    #[test]
    fn test_parse_raw_constraint_with_hyphenated_names() {
        let raw = LinearRelation::parse("dots.dot-1.y >= 2*dots.dot-0.y - 5").unwrap();
        assert_eq!(raw.comparison, Comparison::GreaterOrEqual);
        assert_eq!(raw.terms[1].coefficient, -2.0);
        assert_eq!(raw.constant, 5.0);
    }

    #[test]
    fn test_parse_raw_constraint_errors() {
        assert!(LinearRelation::parse("a.x + b.x").is_err());
        assert!(LinearRelation::parse("a.x = b.x +").is_err());
        assert!(LinearRelation::parse("a.x = = b.x").is_err());
        assert!(LinearRelation::parse("a.depth = 3").is_err());
    }

    fn parse_error(source: &str) -> String {
        match LinearRelation::parse(source) {
            Err(err) => err.to_string(),
            Ok(raw) => panic!("'{}' parsed as {:?}", source, raw),
        }
    }

    #[test]
    fn test_unspaced_operators_are_reported() {
        for source in ["a.x=5", "a.x>=b.x", "a.x = b.x+5", "a.x = b.x-5", "a.x = b.x +5"] {
            let message = parse_error(source);
            assert!(
                message.contains("operators must be surrounded by spaces"),
                "{}: {}",
                source,
                message
            );
        }
        assert!(parse_error("a.x = b.x + - 5").contains("follows another operator"));
        assert!(parse_error("a.x = b.x+5").contains("'b.x+5' contains '+'"));
    }

    #[test]
    fn test_relation_display_summarises_kind() {
        let align = Relation::align(Alignment::Left, [Reference::name("a"), Reference::name("b")]);
        assert_eq!(align.to_string(), "align left (2 refs)");

        let distribute = Relation::distribute(
            Direction::Vertical,
            Sequence::spacing(4.0),
            [Reference::name("a")],
        );
        assert_eq!(distribute.to_string(), "distribute vertically (1 refs)");

        let constrain = Relation::constrain(" a.x = 5 ").unwrap();
        assert_eq!(constrain.to_string(), "constrain a.x = 5");
    }

    #[test]
    fn test_leading_sign_applies_to_first_term() {
        let raw = LinearRelation::parse("a.x = - 5").unwrap();
        assert_eq!(raw.constant, 5.0);

        let raw = LinearRelation::parse("- a.x >= -2*b.x").unwrap();
        let coefficients: Vec<f64> = raw.terms.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![-1.0, 2.0]);
    }

    #[test]
    fn test_raw_constraint_uses_sizes_as_constants() {
        let resolver = boxes(&[("a", 30.0, 10.0), ("b", 50.0, 10.0)]);
        let relation = Relation::constrain("b.x = a.x + a.width + 10").unwrap();
        let solution = solve(&relation, &resolver);
        let ax = solution.get(&LayoutVariable::x("a")).unwrap();
        let bx = solution.get(&LayoutVariable::x("b")).unwrap();
        assert_eq!(bx - ax, 40.0);
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::parse("centerHorizontally"), Some(Alignment::CenterHorizontally));
        assert_eq!(Alignment::parse("bottom_right"), Some(Alignment::BottomRight));
        assert_eq!(Alignment::parse("diagonal"), None);
    }
}
