//! Linear constraint solver
//!
//! Equalities are solved exactly by Gaussian elimination with a deterministic
//! pivot order, so identical inputs always produce identical assignments.
//! Variables left free by the equalities take the canonical value 0; when the
//! system is underdetermined the earliest-registered variables are the ones
//! left free.
//!
//! Inequalities are checked against that canonical solution. If any is
//! violated the whole system is handed to the kasuari Cassowary solver with
//! every constraint required and a weak preference for the canonical values.

use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use kasuari::{
    Expression, Solver as KasuariSolver, Strength, Term, Variable as KasuariVariable,
    WeightedRelation::*,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Coefficients below this magnitude are treated as zero when pivoting
const PIVOT_EPSILON: f64 = 1e-9;

/// Residuals above this magnitude make an equality system inconsistent
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Properties that can be constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutProperty {
    X,
    Y,
    Width,
    Height,
    /// Spacing solved by a distribute relation with a total extent
    Gap,
}

impl LayoutProperty {
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Gap => "gap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "width" | "w" => Some(Self::Width),
            "height" | "h" => Some(Self::Height),
            "gap" => Some(Self::Gap),
            _ => None,
        }
    }
}

/// A variable in the constraint system, displayed as `"<element>.<property>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutVariable {
    pub element_id: String,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(element_id: impl Into<String>, property: LayoutProperty) -> Self {
        Self {
            element_id: element_id.into(),
            property,
        }
    }

    /// Create variable for element's X position
    pub fn x(element_id: impl Into<String>) -> Self {
        Self::new(element_id, LayoutProperty::X)
    }

    /// Create variable for element's Y position
    pub fn y(element_id: impl Into<String>) -> Self {
        Self::new(element_id, LayoutProperty::Y)
    }
}

impl fmt::Display for LayoutVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.element_id, self.property.name())
    }
}

/// `Σ coefficient·variable + constant`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    pub terms: Vec<(LayoutVariable, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: vec![],
            constant: value,
        }
    }

    pub fn variable(var: LayoutVariable) -> Self {
        Self::new().term(var, 1.0)
    }

    pub fn term(mut self, var: LayoutVariable, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn plus_constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    pub fn plus(mut self, other: LinearExpr) -> Self {
        self.terms.extend(other.terms);
        self.constant += other.constant;
        self
    }

    pub fn minus(self, other: LinearExpr) -> Self {
        self.plus(other.scaled(-1.0))
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        for (_, coefficient) in &mut self.terms {
            *coefficient *= factor;
        }
        self.constant *= factor;
        self
    }

    /// Evaluate against a partial assignment; missing variables count as 0
    pub fn evaluate(&self, values: &IndexMap<LayoutVariable, f64>) -> f64 {
        self.terms
            .iter()
            .map(|(var, c)| c * values.get(var).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (var, c) in &self.terms {
            let sign = if *c < 0.0 { "-" } else { "+" };
            let magnitude = c.abs();
            if first {
                if *c < 0.0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            if (magnitude - 1.0).abs() > f64::EPSILON {
                write!(f, "{}*", magnitude)?;
            }
            write!(f, "{}", var)?;
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            let sign = if self.constant < 0.0 { "-" } else { "+" };
            write!(f, " {} {}", sign, self.constant.abs())
        } else {
            Ok(())
        }
    }
}

/// Comparison of a linear expression against zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }
}

/// Origin of a constraint (for error messages)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOrigin {
    /// User wrote explicit constraint
    UserDefined,
    /// Generated by align, distribute, or connect
    Relational,
    /// Generated from declared positions
    Intrinsic,
}

impl fmt::Display for ConstraintOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserDefined => "user",
            Self::Relational => "relation",
            Self::Intrinsic => "position",
        })
    }
}

/// Tracks where a constraint came from
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSource {
    /// Human-readable description
    pub description: String,
    /// Origin type
    pub origin: ConstraintOrigin,
}

impl ConstraintSource {
    pub fn user(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            origin: ConstraintOrigin::UserDefined,
        }
    }

    pub fn relation(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            origin: ConstraintOrigin::Relational,
        }
    }

    pub fn intrinsic(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            origin: ConstraintOrigin::Intrinsic,
        }
    }
}

/// A constraint `expr <cmp> 0`
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConstraint {
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub source: ConstraintSource,
}

impl LayoutConstraint {
    /// `lhs = rhs`
    pub fn equal(lhs: LinearExpr, rhs: LinearExpr, source: ConstraintSource) -> Self {
        Self {
            expr: lhs.minus(rhs),
            comparison: Comparison::Equal,
            source,
        }
    }

    /// `lhs >= rhs`
    pub fn greater_or_equal(lhs: LinearExpr, rhs: LinearExpr, source: ConstraintSource) -> Self {
        Self {
            expr: lhs.minus(rhs),
            comparison: Comparison::GreaterOrEqual,
            source,
        }
    }

    /// `lhs <= rhs`
    pub fn less_or_equal(lhs: LinearExpr, rhs: LinearExpr, source: ConstraintSource) -> Self {
        Self {
            expr: lhs.minus(rhs),
            comparison: Comparison::LessOrEqual,
            source,
        }
    }

    /// `variable = value`
    pub fn fixed(var: LayoutVariable, value: f64, source: ConstraintSource) -> Self {
        Self::equal(
            LinearExpr::variable(var),
            LinearExpr::constant(value),
            source,
        )
    }

    fn is_satisfied_by(&self, values: &IndexMap<LayoutVariable, f64>) -> bool {
        let residual = self.expr.evaluate(values);
        match self.comparison {
            Comparison::Equal => residual.abs() <= RESIDUAL_TOLERANCE,
            Comparison::GreaterOrEqual => residual >= -RESIDUAL_TOLERANCE,
            Comparison::LessOrEqual => residual <= RESIDUAL_TOLERANCE,
        }
    }
}

impl fmt::Display for LayoutConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} 0, {})",
            self.source.description,
            self.expr,
            self.comparison.symbol(),
            self.source.origin
        )
    }
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    /// The constraints contradict each other
    #[error("inconsistent constraint system over {}: {}", .variables.join(", "), .constraints.join("; "))]
    Inconsistent {
        variables: Vec<String>,
        constraints: Vec<String>,
    },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Solution from the constraint solver, in variable registration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solution {
    pub values: IndexMap<LayoutVariable, f64>,
}

impl Solution {
    /// Get value for a variable
    pub fn get(&self, var: &LayoutVariable) -> Option<f64> {
        self.values.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LayoutVariable, f64)> {
        self.values.iter().map(|(var, value)| (var, *value))
    }
}

/// One row of the augmented equality matrix
#[derive(Debug, Clone)]
struct Row {
    coefficients: Vec<f64>,
    rhs: f64,
    /// Indices of the constraints combined into this row
    origin: Vec<usize>,
}

impl Row {
    fn absorb(&mut self, pivot: &Row, factor: f64) {
        for (c, p) in self.coefficients.iter_mut().zip(&pivot.coefficients) {
            *c -= factor * p;
        }
        self.rhs -= factor * pivot.rhs;
        for index in &pivot.origin {
            if !self.origin.contains(index) {
                self.origin.push(*index);
            }
        }
    }
}

/// Collects variables and constraints, then solves them in one shot
#[derive(Debug, Default)]
pub struct ConstraintSolver {
    variables: IndexSet<LayoutVariable>,
    constraints: Vec<LayoutConstraint>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable so it receives a value even if no constraint mentions it.
    ///
    /// Registration order decides which variables stay free in an
    /// underdetermined system: earlier ones are preferred.
    pub fn register(&mut self, var: LayoutVariable) -> usize {
        self.variables.insert_full(var).0
    }

    /// Add a constraint to the solver
    pub fn add_constraint(&mut self, constraint: LayoutConstraint) {
        for (var, _) in &constraint.expr.terms {
            self.register(var.clone());
        }
        self.constraints.push(constraint);
    }

    pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = LayoutConstraint>) {
        for constraint in constraints {
            self.add_constraint(constraint);
        }
    }

    pub fn constraints(&self) -> &[LayoutConstraint] {
        &self.constraints
    }

    /// Solve the constraint system
    pub fn solve(&self) -> Result<Solution, SolverError> {
        let canonical = self.solve_equalities()?;

        let violated = self
            .constraints
            .iter()
            .filter(|c| c.comparison != Comparison::Equal)
            .any(|c| !c.is_satisfied_by(&canonical));

        let values = if violated {
            debug!(
                constraints = self.constraints.len(),
                "canonical solution violates an inequality, falling back to cassowary"
            );
            self.solve_with_inequalities(&canonical)?
        } else {
            canonical
        };

        let solution = Solution { values };
        for (var, value) in solution.iter() {
            trace!(variable = %var, value, "solved");
        }
        Ok(solution)
    }

    fn solve_equalities(&self) -> Result<IndexMap<LayoutVariable, f64>, SolverError> {
        let n = self.variables.len();
        let mut rows: Vec<Row> = Vec::new();

        for (index, constraint) in self.constraints.iter().enumerate() {
            if constraint.comparison != Comparison::Equal {
                continue;
            }
            let mut coefficients = vec![0.0; n];
            for (var, c) in &constraint.expr.terms {
                if let Some(col) = self.variables.get_index_of(var) {
                    coefficients[col] += c;
                }
            }
            rows.push(Row {
                coefficients,
                rhs: -constraint.expr.constant,
                origin: vec![index],
            });
        }

        // Pivot on the most recently registered columns first so that the
        // earliest variables remain free and take the canonical value 0.
        let mut pivots: Vec<(usize, usize)> = Vec::new();
        let mut rank = 0;
        for col in (0..n).rev() {
            let mut best: Option<(usize, f64)> = None;
            for (r, row) in rows.iter().enumerate().skip(rank) {
                let magnitude = row.coefficients[col].abs();
                if magnitude > PIVOT_EPSILON && best.map_or(true, |(_, m)| magnitude > m) {
                    best = Some((r, magnitude));
                }
            }
            let Some((r, _)) = best else { continue };
            rows.swap(rank, r);

            let scale = rows[rank].coefficients[col];
            for c in &mut rows[rank].coefficients {
                *c /= scale;
            }
            rows[rank].rhs /= scale;

            let pivot = rows[rank].clone();
            for (other, row) in rows.iter_mut().enumerate() {
                if other == rank {
                    continue;
                }
                let factor = row.coefficients[col];
                if factor.abs() > PIVOT_EPSILON {
                    row.absorb(&pivot, factor);
                }
                row.coefficients[col] = 0.0;
            }
            pivots.push((rank, col));
            rank += 1;
        }

        if let Some(row) = rows
            .iter()
            .skip(rank)
            .find(|row| row.rhs.abs() > RESIDUAL_TOLERANCE)
        {
            return Err(self.inconsistency(&row.origin));
        }

        let mut values = vec![0.0; n];
        for (r, col) in pivots {
            values[col] = rows[r].rhs;
        }

        Ok(self
            .variables
            .iter()
            .cloned()
            .zip(values.into_iter().map(canonical_zero))
            .collect())
    }

    fn solve_with_inequalities(
        &self,
        canonical: &IndexMap<LayoutVariable, f64>,
    ) -> Result<IndexMap<LayoutVariable, f64>, SolverError> {
        let mut solver = KasuariSolver::new();
        let kvars: Vec<KasuariVariable> = self.variables.iter().map(|_| KasuariVariable::new()).collect();
        let lookup: HashMap<KasuariVariable, usize> =
            kvars.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        for (index, constraint) in self.constraints.iter().enumerate() {
            let terms = constraint
                .expr
                .terms
                .iter()
                .filter_map(|(var, c)| {
                    self.variables
                        .get_index_of(var)
                        .map(|col| Term::new(kvars[col], *c))
                })
                .collect();
            let expr = Expression::new(terms, constraint.expr.constant);
            let relation = match constraint.comparison {
                Comparison::Equal => expr | EQ(Strength::REQUIRED) | 0.0,
                Comparison::GreaterOrEqual => expr | GE(Strength::REQUIRED) | 0.0,
                Comparison::LessOrEqual => expr | LE(Strength::REQUIRED) | 0.0,
            };
            solver.add_constraint(relation).map_err(|e| match e {
                kasuari::AddConstraintError::UnsatisfiableConstraint => {
                    self.inconsistency(&(0..=index).collect::<Vec<_>>())
                }
                other => SolverError::Internal(format!("{}: {:?}", constraint, other)),
            })?;
        }

        for (col, var) in self.variables.iter().enumerate() {
            let preferred = canonical.get(var).copied().unwrap_or(0.0);
            solver
                .add_constraint(kvars[col] | EQ(Strength::WEAK) | preferred)
                .map_err(|e| SolverError::Internal(format!("preference for {}: {:?}", var, e)))?;
        }

        let mut values = vec![0.0; kvars.len()];
        for (kvar, value) in solver.fetch_changes() {
            if let Some(&col) = lookup.get(kvar) {
                values[col] = *value;
            }
        }

        Ok(self
            .variables
            .iter()
            .cloned()
            .zip(values.into_iter().map(canonical_zero))
            .collect())
    }

    /// Error naming the constraints combined into a contradictory row, in
    /// declaration order
    fn inconsistency(&self, origin: &[usize]) -> SolverError {
        let mut origin = origin.to_vec();
        origin.sort_unstable();
        origin.dedup();

        let mut involved: IndexSet<usize> = IndexSet::new();
        let mut constraints = Vec::new();
        for &index in &origin {
            let Some(constraint) = self.constraints.get(index) else {
                continue;
            };
            for (var, c) in &constraint.expr.terms {
                if c.abs() > PIVOT_EPSILON {
                    if let Some(col) = self.variables.get_index_of(var) {
                        involved.insert(col);
                    }
                }
            }
            constraints.push(constraint.to_string());
        }
        involved.sort();
        let variables = involved
            .iter()
            .filter_map(|&col| self.variables.get_index(col))
            .map(|var| var.to_string())
            .collect();
        SolverError::Inconsistent {
            variables,
            constraints,
        }
    }
}

/// Snap tiny residues and negative zero to 0.0 so output is reproducible
fn canonical_zero(value: f64) -> f64 {
    if value.abs() < PIVOT_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> LinearExpr {
        let (element, property) = name.split_once('.').unwrap();
        LinearExpr::variable(LayoutVariable::new(
            element,
            LayoutProperty::parse(property).unwrap(),
        ))
    }

    fn value(solution: &Solution, name: &str) -> f64 {
        let (element, property) = name.split_once('.').unwrap();
        solution
            .get(&LayoutVariable::new(
                element,
                LayoutProperty::parse(property).unwrap(),
            ))
            .unwrap()
    }

    #[test]
    fn test_fixed_constraint() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("box"),
            100.0,
            ConstraintSource::intrinsic("test"),
        ));

        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "box.x"), 100.0);
    }

    #[test]
    fn test_equal_constraint_leaves_earliest_variable_free() {
        let mut solver = ConstraintSolver::new();
        solver.register(LayoutVariable::x("a"));
        solver.register(LayoutVariable::x("b"));

        // b.x = a.x + 20
        solver.add_constraint(LayoutConstraint::equal(
            var("b.x"),
            var("a.x").plus_constant(20.0),
            ConstraintSource::relation("gap"),
        ));

        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "a.x"), 0.0);
        assert_eq!(value(&solution, "b.x"), 20.0);
    }

    #[test]
    fn test_midpoint_constraint() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            0.0,
            ConstraintSource::intrinsic("a"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("b"),
            100.0,
            ConstraintSource::intrinsic("b"),
        ));
        // 2 * mid.x = a.x + b.x
        solver.add_constraint(LayoutConstraint::equal(
            var("mid.x").scaled(2.0),
            var("a.x").plus(var("b.x")),
            ConstraintSource::relation("midpoint"),
        ));

        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "mid.x"), 50.0);
    }

    #[test]
    fn test_inconsistent_constraints_name_variables() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            5.0,
            ConstraintSource::user("first"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            6.0,
            ConstraintSource::user("second"),
        ));

        match solver.solve() {
            Err(SolverError::Inconsistent {
                variables,
                constraints,
            }) => {
                assert_eq!(variables, vec!["a.x".to_string()]);
                assert_eq!(constraints.len(), 2);
                assert!(constraints[0].contains("first"));
                assert!(constraints[1].contains("second"));
            }
            other => panic!("Expected Inconsistent error, got: {:?}", other),
        }
    }

    #[test]
    fn test_inconsistency_lists_constraints_in_declaration_order() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::equal(
            LinearExpr::variable(LayoutVariable::x("b")),
            LinearExpr::variable(LayoutVariable::x("a")).plus_constant(10.0),
            ConstraintSource::relation("one"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            0.0,
            ConstraintSource::user("two"),
        ));
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("b"),
            3.0,
            ConstraintSource::user("three"),
        ));

        match solver.solve() {
            Err(SolverError::Inconsistent { constraints, .. }) => {
                let order: Vec<usize> = ["one", "two", "three"]
                    .iter()
                    .filter_map(|label| constraints.iter().position(|c| c.starts_with(label)))
                    .collect();
                assert_eq!(order, vec![0, 1, 2], "{constraints:?}");
            }
            other => panic!("Expected Inconsistent error, got: {:?}", other),
        }
    }

    #[test]
    fn test_redundant_equalities_are_accepted() {
        let mut solver = ConstraintSolver::new();
        for _ in 0..2 {
            solver.add_constraint(LayoutConstraint::fixed(
                LayoutVariable::y("a"),
                7.0,
                ConstraintSource::user("same"),
            ));
        }
        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "a.y"), 7.0);
    }

    #[test]
    fn test_unconstrained_variable_is_canonical_across_runs() {
        let build = || {
            let mut solver = ConstraintSolver::new();
            solver.register(LayoutVariable::y("b"));
            solver.add_constraint(LayoutConstraint::fixed(
                LayoutVariable::x("a"),
                3.0,
                ConstraintSource::user("a"),
            ));
            solver.solve().unwrap()
        };

        let first = build();
        let second = build();
        assert_eq!(value(&first, "b.y"), 0.0);
        assert_eq!(first, second);
        assert_eq!(
            value(&first, "b.y").to_bits(),
            value(&second, "b.y").to_bits()
        );
    }

    #[test]
    fn test_complex_constraint_system() {
        let mut solver = ConstraintSolver::new();
        // a row of three boxes with widths 100, 80 and gaps of 20
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            10.0,
            ConstraintSource::intrinsic("a x position"),
        ));
        solver.add_constraint(LayoutConstraint::equal(
            var("b.x"),
            var("a.x").plus_constant(120.0),
            ConstraintSource::relation("row gap a-b"),
        ));
        solver.add_constraint(LayoutConstraint::equal(
            var("c.x"),
            var("b.x").plus_constant(100.0),
            ConstraintSource::relation("row gap b-c"),
        ));

        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "a.x"), 10.0);
        assert_eq!(value(&solution, "b.x"), 130.0);
        assert_eq!(value(&solution, "c.x"), 230.0);
    }

    #[test]
    fn test_satisfied_inequality_keeps_canonical_solution() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            80.0,
            ConstraintSource::user("a"),
        ));
        solver.add_constraint(LayoutConstraint::greater_or_equal(
            var("a.x"),
            LinearExpr::constant(50.0),
            ConstraintSource::user("a.x >= 50"),
        ));

        let solution = solver.solve().unwrap();
        assert_eq!(value(&solution, "a.x"), 80.0);
    }

    #[test]
    fn test_violated_inequality_is_repaired() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::greater_or_equal(
            var("box.width"),
            LinearExpr::constant(50.0),
            ConstraintSource::user("min width"),
        ));

        let solution = solver.solve().unwrap();
        assert!((value(&solution, "box.width") - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_conflicting_inequalities_error() {
        let mut solver = ConstraintSolver::new();
        solver.add_constraint(LayoutConstraint::greater_or_equal(
            var("box.x"),
            LinearExpr::constant(200.0),
            ConstraintSource::user("ge"),
        ));
        solver.add_constraint(LayoutConstraint::less_or_equal(
            var("box.x"),
            LinearExpr::constant(100.0),
            ConstraintSource::user("le"),
        ));

        match solver.solve() {
            Err(SolverError::Inconsistent { variables, .. }) => {
                assert_eq!(variables, vec!["box.x".to_string()]);
            }
            other => panic!("Expected Inconsistent error, got: {:?}", other),
        }
    }

    #[test]
    fn test_constraint_display_names_its_origin() {
        let constraint = LayoutConstraint::fixed(
            LayoutVariable::x("a"),
            5.0,
            ConstraintSource::intrinsic("a declared x"),
        );
        assert_eq!(constraint.to_string(), "a declared x (a.x - 5 = 0, position)");

        let constraint = LayoutConstraint::greater_or_equal(
            LinearExpr::variable(LayoutVariable::x("b")),
            LinearExpr::variable(LayoutVariable::x("a")),
            ConstraintSource::user("b after a"),
        );
        assert_eq!(constraint.to_string(), "b after a (b.x - a.x >= 0, user)");
    }

    #[test]
    fn test_expression_display() {
        let expr = var("b.x")
            .minus(var("a.x"))
            .plus(var("gap.gap").scaled(2.0))
            .plus_constant(-10.0);
        assert_eq!(expr.to_string(), "b.x - a.x + 2*gap.gap - 10");
    }
}
