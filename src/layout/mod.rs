//! Layout engine for computing node sizes and positions
//!
//! A declared [`Node`] tree is moved into a [`Diagram`], laid out by size
//! negotiation, and resolved into absolute geometry. Groups place their
//! members by solving the linear constraints their relations produce.

pub mod anchor;
pub mod config;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod measure;
pub mod node;
pub mod relations;
pub mod routing;
pub mod solver;
pub mod symbol;
pub mod tree;
pub mod types;

pub use anchor::Anchor;
pub use config::LayoutConfig;
pub use diagram::{Declared, Diagram, LaidOut, NodeView, Painter, Placed, Resolved};
pub use error::LayoutError;
pub use measure::{EstimatedTextMeasure, TextMeasure, TextMetrics};
pub use node::{HorizontalAlignment, Node, NodeKind, Sequence, Spacing, VerticalAlignment};
pub use relations::{Alignment, Connect, Direction, Distribute, LinearRelation, Relation};
pub use routing::ConnectorGeometry;
pub use solver::{ConstraintSolver, LayoutConstraint, LayoutProperty, LayoutVariable, SolverError};
pub use symbol::{Reference, Scope, Symbol};
pub use types::*;

use indexmap::IndexSet;

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

/// Names within `max_distance` edits of `target`, closest first, at most three
pub(crate) fn find_similar<'a>(
    defined: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = defined
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then(|| (name.to_string(), dist))
        })
        .collect();

    candidates.sort_by_key(|(_, d)| *d);
    candidates
        .into_iter()
        .map(|(name, _)| name)
        .collect::<IndexSet<_>>()
        .into_iter()
        .take(3)
        .collect()
}
