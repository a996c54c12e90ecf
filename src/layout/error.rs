//! Error types for the layout engine

use thiserror::Error;

use super::solver::SolverError;

/// Errors that can occur while declaring, laying out, or resolving a diagram.
///
/// Every error is fatal for the run: no partial geometry is produced.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A reference names a symbol that was never registered or never bound
    #[error("unresolvable name '{name}'{}", format_suggestions(.suggestions))]
    UnresolvableName {
        name: String,
        suggestions: Vec<String>,
    },

    /// A literal name was registered twice, or one symbol was bound to two nodes
    #[error("name collision: '{name}' is already registered")]
    NameCollision { name: String },

    /// A leaf cannot determine its intrinsic size
    #[error("underconstrained layout for '{node}': {reason}")]
    UnderconstrainedLayout { node: String, reason: String },

    /// A row, column, or distribute relation given neither spacing nor total extent
    #[error("malformed sequence layout for '{node}': needs either spacing or a total extent")]
    MalformedSequenceLayout { node: String },

    /// Structural misuse of a container
    #[error("invalid layout for '{node}': {reason}")]
    InvalidLayout { node: String, reason: String },

    /// A relation inside a group names a node outside the group's subtree
    #[error("'{name}' is not inside group '{group}'")]
    ReferenceOutsideGroup { name: String, group: String },

    /// A literal name that references or solver keys cannot carry
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Unknown anchor in a reference
    #[error("invalid anchor '{anchor}' (valid anchors: {valid})")]
    InvalidAnchor { anchor: String, valid: String },

    /// Constraint solver error, including inconsistent constraint systems
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

impl LayoutError {
    /// Create an unresolvable name error with suggestions
    pub fn unresolvable(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnresolvableName {
            name: name.into(),
            suggestions,
        }
    }

    pub fn collision(name: impl Into<String>) -> Self {
        Self::NameCollision { name: name.into() }
    }

    pub fn underconstrained(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnderconstrainedLayout {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_sequence(node: impl Into<String>) -> Self {
        Self::MalformedSequenceLayout { node: node.into() }
    }

    /// Create an invalid layout error
    pub fn invalid_layout(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn outside_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::ReferenceOutsideGroup {
            name: name.into(),
            group: group.into(),
        }
    }

    pub fn invalid_anchor(anchor: impl Into<String>, valid: Vec<&str>) -> Self {
        Self::InvalidAnchor {
            anchor: anchor.into(),
            valid: valid.join(", "),
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnresolvableName { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }

    /// Variables named by an inconsistent constraint system
    pub fn offending_variables(&self) -> Option<&[String]> {
        match self {
            Self::Solver(SolverError::Inconsistent { variables, .. }) => Some(variables),
            _ => None,
        }
    }
}
