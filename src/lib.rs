//! Trellis - declarative diagram layout with relational constraints
//!
//! Diagrams are trees of nodes that negotiate their sizes top-down and are
//! placed bottom-up. Groups position their members by solving the linear
//! constraints produced by align, distribute, connect and raw relations.
//! Scenes can be built with the [`layout::Node`] builder API or loaded from
//! TOML and rendered to SVG.
//!
//! # Example
//!
//! ```rust
//! use trellis::render;
//!
//! let svg = render(r#"
//! [root]
//! type = "row"
//! spacing = 10
//! children = [
//!   { type = "rect", name = "server", width = 40, height = 20 },
//!   { type = "rect", name = "client", width = 40, height = 20 },
//! ]
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains(r#"id="server""#));
//! ```

pub mod layout;
pub mod renderer;
pub mod scene;

pub use layout::{Diagram, LayoutConfig, LayoutError, Node, Reference, Relation, Scope};
pub use renderer::{render_svg, SvgConfig};
pub use scene::{Scene, SceneError};

use thiserror::Error;
use tracing::info;

use layout::{EstimatedTextMeasure, Resolved};

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while reading or converting the scene
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Log every node's resolved box at info level
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Render a TOML scene to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML scene to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use trellis::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_canvas_size(120.0, 80.0))
///     .with_svg(SvgConfig::default().with_pretty_print(false));
///
/// let svg = render_with_config("[root]\ntype = \"canvas\"", config).unwrap();
/// assert!(svg.contains(r#"viewBox="0 0 120 80""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let scene = Scene::parse(source)?;
    render_scene(&scene, config)
}

/// Render a parsed scene; its own width and height replace the
/// configured canvas dimensions.
pub fn render_scene(scene: &Scene, mut config: RenderConfig) -> Result<String, RenderError> {
    config.layout.canvas = scene.canvas(config.layout.canvas);
    let (root, scope) = scene.build()?;
    render_diagram(root, scope, &config)
}

/// Lay out, resolve and paint a node tree built with the builder API
pub fn render_diagram(
    root: Node,
    scope: Scope,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let diagram = resolve_diagram(root, scope, &config.layout)?;
    if config.debug {
        info!("layout tree:\n{}", diagram.debug_tree());
    }
    Ok(render_svg(&diagram, &config.svg))
}

/// Run every lifecycle phase with the default text measure
pub fn resolve_diagram(
    root: Node,
    scope: Scope,
    config: &LayoutConfig,
) -> Result<Diagram<Resolved>, LayoutError> {
    Ok(Diagram::declare(root, scope)?
        .layout(config, &EstimatedTextMeasure::default())?
        .resolve())
}
