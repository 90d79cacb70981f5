//! # kc-graph — Knowledge Component Descendance Graphs
//!
//! Turns tabular prerequisite data about Knowledge Components (KCs) into a
//! directed acyclic *descendance graph*, lays it out deterministically in 2-D,
//! and extracts single-hop neighborhoods around chosen KCs.
//!
//! ## Design Principles
//!
//! 1. **Pure core**: every stage is a function of its input; nothing is cached
//! 2. **Clean DTOs**: `KcRecord`, `KcNode`, `Edge`, `Position` cross all stages
//! 3. **Degrade, don't fail**: bad rows and unresolved tokens become warnings
//! 4. **Deterministic layout**: same IDs and edges, same coordinates
//!
//! ## Quick Start
//!
//! ```rust
//! use kc_graph::{KcGraph, KcRecord};
//!
//! # fn example() -> kc_graph::Result<()> {
//! let records = vec![
//!     KcRecord::new("KC-A", "1"),
//!     KcRecord::new("KC-B", "2").with_antecedents("1"),
//! ];
//! let kc = KcGraph::from_records(&records);
//!
//! let view = kc.overview()?;
//! assert_eq!(view.layout.layer_of("KC-B"), Some(1));
//!
//! let hood = kc.neighborhood(["2"])?;
//! assert_eq!(hood.title, "Neighborhood of KC 2");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Build | `graph::builder` | graph, resolver, warnings |
//! | Filter / classify | `graph::classify` | graph without isolated KCs, roles |
//! | Layout | `layout` | position map, layers, sibling groups |
//! | Neighborhood | `neighborhood` | induced subgraph around focal KCs |
//! | Export | `export` | JSON render document |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod resolve;
pub mod graph;
pub mod layout;
pub mod neighborhood;
pub mod stats;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{KcRecord, KcNode, Edge, NodeKind, Position, PositionMap};

// ============================================================================
// Re-exports: Graph construction and analysis
// ============================================================================

pub use resolve::{IdentifierResolver, Resolution, parse_identifier_list};
pub use graph::{
    DescendanceGraph, GraphBuilder, BuildOutput, BuildWarning,
    Classification, Filtered, filter_isolated,
    find_cycle, is_acyclic, topological_order,
};

// ============================================================================
// Re-exports: Layout, neighborhoods, output
// ============================================================================

pub use layout::{LayeredLayoutEngine, Layout, LayoutConfig, SiblingGroup, Spacing, assign_layers};
pub use neighborhood::{Neighborhood, NeighborhoodExtractor};
pub use stats::GraphStats;
pub use export::RenderDocument;

// ============================================================================
// Top-level KcGraph handle
// ============================================================================

/// Title used for the full-graph view.
pub const OVERVIEW_TITLE: &str = "Descendance Graph: KC Relationships";

/// The primary entry point. A `KcGraph` owns one built descendance graph
/// together with its identifier maps and produces views of it.
#[derive(Debug, Clone)]
pub struct KcGraph {
    graph: DescendanceGraph,
    resolver: IdentifierResolver,
    warnings: Vec<BuildWarning>,
    engine: LayeredLayoutEngine,
}

/// A graph ready for drawing: filtered, classified, laid out.
#[derive(Debug, Clone)]
pub struct GraphView {
    pub title: String,
    pub graph: DescendanceGraph,
    /// KCs dropped for having neither antecedents nor descendants.
    pub removed_isolated: Vec<String>,
    pub classification: Classification,
    pub layout: Layout,
    pub stats: GraphStats,
    /// Focal KC IDs for a neighborhood view; empty for the overview.
    pub focal: Vec<String>,
}

impl GraphView {
    pub fn render_document(&self) -> RenderDocument {
        RenderDocument::from_view(self)
    }
}

impl KcGraph {
    /// Build from parsed records with the default layout configuration.
    pub fn from_records(records: &[KcRecord]) -> Self {
        Self::from_build(GraphBuilder::build(records))
    }

    pub fn from_build(output: BuildOutput) -> Self {
        let BuildOutput { graph, resolver, warnings } = output;
        Self {
            graph,
            resolver,
            warnings,
            engine: LayeredLayoutEngine::default(),
        }
    }

    /// Replace the layout configuration.
    pub fn with_layout_config(mut self, config: LayoutConfig) -> Result<Self> {
        self.engine = LayeredLayoutEngine::new(config)?;
        Ok(self)
    }

    pub fn graph(&self) -> &DescendanceGraph {
        &self.graph
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Warnings collected while building.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Resolve a Number or ID to a node ID.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.resolver.resolve(token)
    }

    /// The whole graph, minus isolated KCs.
    pub fn overview(&self) -> Result<GraphView> {
        self.view(&self.graph, OVERVIEW_TITLE.to_string(), Vec::new())
    }

    /// The neighborhood of the KCs named by `identifiers` (Numbers or IDs).
    ///
    /// Unresolvable identifiers are skipped with a warning. Fails when none
    /// resolve or the neighborhood ends up empty.
    pub fn neighborhood<I, S>(&self, identifiers: I) -> Result<GraphView>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = identifiers
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .collect();
        let resolution = self.resolver.resolve_all(&tokens);
        if resolution.is_empty() {
            return Err(Error::NoFocalResolved { tokens });
        }

        let hood = NeighborhoodExtractor::extract(&self.graph, &resolution.resolved);
        if hood.is_empty() {
            return Err(Error::EmptyNeighborhood);
        }
        tracing::info!(
            nodes = hood.graph.node_count(),
            edges = hood.graph.edge_count(),
            missing = hood.missing.len(),
            "neighborhood extracted"
        );

        let title = hood.title();
        let Neighborhood { graph, focal, .. } = hood;
        self.view(&graph, title, focal)
    }

    /// Neighborhood from a comma-separated list such as `"1.1, 1.2"`.
    pub fn neighborhood_of_list(&self, input: &str) -> Result<GraphView> {
        self.neighborhood(parse_identifier_list(input))
    }

    fn view(&self, graph: &DescendanceGraph, title: String, focal: Vec<String>) -> Result<GraphView> {
        let Filtered { graph, removed: removed_isolated } = filter_isolated(graph);
        let graph = graph.into_owned();

        let classification = Classification::of(&graph);
        let stats = GraphStats::compute(&graph, &classification);
        stats.log();
        let layout = self.engine.layout(&graph)?;

        Ok(GraphView {
            title,
            graph,
            removed_isolated,
            classification,
            layout,
            stats,
            focal,
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Graph contains a cycle through: {}", nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No valid KCs found among: {}", tokens.join(", "))]
    NoFocalResolved { tokens: Vec<String> },

    #[error("Neighborhood is empty")]
    EmptyNeighborhood,

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
