//! Line-oriented command language for driving a [`GraphEngine`].
//!
//! Each input line is split on whitespace and parsed with clap, so every
//! command gets the same argument validation and `help` text as the binary.
//! Executing a [`Command`] yields an [`Outcome`], which renders either as
//! human-readable text (`Display`) or as tagged JSON (`Serialize`).

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt;

use super::engine::GraphEngine;
use super::error::{GraphError, GraphResult};
use super::models::{
    AdjacencyMatrix, Component, DegreeEntry, Edge, EdgeId, EigenDecomposition, GraphMode,
    GraphReport, GraphSummary, Node, NodeId, Position, ShortestPath,
};

// ============================================================================
// Grammar
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "graph-lab", no_binary_name = true, disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// A single graph command.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a node (id defaults to the next free number)
    AddNode {
        /// Node ID
        id: Option<String>,

        /// Display label (defaults to the id)
        #[arg(long)]
        label: Option<String>,

        /// Horizontal position
        #[arg(long, allow_negative_numbers = true)]
        x: Option<f64>,

        /// Vertical position
        #[arg(long, allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// Remove a node and every edge touching it
    RemoveNode {
        /// Node ID
        id: String,
    },

    /// Connect two nodes
    AddEdge {
        /// Source node ID
        from: String,

        /// Target node ID
        to: String,

        /// Positive edge weight (default: 1)
        #[arg(allow_negative_numbers = true)]
        weight: Option<f64>,
    },

    /// Remove an edge by its numeric id
    RemoveEdge {
        /// Edge ID
        id: u64,
    },

    /// Set a node's fill color (#rrggbb, or "none" to reset)
    Color {
        /// Node ID
        node: String,

        /// Color value
        color: String,
    },

    /// Remove every node and edge
    Clear,

    /// Switch directed traversal
    Directed {
        #[arg(value_enum, default_value_t = Toggle::Toggle)]
        state: Toggle,
    },

    /// Switch the physics simulation
    Physics {
        #[arg(value_enum, default_value_t = Toggle::Toggle)]
        state: Toggle,
    },

    /// Show node, edge and component counts
    Info,

    /// List connected components
    Components,

    /// List bridge edges
    Bridges,

    /// Check whether the graph is bipartite
    Bipartite,

    /// Show the degree of every node
    Degrees,

    /// Show the adjacency matrix
    Matrix,

    /// Show eigenvalues and eigenvectors of the adjacency matrix
    Eigen,

    /// Find the lightest path between two nodes
    Path {
        /// Start node ID
        from: String,

        /// End node ID
        to: String,

        /// Follow edge direction regardless of mode
        #[arg(long, conflicts_with = "undirected")]
        directed: bool,

        /// Ignore edge direction regardless of mode
        #[arg(long)]
        undirected: bool,
    },

    /// Run every analysis at once
    Report,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
    Toggle,
}

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank line or comment
    Empty,
    Command(Command),
    /// Help was requested; the rendered text
    Help(String),
}

/// Parse one line of input.
///
/// Lines starting with `#` are comments. Words follow POSIX shell quoting,
/// so `--label "New York"` is a single argument. Usage errors come back as
/// `InvalidInput` carrying clap's first error line.
pub fn parse_line(line: &str) -> GraphResult<ParsedLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(ParsedLine::Empty);
    }

    let words = shell_words::split(line)
        .map_err(|e| GraphError::InvalidInput(format!("{}: {}", e, line)))?;

    match CommandLine::try_parse_from(words) {
        Ok(parsed) => Ok(ParsedLine::Command(parsed.command)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Ok(ParsedLine::Help(e.render().to_string()))
            }
            _ => {
                let rendered = e.render().to_string();
                let first = rendered.lines().next().unwrap_or_default();
                let message = first.strip_prefix("error: ").unwrap_or(first);
                Err(GraphError::InvalidInput(message.to_string()))
            }
        },
    }
}

/// Full command reference.
pub fn help_text() -> String {
    CommandLine::command().render_long_help().to_string()
}

// ============================================================================
// Outcomes
// ============================================================================

/// What a command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    NodeAdded {
        node: Node,
        summary: GraphSummary,
    },
    NodeRemoved {
        node: Node,
        removed_edges: Vec<Edge>,
        summary: GraphSummary,
    },
    EdgeAdded {
        edge: Edge,
        summary: GraphSummary,
    },
    EdgeRemoved {
        edge: Edge,
        summary: GraphSummary,
    },
    NodeColored {
        node: Node,
    },
    Cleared {
        summary: GraphSummary,
    },
    ModeChanged {
        mode: GraphMode,
        summary: GraphSummary,
    },
    Summary {
        summary: GraphSummary,
    },
    Components {
        components: Vec<Component>,
    },
    Bridges {
        bridges: Vec<Edge>,
    },
    Bipartite {
        bipartite: bool,
        directed: bool,
    },
    Degrees {
        degrees: Vec<DegreeEntry>,
    },
    Matrix {
        matrix: AdjacencyMatrix,
    },
    Spectrum {
        spectrum: EigenDecomposition,
    },
    Path {
        path: ShortestPath,
    },
    Report {
        report: Box<GraphReport>,
    },
}

impl GraphEngine {
    /// Apply a command and describe the result.
    pub fn execute(&mut self, command: Command) -> GraphResult<Outcome> {
        tracing::debug!(?command, "Executing command");
        let outcome = match command {
            Command::AddNode { id, label, x, y } => {
                let position = Position::new(x.unwrap_or(0.0), y.unwrap_or(0.0));
                let node = self.add_node(id.map(NodeId::from), label, position)?;
                Outcome::NodeAdded {
                    node,
                    summary: self.summary(),
                }
            }
            Command::RemoveNode { id } => {
                let (node, removed_edges) = self.remove_node(&NodeId::from(id))?;
                Outcome::NodeRemoved {
                    node,
                    removed_edges,
                    summary: self.summary(),
                }
            }
            Command::AddEdge { from, to, weight } => {
                let edge = self.add_edge(&NodeId::from(from), &NodeId::from(to), weight)?;
                Outcome::EdgeAdded {
                    edge,
                    summary: self.summary(),
                }
            }
            Command::RemoveEdge { id } => {
                let edge = self.remove_edge(EdgeId(id))?;
                Outcome::EdgeRemoved {
                    edge,
                    summary: self.summary(),
                }
            }
            Command::Color { node, color } => {
                let color = match color.to_ascii_lowercase().as_str() {
                    "none" | "default" => None,
                    _ => Some(color),
                };
                let node = self.set_node_color(&NodeId::from(node), color)?;
                Outcome::NodeColored { node }
            }
            Command::Clear => {
                self.clear();
                Outcome::Cleared {
                    summary: self.summary(),
                }
            }
            Command::Directed { state } => {
                let mode = match state {
                    Toggle::On => self.set_directed(true),
                    Toggle::Off => self.set_directed(false),
                    Toggle::Toggle => self.toggle_directed(),
                };
                Outcome::ModeChanged {
                    mode,
                    summary: self.summary(),
                }
            }
            Command::Physics { state } => {
                let mode = match state {
                    Toggle::On => self.set_physics(true),
                    Toggle::Off => self.set_physics(false),
                    Toggle::Toggle => self.toggle_physics(),
                };
                Outcome::ModeChanged {
                    mode,
                    summary: self.summary(),
                }
            }
            Command::Info => Outcome::Summary {
                summary: self.summary(),
            },
            Command::Components => Outcome::Components {
                components: self.components(),
            },
            Command::Bridges => {
                let bridges = self
                    .bridges()
                    .into_iter()
                    .filter_map(|id| self.store().edge(id).cloned())
                    .collect();
                Outcome::Bridges { bridges }
            }
            Command::Bipartite => Outcome::Bipartite {
                bipartite: self.is_bipartite(),
                directed: self.mode().directed,
            },
            Command::Degrees => Outcome::Degrees {
                degrees: self.degree_table(),
            },
            Command::Matrix => Outcome::Matrix {
                matrix: self.adjacency_matrix(),
            },
            Command::Eigen => Outcome::Spectrum {
                spectrum: self.spectrum()?,
            },
            Command::Path {
                from,
                to,
                directed,
                undirected,
            } => {
                let flag = match (directed, undirected) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                Outcome::Path {
                    path: self.shortest_path(&NodeId::from(from), &NodeId::from(to), flag)?,
                }
            }
            Command::Report => Outcome::Report {
                report: Box::new(self.report()?),
            },
        };
        Ok(outcome)
    }
}

// ============================================================================
// Text rendering
// ============================================================================

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &GraphSummary) -> fmt::Result {
    writeln!(f, "Nodes: {}", summary.node_count)?;
    writeln!(f, "Edges: {}", summary.edge_count)?;
    writeln!(f, "Components: {}", summary.component_count)?;
    write!(f, "Bipartite: {}", yes_no(summary.is_bipartite))
}

fn write_components(f: &mut fmt::Formatter<'_>, components: &[Component]) -> fmt::Result {
    if components.is_empty() {
        return write!(f, "No components");
    }
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        let members: Vec<&str> = c.members.iter().map(NodeId::as_str).collect();
        write!(
            f,
            "Component {} ({} node{}{}): {}",
            c.id + 1,
            c.size,
            if c.size == 1 { "" } else { "s" },
            if c.is_main { ", main" } else { "" },
            members.join(", ")
        )?;
    }
    Ok(())
}

fn write_degrees(f: &mut fmt::Formatter<'_>, degrees: &[DegreeEntry]) -> fmt::Result {
    let width = degrees
        .iter()
        .map(|d| d.node.as_str().len())
        .max()
        .unwrap_or(0)
        .max("Node ID".len());
    write!(f, "{:<width$}  Degree", "Node ID", width = width)?;
    for d in degrees {
        write!(f, "\n{:<width$}  {}", d.node, d.degree, width = width)?;
    }
    Ok(())
}

fn write_matrix(f: &mut fmt::Formatter<'_>, matrix: &AdjacencyMatrix) -> fmt::Result {
    if matrix.is_empty() {
        return write!(f, "Adjacency matrix: empty");
    }
    let width = matrix
        .nodes
        .iter()
        .map(|n| n.as_str().len())
        .max()
        .unwrap_or(1);
    write!(f, "{:width$}", "", width = width)?;
    for node in &matrix.nodes {
        write!(f, " {:>width$}", node, width = width)?;
    }
    for (node, row) in matrix.nodes.iter().zip(&matrix.cells) {
        write!(f, "\n{:<width$}", node, width = width)?;
        for cell in row {
            write!(f, " {:>width$}", cell, width = width)?;
        }
    }
    Ok(())
}

fn write_spectrum(f: &mut fmt::Formatter<'_>, spectrum: &EigenDecomposition) -> fmt::Result {
    if spectrum.is_empty() {
        return write!(f, "Eigenvalues: none\nEigenvectors: none");
    }
    write!(f, "Eigenvalues:")?;
    for (i, value) in spectrum.values.iter().enumerate() {
        write!(f, "\n  λ{} = {:.3}", i + 1, value)?;
    }
    write!(f, "\nEigenvectors:")?;
    for (i, vector) in spectrum.vectors.iter().enumerate() {
        let entries: Vec<String> = vector.iter().map(|v| format!("{:.3}", v)).collect();
        write!(f, "\n  v{} = [{}]", i + 1, entries.join(", "))?;
    }
    Ok(())
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &ShortestPath) -> fmt::Result {
    let nodes: Vec<String> = path.nodes().iter().map(ToString::to_string).collect();
    write!(
        f,
        "Path {} → {}: {} (total weight {})",
        path.source,
        path.target,
        nodes.join(" → "),
        path.total_weight
    )?;
    for step in &path.steps {
        write!(
            f,
            "\n  edge {}: {} → {} ({})",
            step.edge, step.from, step.to, step.weight
        )?;
    }
    Ok(())
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NodeAdded { node, summary } => {
                writeln!(f, "Added node {} ({})", node.id, node.label)?;
                write_summary(f, summary)
            }
            Outcome::NodeRemoved {
                node,
                removed_edges,
                summary,
            } => {
                writeln!(
                    f,
                    "Removed node {} and {} edge{}",
                    node.id,
                    removed_edges.len(),
                    if removed_edges.len() == 1 { "" } else { "s" }
                )?;
                write_summary(f, summary)
            }
            Outcome::EdgeAdded { edge, summary } => {
                writeln!(
                    f,
                    "Added edge {}: {} → {} (weight {}{})",
                    edge.id,
                    edge.from,
                    edge.to,
                    edge.weight,
                    if edge.is_self_loop() { ", self-loop" } else { "" }
                )?;
                write_summary(f, summary)
            }
            Outcome::EdgeRemoved { edge, summary } => {
                writeln!(f, "Removed edge {}: {} → {}", edge.id, edge.from, edge.to)?;
                write_summary(f, summary)
            }
            Outcome::NodeColored { node } => match &node.color {
                Some(color) => write!(f, "Colored node {} {}", node.id, color),
                None => write!(f, "Reset color of node {}", node.id),
            },
            Outcome::Cleared { summary } => {
                writeln!(f, "Cleared graph")?;
                write_summary(f, summary)
            }
            Outcome::ModeChanged { mode, summary } => {
                writeln!(f, "Mode: {}", mode)?;
                write_summary(f, summary)
            }
            Outcome::Summary { summary } => write_summary(f, summary),
            Outcome::Components { components } => write_components(f, components),
            Outcome::Bridges { bridges } => {
                if bridges.is_empty() {
                    return write!(f, "No bridges");
                }
                write!(f, "Bridges:")?;
                for edge in bridges {
                    write!(f, "\n  edge {}: {} - {}", edge.id, edge.from, edge.to)?;
                }
                Ok(())
            }
            Outcome::Bipartite {
                bipartite,
                directed,
            } => write!(
                f,
                "Bipartite: {}{}",
                yes_no(*bipartite),
                if *directed { " (directed)" } else { "" }
            ),
            Outcome::Degrees { degrees } => write_degrees(f, degrees),
            Outcome::Matrix { matrix } => write_matrix(f, matrix),
            Outcome::Spectrum { spectrum } => write_spectrum(f, spectrum),
            Outcome::Path { path } => write_path(f, path),
            Outcome::Report { report } => {
                write_summary(f, &report.summary)?;
                write!(f, "\n\n")?;
                write_components(f, &report.components)?;
                let bridges: Vec<String> = report.bridges.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "\n\nBridge edges: {}\n\n",
                    if bridges.is_empty() {
                        "none".to_string()
                    } else {
                        bridges.join(", ")
                    }
                )?;
                write_degrees(f, &report.degrees)?;
                write!(f, "\n\n")?;
                write_matrix(f, &report.matrix)?;
                write!(f, "\n\n")?;
                write_spectrum(f, &report.spectrum)?;
                write!(
                    f,
                    "\n\nComputed at {} in {} ms",
                    report.computed_at.to_rfc3339(),
                    report.computation_ms
                )
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
