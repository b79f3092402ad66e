//! Scripted drag scenarios.
//!
//! A scenario is a JSON document describing the blocks on the canvas, the
//! links between them, and a sequence of pointer and structure steps:
//!
//! ```json
//! {
//!   "attractDistance": 30,
//!   "blocks": [
//!     { "id": 1, "kind": "stackTop", "content": ["when clicked"] },
//!     { "id": 2, "kind": "stackMiddle", "at": { "x": 300, "y": 300 } }
//!   ],
//!   "links": [],
//!   "steps": [
//!     { "down": { "pointer": 1, "block": 2, "at": { "x": 300, "y": 300 } } },
//!     { "move": { "pointer": 1, "at": { "x": 2, "y": 42 } } },
//!     { "up": { "pointer": 1 } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use blocky_core::{
    BlockGraph, BlockId, BlockKind, BlockyError, Content, DragController, DragDispatch,
    GraphEvent, Point, Port, Size,
};

use crate::error::CliError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub attract_distance: Option<f64>,
    pub blocks: Vec<BlockSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockSpec {
    pub id: u32,
    /// Kind name, e.g. `stackTop`.
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ContentSpec>,
    #[serde(default)]
    pub at: Option<Point>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// Content part: a bare string is text, `{ "hole": id }` embeds a hole.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentSpec {
    Text(String),
    Hole { hole: u32 },
}

impl From<&ContentSpec> for Content {
    fn from(spec: &ContentSpec) -> Self {
        match spec {
            ContentSpec::Text(text) => Content::Text(text.clone()),
            ContentSpec::Hole { hole } => Content::Hole(BlockId(*hole)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSpec {
    pub block: u32,
    /// Port name, e.g. `next`.
    pub port: String,
    pub target: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Down { pointer: u32, block: u32, at: Point },
    Move { pointer: u32, at: Point },
    Up { pointer: u32 },
    Cancel,
    Link(LinkSpec),
    Unlink { block: u32, port: String },
    Destroy { block: u32 },
}

/// Everything a replay produced.
#[derive(Debug, Serialize)]
pub struct Report {
    pub dispatches: Vec<DragDispatch>,
    pub events: Vec<GraphEvent>,
    pub roots: Vec<BlockId>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Scenario, CliError> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Creates the scenario's blocks and links in a fresh graph.
    pub fn build(&self) -> Result<BlockGraph, CliError> {
        let mut graph = BlockGraph::new();

        // Holes must exist before the content that embeds them.
        for spec in &self.blocks {
            let kind: BlockKind = spec.kind.parse()?;
            let id = graph.create_block_with_id(BlockId(spec.id), kind, Vec::new())?;
            if let Some(size) = spec.size {
                graph.set_size(id, size)?;
            }
            if let Some(at) = spec.at {
                graph.set_offset(id, at)?;
            }
            graph.set_enabled(id, spec.enabled)?;
        }
        for spec in &self.blocks {
            if !spec.content.is_empty() {
                let content = spec.content.iter().map(Content::from).collect();
                graph.set_content(BlockId(spec.id), content)?;
            }
        }
        for link in &self.links {
            let port: Port = link.port.parse()?;
            graph.link(BlockId(link.block), port, BlockId(link.target))?;
        }
        Ok(graph)
    }

    /// Replays every step against `graph`.
    pub fn run(&self, graph: &mut BlockGraph) -> Result<Report, CliError> {
        let mut drag = DragController::new();
        let mut dispatches = Vec::new();

        for (n, step) in self.steps.iter().enumerate() {
            let at_step = |source: BlockyError| CliError::Step { step: n, source };
            tracing::debug!(index = n, ?step, "replaying step");
            match step {
                Step::Down { pointer, block, at } => {
                    let d = drag
                        .pointer_down(graph, *pointer, BlockId(*block), *at)
                        .map_err(at_step)?;
                    dispatches.push(d);
                }
                Step::Move { pointer, at } => {
                    let d = drag.pointer_move(graph, *pointer, *at).map_err(at_step)?;
                    dispatches.push(d);
                }
                Step::Up { pointer } => {
                    let d = drag.pointer_up(graph, *pointer).map_err(at_step)?;
                    dispatches.push(d);
                }
                Step::Cancel => {
                    dispatches.push(drag.cancel(graph).map_err(at_step)?);
                }
                Step::Link(link) => {
                    let port: Port = link.port.parse().map_err(at_step)?;
                    graph
                        .link(BlockId(link.block), port, BlockId(link.target))
                        .map_err(at_step)?;
                    if drag.is_dragging() {
                        dispatches.push(drag.refresh(graph));
                    }
                }
                Step::Unlink { block, port } => {
                    let port: Port = port.parse().map_err(at_step)?;
                    graph.unlink(BlockId(*block), port).map_err(at_step)?;
                    if drag.is_dragging() {
                        dispatches.push(drag.refresh(graph));
                    }
                }
                Step::Destroy { block } => {
                    graph.destroy_block(BlockId(*block)).map_err(at_step)?;
                    if drag.is_dragging() {
                        dispatches.push(drag.refresh(graph));
                    }
                }
            }
        }

        // A scenario that ends mid-drag behaves like a focus loss.
        if drag.is_dragging() {
            dispatches.push(drag.cancel(graph)?);
        }

        Ok(Report {
            dispatches,
            events: graph.take_events(),
            roots: graph.roots(),
        })
    }
}
