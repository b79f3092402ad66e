//! The block entity stored at each graph node.
//!
//! A [`Block`] carries identity, kind, placement and content. Its four link
//! slots are not fields: they are the `Next`/`Child` edges incident to the
//! block's node, queried through [`BlockGraph`](crate::graph::BlockGraph).

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};
use crate::id::BlockId;
use crate::kind::BlockKind;

/// One part of a block's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Content {
    /// Opaque text the engine never interprets.
    Text(String),
    /// An `ExpressionHole` block embedded in this block's content.
    Hole(BlockId),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

/// Result of the last size-fit pass over a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fitted {
    /// Minimum box of the child container (zero when empty or absent).
    pub container: Size,
    /// Body size after growing around children and embedded holes.
    pub size: Size,
}

/// A connectable block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Placement; absolute for graph roots, host-relative for embedded holes,
    /// zero while linked.
    pub offset: Point,
    pub content: Vec<Content>,
    /// Intrinsic body size as measured by the presentation layer.
    pub size: Size,
    pub fitted: Fitted,
    /// The block whose content embeds this hole.
    pub host: Option<BlockId>,
    /// Disabled blocks ignore drag starts.
    pub enabled: bool,
}

impl Block {
    /// Creates a detached block with the kind's default size.
    pub fn new(id: BlockId, kind: BlockKind, content: Vec<Content>) -> Self {
        let size = kind.default_size();
        Block {
            id,
            kind,
            offset: Point::ORIGIN,
            content,
            size,
            fitted: Fitted {
                container: Size::ZERO,
                size,
            },
            host: None,
            enabled: true,
        }
    }

    /// Holes embedded in this block's content, in content order.
    pub fn holes(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.content.iter().filter_map(|part| match part {
            Content::Hole(id) => Some(*id),
            Content::Text(_) => None,
        })
    }

    /// Concatenated text parts, holes rendered as `[]`.
    pub fn label(&self) -> String {
        self.content
            .iter()
            .map(|part| match part {
                Content::Text(text) => text.as_str(),
                Content::Hole(_) => "[]",
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
