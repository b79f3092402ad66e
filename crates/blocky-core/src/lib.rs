pub mod geometry;
pub mod id;
pub mod kind;
pub mod error;
pub mod block;
pub mod link;
pub mod event;
pub mod config;
pub mod graph;
pub mod layout;
pub mod fit;
pub mod matcher;
pub mod drag;

// Re-export commonly used types
pub use geometry::{Point, Rect, Size, Vector};
pub use id::BlockId;
pub use kind::{BlockKind, Port};
pub use error::BlockyError;
pub use block::{Block, Content, Fitted};
pub use link::LinkOutcome;
pub use event::GraphEvent;
pub use config::{attraction_distance, set_attraction_distance, EngineConfig};
pub use graph::BlockGraph;
pub use layout::{RectCache, RectSource};
pub use matcher::{link_test, nearest, Match};
pub use drag::{DragController, DragDispatch, DragIgnoredReason, DragOutcome, DragPhase};
