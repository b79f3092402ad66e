//! Block kinds, ports, and the static compatibility table.
//!
//! The kind set is closed, so every per-kind rule (which partners a port
//! accepts, where a port's anchor sits, default body size) is a `match` over
//! [`BlockKind`] rather than dynamic dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BlockyError;
use crate::geometry::{Point, Rect, Size, Vector};

/// The fixed enumeration of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Head of a stack: only a `next` port.
    StackTop,
    /// Stack body: `last` and `next`.
    StackMiddle,
    /// Stack terminator: only a `last` port.
    StackBottom,
    /// Stack member with a child pool on its right for `Contained` blocks.
    Composite,
    /// Lives in a composite's child pool: `parent` (when first), `last`, `next`.
    Contained,
    /// Plugs into an expression hole through its `parent` port.
    Expression,
    /// Socket for one expression, usually embedded in another block's content.
    ExpressionHole,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::StackTop,
        BlockKind::StackMiddle,
        BlockKind::StackBottom,
        BlockKind::Composite,
        BlockKind::Contained,
        BlockKind::Expression,
        BlockKind::ExpressionHole,
    ];

    /// The camelCase name used in scenarios and logs.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::StackTop => "stackTop",
            BlockKind::StackMiddle => "stackMiddle",
            BlockKind::StackBottom => "stackBottom",
            BlockKind::Composite => "composite",
            BlockKind::Contained => "contained",
            BlockKind::Expression => "expression",
            BlockKind::ExpressionHole => "expressionHole",
        }
    }

    /// Kinds this kind accepts as partner on `port`.
    ///
    /// The table is symmetric across reverse ports: if `A` accepts `B` on
    /// `next`, then `B` accepts `A` on `last`, and likewise for
    /// `child`/`parent`.
    pub fn accepts(self, port: Port) -> &'static [BlockKind] {
        use BlockKind::*;

        const STACK_LAST: &[BlockKind] = &[StackTop, StackMiddle, Composite];
        const STACK_NEXT: &[BlockKind] = &[StackMiddle, StackBottom, Composite];

        match (self, port) {
            (StackTop, Port::Next) => STACK_NEXT,
            (StackMiddle, Port::Last) => STACK_LAST,
            (StackMiddle, Port::Next) => STACK_NEXT,
            (StackBottom, Port::Last) => STACK_LAST,
            (Composite, Port::Last) => STACK_LAST,
            (Composite, Port::Next) => STACK_NEXT,
            (Composite, Port::Child) => &[Contained],
            (Contained, Port::Last) => &[Contained],
            (Contained, Port::Next) => &[Contained],
            (Contained, Port::Parent) => &[Composite],
            (Expression, Port::Parent) => &[ExpressionHole],
            (ExpressionHole, Port::Child) => &[Expression],
            _ => &[],
        }
    }

    /// Returns `true` if `other` may occupy this kind's `port` slot.
    pub fn is_compatible(self, port: Port, other: BlockKind) -> bool {
        self.accepts(port).contains(&other)
    }

    /// Ports this kind can snap with while being dragged, in matcher order.
    pub fn drag_ports(self) -> SmallVec<[Port; 4]> {
        if !self.is_draggable() {
            return SmallVec::new();
        }
        Port::ALL
            .into_iter()
            .filter(|port| !self.accepts(*port).is_empty())
            .collect()
    }

    /// Expression holes are sockets, never drag sources.
    pub fn is_draggable(self) -> bool {
        !matches!(self, BlockKind::ExpressionHole)
    }

    /// Offset of the child container's origin from the block's origin.
    ///
    /// A composite's child pool opens on its right edge; an expression hole
    /// holds its expression in place.
    pub fn child_inset(self, body: Size) -> Vector {
        match self {
            BlockKind::Composite => Vector::new(body.width, 0.0),
            _ => Vector::ZERO,
        }
    }

    /// Connection point of `port` on a block of this kind occupying `rect`.
    pub fn anchor(self, port: Port, rect: &Rect) -> Point {
        match port {
            Port::Last | Port::Parent => rect.top_left(),
            Port::Next => rect.bottom_left(),
            Port::Child => rect.top_left() + self.child_inset(rect.size()),
        }
    }

    /// Body size used until the presentation layer reports a measured one.
    pub fn default_size(self) -> Size {
        match self {
            BlockKind::StackTop | BlockKind::StackMiddle | BlockKind::StackBottom => {
                Size::new(120.0, 40.0)
            }
            BlockKind::Composite => Size::new(120.0, 60.0),
            BlockKind::Contained => Size::new(100.0, 30.0),
            BlockKind::Expression => Size::new(60.0, 24.0),
            BlockKind::ExpressionHole => Size::new(30.0, 24.0),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = BlockyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BlockyError::InvalidKind {
                name: s.to_string(),
            })
    }
}

/// One of the four link directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Last,
    Next,
    Parent,
    Child,
}

impl Port {
    /// Matcher iteration order.
    pub const ALL: [Port; 4] = [Port::Last, Port::Next, Port::Parent, Port::Child];

    /// The slot on the partner that must point back.
    pub fn reverse(self) -> Port {
        match self {
            Port::Last => Port::Next,
            Port::Next => Port::Last,
            Port::Parent => Port::Child,
            Port::Child => Port::Parent,
        }
    }

    /// `last` and `parent` point toward the owner; `next` and `child` toward
    /// dependents.
    pub fn points_to_owner(self) -> bool {
        matches!(self, Port::Last | Port::Parent)
    }

    pub fn name(self) -> &'static str {
        match self {
            Port::Last => "last",
            Port::Next => "next",
            Port::Parent => "parent",
            Port::Child => "child",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Port {
    type Err = BlockyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Port::ALL
            .into_iter()
            .find(|port| port.name() == s)
            .ok_or_else(|| BlockyError::UnsupportedPort {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_table_is_symmetric() {
        for kind in BlockKind::ALL {
            for port in Port::ALL {
                for &other in kind.accepts(port) {
                    assert!(
                        other.is_compatible(port.reverse(), kind),
                        "{kind} accepts {other} on {port} but not the reverse"
                    );
                }
            }
        }
    }

    #[test]
    fn stack_top_accepts_no_last() {
        assert!(BlockKind::StackTop.accepts(Port::Last).is_empty());
        assert!(BlockKind::StackBottom.accepts(Port::Next).is_empty());
    }

    #[test]
    fn expression_sits_in_hole_child() {
        assert_eq!(
            BlockKind::Expression.accepts(Port::Parent),
            &[BlockKind::ExpressionHole]
        );
        assert_eq!(
            BlockKind::ExpressionHole.accepts(Port::Child),
            &[BlockKind::Expression]
        );
        assert!(BlockKind::Expression.accepts(Port::Next).is_empty());
    }

    #[test]
    fn composite_and_contained_pair_both_ways() {
        assert!(BlockKind::Composite.is_compatible(Port::Child, BlockKind::Contained));
        assert!(BlockKind::Contained.is_compatible(Port::Parent, BlockKind::Composite));
        assert!(BlockKind::Contained.is_compatible(Port::Next, BlockKind::Contained));
        assert!(!BlockKind::Contained.is_compatible(Port::Next, BlockKind::StackMiddle));
    }

    #[test]
    fn drag_ports_follow_table_order() {
        assert_eq!(
            BlockKind::StackMiddle.drag_ports().as_slice(),
            &[Port::Last, Port::Next]
        );
        assert_eq!(
            BlockKind::Composite.drag_ports().as_slice(),
            &[Port::Last, Port::Next, Port::Child]
        );
        assert_eq!(
            BlockKind::Contained.drag_ports().as_slice(),
            &[Port::Last, Port::Next, Port::Parent]
        );
        assert!(BlockKind::ExpressionHole.drag_ports().is_empty());
    }

    #[test]
    fn reverse_is_an_involution() {
        for port in Port::ALL {
            assert_eq!(port.reverse().reverse(), port);
            assert_ne!(port.reverse(), port);
        }
    }

    #[test]
    fn anchors() {
        let r = Rect::new(10.0, 20.0, 120.0, 60.0);
        assert_eq!(BlockKind::StackMiddle.anchor(Port::Last, &r), Point::new(10.0, 20.0));
        assert_eq!(BlockKind::StackMiddle.anchor(Port::Next, &r), Point::new(10.0, 80.0));
        assert_eq!(BlockKind::Composite.anchor(Port::Child, &r), Point::new(130.0, 20.0));
        assert_eq!(
            BlockKind::ExpressionHole.anchor(Port::Child, &r),
            Point::new(10.0, 20.0)
        );
    }

    #[test]
    fn parse_kind_and_port_names() {
        assert_eq!("stackTop".parse::<BlockKind>().unwrap(), BlockKind::StackTop);
        assert_eq!(
            "expressionHole".parse::<BlockKind>().unwrap(),
            BlockKind::ExpressionHole
        );
        assert!(matches!(
            "hexagon".parse::<BlockKind>(),
            Err(BlockyError::InvalidKind { name }) if name == "hexagon"
        ));
        assert_eq!("child".parse::<Port>().unwrap(), Port::Child);
        assert!(matches!(
            "sideways".parse::<Port>(),
            Err(BlockyError::UnsupportedPort { name }) if name == "sideways"
        ));
    }

    #[test]
    fn serde_uses_camel_case_names() {
        let json = serde_json::to_string(&BlockKind::ExpressionHole).unwrap();
        assert_eq!(json, "\"expressionHole\"");
        let json = serde_json::to_string(&Port::Parent).unwrap();
        assert_eq!(json, "\"parent\"");
    }
}
