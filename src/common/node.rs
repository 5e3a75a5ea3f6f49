use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum NodeType {
    Move,
    Line,
    OffCurve,
    Curve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub nodetype: NodeType,
}

impl Node {
    pub fn new_move(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Move,
        }
    }

    pub fn new_line(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Line,
        }
    }

    pub fn new_offcurve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::OffCurve,
        }
    }

    pub fn new_curve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Curve,
        }
    }

    pub fn to_kurbo(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    pub fn is_on_curve(&self) -> bool {
        self.nodetype != NodeType::OffCurve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offcurve_nodes_are_not_on_curve() {
        assert!(Node::new_move(0.0, 0.0).is_on_curve());
        assert!(Node::new_line(1.0, 2.0).is_on_curve());
        assert!(Node::new_curve(1.0, 2.0).is_on_curve());
        assert!(!Node::new_offcurve(1.0, 2.0).is_on_curve());
    }

    #[test]
    fn test_node_serde() {
        let node = Node::new_offcurve(81.0, 0.0);
        let serialized = serde_json::to_string(&node).unwrap();
        assert_eq!(serialized, r#"{"x":81.0,"y":0.0,"nodetype":"OffCurve"}"#);
    }
}
