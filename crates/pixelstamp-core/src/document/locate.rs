//! Finding layers by name.
//!
//! Layer names are not unique. Lookups walk the tree depth-first in
//! pre-order (a group before its children, siblings top-most first) and
//! stop at the first exact, case-sensitive match.

use super::LayerNode;

/// Position of a node in a layer tree: one sibling index per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerPath(Vec<usize>);

impl LayerPath {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth, `1` for top-level layers.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn resolve<'a>(&self, layers: &'a [LayerNode]) -> Option<&'a LayerNode> {
        let (first, rest) = self.0.split_first()?;
        let mut node = layers.get(*first)?;
        for &index in rest {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    pub fn resolve_mut<'a>(&self, layers: &'a mut [LayerNode]) -> Option<&'a mut LayerNode> {
        let (first, rest) = self.0.split_first()?;
        let mut node = layers.get_mut(*first)?;
        for &index in rest {
            node = node.children_mut()?.get_mut(index)?;
        }
        Some(node)
    }
}

/// Path to the first layer named `name`, or `None`.
pub fn locate(layers: &[LayerNode], name: &str) -> Option<LayerPath> {
    let mut path = Vec::new();
    locate_into(layers, name, &mut path).then_some(LayerPath(path))
}

fn locate_into(layers: &[LayerNode], name: &str, path: &mut Vec<usize>) -> bool {
    for (index, layer) in layers.iter().enumerate() {
        path.push(index);
        if layer.name == name || locate_into(layer.children(), name, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// First layer named `name`, or `None`.
pub fn find_layer<'a>(layers: &'a [LayerNode], name: &str) -> Option<&'a LayerNode> {
    layers.iter().find_map(|layer| layer.find(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::geometry::Rect;

    fn solid(name: &str) -> LayerNode {
        LayerNode::solid(name, HexColor::WHITE, Rect::from_size(1.0, 1.0))
    }

    fn tree() -> Vec<LayerNode> {
        vec![
            LayerNode::group("G1", vec![solid("A"), solid("X")]),
            LayerNode::group("X", vec![solid("B")]),
            solid("X"),
        ]
    }

    #[test]
    fn test_group_contents_come_before_later_siblings() {
        let layers = tree();
        assert_eq!(locate(&layers, "X").unwrap().indices(), &[0, 1]);
    }

    #[test]
    fn test_group_matches_before_its_children() {
        let layers = vec![LayerNode::group("Same", vec![solid("Same")])];
        let path = locate(&layers, "Same").unwrap();
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let layers = tree();
        assert!(locate(&layers, "x").is_none());
        assert!(find_layer(&layers, "a").is_none());
    }

    #[test]
    fn test_empty_tree() {
        assert!(locate(&[], "A").is_none());
    }

    #[test]
    fn test_resolve_round_trip() {
        let layers = tree();
        let path = locate(&layers, "B").unwrap();
        assert_eq!(path.indices(), &[1, 0]);
        assert_eq!(path.resolve(&layers).unwrap().name, "B");
    }

    #[test]
    fn test_resolve_out_of_range() {
        let layers = tree();
        assert!(LayerPath(vec![7]).resolve(&layers).is_none());
        assert!(LayerPath(vec![2, 0]).resolve(&layers).is_none());
        assert!(LayerPath(vec![]).resolve(&layers).is_none());
    }

    #[test]
    fn test_find_layer_agrees_with_locate() {
        let layers = tree();
        for name in ["G1", "A", "X", "B"] {
            let by_path = locate(&layers, name).unwrap().resolve(&layers).unwrap();
            let found = find_layer(&layers, name).unwrap();
            assert!(std::ptr::eq(by_path, found), "{name}");
        }
    }
}
