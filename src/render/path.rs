//! Node identity within a (possibly nested) document walk.

use std::fmt;

/// One step from a node to one of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// The n-th child of the current node
    Child(usize),
    /// Into a document nested inside an entity, named by the renderer
    Nested(String),
}

/// Position of a node, as the steps taken from the root document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// The root position.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from child indices only.
    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.iter().copied().map(PathSegment::Child).collect())
    }

    /// The steps of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether this is the root position.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path extended by one step.
    pub fn join(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.0.push(segment);
        path
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// The leading child indices, up to the first nested-document step.
    pub fn local_prefix(&self) -> Vec<usize> {
        self.0
            .iter()
            .map_while(|segment| match segment {
                PathSegment::Child(index) => Some(*index),
                PathSegment::Nested(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Child(index) => write!(f, "/{}", index)?,
                PathSegment::Nested(name) => write!(f, "/@{}", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodePath::root().to_string(), "/");
        let path = NodePath::from_indices(&[0, 2])
            .join(PathSegment::Nested("p1.bio".into()))
            .join(PathSegment::Child(1));
        assert_eq!(path.to_string(), "/0/2/@p1.bio/1");
    }

    #[test]
    fn test_local_prefix_stops_at_nested() {
        let path = NodePath::from_indices(&[3, 1])
            .join(PathSegment::Nested("q.body".into()))
            .join(PathSegment::Child(0));
        assert_eq!(path.local_prefix(), vec![3, 1]);
        assert_eq!(path.len(), 4);
    }
}
