//! Response paths locating a value or error in the response tree

use std::fmt;

use serde::Serialize;

/// One step of a response path: a response key or a list index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Path from the response root to one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a field selected on the object at this path
    pub fn field(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(key.into()));
        Self(segments)
    }

    /// Path of a list element at this path
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.0
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Field(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_serializes_as_mixed_array() {
        let path = ResponsePath::root().field("user").field("posts").index(1);
        assert_eq!(
            serde_json::to_value(path.segments()).unwrap(),
            json!(["user", "posts", 1])
        );
        assert_eq!(path.to_string(), "user.posts.1");
    }
}
