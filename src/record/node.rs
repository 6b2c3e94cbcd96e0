// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Structured values: the one view of a record the resolver and the rule
//! validators work with.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// A typed record that exposes its members by name.
///
/// Implement this for domain types that should be validated without first
/// converting them to JSON.
pub trait Inspectable {
    /// Record kind, used to look up the rule-set identifier in the
    /// [`KindRegistry`](crate::engine::KindRegistry).
    fn kind(&self) -> &str;

    /// Look up a member by name. Unknown members are [`Node::Absent`].
    fn member(&self, name: &str) -> Node<'_>;

    /// Text form of the whole object, used when a rule targets the object
    /// itself rather than one of its members.
    fn text(&self) -> String {
        self.kind().to_string()
    }
}

/// A structured value: mapping, inspectable object, scalar or absent.
#[derive(Clone)]
pub enum Node<'a> {
    /// String-keyed mapping (a JSON object).
    Mapping(&'a Map<String, Value>),
    /// Typed object inspected by member name.
    Object(&'a dyn Inspectable),
    /// Leaf value, held in its text form.
    Scalar(Cow<'a, str>),
    /// No value.
    Absent,
}

impl<'a> Node<'a> {
    /// View a JSON value as a node. `null` is absent.
    pub fn from_json(value: &'a Value) -> Self {
        match value {
            Value::Null => Node::Absent,
            Value::Bool(b) => Node::Scalar(Cow::Owned(b.to_string())),
            Value::Number(n) => Node::Scalar(Cow::Owned(n.to_string())),
            Value::String(s) => Node::Scalar(Cow::Borrowed(s.as_str())),
            Value::Array(_) => Node::Scalar(Cow::Owned(value.to_string())),
            Value::Object(map) => Node::Mapping(map),
        }
    }

    /// View a typed object as a node.
    pub fn object(object: &'a dyn Inspectable) -> Self {
        Node::Object(object)
    }

    /// View an optional nested object as a node.
    pub fn nested<T: Inspectable>(object: Option<&'a T>) -> Self {
        match object {
            Some(object) => Node::Object(object),
            None => Node::Absent,
        }
    }

    /// Whether the node holds no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    /// Look up one path segment below this node.
    ///
    /// Scalars and absent nodes have no members, so the result is absent.
    pub fn member(&self, name: &str) -> Node<'a> {
        match self {
            Node::Mapping(map) => map.get(name).map(Node::from_json).unwrap_or(Node::Absent),
            Node::Object(object) => object.member(name),
            Node::Scalar(_) | Node::Absent => Node::Absent,
        }
    }

    /// Text form of the value, or `None` if absent.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Node::Absent => None,
            Node::Scalar(text) => Some(Cow::Borrowed(text.as_ref())),
            Node::Mapping(map) => Some(Cow::Owned(
                serde_json::to_string(map).unwrap_or_default(),
            )),
            Node::Object(object) => Some(Cow::Owned(object.text())),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Node::Object(object) => f.debug_tuple("Object").field(&object.kind()).finish(),
            Node::Scalar(text) => f.debug_tuple("Scalar").field(text).finish(),
            Node::Absent => f.write_str("Absent"),
        }
    }
}

impl<'a> From<&'a str> for Node<'a> {
    fn from(text: &'a str) -> Self {
        Node::Scalar(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Node<'a> {
    fn from(text: &'a String) -> Self {
        Node::Scalar(Cow::Borrowed(text.as_str()))
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        Node::from_json(value)
    }
}

impl<'a> From<&'a dyn Inspectable> for Node<'a> {
    fn from(object: &'a dyn Inspectable) -> Self {
        Node::Object(object)
    }
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Node<'_> {
                fn from(value: $t) -> Self {
                    Node::Scalar(Cow::Owned(value.to_string()))
                }
            }
        )*
    };
}

scalar_from!(i32, i64, u32, u64, f64, bool);

impl<'a, T: Into<Node<'a>>> From<Option<T>> for Node<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Point {
        x: i64,
        label: Option<String>,
    }

    impl Inspectable for Point {
        fn kind(&self) -> &str {
            "point"
        }

        fn member(&self, name: &str) -> Node<'_> {
            match name {
                "x" => self.x.into(),
                "label" => self.label.as_ref().into(),
                _ => Node::Absent,
            }
        }
    }

    #[test]
    fn test_from_json_scalars() {
        let value = json!({"s": "text", "n": 42, "b": true, "z": null, "a": [1, 2]});
        let node = Node::from_json(&value);

        assert_eq!(node.member("s").text().as_deref(), Some("text"));
        assert_eq!(node.member("n").text().as_deref(), Some("42"));
        assert_eq!(node.member("b").text().as_deref(), Some("true"));
        assert!(node.member("z").is_absent());
        assert_eq!(node.member("a").text().as_deref(), Some("[1,2]"));
        assert!(node.member("missing").is_absent());
    }

    #[test]
    fn test_scalar_has_no_members() {
        let value = json!("leaf");
        let node = Node::from_json(&value);
        assert!(node.member("anything").is_absent());
        assert!(Node::Absent.member("anything").is_absent());
    }

    #[test]
    fn test_object_members() {
        let point = Point {
            x: -3,
            label: None,
        };
        let node = Node::object(&point);

        assert_eq!(node.member("x").text().as_deref(), Some("-3"));
        assert!(node.member("label").is_absent());
        assert!(node.member("y").is_absent());
        assert_eq!(node.text().as_deref(), Some("point"));
    }

    #[test]
    fn test_nested_none_is_absent() {
        assert!(Node::nested::<Point>(None).is_absent());
    }
}
