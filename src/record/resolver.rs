// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Field path resolution.

use crate::rules::FieldPath;

use super::node::Node;

/// Resolve `path` against `root`.
///
/// Walks the segments left to right. A missing key, an unknown member or a
/// scalar reached before the last segment all yield [`Node::Absent`];
/// resolution never fails.
pub fn resolve<'a>(root: &Node<'a>, path: &FieldPath) -> Node<'a> {
    let mut current = root.clone();

    for segment in path.segments() {
        current = current.member(segment);
        if current.is_absent() {
            tracing::trace!(path = %path, segment, "field path resolved to absent");
            break;
        }
    }

    current
}
