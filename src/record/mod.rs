// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Record access.
//!
//! Records are either JSON-like mappings or typed objects implementing
//! [`Inspectable`]. Both are seen through [`Node`], so field resolution and
//! the rule validators never care which one they are looking at.

mod node;
mod resolver;

pub use node::{Inspectable, Node};
pub use resolver::resolve;
