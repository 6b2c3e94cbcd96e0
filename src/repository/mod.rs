// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule document storage.
//!
//! A [`RuleRepository`] keeps rule documents in one directory: the configured
//! directory for filesystem locations, or a temporary directory seeded from
//! the bundle for bundled locations.

mod store;

pub use store::RuleRepository;
