// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Property-based tests
//!
//! Each module uses `proptest` to generate inputs for one component and
//! asserts properties that must hold for all of them.

mod registry;
mod strategy;
