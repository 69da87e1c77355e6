//! Shared test support for the scorer workspace: one-time logging setup and
//! the proptest configuration every property suite uses.

pub mod logging;
pub mod proptest_prelude;
