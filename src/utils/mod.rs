//! Shared utilities for the blockpress engine.

pub mod json_ext;
