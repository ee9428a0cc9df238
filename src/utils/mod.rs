//! Filesystem helpers.

pub mod persistence;
