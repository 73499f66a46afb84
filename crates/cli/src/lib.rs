//! Shared command-line plumbing for Podsheet binaries.

pub mod config;
