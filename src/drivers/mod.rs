//! The two command-line workflows built on the broker

pub mod rewrite;
pub mod translate;
