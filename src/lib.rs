//! clustergen - GitOps cluster configuration resolver
//!
//! Turns a declarative per-cluster configuration tree into fully-resolved
//! deployment manifests for a GitOps controller: addon and include
//! fragments are merged under a precedence cascade, settings tokens are
//! substituted, and one flattened document is emitted per deployable
//! unit, plus a synthesized cluster-wide aggregate unit and an
//! access-control project.

pub mod addons;
pub mod config;
pub mod context;
pub mod fallback;
pub mod generate;
pub mod merge;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod view;

pub use context::EnvContext;
pub use pipeline::{check, run, RunError, RunOptions};
pub use render::Renderer;
