//! UI module for the sccscope TUI
//!
//! This module provides the terminal user interface for browsing
//! depth-first forests together with their component structure.

mod app;
pub mod tree;

pub use app::{run_app, App};
pub use tree::{ExplorerTree, TreeNode};
