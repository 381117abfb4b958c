//! Reduction rules for path-reducer.
//!
//! This module handles:
//! - Rule definition: pattern, hint and contextual pre-check
//! - Rewrite strategies applied to each match
//! - The built-in rule set and compilation of configured rules

pub mod builtin;
pub mod matcher;
pub mod rewriter;

pub use builtin::builtin_rules;
pub use matcher::{PatternRule, PreCheck, compile_rule, compile_rules, has_hex_run};
pub use rewriter::{Rewrite, RewriteContext};
