//! Target macro folding
//!
//! Macros named after a target (`Foolinkopts`, `Foo_cxxflags`, ...) are
//! filed under that target and folded into its link and compile flag
//! lists. Only untagged macros are folded; a tag-conditioned one stays in
//! the package configuration so it can be rendered per tag.
//!
//! Folding order does not depend on how the macros are interleaved in the
//! source: plain `macro` statements first, then `macro_append`, then
//! `macro_remove`. Inside each group the suffix table order applies, then
//! source order.

use crate::targets::BuildTarget;
use cmtport_syntax::{ConditionalValue, Statement};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// How a target macro modifies its destination list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MacroOp {
    Set,
    Append,
    Remove,
}

/// A macro filed under a target, with its index in the statement list
#[derive(Debug, Clone, Copy)]
pub struct TargetMacro<'a> {
    pub index: usize,
    pub op: MacroOp,
    pub value: &'a ConditionalValue,
}

/// Target-scoped macros keyed by target name
#[derive(Debug, Default)]
pub struct MacroBuckets<'a> {
    buckets: HashMap<String, Vec<TargetMacro<'a>>>,
}

impl<'a> MacroBuckets<'a> {
    /// File every `macro`/`macro_append`/`macro_remove` whose name starts
    /// with a target name under each such target
    pub fn collect(statements: &'a [Statement], targets: &[&str]) -> Self {
        let mut buckets: HashMap<String, Vec<TargetMacro<'a>>> = HashMap::new();

        for (index, stmt) in statements.iter().enumerate() {
            let (op, value) = match stmt {
                Statement::Macro(v) => (MacroOp::Set, v),
                Statement::MacroAppend(v) => (MacroOp::Append, v),
                Statement::MacroRemove(v) => (MacroOp::Remove, v),
                _ => continue,
            };
            for target in targets.iter().filter(|t| value.name().starts_with(**t)) {
                buckets
                    .entry((*target).to_string())
                    .or_default()
                    .push(TargetMacro { index, op, value });
            }
        }

        Self { buckets }
    }

    /// Macros filed under `target`, in source order
    pub fn for_target(&self, target: &str) -> &[TargetMacro<'a>] {
        self.buckets.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Uses,
    CxxFlags,
    CFlags,
}

/// Recognized target macro suffixes
const SUFFIXES: &[(&str, Destination, fn(&str) -> String)] = &[
    ("linkopts", Destination::Uses, link_token),
    ("_shlibflags", Destination::Uses, link_token),
    ("_pp_cppflags", Destination::CxxFlags, str::to_string),
    ("_cxxflags", Destination::CxxFlags, str::to_string),
    ("_cflags", Destination::CFlags, str::to_string),
];

fn make_var_pattern() -> &'static Option<Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\(([^()]*)\)").ok())
}

/// `-lfoo` → `foo`, `$(name)` → `${name}`
pub fn link_token(token: &str) -> String {
    let token = token.strip_prefix("-l").unwrap_or(token);
    match make_var_pattern() {
        Some(re) => re
            .replace_all(token, |caps: &Captures<'_>| format!("${{{}}}", &caps[1]))
            .into_owned(),
        None => token.to_string(),
    }
}

fn destination<'t>(target: &'t mut BuildTarget, dest: Destination) -> &'t mut Vec<String> {
    match dest {
        Destination::Uses => &mut target.uses,
        Destination::CxxFlags => &mut target.cxx_flags,
        Destination::CFlags => &mut target.c_flags,
    }
}

/// Fold the qualifying macros into `target`
///
/// Returns the statement indices of the folded macros, in folding order.
pub fn fold_target(target: &mut BuildTarget, macros: &[TargetMacro<'_>]) -> Vec<usize> {
    let mut folded = Vec::new();

    for op in [MacroOp::Set, MacroOp::Append, MacroOp::Remove] {
        for (suffix, dest, transform) in SUFFIXES {
            let full_name = format!("{}{}", target.name, suffix);
            let matching = macros
                .iter()
                .filter(|m| m.op == op && !m.value.is_tag_conditioned())
                .filter(|m| m.value.name() == full_name);

            for m in matching {
                let tokens: Vec<String> = m
                    .value
                    .default_value()
                    .split_whitespace()
                    .map(|t| transform(t))
                    .collect();
                let list = destination(target, *dest);
                match op {
                    MacroOp::Set | MacroOp::Append => list.extend(tokens),
                    MacroOp::Remove => list.retain(|t| !tokens.contains(t)),
                }
                log::debug!("folded {} into target {}", m.value.name(), target.name);
                folded.push(m.index);
            }
        }
    }

    folded
}
