//! `key=value` pattern arguments

use crate::converters::PatternContext;
use crate::error::{ConvertError, ConvertResult};
use cmtport_syntax::ApplyPattern;
use std::collections::HashMap;

/// Split one `key=value` argument
///
/// The split happens on the first `=`. One leading `"` (with its closing
/// `"`, when present) and one leading `../` are stripped from the value.
pub fn split_arg(arg: &str) -> Result<(&str, &str), &'static str> {
    let (key, value) = arg.split_once('=').ok_or("missing '='")?;
    if key.is_empty() {
        return Err("empty key");
    }
    if value.is_empty() {
        return Err("empty value");
    }
    let value = match value.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner),
        None => value,
    };
    let value = value.strip_prefix("../").unwrap_or(value);
    Ok((key, value))
}

/// Parsed arguments of one `apply_pattern`
#[derive(Debug, Clone, Default)]
pub struct PatternArgs {
    values: HashMap<String, String>,
}

impl PatternArgs {
    /// Parse every argument of `stmt`; a later key overrides an earlier one
    pub fn parse(ctx: &PatternContext<'_>, stmt: &ApplyPattern) -> ConvertResult<Self> {
        let mut values = HashMap::with_capacity(stmt.args.len());
        for arg in &stmt.args {
            let (key, value) = split_arg(arg)
                .map_err(|reason| ConvertError::malformed(&stmt.name, ctx.package, arg, reason))?;
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of `key`, or the empty string
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
