//! Tag-conditioned values
//!
//! Macro, path, set, alias and action directives all carry a value that can
//! vary with the active build tags. The first declared value is stored under
//! the `default` key; every following `(tag-expression, value)` pair adds a
//! branch, in declaration order.

use serde::Serialize;

/// Key of the unconditional branch
pub const DEFAULT_TAG: &str = "default";

/// One `(tag-expression, value)` entry of a [`ConditionalValue`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// `default`, or a conjunction of build tags joined by `&`
    pub tag: String,
    /// Literal value selected by the tag expression
    pub value: String,
}

impl Branch {
    /// Individual build tags of the conjunction
    pub fn terms(&self) -> Vec<&str> {
        self.tag
            .split('&')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn is_default(&self) -> bool {
        self.tag == DEFAULT_TAG
    }
}

/// Named value with an ordered set of tag-keyed branches
///
/// Always holds exactly one `default` branch, in first position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalValue {
    name: String,
    branches: Vec<Branch>,
}

impl ConditionalValue {
    /// Create a value with only its default branch
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branches: vec![Branch {
                tag: DEFAULT_TAG.to_string(),
                value: default.into(),
            }],
        }
    }

    /// Builder form of [`ConditionalValue::set`]
    pub fn with_branch(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(tag, value);
        self
    }

    /// Set the value for a tag expression
    ///
    /// A repeated tag expression overwrites the earlier value in place.
    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.branches.iter_mut().find(|b| b.tag == tag) {
            Some(branch) => branch.value = value,
            None => self.branches.push(Branch { tag, value }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.branches[0].value
    }

    /// Value for an exact tag expression
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.branches
            .iter()
            .find(|b| b.tag == tag)
            .map(|b| b.value.as_str())
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Number of branches, the default one included
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Always false: the default branch is always present
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Whether the value depends on build tags
    pub fn is_tag_conditioned(&self) -> bool {
        self.branches.len() > 1
    }
}
