//! Typed requirements statements
//!
//! One [`Statement`] per logical line, kept in source order. Order matters
//! downstream: public/private sections and target macro folding both depend
//! on it.

use crate::value::ConditionalValue;
use serde::Serialize;
use std::fmt;

/// Switch marking a `use` as runtime-only
pub const NO_AUTO_IMPORTS: &str = "-no_auto_imports";

/// Visibility section a `use` statement was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// `use <package> [version] [path] [switches...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsePkg {
    pub package: String,
    pub version: Option<String>,
    pub path: Option<String>,
    pub switches: Vec<String>,
    /// Resolved from the enclosing public/private section
    pub visibility: Visibility,
}

impl UsePkg {
    /// Package name joined with its path prefix (`Control/AthenaKernel`)
    pub fn qualified_name(&self) -> String {
        match self.path.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix.trim_end_matches('/'), self.package)
            }
            _ => self.package.clone(),
        }
    }

    /// Runtime-only dependency (`-no_auto_imports`)
    pub fn is_runtime(&self) -> bool {
        self.switches.iter().any(|s| s == NO_AUTO_IMPORTS)
    }
}

/// `pattern [-switch] <name> <template...>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub name: String,
    pub switches: Vec<String>,
    pub definition: String,
}

/// `apply_pattern [-switch] <name> [args...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyPattern {
    pub name: String,
    pub switches: Vec<String>,
    /// Bare words or `key=value` pairs, verbatim
    pub args: Vec<String>,
}

impl ApplyPattern {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            switches: Vec::new(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnorePattern {
    pub name: String,
}

/// `tag <name> [tags...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub content: Vec<String>,
}

/// `apply_tag [-switch] <name> [args...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyTag {
    pub name: String,
    pub switches: Vec<String>,
    pub args: Vec<String>,
}

/// `tag_exclude <name> [tags...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagExclude {
    pub name: String,
    pub excluded: Vec<String>,
}

/// `library` or `application` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDecl {
    pub name: String,
    /// Source words as written, switches included
    pub sources: Vec<String>,
}

/// `document <generator> <name> [-group=g] [-s=dir] [switches...] [sources...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub generator: String,
    pub name: String,
    pub group: Option<String>,
    pub source_dir: Option<String>,
    pub switches: Vec<String>,
    pub sources: Vec<String>,
}

/// `cmtpath_pattern` / `cmtpath_pattern_reverse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmtPathPattern {
    pub reverse: bool,
    pub command: Vec<String>,
}

/// `make_fragment <name> [switches...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakeFragment {
    pub name: String,
    pub switches: Vec<String>,
}

/// A parsed requirements statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Package(String),
    Author(String),
    Manager(String),
    Version(String),
    Use(UsePkg),
    Macro(ConditionalValue),
    MacroAppend(ConditionalValue),
    MacroPrepend(ConditionalValue),
    MacroRemove(ConditionalValue),
    Path(ConditionalValue),
    PathAppend(ConditionalValue),
    PathPrepend(ConditionalValue),
    PathRemove(ConditionalValue),
    SetEnv(ConditionalValue),
    SetAppend(ConditionalValue),
    SetRemove(ConditionalValue),
    Alias(ConditionalValue),
    Action(ConditionalValue),
    Pattern(Pattern),
    ApplyPattern(ApplyPattern),
    IgnorePattern(IgnorePattern),
    Tag(Tag),
    ApplyTag(ApplyTag),
    TagExclude(TagExclude),
    Library(TargetDecl),
    Application(TargetDecl),
    Document(Document),
    IncludeDirs(Vec<String>),
    IncludePaths(Vec<String>),
    CmtPathPattern(CmtPathPattern),
    MakeFragment(MakeFragment),
    BeginPrivate,
    EndPrivate,
    BeginPublic,
    EndPublic,
}

impl Statement {
    /// Directive keyword the statement was parsed from
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Package(_) => "package",
            Self::Author(_) => "author",
            Self::Manager(_) => "manager",
            Self::Version(_) => "version",
            Self::Use(_) => "use",
            Self::Macro(_) => "macro",
            Self::MacroAppend(_) => "macro_append",
            Self::MacroPrepend(_) => "macro_prepend",
            Self::MacroRemove(_) => "macro_remove",
            Self::Path(_) => "path",
            Self::PathAppend(_) => "path_append",
            Self::PathPrepend(_) => "path_prepend",
            Self::PathRemove(_) => "path_remove",
            Self::SetEnv(_) => "set",
            Self::SetAppend(_) => "set_append",
            Self::SetRemove(_) => "set_remove",
            Self::Alias(_) => "alias",
            Self::Action(_) => "action",
            Self::Pattern(_) => "pattern",
            Self::ApplyPattern(_) => "apply_pattern",
            Self::IgnorePattern(_) => "ignore_pattern",
            Self::Tag(_) => "tag",
            Self::ApplyTag(_) => "apply_tag",
            Self::TagExclude(_) => "tag_exclude",
            Self::Library(_) => "library",
            Self::Application(_) => "application",
            Self::Document(_) => "document",
            Self::IncludeDirs(_) => "include_dirs",
            Self::IncludePaths(_) => "include_path",
            Self::CmtPathPattern(p) if p.reverse => "cmtpath_pattern_reverse",
            Self::CmtPathPattern(_) => "cmtpath_pattern",
            Self::MakeFragment(_) => "make_fragment",
            Self::BeginPrivate => "private",
            Self::EndPrivate => "end_private",
            Self::BeginPublic => "public",
            Self::EndPublic => "end_public",
        }
    }

    /// Conditional value carried by macro, path, set, alias and action statements
    pub fn conditional_value(&self) -> Option<&ConditionalValue> {
        match self {
            Self::Macro(v)
            | Self::MacroAppend(v)
            | Self::MacroPrepend(v)
            | Self::MacroRemove(v)
            | Self::Path(v)
            | Self::PathAppend(v)
            | Self::PathPrepend(v)
            | Self::PathRemove(v)
            | Self::SetEnv(v)
            | Self::SetAppend(v)
            | Self::SetRemove(v)
            | Self::Alias(v)
            | Self::Action(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the statement only opens or closes a visibility section
    pub fn is_section_marker(&self) -> bool {
        matches!(
            self,
            Self::BeginPrivate | Self::EndPrivate | Self::BeginPublic | Self::EndPublic
        )
    }
}
