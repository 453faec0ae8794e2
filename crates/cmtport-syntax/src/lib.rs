//! CMT requirements syntax
//!
//! Reads `cmt/requirements` files into typed statements:
//! - Logical line assembly (comments, blank lines, `\` continuations)
//! - Quote-aware word tokenization
//! - Directive dispatch into a closed [`Statement`] set
//! - Public/private section tracking for `use` statements

pub mod error;
pub mod lexer;
pub mod parser;
pub mod reqfile;
pub mod statement;
pub mod value;

pub use error::{ReqError, ReqResult};
pub use lexer::{tokenize, QuoteState, Tokenizer};
pub use parser::{is_directive, logical_lines, parse_file, parse_str, LogicalLine, Parser};
pub use reqfile::{ReqFile, REQUIREMENTS_FILE};
pub use statement::{
    ApplyPattern, ApplyTag, CmtPathPattern, Document, IgnorePattern, MakeFragment, Pattern,
    Statement, Tag, TagExclude, TargetDecl, UsePkg, Visibility, NO_AUTO_IMPORTS,
};
pub use value::{Branch, ConditionalValue, DEFAULT_TAG};
