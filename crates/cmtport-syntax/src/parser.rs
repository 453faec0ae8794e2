//! Statement parser
//!
//! Turns requirements text into an ordered [`Statement`] list. Physical lines
//! are first folded into logical lines (comments and blank lines dropped,
//! backslash continuations joined), each logical line is tokenized, and its
//! first word is dispatched through a fixed directive table.

use crate::error::{ReqError, ReqResult};
use crate::lexer::tokenize;
use crate::reqfile::ReqFile;
use crate::statement::{
    ApplyPattern, ApplyTag, CmtPathPattern, Document, IgnorePattern, MakeFragment, Pattern,
    Statement, Tag, TagExclude, TargetDecl, UsePkg, Visibility,
};
use crate::value::ConditionalValue;
use std::fs;
use std::path::{Path, PathBuf};

/// A logical line and the physical line number it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub number: usize,
    pub text: String,
}

/// Fold physical lines into logical lines
///
/// Comment lines (`#` as first non-blank character) and blank lines are
/// dropped, even inside a continuation. A line ending in an unescaped `\` is
/// joined to the next one with a single space.
pub fn logical_lines(source: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (body, continued) = split_continuation(line);
        let entry = pending.get_or_insert_with(|| LogicalLine {
            number: idx + 1,
            text: String::new(),
        });
        if !body.is_empty() {
            if !entry.text.is_empty() {
                entry.text.push(' ');
            }
            entry.text.push_str(body);
        }

        if !continued {
            if let Some(done) = pending.take() {
                if !done.text.is_empty() {
                    lines.push(done);
                }
            }
        }
    }

    if let Some(done) = pending {
        if !done.text.is_empty() {
            lines.push(done);
        }
    }
    lines
}

fn split_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        (line[..line.len() - 1].trim_end(), true)
    } else {
        (line, false)
    }
}

/// Why a single line failed to parse, before file context is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineIssue {
    Missing(&'static str),
}

type LineResult<T> = Result<T, LineIssue>;

/// Words of one logical line after the directive
struct Args<'a> {
    words: &'a [String],
}

impl<'a> Args<'a> {
    fn required(&self, idx: usize, what: &'static str) -> LineResult<&'a str> {
        self.words
            .get(idx)
            .map(String::as_str)
            .ok_or(LineIssue::Missing(what))
    }

    fn get(&self, idx: usize) -> Option<&'a str> {
        self.words.get(idx).map(String::as_str)
    }

    fn rest(&self, idx: usize) -> &'a [String] {
        self.words.get(idx..).unwrap_or(&[])
    }

    fn non_empty_rest(&self, idx: usize, what: &'static str) -> LineResult<Vec<String>> {
        let rest = self.rest(idx);
        if rest.is_empty() {
            return Err(LineIssue::Missing(what));
        }
        Ok(rest.to_vec())
    }
}

/// Parse function for one directive; `None` means the line is discarded
type DirectiveFn = fn(&Args<'_>, Visibility) -> LineResult<Option<Statement>>;

/// Keyword → parse function, fixed at compile time
const DIRECTIVES: &[(&str, DirectiveFn)] = &[
    ("package", |a, _| Ok(Some(Statement::Package(a.required(1, "name")?.to_string())))),
    ("author", |a, _| Ok(Some(Statement::Author(a.non_empty_rest(1, "name")?.join(" "))))),
    ("manager", |a, _| Ok(Some(Statement::Manager(a.non_empty_rest(1, "name")?.join(" "))))),
    ("version", |a, _| Ok(Some(Statement::Version(a.required(1, "version")?.to_string())))),
    ("use", parse_use),
    ("macro", |a, _| conditional(a).map(|v| Some(Statement::Macro(v)))),
    ("macro_append", |a, _| conditional(a).map(|v| Some(Statement::MacroAppend(v)))),
    ("macro_prepend", |a, _| conditional(a).map(|v| Some(Statement::MacroPrepend(v)))),
    ("macro_remove", |a, _| conditional(a).map(|v| Some(Statement::MacroRemove(v)))),
    ("path", |a, _| conditional(a).map(|v| Some(Statement::Path(v)))),
    ("path_append", |a, _| conditional(a).map(|v| Some(Statement::PathAppend(v)))),
    ("path_prepend", |a, _| conditional(a).map(|v| Some(Statement::PathPrepend(v)))),
    ("path_remove", |a, _| conditional(a).map(|v| Some(Statement::PathRemove(v)))),
    ("set", |a, _| conditional(a).map(|v| Some(Statement::SetEnv(v)))),
    ("set_append", |a, _| conditional(a).map(|v| Some(Statement::SetAppend(v)))),
    ("set_remove", |a, _| conditional(a).map(|v| Some(Statement::SetRemove(v)))),
    ("alias", |a, _| conditional(a).map(|v| Some(Statement::Alias(v)))),
    ("action", |a, _| conditional(a).map(|v| Some(Statement::Action(v)))),
    ("pattern", parse_pattern),
    ("apply_pattern", parse_apply_pattern),
    ("ignore_pattern", |a, _| {
        let name = a.required(1, "pattern name")?.to_string();
        Ok(Some(Statement::IgnorePattern(IgnorePattern { name })))
    }),
    ("tag", |a, _| {
        Ok(Some(Statement::Tag(Tag {
            name: a.required(1, "tag name")?.to_string(),
            content: a.rest(2).to_vec(),
        })))
    }),
    ("apply_tag", parse_apply_tag),
    ("tag_exclude", |a, _| {
        Ok(Some(Statement::TagExclude(TagExclude {
            name: a.required(1, "tag name")?.to_string(),
            excluded: a.rest(2).to_vec(),
        })))
    }),
    ("library", |a, _| target_decl(a).map(|t| Some(Statement::Library(t)))),
    ("application", |a, _| target_decl(a).map(|t| Some(Statement::Application(t)))),
    ("document", parse_document),
    ("include_dirs", |a, _| Ok(Some(Statement::IncludeDirs(a.non_empty_rest(1, "directories")?)))),
    ("include_path", |a, _| Ok(Some(Statement::IncludePaths(a.non_empty_rest(1, "path")?)))),
    ("cmtpath_pattern", |a, _| cmtpath_pattern(a, false)),
    ("cmtpath_pattern_reverse", |a, _| cmtpath_pattern(a, true)),
    ("make_fragment", |a, _| {
        Ok(Some(Statement::MakeFragment(MakeFragment {
            name: a.required(1, "fragment name")?.to_string(),
            switches: a.rest(2).to_vec(),
        })))
    }),
    ("private", |_, _| Ok(Some(Statement::BeginPrivate))),
    ("end_private", |_, _| Ok(Some(Statement::EndPrivate))),
    ("public", |_, _| Ok(Some(Statement::BeginPublic))),
    ("end_public", |_, _| Ok(Some(Statement::EndPublic))),
    // Recognized, intentionally discarded
    ("branches", |_, _| Ok(None)),
    ("language", |_, _| Ok(None)),
    ("setup_script", |_, _| Ok(None)),
    ("setup_strategy", |_, _| Ok(None)),
    ("build_strategy", |_, _| Ok(None)),
];

/// Look up the parse function for a directive keyword
fn directive(keyword: &str) -> Option<DirectiveFn> {
    DIRECTIVES
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, parse)| *parse)
}

/// Whether `keyword` is a known directive
pub fn is_directive(keyword: &str) -> bool {
    directive(keyword).is_some()
}

/// `<directive> <name> <default> [tag value]...`
fn conditional(args: &Args<'_>) -> LineResult<ConditionalValue> {
    let name = args.required(1, "name")?;
    let default = args.required(2, "default value")?;
    let mut value = ConditionalValue::new(name, default);

    let pairs = args.rest(3);
    for pair in pairs.chunks(2) {
        match pair {
            [tag, val] => value.set(tag.as_str(), val.as_str()),
            [tag] => log::warn!("'{name}': dropping tag '{tag}' without a value"),
            _ => {}
        }
    }
    Ok(value)
}

fn parse_use(args: &Args<'_>, visibility: Visibility) -> LineResult<Option<Statement>> {
    let package = args.required(1, "package name")?.to_string();

    let mut positional = Vec::new();
    let mut switches = Vec::new();
    for word in args.rest(2) {
        if word.starts_with('-') || positional.len() == 2 {
            switches.push(word.clone());
        } else {
            positional.push(word.clone());
        }
    }
    let mut positional = positional.into_iter();

    Ok(Some(Statement::Use(UsePkg {
        package,
        version: positional.next(),
        path: positional.next(),
        switches,
        visibility,
    })))
}

/// Swap a switch written before the name with the name itself
///
/// `apply_pattern -global foo a=b` is read as `apply_pattern foo -global a=b`.
fn swap_leading_switch(words: &[String]) -> Vec<String> {
    let mut words = words.to_vec();
    if words.len() > 2 && words[1].starts_with('-') {
        words.swap(1, 2);
    }
    words
}

/// Switch words directly after the name, and the index of the first word after them
fn leading_switches(args: &Args<'_>, from: usize) -> (Vec<String>, usize) {
    let switches: Vec<String> = args
        .rest(from)
        .iter()
        .take_while(|w| w.starts_with('-'))
        .cloned()
        .collect();
    let next = from + switches.len();
    (switches, next)
}

fn parse_pattern(args: &Args<'_>, _: Visibility) -> LineResult<Option<Statement>> {
    let words = swap_leading_switch(args.words);
    let args = Args { words: &words };
    let name = args.required(1, "pattern name")?.to_string();
    let (switches, next) = leading_switches(&args, 2);
    Ok(Some(Statement::Pattern(Pattern {
        name,
        switches,
        definition: args.rest(next).join(" "),
    })))
}

fn parse_apply_pattern(args: &Args<'_>, _: Visibility) -> LineResult<Option<Statement>> {
    let words = swap_leading_switch(args.words);
    let args = Args { words: &words };
    let name = args.required(1, "pattern name")?.to_string();
    let (switches, next) = leading_switches(&args, 2);
    Ok(Some(Statement::ApplyPattern(ApplyPattern {
        name,
        switches,
        args: args.rest(next).to_vec(),
    })))
}

fn parse_apply_tag(args: &Args<'_>, _: Visibility) -> LineResult<Option<Statement>> {
    let words = swap_leading_switch(args.words);
    let args = Args { words: &words };
    let name = args.required(1, "tag name")?.to_string();
    let (switches, next) = leading_switches(&args, 2);
    Ok(Some(Statement::ApplyTag(ApplyTag {
        name,
        switches,
        args: args.rest(next).to_vec(),
    })))
}

fn parse_document(args: &Args<'_>, _: Visibility) -> LineResult<Option<Statement>> {
    let words = swap_leading_switch(args.words);
    let args = Args { words: &words };
    let mut doc = Document {
        generator: args.required(1, "generator")?.to_string(),
        name: args.required(2, "document name")?.to_string(),
        group: None,
        source_dir: None,
        switches: Vec::new(),
        sources: Vec::new(),
    };

    for word in args.rest(3) {
        if let Some(group) = word.strip_prefix("-group=") {
            doc.group = Some(group.to_string());
        } else if let Some(dir) = word.strip_prefix("-s=") {
            doc.source_dir = Some(dir.to_string());
        } else if word.starts_with('-') {
            doc.switches.push(word.clone());
        } else {
            doc.sources.push(word.clone());
        }
    }
    Ok(Some(Statement::Document(doc)))
}

fn target_decl(args: &Args<'_>) -> LineResult<TargetDecl> {
    Ok(TargetDecl {
        name: args.required(1, "target name")?.to_string(),
        sources: args.rest(2).to_vec(),
    })
}

fn cmtpath_pattern(args: &Args<'_>, reverse: bool) -> LineResult<Option<Statement>> {
    Ok(Some(Statement::CmtPathPattern(CmtPathPattern {
        reverse,
        command: args.non_empty_rest(1, "command")?,
    })))
}

/// Statement parser for one requirements file
pub struct Parser {
    req: ReqFile,
    /// Visibility sections; the bottom entry is the implicit public section
    context: Vec<Visibility>,
}

impl Parser {
    /// Create a parser for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            req: ReqFile::new(path),
            context: vec![Visibility::Public],
        }
    }

    /// Visibility of the innermost open section
    pub fn visibility(&self) -> Visibility {
        self.context.last().copied().unwrap_or(Visibility::Public)
    }

    /// Parse one logical line and append its statement
    pub fn parse_line(&mut self, line: &LogicalLine) -> ReqResult<()> {
        let words = tokenize(&line.text);
        let Some(keyword) = words.first() else {
            return Ok(());
        };

        let parse = directive(keyword).ok_or_else(|| ReqError::UnknownDirective {
            path: self.req.path.clone(),
            line: line.number,
            directive: keyword.clone(),
        })?;

        let args = Args { words: &words };
        let stmt = parse(&args, self.visibility()).map_err(|issue| match issue {
            LineIssue::Missing(what) => ReqError::MissingToken {
                path: self.req.path.clone(),
                line: line.number,
                directive: keyword.clone(),
                what,
            },
        })?;

        if let Some(stmt) = stmt {
            self.track_section(&stmt, line.number)?;
            if let Statement::Package(name) = &stmt {
                self.req.package = name.clone();
            }
            self.req.statements.push(stmt);
        }
        Ok(())
    }

    fn track_section(&mut self, stmt: &Statement, line: usize) -> ReqResult<()> {
        let closes = match stmt {
            Statement::BeginPrivate => {
                self.context.push(Visibility::Private);
                return Ok(());
            }
            Statement::BeginPublic => {
                self.context.push(Visibility::Public);
                return Ok(());
            }
            Statement::EndPrivate => Visibility::Private,
            Statement::EndPublic => Visibility::Public,
            _ => return Ok(()),
        };

        if self.context.len() <= 1 {
            return Err(ReqError::UnbalancedSection {
                path: self.req.path.clone(),
                line,
                directive: stmt.directive().to_string(),
            });
        }
        let open = self.visibility();
        if open != closes {
            return Err(ReqError::MismatchedSection {
                path: self.req.path.clone(),
                line,
                directive: stmt.directive().to_string(),
                open,
            });
        }
        self.context.pop();
        Ok(())
    }

    /// Parse a whole source text
    pub fn parse_source(mut self, source: &str) -> ReqResult<ReqFile> {
        for line in logical_lines(source) {
            self.parse_line(&line)?;
        }
        log::debug!(
            "parsed {} statements from {}",
            self.req.statements.len(),
            self.req.path.display()
        );
        Ok(self.req)
    }
}

/// Parse requirements text attributed to `path`
pub fn parse_str(path: impl Into<PathBuf>, source: &str) -> ReqResult<ReqFile> {
    Parser::new(path).parse_source(source)
}

/// Read and parse the requirements file at `path`
pub fn parse_file(path: &Path) -> ReqResult<ReqFile> {
    let source = fs::read_to_string(path).map_err(|e| ReqError::io(path, e))?;
    parse_str(path, &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_logical_lines_skip_comments_and_blanks() {
        let lines = logical_lines("# header\n\n   package Foo\n  # indented comment\nauthor Me\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LogicalLine { number: 3, text: "package Foo".to_string() });
        assert_eq!(lines[1].number, 5);
    }

    #[test]
    fn test_logical_lines_join_continuations() {
        let lines = logical_lines("macro x \\\n   a \\\n b\nversion v1\n");
        assert_eq!(lines[0].text, "macro x a b");
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].text, "version v1");
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let lines = logical_lines("macro x a\\\\\nversion v1\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "macro x a\\\\");
    }

    #[test]
    fn test_continuation_at_end_of_file() {
        let lines = logical_lines("macro x a \\");
        assert_eq!(lines, vec![LogicalLine { number: 1, text: "macro x a".to_string() }]);
    }

    #[test]
    fn test_swap_leading_switch() {
        assert_eq!(
            swap_leading_switch(&words(&["apply_pattern", "-global", "foo", "a=b"])),
            words(&["apply_pattern", "foo", "-global", "a=b"])
        );
        assert_eq!(
            swap_leading_switch(&words(&["apply_pattern", "foo"])),
            words(&["apply_pattern", "foo"])
        );
    }

    #[test]
    fn test_directive_table_lookup() {
        assert!(is_directive("macro_remove"));
        assert!(is_directive("setup_strategy"));
        assert!(!is_directive("frobnicate"));
    }

    #[test]
    fn test_dangling_tag_is_dropped() {
        let req = parse_str("p/cmt/requirements", "macro x a gcc43").unwrap();
        match &req.statements[0] {
            Statement::Macro(v) => assert_eq!(v.len(), 1),
            other => panic!("unexpected statement {other:?}"),
        }
    }
}
