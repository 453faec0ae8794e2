/// Source list sanitizing for `library`/`application` declarations

/// Directory bare file names are resolved against
pub const DEFAULT_SOURCE_DIR: &str = "src";

const SOURCE_DIR_SWITCH: &str = "-s=";

/// Source words split into real sources and switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedSources {
    pub sources: Vec<String>,
    /// `-xxx` switches other than `-s=<dir>`
    pub switches: Vec<String>,
}

/// Sanitize a list of source words
///
/// A leading `../` is stripped from every word. `-s=<dir>` changes the
/// directory prepended to the following bare file names (names without a
/// `/`); with no `default_dir` bare names stay as written until a `-s=`
/// switch is seen.
pub fn sanitize_sources(words: &[String], default_dir: Option<&str>) -> SanitizedSources {
    let mut out = SanitizedSources::default();
    let mut dir = default_dir.map(str::to_string);

    for word in words {
        let word = strip_parent(word);
        if let Some(new_dir) = word.strip_prefix(SOURCE_DIR_SWITCH) {
            dir = Some(strip_parent(new_dir).trim_end_matches('/').to_string());
            continue;
        }
        if word.starts_with('-') {
            out.switches.push(word.to_string());
            continue;
        }
        match dir.as_deref() {
            Some(d) if !d.is_empty() && !word.contains('/') => {
                out.sources.push(format!("{d}/{word}"));
            }
            _ => out.sources.push(word.to_string()),
        }
    }

    out
}

fn strip_parent(word: &str) -> &str {
    word.strip_prefix("../").unwrap_or(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bare_names_get_default_dir() {
        let out = sanitize_sources(
            &words(&["*.cxx", "../src/x.cxx", "components/*.cxx"]),
            Some(DEFAULT_SOURCE_DIR),
        );
        assert_eq!(out.sources, vec!["src/*.cxx", "src/x.cxx", "components/*.cxx"]);
        assert!(out.switches.is_empty());
    }

    #[test]
    fn test_source_dir_switch_applies_to_following_names() {
        let out = sanitize_sources(
            &words(&["a.cxx", "-s=../components", "b.cxx", "-no_prototypes", "c.cxx"]),
            Some(DEFAULT_SOURCE_DIR),
        );
        assert_eq!(out.sources, vec!["src/a.cxx", "components/b.cxx", "components/c.cxx"]);
        assert_eq!(out.switches, vec!["-no_prototypes"]);
    }

    #[test]
    fn test_no_default_dir() {
        let out = sanitize_sources(&words(&["Foo/FooDict.h", "Bar.h"]), None);
        assert_eq!(out.sources, vec!["Foo/FooDict.h", "Bar.h"]);
    }
}
