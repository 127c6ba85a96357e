//! Command tokenizer
//!
//! Splits one shell history line into a tree of word groups:
//! - `ls foo | grep bar` becomes `[[ls, foo], [grep, bar]]`
//! - a line with a single stage is flattened: `ls foo` becomes `[ls, foo]`
//! - subshell invocations are unwrapped: `bash -c 'ls foo'` becomes `[ls, foo]`
//!
//! Quoting is delegated to `shlex`; only chain delimiters and subshells are
//! handled here.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Words that start a new stage in a command chain
pub const CHAIN_DELIMITERS: &[&str] = &[";", "|", "&&"];

/// The flag that turns the preceding shell into a subshell invocation
pub const SUBSHELL_FLAG: &str = "-c";

/// Programs that run their `-c` argument as a full command line
static SUBSHELL_PROGRAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bash", "sh", "zsh", "csh", "tcsh", "ksh", "dash", "runuser", "sudo",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("malformed quoting in command: {0}")]
    MalformedQuoting(String),
}

/// A node of the token tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Group(Vec<Token>),
}

impl Token {
    /// Build a group of plain words
    pub fn words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Token::Group(words.into_iter().map(|w| Token::Word(w.into())).collect())
    }

    /// Number of top-level members (a word counts as one)
    pub fn len(&self) -> usize {
        match self {
            Token::Word(_) => 1,
            Token::Group(members) => members.len(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A group is a leaf once every member is a plain word
    pub fn is_leaf(&self) -> bool {
        match self {
            Token::Word(_) => false,
            Token::Group(members) => members.iter().all(|m| matches!(m, Token::Word(_))),
        }
    }

    /// Flatten the tree into its leaf groups, in left-to-right order
    ///
    /// A bare word becomes a group of its own.
    pub fn leaf_groups(&self) -> Vec<Vec<String>> {
        let mut groups = Vec::new();
        collect_leaf_groups(self, &mut groups);
        groups
    }
}

fn collect_leaf_groups(token: &Token, out: &mut Vec<Vec<String>>) {
    match token {
        Token::Word(word) => out.push(vec![word.clone()]),
        Token::Group(members) if token.is_leaf() => out.push(
            members
                .iter()
                .filter_map(|m| match m {
                    Token::Word(w) => Some(w.clone()),
                    Token::Group(_) => None,
                })
                .collect(),
        ),
        Token::Group(members) => {
            for member in members {
                collect_leaf_groups(member, out);
            }
        }
    }
}

/// Tokenize a command line into a token tree
pub fn tokenize(line: &str) -> Result<Token, TokenizeError> {
    let padded = pad_delimiters(line);
    let words = shlex::split(&padded)
        .ok_or_else(|| TokenizeError::MalformedQuoting(line.trim_end().to_string()))?;

    let stages = split_stages(words);
    let mut members = Vec::with_capacity(stages.len());
    let mut subshell_seen = false;

    for stage in stages {
        if !subshell_seen {
            if let Some(pos) = find_subshell_position(&stage) {
                subshell_seen = true;
                debug!("unwrapping subshell: {:?}", stage[pos]);
                match tokenize(&stage[pos]) {
                    Ok(inner) => members.push(inner),
                    // only the subshell is lost, the other stages still count
                    Err(e) => {
                        debug!("skipping subshell: {}", e);
                        members.push(Token::Group(Vec::new()));
                    }
                }
                continue;
            }
        }
        members.push(Token::words(stage));
    }

    // [[ls, foo]] is returned as [ls, foo]
    if members.len() == 1 {
        if let Some(only) = members.pop() {
            return Ok(only);
        }
    }
    Ok(Token::Group(members))
}

/// Surround chain delimiters outside of quotes with spaces
///
/// `a;b` and `a ; b` lex identically afterwards, quoted text is left alone.
pub fn pad_delimiters(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut chars = line.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_single => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '\'' if !in_double => {
                in_single = !in_single;
                out.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                out.push(c);
            }
            ';' | '|' if !in_single && !in_double => {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            '&' if !in_single && !in_double && chars.peek() == Some(&'&') => {
                chars.next();
                out.push_str(" && ");
            }
            _ => out.push(c),
        }
    }

    out
}

/// Split a flat word list at chain delimiters, dropping empty stages
fn split_stages(words: Vec<String>) -> Vec<Vec<String>> {
    let mut stages = Vec::new();
    let mut current = Vec::new();

    for word in words {
        if CHAIN_DELIMITERS.contains(&word.as_str()) {
            if !current.is_empty() {
                stages.push(std::mem::take(&mut current));
            }
        } else {
            current.push(word);
        }
    }

    if !current.is_empty() {
        stages.push(current);
    }
    stages
}

/// Position of the command string passed to a subshell, if any
///
/// Looks for `<shell> -c <command>`; only the first occurrence counts.
fn find_subshell_position(words: &[String]) -> Option<usize> {
    let mut pos = 0;
    let mut expect_command = false;

    while pos < words.len() {
        let word = words[pos].as_str();
        if SUBSHELL_PROGRAMS.contains(word) {
            expect_command = words.get(pos + 1).map(String::as_str) == Some(SUBSHELL_FLAG);
            if expect_command {
                pos += 1;
            }
        } else if expect_command {
            return Some(pos);
        }
        pos += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn groups(stages: &[&[&str]]) -> Token {
        Token::Group(stages.iter().map(|s| Token::words(s.iter().copied())).collect())
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(
            tokenize("ls -la /path/to/dir").unwrap(),
            Token::words(["ls", "-la", "/path/to/dir"])
        );
    }

    #[test]
    fn test_chain_with_semicolon() {
        let expected = groups(&[&["sudo", "rm", "-rf", "/"], &["mv", "/dessen/file4", "../"]]);
        assert_eq!(tokenize("sudo rm -rf /;mv /dessen/file4 ../").unwrap(), expected);
        assert_eq!(tokenize("sudo rm -rf / ; mv /dessen/file4 ../").unwrap(), expected);
        assert_eq!(tokenize("sudo rm -rf /; mv /dessen/file4 ../").unwrap(), expected);
    }

    #[test]
    fn test_trailing_semicolon_is_dropped() {
        assert_eq!(
            tokenize("sudo rm -rf /;").unwrap(),
            Token::words(["sudo", "rm", "-rf", "/"])
        );
    }

    #[test]
    fn test_chain_with_pipe_and_and() {
        assert_eq!(
            tokenize("sudo cat myfile | grep -i /dessen/file4").unwrap(),
            groups(&[&["sudo", "cat", "myfile"], &["grep", "-i", "/dessen/file4"]])
        );
        assert_eq!(
            tokenize("make&&cp out.bin /tmp").unwrap(),
            groups(&[&["make"], &["cp", "out.bin", "/tmp"]])
        );
        assert_eq!(
            tokenize("test -f a || touch a").unwrap(),
            groups(&[&["test", "-f", "a"], &["touch", "a"]])
        );
    }

    #[test]
    fn test_many_stages() {
        assert_eq!(
            tokenize("sudo rm -rf /;mv /dessen/file4 ../;cat;echo gil").unwrap(),
            groups(&[
                &["sudo", "rm", "-rf", "/"],
                &["mv", "/dessen/file4", "../"],
                &["cat"],
                &["echo", "gil"],
            ])
        );
    }

    #[test]
    fn test_quotes_keep_words_together() {
        assert_eq!(
            tokenize(r#"echo "hello world""#).unwrap(),
            Token::words(["echo", "hello world"])
        );
        assert_eq!(
            tokenize("grep 'a|b;c' notes.txt").unwrap(),
            Token::words(["grep", "a|b;c", "notes.txt"])
        );
    }

    #[test]
    fn test_subshells() {
        for shell in ["bash", "sh", "zsh", "csh", "tcsh", "ksh", "dash", "runuser"] {
            let line = format!("{} -c 'ls /path/to/file.txt'", shell);
            assert_eq!(
                tokenize(&line).unwrap(),
                Token::words(["ls", "/path/to/file.txt"]),
                "{}",
                shell
            );
        }
    }

    #[test]
    fn test_subshell_with_chain() {
        assert_eq!(
            tokenize("bash -c 'ls /path/to/file; cat gil | grep foo'").unwrap(),
            groups(&[&["ls", "/path/to/file"], &["cat", "gil"], &["grep", "foo"]])
        );
        assert_eq!(
            tokenize(r#"bash -c 'echo "nested quote" && ls /path'"#).unwrap(),
            groups(&[&["echo", "nested quote"], &["ls", "/path"]])
        );
    }

    #[test]
    fn test_malformed_subshell_keeps_other_stages() {
        let tree = tokenize(r#"vim /etc/hosts; sh -c 'cat "unterminated'"#).unwrap();
        assert_eq!(
            tree,
            Token::Group(vec![Token::words(["vim", "/etc/hosts"]), Token::Group(vec![])])
        );
        assert_eq!(
            tree.leaf_groups(),
            vec![vec!["vim".to_string(), "/etc/hosts".to_string()], vec![]]
        );

        let only = tokenize(r#"bash -c 'cat "unterminated'"#).unwrap();
        assert!(only.is_empty());
    }

    #[test]
    fn test_nested_subshell() {
        let line = r#"bash -c 'ls /path/to/file; bash -c "ls gil; cat dessen | grep foo"'"#;
        let expected = Token::Group(vec![
            Token::words(["ls", "/path/to/file"]),
            groups(&[&["ls", "gil"], &["cat", "dessen"], &["grep", "foo"]]),
        ]);
        assert_eq!(tokenize(line).unwrap(), expected);
    }

    #[test]
    fn test_subshell_after_prefix() {
        assert_eq!(
            tokenize("sudo bash -c 'vim /etc/hosts'").unwrap(),
            Token::words(["vim", "/etc/hosts"])
        );
    }

    #[test]
    fn test_only_first_subshell_is_unwrapped() {
        assert_eq!(
            tokenize("sh -c 'ls a'; sh -c 'ls b'").unwrap(),
            Token::Group(vec![Token::words(["ls", "a"]), Token::words(["sh", "-c", "ls b"])])
        );
    }

    #[test]
    fn test_unquoted_subshell_argument() {
        assert_eq!(tokenize("sh -c ls /path/to/file").unwrap(), Token::words(["ls"]));
    }

    #[test]
    fn test_minus_c_on_other_programs() {
        assert_eq!(
            tokenize("other -c ls /path/to/file").unwrap(),
            Token::words(["other", "-c", "ls", "/path/to/file"])
        );
    }

    #[test]
    fn test_malformed_quoting() {
        assert!(matches!(
            tokenize("bash -c 'ls /path/to/file"),
            Err(TokenizeError::MalformedQuoting(_))
        ));
        assert!(tokenize(r#"cat "unterminated"#).is_err());
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(tokenize("   ").unwrap(), Token::Group(vec![]));
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_leaf_groups() {
        let tree = Token::Group(vec![
            Token::words(["ls", "/path/to/file"]),
            groups(&[&["ls", "gil"], &["cat", "dessen"]]),
        ]);
        assert_eq!(
            tree.leaf_groups(),
            vec![
                vec!["ls".to_string(), "/path/to/file".to_string()],
                vec!["ls".to_string(), "gil".to_string()],
                vec!["cat".to_string(), "dessen".to_string()],
            ]
        );
        assert_eq!(
            Token::words(["vim", "a"]).leaf_groups(),
            vec![vec!["vim".to_string(), "a".to_string()]]
        );
    }

    #[test]
    fn test_pad_delimiters() {
        assert_eq!(pad_delimiters("a;b"), "a ; b");
        assert_eq!(pad_delimiters("a&&b"), "a && b");
        assert_eq!(pad_delimiters("'a;b'"), "'a;b'");
        assert_eq!(pad_delimiters(r"a\;b"), r"a\;b");
    }
}
