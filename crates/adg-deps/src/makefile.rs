//! Emission of the `make` dependency rule.
//!
//! The quoting follows GNU make: a space or tab preceded by 2N+1
//! backslashes stands for N literal backslashes and a space; 2N
//! backslashes before the end of a name stand for N literal backslashes;
//! backslashes anywhere else are not doubled; `$` doubles to `$$`. The
//! characters `\n%*?[\\~` are mishandled by assorted make versions and
//! there is no portable quoting for them, so they pass through untouched.

use std::fs;

use bstr::BString;

use crate::tracker::DependencyTracker;
use crate::{DepsError, Result};

/// Column limit for the emitted rule.
const MAX_COLUMNS: usize = 72;

/// Quote one token for a make rule. An embedded NUL ends the token.
fn quote_token(token: &[u8]) -> BString {
    let mut out = Vec::with_capacity(token.len());
    let mut i = 0;
    loop {
        let c = token.get(i).copied().unwrap_or(0);
        match c {
            0 | b' ' | b'\t' => {
                // One extra backslash per backslash immediately preceding
                // the whitespace (or the end of the token).
                let mut run = i;
                while run > 0 && token[run - 1] == b'\\' {
                    out.push(b'\\');
                    run -= 1;
                }
                if c == 0 {
                    break;
                }
                out.push(b'\\');
                out.push(c);
            }
            b'$' => {
                out.push(b'$');
                out.push(b'$');
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out.into()
}

/// Accumulates one rule, wrapping at [`MAX_COLUMNS`].
struct RuleWriter {
    buf: BString,
    column: usize,
}

impl RuleWriter {
    fn new() -> Self {
        Self {
            buf: BString::from(""),
            column: 0,
        }
    }

    /// Append a token. `spacer` is `b':'` for the rule target (emitted
    /// after the token) or `b' '` for a prerequisite (emitted before it,
    /// and swallowed right after a wrap).
    fn push_token(&mut self, token: &[u8], spacer: u8) {
        let quoted = quote_token(token);
        if quoted.is_empty() {
            return;
        }

        let mut spacer = spacer;
        // Reserve one column for the spacer and two for the ` \` of a
        // continuation line.
        if self.column > 0 && MAX_COLUMNS - 1 - 2 < self.column + quoted.len() {
            self.buf.extend_from_slice(b" \\\n ");
            self.column = 0;
            if spacer == b' ' {
                spacer = 0;
            }
        }

        if spacer == b' ' {
            self.buf.push(spacer);
            self.column += 1;
        }

        self.buf.extend_from_slice(&quoted);
        self.column += quoted.len();

        if spacer == b':' {
            self.buf.push(spacer);
            self.column += 1;
        }
    }

    fn finish(mut self) -> BString {
        self.buf.push(b'\n');
        self.buf
    }
}

impl DependencyTracker {
    /// Write the dependency rule `target: dep1 dep2 …` to the configured
    /// output path. A no-op when no output path was set.
    ///
    /// The rule is rendered in memory and written in one step, so an I/O
    /// failure leaves no partial rule behind.
    pub fn print_dependencies(&self, target: impl AsRef<[u8]>) -> Result<()> {
        let Some(path) = &self.dep_output else {
            return Ok(());
        };

        let mut writer = RuleWriter::new();
        writer.push_token(target.as_ref(), b':');
        for dep in &self.deps {
            writer.push_token(dep, b' ');
        }

        fs::write(path, writer.finish()).map_err(|source| DepsError::MakeOutput {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(token: &[u8]) -> Vec<u8> {
        quote_token(token).into()
    }

    #[test]
    fn plain_tokens_pass_through() {
        assert_eq!(quoted(b"a.s"), b"a.s");
        assert_eq!(quoted(b"dir/sub/file.inc"), b"dir/sub/file.inc");
    }

    #[test]
    fn dollar_doubles() {
        assert_eq!(quoted(b"$x"), b"$$x");
        assert_eq!(quoted(b"a$b$c"), b"a$$b$$c");
    }

    #[test]
    fn space_is_escaped() {
        assert_eq!(quoted(b"a b"), b"a\\ b");
        assert_eq!(quoted(b"a\tb"), b"a\\\tb");
    }

    #[test]
    fn backslashes_before_space_become_2n_plus_1() {
        // a, backslash, space, b: one preceding backslash becomes three.
        assert_eq!(quoted(b"a\\ b"), b"a\\\\\\ b");
        // two preceding backslashes become five.
        assert_eq!(quoted(b"a\\\\ b"), b"a\\\\\\\\\\ b");
    }

    #[test]
    fn trailing_backslashes_double() {
        assert_eq!(quoted(b"a\\"), b"a\\\\");
        assert_eq!(quoted(b"a\\\\"), b"a\\\\\\\\");
    }

    #[test]
    fn backslashes_elsewhere_are_untouched() {
        assert_eq!(quoted(b"a\\b"), b"a\\b");
    }

    #[test]
    fn nul_terminates_token() {
        assert_eq!(quoted(b"ab\0cd"), b"ab");
        assert_eq!(quoted(b"ab\\\0cd"), b"ab\\\\");
    }

    #[test]
    fn hazard_characters_pass_through_unquoted() {
        assert_eq!(quoted(b"a%b*c?d[e~f"), b"a%b*c?d[e~f");
    }

    fn rule_for(target: &[u8], deps: &[&[u8]]) -> BString {
        let mut writer = RuleWriter::new();
        writer.push_token(target, b':');
        for dep in deps {
            writer.push_token(dep, b' ');
        }
        writer.finish()
    }

    #[test]
    fn short_rule_stays_on_one_line() {
        assert_eq!(
            rule_for(b"out.o", &[b"a.s".as_slice(), b"b.s".as_slice()]),
            "out.o: a.s b.s\n"
        );
    }

    #[test]
    fn long_rule_wraps_with_continuation() {
        let a = [b'a'; 40];
        let b = [b'b'; 40];
        let got = rule_for(b"o", &[a.as_slice(), b.as_slice(), b"c".as_slice()]);
        let expected = format!(
            "o: {} \\\n {} c\n",
            "a".repeat(40),
            "b".repeat(40)
        );
        assert_eq!(got, expected.as_bytes());
    }

    #[test]
    fn wrapped_lines_fit_in_the_column_limit() {
        let deps: Vec<Vec<u8>> = (0..30).map(|i| format!("dep{i:02}.s").into_bytes()).collect();
        let dep_refs: Vec<&[u8]> = deps.iter().map(|d| d.as_slice()).collect();
        let rule = rule_for(b"out.o", &dep_refs);
        for line in rule.split(|&b| b == b'\n') {
            assert!(line.len() <= MAX_COLUMNS, "line too long: {}", line.len());
        }
    }

    #[test]
    fn wrap_swallows_leading_space_after_continuation() {
        let a = [b'a'; 40];
        let b = [b'b'; 40];
        let rule = rule_for(b"o", &[a.as_slice(), b.as_slice()]);
        // After ` \<LF> ` the dependency follows the single indent space
        // directly, with no extra spacer.
        let text = rule.to_string();
        let second_line = text.split('\n').nth(1).unwrap();
        assert!(second_line.starts_with(&format!(" {}", "b".repeat(40))));
        assert!(!second_line.starts_with(&format!("  {}", "b".repeat(40))));
    }

    #[test]
    fn quoted_tokens_count_their_emitted_length() {
        // 35 source bytes quote to 70 ('$' doubles): too wide to share a
        // line with the target, so the writer wraps before it.
        let wide = [b'$'; 35];
        let rule = rule_for(b"o", &[wide.as_slice()]);
        assert_eq!(
            rule.to_string(),
            format!("o: \\\n {}\n", "$$".repeat(35))
        );
    }

    #[test]
    fn empty_target_and_deps_still_terminate() {
        assert_eq!(rule_for(b"", &[]), "\n");
    }
}
