/*!
 * Glob Patterns
 *
 * Redis-style patterns used by HSCAN MATCH:
 * - `*` matches any run of characters, including none
 * - `?` matches exactly one character
 * - `[abc]`, `[a-z]` and `[^abc]` match one character from a class
 * - `\x` matches `x` literally
 *
 * Matching is iterative with single-star backtracking, so it is
 * O(pattern * text) in the worst case.
 */

/// Pattern compiled once and matched against many strings
#[derive(Debug, Clone)]
pub(crate) struct GlobPattern {
    chars: Vec<char>,
}

impl GlobPattern {
    pub(crate) fn new(pattern: &str) -> Self {
        Self {
            chars: pattern.chars().collect(),
        }
    }

    /// True when the whole of `text` matches the pattern
    pub(crate) fn matches(&self, text: &str) -> bool {
        let pat = &self.chars;
        let txt: Vec<char> = text.chars().collect();

        let mut pi = 0;
        let mut ti = 0;
        // position after the last '*' and the text index it was tried at
        let mut star: Option<(usize, usize)> = None;

        while ti < txt.len() {
            let step = match pat.get(pi) {
                Some('*') => {
                    star = Some((pi + 1, ti));
                    pi += 1;
                    continue;
                }
                Some('?') => Some(pi + 1),
                Some('[') => class_match(pat, pi, txt[ti]),
                Some('\\') if pi + 1 < pat.len() => (pat[pi + 1] == txt[ti]).then_some(pi + 2),
                Some(&c) => (c == txt[ti]).then_some(pi + 1),
                None => None,
            };

            match (step, star) {
                (Some(next), _) => {
                    pi = next;
                    ti += 1;
                }
                (None, Some((star_pi, star_ti))) => {
                    // let the last star swallow one more character
                    pi = star_pi;
                    ti = star_ti + 1;
                    star = Some((star_pi, ti));
                }
                (None, None) => return false,
            }
        }

        // trailing stars match the empty remainder
        pat[pi..].iter().all(|&c| c == '*')
    }
}

/// Match `c` against the class starting at `pat[open]`
///
/// Returns the pattern index after the closing `]` on a match. An
/// unterminated class never matches.
fn class_match(pat: &[char], open: usize, c: char) -> Option<usize> {
    let mut j = open + 1;
    let negated = matches!(pat.get(j), Some('^') | Some('!'));
    if negated {
        j += 1;
    }

    let mut hit = false;
    while j < pat.len() && pat[j] != ']' {
        if pat[j] == '\\' && j + 1 < pat.len() {
            hit |= pat[j + 1] == c;
            j += 2;
        } else if j + 2 < pat.len() && pat[j + 1] == '-' && pat[j + 2] != ']' {
            let (lo, hi) = if pat[j] <= pat[j + 2] {
                (pat[j], pat[j + 2])
            } else {
                (pat[j + 2], pat[j])
            };
            hit |= (lo..=hi).contains(&c);
            j += 3;
        } else {
            hit |= pat[j] == c;
            j += 1;
        }
    }

    if j >= pat.len() || hit == negated {
        return None;
    }
    Some(j + 1)
}

/// One-off match of `text` against `pattern`
#[inline]
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    GlobPattern::new(pattern).matches(text)
}
