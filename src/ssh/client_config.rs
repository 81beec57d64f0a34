//! OpenSSH client configuration lookup
//!
//! Supports the subset of `ssh_config(5)` nyo needs to turn a host alias into
//! connection coordinates:
//!
//! - `Keyword value` and `Keyword=value`, keywords case-insensitive
//! - `#` comments and double-quoted values
//! - `Host` blocks with several patterns, `*`/`?` wildcards and `!` negation
//! - directives before the first `Host` apply to every host
//! - first obtained value wins, in file order
//!
//! `Match` blocks are never selected and `Include` is not followed.

use tracing::{debug, warn};

/// Parsed client configuration
#[derive(Debug, Clone, Default)]
pub struct SshClientConfig {
    blocks: Vec<HostBlock>,
}

#[derive(Debug, Clone)]
struct HostBlock {
    selector: Selector,
    directives: Vec<Directive>,
}

#[derive(Debug, Clone)]
enum Selector {
    Global,
    Hosts(Vec<HostPattern>),
    Match,
}

#[derive(Debug, Clone)]
struct HostPattern {
    glob: String,
    negated: bool,
}

#[derive(Debug, Clone)]
struct Directive {
    keyword: String,
    value: String,
}

impl SshClientConfig {
    pub fn parse(text: &str) -> Self {
        let mut blocks = vec![HostBlock {
            selector: Selector::Global,
            directives: Vec::new(),
        }];

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((keyword, value)) = split_directive(line) else {
                debug!(line = line_no, "skipping ssh config line without a value");
                continue;
            };

            match keyword.to_ascii_lowercase().as_str() {
                "host" => blocks.push(HostBlock {
                    selector: Selector::Hosts(parse_patterns(&value)),
                    directives: Vec::new(),
                }),
                "match" => {
                    debug!(line = line_no, "Match blocks are not evaluated");
                    blocks.push(HostBlock {
                        selector: Selector::Match,
                        directives: Vec::new(),
                    });
                }
                "include" => {
                    warn!(line = line_no, include = %value, "Include directives in ssh config are not followed");
                }
                _ => {
                    if let Some(block) = blocks.last_mut() {
                        block.directives.push(Directive {
                            keyword: keyword.to_string(),
                            value,
                        });
                    }
                }
            }
        }

        Self { blocks }
    }

    /// First value of `keyword` among the blocks applying to `host`.
    pub fn get(&self, host: &str, keyword: &str) -> Option<&str> {
        self.blocks
            .iter()
            .filter(|block| block.applies_to(host))
            .flat_map(|block| block.directives.iter())
            .find(|d| d.keyword.eq_ignore_ascii_case(keyword))
            .map(|d| d.value.as_str())
    }

    /// Whether any `Host` block (not the global section) applies to `host`.
    pub fn has_host(&self, host: &str) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block.selector, Selector::Hosts(_)) && block.applies_to(host))
    }
}

impl HostBlock {
    fn applies_to(&self, host: &str) -> bool {
        match &self.selector {
            Selector::Global => true,
            Selector::Match => false,
            Selector::Hosts(patterns) => {
                let mut matched = false;
                for pattern in patterns {
                    if glob_match(&pattern.glob, host) {
                        if pattern.negated {
                            return false;
                        }
                        matched = true;
                    }
                }
                matched
            }
        }
    }
}

fn split_directive(line: &str) -> Option<(&str, String)> {
    let end = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let keyword = &line[..end];
    let mut rest = line[end..].trim_start();
    if let Some(stripped) = rest.strip_prefix('=') {
        rest = stripped.trim_start();
    }

    if keyword.is_empty() || rest.is_empty() {
        return None;
    }
    Some((keyword, unquote(rest)))
}

fn unquote(value: &str) -> String {
    if let Some(inner) = value.strip_prefix('"') {
        match inner.find('"') {
            Some(end) => inner[..end].to_string(),
            None => inner.to_string(),
        }
    } else {
        value.trim_end().to_string()
    }
}

fn parse_patterns(value: &str) -> Vec<HostPattern> {
    value
        .split_whitespace()
        .map(|token| token.trim_matches('"'))
        .filter(|token| !token.is_empty())
        .map(|token| match token.strip_prefix('!') {
            Some(glob) => HostPattern {
                glob: glob.to_string(),
                negated: true,
            },
            None => HostPattern {
                glob: token.to_string(),
                negated: false,
            },
        })
        .collect()
}

/// `*` matches any run of characters, `?` exactly one. ASCII case-insensitive.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let t: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((star, consumed)) = backtrack {
            pi = star + 1;
            ti = consumed + 1;
            backtrack = Some((star, consumed + 1));
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
