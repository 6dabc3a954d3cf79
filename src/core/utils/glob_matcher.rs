/// Check if a pattern contains glob wildcards (`*`, `?`) or brace alternatives.
/// Patterns without them are treated as literal paths, so `app/[locale]` is a directory.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '{'])
}

/// Expand brace alternatives in a glob pattern.
///
/// The `glob` crate has no brace support, so `src/**/*.{js,ts}` is turned into
/// `src/**/*.js` and `src/**/*.ts` before matching. Nested groups are expanded
/// recursively; an unbalanced `{` is kept as a literal character.
///
/// Examples:
/// - `*.{js,ts}` expands to `*.js`, `*.ts`
/// - `{src,lib}/**/*.{js,jsx}` expands to four patterns
/// - `a{b,c{d,e}}` expands to `ab`, `acd`, `ace`
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    split_alternatives(body)
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
        .collect()
}

/// Locate the first top-level `{...}` group containing a comma.
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = pattern[search_from..].find('{') {
        let open = search_from + offset;
        let mut depth = 0;
        let mut has_comma = false;

        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if has_comma {
                            return Some((open, i));
                        }
                        break;
                    }
                }
                b',' if depth == 1 => has_comma = true,
                _ => {}
            }
        }

        search_from = open + 1;
    }

    None
}

/// Split a brace body on top-level commas.
fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);

    parts
}
