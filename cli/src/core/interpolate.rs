//! # ejbpack Property Interpolation
//!
//! File: cli/src/core/interpolate.rs
//!
//! ## Overview
//!
//! This module implements the text filter applied to the deployment descriptor
//! when filtering is enabled. It replaces `${key}` and `@key@` expressions with
//! property values and leaves everything it cannot resolve untouched.
//!
//! ## Architecture
//!
//! - **Properties**: `parse_properties` reads the `.properties` format used by
//!   filter files (`#`/`!` comments, `=`/`:`/whitespace separators, trailing `\`
//!   continuations, `\uXXXX` escapes). `merge_property_sources` layers the
//!   sources in precedence order.
//! - **`Interpolator`**: resolves expressions against its property map and the
//!   process environment (`env.NAME`). Values are themselves interpolated, and a
//!   key already being resolved is treated as unresolved, which breaks cycles.
//! - **Escaping**: an expression directly preceded by the configured escape
//!   string is emitted literally with the escape string removed. With Windows
//!   path escaping on, resolved values that look like `C:\...` have each `\`
//!   doubled.
//! - **`copy_file_filtered`**: decodes a file with a given `Charset`, filters
//!   it, and writes the result re-encoded with the same charset.
//!
//! ## Examples
//!
//! ```rust
//! let mut props = BTreeMap::new();
//! props.insert("db.name".to_string(), "orders".to_string());
//! let interpolator = Interpolator::new(props).with_escape_string(Some("\\".to_string()));
//! assert_eq!(interpolator.interpolate("jdbc/${db.name}"), "jdbc/orders");
//! assert_eq!(interpolator.interpolate("\\${db.name}"), "${db.name}");
//! ```
//!
use crate::common::fs::encoding::Charset;
use crate::common::fs::io;
use crate::core::error::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

const ENV_PREFIX: &str = "env.";

static WINDOWS_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[a-zA-Z]:\\").expect("windows path pattern"));

/// Parses `.properties` text. Later duplicates win.
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        let (key, value) = split_key_value(&logical);
        props.insert(unescape(key), unescape(value));
    }
    props
}

/// Reads a filter file. UTF-8 is tried first, then ISO-8859-1.
pub fn load_properties_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let bytes = io::read_file_bytes(path)?;
    let text = match Charset::Utf8.decode(&bytes) {
        Ok(text) => text,
        Err(_) => Charset::Latin1.decode(&bytes)?,
    };
    let props = parse_properties(&text);
    debug!("Loaded {} properties from {:?}", props.len(), path);
    Ok(props)
}

/// Layers property sources: `base`, then each filter file in order, then `user`.
pub fn merge_property_sources(
    base: BTreeMap<String, String>,
    filters: &[PathBuf],
    user: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut props = base;
    for filter in filters {
        props.extend(load_properties_file(filter)?);
    }
    props.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(props)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }
    let key = &line[..key_end];
    let mut value = line[key_end..].trim_start();
    if let Some(stripped) = value.strip_prefix(['=', ':']) {
        value = stripped.trim_start();
    }
    (key, value)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Finds an expression at the start of `text`: `(length, key)`.
fn parse_expression(text: &str) -> Option<(usize, &str)> {
    let (open, close) = if text.starts_with("${") {
        ("${", '}')
    } else if text.starts_with('@') {
        ("@", '@')
    } else {
        return None;
    };
    let body = &text[open.len()..];
    let end = body.find(close)?;
    let key = &body[..end];
    is_valid_key(key).then_some((open.len() + end + 1, key))
}

/// Resolves `${...}` and `@...@` expressions against a property map.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    properties: BTreeMap<String, String>,
    escape_string: Option<String>,
    escape_windows_paths: bool,
}

impl Interpolator {
    pub fn new(properties: BTreeMap<String, String>) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// A blank escape string disables escaping.
    pub fn with_escape_string(mut self, escape: Option<String>) -> Self {
        self.escape_string = escape.filter(|e| !e.is_empty());
        self
    }

    pub fn with_escape_windows_paths(mut self, enabled: bool) -> Self {
        self.escape_windows_paths = enabled;
        self
    }

    pub fn interpolate(&self, text: &str) -> String {
        self.interpolate_with(text, &mut Vec::new())
    }

    fn interpolate_with(&self, text: &str, resolving: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            if let Some(escape) = self.escape_string.as_deref() {
                if let Some(after) = rest.strip_prefix(escape) {
                    if let Some((len, _)) = parse_expression(after) {
                        out.push_str(&after[..len]);
                        rest = &after[len..];
                        continue;
                    }
                }
            }
            if let Some((len, key)) = parse_expression(rest) {
                match self.resolve(key, resolving) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[..len]),
                }
                rest = &rest[len..];
                continue;
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
        out
    }

    fn resolve(&self, key: &str, resolving: &mut Vec<String>) -> Option<String> {
        if resolving.iter().any(|k| k == key) {
            debug!("Reference cycle on '{}', leaving it unresolved", key);
            return None;
        }
        let raw = match key.strip_prefix(ENV_PREFIX) {
            Some(name) => std::env::var(name).ok(),
            None => self.properties.get(key).cloned(),
        }?;
        resolving.push(key.to_string());
        let value = self.interpolate_with(&raw, resolving);
        resolving.pop();
        if self.escape_windows_paths && WINDOWS_PATH.is_match(&value) {
            Some(value.replace('\\', "\\\\"))
        } else {
            Some(value)
        }
    }
}

/// Filters `from` into `to`, reading and writing with `charset`.
///
/// With `overwrite` off an existing `to` is left alone.
pub fn copy_file_filtered(
    from: &Path,
    to: &Path,
    overwrite: bool,
    interpolator: &Interpolator,
    charset: Charset,
) -> Result<()> {
    if !overwrite && to.exists() {
        debug!("Not overwriting existing {:?}", to);
        return Ok(());
    }
    let bytes = io::read_file_bytes(from)?;
    let text = charset.decode(&bytes)?;
    let filtered = interpolator.interpolate(&text);
    io::write_bytes_to_file(to, &charset.encode(&filtered)?)?;
    debug!("Filtered {:?} into {:?}", from, to);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_properties_syntax() {
        let text = "# comment\n\
                    ! also a comment\n\
                    a=1\n\
                    b : 2\n\
                    c 3\n\
                    long = one, \\\n    two\n\
                    path=C:\\\\dev\\\\app\n\
                    unicode=caf\\u00e9\n\
                    empty\n";
        let parsed = parse_properties(text);
        assert_eq!(parsed["a"], "1");
        assert_eq!(parsed["b"], "2");
        assert_eq!(parsed["c"], "3");
        assert_eq!(parsed["long"], "one, two");
        assert_eq!(parsed["path"], "C:\\dev\\app");
        assert_eq!(parsed["unicode"], "café");
        assert_eq!(parsed["empty"], "");
        assert_eq!(parsed.len(), 7);
    }

    #[test]
    fn test_both_delimiters() {
        let i = Interpolator::new(props(&[("name", "orders"), ("v", "1.0")]));
        assert_eq!(i.interpolate("${name}-@v@"), "orders-1.0");
    }

    #[test]
    fn test_unresolved_and_invalid_left_verbatim() {
        let i = Interpolator::new(props(&[("a", "x")]));
        assert_eq!(i.interpolate("${missing} ${a"), "${missing} ${a");
        assert_eq!(i.interpolate("mail user@example.com today"), "mail user@example.com today");
        assert_eq!(i.interpolate("${a b}"), "${a b}");
    }

    #[test]
    fn test_recursive_values_and_cycles() {
        let i = Interpolator::new(props(&[
            ("outer", "[${inner}]"),
            ("inner", "value"),
            ("loop.a", "${loop.b}"),
            ("loop.b", "${loop.a}"),
        ]));
        assert_eq!(i.interpolate("${outer}"), "[value]");
        assert_eq!(i.interpolate("${loop.a}"), "${loop.a}");
    }

    #[test]
    fn test_env_lookup() {
        let i = Interpolator::new(BTreeMap::new());
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(i.interpolate("${env.PATH}"), path);
        assert_eq!(
            i.interpolate("${env.EJBPACK_SURELY_UNSET_VARIABLE}"),
            "${env.EJBPACK_SURELY_UNSET_VARIABLE}"
        );
    }

    #[test]
    fn test_escape_string() {
        let i = Interpolator::new(props(&[("a", "x")])).with_escape_string(Some("\\".into()));
        assert_eq!(i.interpolate("\\${a} ${a} \\@a@"), "${a} x @a@");
        assert_eq!(i.interpolate("C:\\temp"), "C:\\temp");

        let disabled = Interpolator::new(props(&[("a", "x")])).with_escape_string(Some("".into()));
        assert_eq!(disabled.interpolate("\\${a}"), "\\x");
    }

    #[test]
    fn test_windows_path_escaping() {
        let values = props(&[("home", "C:\\dev\\app"), ("plain", "a\\b")]);
        let on = Interpolator::new(values.clone()).with_escape_windows_paths(true);
        assert_eq!(on.interpolate("${home} ${plain}"), "C:\\\\dev\\\\app a\\b");
        let off = Interpolator::new(values);
        assert_eq!(off.interpolate("${home}"), "C:\\dev\\app");
    }

    #[test]
    fn test_merge_precedence() -> Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.properties");
        let second = dir.path().join("second.properties");
        fs::write(&first, "k=first\nonly.first=1\n")?;
        fs::write(&second, "k=second\n")?;

        let base = props(&[("k", "base"), ("only.base", "b")]);
        let user = props(&[("only.first", "user")]);
        let merged = merge_property_sources(base, &[first, second], &user)?;
        assert_eq!(merged["k"], "second");
        assert_eq!(merged["only.base"], "b");
        assert_eq!(merged["only.first"], "user");

        assert!(merge_property_sources(
            BTreeMap::new(),
            &[dir.path().join("missing.properties")],
            &BTreeMap::new()
        )
        .is_err());
        Ok(())
    }

    #[test]
    fn test_copy_file_filtered_keeps_charset() -> Result<()> {
        let dir = tempdir()?;
        let from = dir.path().join("in.xml");
        let to = dir.path().join("out.xml");
        fs::write(&from, [b'c', b'a', b'f', 0xE9, b' ', b'$', b'{', b'a', b'}'])?;
        let i = Interpolator::new(props(&[("a", "ok")]));
        copy_file_filtered(&from, &to, true, &i, Charset::Latin1)?;
        assert_eq!(fs::read(&to)?, vec![b'c', b'a', b'f', 0xE9, b' ', b'o', b'k']);

        fs::write(&from, "${a}")?;
        copy_file_filtered(&from, &to, false, &i, Charset::Latin1)?;
        assert_eq!(fs::read(&to)?, vec![b'c', b'a', b'f', 0xE9, b' ', b'o', b'k']);
        Ok(())
    }
}
