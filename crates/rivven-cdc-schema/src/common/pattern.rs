//! # Table Name Patterns
//!
//! Include/exclude entries are compiled once into [`TablePattern`]s and
//! matched against every listed table.
//!
//! - Glob by default: `*` is any run of characters, `?` a single one
//! - `regex:` prefix switches to a regular expression (`regex:^dbo\.t\d+$`)
//! - Matching ignores case, like SQL Server's default collations
//! - A table matches if its `schema.table` or bare `table` name matches;
//!   only globs with three dot-separated parts are also tried against
//!   `catalog.schema.table`
//!
//! ## Example
//!
//! ```rust
//! use rivven_cdc_schema::common::pattern::{TablePattern, TablePatternSet};
//! use rivven_cdc_schema::TableId;
//!
//! let pattern = TablePattern::parse("dbo.*").unwrap();
//! assert!(pattern.matches(&TableId::new("inventory", "dbo", "orders")));
//! assert!(!pattern.matches(&TableId::new("inventory", "audit", "orders")));
//!
//! let set = TablePatternSet::compile(&["*.customers", "regex:^sales\\."]).unwrap();
//! assert!(set.matches(&TableId::new("inventory", "dbo", "customers")));
//! assert!(set.matches(&TableId::new("inventory", "sales", "leads")));
//! ```

use crate::common::table::TableId;
use regex::{Regex, RegexBuilder};

const REGEX_PREFIX: &str = "regex:";

/// Table pattern compilation error.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("table pattern must not be empty")]
    Empty,
    #[error("invalid table pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
enum Matcher {
    /// `*`: every table
    Any,
    Regex(Regex),
}

/// One compiled include or exclude entry.
#[derive(Debug, Clone)]
pub struct TablePattern {
    source: String,
    matcher: Matcher,
    /// Dot-separated parts the pattern spells out (regexes count as 2)
    parts: usize,
}

impl TablePattern {
    /// Compile a glob, or a regex when prefixed with `regex:`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        let expression = match trimmed.strip_prefix(REGEX_PREFIX) {
            Some(regex) => regex.trim().to_string(),
            None if trimmed == "*" => {
                return Ok(Self {
                    source: trimmed.to_string(),
                    matcher: Matcher::Any,
                    parts: 1,
                });
            }
            None => glob_to_regex(trimmed),
        };
        if expression.is_empty() || trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::InvalidRegex {
                pattern: trimmed.to_string(),
                source,
            })?;

        let parts = if trimmed.starts_with(REGEX_PREFIX) {
            2
        } else {
            trimmed.split('.').count()
        };

        Ok(Self {
            source: trimmed.to_string(),
            matcher: Matcher::Regex(regex),
            parts,
        })
    }

    /// Whether the table matches at a qualification level the pattern
    /// reaches.
    pub fn matches(&self, id: &TableId) -> bool {
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Regex(regex) => qualified_names(id, self.parts)
                .iter()
                .any(|name| regex.is_match(name)),
        }
    }

    /// Pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this pattern matches every table.
    pub fn matches_all(&self) -> bool {
        matches!(self.matcher, Matcher::Any)
    }
}

/// Compiled list of patterns; a table matches if any member does.
#[derive(Debug, Clone, Default)]
pub struct TablePatternSet {
    patterns: Vec<TablePattern>,
}

impl TablePatternSet {
    /// Compile every entry, failing on the first invalid one.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| TablePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, id: &TableId) -> bool {
        self.patterns.iter().any(|p| p.matches(id))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TablePattern> {
        self.patterns.iter()
    }
}

/// Names of `id` to match against, most qualified first.
///
/// `catalog.schema.table` is only produced for patterns of three or more
/// parts, so a `schema.*` glob never matches on the catalog name.
fn qualified_names(id: &TableId, parts: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(3);
    if let (Some(catalog), Some(schema)) = (id.catalog(), id.schema()) {
        if parts >= 3 {
            names.push(format!("{}.{}.{}", catalog, schema, id.table()));
        }
    }
    if let Some(schema) = id.schema() {
        names.push(format!("{}.{}", schema, id.table()));
    }
    names.push(id.table().to_string());
    names
}

/// Anchored regex for a glob; everything except `*` and `?` is literal.
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() + 8);
    regex.push('^');
    let mut literal = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c => regex.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }
    regex.push('$');
    regex
}
