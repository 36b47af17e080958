//! # Permission Schema
//!
//! The set of permission paths a deployment recognizes. Schemas are declared
//! either as text (one path per line) or with [`SchemaBuilder`], validated
//! once at startup and read-only afterwards.
//!
//! ```text
//! # comment
//! *
//! user.*
//! user.own.update-info
//! content.*.publish
//! ```

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexSet;
use tracing::debug;

use crate::error::{PermissionError, PermissionResult};
use crate::grants::GrantMapping;
use crate::path::{PermissionPath, WILDCARD};
use crate::required::RequiredEntry;

/// A validated, deduplicated set of permission paths in declaration order.
///
/// # Example
///
/// ```
/// use permission_engine::parse_schema;
///
/// let schema = parse_schema("content.*\ncontent.manga.publish\ncontent.manga.delete\n").unwrap();
/// assert_eq!(schema.len(), 3);
/// assert!(schema.contains("content.manga.publish"));
/// assert!(!schema.contains("content.manga.update"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSchema {
    paths: IndexSet<PermissionPath>,
}

/// Parse a line-oriented schema definition.
///
/// Blank lines and lines starting with `#` are skipped; surrounding
/// whitespace is trimmed. The first invalid line aborts parsing with
/// [`PermissionError::SchemaLine`].
pub fn parse_schema(text: &str) -> PermissionResult<PermissionSchema> {
    let mut paths = IndexSet::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let path = PermissionPath::parse(line).map_err(|source| PermissionError::SchemaLine {
            line: index + 1,
            source: Box::new(source),
        })?;

        if !paths.insert(path) {
            debug!(line = index + 1, permission = line, "Duplicate schema entry ignored");
        }
    }

    debug!(permissions = paths.len(), "Parsed permission schema");
    Ok(PermissionSchema { paths })
}

impl PermissionSchema {
    /// Read and parse a schema file.
    pub fn load(path: impl AsRef<Path>) -> PermissionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PermissionError::SchemaIo {
            path: path.to_path_buf(),
            source,
        })?;
        parse_schema(&text)
    }

    /// Check whether a permission string is declared.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Look up a declared permission.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_engine::{parse_schema, PermissionError};
    ///
    /// let schema = parse_schema("user.*\nuser.update-info").unwrap();
    /// assert_eq!(schema.resolve("user.update-info").unwrap().as_str(), "user.update-info");
    /// assert!(matches!(schema.resolve("user.delete"), Err(PermissionError::UnknownPermission(_))));
    /// ```
    pub fn resolve(&self, path: &str) -> PermissionResult<&PermissionPath> {
        self.paths
            .get(path)
            .ok_or_else(|| PermissionError::UnknownPermission(path.to_string()))
    }

    /// Iterate declared paths in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionPath> + '_ {
        self.paths.iter()
    }

    /// Iterate declared paths that contain no wildcard.
    pub fn concrete(&self) -> impl Iterator<Item = &PermissionPath> + '_ {
        self.paths.iter().filter(|path| !path.has_wildcard())
    }

    /// Number of declared paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reject grant mappings that use undeclared keys.
    pub fn validate_grants(&self, grants: &GrantMapping) -> PermissionResult<()> {
        match grants.keys().find(|key| !self.paths.contains(*key)) {
            Some(unknown) => Err(PermissionError::UnknownPermission(unknown.to_string())),
            None => Ok(()),
        }
    }

    /// Reject required entries with undeclared alternatives.
    pub fn validate_required(&self, required: &[RequiredEntry]) -> PermissionResult<()> {
        let unknown = required
            .iter()
            .flat_map(RequiredEntry::alternatives)
            .find(|path| !self.paths.contains(*path));

        match unknown {
            Some(path) => Err(PermissionError::UnknownPermission(path.to_string())),
            None => Ok(()),
        }
    }

    /// Render back to the line-oriented text form.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for path in &self.paths {
            text.push_str(path.as_str());
            text.push('\n');
        }
        text
    }
}

impl FromStr for PermissionSchema {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_schema(s)
    }
}

impl<'a> IntoIterator for &'a PermissionSchema {
    type Item = &'a PermissionPath;
    type IntoIter = indexmap::set::Iter<'a, PermissionPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Declarative schema construction.
///
/// Every namespace declares its own `<prefix>.*` entry before its children,
/// and the root always declares `*`. Names are validated as they are added;
/// the first error is reported by [`SchemaBuilder::build`].
///
/// # Example
///
/// ```
/// use permission_engine::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .namespace("user", |user| {
///         user.namespace("own", |own| own.permission("update-info"))
///             .permission("update-info")
///     })
///     .build()
///     .unwrap();
///
/// let paths: Vec<_> = schema.iter().map(|p| p.as_str()).collect();
/// assert_eq!(
///     paths,
///     vec!["*", "user.*", "user.own.*", "user.own.update-info", "user.update-info"]
/// );
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    prefix: Option<PermissionPath>,
    paths: Vec<PermissionPath>,
    error: Option<PermissionError>,
}

impl SchemaBuilder {
    /// Start a schema rooted at `*`.
    pub fn new() -> Self {
        Self {
            prefix: None,
            paths: vec![PermissionPath::global()],
            error: None,
        }
    }

    fn scoped(prefix: PermissionPath) -> PermissionResult<Self> {
        let wildcard = prefix.child(WILDCARD)?;
        Ok(Self {
            prefix: Some(prefix),
            paths: vec![wildcard],
            error: None,
        })
    }

    fn join(&self, relative: &str) -> PermissionResult<PermissionPath> {
        let mut segments = relative.split('.');
        let first = segments.next().unwrap_or_default();

        let mut path = match &self.prefix {
            Some(prefix) => prefix.child(first)?,
            None => PermissionPath::parse(first)?,
        };
        for segment in segments {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Declare a nested namespace.
    pub fn namespace<F>(mut self, name: &str, declare: F) -> Self
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        if self.error.is_some() {
            return self;
        }

        let child = self.join(name).and_then(Self::scoped);
        match child {
            Ok(child) => {
                let child = declare(child);
                self.paths.extend(child.paths);
                self.error = child.error;
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Declare a permission relative to the current namespace.
    ///
    /// `name` may be dotted and may contain whole `*` segments, e.g.
    /// `*.publish` inside `content` declares `content.*.publish`.
    pub fn permission(mut self, name: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match self.join(name) {
            Ok(path) => self.paths.push(path),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Declare several permissions at once.
    pub fn permissions<'a, I>(self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .fold(self, |builder, name| builder.permission(name))
    }

    /// Finish the schema.
    pub fn build(self) -> PermissionResult<PermissionSchema> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(PermissionSchema {
            paths: self.paths.into_iter().collect(),
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        # content permissions
        content.*
        content.manga.publish

        content.manga.delete
        content.manga.publish
    ";

    #[test]
    fn test_parse_skips_blanks_comments_and_duplicates() {
        let schema = parse_schema(SAMPLE).unwrap();
        let paths: Vec<_> = schema.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["content.*", "content.manga.publish", "content.manga.delete"]);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_schema("user.*\nuser..own\n").unwrap_err();
        match err {
            PermissionError::SchemaLine { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(*source, PermissionError::EmptySegment { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            parse_schema("\n\ncontent.manga*").unwrap_err(),
            PermissionError::SchemaLine { line: 3, .. }
        ));
        assert!(matches!(
            parse_schema("Content.manga").unwrap_err(),
            PermissionError::SchemaLine { line: 1, .. }
        ));
    }

    #[test]
    fn test_empty_schema() {
        let schema = parse_schema("\n# nothing\n").unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_concrete_filter() {
        let schema = parse_schema(SAMPLE).unwrap();
        let concrete: Vec<_> = schema.concrete().map(|p| p.as_str()).collect();
        assert_eq!(concrete, vec!["content.manga.publish", "content.manga.delete"]);
    }

    #[test]
    fn test_validate_grants() {
        let schema = parse_schema(SAMPLE).unwrap();
        let ok = GrantMapping::from_pairs([("content.*", true), ("content.manga.delete", false)]).unwrap();
        assert!(schema.validate_grants(&ok).is_ok());

        let bad = GrantMapping::from_pairs([("content.*", true), ("content.manga.update", true)]).unwrap();
        match schema.validate_grants(&bad) {
            Err(PermissionError::UnknownPermission(name)) => assert_eq!(name, "content.manga.update"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_required() {
        let schema = parse_schema(SAMPLE).unwrap();
        let ok: Vec<RequiredEntry> = vec!["content.manga.publish | content.*".parse().unwrap()];
        assert!(schema.validate_required(&ok).is_ok());

        let bad: Vec<RequiredEntry> = vec!["content.manga.publish | content.ranobe.publish".parse().unwrap()];
        assert!(matches!(
            schema.validate_required(&bad),
            Err(PermissionError::UnknownPermission(name)) if name == "content.ranobe.publish"
        ));
    }

    #[test]
    fn test_text_round_trip() {
        let schema = parse_schema(SAMPLE).unwrap();
        assert_eq!(parse_schema(&schema.to_text()).unwrap(), schema);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PermissionSchema::load("/nonexistent/permissions.perms").unwrap_err();
        assert!(matches!(err, PermissionError::SchemaIo { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_builder_declares_wildcards() {
        let schema = SchemaBuilder::new()
            .namespace("content", |content| {
                content
                    .permissions(["*.publish", "*.delete"])
                    .namespace("manga", |manga| manga.permissions(["publish", "delete"]))
            })
            .build()
            .unwrap();

        let paths: Vec<_> = schema.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "*",
                "content.*",
                "content.*.publish",
                "content.*.delete",
                "content.manga.*",
                "content.manga.publish",
                "content.manga.delete",
            ]
        );
    }

    #[test]
    fn test_builder_reports_first_error() {
        let err = SchemaBuilder::new()
            .namespace("user", |user| user.permission("update_info").permission("Bad"))
            .build()
            .unwrap_err();
        assert!(matches!(err, PermissionError::InvalidCharacter { character: '_', .. }));

        assert!(SchemaBuilder::new().namespace("", |ns| ns).build().is_err());
        assert!(SchemaBuilder::new().permission("a..b").build().is_err());
    }

    #[test]
    fn test_builder_deduplicates() {
        let schema = SchemaBuilder::new()
            .permission("team.create")
            .permission("team.create")
            .build()
            .unwrap();
        assert_eq!(schema.len(), 2);
    }
}
