//! Command line configuration for the `recxml` tool.
//!
//! Every flag can also be set through an environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RECXML_DATA` | (required) | JSON store file |
//! | `RECXML_TYPE` | (required) | Record type to render |
//! | `RECXML_ID` | | Render one record instead of the collection |
//! | `RECXML_ONLY` | | Comma-separated column names |
//! | `RECXML_INCLUDE` | | Comma-separated associations, dotted for nesting |
//! | `RECXML_ROOT` | | Root element name |
//! | `RECXML_INDENT` | false | Pretty-print the output |
//! | `RECXML_MAX_DEPTH` | | Maximum association nesting |
//! | `RECXML_LOG_LEVEL` | warn | Log level |
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use helios_recxml_cli::RenderConfig;
//!
//! let config = RenderConfig::parse_from([
//!     "recxml", "--data", "blog.json", "--type", "Post", "--include", "comments.author",
//! ]);
//! let options = config.to_options();
//! assert_eq!(options.include[0].name(), "comments");
//! ```

use std::path::PathBuf;

use clap::Parser;
use helios_recxml::XmlOptions;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Render records from a JSON store as XML.
#[derive(Debug, Clone, Parser)]
#[command(name = "recxml")]
#[command(about = "Serialize stored records and their associations to XML")]
pub struct RenderConfig {
    /// JSON file holding type definitions and records.
    #[arg(short, long, env = "RECXML_DATA")]
    pub data: PathBuf,

    /// Record type to render, e.g. `Post`.
    #[arg(short = 't', long = "type", env = "RECXML_TYPE")]
    pub type_name: String,

    /// Primary key of a single record. Without it the whole collection is rendered.
    #[arg(long, env = "RECXML_ID")]
    pub id: Option<i64>,

    /// Restrict fields to these columns (comma-separated).
    #[arg(long, env = "RECXML_ONLY", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Associations to include (comma-separated, `comments.author` nests).
    #[arg(short, long, env = "RECXML_INCLUDE", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Root element name.
    #[arg(long, env = "RECXML_ROOT")]
    pub root: Option<String>,

    /// Pretty-print the output.
    #[arg(long, env = "RECXML_INDENT")]
    pub indent: bool,

    /// Fail when includes nest deeper than this.
    #[arg(long, env = "RECXML_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "RECXML_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl RenderConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.data.as_os_str().is_empty() {
            errors.push("Data file cannot be empty".to_string());
        }

        if self.type_name.trim().is_empty() {
            errors.push("Type name cannot be empty".to_string());
        }

        if self.only.iter().any(|name| name.trim().is_empty()) {
            errors.push("Field names in --only cannot be empty".to_string());
        }

        for path in &self.include {
            if path.split('.').any(|segment| segment.trim().is_empty()) {
                errors.push(format!("Invalid include path '{}'", path));
            }
        }

        if matches!(&self.root, Some(root) if root.trim().is_empty()) {
            errors.push("Root element name cannot be empty".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Serialization options described by the flags.
    pub fn to_options(&self) -> XmlOptions {
        let mut options = XmlOptions::new().with_indent(self.indent);
        if !self.only.is_empty() {
            options = options.with_only(self.only.iter().map(|name| name.trim()));
        }
        if let Some(root) = &self.root {
            options = options.with_root(root.as_str());
        }
        if let Some(depth) = self.max_depth {
            options = options.with_max_depth(depth);
        }
        for path in &self.include {
            options = options.include_path(path.trim());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_recxml::Include;

    fn parse(args: &[&str]) -> RenderConfig {
        let mut argv = vec!["recxml", "--data", "store.json", "--type", "Post"];
        argv.extend_from_slice(args);
        RenderConfig::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.type_name, "Post");
        assert_eq!(config.id, None);
        assert!(!config.indent);
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_comma_separated_lists() {
        let config = parse(&["--only", "id,title", "--include", "author,comments.commenter"]);
        assert_eq!(config.only, vec!["id", "title"]);
        assert_eq!(config.include, vec!["author", "comments.commenter"]);
    }

    #[test]
    fn test_to_options() {
        let config = parse(&[
            "--only",
            "id",
            "--include",
            "comments.commenter",
            "--root",
            "articles",
            "--indent",
            "--max-depth",
            "4",
        ]);
        let options = config.to_options();

        assert_eq!(options.only, Some(vec!["id".to_string()]));
        assert_eq!(options.root.as_deref(), Some("articles"));
        assert!(options.indent());
        assert_eq!(options.max_depth, Some(4));
        assert_eq!(options.include, vec![Include::from_path("comments.commenter")]);
    }

    #[test]
    fn test_to_options_merges_shared_include_prefix() {
        let config = parse(&["--include", "comments.author,comments.commenter,author"]);
        let options = config.to_options();

        assert_eq!(options.include.len(), 2);
        assert_eq!(options.include[0].name(), "comments");
        let nested: Vec<_> = options.include[0]
            .nested()
            .unwrap()
            .include
            .iter()
            .map(Include::name)
            .collect();
        assert_eq!(nested, vec!["author", "commenter"]);
    }

    #[test]
    fn test_validate_invalid_include_path() {
        let config = parse(&["--include", "comments..author"]);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("comments..author")));
    }

    #[test]
    fn test_validate_unknown_log_level() {
        let config = parse(&["--log-level", "loud"]);
        assert!(config.validate().is_err());
    }
}
