//! Catalog of the commands `dops` ships.
//!
//! The catalog backs `dops modules`: listing, regex search, counting, and
//! rendering descriptions as plain text or Markdown.

use std::fmt::{self, Write as _};

use regex::Regex;
use thiserror::Error;

/// Grouping used when describing modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Modules that manage dops itself.
    Dops,
    /// Modules whose main purpose is talking HTTP.
    Web,
    /// Modules that process text.
    TextProcessing,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Dops, Self::Web, Self::TextProcessing];

    /// Display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dops => "Dops",
            Self::Web => "Web",
            Self::TextProcessing => "Text Processing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A usage example shown in descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    /// What the example does.
    pub summary: &'static str,
    /// The command line.
    pub usage: &'static str,
}

/// One command in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Primary command name.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
    /// One-line usage.
    pub usage: &'static str,
    /// Longer description.
    pub description: &'static str,
    /// Grouping.
    pub category: Category,
    /// Usage examples.
    pub examples: &'static [Example],
}

impl ModuleInfo {
    /// Name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Errors from the modules catalog.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The search pattern is not a valid regular expression.
    #[error("invalid search pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The regex compiler's complaint.
        #[source]
        source: regex::Error,
    },
}

static CATALOG: [ModuleInfo; 3] = [
    ModuleInfo {
        name: "bulkdownload",
        aliases: &["bd"],
        usage: "Download multiple files from a list",
        description: "Bulkdownload downloads all files from a list of URLs, one per line. \
                      You can set how many files are downloaded concurrently.",
        category: Category::Web,
        examples: &[Example {
            summary: "Download all files from urls.txt, with 5 concurrent connections, to the current directory.",
            usage: "dops bulkdownload -i urls.txt -c 5",
        }],
    },
    ModuleInfo {
        name: "extract-text",
        aliases: &[],
        usage: "Extracts text using regex from a file",
        description: "Extract-text prints every match of a regex pattern found in a file or stdin, \
                      or writes the matches to a file.",
        category: Category::TextProcessing,
        examples: &[Example {
            summary: "Print every e-mail address found in contacts.txt.",
            usage: r"dops extract-text -r '[\w.]+@[\w.]+' -i contacts.txt",
        }],
    },
    ModuleInfo {
        name: "modules",
        aliases: &["mods"],
        usage: "List and search modules",
        description: "The 'modules' command lists, searches, counts and describes the modules in dops.",
        category: Category::Dops,
        examples: &[Example {
            summary: "Show every module whose name contains 'down'.",
            usage: "dops modules --search down",
        }],
    },
];

/// Every command, in registration order.
#[must_use]
pub fn catalog() -> &'static [ModuleInfo] {
    &CATALOG
}

/// Looks up a command by name or alias.
#[must_use]
pub fn find(name: &str) -> Option<&'static ModuleInfo> {
    CATALOG.iter().find(|m| m.names().any(|n| n == name))
}

/// Primary names of every command.
#[must_use]
pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(|m| m.name).collect()
}

/// Number of commands.
#[must_use]
pub fn count() -> usize {
    CATALOG.len()
}

/// Primary names matching `pattern` (unanchored regex).
///
/// # Errors
///
/// Returns [`ModuleError::InvalidPattern`] if the pattern does not compile.
pub fn search(pattern: &str) -> Result<Vec<&'static str>, ModuleError> {
    let re = Regex::new(pattern).map_err(|source| ModuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(CATALOG
        .iter()
        .map(|m| m.name)
        .filter(|name| re.is_match(name))
        .collect())
}

/// Closest command name to `query`, if any is reasonably similar.
#[must_use]
pub fn suggest(query: &str) -> Option<&'static str> {
    const MIN_SIMILARITY: f64 = 0.7;

    CATALOG
        .iter()
        .flat_map(ModuleInfo::names)
        .map(|name| (name, strsim::jaro_winkler(query, name)))
        .filter(|(_, score)| *score >= MIN_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| find(name).map_or(name, |m| m.name))
}

/// Plain-text description of every command, grouped by category.
#[must_use]
pub fn describe() -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let members: Vec<_> = CATALOG.iter().filter(|m| m.category == category).collect();
        if members.is_empty() {
            continue;
        }
        let _ = writeln!(out, "[{category}]");
        for module in members {
            let names: Vec<_> = module.names().collect();
            let _ = writeln!(out, "  · {} | {}", names.join(", "), module.usage);
            let _ = writeln!(out, "      {}", module.description);
            for example in module.examples {
                let _ = writeln!(out, "      $ {}", example.usage);
            }
        }
        out.push('\n');
    }
    out
}

/// Markdown description of every command.
#[must_use]
pub fn markdown() -> String {
    let mut out = String::from("# Modules\n");
    for module in &CATALOG {
        let _ = write!(
            out,
            "\n## {}\n\n> {}\n\n{}\n\n**Category:** {}\n",
            module.name, module.usage, module.description, module.category
        );
        if !module.aliases.is_empty() {
            let aliases: Vec<_> = module.aliases.iter().map(|a| format!("`{a}`")).collect();
            let _ = writeln!(out, "**Aliases:** {}", aliases.join(", "));
        }
        if !module.examples.is_empty() {
            out.push_str("\n### Examples\n");
            for example in module.examples {
                let _ = write!(
                    out,
                    "\n{}\n\n```sh\n{}\n```\n",
                    example.summary, example.usage
                );
            }
        }
    }
    out
}
