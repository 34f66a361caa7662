//! reStructuredText rendering of discovered error kinds.
//!
//! A page starts with a title derived from the output file name, followed by
//! one section per error kind:
//!
//! ```text
//! Troubleshooting
//! ===============
//!
//!
//! Foo error
//! ---------
//!
//! Foo broke.
//! ```

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::Builder;

use crate::{config::StyleConfig, discovery::DiscoveredSet, error::ErratumError};

/// Default output path.
pub const DEFAULT_OUTPUT: &str = "troubleshooting.rst";

/// Returns a section header: `header` underlined with `underline`.
pub fn format_header(header: &str, underline: char) -> String {
    let rule: String = std::iter::repeat_n(underline, header.chars().count()).collect();
    format!("{header}\n{rule}")
}

/// Page title for an output path: the file stem, capitalized.
pub fn title_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    capitalize(&stem)
}

/// Section heading for a kind identifier.
///
/// Splits the CamelCase identifier into words and keeps only the first word
/// capitalized; acronyms keep their case.
pub fn heading_for(ident: &str) -> String {
    split_words(ident)
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            if is_acronym(word) {
                word.clone()
            } else if idx == 0 {
                capitalize(word)
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() > 1 && word.chars().all(|c| !c.is_lowercase())
}

fn split_words(ident: &str) -> Vec<String> {
    let chars: Vec<char> = ident.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (idx, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Renders discovered kinds as a reStructuredText page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    title_char: char,
    entry_char: char,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            title_char: '=',
            entry_char: '-',
        }
    }
}

impl Document {
    /// Creates a document with the given heading characters.
    pub fn new(title_char: char, entry_char: char) -> Self {
        Self {
            title_char,
            entry_char,
        }
    }

    /// Creates a document from style configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErratumError::Config`] when a configured heading character
    /// is not ASCII punctuation.
    pub fn from_style(style: &StyleConfig) -> Result<Self, ErratumError> {
        let title_char = style.title_char().map_err(ErratumError::Config)?;
        let entry_char = style.entry_char().map_err(ErratumError::Config)?;
        Ok(Self::new(title_char, entry_char))
    }

    /// Renders the full page.
    pub fn render(&self, title: &str, errors: &DiscoveredSet) -> String {
        let mut page = format_header(title, self.title_char);
        page.push_str("\n\n");

        for found in errors.iter() {
            let kind = found.kind();
            let header = format_header(&heading_for(kind.ident()), self.entry_char);
            page.push_str(&format!("\n{header}\n\n{}\n", kind.description()));
        }

        page
    }

    /// Renders the page and writes it to `path`.
    ///
    /// The page is rendered in memory and written to a temporary file in the
    /// destination directory, then moved over `path`. A failure leaves any
    /// existing file at `path` untouched.
    ///
    /// A replaced page keeps its permissions; a new page gets the
    /// permissions of any newly created file.
    ///
    /// # Errors
    ///
    /// Returns [`ErratumError::Io`] when the temporary file cannot be created,
    /// written, or moved into place.
    pub fn write(&self, errors: &DiscoveredSet, path: &Path) -> Result<(), ErratumError> {
        debug!(path = path.display().to_string(); "Writing documentation");
        let page = self.render(&title_for(path), errors);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let existing = match fs::metadata(path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };

        let mut file = temp_builder().tempfile_in(dir)?;
        if let Some(permissions) = existing {
            file.as_file().set_permissions(permissions)?;
        }
        file.write_all(page.as_bytes())?;
        file.persist(path).map_err(|err| err.error)?;

        Ok(())
    }
}

/// Temporary file builder; on unix the file is opened with mode `0o666`,
/// narrowed by the umask.
#[cfg_attr(not(unix), allow(unused_mut))]
fn temp_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn header_underline_matches_length(header in "[^\n]*") {
            let formatted = format_header(&header, '=');
            let (text, rule) = formatted.split_once('\n').unwrap();

            prop_assert_eq!(text, header.as_str());
            prop_assert_eq!(rule.chars().count(), header.chars().count());
            prop_assert!(rule.chars().all(|c| c == '='));
        }

        #[test]
        fn heading_preserves_letters(ident in "[A-Z][a-z]{0,6}([A-Z][a-z]{1,6}){0,3}") {
            let heading = heading_for(&ident);
            let letters: String = heading.chars().filter(|c| *c != ' ').collect();

            prop_assert_eq!(letters.to_lowercase(), ident.to_lowercase());
        }
    }
}
