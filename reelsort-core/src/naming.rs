//! Folder and file renaming driven by a tiny pattern language.
//!
//! Patterns mix literal text with single-letter variables (`$T` title,
//! `$Y` year, ...). Brace-delimited blocks are optional: they are emitted
//! only when at least one variable inside resolves non-empty. List
//! variables (`$G` genres, `$U` countries) join with the literal character
//! that follows the token, defaulting to comma-space.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use reelsort_model::{MediaMetadata, Substitution};
use tracing::{info, warn};

/// Folder pattern producing names like `Example Movie (2021)`.
pub const DEFAULT_FOLDER_PATTERN: &str = "$T{ ($6)}{ ($Y)}";

/// File pattern: title only. The magic token `ST` alone is read as `$T`.
pub const DEFAULT_FILE_PATTERN: &str = "ST";

static INVALID_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static INNER_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

/// Separators accepted after a list variable token.
const LIST_SEPARATORS: &[char] = &[' ', '\t', '.', ',', '-'];

/// Resolves naming patterns against a metadata record.
#[derive(Debug)]
pub struct PatternInterpreter<'a> {
    metadata: &'a MediaMetadata,
}

impl<'a> PatternInterpreter<'a> {
    pub fn new(metadata: &'a MediaMetadata) -> Self {
        Self { metadata }
    }

    /// Resolve a folder name from a pattern.
    pub fn interpret_folder_pattern(&self, pattern: &str) -> String {
        if pattern.trim().is_empty() || pattern.trim() == "$D" {
            return String::new();
        }
        self.render(pattern)
    }

    /// Resolve a file name (without extension) from a pattern, falling back
    /// to the original stem when the pattern is empty.
    pub fn interpret_file_pattern(
        &self,
        pattern: &str,
        original_filename: &str,
    ) -> String {
        if pattern.trim().is_empty() {
            return Path::new(original_filename)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        let pattern = if pattern.trim() == "ST" { "$T" } else { pattern };
        self.render(pattern)
    }

    fn render(&self, pattern: &str) -> String {
        let mut result = pattern.to_string();
        while result.contains('{') && result.contains('}') {
            let next = self.resolve_innermost_block(&result);
            if next == result {
                break;
            }
            result = next;
        }
        let result = self.replace_variables(&result);
        sanitize_name(&result)
    }

    /// Expand (or drop) the innermost optional block.
    fn resolve_innermost_block(&self, text: &str) -> String {
        let Some(caps) = INNER_BLOCK_RE.captures(text) else {
            return text.to_string();
        };
        let whole = caps.get(0).expect("block match");
        let content = &caps[1];

        let keep = self.block_has_content(content);
        let replacement = if keep { content } else { "" };
        format!(
            "{}{}{}",
            &text[..whole.start()],
            replacement,
            &text[whole.end()..]
        )
    }

    /// A block survives only if it references at least one variable that
    /// resolves to something non-empty.
    fn block_has_content(&self, content: &str) -> bool {
        let mut chars = content.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '$' {
                continue;
            }
            let Some(&var) = chars.peek() else { break };
            if !self.metadata.substitution(var).is_empty() {
                return true;
            }
        }
        false
    }

    fn replace_variables(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut chars = text.char_indices().peekable();
        while let Some((_, ch)) = chars.next() {
            if ch != '$' {
                result.push(ch);
                continue;
            }
            let Some(&(_, var)) = chars.peek() else {
                result.push('$');
                break;
            };
            if !MediaMetadata::variables().contains(&var) {
                // Unknown variables substitute empty; consume the letter so
                // "$X" does not leak into filenames.
                if var.is_ascii_alphanumeric() {
                    chars.next();
                } else {
                    result.push('$');
                }
                continue;
            }
            chars.next();

            match self.metadata.substitution(var) {
                Substitution::Text(value) => result.push_str(&value),
                Substitution::List(items) => {
                    let separator = match chars.peek() {
                        Some(&(_, next)) if LIST_SEPARATORS.contains(&next) => {
                            next.to_string()
                        }
                        _ => ", ".to_string(),
                    };
                    result.push_str(&items.join(&separator));
                }
            }
        }
        result
    }
}

/// Strip filesystem-invalid characters, collapse whitespace and trim.
pub fn sanitize_name(name: &str) -> String {
    let cleaned = INVALID_CHARS_RE.replace_all(name, "");
    let collapsed = WHITESPACE_RE.replace_all(&cleaned, " ");
    collapsed.trim().trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// Apply the folder and file patterns to a staging directory.
///
/// Returns whether the rename pass succeeded plus the (possibly renamed)
/// directory path. File rename conflicts resolve with a ` (N)` counter.
pub fn rename_folder_and_files(
    directory: &Path,
    folder_pattern: &str,
    file_pattern: &str,
    metadata: &MediaMetadata,
) -> (bool, PathBuf) {
    let interpreter = PatternInterpreter::new(metadata);
    let mut current_dir = directory.to_path_buf();

    if !folder_pattern.trim().is_empty() && folder_pattern.trim() != "$D" {
        let new_name = interpreter.interpret_folder_pattern(folder_pattern);
        if !new_name.is_empty() {
            if let Some(parent) = directory.parent() {
                let new_dir = parent.join(&new_name);
                if new_dir != current_dir {
                    match std::fs::rename(&current_dir, &new_dir) {
                        Ok(()) => {
                            info!(
                                from = %current_dir.display(),
                                to = %new_name,
                                "renamed folder"
                            );
                            current_dir = new_dir;
                        }
                        Err(err) => {
                            warn!(
                                directory = %current_dir.display(),
                                error = %err,
                                "failed to rename folder"
                            );
                            return (false, directory.to_path_buf());
                        }
                    }
                }
            }
        }
    }

    let entries = match std::fs::read_dir(&current_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                directory = %current_dir.display(),
                error = %err,
                "failed to list directory for file renames"
            );
            return (false, current_dir);
        }
    };

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let original = entry.file_name().to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let base = interpreter.interpret_file_pattern(file_pattern, &original);
        if base.is_empty() {
            continue;
        }
        let mut new_name = format!("{base}{extension}");
        if new_name == original {
            continue;
        }

        let mut new_path = current_dir.join(&new_name);
        let mut counter = 1;
        while new_path.exists() && new_path != path {
            new_name = format!("{base} ({counter}){extension}");
            new_path = current_dir.join(&new_name);
            counter += 1;
        }

        match std::fs::rename(&path, &new_path) {
            Ok(()) => info!(from = %original, to = %new_name, "renamed file"),
            Err(err) => warn!(
                file = %path.display(),
                error = %err,
                "failed to rename file"
            ),
        }
    }

    (true, current_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn movie_metadata() -> MediaMetadata {
        MediaMetadata {
            title: Some("Example Movie".to_string()),
            year: Some("2021".to_string()),
            genres: vec!["Action".to_string(), "Drama".to_string()],
            ..MediaMetadata::default()
        }
    }

    #[test]
    fn default_folder_pattern_with_year() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_folder_pattern(DEFAULT_FOLDER_PATTERN),
            "Example Movie (2021)"
        );
    }

    #[test]
    fn optional_block_dropped_when_variable_empty() {
        let metadata = MediaMetadata {
            title: Some("Example Movie".to_string()),
            ..MediaMetadata::default()
        };
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_folder_pattern(DEFAULT_FOLDER_PATTERN),
            "Example Movie"
        );
    }

    #[test]
    fn st_magic_token_is_title() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_file_pattern("ST", "original.mkv"),
            "Example Movie"
        );
    }

    #[test]
    fn empty_file_pattern_falls_back_to_stem() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_file_pattern("", "original.mkv"),
            "original"
        );
    }

    #[test]
    fn list_variable_joins_with_following_separator() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_folder_pattern("$G-"),
            "Action-Drama-"
        );
        assert_eq!(
            interpreter.interpret_folder_pattern("[$G]"),
            "[Action, Drama]"
        );
    }

    #[test]
    fn first_letter_variable() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(
            interpreter.interpret_folder_pattern("$1/$T"),
            "EExample Movie"
        );
    }

    #[test]
    fn sanitization_strips_invalid_characters() {
        assert_eq!(sanitize_name("A:B/C  D?"), "AB C D");
        assert_eq!(sanitize_name("  .Movie.  "), "Movie");
    }

    #[test]
    fn unknown_variables_substitute_empty() {
        let metadata = movie_metadata();
        let interpreter = PatternInterpreter::new(&metadata);
        assert_eq!(interpreter.interpret_folder_pattern("$T $Z"), "Example Movie");
    }

    #[test]
    fn rename_pass_applies_patterns() {
        let tmp = TempDir::new().unwrap();
        let staging = tmp.path().join("Example.Movie.2021.1080p-GRP");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("Example.Movie.2021.1080p-GRP.mkv"), b"x")
            .unwrap();
        fs::write(staging.join("Example.Movie.2021.1080p-GRP.nfo"), b"x")
            .unwrap();

        let metadata = movie_metadata();
        let (ok, new_dir) = rename_folder_and_files(
            &staging,
            DEFAULT_FOLDER_PATTERN,
            DEFAULT_FILE_PATTERN,
            &metadata,
        );
        assert!(ok);
        assert_eq!(
            new_dir.file_name().unwrap().to_string_lossy(),
            "Example Movie (2021)"
        );
        assert!(new_dir.join("Example Movie.mkv").exists());
        assert!(new_dir.join("Example Movie.nfo").exists());
    }
}
