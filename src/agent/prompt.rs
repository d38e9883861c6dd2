//! System prompt for the personal chef agent.
//!
//! The compiled-in prompt can be overridden with a markdown file, either
//! given explicitly or placed in the user prompt directory
//! (`~/.chef-agent/prompts/personal_chef.md`).

use std::path::{Path, PathBuf};

use crate::error::AgentError;

/// System prompt for the personal chef agent.
pub const PERSONAL_CHEF_SYSTEM_PROMPT: &str = "You are a personal chef. The user will give you a list of ingredients they have left over in their house.

Using the web search tool, search the web for recipes that can be made with the ingredients they have.

Return recipe suggestions and eventually the recipe instructions to the user, if requested.";

/// File name of the prompt override inside the prompt directory.
pub const PROMPT_FILENAME: &str = "personal_chef.md";

/// Prompt directory relative to the user's home directory.
const DEFAULT_PROMPT_DIR: &str = ".chef-agent/prompts";

/// Reads a system prompt from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`AgentError::PromptFile`] if the file cannot be read.
pub fn load_prompt_file(path: &Path) -> Result<String, AgentError> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| AgentError::PromptFile {
            path: path.display().to_string(),
            source,
        })
}

/// Returns the default prompt directory (`~/.chef-agent/prompts`).
#[must_use]
pub fn default_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
}

/// Locates a prompt override file in `dir` (or the default directory).
///
/// Returns `None` when no override exists, in which case the compiled-in
/// prompt applies.
#[must_use]
pub fn find_override(dir: Option<&Path>) -> Option<PathBuf> {
    dir.map(Path::to_path_buf)
        .or_else(default_dir)
        .map(|d| d.join(PROMPT_FILENAME))
        .filter(|p| p.is_file())
}

/// Writes the compiled-in prompt to `dir/personal_chef.md`.
///
/// Creates the directory if needed. An existing file is left untouched.
/// Returns the path and whether a new file was written.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be created.
pub fn write_default(dir: &Path) -> std::io::Result<(PathBuf, bool)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(PROMPT_FILENAME);
    if path.exists() {
        return Ok((path, false));
    }
    std::fs::write(&path, format!("{PERSONAL_CHEF_SYSTEM_PROMPT}\n"))?;
    Ok((path, true))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_web_search() {
        assert!(PERSONAL_CHEF_SYSTEM_PROMPT.starts_with("You are a personal chef."));
        assert!(PERSONAL_CHEF_SYSTEM_PROMPT.contains("web search tool"));
    }

    #[test]
    fn test_write_default_then_load() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let (path, created) = write_default(dir.path()).unwrap_or_else(|e| panic!("{e}"));
        assert!(created);

        let loaded = load_prompt_file(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(loaded, PERSONAL_CHEF_SYSTEM_PROMPT);
    }

    #[test]
    fn test_write_default_keeps_existing() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let existing = dir.path().join(PROMPT_FILENAME);
        std::fs::write(&existing, "custom").unwrap_or_else(|e| panic!("{e}"));

        let (path, created) = write_default(dir.path()).unwrap_or_else(|e| panic!("{e}"));
        assert!(!created);
        assert_eq!(path, existing);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap_or_default(),
            "custom"
        );
    }

    #[test]
    fn test_find_override() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        assert!(find_override(Some(dir.path())).is_none());

        write_default(dir.path()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            find_override(Some(dir.path())),
            Some(dir.path().join(PROMPT_FILENAME))
        );
    }
}
