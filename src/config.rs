// ABOUTME: Version/banner constants and the import mechanism's configuration

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "april v0.1.0";
pub const WELCOME_SUBTITLE: &str = "a small statically-typed, tree-walking scripting language";
pub const WELCOME_FOOTER: &str = "Type an expression, or Ctrl-D to exit.";

/// File extension required of a script or an `import`ed source file.
pub const SOURCE_EXTENSION: &str = "april";

/// Governs how `import "path"` resolves a relative path. The core
/// lexer only knows how to read a path handed to it; the host decides
/// what that path is relative to.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Base directory relative paths are resolved against. Grounded on
    /// `lexer.ReadFile` (original_source), which reads relative to the
    /// process's current working directory with no search-path list.
    pub base_dir: std::path::PathBuf,
    pub required_extension: &'static str,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            base_dir: std::env::current_dir().unwrap_or_default(),
            required_extension: SOURCE_EXTENSION,
        }
    }
}
