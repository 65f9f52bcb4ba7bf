//! Per-extension language tables: single-line comment prefixes,
//! first-word deny lists, and markdown fence names.
//!
//! Extensions are matched without their leading dot, case-insensitively.
//! The comment prefix decides which lines the parser drops as
//! comment-only; the deny lists drop import/module boilerplate that
//! would otherwise dominate the duplicate buckets.

/// Normalize an extension argument: strip the leading dot, lowercase.
pub fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Single-line comment prefix for a (normalized) extension.
pub fn comment_prefix(ext: &str) -> Option<&'static str> {
    let prefix = match ext {
        // C-style
        "go" | "c" | "h" | "cpp" | "hpp" | "cc" | "cxx" | "java" | "js" | "jsx" | "ts" | "tsx"
        | "cs" | "swift" | "kt" | "kts" | "scala" | "rs" | "php" | "m" | "mm" | "dart" | "v"
        | "zig" => "//",
        // Hash-style
        "py" | "rb" | "sh" | "bash" | "zsh" | "pl" | "pm" | "r" | "yaml" | "yml" | "toml"
        | "tf" | "cmake" | "make" | "mk" | "ps1" | "nim" | "jl" | "ex" | "exs" | "cr" => "#",
        // Double-dash style
        "sql" | "lua" | "hs" | "elm" | "ada" | "vhdl" => "--",
        // Semicolon style
        "lisp" | "cl" | "scm" | "clj" | "cljs" | "el" | "asm" => ";",
        // Percent style
        "tex" | "mat" | "erl" | "hrl" | "pro" | "prolog" => "%",
        // Apostrophe style
        "vb" | "bas" | "vbs" => "'",
        _ => return None,
    };
    Some(prefix)
}

/// First-word tokens that mark boilerplate lines for a given extension.
/// Lines starting with one of these are skipped entirely.
pub fn skip_first_words(ext: &str) -> &'static [&'static str] {
    match ext {
        "cs" => &["using", "#"],
        "go" | "java" | "kt" | "scala" => &["import", "package"],
        "ts" | "tsx" | "js" | "jsx" => &["import", "export"],
        "py" => &["import", "from"],
        "rs" => &["use", "mod"],
        _ => &[],
    }
}

/// Markdown code-fence language hint for a (normalized) extension.
/// Falls back to the extension itself.
pub fn markdown_lang(ext: &str) -> &str {
    match ext {
        "go" => "go",
        "c" | "h" => "c",
        "cpp" | "hpp" | "cc" | "cxx" => "cpp",
        "java" => "java",
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "cs" => "csharp",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "rs" => "rust",
        "php" => "php",
        "py" => "python",
        "rb" => "ruby",
        "sh" | "bash" => "bash",
        "sql" => "sql",
        "lua" => "lua",
        "hs" => "haskell",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ex" | "exs" => "elixir",
        "clj" | "cljs" => "clojure",
        "jl" => "julia",
        "nim" => "nim",
        "zig" => "zig",
        other => other,
    }
}
