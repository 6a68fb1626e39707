use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_script_patterns() -> Vec<String> {
    vec![r"\.js$".to_string(), r"\.ts$".to_string()]
}

pub(crate) fn default_lit_modules() -> Vec<String> {
    ["lit", "lit-html", "lit-element"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_ignore_fragments() -> Vec<String> {
    [r"<\s", r"<=", r"\$\{", r"\}"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_style_extensions() -> Vec<String> {
    vec![".css".to_string(), ".scss".to_string()]
}

pub(crate) fn default_script_type() -> String {
    "module".to_string()
}

pub(crate) fn default_gzip_level() -> u32 {
    9
}

pub(crate) fn default_brotli_quality() -> u32 {
    11
}
