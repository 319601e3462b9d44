//! Storage name generation for staged attachments.
//!
//! Name format: `{timestamp_ms}_{filename}`, or `{timestamp_ms}-{suffix:08x}_{filename}`
//! when the plain name is already taken.

const MAX_FILENAME_LENGTH: usize = 200;

/// Reduce a client-supplied filename to a single safe path component.
///
/// Only the last path component is kept and characters outside
/// `[A-Za-z0-9._-]` become `_`. A name made only of dots and underscores
/// (`.`, `..`, empty) becomes `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(['.', '_']).is_empty() {
        return "file".to_string();
    }

    sanitized
}

/// Generate the on-disk name for a staged file.
pub fn storage_name(timestamp_ms: i64, suffix: Option<u32>, filename: &str) -> String {
    match suffix {
        None => format!("{}_{}", timestamp_ms, filename),
        Some(suffix) => format!("{}-{:08x}_{}", timestamp_ms, suffix, filename),
    }
}
