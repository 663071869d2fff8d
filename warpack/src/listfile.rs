//! Parsing of the plain-text `(listfile)` special file
//!
//! Archives optionally carry a newline-separated list of the logical
//! names they contain. Only the text format is handled; names are
//! returned as stored, in backslash form.

/// Splits `(listfile)` bytes into names
///
/// Lines are separated by LF, CR LF or `;`; blank lines are dropped.
/// Non-UTF-8 lines are skipped, matching the lenient handling of
/// real-world archives.
pub fn parse(data: &[u8]) -> Vec<String> {
    data.split(|&b| b == b'\n' || b == b'\r' || b == b';')
        .filter(|line| !line.is_empty())
        .filter_map(|line| std::str::from_utf8(line).ok())
        .map(|line| line.to_string())
        .collect()
}
