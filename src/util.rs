use crate::{Error, Result};

/// Splits a command name such as `math.add` into its segments.
///
/// Fails if the name is empty or any segment is empty.
pub fn split_name(name: &str, separator: char) -> Result<Vec<&str>> {
    let segments: Vec<&str> = name.split(separator).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(segments)
}

/// Joins path segments back into a command name
pub fn join_path<S: AsRef<str>>(segments: &[S], separator: char) -> String {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            joined.push(separator);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}
