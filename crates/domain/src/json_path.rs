//! Minimal JSONPath lookup used by body predicates.
//!
//! Supports `$`, `$.field`, `$.field.nested`, `$.array[0]` and the bare-key
//! shorthand `field` for `$.field`.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Looks up `path` inside `json`.
///
/// Returns `Ok(None)` when the path is well formed but absent.
///
/// # Errors
///
/// Returns `DomainError::InvalidPath` for malformed paths.
pub fn lookup<'a>(json: &'a Value, path: &str) -> DomainResult<Option<&'a Value>> {
    let mut current = json;
    for (name, index) in parse(path)? {
        if !name.is_empty() {
            current = match current.get(name.as_str()) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
        if let Some(idx) = index {
            current = match current.get(idx) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
    }

    Ok(Some(current))
}

/// Validates a path without evaluating it.
///
/// # Errors
///
/// Returns `DomainError::InvalidPath` for malformed paths.
pub fn validate(path: &str) -> DomainResult<()> {
    parse(path).map(|_| ())
}

fn parse(path: &str) -> DomainResult<Vec<(String, Option<usize>)>> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid(path, "path is empty"));
    }

    let rest = match trimmed.strip_prefix('$') {
        Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
        None => trimmed,
    };

    split_path_segments(rest)
        .iter()
        .map(|segment| {
            parse_array_access(segment)
                .map(|(name, index)| (name.to_string(), index))
                .map_err(|reason| invalid(path, &reason))
        })
        .collect()
}

fn invalid(path: &str, reason: &str) -> DomainError {
    DomainError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse `field[0]` into `("field", Some(0))` and `field` into `("field", None)`.
fn parse_array_access(segment: &str) -> Result<(&str, Option<usize>), String> {
    let Some(bracket_start) = segment.find('[') else {
        return Ok((segment, None));
    };
    let Some(inner) = segment[bracket_start + 1..].strip_suffix(']') else {
        return Err(format!("unclosed bracket in `{segment}`"));
    };
    let idx = inner
        .parse::<usize>()
        .map_err(|_| format!("invalid array index `{inner}`"))?;
    Ok((&segment[..bracket_start], Some(idx)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_bare_key_and_dollar_path_agree() {
        let body = json!({"message": "User not found!"});
        assert_eq!(lookup(&body, "message").unwrap(), Some(&json!("User not found!")));
        assert_eq!(lookup(&body, "$.message").unwrap(), Some(&json!("User not found!")));
    }

    #[test]
    fn test_nested_and_indexed() {
        let body = json!({"products": [{"name": "Blue Top", "brand": {"name": "Polo"}}]});
        assert_eq!(
            lookup(&body, "$.products[0].brand.name").unwrap(),
            Some(&json!("Polo"))
        );
        assert_eq!(lookup(&body, "$.products[3]").unwrap(), None);
    }

    #[test]
    fn test_root() {
        let body = json!([1, 2]);
        assert_eq!(lookup(&body, "$").unwrap(), Some(&body));
    }

    #[test]
    fn test_missing_key_is_none() {
        let body = json!({"brands": []});
        assert_eq!(lookup(&body, "products").unwrap(), None);
    }

    #[test]
    fn test_malformed_paths() {
        assert!(validate("").is_err());
        assert!(validate("$.items[x]").is_err());
        assert!(validate("$.items[0").is_err());
        assert!(validate("$.items[0]").is_ok());
    }
}
