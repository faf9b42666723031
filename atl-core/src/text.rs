//! Text helpers for table cells.

/// Placeholder rendered for missing optional values
pub const PLACEHOLDER: &str = "-";

/// Fit a value into a fixed column width.
///
/// Newlines collapse to spaces. Text longer than `width` keeps its first
/// `width - 3` characters followed by `...`, so the rendered width stays
/// exactly `width`.
pub fn truncate(s: &str, width: usize) -> String {
  let flattened = s.replace(['\r', '\n'], " ");
  if flattened.chars().count() <= width {
    return flattened;
  }
  if width <= 3 {
    return ".".repeat(width);
  }

  let kept: String = flattened.chars().take(width - 3).collect();
  format!("{kept}...")
}

/// Render an optional string, falling back to [`PLACEHOLDER`] when missing or
/// empty
pub fn or_placeholder(value: Option<&str>) -> String {
  or_default(value, PLACEHOLDER)
}

/// Render an optional string with a custom fallback
pub fn or_default(value: Option<&str>, fallback: &str) -> String {
  match value {
    Some(v) if !v.is_empty() => v.to_string(),
    _ => fallback.to_string(),
  }
}

/// Keep the date part of an ISO-8601 timestamp
pub fn date_only(timestamp: Option<&str>) -> String {
  match timestamp {
    Some(ts) if !ts.is_empty() => ts.chars().take(10).collect(),
    _ => PLACEHOLDER.to_string(),
  }
}

/// Render a boolean as Yes/No
pub fn yes_no(value: bool) -> &'static str {
  if value { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_text_unchanged() {
    assert_eq!(truncate("Fix login", 50), "Fix login");
  }

  #[test]
  fn test_truncate_keeps_width() {
    let long = "a".repeat(80);
    let result = truncate(&long, 50);

    assert_eq!(result.chars().count(), 50);
    assert!(result.ends_with("..."));
    assert_eq!(result.trim_end_matches('.').len(), 47);
  }

  #[test]
  fn test_truncate_exact_width_unchanged() {
    let exact = "b".repeat(60);
    assert_eq!(truncate(&exact, 60), exact);
  }

  #[test]
  fn test_truncate_is_char_safe() {
    let result = truncate("Überprüfung der Änderungen", 10);
    assert_eq!(result, "Überprü...");
    assert_eq!(result.chars().count(), 10);
  }

  #[test]
  fn test_truncate_flattens_newlines() {
    assert_eq!(truncate("line one\nline two", 40), "line one line two");
  }

  #[test]
  fn test_placeholders() {
    assert_eq!(or_placeholder(None), "-");
    assert_eq!(or_placeholder(Some("")), "-");
    assert_eq!(or_placeholder(Some("ABC")), "ABC");
    assert_eq!(or_default(None, "Unassigned"), "Unassigned");
  }

  #[test]
  fn test_date_only() {
    assert_eq!(date_only(Some("2024-03-01T10:15:00.000+0000")), "2024-03-01");
    assert_eq!(date_only(None), "-");
  }
}
