//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Strip an optional Markdown code fence from an LLM reply.
///
/// Models often wrap the JSON they return in ```json ... ``` (or a bare
/// ``` ... ```). We remove one leading and one trailing fence line; text
/// without fences passes through untouched.
pub fn strip_code_fence(s: &str) -> &str {
  let t = s.trim();
  let body = if let Some(rest) = t.strip_prefix("```json") {
    rest
  } else if let Some(rest) = t.strip_prefix("```") {
    rest
  } else {
    return t;
  };
  let body = body.strip_prefix('\n').unwrap_or(body);
  let body = body.strip_suffix("```").unwrap_or(body);
  body.trim()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}
