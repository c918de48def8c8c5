//! Dependency declaration normalization.
//!
//! Build reports list the installed build dependencies one or more per line,
//! comma separated and with version constraints in parentheses:
//!
//! ```text
//!  autoconf (= 2.69-10),
//!  automake (= 1:1.15-6), autopoint (= 0.19.8.1-4),
//! ```
//!
//! [`normalize`] turns each such line into tokens an `apt-get install`
//! command accepts, and [`DependencyBlock`] stitches the normalized lines back
//! together with the original line layout.

/// Separator inserted before a dependency line that starts a new recipe line.
pub const CONTINUATION: &str = " \\\n";

/// Normalize one raw dependency declaration line into install tokens.
///
/// Parenthesized constraints are stripped first. An exact pin `(= V)` becomes
/// the apt pin `name=V`; any other relation is dropped along with its
/// parentheses. Commas then separate declarations, each declaration loses its
/// interior whitespace, and the results are joined with single spaces.
///
/// A line without commas is already a token list (normalized output never
/// contains one), so its whitespace separates tokens instead of being removed.
/// This keeps the function idempotent.
pub fn normalize(line: &str) -> String {
  let stripped = strip_constraints(line);

  if !stripped.contains(',') {
    return stripped.split_whitespace().collect::<Vec<_>>().join(" ");
  }

  stripped
    .split(',')
    .map(|declaration| declaration.split_whitespace().collect::<String>())
    .filter(|token| !token.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

fn strip_constraints(line: &str) -> String {
  let mut out = String::with_capacity(line.len());
  let mut remaining = line;

  while let Some(open) = remaining.find('(') {
    out.push_str(&remaining[..open]);
    let after = &remaining[open + 1..];
    // An unclosed constraint runs to the end of the line.
    let (constraint, rest) = match after.find(')') {
      Some(close) => (&after[..close], &after[close + 1..]),
      None => (after, ""),
    };

    if let Some(version) = exact_pin(constraint) {
      let name_end = out.trim_end().len();
      out.truncate(name_end);
      out.push('=');
      out.push_str(&version);
    }

    remaining = rest;
  }

  out.push_str(remaining);
  out
}

/// Returns the pinned version if the constraint is an exact `= V` relation.
fn exact_pin(constraint: &str) -> Option<String> {
  let version = constraint.trim().strip_prefix('=')?;
  let version: String = version.split_whitespace().collect();
  (!version.is_empty()).then_some(version)
}

/// Accumulates normalized dependency lines into the install argument list.
///
/// The first line is written bare. Every later line is preceded by a single
/// space, except that a non-blank line at position 4, 7, 10, ... (1-based) is
/// preceded by [`CONTINUATION`] so the rendered recipe keeps the line breaks of
/// the published report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyBlock {
  text: String,
  lines: usize,
}

impl DependencyBlock {
  pub fn new() -> Self {
    Self::default()
  }

  /// Normalize a raw line and append it.
  pub fn push_line(&mut self, raw: &str) {
    self.lines += 1;

    if self.lines > 1 {
      if self.lines % 3 == 1 && !raw.trim().is_empty() {
        self.text.push_str(CONTINUATION);
      } else {
        self.text.push(' ');
      }
    }

    self.text.push_str(&normalize(raw));
  }

  /// Number of raw lines consumed, blank ones included.
  pub fn line_count(&self) -> usize {
    self.lines
  }

  /// True when no install token has been accumulated.
  pub fn is_empty(&self) -> bool {
    self.text.trim().is_empty()
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  /// Install tokens in order, without layout.
  pub fn tokens(&self) -> impl Iterator<Item = &str> {
    self.text.split_whitespace().filter(|token| *token != "\\")
  }
}

impl std::fmt::Display for DependencyBlock {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.text)
  }
}
