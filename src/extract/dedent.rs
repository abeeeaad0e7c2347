/// Remove the longest common leading whitespace of all non-blank lines.
///
/// Whitespace-only lines come back empty and do not count towards the common
/// prefix.
pub fn dedent(text: &str) -> String {
    textwrap::dedent(text)
}
