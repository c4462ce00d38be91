//! Line-oriented profile parser.

use regex::Regex;
use std::sync::LazyLock;

// Everything from the first `#` or `//` to the end of the line.
static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:#|//).*$").expect("Invalid comment regex"));

/// How a field reference is merged between original and randomized settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// The field takes its randomized value; everything else stays original.
    Include,
    /// The field keeps its original value; everything else is randomized.
    #[default]
    Exclude,
}

/// One parsed profile instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDirective {
    /// Changes the mode for the directives that follow.
    ModeSwitch(MergeMode),
    /// Names a field to merge under the current mode. `raw` has any leading
    /// `.` removed; `line` is the 1-based line in the profile file.
    FieldReference { raw: String, line: usize },
}

/// Parse raw profile lines into directives, in file order.
///
/// Comments and blank lines are dropped. Lines starting with `INCLU` or
/// `EXCLU` switch mode; anything else is a field reference.
pub fn parse<I, S>(lines: I) -> Vec<ProfileDirective>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| parse_line(line.as_ref(), i + 1))
        .collect()
}

fn parse_line(line: &str, line_number: usize) -> Option<ProfileDirective> {
    let stripped = COMMENT_PATTERN.replace(line, "");
    let text = stripped.trim();

    if text.is_empty() {
        return None;
    }

    let directive = if text.starts_with("INCLU") {
        ProfileDirective::ModeSwitch(MergeMode::Include)
    } else if text.starts_with("EXCLU") {
        ProfileDirective::ModeSwitch(MergeMode::Exclude)
    } else {
        let raw = text.strip_prefix('.').unwrap_or(text);
        ProfileDirective::FieldReference {
            raw: raw.to_string(),
            line: line_number,
        }
    };

    Some(directive)
}
