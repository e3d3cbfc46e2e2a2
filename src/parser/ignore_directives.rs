//! Parse nodone-ignore comment directives from source

use std::collections::HashSet;

const IGNORE_NEXT_LINE: &str = "nodone-ignore-next-line";
const IGNORE_LINE: &str = "nodone-ignore";
const DISABLE: &str = "nodone-disable";
const ENABLE: &str = "nodone-enable";

/// Parsed ignore directives from a file
#[derive(Debug, Default)]
pub struct IgnoreDirectives {
    /// Lines (1-indexed) on which diagnostics are suppressed
    lines: HashSet<usize>,
    /// Ranges (start_line, end_line) where the linter is disabled (1-indexed, inclusive)
    disabled_ranges: Vec<(usize, usize)>,
}

impl IgnoreDirectives {
    /// Check if a diagnostic starting on the given line should be dropped
    pub fn is_ignored(&self, line: usize) -> bool {
        self.lines.contains(&line)
            || self
                .disabled_ranges
                .iter()
                .any(|(start, end)| line >= *start && line <= *end)
    }

    /// Parse source code for nodone-ignore comments
    pub fn parse(source: &str) -> Self {
        let mut lines = HashSet::new();
        let mut disabled_ranges: Vec<(usize, usize)> = Vec::new();
        let mut disable_start: Option<usize> = None;

        for (zero_indexed, line) in source.lines().enumerate() {
            let line_no = zero_indexed + 1;

            if line.contains(IGNORE_NEXT_LINE) {
                lines.insert(line_no + 1);
            } else if line.contains(IGNORE_LINE) {
                lines.insert(line_no);
            }

            // Block: /* nodone-disable */ ... /* nodone-enable */
            if line.contains(DISABLE) && disable_start.is_none() {
                disable_start = Some(line_no);
            }
            if line.contains(ENABLE) {
                if let Some(start) = disable_start.take() {
                    disabled_ranges.push((start, line_no));
                }
            }
        }

        // If we never saw nodone-enable, ignore from disable to end of file
        if let Some(start) = disable_start {
            let end = source.lines().count().max(1);
            disabled_ranges.push((start, end));
        }

        Self {
            lines,
            disabled_ranges,
        }
    }
}
