//! Extraction of fenced code blocks from markdown text.

use crate::block::CodeBlock;

/// Language recorded for fences without an info string.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const MIN_FENCE_LEN: usize = 3;

/// Turns free-form agent output into an ordered list of code blocks.
pub trait CodeExtractor: Send + Sync {
    /// Returns the code blocks found in `text`, in document order.
    fn extract(&self, text: &str) -> Vec<CodeBlock>;
}

/// Extracts backtick and tilde fenced blocks from markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCodeExtractor;

impl MarkdownCodeExtractor {
    /// Creates the extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CodeExtractor for MarkdownCodeExtractor {
    fn extract(&self, text: &str) -> Vec<CodeBlock> {
        let mut blocks = Vec::new();
        let mut open: Option<OpenFence<'_>> = None;

        for line in text.lines() {
            let trimmed = line.trim_start();
            if let Some(mut fence) = open.take() {
                if fence.is_closed_by(trimmed) {
                    blocks.push(fence.finish());
                } else {
                    fence.lines.push(line);
                    open = Some(fence);
                }
                continue;
            }
            open = OpenFence::parse(trimmed);
        }

        // An unterminated fence is not a code block.
        blocks
    }
}

#[derive(Debug)]
struct OpenFence<'a> {
    marker: char,
    len: usize,
    language: String,
    lines: Vec<&'a str>,
}

impl<'a> OpenFence<'a> {
    fn parse(line: &str) -> Option<Self> {
        let marker = line.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = line.chars().take_while(|&c| c == marker).count();
        if len < MIN_FENCE_LEN {
            return None;
        }

        let info = line[len * marker.len_utf8()..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }

        let language = info
            .split_whitespace()
            .next()
            .map_or_else(|| UNKNOWN_LANGUAGE.to_owned(), str::to_lowercase);

        Some(Self {
            marker,
            len,
            language,
            lines: Vec::new(),
        })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let run = line.chars().take_while(|&c| c == self.marker).count();
        run >= self.len && line[run * self.marker.len_utf8()..].trim().is_empty()
    }

    fn finish(self) -> CodeBlock {
        CodeBlock::new(self.language, self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_blocks_in_order() {
        let text = "Run this:\n```python\nx = 1\nprint(x)\n```\nthen\n```sh\nls -la\n```\n";
        let blocks = MarkdownCodeExtractor::new().extract(text);
        assert_eq!(
            blocks,
            [
                CodeBlock::new("python", "x = 1\nprint(x)"),
                CodeBlock::new("sh", "ls -la"),
            ]
        );
    }

    #[test]
    fn untagged_fence_is_unknown() {
        let blocks = MarkdownCodeExtractor::new().extract("```\n1 + 1\n```");
        assert_eq!(blocks, [CodeBlock::new(UNKNOWN_LANGUAGE, "1 + 1")]);
    }

    #[test]
    fn language_is_lowercased_and_attributes_ignored() {
        let blocks = MarkdownCodeExtractor::new().extract("``` Python title=\"demo\"\npass\n```");
        assert_eq!(blocks[0].language, "python");
    }

    #[test]
    fn tilde_fence_and_longer_closing_fence() {
        let text = "~~~~py\nprint('```')\n~~~\nstill code\n~~~~~\n";
        let blocks = MarkdownCodeExtractor::new().extract(text);
        assert_eq!(blocks, [CodeBlock::new("py", "print('```')\n~~~\nstill code")]);
    }

    #[test]
    fn inline_and_unterminated_fences_ignored() {
        let extractor = MarkdownCodeExtractor::new();
        assert!(extractor.extract("use ```python x``` inline").is_empty());
        assert!(extractor.extract("```python\nx = 1\n").is_empty());
        assert!(extractor.extract("no code here").is_empty());
    }

    #[test]
    fn handles_crlf_and_indented_fences() {
        let blocks = MarkdownCodeExtractor::new().extract("  ```python\r\n  y = 2\r\n  ```\r\n");
        assert_eq!(blocks, [CodeBlock::new("python", "  y = 2")]);
    }
}
