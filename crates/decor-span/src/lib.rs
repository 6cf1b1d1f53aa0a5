//! Offset ↔ line mapping for source buffers and synthesized trees.

use text_size::{TextRange, TextSize};

/// Line starts of a source buffer, 1-based line numbers.
///
/// A table is either scanned from existing text with [`LineTable::from_text`]
/// or grown one line break at a time with [`LineTable::add_line`] while
/// positions are being synthesized for a tree that has no text yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineTable {
    /// Offset of the first byte of every line. Always starts with `0`.
    starts: Vec<TextSize>,
    len: TextSize,
}

impl Default for LineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTable {
    /// An empty table with a single line starting at offset `0`.
    pub fn new() -> Self {
        Self { starts: vec![TextSize::new(0)], len: TextSize::new(0) }
    }

    pub fn from_text(text: &str) -> Self {
        let mut starts = vec![TextSize::new(0)];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(offset, _)| TextSize::new(offset as u32 + 1)),
        );
        Self { starts, len: TextSize::of(text) }
    }

    /// Registers a line starting at `start`.
    ///
    /// Returns `false` and leaves the table untouched unless `start` lies
    /// strictly after the last registered line start.
    pub fn add_line(&mut self, start: TextSize) -> bool {
        if self.starts.last().is_some_and(|&last| start <= last) {
            return false;
        }
        self.starts.push(start);
        self.len = self.len.max(start);
        true
    }

    /// Total length of the buffer the table describes.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    pub fn set_len(&mut self, len: TextSize) {
        self.len = self.len.max(len);
    }

    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }

    /// The 1-based line `offset` falls on.
    pub fn line(&self, offset: TextSize) -> u32 {
        self.starts.partition_point(|&start| start <= offset) as u32
    }

    /// Offset of the first byte of `line`, if the table has that line.
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        let index = line.checked_sub(1)?;
        self.starts.get(index as usize).copied()
    }

    /// Range of `line` excluding its terminating line break.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let start = self.line_start(line)?;
        let end = match self.line_start(line + 1) {
            Some(next) => next - TextSize::new(1),
            None => self.len.max(start),
        };
        Some(TextRange::new(start, end))
    }

    /// Number of line breaks between `from` and `to`.
    pub fn lines_between(&self, from: TextSize, to: TextSize) -> u32 {
        self.line(to).saturating_sub(self.line(from))
    }

    pub fn same_line(&self, a: TextSize, b: TextSize) -> bool {
        self.line(a) == self.line(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_of_text() {
        let table = LineTable::from_text("ab\ncd\n\nef");

        assert_eq!(table.line_count(), 4);
        assert_eq!(table.line(0.into()), 1);
        assert_eq!(table.line(2.into()), 1);
        assert_eq!(table.line(3.into()), 2);
        assert_eq!(table.line(6.into()), 3);
        assert_eq!(table.line(7.into()), 4);
        assert_eq!(table.line_start(4), Some(7.into()));
        assert_eq!(table.line_start(5), None);
        assert_eq!(table.line_start(0), None);
    }

    #[test]
    fn line_ranges_exclude_the_break() {
        let table = LineTable::from_text("ab\n\ncde");

        assert_eq!(table.line_range(1), Some(TextRange::new(0.into(), 2.into())));
        assert_eq!(table.line_range(2), Some(TextRange::new(3.into(), 3.into())));
        assert_eq!(table.line_range(3), Some(TextRange::new(4.into(), 7.into())));
    }

    #[test]
    fn registered_lines_must_increase() {
        let mut table = LineTable::new();

        assert!(table.add_line(4.into()));
        assert!(!table.add_line(4.into()));
        assert!(!table.add_line(2.into()));
        assert!(table.add_line(9.into()));

        assert_eq!(table.line_count(), 3);
        assert_eq!(table.line(3.into()), 1);
        assert_eq!(table.line(4.into()), 2);
        assert_eq!(table.line(100.into()), 3);
        assert_eq!(table.lines_between(0.into(), 9.into()), 2);
    }
}
