use decor_span::LineTable;
use text_size::TextSize;

use crate::{Error, Result};

/// A piece of the whitespace between two printed items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gap {
    Space(u32),
    Line,
}

impl Gap {
    /// Columns the piece covers; a line break counts as one.
    pub fn width(self) -> u32 {
        match self {
            Self::Space(width) => width,
            Self::Line => 1,
        }
    }
}

/// Splits the source between `left` and `right` into spaces and line breaks.
///
/// On a single line the separator column the printer supplies is not part of
/// the gap, so adjacent items and items one column apart yield nothing.
/// Items two columns apart yield `Space(1)`, the column beyond the separator.
pub fn gap(lines: &LineTable, left: TextSize, right: TextSize) -> Result<Vec<Gap>> {
    if left > right {
        return Err(Error::InvalidRange { left, right });
    }

    let first = lines.line(left);
    let last = lines.line(right);
    if first == last {
        let width = u32::from(right - left);
        return Ok(if width <= 1 { Vec::new() } else { vec![Gap::Space(width - 1)] });
    }

    let line_end = |line: u32| lines.line_range(line).map_or(right, |range| range.end());
    let mut pieces = Vec::new();
    let space = |pieces: &mut Vec<Gap>, width: TextSize| {
        if width > TextSize::new(0) {
            pieces.push(Gap::Space(width.into()));
        }
    };

    space(&mut pieces, line_end(first) - left);
    pieces.push(Gap::Line);
    for line in first + 1..last {
        if let Some(range) = lines.line_range(line) {
            space(&mut pieces, range.len());
        }
        pieces.push(Gap::Line);
    }
    let start = lines.line_start(last).unwrap_or(right);
    space(&mut pieces, right - start);

    Ok(pieces)
}

/// Number of line breaks [`gap`] finds between `left` and `right`.
pub(crate) fn line_breaks(lines: &LineTable, left: TextSize, right: TextSize) -> Result<usize> {
    Ok(gap(lines, left, right)?.into_iter().filter(|piece| *piece == Gap::Line).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(text: &str, left: u32, right: u32) -> Vec<Gap> {
        gap(&LineTable::from_text(text), left.into(), right.into()).unwrap()
    }

    #[test]
    fn same_line() {
        assert_eq!(pieces("a b  c", 1, 1), []);
        assert_eq!(pieces("a b  c", 1, 2), []);
        assert_eq!(pieces("a b  c", 1, 3), [Gap::Space(1)]);
        assert_eq!(pieces("a b  c", 3, 5), [Gap::Space(1)]);
        assert_eq!(pieces("a b  c", 0, 5), [Gap::Space(4)]);
    }

    #[test]
    fn one_line_break() {
        assert_eq!(pieces("ab\ncd", 2, 3), [Gap::Line]);
        assert_eq!(pieces("ab  \n  cd", 2, 7), [Gap::Space(2), Gap::Line, Gap::Space(2)]);
    }

    #[test]
    fn spanned_lines() {
        let text = "a\n\n  x\nb";
        let gap = pieces(text, 1, 7);
        assert_eq!(gap, [Gap::Line, Gap::Line, Gap::Space(3), Gap::Line]);
        assert_eq!(gap.iter().map(|piece| piece.width()).sum::<u32>(), 6);
    }

    #[test]
    fn widths_sum_to_distance() {
        let text = "func f() {\n\tx := 1 // one\n\n\treturn\n}\n";
        let lines = LineTable::from_text(text);
        for (left, right) in [(10, 12), (8, 30), (0, 36)] {
            let gap = gap(&lines, left.into(), right.into()).unwrap();
            assert_eq!(gap.iter().map(|piece| piece.width()).sum::<u32>(), right - left);
        }
    }

    #[test]
    fn reversed_range() {
        let lines = LineTable::from_text("abc");
        assert_eq!(
            gap(&lines, 2.into(), 1.into()),
            Err(Error::InvalidRange { left: 2.into(), right: 1.into() })
        );
    }

    #[test]
    fn counts_line_breaks() {
        let lines = LineTable::from_text("a\n\n\nb");
        assert_eq!(line_breaks(&lines, 0.into(), 4.into()), Ok(3));
        assert_eq!(line_breaks(&lines, 0.into(), 1.into()), Ok(0));
    }
}
