use crate::SyntaxKind;

/// A set of token kinds packed into one word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyntaxSet(u128);

impl SyntaxSet {
    pub const EMPTY: Self = Self(0);

    const fn bit(kind: SyntaxKind) -> u128 {
        let index = kind as u32;
        debug_assert!(index < u128::BITS, "syntax kind does not fit in the set");
        1 << index
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < N {
            bits |= Self::bit(kinds[i]);
            i += 1;
        }
        Self(bits)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, kind: SyntaxKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::SyntaxSet;
    use crate::SyntaxKind::*;

    #[test]
    fn membership_spans_the_whole_word() {
        const LOW: SyntaxSet = SyntaxSet::new([LEFT_PAREN, COMMA]);
        const HIGH: SyntaxSet = SyntaxSet::new([EOF, STRING]);

        let both = LOW.union(HIGH);
        assert!(both.contains(LEFT_PAREN));
        assert!(both.contains(EOF));
        assert!(!both.contains(NAME));
        assert!(!LOW.contains(STRING));
    }
}
