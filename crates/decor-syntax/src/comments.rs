use std::collections::HashMap;

use decor_span::LineTable;
use text_size::{TextRange, TextSize};

use crate::ast::File;
use crate::node::{Item, NodeKey, NodeRef};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub pos: TextSize,
    /// Full text including the `//` or `/* */` delimiters.
    pub text: String,
}

impl Comment {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.pos, TextSize::of(self.text.as_str()))
    }

    pub fn is_line_comment(&self) -> bool {
        self.text.starts_with("//")
    }
}

/// Comments with no token and no blank line between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn range(&self) -> TextRange {
        match (self.comments.first(), self.comments.last()) {
            (Some(first), Some(last)) => first.range().cover(last.range()),
            _ => TextRange::default(),
        }
    }
}

/// Splits comments sorted by offset into groups.
///
/// `tokens` are the non-trivia token ranges in source order; empty ranges are
/// ignored.
pub fn group_comments(
    comments: &[Comment],
    tokens: &[TextRange],
    lines: &LineTable,
) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();

    for comment in comments {
        let joins = groups.last().and_then(|group| group.comments.last()).is_some_and(|prev| {
            let end = prev.range().end();
            lines.lines_between(end, comment.pos) <= 1
                && !has_token_between(tokens, end, comment.pos)
        });

        match groups.last_mut() {
            Some(group) if joins => group.comments.push(comment.clone()),
            _ => groups.push(CommentGroup { comments: vec![comment.clone()] }),
        }
    }

    groups
}

fn has_token_between(tokens: &[TextRange], start: TextSize, end: TextSize) -> bool {
    let first = tokens.partition_point(|token| token.start() < start);
    tokens[first..]
        .iter()
        .take_while(|token| token.start() < end)
        .any(|token| !token.is_empty())
}

/// Owner node of every comment group.
pub struct CommentMap<'a> {
    groups: &'a [CommentGroup],
    owners: HashMap<NodeKey, Vec<usize>>,
}

impl<'a> CommentMap<'a> {
    pub fn new(file: &File, lines: &LineTable, groups: &'a [CommentGroup]) -> Self {
        let mut owners: HashMap<NodeKey, Vec<usize>> = HashMap::new();
        for (index, group) in groups.iter().enumerate() {
            let owner = owner(NodeRef::File(file), group.range(), lines);
            owners.entry(owner).or_default().push(index);
        }
        Self { groups, owners }
    }

    /// Groups owned by `key`, in source order.
    pub fn get(&self, key: &NodeKey) -> impl Iterator<Item = &'a CommentGroup> + '_ {
        let groups = self.groups;
        self.owners.get(key).into_iter().flatten().map(move |&index| &groups[index])
    }

    pub fn len(&self) -> usize {
        self.owners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

fn owner(mut node: NodeRef<'_>, group: TextRange, lines: &LineTable) -> NodeKey {
    loop {
        let items = node.items();

        let inner = items.iter().find_map(|item| match item {
            Item::Node(child) if child.range().contains_range(group) && !child.range().is_empty() => {
                Some(*child)
            }
            _ => None,
        });
        if let Some(child) = inner {
            node = child;
            continue;
        }

        let prev = items.iter().rev().find(|item| item.range().end() <= group.start());
        let next = items.iter().find(|item| item.range().start() >= group.end());

        if let Some(Item::Node(prev)) = prev
            && lines.same_line(prev.range().end(), group.start())
        {
            return prev.key();
        }
        return match (prev, next) {
            (_, Some(Item::Node(next))) => next.key(),
            (_, Some(Item::Closing(_))) => node.key(),
            (Some(Item::Node(prev)), _) => prev.key(),
            _ => node.key(),
        };
    }
}

#[cfg(test)]
mod tests {
    use decor_span::LineTable;
    use text_size::{TextRange, TextSize};

    use super::{Comment, group_comments};

    fn comment(pos: u32, text: &str) -> Comment {
        Comment { pos: TextSize::from(pos), text: text.to_owned() }
    }

    #[test]
    fn groups_split_on_blank_lines_and_tokens() {
        let text = "// a\n// b\n\n// c\nx // d\n";
        let lines = LineTable::from_text(text);
        let comments = [comment(0, "// a"), comment(5, "// b"), comment(11, "// c"), comment(18, "// d")];
        let tokens = [TextRange::at(16.into(), 1.into()), TextRange::empty(22.into())];

        let groups = group_comments(&comments, &tokens, &lines);
        let sizes: Vec<_> = groups.iter().map(|group| group.comments.len()).collect();
        assert_eq!(sizes, [2, 1, 1]);
    }

    #[test]
    fn implicit_semicolons_do_not_split_groups() {
        let text = "x // a\n// b\n";
        let lines = LineTable::from_text(text);
        let comments = [comment(2, "// a"), comment(7, "// b")];
        let tokens = [TextRange::at(0.into(), 1.into()), TextRange::empty(6.into())];

        let groups = group_comments(&comments, &tokens, &lines);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].range(), TextRange::new(2.into(), 11.into()));
    }
}
