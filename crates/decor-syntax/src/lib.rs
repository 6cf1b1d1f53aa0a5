pub mod ast;
mod comments;
mod node;
mod printer;
mod syntax_kind;
mod syntax_set;

pub use comments::{Comment, CommentGroup, CommentMap, group_comments};
pub use node::{Item, NodeKey, NodeKind, NodeRef};
pub use printer::{Indent, PrintConfig, render};
pub use syntax_kind::SyntaxKind;
pub use syntax_set::SyntaxSet;
