//! Lossless round-trip between the positioned syntax tree and a position-free
//! structural tree whose nodes carry their comments and line breaks as
//! [`Markup`].
//!
//! [`decompose`] lifts a parsed file into the structural tree, [`recompose`]
//! synthesizes positions for a structural tree so the printer can render it.

mod decompose;
mod error;
mod gap;
mod markup;
mod recompose;
mod tree;
#[cfg(test)]
mod tests;

use decor_syntax::{PrintConfig, render};

pub use decompose::decompose;
pub use error::{Error, Result};
pub use gap::{Gap, gap};
pub use markup::{Markup, Trivia};
pub use recompose::{Recomposed, recompose};
pub use tree::*;

/// Renders a structural tree with the default print configuration.
pub fn to_text(file: &File) -> Result<String> {
    let Recomposed { file, lines, comments } = recompose(file)?;
    Ok(render(&file, &lines, &comments, &PrintConfig::default()))
}
