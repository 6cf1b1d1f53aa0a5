use std::time::Instant;

pub use decor_errors::Diagnostic;
pub use decor_parse::ParsedFile;
use decor_syntax::{PrintConfig, render};
pub use line_index::LineIndex;
use salsa::Database;
use tracing::debug;

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl Database for RootDatabase {}

#[salsa::input(debug)]
pub struct SourceFile {
    #[returns(ref)]
    pub path: camino::Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl SourceFile {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }

    #[salsa::tracked(returns(ref))]
    pub fn parse(self, db: &dyn Database) -> Result<ParsedFile, Diagnostic> {
        let start = Instant::now();
        let parsed = decor_parse::parse(self.text(db));
        debug!(
            path = %self.path(db),
            ok = parsed.is_ok(),
            elapsed = ?start.elapsed(),
            "parsed"
        );
        parsed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] Diagnostic),
    #[error(transparent)]
    Structure(#[from] decor_dst::Error),
}

/// The structural tree of `file`, carrying its comments and blank lines.
#[salsa::tracked(returns(ref))]
pub fn decompose_file(db: &dyn Database, file: SourceFile) -> Result<decor_dst::File, Error> {
    let parsed = file.parse(db).as_ref().map_err(Clone::clone)?;

    let start = Instant::now();
    let tree = decor_dst::decompose(&parsed.file, &parsed.lines, &parsed.comments)?;
    debug!(
        path = %file.path(db),
        decls = tree.decls.len(),
        comments = parsed.comments.len(),
        elapsed = ?start.elapsed(),
        "decomposed"
    );
    Ok(tree)
}

/// Renders `file` through the structural tree.
pub fn round_trip(
    db: &dyn Database,
    file: SourceFile,
    config: &PrintConfig,
) -> Result<String, Error> {
    let tree = decompose_file(db, file).as_ref().map_err(Clone::clone)?;

    let start = Instant::now();
    let decor_dst::Recomposed { file: native, lines, comments } = decor_dst::recompose(tree)?;
    debug!(path = %file.path(db), elapsed = ?start.elapsed(), "recomposed");

    Ok(render(&native, &lines, &comments, config))
}

/// Renders the parsed file directly. [`round_trip`] must agree with it.
pub fn format_file(
    db: &dyn Database,
    file: SourceFile,
    config: &PrintConfig,
) -> Result<String, Error> {
    let parsed = file.parse(db).as_ref().map_err(Clone::clone)?;
    Ok(render(&parsed.file, &parsed.lines, &parsed.comments, config))
}
