use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use decor_db::{Error, RootDatabase, SourceFile, decompose_file, format_file, round_trip};
use decor_errors::{Diagnostic, Renderer};
use decor_syntax::{Indent, PrintConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
enum Options {
    /// Print the canonical rendering of a file.
    Fmt {
        path: Utf8PathBuf,
        /// Indent with this many spaces instead of tabs.
        #[arg(long)]
        spaces: Option<u8>,
    },
    /// Print a file after a trip through the structural tree.
    Roundtrip {
        path: Utf8PathBuf,
        /// Indent with this many spaces instead of tabs.
        #[arg(long)]
        spaces: Option<u8>,
        /// Fail when the result differs from `fmt`.
        #[arg(long)]
        check: bool,
    },
    /// Print the structural tree of a file.
    Dump { path: Utf8PathBuf },
}

impl Options {
    fn path(&self) -> &Utf8Path {
        match self {
            Self::Fmt { path, .. } | Self::Roundtrip { path, .. } | Self::Dump { path } => path,
        }
    }

    fn config(&self) -> PrintConfig {
        match self {
            Self::Fmt { spaces, .. } | Self::Roundtrip { spaces, .. } => spaces
                .map_or_else(PrintConfig::default, |width| PrintConfig {
                    indent: Indent::Spaces(width),
                }),
            Self::Dump { .. } => PrintConfig::default(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let options = Options::parse();
    let path = options.path();
    let config = options.config();

    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    debug!(%path, bytes = text.len(), "read source");

    let db = RootDatabase::default();
    let file = SourceFile::new(&db, path.to_owned(), text);

    let output = match &options {
        Options::Fmt { .. } => format_file(&db, file, &config),
        Options::Roundtrip { .. } => round_trip(&db, file, &config),
        Options::Dump { .. } => decompose_file(&db, file)
            .as_ref()
            .map(|tree| format!("{tree:#?}\n"))
            .map_err(Clone::clone),
    };
    let output = match output {
        Ok(output) => output,
        Err(err) => {
            report(&db, file, &err);
            return Ok(ExitCode::FAILURE);
        }
    };
    print!("{output}");

    if let Options::Roundtrip { check: true, .. } = &options {
        let expected = format_file(&db, file, &config)?;
        if let Some(line) = first_difference(&expected, &output) {
            eprintln!("{path}: round trip differs from `fmt` at line {line}");
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DECOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(db: &RootDatabase, file: SourceFile, err: &Error) {
    let diagnostic = match err {
        Error::Syntax(diagnostic) => diagnostic.clone(),
        Error::Structure(decor_dst::Error::UnsupportedNodeKind { range, .. }) => {
            Diagnostic::error(err.to_string(), *range)
        }
        Error::Structure(err) => {
            eprintln!("error: {err}");
            return;
        }
    };

    let renderer = Renderer::styled();
    eprintln!("{}", diagnostic.render(&renderer, file.path(db).as_str(), file.text(db)));
}

/// One-based line of the first difference between two renderings.
fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let same = expected.lines().zip(actual.lines()).take_while(|(left, right)| left == right);
    Some(same.count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_difference_is_one_based() {
        assert_eq!(first_difference("a\nb\n", "a\nb\n"), None);
        assert_eq!(first_difference("a\nb\n", "a\nc\n"), Some(2));
        assert_eq!(first_difference("a\n", "a\nb\n"), Some(2));
    }

    #[test]
    fn spaces_select_indentation() {
        let options = Options::parse_from(["decor", "fmt", "main.go", "--spaces", "2"]);
        assert_eq!(options.path(), "main.go");
        assert_eq!(options.config(), PrintConfig { indent: Indent::Spaces(2) });

        let options = Options::parse_from(["decor", "roundtrip", "main.go", "--check"]);
        assert!(matches!(options, Options::Roundtrip { check: true, spaces: None, .. }));
        assert_eq!(options.config(), PrintConfig::default());
    }
}
