use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A front-end error pointing at a range of the source text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let start = usize::from(self.range.start()).min(text.len());
        let end = usize::from(self.range.end()).clamp(start, text.len());

        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(start..end).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_snippet_with_origin() {
        let text = "package main\nfunc (\n";
        let diagnostic = Diagnostic::error("expected `)`", TextRange::new(18.into(), 19.into()));

        let rendered = diagnostic.render(&Renderer::plain(), "main.go", text).to_string();

        assert!(rendered.contains("error: expected `)`"), "{rendered}");
        assert!(rendered.contains("main.go"), "{rendered}");
    }
}
