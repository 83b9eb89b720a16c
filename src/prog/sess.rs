use std::sync::Arc;

use annotate_snippets::display_list::{DisplayList, FormatOptions};
use annotate_snippets::snippet::*;
use codemap::File;
use proc_macro2::{LineColumn, Span};

/// A compilation session: the source file, plus helpers to render
/// diagnostics against it.
#[derive(Debug)]
pub struct Sess {
    pub file: Arc<File>,
}

impl Sess {
    pub fn new(file: &Arc<File>) -> Sess {
        Sess { file: file.clone() }
    }

    fn pos(&self, lc: LineColumn) -> usize {
        let line_start = self.file.line_span(lc.line - 1).low() - self.file.span.low();
        line_start as usize + lc.column
    }

    pub fn error_ann<'a>(&self, label: &'a str, span: Span) -> SourceAnnotation<'a> {
        SourceAnnotation {
            annotation_type: AnnotationType::Error,
            label,
            range: (self.pos(span.start()), self.pos(span.end())),
        }
    }

    pub fn info_ann<'a>(&self, label: &'a str, span: Span) -> SourceAnnotation<'a> {
        SourceAnnotation {
            annotation_type: AnnotationType::Info,
            label,
            range: (self.pos(span.start()), self.pos(span.end())),
        }
    }

    pub fn error_snippet(
        &self,
        message: &str,
        annotations: Vec<SourceAnnotation>,
        footer: Vec<Annotation>,
    ) -> String {
        let snippet = Snippet {
            title: Some(Annotation {
                id: None,
                label: Some(message),
                annotation_type: AnnotationType::Error,
            }),
            footer,
            slices: vec![Slice {
                source: self.file.source(),
                line_start: 1,
                origin: Some(self.file.name()),
                fold: false,
                annotations,
            }],
            opt: FormatOptions {
                color: true,
                ..Default::default()
            },
        };

        DisplayList::from(snippet).to_string()
    }

    pub fn footer_note<'a>(&self, message: &'a str) -> Annotation<'a> {
        Annotation {
            annotation_type: AnnotationType::Note,
            label: Some(message),
            id: None,
        }
    }
}
