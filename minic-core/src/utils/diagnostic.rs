use std::{io::Write, path::PathBuf};
pub use codespan_reporting::diagnostic::{LabelStyle, Severity};
use codespan_reporting::{diagnostic::Label as CodespanLabel, files::SimpleFiles};
use termcolor::WriteColor;
use super::src_span::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan
}

impl Label {
    pub fn to_codespan_label(&self, file_id: usize, label_style: Option<LabelStyle>) -> CodespanLabel<usize> {
        let label = CodespanLabel::new(
            label_style.unwrap_or(LabelStyle::Primary),
            file_id,
            (self.span.start as usize)..(self.span.end as usize),
        );

        match &self.text {
            None => label,
            Some(text) => label.with_message(text.clone()),
        }
    }
}

#[derive(Debug)]
pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub label: Label,
    pub extra_labels: Vec<Label>,
}

#[derive(Debug)]
pub struct Diagnostic<'a> {
    pub title: String,
    pub text: String,
    pub hint: Option<String>,
    pub level: Level,
    pub location: Option<Location<'a>>
}

impl<'a> Diagnostic<'a> {
    pub fn write(&self, buf: &mut impl WriteColor) -> std::io::Result<()> {
        match &self.location {
            Some(location) => self.write_span(location, buf)?,
            None => self.write_title(buf)?,
        }

        if !self.text.is_empty() {
            writeln!(buf, "{}", self.text)?;
        }

        if let Some(hint) = &self.hint {
            writeln!(buf, "hint: {hint}")?;
        }

        Ok(())
    }

    pub fn write_span(&self, location: &Location, buf: &mut impl WriteColor) -> std::io::Result<()> {
        let mut files = SimpleFiles::new();

        let location_path = location.path.to_string_lossy();
        let file_id = files.add(location_path, location.src);

        let mut labels = vec![location.label.to_codespan_label(file_id, None)];

        location.extra_labels.iter()
            .for_each(|label| {
                labels.push(label.to_codespan_label(file_id, Some(LabelStyle::Secondary)))
            });

        let severity = match self.level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
        };

        let diagnostic = codespan_reporting::diagnostic::Diagnostic::new(severity)
            .with_message(&self.title)
            .with_labels(labels);

        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(buf, &config, &files, &diagnostic)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
    }

    pub fn write_title(&self, buf: &mut impl WriteColor) -> std::io::Result<()> {
        use termcolor::{Color, ColorSpec};

        let (kind, colour) = match self.level {
            Level::Error => ("error", Color::Red),
            Level::Warning => ("warning", Color::Yellow),
        };

        buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(colour)))?;
        write!(buf, "{kind}")?;

        buf.set_color(ColorSpec::new().set_bold(true))?;
        write!(buf, ": {}\n\n", self.title)?;

        buf.set_color(&ColorSpec::new())
    }
}
