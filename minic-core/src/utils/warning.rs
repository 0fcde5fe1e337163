use std::{io::Write, path::PathBuf, rc::Rc, sync::{atomic::{AtomicUsize, Ordering}, Arc, RwLock}};

use termcolor::{Buffer, WriteColor};

use crate::analyzer::error::Warning as AnalyzerWarning;
use super::diagnostic::{Diagnostic, Label, Level, Location};

pub trait WarningEmitterIO {
    fn emit_warning(&self, warning: Warning);
}

#[derive(Debug, Clone, Copy)]
pub struct NullWarningEmitterIO;

impl WarningEmitterIO for NullWarningEmitterIO {
    fn emit_warning(&self, _warning: Warning) {}
}

/// Collects warnings in memory, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct VectorWarningEmitterIO {
    pub warnings: Arc<RwLock<Vec<Warning>>>
}

impl VectorWarningEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        match self.warnings.write() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        match self.warnings.read() {
            Ok(warnings) => warnings.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WarningEmitterIO for VectorWarningEmitterIO {
    fn emit_warning(&self, warning: Warning) {
        match self.warnings.write() {
            Ok(mut warnings) => warnings.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning),
        }
    }
}

pub struct WarningEmitter {
    count: Arc<AtomicUsize>,
    emitter: Rc<dyn WarningEmitterIO>
}

impl WarningEmitter {
    pub fn new(emitter: Rc<dyn WarningEmitterIO>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullWarningEmitterIO))
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn emit(&self, warning: Warning) {
        _ = self.count.fetch_add(1, Ordering::Relaxed);
        self.emitter.emit_warning(warning);
    }
}

/// Attaches the module's path and source to analyzer warnings.
pub struct ModuleWarningEmitter {
    module_path: PathBuf,
    module_src: String,
    emitter: WarningEmitter,
}

impl ModuleWarningEmitter {
    pub fn new(
        module_path: PathBuf,
        module_src: String,
        emitter: WarningEmitter
    ) -> Self {
        Self {
            module_path,
            module_src,
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(PathBuf::new(), String::new(), WarningEmitter::null())
    }

    pub fn count(&self) -> usize {
        self.emitter.count()
    }

    pub fn emit(&self, warning: AnalyzerWarning) {
        self.emitter.emit(Warning::Lint {
            path: self.module_path.clone(),
            src: self.module_src.clone(),
            warning,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Warning {
    Lint {
        path: PathBuf,
        src: String,
        warning: AnalyzerWarning
    }
}

impl Warning {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        let _ = self.pretty(&mut nocolor);

        String::from_utf8_lossy(nocolor.as_slice()).into_owned()
    }

    pub fn pretty(&self, buf: &mut impl WriteColor) -> std::io::Result<()> {
        self.to_diagnostic().write(buf)?;
        buf.write_all(b"\n")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let Warning::Lint { path, src, warning } = self;

        let (title, label, hint) = match warning {
            AnalyzerWarning::UnusedVariable { name, .. } => (
                "Unused variable",
                Some(format!("`{name}` is never read")),
                Some("You can safely remove it.".to_string())
            ),
            AnalyzerWarning::UnreachableCode { .. } => (
                "Unreachable code",
                Some("This code runs after a `return`".to_string()),
                None
            ),
            AnalyzerWarning::UnreachableIfClause { .. } => (
                "Unreachable if clause",
                Some("The condition is always 0".to_string()),
                None
            ),
            AnalyzerWarning::UnreachableElseClause { .. } => (
                "Unreachable else clause",
                Some("The condition is never 0".to_string()),
                None
            ),
            AnalyzerWarning::InfiniteLoop { .. } => (
                "Infinite loop",
                Some("This loop never ends".to_string()),
                Some("Nothing inside the loop returns.".to_string())
            ),
            AnalyzerWarning::UnreachableWhileClause { .. } => (
                "Unreachable while clause",
                Some("The condition is always 0".to_string()),
                None
            ),
        };

        Diagnostic {
            title: title.into(),
            text: "".into(),
            hint,
            level: Level::Warning,
            location: Some(Location {
                src,
                path: path.to_path_buf(),
                label: Label {
                    text: label,
                    span: warning.location(),
                },
                extra_labels: vec![]
            }),
        }
    }
}
