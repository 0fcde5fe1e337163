pub mod error;
pub mod analyzer;

pub mod prelude {
    pub use super::{
        analyzer::*,
        error::*,
        Analyzed,
        analyze,
        analyze_source,
        analyze_from_stream
    };
}

use std::{io::Write, path::{Path, PathBuf}, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    analyzer::prelude::{ModuleAnalyzer, Outcome},
    eval::{self, prelude::Options},
    parser::prelude::{parse_module, parse_module_from_stream, Module},
    utils::prelude::{Error, ModuleWarningEmitter, WarningEmitter, WarningEmitterIO}
};

/// A parsed and checked module, ready to run.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub path: PathBuf,
    pub src: String,
    pub module: Module,
}

impl Analyzed {
    pub fn execute<W: Write + Send>(&self, out: W, options: Options) -> Result<i32, Error> {
        eval::run(&self.module.program, out, options).map_err(|error| Error::Eval {
            path: self.path.clone(),
            src: self.src.clone(),
            error
        })
    }
}

pub fn analyze(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    analyze_source(path, src, warnings)
}

pub fn analyze_source(
    path: PathBuf,
    src: String,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let module = match parse_module(&src) {
        Ok(module) => module,
        Err(error) => return Err(Error::Parse { path, src, error })
    };

    check(path, src, module, warnings)
}

/// Like [`analyze`], but feeds the lexer straight from a buffered reader.
pub fn analyze_from_stream(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut read_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                read_error = Some(err.kind());
                None
            }
        });

    let parsed = parse_module_from_stream(stream);

    if let Some(err) = read_error {
        return Err(Error::StdIo { err });
    }

    match parsed {
        Ok(module) => check(path, src, module, warnings),
        Err(error) => Err(Error::Parse { path, src, error })
    }
}

fn check(
    path: PathBuf,
    src: String,
    mut module: Module,
    warnings: Rc<dyn WarningEmitterIO>
) -> Result<Analyzed, Error> {
    module.name = module_name(&path);

    let warnings = ModuleWarningEmitter::new(
        path.clone(),
        src.clone(),
        WarningEmitter::new(warnings)
    );

    match ModuleAnalyzer::analyze(module, &warnings) {
        Outcome::Ok(module) => Ok(Analyzed { path, src, module }),
        Outcome::PartialFailure(_, errors) => Err(Error::Analyze { path, src, errors })
    }
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
