mod cli;
mod rlpl;
mod rppl;
mod tokens;

use std::{io::BufWriter, path::PathBuf, rc::Rc, time::Instant};

use clap::Parser;
use cli::{print_analyzed, print_analyzing, print_error, print_finished, print_running};
use minic_core::{
    analyzer::analyze_from_stream,
    codegen::prelude::{listing, target_code, Codegen},
    eval::prelude::{Options, DEFAULT_MAX_CALL_DEPTH},
    utils::prelude::{Error, Warning, WarningEmitterIO}
};

#[derive(Parser)]
#[command(version, about = "Interpreter for a small C-like language")]
enum Command {
    /// Analyzes a program and runs its `main` function.
    /// The value returned by `main` becomes the exit status
    Run {
        /// Path of source file
        path: PathBuf,
        /// Maximum number of nested function calls
        #[arg(long, value_name = "FRAMES", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,
        /// Do not print status lines to stderr
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
    },
    /// Performs lexical, syntactical and semantic analysis
    Analyze {
        /// Path of source file
        path: PathBuf,
        /// Do not print parsed source code
        #[arg(short, long, default_value_t = false)]
        no_output: bool,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Analyzes a program and prints its three-address code
    Tac {
        /// Path of source file
        path: PathBuf,
        /// Print assembly-like target code instead
        #[arg(long, default_value_t = false)]
        target: bool,
    },
    /// Prints every token of a file with its position and kind
    Tokens {
        /// Path of source file
        path: PathBuf,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    let code = match Command::parse() {
        Command::Run { path, max_depth, quiet } => run(path, Options { max_call_depth: max_depth }, quiet),
        Command::Analyze { path, no_output, print_ast } => analyze(path, no_output, print_ast),
        Command::Tac { path, target } => tac(path, target),
        Command::Tokens { path } => list_tokens(path),
        Command::Rlpl => interactive(rlpl::start),
        Command::Rppl => interactive(rppl::start),
    };

    std::process::exit(code);
}

fn run(path: PathBuf, options: Options, quiet: bool) -> i32 {
    if !quiet {
        print_analyzing(&path.display().to_string());
    }
    let start = Instant::now();

    let analyzed = match analyze_from_stream(path, Rc::new(ConsoleWarningEmitter)) {
        Ok(analyzed) => analyzed,
        Err(err) => {
            print_error(&err);
            return 1;
        }
    };

    if !quiet {
        print_analyzed(start.elapsed());
        print_running(&analyzed.module.name);
    }
    let start = Instant::now();

    match analyzed.execute(BufWriter::new(std::io::stdout()), options) {
        Ok(code) => {
            if !quiet {
                print_finished(start.elapsed(), code);
            }

            code
        },
        Err(err) => {
            print_error(&err);
            1
        }
    }
}

fn analyze(path: PathBuf, no_output: bool, print_ast: bool) -> i32 {
    print_analyzing(&path.display().to_string());
    let start = Instant::now();

    let code = match analyze_from_stream(path, Rc::new(ConsoleWarningEmitter)) {
        Ok(analyzed) => {
            if !no_output {
                if print_ast {
                    println!("{:#?}", analyzed.module.program);
                } else {
                    println!("{}", analyzed.module.program);
                }
            }

            0
        },
        Err(err) => {
            print_error(&err);
            1
        }
    };

    print_analyzed(start.elapsed());

    code
}

fn tac(path: PathBuf, target: bool) -> i32 {
    let analyzed = match analyze_from_stream(path, Rc::new(ConsoleWarningEmitter)) {
        Ok(analyzed) => analyzed,
        Err(err) => {
            print_error(&err);
            return 1;
        }
    };

    let code = Codegen::generate(&analyzed.module.program);

    if target {
        for line in target_code(&code) {
            println!("    {line}");
        }
    } else {
        println!("{}", listing(&code));
    }

    0
}

fn list_tokens(path: PathBuf) -> i32 {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => {
            print_error(&Error::StdIo { err: err.kind() });
            return 1;
        }
    };

    match tokens::write_tokens(&path, &src, &mut std::io::stdout().lock()) {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            1
        }
    }
}

fn interactive(start: fn() -> std::io::Result<()>) -> i32 {
    // Without the handler Ctrl-C still ends the loop, only less politely.
    if let Err(err) = exit_on_interrupt() {
        print_error(&err);
    }

    match start() {
        Ok(()) => 0,
        Err(err) => {
            print_error(&Error::StdIo { err: err.kind() });
            1
        }
    }
}

fn exit_on_interrupt() -> Result<(), Error> {
    ctrlc::set_handler(|| {
        println!();
        std::process::exit(0);
    }).map_err(|err| {
        let err = match err {
            ctrlc::Error::System(err) => err.kind(),
            ctrlc::Error::MultipleHandlers => std::io::ErrorKind::AlreadyExists,
            _ => std::io::ErrorKind::Other
        };

        Error::StdIo { err }
    })
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleWarningEmitter;

impl WarningEmitterIO for ConsoleWarningEmitter {
    fn emit_warning(&self, warning: Warning) {
        let buffer_writer = crate::cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();

        if warning.pretty(&mut buffer).is_ok() {
            let _ = buffer_writer.print(&buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use minic_core::utils::prelude::Error;
    use super::exit_on_interrupt;

    #[test]
    fn test_handler_failure_is_returned() {
        let _ = exit_on_interrupt();

        assert_eq!(
            exit_on_interrupt(),
            Err(Error::StdIo { err: std::io::ErrorKind::AlreadyExists })
        );
    }
}
