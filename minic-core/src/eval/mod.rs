pub mod error;
pub mod interpreter;

pub mod prelude {
    pub use super::{
        error::*,
        interpreter::*,
        run
    };
}

use std::{io::Write, panic, thread};

use crate::parser::prelude::Program;
use self::{error::EvalError, interpreter::{Interpreter, Options}};

/// Runs `main` and returns its result. Everything `print`ed goes to `out`.
///
/// The program runs on its own thread whose stack is sized from
/// [`Options::max_call_depth`], so the depth limit is reached before the
/// host stack is, whatever thread the caller is on.
pub fn run<W: Write + Send>(program: &Program, out: W, options: Options) -> Result<i32, EvalError> {
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("minic-eval".into())
            .stack_size(options.stack_size())
            .spawn_scoped(scope, move || Interpreter::new(program, out, options)?.run())
            .map_err(|err| EvalError::Thread { err: err.kind() })?;

        handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
    })
}

#[cfg(test)]
mod tests;
