use std::{io::Write, path::Path};

use codespan_reporting::files::{Files, SimpleFile};
use minic_core::{
    lexer::prelude::lex,
    parser::prelude::ParseError,
    utils::prelude::Error
};

/// Writes one line per token: `line:column`, token kind and source text.
/// Columns count characters, the same way diagnostics do.
pub(crate) fn write_tokens(path: &Path, src: &str, out: &mut impl Write) -> Result<(), Error> {
    let file = SimpleFile::new(path.display().to_string(), src);

    for token in lex(src) {
        let (start, token, end) = token.map_err(|error| Error::Parse {
            path: path.to_path_buf(),
            src: src.to_string(),
            error: ParseError::from(error)
        })?;

        let location = file.location((), start as usize)
            .map_err(|_| Error::StdIo { err: std::io::ErrorKind::InvalidData })?;
        let text = src.get(start as usize..end as usize).unwrap_or_default();

        writeln!(
            out,
            "{:>9}  {:<16} {}",
            format!("{}:{}", location.line_number, location.column_number),
            token.kind(),
            text
        ).map_err(|err| Error::StdIo { err: err.kind() })?;
    }

    Ok(())
}
