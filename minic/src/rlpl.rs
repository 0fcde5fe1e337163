use std::io::Write;

use minic_core::lexer::prelude::{lex, Token};

const PROMPT: &str = ">> ";

/// Read-lex-print loop: prints the tokens of every line entered.
pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			println!();
			return Ok(());
		}

		match input.trim_end_matches(['\n', '\r']) {
			"" => {},
			".exit" => return Ok(()),
			line => {
				for res in lex(line) {
					match res {
						Ok((start, Token::Eof, _)) => println!("{start:>4}  {:?}", Token::Eof),
						Ok((start, token, _)) => println!("{start:>4}  {:<16} {:?}", token.kind(), token),
						Err(err) => {
							let (message, extra) = err.details();

							println!("[at {}] Lexical error: {}", err.location.start, message);
							if !extra.is_empty() {
								println!("{}", extra.join("\n"));
							}
						}
					}
				}
			}
		}
	}
}
