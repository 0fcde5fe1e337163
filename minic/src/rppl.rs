use std::io::Write;

use minic_core::parser::prelude::parse_module;

const PROMPT: &str = ">> ";

/// Read-parse-print loop. Each line must hold whole function definitions;
/// the normalised source is printed back.
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
			line => match parse_module(line) {
				Ok(module) => println!("{}", module.program),
				Err(err) => {
					let (message, messages) = err.details();

					println!("[at {}] Parse error: {}.", err.span.start, message);
					if !messages.is_empty() {
						println!("\t{}", messages.join("\n\t"));
					}
				}
			}
		}
	}
}
