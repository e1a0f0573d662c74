//! Terminal I/O for the interactive retry prompt.

use std::io::{self, BufRead, IsTerminal, Write};

pub fn require_tty_for_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

pub fn prompt(message: &str) -> ue_renamer::Result<String> {
    eprint!("{}", message);
    io::stderr().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).map_err(|e| {
        ue_renamer::Error::internal_io(
            format!("Failed to read input: {}", e),
            Some("read prompt answer".to_string()),
        )
    })?;

    Ok(line.trim().to_string())
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
