//! Line prompts shared by the one-shot commands and the shell.
//!
//! Generic over `BufRead`/`Write` so tests can script the answers.

use std::io::{self, BufRead, Write};

/// Prints `question` and reads one line. `None` means the input is exhausted.
pub fn ask_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Asks a y/n question. Anything but `y`/`yes` (including end of input) is a no.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    let answer = ask_line(input, output, &format!("{} [y/N] ", question))?;
    Ok(matches!(
        answer.as_deref().map(|a| a.trim().to_lowercase()).as_deref(),
        Some("y") | Some("yes")
    ))
}
