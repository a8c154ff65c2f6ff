//! The read-eval-print loop
//!
//! Reads one line at a time, runs the command it names to completion and
//! only then reads the next line.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::{App, Flow};
use crate::commands::Command;

/// Splits a line into lower-cased words, dropping empty ones
pub fn clean_input(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_lowercase).collect()
}

/// Runs the REPL until `exit` or end of input
///
/// A failing command is reported on `out` and the loop carries on. The
/// cache's reaper is stopped when the loop ends.
///
/// # Errors
/// Returns an error only if reading input or writing output fails.
pub async fn run<R, W>(app: &mut App, input: R, out: &mut W, prompt: &str) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{prompt}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };

        let Some(command) = Command::from_str(name) else {
            writeln!(out, "Unknown command")?;
            continue;
        };

        match app.execute(command, args, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => {
                tracing::warn!(command = command.name(), error = %err, "command failed");
                writeln!(out, "{err}")?;
            }
        }
    }

    app.cache().stop_reaping();
    Ok(())
}
