//! Sheet scripts
//!
//! One command per line:
//!
//! ```text
//! # comment
//! set A1 42
//! set B1 =A1*2
//! clear A1
//! print values
//! print texts
//! size
//! ```
//!
//! The text of `set` is everything after the address and a single space, so
//! it may contain spaces or be empty.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use gridcalc::{Position, Sheet};
use tracing::{debug, warn};

/// A single script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
    PrintValues,
    PrintTexts,
    Size,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let command = match keyword {
        "set" => {
            let (address, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Command::Set(parse_address(address)?, text.to_string())
        }
        "clear" => Command::Clear(parse_address(rest.trim())?),
        "print" => match rest.trim() {
            "values" => Command::PrintValues,
            "texts" => Command::PrintTexts,
            other => bail!("unknown print target '{}', expected 'values' or 'texts'", other),
        },
        "size" => Command::Size,
        other => bail!("unknown command '{}'", other),
    };

    Ok(Some(command))
}

fn parse_address(address: &str) -> Result<Position> {
    if address.is_empty() {
        return Err(anyhow!("missing cell address"));
    }
    Ok(Position::parse(address)?)
}

/// Apply one command, writing any output to `out`
pub fn execute<W: Write>(sheet: &mut Sheet, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Set(pos, text) => sheet.set_cell(*pos, text)?,
        Command::Clear(pos) => sheet.clear_cell(*pos)?,
        Command::PrintValues => sheet.print_values(out).context("failed to print values")?,
        Command::PrintTexts => sheet.print_texts(out).context("failed to print texts")?,
        Command::Size => {
            let size = sheet.printable_size();
            writeln!(out, "{} {}", size.rows, size.cols).context("failed to print size")?;
        }
    }
    Ok(())
}

/// Run every line of `input` against `sheet`.
///
/// A line that fails to parse or execute is reported on `errors` with its
/// line number and the script carries on. Returns the number of such lines.
pub fn run<R, W, E>(sheet: &mut Sheet, input: R, out: &mut W, errors: &mut E) -> Result<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut failures = 0;

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_number))?;

        let outcome = parse_line(&line).and_then(|command| match command {
            Some(command) => {
                debug!(line = line_number, ?command, "executing");
                execute(sheet, &command, out)
            }
            None => Ok(()),
        });

        if let Err(err) = outcome {
            warn!(line = line_number, error = %err, "script line failed");
            writeln!(errors, "line {}: {:#}", line_number, err)
                .context("failed to report script error")?;
            failures += 1;
        }
    }

    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc::Value;
    use pretty_assertions::assert_eq;

    fn run_script(script: &str) -> (Sheet, String, String, usize) {
        let mut sheet = Sheet::new();
        let mut out = Vec::new();
        let mut errors = Vec::new();
        let failures = run(&mut sheet, script.as_bytes(), &mut out, &mut errors).unwrap();
        (
            sheet,
            String::from_utf8(out).unwrap(),
            String::from_utf8(errors).unwrap(),
            failures,
        )
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # note").unwrap(), None);
        assert_eq!(
            parse_line("set A1 =1 + 2").unwrap(),
            Some(Command::Set(Position::new(0, 0), "=1 + 2".into()))
        );
        assert_eq!(
            parse_line("set B2").unwrap(),
            Some(Command::Set(Position::new(1, 1), String::new()))
        );
        assert_eq!(
            parse_line("set C3 ").unwrap(),
            Some(Command::Set(Position::new(2, 2), String::new()))
        );
        assert_eq!(
            parse_line("clear AB12").unwrap(),
            Some(Command::Clear(Position::new(11, 27)))
        );
        assert_eq!(parse_line("print values").unwrap(), Some(Command::PrintValues));
        assert_eq!(parse_line("print texts").unwrap(), Some(Command::PrintTexts));
        assert_eq!(parse_line("size").unwrap(), Some(Command::Size));
    }

    #[test]
    fn test_parse_line_errors() {
        for line in ["frobnicate", "set", "set a1 x", "clear", "print", "print sums"] {
            assert!(parse_line(line).is_err(), "expected error for {:?}", line);
        }
    }

    #[test]
    fn test_run_prints() {
        let script = "\
set A1 2
set B1 =A1*3
# change the input
set A1 5
print values
print texts
size
";
        let (_, out, errors, failures) = run_script(script);
        assert_eq!(out, "5\t15\n5\t=A1*3\n1 2\n");
        assert_eq!(errors, "");
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_run_reports_and_continues() {
        let script = "\
set A1 =B1
set B1 =A1
set C1 =1+
bogus
set D1 ok
";
        let (sheet, _, errors, failures) = run_script(script);
        assert_eq!(failures, 3);

        let lines: Vec<_> = errors.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("line 2: Circular dependency"));
        assert!(lines[1].starts_with("line 3: Formula parse error"));
        assert!(lines[2].starts_with("line 4: unknown command"));

        let d1 = sheet.cell(Position::new(0, 3)).unwrap().unwrap();
        assert_eq!(d1.value(), Value::text("ok"));
        assert!(sheet.cell(Position::new(0, 1)).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_clear_shrinks() {
        let (_, out, _, _) = run_script("set C3 x\nset A1 y\nclear C3\nsize\n");
        assert_eq!(out, "1 1\n");
    }
}
