//! Parsing and prompting for pipe operating points.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Pipe data as the user enters it, in US customary units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeInputs {
    /// Inside diameter (in)
    pub diameter_in: f64,
    /// Wall roughness (µin)
    pub roughness_uin: f64,
    /// Volumetric flow (US gal/min)
    pub flow_gpm: f64,
}

/// Parse a non-negative finite number.
pub fn parse_number(input: &str, what: &str) -> AppResult<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        AppError::InvalidInput(format!("{what}: '{trimmed}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(AppError::InvalidInput(format!("{what} must be finite")));
    }
    if value < 0.0 {
        return Err(AppError::InvalidInput(format!("{what} must not be negative")));
    }
    Ok(value)
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), "q" | "Q" | "quit" | "exit")
}

/// Prompt until a valid number is read.
///
/// Returns `None` when the user quits or the input ends.
pub fn prompt_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    what: &str,
) -> AppResult<Option<f64>> {
    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 || is_quit(&line) {
            return Ok(None);
        }

        match parse_number(&line, what) {
            Ok(value) => return Ok(Some(value)),
            Err(err) => writeln!(output, "  {err}, try again (q to quit)")?,
        }
    }
}

/// Prompt for the three values of one operating point.
pub fn prompt_pipe_inputs<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> AppResult<Option<PipeInputs>> {
    let Some(diameter_in) = prompt_number(input, output, "Pipe diameter [in]: ", "diameter")?
    else {
        return Ok(None);
    };
    let Some(roughness_uin) =
        prompt_number(input, output, "Wall roughness [µin]: ", "roughness")?
    else {
        return Ok(None);
    };
    let Some(flow_gpm) = prompt_number(input, output, "Flow rate [GPM]: ", "flow rate")? else {
        return Ok(None);
    };

    Ok(Some(PipeInputs {
        diameter_in,
        roughness_uin,
        flow_gpm,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn parse_number_accepts_plain_values() {
        assert_eq!(parse_number(" 1.5\n", "diameter").unwrap(), 1.5);
        assert_eq!(parse_number("0", "diameter").unwrap(), 0.0);
        assert_eq!(parse_number("2e3", "flow").unwrap(), 2000.0);
    }

    #[test]
    fn parse_number_rejects_bad_input() {
        for bad in ["", "abc", "1.2.3", "-1", "NaN", "inf"] {
            assert!(
                matches!(parse_number(bad, "x"), Err(AppError::InvalidInput(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn prompt_reprompts_until_valid() {
        let mut input = Cursor::new("oops\n-3\n4.5\n");
        let mut output = Vec::new();
        let value = prompt_number(&mut input, &mut output, "> ", "value").unwrap();
        assert_eq!(value, Some(4.5));

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("> ").count(), 3);
        assert_eq!(text.matches("try again").count(), 2);
    }

    #[test]
    fn prompt_stops_on_quit_or_eof() {
        let mut output = Vec::new();
        let mut quit = Cursor::new("q\n");
        assert_eq!(prompt_number(&mut quit, &mut output, "> ", "v").unwrap(), None);

        let mut eof = Cursor::new("");
        assert_eq!(prompt_number(&mut eof, &mut output, "> ", "v").unwrap(), None);
    }

    #[test]
    fn prompt_pipe_inputs_reads_three_values() {
        let mut input = Cursor::new("1\n50\n10\n");
        let mut output = Vec::new();
        let inputs = prompt_pipe_inputs(&mut input, &mut output).unwrap().unwrap();
        assert_eq!(
            inputs,
            PipeInputs {
                diameter_in: 1.0,
                roughness_uin: 50.0,
                flow_gpm: 10.0,
            }
        );
    }

    #[test]
    fn prompt_pipe_inputs_quit_midway() {
        let mut input = Cursor::new("1\nq\n");
        let mut output = Vec::new();
        assert!(prompt_pipe_inputs(&mut input, &mut output).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn parse_number_reads_back_displayed_values(v in 0.0f64..1e9) {
            let parsed = parse_number(&v.to_string(), "value").unwrap();
            prop_assert_eq!(parsed, v);
        }
    }
}
