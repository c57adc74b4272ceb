use crate::config::Preset;
use crate::filter::{FilterSet, Selection};
use anyhow::{bail, Result};
use std::io::{BufRead, Write};

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no input");
    }
    Ok(line.trim().to_string())
}

/// Asks which keywords to filter by: one of the presets, or a custom comma
/// separated list. Custom keywords are validated before returning.
pub fn choose_selection(
    presets: &[Preset],
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<Selection> {
    writeln!(output, "Filter subjects by:")?;
    for (index, preset) in presets.iter().enumerate() {
        writeln!(output, "  {}) {} ({})", index + 1, preset.name, preset.keywords.join(", "))?;
    }
    let custom = presets.len() + 1;
    writeln!(output, "  {}) custom", custom)?;

    loop {
        write!(output, "Choice [1-{}]: ", custom)?;
        output.flush()?;
        let answer = read_line(&mut input)?;
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n < custom => return Ok(Selection::Preset(presets[n - 1].name.clone())),
            Ok(n) if n == custom => break,
            _ => writeln!(output, "Please enter a number between 1 and {}.", custom)?,
        }
    }

    write!(output, "Keywords, separated by commas: ")?;
    output.flush()?;
    let keywords = read_line(&mut input)?;
    FilterSet::parse_custom(&keywords)?;
    Ok(Selection::Custom(keywords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::filter::SelectionError;
    use std::io::Cursor;

    fn choose(input: &str) -> (Result<Selection>, String) {
        let presets = Config::default().presets;
        let mut output = vec![];
        let result = choose_selection(&presets, Cursor::new(input), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_preset() {
        let (result, output) = choose("2\n");
        assert_eq!(result.unwrap(), Selection::Preset("maintenance".to_string()));
        assert!(output.contains("1) all (Shift Report, Maintenance shift report, mech shift report)"));
        assert!(output.contains("4) custom"));
    }

    #[test]
    fn test_retry_invalid_choice() {
        let (result, output) = choose("0\nabc\n3\n");
        assert_eq!(result.unwrap(), Selection::Preset("mechanical".to_string()));
        assert_eq!(output.matches("Please enter a number").count(), 2);
    }

    #[test]
    fn test_custom() {
        let (result, _) = choose("4\n night shift, handover \n");
        assert_eq!(
            result.unwrap(),
            Selection::Custom("night shift, handover".to_string())
        );
    }

    #[test]
    fn test_empty_custom() {
        let (result, _) = choose("4\n   \n");
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SelectionError>(),
            Some(&SelectionError::EmptyCustom)
        );
    }

    #[test]
    fn test_end_of_input() {
        let (result, _) = choose("");
        assert!(result.is_err());
    }
}
