//! Choosing one record among the filtered search results

use crate::errors::{Error, Result};
use crate::image::{display_date, ImageRecord};
use log::debug;
use std::io::{self, BufRead, Write};

/// Source of a single line of user input
pub trait LineSource {
    /// Read one line, without its terminator. Returns an empty string at end of input.
    fn read_line(&mut self) -> io::Result<String>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        BufRead::read_line(self, &mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// Print the numbered list of candidates
pub fn print_choices<W: Write>(out: &mut W, records: &[ImageRecord]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Found {} images:", records.len())?;
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, record.source)?;
        writeln!(out, "    mirror: {}", record.mirror)?;
        writeln!(
            out,
            "    platform: {}, size: {}, created: {}",
            record.platform,
            record.size,
            display_date(&record.created_at)
        )?;
        writeln!(out)?;
    }
    Ok(())
}

/// Parse a 1-based choice among `len` entries into an index.
pub fn parse_choice(input: &str, len: usize) -> Result<usize> {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(choice) if (1..=len).contains(&choice) => Ok(choice - 1),
        _ => Err(Error::InvalidSelection {
            input: input.to_owned(),
        }),
    }
}

/// Resolve the record to pull
///
/// A single record is taken as is unless `interactive` is set; otherwise the
/// list is printed to `out` and one line is read from `input`. A bad answer is
/// final, there is no second prompt.
pub fn select_image<L, W>(
    mut records: Vec<ImageRecord>,
    interactive: bool,
    input: &mut L,
    out: &mut W,
) -> Result<ImageRecord>
where
    L: LineSource + ?Sized,
    W: Write,
{
    if records.is_empty() {
        return Err(Error::EmptyFilteredResult);
    }
    if !interactive && records.len() == 1 {
        debug!("single match, skipping prompt");
        return Ok(records.remove(0));
    }

    print_choices(out, &records)?;
    write!(out, "Select an image to pull (enter number): ")?;
    out.flush()?;

    let answer = match input.read_line() {
        Ok(answer) => answer,
        Err(err) if err.kind() == io::ErrorKind::InvalidData => {
            return Err(Error::InvalidSelection {
                input: String::new(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    let index = parse_choice(&answer, records.len())?;
    Ok(records.swap_remove(index))
}
