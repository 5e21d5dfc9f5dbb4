//! Plain-text grid format.
//!
//! ```text
//! 4 2
//! .x..
//! ..x.
//! xxx.
//! ....
//! ```
//!
//! A `<size> <steps>` header, then `size` rows of `size` characters where
//! `x` is alive and anything else is dead. Output uses `x` and space.

use std::io::{self, Read, Write};

use crate::barrierlife::{Cell, Grid};
use crate::error::{Error, Result};

/// A parsed input file: the starting grid and how many generations to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Input {
    pub grid: Grid,
    pub steps: u64,
}

fn parse_header(line: &str) -> Result<(usize, u64)> {
    let malformed = || Error::MalformedHeader(line.trim_end().to_string());
    let mut fields = line.split_whitespace();
    let size = fields
        .next()
        .and_then(|f| f.parse::<usize>().ok())
        .filter(|size| size.checked_mul(*size).is_some())
        .ok_or_else(malformed)?;
    let steps = fields
        .next()
        .and_then(|f| f.parse::<u64>().ok())
        .ok_or_else(malformed)?;
    Ok((size, steps))
}

pub fn parse(text: &str) -> Result<Input> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(Error::MissingHeader)?;
    if header.trim().is_empty() {
        return Err(Error::MissingHeader);
    }
    let (size, steps) = parse_header(header)?;

    // Rows are validated before the grid is allocated, so a huge header
    // with no rows behind it fails without reserving `size * size` cells.
    let mut rows = Vec::new();
    for row in 0..size {
        let line = lines.next().ok_or(Error::MissingRow { row, size })?;
        let found = line.chars().count();
        if found != size {
            return Err(Error::RowLength {
                row,
                expected: size,
                found,
            });
        }
        rows.push(line);
    }

    let mut grid = Grid::new(size);
    for (row, line) in rows.into_iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            grid.set(row, col, Cell::from(ch == 'x'));
        }
    }
    Ok(Input { grid, steps })
}

pub fn read_from<R: Read>(mut reader: R) -> Result<Input> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

pub fn render(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.size() * (grid.size() + 1));
    for row in grid.rows() {
        out.extend(row.iter().map(|c| if c.is_alive() { 'x' } else { ' ' }));
        out.push('\n');
    }
    out
}

pub fn write_to<W: Write>(grid: &Grid, mut writer: W) -> io::Result<()> {
    writer.write_all(render(grid).as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::{parse, render};
    use crate::error::Error;

    #[test]
    fn header_tolerates_extra_whitespace() {
        let input = parse("2\t  3 trailing\nx.\n.x\n").unwrap();
        assert_eq!(input.steps, 3);
        assert_eq!(input.grid.size(), 2);
        assert_eq!(input.grid.population(), 2);
    }

    #[test]
    fn crlf_rows_are_accepted() {
        let input = parse("2 0\r\nxx\r\n..\r\n").unwrap();
        assert_eq!(render(&input.grid), "xx\n  \n");
    }

    #[test]
    fn negative_steps_are_malformed() {
        assert!(matches!(parse("3 -1\n"), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn blank_input_has_no_header() {
        assert!(matches!(parse(""), Err(Error::MissingHeader)));
        assert!(matches!(parse("   \n"), Err(Error::MissingHeader)));
    }
}
