use std::io::Cursor;

use barrier_life::text::{self, Input};
use barrier_life::{Error, Grid, simulate};
use pretty_assertions::assert_eq;

const GLIDER: &str = "5 4\n.x...\n..x..\nxxx..\n.....\n.....\n";

#[test]
fn parses_header_and_rows() {
    let Input { grid, steps } = text::parse(GLIDER).unwrap();
    assert_eq!(steps, 4);
    assert_eq!(grid.size(), 5);

    let mut live = Vec::new();
    grid.for_each_live(|row, col| live.push((row, col)));
    assert_eq!(live, vec![(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
}

#[test]
fn only_lowercase_x_is_alive() {
    let Input { grid, .. } = text::parse("3 1\nxX*\n o.\n#x \n").unwrap();
    assert_eq!(grid.population(), 2);
    assert!(grid.get(0, 0).is_alive());
    assert!(grid.get(2, 1).is_alive());
}

#[test]
fn renders_x_and_space() {
    let mut grid = Grid::new(3);
    grid.set_alive(0, 0);
    grid.set_alive(1, 2);
    assert_eq!(text::render(&grid), "x  \n  x\n   \n");
}

#[test]
fn end_to_end_glider() {
    let Input { grid, steps } = text::read_from(Cursor::new(GLIDER)).unwrap();
    let out = simulate(grid, steps, 2).unwrap();

    let mut rendered = Vec::new();
    text::write_to(&out, &mut rendered).unwrap();
    assert_eq!(
        String::from_utf8(rendered).unwrap(),
        "     \n  x  \n   x \n xxx \n     \n"
    );
}

#[test]
fn trailing_lines_are_ignored() {
    let Input { grid, .. } = text::parse("1 0\nx\nextra\n\n").unwrap();
    assert_eq!(grid.population(), 1);
}

#[test]
fn short_row_is_rejected() {
    let err = text::parse("3 1\nxxx\nxx\nxxx\n").unwrap_err();
    assert!(matches!(
        err,
        Error::RowLength {
            row: 1,
            expected: 3,
            found: 2
        }
    ));
    assert!(err.is_input());
}

#[test]
fn long_row_is_rejected() {
    let err = text::parse("2 1\nxx\nxxx\n").unwrap_err();
    assert!(matches!(err, Error::RowLength { row: 1, found: 3, .. }));
}

#[test]
fn missing_rows_are_rejected() {
    let err = text::parse("4 1\nx...\n....\n").unwrap_err();
    assert!(matches!(err, Error::MissingRow { row: 2, size: 4 }));
}

#[test]
fn malformed_headers_are_rejected() {
    for header in ["4\n", "four 2\n", "4 two\n", "-4 2\n"] {
        let err = text::parse(header).unwrap_err();
        assert!(
            matches!(err, Error::MalformedHeader(_)),
            "{header:?} gave {err}"
        );
    }
}

#[test]
fn zero_size_grid_parses_but_cannot_run() {
    let Input { grid, steps } = text::parse("0 3\n").unwrap();
    assert!(matches!(simulate(grid, steps, 1), Err(Error::EmptyGrid)));
}

#[test]
fn oversized_header_without_rows_is_an_input_error() {
    let err = text::parse("60000 1\n").unwrap_err();
    assert!(matches!(err, Error::MissingRow { row: 0, size: 60000 }));
    assert!(err.is_input());
}

#[test]
fn header_size_whose_cell_count_overflows_is_malformed() {
    let header = format!("{} 1\n", usize::MAX);
    let err = text::parse(&header).unwrap_err();
    assert!(matches!(err, Error::MalformedHeader(_)), "got {err}");

    let err = text::parse("5000000000 1\n").unwrap_err();
    assert!(err.is_input(), "got {err}");
}
