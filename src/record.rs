// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! The board file format.
//!
//! A board file holds one vehicle per line, as whitespace separated fields:
//!
//! ```text
//! <h|v> <row> <column> <length> <id>
//! ```
//!
//! `h` marks a horizontal vehicle and `v` a vertical one; row and column give the vehicle's
//! top-left cell. Lines may come in any order and blank lines are ignored.
//!
//! ```
//! use parking_solver::record::parse_board;
//! use parking_solver::Board;
//!
//! let board: Board = parse_board("h 2 0 2 0\nv 1 2 2 1\n").unwrap();
//! assert_eq!(Some(Some(1)), board.get((2, 2)));
//! assert_eq!("h 2 0 2 0\nv 1 2 2 1\n", board.records().to_string());
//! ```

use crate::{Board, BoardValue, InvalidBoardError, Orientation, Vehicle};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// An error raised while parsing a single vehicle record.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ParseVehicleError {
    /// The record ended early.
    #[error("missing {0}")]
    Missing(&'static str),
    /// The orientation field is neither `h` nor `v`.
    #[error("unknown orientation {0:?}, expected \"h\" or \"v\"")]
    Orientation(String),
    /// A numeric field is not a non-negative integer.
    #[error("invalid {field}: {source}")]
    Number {
        /// The name of the field.
        field: &'static str,
        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// A numeric field does not fit the board's value type.
    #[error("{field} {value} is too large")]
    OutOfRange {
        /// The name of the field.
        field: &'static str,
        /// The parsed value.
        value: usize,
    },
    /// The record has more than five fields.
    #[error("unexpected trailing input {0:?}")]
    Trailing(String),
}

/// An error raised while reading a board file.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The file could not be read.
    #[error("board file could not be read: {0}")]
    Io(#[from] std::io::Error),
    /// A line is not a valid vehicle record.
    #[error("line {line}: {source}")]
    Parse {
        /// The 1-based line number.
        line: usize,
        /// What is wrong with the line.
        #[source]
        source: ParseVehicleError,
    },
    /// The records parsed, but the vehicles do not form a valid board.
    #[error("invalid board: {0}")]
    Invalid(#[from] InvalidBoardError),
}

impl<V> FromStr for Vehicle<V>
where
    V: BoardValue,
{
    type Err = ParseVehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let orientation = match fields
            .next()
            .ok_or(ParseVehicleError::Missing("orientation"))?
        {
            "h" => Orientation::LeftRight,
            "v" => Orientation::UpDown,
            other => return Err(ParseVehicleError::Orientation(other.to_string())),
        };
        let mut number = |field: &'static str| -> Result<V, ParseVehicleError> {
            let raw = fields.next().ok_or(ParseVehicleError::Missing(field))?;
            let value: usize = raw
                .parse()
                .map_err(|source| ParseVehicleError::Number { field, source })?;
            V::try_from(value).map_err(|_| ParseVehicleError::OutOfRange { field, value })
        };
        let row = number("row")?;
        let column = number("column")?;
        let length = number("length")?;
        let id = number("id")?;
        if let Some(extra) = fields.next() {
            return Err(ParseVehicleError::Trailing(extra.to_string()));
        }
        Ok(Vehicle::new(id, orientation, (row, column), length))
    }
}

impl<V> Display for Vehicle<V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let orientation = if self.is_horizontal() { "h" } else { "v" };
        write!(
            f,
            "{orientation} {} {} {} {}",
            self.origin().row(),
            self.origin().column(),
            self.length(),
            self.id()
        )
    }
}

/// Parses a board from the contents of a board file and validates it.
pub fn parse_board<V: BoardValue>(data: &str) -> Result<Board<V>, RecordError> {
    let mut vehicles: Vec<Vehicle<V>> = Vec::new();
    for (idx, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let vehicle = line.parse().map_err(|source| RecordError::Parse {
            line: idx + 1,
            source,
        })?;
        vehicles.push(vehicle);
    }
    Board::try_new(vehicles).map_err(Into::into)
}

/// Reads and validates the board file at `path`.
pub fn read_board<V: BoardValue, P: AsRef<Path>>(path: P) -> Result<Board<V>, RecordError> {
    let data = std::fs::read_to_string(path)?;
    parse_board(&data)
}

/// The records of a board, displayed one per line in id order. See [`Board::records`].
pub struct Records<'a, V>(&'a Board<V>);

impl<V> Board<V>
where
    V: BoardValue,
{
    /// Formats the board in the board file format.
    pub fn records(&self) -> Records<'_, V> {
        Records(self)
    }
}

impl<V> Display for Records<'_, V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for vehicle in self.0.vehicles() {
            writeln!(f, "{vehicle}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::record::{ParseVehicleError, RecordError, parse_board, read_board};
    use crate::{Board, InvalidBoardError, Orientation, Vehicle};
    use std::error::Error;

    const PUZZLE: &str = r#"
        v 0 3 3 12
        h 2 1 2 0

        h 4 2 2 1
        v 2 5 2 2
    "#;

    #[test]
    fn parses_puzzle() -> Result<(), Box<dyn Error>> {
        let board: Board = parse_board(PUZZLE)?;
        println!("{board}");
        assert_eq!(4, board.vehicles().count());
        assert_eq!(
            Some(&Vehicle::new(12, Orientation::UpDown, (0, 3), 3)),
            board.vehicle(12)
        );
        assert_eq!(Some(Some(0)), board.get((2, 2)));
        assert_eq!(
            "h 2 1 2 0\nh 4 2 2 1\nv 2 5 2 2\nv 0 3 3 12\n",
            board.records().to_string()
        );
        assert_eq!(board, parse_board(&board.records().to_string())?);
        Ok(())
    }

    fn line_error(data: &str) -> (usize, ParseVehicleError) {
        match parse_board::<u8>(data) {
            Err(RecordError::Parse { line, source }) => (line, source),
            s => unreachable!("Expected a parse error, got {s:?}"),
        }
    }

    #[test]
    fn reports_bad_lines() {
        assert_eq!(
            (2, ParseVehicleError::Orientation("x".to_string())),
            line_error("h 2 0 2 0\nx 1 2 2 1")
        );
        assert_eq!(
            (1, ParseVehicleError::Missing("id")),
            line_error("h 2 0 2\n")
        );
        assert_eq!(
            (3, ParseVehicleError::OutOfRange {
                field: "row",
                value: 300
            }),
            line_error("h 2 0 2 0\n\nv 300 0 2 1")
        );
        assert_eq!(
            (1, ParseVehicleError::Trailing("extra".to_string())),
            line_error("h 2 0 2 0 extra")
        );
        match line_error("h two 0 2 0") {
            (1, ParseVehicleError::Number { field: "row", .. }) => {}
            s => unreachable!("Expected a number error, got {s:?}"),
        }
    }

    #[test]
    fn validates_board() {
        match parse_board::<u8>("h 2 0 2 0\nv 1 1 2 1") {
            Err(RecordError::Invalid(InvalidBoardError::Overlap { first, second, .. })) => {
                assert_eq!((0, 1), (first, second));
            }
            s => unreachable!("Expected an invalid board, got {s:?}"),
        }
        match parse_board::<u8>("") {
            Err(RecordError::Invalid(InvalidBoardError::MissingEscapeVehicle)) => {}
            s => unreachable!("Expected an invalid board, got {s:?}"),
        }
    }

    #[test]
    fn reads_files() -> Result<(), Box<dyn Error>> {
        let path = std::env::temp_dir().join(format!("parking-solver-{}.txt", std::process::id()));
        std::fs::write(&path, PUZZLE)?;
        let board: Board = read_board(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(board, parse_board(PUZZLE)?);

        match read_board::<u8, _>(&path) {
            Err(e @ RecordError::Io(_)) => {
                // the cause is part of the message
                let message = e.to_string();
                assert!(message.starts_with("board file could not be read: "));
                assert!(message.len() > "board file could not be read: ".len());
            }
            s => unreachable!("Expected an IO error, got {s:?}"),
        }
        Ok(())
    }
}
