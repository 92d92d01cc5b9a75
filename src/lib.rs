// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! parking-solver: an A* solver for Thinkfun's "Rush Hour".
//!
//! A board is a 6x6 grid holding up to sixteen vehicles with fixed orientations (up/down or
//! left/right). Vehicles may only slide forwards and backwards along their orientation, one cell
//! at a time, and may neither intersect nor leave the grid. The puzzle is solved once the escape
//! vehicle (id `0`, always horizontal) reaches the right wall.
//!
//! This crate implements the movement rules on immutable [`Board`] snapshots, an updateable
//! min-priority queue ([`UpdateableMinPq`]) and an A* [`Solver`] which combines the two to find a
//! shortest sequence of single-cell slides. The [`record`] module reads and writes the
//! line-oriented board file format.

use core::fmt::{Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use num_traits::{CheckedAdd, CheckedSub, One, Unsigned, Zero};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod queue;
pub mod record;
pub mod solver;

pub use config::SolverConfig;
pub use queue::{QueueError, UpdateableMinPq};
pub use solver::{SolveError, Solution, Solver, solve};

/// The number of rows of every board.
pub const ROWS: usize = 6;
/// The number of columns of every board.
pub const COLUMNS: usize = 6;
/// The number of cells of every board.
pub const CELLS: usize = ROWS * COLUMNS;
/// The number of distinct vehicle ids a board may hold; ids range over `0..MAX_VEHICLES`.
pub const MAX_VEHICLES: usize = 16;

/// An orientation for a vehicle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Orientation {
    /// The vehicle may only move up and down.
    UpDown,
    /// The vehicle may only move left and right.
    LeftRight,
}

impl Orientation {
    /// The two directions a vehicle of this orientation may move in, the one decrementing its
    /// origin first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Orientation::UpDown => [Direction::Up, Direction::Down],
            Orientation::LeftRight => [Direction::Left, Direction::Right],
        }
    }

    // the direction in which a vehicle's cells extend away from its origin
    fn extent(self) -> Direction {
        match self {
            Orientation::UpDown => Direction::Down,
            Orientation::LeftRight => Direction::Right,
        }
    }
}

/// A direction for a move. A direction may be flipped with [`Neg`] (i.e. `-`).
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Upward movement.
    Up,
    /// Downward movement.
    Down,
    /// Leftward movement.
    Left,
    /// Rightward movement.
    Right,
}

impl Direction {
    /// The orientation a vehicle must have to move in this direction.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::UpDown,
            Direction::Left | Direction::Right => Orientation::LeftRight,
        }
    }

    /// Whether moving in this direction decreases the moved coordinate.
    pub fn is_decrement(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Marker trait: specifies that a value may be used for vehicle ids and board coordinates.
pub trait BoardValue:
    One
    + Ord
    + Hash
    + Add<Output = Self>
    + CheckedAdd
    + Sub<Output = Self>
    + CheckedSub
    + AddAssign
    + SubAssign
    + Copy
    + Into<usize>
    + TryFrom<usize>
    + Zero
    + Debug
    + Display
    + Unsigned
    + DeserializeOwned
    + Serialize
    + 'static
{
}

impl<V> BoardValue for V where
    V: One
        + Ord
        + Hash
        + Add<Output = Self>
        + CheckedAdd
        + Sub<Output = Self>
        + CheckedSub
        + AddAssign
        + SubAssign
        + Copy
        + Into<usize>
        + TryFrom<usize>
        + Zero
        + Debug
        + Display
        + Unsigned
        + DeserializeOwned
        + Serialize
        + 'static
{
}

/// A position in the board (eff., a coordinate pair).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Position<V = u8> {
    row: V,
    column: V,
}

impl<V> Position<V> {
    /// The row of the position.
    pub fn row(&self) -> &V {
        &self.row
    }

    /// The column of the position.
    pub fn column(&self) -> &V {
        &self.column
    }
}

impl<V> Add for Position<V>
where
    V: BoardValue,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row + rhs.row,
            column: self.column + rhs.column,
        }
    }
}

impl<V> CheckedAdd for Position<V>
where
    V: BoardValue,
{
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(&rhs.row)?,
            column: self.column.checked_add(&rhs.column)?,
        })
    }
}

impl<V> Sub for Position<V>
where
    V: BoardValue,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row - rhs.row,
            column: self.column - rhs.column,
        }
    }
}

impl<V> CheckedSub for Position<V>
where
    V: BoardValue,
{
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_sub(&rhs.row)?,
            column: self.column.checked_sub(&rhs.column)?,
        })
    }
}

impl<V> Position<V>
where
    V: BoardValue,
{
    /// The position encoded as an index into the row-major cells of a board, or `None` if it lies
    /// outside the grid.
    pub fn as_index(&self) -> Option<usize> {
        let row = self.row.into();
        let column = self.column.into();
        if row >= ROWS || column >= COLUMNS {
            return None;
        }
        Some(row * COLUMNS + column)
    }

    /// Get the position `by` units away from this position in the provided direction `dir`, or
    /// `None` if the position would not be representable. The result may still lie outside the
    /// grid; see [`Position::as_index`].
    pub fn shift(&self, dir: Direction, by: V) -> Option<Self> {
        match dir {
            Direction::Up => self.checked_sub(&Self::from((by, V::zero()))),
            Direction::Down => self.checked_add(&Self::from((by, V::zero()))),
            Direction::Left => self.checked_sub(&Self::from((V::zero(), by))),
            Direction::Right => self.checked_add(&Self::from((V::zero(), by))),
        }
    }
}

impl<V> From<(V, V)> for Position<V> {
    fn from((row, column): (V, V)) -> Self {
        Self { row, column }
    }
}

impl<V> Display for Position<V>
where
    V: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A vehicle, generic over the numeric type which backs it. The numeric type must be unsigned and
/// integral.
///
/// A vehicle is a plain value: its placement is not checked against any board. Use
/// [`Board::try_new`] to validate a whole set of vehicles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Vehicle<V = u8> {
    id: V,
    orientation: Orientation,
    origin: Position<V>,
    length: V,
}

impl<V> Vehicle<V> {
    /// The id of the vehicle. Id `0` is the escape vehicle.
    pub fn id(&self) -> &V {
        &self.id
    }

    /// The orientation of the vehicle.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the vehicle moves left and right.
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::LeftRight
    }

    /// The top-left cell occupied by the vehicle.
    pub fn origin(&self) -> &Position<V> {
        &self.origin
    }

    /// The length of the vehicle.
    pub fn length(&self) -> &V {
        &self.length
    }
}

impl<V> Vehicle<V>
where
    V: BoardValue,
{
    /// Create a new vehicle with the provided id, orientation, top-left cell and length.
    pub fn new<P: Into<Position<V>>>(
        id: V,
        orientation: Orientation,
        origin: P,
        length: V,
    ) -> Self {
        Self {
            id,
            orientation,
            origin: origin.into(),
            length,
        }
    }

    /// The `(row, column)` cells covered by the vehicle, starting at its origin. Cells may lie
    /// outside the grid if the vehicle is misplaced.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let row = self.origin.row.into();
        let column = self.origin.column.into();
        let extent = self.orientation.extent();
        (0..self.length.into()).map(move |offset| match extent {
            Direction::Down => (row + offset, column),
            _ => (row, column + offset),
        })
    }

    fn index(&self) -> usize {
        self.id.into()
    }
}

/// A single move: one vehicle slid by one cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Move<V = u8> {
    vehicle: V,
    direction: Direction,
}

impl<V> Move<V> {
    /// Create a move of the provided vehicle in the provided direction.
    pub fn new(vehicle: V, direction: Direction) -> Self {
        Self { vehicle, direction }
    }

    /// The id of the moved vehicle.
    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    /// The direction the vehicle moved in.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<V> Display for Move<V>
where
    V: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "vehicle {} {}", self.vehicle, self.direction)
    }
}

/// An error which denotes that a set of vehicles does not form a valid board.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum InvalidBoardError {
    /// The vehicle id does not fit in a board.
    #[error("vehicle id {id} is out of range, ids must be below {max}", max = MAX_VEHICLES)]
    IdOutOfRange {
        /// The offending id.
        id: usize,
    },
    /// Two vehicles share an id.
    #[error("vehicle id {id} was used more than once")]
    DuplicateId {
        /// The repeated id.
        id: usize,
    },
    /// The vehicle is neither a car (2 cells) nor a truck (3 cells).
    #[error("vehicle {id} has length {length}, but only lengths 2 and 3 are allowed")]
    InvalidLength {
        /// The vehicle id.
        id: usize,
        /// The offending length.
        length: usize,
    },
    /// Part of the vehicle lies outside the grid.
    #[error("vehicle {id} was located at an invalid position ({row}, {column})")]
    OutOfBounds {
        /// The vehicle id.
        id: usize,
        /// The row of the first cell outside the grid.
        row: usize,
        /// The column of the first cell outside the grid.
        column: usize,
    },
    /// Two vehicles cover the same cell.
    #[error("vehicle {first} and vehicle {second} overlapped at position ({row}, {column})")]
    Overlap {
        /// The vehicle placed first.
        first: usize,
        /// The vehicle placed second.
        second: usize,
        /// The row of the shared cell.
        row: usize,
        /// The column of the shared cell.
        column: usize,
    },
    /// There is no vehicle with id `0`.
    #[error("the board has no escape vehicle (id 0)")]
    MissingEscapeVehicle,
    /// The vehicle with id `0` moves up and down and can never reach the exit.
    #[error("the escape vehicle (id 0) must be horizontal")]
    VerticalEscapeVehicle,
}

/// The type of invalid move that was observed in an [`InvalidMoveError`].
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum InvalidMoveType {
    /// The vehicle that was designated to be moved doesn't exist.
    #[error("it doesn't exist")]
    NoSuchVehicle,
    /// The direction that was used isn't valid for the vehicle's orientation.
    #[error("its orientation does not allow for movement in that direction")]
    InvalidDirection,
    /// The vehicle would leave the grid.
    #[error("it would enter an invalid position")]
    OutOfBounds,
    /// The vehicle would intersect another one.
    #[error("it would intersect with vehicle {other} at ({row}, {column})")]
    Intersects {
        /// The id of the vehicle in the way.
        other: usize,
        /// The row of the contested cell.
        row: usize,
        /// The column of the contested cell.
        column: usize,
    },
}

/// An error which describes an attempted invalid move.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("cannot move vehicle {vehicle} {direction} because {reason}")]
pub struct InvalidMoveError {
    vehicle: usize,
    direction: Direction,
    reason: InvalidMoveType,
}

impl InvalidMoveError {
    /// The id of the vehicle that was to be moved.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// The attempted direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Why the move is invalid.
    pub fn reason(&self) -> InvalidMoveType {
        self.reason
    }
}

/// An immutable snapshot of every vehicle on the grid, plus the derived occupancy of each cell.
///
/// Two boards are equal iff they hold the same vehicles under the same ids, regardless of the
/// order the vehicles were supplied in or the moves that led to them. Boards serialize as their
/// list of vehicles; deserialization validates them with [`Board::try_new`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(
    try_from = "Vec<Vehicle<V>>",
    into = "Vec<Vehicle<V>>",
    bound = "V: BoardValue"
)]
pub struct Board<V = u8> {
    vehicles: [Option<Vehicle<V>>; MAX_VEHICLES],
    concrete: [Option<V>; CELLS],
}

fn add_vehicle_concrete<V>(
    concrete: &mut [Option<V>; CELLS],
    vehicle: &Vehicle<V>,
) -> Result<(), InvalidBoardError>
where
    V: BoardValue,
{
    let id = vehicle.index();
    for (row, column) in vehicle.cells() {
        if row >= ROWS || column >= COLUMNS {
            return Err(InvalidBoardError::OutOfBounds { id, row, column });
        }
        if let Some(existing) = concrete[row * COLUMNS + column] {
            return Err(InvalidBoardError::Overlap {
                first: existing.into(),
                second: id,
                row,
                column,
            });
        }
    }
    for (row, column) in vehicle.cells() {
        concrete[row * COLUMNS + column] = Some(vehicle.id);
    }
    Ok(())
}

impl<V> Board<V>
where
    V: BoardValue,
{
    /// Build a board from the provided vehicles, keyed by their ids.
    ///
    /// No validation is performed: if vehicles overlap, the cell shows the vehicle with the higher
    /// id, and cells outside the grid are ignored. A later vehicle with an id already seen replaces
    /// the earlier one.
    ///
    /// # Panics
    ///
    /// Panics if a vehicle id is [`MAX_VEHICLES`] or larger.
    pub fn new<I: IntoIterator<Item = Vehicle<V>>>(vehicles: I) -> Self {
        let mut slots = [None; MAX_VEHICLES];
        for vehicle in vehicles {
            slots[vehicle.index()] = Some(vehicle);
        }
        Self::from_slots(slots)
    }

    /// Build a board from the provided vehicles, rejecting any set of vehicles which violates the
    /// board invariants.
    pub fn try_new<I: IntoIterator<Item = Vehicle<V>>>(
        vehicles: I,
    ) -> Result<Self, InvalidBoardError> {
        let mut slots = [None; MAX_VEHICLES];
        let mut concrete = [None; CELLS];
        for vehicle in vehicles {
            let id = vehicle.index();
            let slot = slots
                .get_mut(id)
                .ok_or(InvalidBoardError::IdOutOfRange { id })?;
            if slot.is_some() {
                return Err(InvalidBoardError::DuplicateId { id });
            }
            let length = vehicle.length.into();
            if !(2..=3).contains(&length) {
                return Err(InvalidBoardError::InvalidLength { id, length });
            }
            add_vehicle_concrete(&mut concrete, &vehicle)?;
            *slot = Some(vehicle);
        }
        match slots[0] {
            None => Err(InvalidBoardError::MissingEscapeVehicle),
            Some(escape) if !escape.is_horizontal() => {
                Err(InvalidBoardError::VerticalEscapeVehicle)
            }
            Some(_) => Ok(Self {
                vehicles: slots,
                concrete,
            }),
        }
    }

    fn from_slots(vehicles: [Option<Vehicle<V>>; MAX_VEHICLES]) -> Self {
        let mut concrete = [None; CELLS];
        for vehicle in vehicles.iter().flatten() {
            for (row, column) in vehicle.cells() {
                if row < ROWS && column < COLUMNS {
                    concrete[row * COLUMNS + column] = Some(vehicle.id);
                }
            }
        }
        Self { vehicles, concrete }
    }

    /// The row-major occupancy of the board: the id of the vehicle in each cell, if any.
    pub fn concrete(&self) -> &[Option<V>; CELLS] {
        &self.concrete
    }

    /// Fetches the vehicle id occupying the requested position. [`None`] if the position doesn't
    /// exist in the board, [`Some`]`(`[`None`]`)` if the position exists, but is empty, and
    /// [`Some`]`(`[`Some`]`(n))` with `n` as the vehicle that occupies that position.
    pub fn get<P: Into<Position<V>>>(&self, position: P) -> Option<Option<V>> {
        position
            .into()
            .as_index()
            .and_then(|p| self.concrete.get(p).copied())
    }

    /// The vehicle with the provided id, if the board holds one.
    pub fn vehicle(&self, id: V) -> Option<&Vehicle<V>> {
        self.vehicles.get(id.into())?.as_ref()
    }

    /// The vehicle covering the provided position, if any.
    pub fn vehicle_at<P: Into<Position<V>>>(&self, position: P) -> Option<&Vehicle<V>> {
        self.get(position).flatten().and_then(|id| self.vehicle(id))
    }

    /// The vehicles on the board, in ascending id order.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle<V>> {
        self.vehicles.iter().flatten()
    }

    /// The escape vehicle (id `0`).
    pub fn escape_vehicle(&self) -> Option<&Vehicle<V>> {
        self.vehicles[0].as_ref()
    }

    /// Whether the escape vehicle touches the right wall, ready to leave.
    pub fn is_goal(&self) -> bool {
        self.escape_vehicle().is_some_and(|escape| {
            escape.origin.column.into() + escape.length.into() == COLUMNS
        })
    }

    /// Estimates the number of moves left: the columns the escape vehicle still has to travel,
    /// plus one for every cell between the escape vehicle and the right edge of its row that is
    /// covered by another vehicle.
    ///
    /// Blockers are counted per cell, so a horizontal truck in the escape row adds three. The
    /// estimate can exceed the true distance.
    pub fn heuristic_cost_to_goal(&self) -> u32 {
        let Some(escape) = self.escape_vehicle() else {
            return 0;
        };
        let row = escape.origin.row.into();
        let column = escape.origin.column.into();
        let remaining = COLUMNS.saturating_sub(column + escape.length.into());
        let blocking = (column..COLUMNS)
            .filter(|c| {
                row < ROWS && matches!(self.concrete[row * COLUMNS + c], Some(id) if id != escape.id)
            })
            .count();
        (remaining + blocking) as u32
    }

    /// Produce the board resulting from shifting the provided vehicle one space in the designated
    /// direction. The entered cell must be inside the grid and empty.
    pub fn slide(&self, id: V, dir: Direction) -> Result<Self, InvalidMoveError> {
        let idx = id.into();
        let err = |reason| InvalidMoveError {
            vehicle: idx,
            direction: dir,
            reason,
        };
        let vehicle = self
            .vehicles
            .get(idx)
            .copied()
            .flatten()
            .ok_or_else(|| err(InvalidMoveType::NoSuchVehicle))?;
        if dir.orientation() != vehicle.orientation {
            return Err(err(InvalidMoveType::InvalidDirection));
        }
        let entered = if dir.is_decrement() {
            vehicle.origin.shift(dir, V::one())
        } else {
            vehicle.origin.shift(dir, vehicle.length)
        };
        let Some((entered, index)) = entered.and_then(|p| Some((p, p.as_index()?))) else {
            return Err(err(InvalidMoveType::OutOfBounds));
        };
        if let Some(other) = self.concrete[index] {
            return Err(err(InvalidMoveType::Intersects {
                other: other.into(),
                row: entered.row.into(),
                column: entered.column.into(),
            }));
        }
        let origin = vehicle
            .origin
            .shift(dir, V::one())
            .ok_or_else(|| err(InvalidMoveType::OutOfBounds))?;
        let mut vehicles = self.vehicles;
        vehicles[idx] = Some(Vehicle { origin, ..vehicle });
        Ok(Self::from_slots(vehicles))
    }

    /// Every legal single-cell move from this board, paired with the board it produces. Moves are
    /// ordered by vehicle id, and for each vehicle the move towards the top/left comes first.
    pub fn successors(&self) -> impl Iterator<Item = (Move<V>, Self)> + '_ {
        self.vehicles().flat_map(move |vehicle| {
            vehicle
                .orientation
                .directions()
                .into_iter()
                .filter_map(move |dir| {
                    self.slide(vehicle.id, dir)
                        .ok()
                        .map(|next| (Move::new(vehicle.id, dir), next))
                })
        })
    }

    /// Every board reachable by sliding one vehicle by one cell, in the order of
    /// [`Board::successors`].
    pub fn neighbors(&self) -> impl Iterator<Item = Self> + '_ {
        self.successors().map(|(_, next)| next)
    }

    /// Whether `other` is reachable from this board with a single move.
    pub fn is_neighbor(&self, other: &Self) -> bool {
        self.neighbors().any(|next| &next == other)
    }

    /// The move which turns this board into `next`, if the two differ by exactly one vehicle
    /// displaced by exactly one cell along its orientation.
    pub fn diff(&self, next: &Self) -> Option<Move<V>> {
        let mut changed = self
            .vehicles
            .iter()
            .zip(next.vehicles.iter())
            .filter(|(before, after)| before != after);
        let (Some(before), Some(after)) = changed.next()? else {
            return None;
        };
        if changed.next().is_some()
            || before.id != after.id
            || before.orientation != after.orientation
            || before.length != after.length
        {
            return None;
        }
        before
            .orientation
            .directions()
            .into_iter()
            .find(|&dir| before.origin.shift(dir, V::one()) == Some(after.origin))
            .map(|dir| Move::new(before.id, dir))
    }
}

impl<V> PartialEq for Board<V>
where
    V: BoardValue,
{
    fn eq(&self, other: &Self) -> bool {
        self.vehicles == other.vehicles
    }
}

impl<V> Eq for Board<V> where V: BoardValue {}

impl<V> Hash for Board<V>
where
    V: BoardValue,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vehicles.hash(state);
    }
}

impl<V> TryFrom<Vec<Vehicle<V>>> for Board<V>
where
    V: BoardValue,
{
    type Error = InvalidBoardError;

    fn try_from(vehicles: Vec<Vehicle<V>>) -> Result<Self, Self::Error> {
        Self::try_new(vehicles)
    }
}

impl<V> From<Board<V>> for Vec<Vehicle<V>>
where
    V: BoardValue,
{
    fn from(board: Board<V>) -> Self {
        board.vehicles().copied().collect()
    }
}

impl<V> Display for Board<V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for row in self.concrete.chunks(COLUMNS) {
            for cell in row {
                match cell {
                    Some(id) => write!(f, "{id:>3}")?,
                    None => write!(f, "{:>3}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        Board, COLUMNS, Direction, InvalidBoardError, InvalidMoveError, InvalidMoveType, Move,
        Orientation, Vehicle,
    };
    use std::collections::{HashSet, VecDeque};
    use std::error::Error;
    use std::hash::{DefaultHasher, Hash, Hasher};

    fn car(id: u8, orientation: Orientation, row: u8, column: u8, length: u8) -> Vehicle {
        Vehicle::new(id, orientation, (row, column), length)
    }

    fn hash_of(board: &Board) -> u64 {
        let mut hasher = DefaultHasher::new();
        board.hash(&mut hasher);
        hasher.finish()
    }

    // escape vehicle on row 2, a car straight in its way and a truck along the bottom
    fn blocked() -> Board {
        Board::new([
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(1, Orientation::UpDown, 1, 2, 2),
            car(12, Orientation::LeftRight, 5, 3, 3),
        ])
    }

    #[test]
    fn occupancy() {
        let board = blocked();
        println!("{board}");

        assert_eq!(Some(Some(0)), board.get((2, 1)));
        assert_eq!(Some(Some(1)), board.get((1, 2)));
        assert_eq!(Some(Some(1)), board.get((2, 2)));
        assert_eq!(Some(None), board.get((3, 2)));
        assert_eq!(None, board.get((6, 0)));
        assert_eq!(Some(12), board.vehicle_at((5, 5)).map(|v| *v.id()));
        assert_eq!(None, board.vehicle_at((0, 0)));
        assert_eq!(None, board.vehicle(3));
        assert_eq!(Some(3), board.vehicle(12).map(|v| *v.length()));
        assert_eq!(
            vec![0, 1, 12],
            board.vehicles().map(|v| *v.id()).collect::<Vec<_>>()
        );
        assert_eq!(7, board.concrete().iter().flatten().count());
    }

    #[test]
    fn later_vehicle_wins_overlap() {
        let vehicles = [
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(1, Orientation::UpDown, 1, 1, 2),
        ];
        let board = Board::new(vehicles);
        assert_eq!(Some(Some(1)), board.get((2, 1)));
        assert_eq!(Some(Some(0)), board.get((2, 0)));

        assert_eq!(
            Err(InvalidBoardError::Overlap {
                first: 0,
                second: 1,
                row: 2,
                column: 1
            }),
            Board::try_new(vehicles)
        );
    }

    #[test]
    fn later_duplicate_id_replaces_earlier() {
        let second = car(0, Orientation::LeftRight, 3, 1, 2);
        let board = Board::new([car(0, Orientation::LeftRight, 2, 0, 2), second]);
        assert_eq!(Some(&second), board.vehicle(0));
        assert_eq!(1, board.vehicles().count());
        assert_eq!(Some(None), board.get((2, 0)));
        assert_eq!(Some(Some(0)), board.get((3, 1)));
        assert_eq!(Some(Some(0)), board.get((3, 2)));
        assert_eq!(2, board.concrete().iter().flatten().count());
    }

    #[test]
    fn cells_outside_grid_are_skipped() {
        let truck = car(3, Orientation::UpDown, 4, 5, 3);
        let board = Board::new([car(0, Orientation::LeftRight, 2, 0, 2), truck]);
        assert_eq!(Some(&truck), board.vehicle(3));
        assert_eq!(Some(Some(3)), board.get((4, 5)));
        assert_eq!(Some(Some(3)), board.get((5, 5)));
        assert_eq!(None, board.get((6, 5)));
        assert_eq!(Some(None), board.get((3, 5)));
        assert_eq!(
            vec![4 * COLUMNS + 5, 5 * COLUMNS + 5],
            board
                .concrete()
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Some(3))
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn invalid_boards() {
        let escape = car(0, Orientation::LeftRight, 2, 0, 2);

        assert_eq!(
            Err(InvalidBoardError::IdOutOfRange { id: 16 }),
            Board::try_new([escape, car(16, Orientation::UpDown, 0, 5, 2)])
        );
        assert_eq!(
            Err(InvalidBoardError::DuplicateId { id: 0 }),
            Board::try_new([escape, car(0, Orientation::LeftRight, 3, 0, 2)])
        );
        assert_eq!(
            Err(InvalidBoardError::InvalidLength { id: 4, length: 4 }),
            Board::try_new([escape, car(4, Orientation::UpDown, 0, 5, 4)])
        );
        assert_eq!(
            Err(InvalidBoardError::OutOfBounds {
                id: 3,
                row: 6,
                column: 5
            }),
            Board::try_new([escape, car(3, Orientation::UpDown, 4, 5, 3)])
        );
        assert_eq!(
            Err(InvalidBoardError::MissingEscapeVehicle),
            Board::try_new([car(1, Orientation::UpDown, 0, 0, 2)])
        );
        assert_eq!(
            Err(InvalidBoardError::VerticalEscapeVehicle),
            Board::try_new([car(0, Orientation::UpDown, 0, 0, 2)])
        );
        assert!(Board::try_new([escape]).is_ok());
    }

    #[test]
    fn goal_and_heuristic() {
        let solved = Board::new([car(0, Orientation::LeftRight, 2, 4, 2)]);
        assert!(solved.is_goal());
        assert_eq!(0, solved.heuristic_cost_to_goal());

        let open = Board::new([car(0, Orientation::LeftRight, 2, 0, 2)]);
        assert!(!open.is_goal());
        assert_eq!(4, open.heuristic_cost_to_goal());

        // four columns to go, one cell of car 1 and three cells of truck 12 in the way
        let crowded = Board::new([
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(1, Orientation::UpDown, 1, 2, 2),
            car(12, Orientation::LeftRight, 2, 3, 3),
        ]);
        assert_eq!(8, crowded.heuristic_cost_to_goal());

        // vehicles behind the escape vehicle don't count
        let behind = Board::new([
            car(0, Orientation::LeftRight, 2, 2, 2),
            car(1, Orientation::LeftRight, 2, 0, 2),
        ]);
        assert_eq!(2, behind.heuristic_cost_to_goal());
    }

    #[test]
    fn successor_order() {
        let board = Board::new([
            car(0, Orientation::LeftRight, 2, 1, 2),
            car(1, Orientation::UpDown, 0, 0, 2),
        ]);
        let moves = board.successors().map(|(m, _)| m).collect::<Vec<_>>();
        assert_eq!(
            vec![
                Move::new(0, Direction::Left),
                Move::new(0, Direction::Right),
                Move::new(1, Direction::Down),
            ],
            moves
        );

        let neighbors = board.neighbors().collect::<Vec<_>>();
        assert_eq!(3, neighbors.len());
        assert_eq!(Some(0), neighbors[0].escape_vehicle().map(|v| *v.origin().column()));
        assert_eq!(Some(2), neighbors[1].escape_vehicle().map(|v| *v.origin().column()));
        assert_eq!(Some(Some(1)), neighbors[2].get((2, 0)));
        assert_eq!(Some(None), neighbors[2].get((0, 0)));
        assert_eq!("vehicle 1 down", moves[2].to_string());
    }

    #[test]
    fn invalid_moves() {
        let board = blocked();

        match board.slide(5, Direction::Right) {
            Err(InvalidMoveError {
                vehicle,
                direction,
                reason: InvalidMoveType::NoSuchVehicle,
            }) => {
                assert_eq!(5, vehicle);
                assert_eq!(Direction::Right, direction);
            }
            s => unreachable!("Expected another error, got {s:?}"),
        }

        match board.slide(0, Direction::Up) {
            Err(e) => assert_eq!(InvalidMoveType::InvalidDirection, e.reason()),
            s => unreachable!("Expected another error, got {s:?}"),
        }

        match board.slide(0, Direction::Left) {
            Err(e) => assert_eq!(InvalidMoveType::OutOfBounds, e.reason()),
            s => unreachable!("Expected another error, got {s:?}"),
        }

        match board.slide(12, Direction::Right) {
            Err(e) => assert_eq!(InvalidMoveType::OutOfBounds, e.reason()),
            s => unreachable!("Expected another error, got {s:?}"),
        }

        match board.slide(0, Direction::Right) {
            Err(e) => {
                assert_eq!(
                    InvalidMoveType::Intersects {
                        other: 1,
                        row: 2,
                        column: 2
                    },
                    e.reason()
                );
                assert_eq!(
                    "cannot move vehicle 0 right because it would intersect with vehicle 1 at (2, 2)",
                    e.to_string()
                );
            }
            s => unreachable!("Expected another error, got {s:?}"),
        }

        let moved = board.slide(1, Direction::Up).unwrap();
        assert_eq!(Some(Some(1)), moved.get((0, 2)));
        assert_eq!(Some(None), moved.get((2, 2)));
        // the board it was slid from is untouched
        assert_eq!(Some(Some(1)), board.get((2, 2)));
    }

    #[test]
    fn structural_equality() {
        let a = Board::new([
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(3, Orientation::UpDown, 0, 4, 3),
            car(1, Orientation::UpDown, 1, 2, 2),
        ]);
        let b = Board::new([
            car(1, Orientation::UpDown, 1, 2, 2),
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(3, Orientation::UpDown, 0, 4, 3),
        ]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // reaching the same configuration through different moves
        let there_and_back = a
            .slide(3, Direction::Down)
            .and_then(|board| board.slide(3, Direction::Up))
            .unwrap();
        assert_eq!(a, there_and_back);

        let moved = a.slide(1, Direction::Up).unwrap();
        assert_ne!(a, moved);
    }

    #[test]
    fn neighbors_are_symmetric() {
        let start = Board::new([
            car(0, Orientation::LeftRight, 2, 1, 2),
            car(1, Orientation::UpDown, 0, 3, 3),
            car(2, Orientation::LeftRight, 4, 2, 2),
            car(3, Orientation::UpDown, 2, 5, 2),
            car(12, Orientation::LeftRight, 5, 0, 3),
        ]);
        let mut seen = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        while let Some(board) = queue.pop_front() {
            for (step, next) in board.successors() {
                assert!(next.is_neighbor(&board), "{step} is not reversible");
                assert_eq!(Some(step), board.diff(&next));
                assert_eq!(Some(Move::new(*step.vehicle(), -step.direction())), next.diff(&board));
                if seen.len() < 2_000 && seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        assert!(seen.len() > 10);
    }

    #[test]
    fn diff_rejects_non_moves() {
        let board = blocked();
        assert_eq!(None, board.diff(&board));

        let two_cells = Board::new([
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(1, Orientation::UpDown, 3, 2, 2),
            car(12, Orientation::LeftRight, 5, 3, 3),
        ]);
        assert_eq!(None, board.diff(&two_cells));

        let two_vehicles = board
            .slide(1, Direction::Up)
            .and_then(|b| b.slide(12, Direction::Left))
            .unwrap();
        assert_eq!(None, board.diff(&two_vehicles));
    }

    #[test]
    fn display() {
        let rendered = blocked().to_string();
        let rows = rendered.lines().collect::<Vec<_>>();
        assert_eq!(6, rows.len());
        assert_eq!("  .  .  1  .  .  .", rows[1]);
        assert_eq!("  0  0  1  .  .  .", rows[2]);
        assert_eq!("  .  .  . 12 12 12", rows[5]);
        assert!(rows.iter().all(|row| row.len() == COLUMNS * 3));
    }

    #[test]
    fn serde_validates() -> Result<(), Box<dyn Error>> {
        let board = blocked();
        let json = serde_json::to_string(&board)?;
        let back: Board = serde_json::from_str(&json)?;
        assert_eq!(board, back);
        assert_eq!(board.concrete(), back.concrete());

        let overlapping = serde_json::to_string(&vec![
            car(0, Orientation::LeftRight, 2, 0, 2),
            car(1, Orientation::UpDown, 2, 1, 2),
        ])?;
        assert!(serde_json::from_str::<Board>(&overlapping).is_err());
        Ok(())
    }
}
