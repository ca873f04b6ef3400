//! Placing selected cells into a notebook, updating an earlier insertion in place.
//!
//! Inserted cells keep their MEMEs. When the cells right after the insertion point
//! carry exactly the candidates' MEMEs, the same selection was inserted before and is
//! refreshed instead of duplicated. Any other shape gets a fresh insert.

use tracing::debug;

use crate::{
    cell::{Cell, Notebook},
    error::NotebookError,
};

/// A notebook-like document the placement is applied to.
pub trait CellDocument {
    /// Number of cells.
    fn len(&self) -> usize;

    /// Whether the document has no cells.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at `index`.
    fn cell(&self, index: usize) -> Option<&Cell>;

    /// Inserts cells starting at `index`, shifting later cells down.
    fn insert(&mut self, index: usize, cells: Vec<Cell>) -> Result<(), NotebookError>;

    /// Replaces the content of the cell at `index`.
    fn overwrite(&mut self, index: usize, cell: &Cell) -> Result<(), NotebookError>;
}

impl CellDocument for Notebook {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    fn insert(&mut self, index: usize, cells: Vec<Cell>) -> Result<(), NotebookError> {
        let len = self.cells.len();
        if index > len {
            return Err(NotebookError::IndexOutOfRange { index, len });
        }
        self.cells.splice(index..index, cells);
        Ok(())
    }

    fn overwrite(&mut self, index: usize, cell: &Cell) -> Result<(), NotebookError> {
        let len = self.cells.len();
        let target = self
            .cells
            .get_mut(index)
            .ok_or(NotebookError::IndexOutOfRange { index, len })?;
        target.overwrite_with(cell);
        Ok(())
    }
}

/// What to do with a candidate list.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Insert the cells as new cells at `at`.
    Insert {
        /// Index of the first new cell.
        at: usize,
        /// Cells to insert.
        cells: Vec<Cell>,
    },
    /// Overwrite the cells starting at `start`, one per candidate.
    Update {
        /// Index of the first cell to overwrite.
        start: usize,
        /// Replacement content, in order.
        cells: Vec<Cell>,
    },
    /// No candidates.
    Nothing,
}

/// Counts of cells touched by a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementOutcome {
    /// New cells.
    pub inserted: usize,
    /// Cells updated in place.
    pub updated: usize,
}

/// MEMEs of the cells that have one, in order.
pub fn meme_sequence<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Vec<&'a str> {
    cells.into_iter().filter_map(Cell::meme).collect()
}

/// Strict positional equality of two MEME sequences.
pub fn sequences_match(candidates: &[&str], existing: &[&str]) -> bool {
    candidates == existing
}

/// Decides how to place `candidates` after the cell at `after`.
///
/// `None` places them at the top. An `after` past the end of the document is clamped.
pub fn plan<D: CellDocument + ?Sized>(
    document: &D,
    after: Option<usize>,
    candidates: Vec<Cell>,
) -> Placement {
    if candidates.is_empty() {
        return Placement::Nothing;
    }

    let start = after.map_or(0, |index| index + 1).min(document.len());
    let window: Vec<&Cell> = (start..document.len())
        .take(candidates.len())
        .filter_map(|index| document.cell(index))
        .collect();

    let wanted = meme_sequence(&candidates);
    let present = meme_sequence(window.iter().copied());
    let matched = window.len() == candidates.len() && sequences_match(&wanted, &present);
    debug!(
        start,
        candidates = candidates.len(),
        window = window.len(),
        matched,
        "planned cell placement"
    );

    if matched {
        Placement::Update {
            start,
            cells: candidates,
        }
    } else {
        Placement::Insert {
            at: start,
            cells: candidates,
        }
    }
}

/// Applies a plan in one batch.
pub fn apply<D: CellDocument + ?Sized>(
    document: &mut D,
    placement: Placement,
) -> Result<PlacementOutcome, NotebookError> {
    match placement {
        Placement::Nothing => Ok(PlacementOutcome::default()),
        Placement::Insert { at, cells } => {
            let inserted = cells.len();
            document.insert(at, cells)?;
            Ok(PlacementOutcome {
                inserted,
                updated: 0,
            })
        }
        Placement::Update { start, cells } => {
            let len = document.len();
            if start.saturating_add(cells.len()) > len {
                return Err(NotebookError::IndexOutOfRange {
                    index: start.saturating_add(cells.len()).saturating_sub(1),
                    len,
                });
            }
            for (offset, cell) in cells.iter().enumerate() {
                document.overwrite(start + offset, cell)?;
            }
            Ok(PlacementOutcome {
                inserted: 0,
                updated: cells.len(),
            })
        }
    }
}

/// Plans and applies a placement.
pub fn place<D: CellDocument + ?Sized>(
    document: &mut D,
    after: Option<usize>,
    candidates: Vec<Cell>,
) -> Result<PlacementOutcome, NotebookError> {
    let placement = plan(document, after, candidates);
    apply(document, placement)
}
