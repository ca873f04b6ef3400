//! Choosing which cells of a search hit's notebook to insert.
//!
//! The user picks a scope (the hit cell, its section, or the whole notebook) and a
//! range relative to the hit. [`SelectionState`] holds the choice while it is being
//! made; [`select_cells`] turns the final [`SelectionResult`] into cells.

use std::{fmt, str::FromStr};

use crate::{cell::Cell, error::SelectionError, section::Section};

/// How much of the notebook to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only the anchor cell.
    #[default]
    Cell,
    /// Cells of the anchor's section.
    Section,
    /// Cells of the whole notebook.
    Notebook,
}

impl Scope {
    /// All scopes, in dialog order.
    pub const ALL: [Self; 3] = [Self::Cell, Self::Section, Self::Notebook];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Section => "section",
            Self::Notebook => "notebook",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| SelectionError::UnknownScope(s.to_string()))
    }
}

/// Which side of the anchor to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Range {
    /// From the start through the anchor.
    Before,
    /// From the anchor through the end.
    #[default]
    After,
    /// Everything; in notebook scope, the checked sections.
    All,
}

impl Range {
    /// All ranges, in dialog order.
    pub const ALL: [Self; 3] = [Self::Before, Self::After, Self::All];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Range {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| SelectionError::UnknownRange(s.to_string()))
    }
}

/// A finished selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionResult {
    /// Chosen scope.
    pub scope: Scope,
    /// Chosen range; absent for cell scope.
    pub range: Option<Range>,
    /// Checked sections; present only for notebook scope with range `all`.
    pub sections: Option<Vec<Section>>,
}

impl SelectionResult {
    /// Titles of the checked sections, for remembering the choice.
    pub fn section_titles(&self) -> Vec<String> {
        self.sections
            .iter()
            .flatten()
            .map(|section| section.title.clone())
            .collect()
    }
}

/// Resolves a selection against a notebook.
///
/// The anchor is the first cell whose MEME equals `anchor_meme`. A missing anchor, or a
/// notebook scope with nothing checked, selects nothing. In notebook scope an unset range
/// takes every cell.
pub fn select_cells(
    result: &SelectionResult,
    cells: &[Cell],
    sections: &[Section],
    anchor_meme: &str,
) -> Vec<Cell> {
    let Some(anchor) = cells.iter().position(|cell| cell.meme() == Some(anchor_meme)) else {
        return Vec::new();
    };

    match result.scope {
        Scope::Cell => vec![cells[anchor].clone()],
        Scope::Section => {
            let Some(section) = sections.iter().find(|section| section.contains(anchor)) else {
                return Vec::new();
            };
            let slice = match result.range {
                Some(Range::Before) => cells.get(section.start_index..=anchor),
                Some(Range::After) => cells.get(anchor..=section.end_index),
                Some(Range::All) | None => Some(section.cells(cells)),
            };
            slice.map(<[Cell]>::to_vec).unwrap_or_default()
        }
        Scope::Notebook => match result.range {
            Some(Range::Before) => cells[..=anchor].to_vec(),
            Some(Range::After) => cells[anchor..].to_vec(),
            None => cells.to_vec(),
            Some(Range::All) => {
                let mut checked: Vec<&Section> = result.sections.iter().flatten().collect();
                checked.sort_by_key(|section| section.start_index);
                checked
                    .into_iter()
                    .flat_map(|section| section.cells(cells).iter().cloned())
                    .collect()
            }
        },
    }
}

/// The selection being edited in the range dialog.
///
/// Section and notebook scopes need the hit cell's MEME to find the anchor, so they are
/// disabled when the hit has none.
#[derive(Debug, Clone)]
pub struct SelectionState {
    /// Sections of the hit's notebook.
    sections: Vec<Section>,
    /// Whether the hit cell has a MEME.
    has_meme: bool,
    /// Current scope.
    scope: Scope,
    /// Current range.
    range: Range,
    /// Check mark per section.
    checked: Vec<bool>,
}

impl SelectionState {
    /// Starts a selection: cell scope, range after, every section checked.
    pub fn new(sections: Vec<Section>, has_meme: bool) -> Self {
        let checked = vec![true; sections.len()];
        Self {
            sections,
            has_meme,
            scope: Scope::Cell,
            range: Range::After,
            checked,
        }
    }

    /// Starts from a previous result, checking the sections whose titles it names.
    pub fn with_initial(sections: Vec<Section>, has_meme: bool, initial: &SelectionResult) -> Self {
        let mut state = Self::new(sections, has_meme);
        if state.is_enabled(initial.scope) {
            state.scope = initial.scope;
        }
        state.range = initial.range.unwrap_or_default();
        if initial.sections.is_some() {
            state.restore_titles(&initial.section_titles());
        }
        state
    }

    /// Current scope.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Current range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// The sections offered for checking.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whether a scope may be chosen.
    pub fn is_enabled(&self, scope: Scope) -> bool {
        scope == Scope::Cell || self.has_meme
    }

    /// Whether the range choice is shown.
    pub fn shows_range(&self) -> bool {
        self.scope != Scope::Cell
    }

    /// Whether the section checklist is shown.
    pub fn shows_sections(&self) -> bool {
        self.scope == Scope::Notebook && self.range == Range::All
    }

    /// Switches scope and resets the range to after. Returns false for a disabled scope.
    pub fn set_scope(&mut self, scope: Scope) -> bool {
        if !self.is_enabled(scope) {
            return false;
        }
        self.scope = scope;
        self.range = Range::After;
        true
    }

    /// Switches range.
    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    /// Checks or unchecks one section. Out-of-range indices are ignored.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        if let Some(mark) = self.checked.get_mut(index) {
            *mark = checked;
        }
    }

    /// Whether a section is checked.
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Checks every section.
    pub fn select_all(&mut self) {
        self.checked.fill(true);
    }

    /// Unchecks every section.
    pub fn deselect_all(&mut self) {
        self.checked.fill(false);
    }

    /// Checks, for each remembered title, the first section carrying it. Everything
    /// else is unchecked.
    pub fn restore_titles<S: AsRef<str>>(&mut self, titles: &[S]) {
        self.deselect_all();
        for title in titles {
            let title = title.as_ref();
            if let Some(index) = self.sections.iter().position(|s| s.title == title) {
                self.set_checked(index, true);
            }
        }
    }

    /// The result as the dialog would report it.
    pub fn result(&self) -> SelectionResult {
        SelectionResult {
            scope: self.scope,
            range: self.shows_range().then_some(self.range),
            sections: self.shows_sections().then(|| {
                self.sections
                    .iter()
                    .zip(&self.checked)
                    .filter(|(_, checked)| **checked)
                    .map(|(section, _)| section.clone())
                    .collect()
            }),
        }
    }
}
