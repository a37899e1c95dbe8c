//! Filter/paginate engine for the annotation report table
//!
//! The engine is deliberately ignorant of where rows come from: a row is a
//! mapping from column key to cell value, and each column carries a tagged
//! predicate kind instead of ad hoc per-column string comparisons. A row is
//! visible iff every column with a non-empty filter input matches.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Non-numeric characters, stripped from identifier filter input.
static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// One cell of a report row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Multi-valued field; rendered joined, exploded on export.
    List(Vec<String>),
}

impl Cell {
    /// Joined display form.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::List(items) => items.join(", "),
        }
    }
}

/// A report row: column key -> cell.
pub type Row = HashMap<&'static str, Cell>;

/// How a column's filter input matches its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric exact match; non-numeric characters are stripped from input.
    Identifier,
    /// Case-insensitive substring match.
    Text,
    /// Case-insensitive substring match over the joined values.
    MultiValue,
}

impl ColumnKind {
    /// Normalize raw typed input into the form stored as the active filter.
    fn normalize_input(&self, raw: &str) -> String {
        match self {
            ColumnKind::Identifier => NON_NUMERIC.replace_all(raw, "").to_string(),
            _ => raw.to_string(),
        }
    }

    fn matches(&self, cell: &Cell, query: &str) -> bool {
        match self {
            ColumnKind::Identifier => cell.display() == query,
            ColumnKind::Text => cell.display().to_lowercase().contains(&query.to_lowercase()),
            ColumnKind::MultiValue => match cell {
                Cell::List(items) => items
                    .join(" ")
                    .to_lowercase()
                    .contains(&query.to_lowercase()),
                Cell::Text(s) => s.to_lowercase().contains(&query.to_lowercase()),
            },
        }
    }
}

/// Column definition for the table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ColumnKind,
}

/// Filter + pagination state over an externally owned row set.
///
/// The engine never stores rows; callers pass the full set to
/// [`TableEngine::recompute`] and read back the visible slice. The page
/// resets to 0 whenever the filtered count changes, so a narrowing filter can
/// never leave the view on an out-of-range page.
#[derive(Debug)]
pub struct TableEngine {
    columns: Vec<ColumnSpec>,
    filters: HashMap<&'static str, String>,
    page: usize,
    page_size: usize,
    filtered: Vec<usize>,
    last_count: Option<usize>,
}

impl TableEngine {
    pub fn new(columns: Vec<ColumnSpec>, page_size: usize) -> Self {
        debug_assert!(page_size > 0);
        Self {
            columns,
            filters: HashMap::new(),
            page: 0,
            page_size: page_size.max(1),
            filtered: Vec::new(),
            last_count: None,
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set (or clear, with empty input) one column's filter. Takes effect on
    /// the next [`recompute`](Self::recompute); debouncing is the caller's
    /// concern.
    pub fn set_filter(&mut self, key: &'static str, raw: &str) {
        let Some(spec) = self.columns.iter().find(|c| c.key == key) else {
            return;
        };
        let normalized = spec.kind.normalize_input(raw);
        if normalized.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key, normalized);
        }
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(|s| s.as_str())
    }

    fn row_passes(&self, row: &Row) -> bool {
        self.columns.iter().all(|spec| {
            let Some(query) = self.filters.get(spec.key) else {
                return true;
            };
            row.get(spec.key)
                .map(|cell| spec.kind.matches(cell, query))
                .unwrap_or(false)
        })
    }

    /// Re-run all active filters against the full row set. Resets the page
    /// to 0 when the filtered count changed since the previous recompute.
    pub fn recompute(&mut self, rows: &[Row]) {
        self.filtered = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.row_passes(row))
            .map(|(i, _)| i)
            .collect();

        let count = self.filtered.len();
        if self.last_count != Some(count) {
            self.page = 0;
        }
        self.last_count = Some(count);
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Indices (into the last recomputed row set) of the current page.
    pub fn visible_indices(&self) -> &[usize] {
        let start = (self.page * self.page_size).min(self.filtered.len());
        let end = ((self.page + 1) * self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn has_next_page(&self) -> bool {
        self.filtered.len() > (self.page + 1) * self.page_size
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 0
    }

    pub fn next_page(&mut self) {
        if self.has_next_page() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    /// Flatten the filtered set for export: one output row per
    /// (record x entry of `multi_key`), other columns duplicated. Outer order
    /// is filtered order, inner order is the list's stored order. A record
    /// whose multi-value cell is empty contributes no rows and drops out of
    /// the export.
    pub fn explode(&self, rows: &[Row], multi_key: &str) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        for &idx in &self.filtered {
            let row = &rows[idx];
            let values: Vec<String> = match row.get(multi_key) {
                Some(Cell::List(items)) => items.clone(),
                Some(Cell::Text(s)) => vec![s.clone()],
                None => Vec::new(),
            };
            for value in values {
                out.push(
                    self.columns
                        .iter()
                        .map(|spec| {
                            if spec.key == multi_key {
                                value.clone()
                            } else {
                                row.get(spec.key).map(|c| c.display()).unwrap_or_default()
                            }
                        })
                        .collect(),
                );
            }
        }
        out
    }
}
