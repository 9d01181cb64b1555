//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{Cell, CellAddress, CellRange, CellValue};
use crate::error::Result;

/// A worksheet held in memory
///
/// Cells live in a sparse map keyed by address, so iteration is always in
/// row-major order and empty cells cost nothing. Cells are stored by value;
/// shared string indices and format IDs refer to the owning workbook's
/// tables.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<CellAddress, Cell>,
    visible: bool,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            visible: true,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    ///
    /// Prefer [`Workbook::rename_worksheet`](crate::Workbook::rename_worksheet),
    /// which validates the name.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Check if the sheet is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set sheet visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // === Cell access ===

    /// Get a cell by A1 address
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(&addr))
    }

    /// Get a cell by address
    pub fn cell_at(&self, address: CellAddress) -> Option<&Cell> {
        self.cells.get(&address)
    }

    /// Get a cell's value by A1 address (`Empty` if the cell is absent)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        Ok(self
            .cell(address)?
            .map(|c| c.value.clone())
            .unwrap_or_default())
    }

    /// Get a cell's format ID by A1 address (0 if the cell is absent)
    pub fn format_id(&self, address: &str) -> Result<u32> {
        Ok(self.cell(address)?.map(|c| c.format_id).unwrap_or(0))
    }

    /// Set a cell's value, keeping its format and formula
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(addr, value.into());
        Ok(())
    }

    /// Set a cell's value by address, keeping its format and formula
    pub fn set_value_at(&mut self, address: CellAddress, value: CellValue) {
        self.cells
            .entry(address)
            .or_insert_with(|| Cell::new(address, CellValue::Empty))
            .value = value;
    }

    /// Set a cell's format ID
    pub fn set_cell_format(&mut self, address: &str, format_id: u32) -> Result<()> {
        self.set_format_at(CellAddress::parse(address)?, format_id);
        Ok(())
    }

    /// Set the format ID of the cell at `address`
    pub fn set_format_at(&mut self, address: CellAddress, format_id: u32) {
        self.cells
            .entry(address)
            .or_insert_with(|| Cell::new(address, CellValue::Empty))
            .format_id = format_id;
    }

    /// Set a cell's formula text (without the leading `=`)
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        self.cells
            .entry(addr)
            .or_insert_with(|| Cell::new(addr, CellValue::Empty))
            .formula = Some(formula.to_string());
        Ok(())
    }

    /// Insert or replace a whole cell
    pub fn insert_cell(&mut self, cell: Cell) {
        self.cells.insert(cell.address, cell);
    }

    /// Remove a cell
    pub fn clear_cell(&mut self, address: &str) -> Result<Option<Cell>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.remove(&addr))
    }

    // === Iteration ===

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Iterate over the cells of one row, in column order
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = &Cell> {
        let start = CellAddress { row, col: 1 };
        let end = CellAddress {
            row,
            col: crate::MAX_COLS,
        };
        self.cells.range(start..=end).map(|(_, c)| c)
    }

    /// The smallest range covering every stored cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut cells = self.cells.keys();
        let first = *cells.next()?;
        let mut range = CellRange::single(first);
        for addr in cells {
            range.expand_to(*addr);
        }
        Some(range)
    }
}
