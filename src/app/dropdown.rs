//! Row action dropdown exclusivity.
//!
//! At most one row's action menu is open at a time. Opening another row closes
//! the previous one; a pointer event outside the table closes whatever is open.

/// Which row's action menu is open, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropdownState {
    open: Option<usize>,
}

impl DropdownState {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: None }
    }

    /// Opens `row`, closing any other open menu.
    pub fn open(&mut self, row: usize) {
        self.open = Some(row);
    }

    /// Closes `row` if it is the open one, opens it otherwise.
    ///
    /// ```
    /// use complete_table::app::dropdown::DropdownState;
    ///
    /// let mut menus = DropdownState::new();
    /// menus.toggle(2);
    /// menus.toggle(5);
    /// assert!(!menus.is_open(2));
    /// assert!(menus.is_open(5));
    /// menus.toggle(5);
    /// assert_eq!(menus.open_row(), None);
    /// ```
    pub fn toggle(&mut self, row: usize) {
        self.open = if self.open == Some(row) { None } else { Some(row) };
    }

    /// Closes `row` if it is the open one. Other rows are unaffected.
    pub fn close(&mut self, row: usize) {
        if self.open == Some(row) {
            self.open = None;
        }
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }

    /// Reacts to a pointer event reported by the host.
    pub fn pointer_event(&mut self, outside_table: bool) {
        if outside_table {
            self.close_all();
        }
    }

    /// A pointer event landed outside the table.
    pub fn pointer_outside(&mut self) {
        self.pointer_event(true);
    }

    #[must_use]
    pub fn is_open(&self, row: usize) -> bool {
        self.open == Some(row)
    }

    #[must_use]
    pub const fn open_row(&self) -> Option<usize> {
        self.open
    }
}
