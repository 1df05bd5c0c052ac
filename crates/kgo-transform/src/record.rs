//! Flat output records.
//!
//! A [`Record`] is one CSV row in the making: an ordered list of
//! `(column, cell)` pairs whose cells are already rendered as text. Column
//! order is insertion order and becomes the header order of the file the
//! record lands in.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Sets `column` to `value`, replacing the cell in place if the column
    /// already exists (its position is kept).
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, cell)) => *cell = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(c, _)| c == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Cells laid out along `header`; columns this record lacks come out empty.
    pub fn cells_for<'a>(&'a self, header: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        header
            .iter()
            .map(move |column| self.get(column).unwrap_or(""))
    }
}
