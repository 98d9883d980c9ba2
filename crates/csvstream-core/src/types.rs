//! Rows and tables of raw field bytes.
//!
//! Field contents are passed through byte-for-byte; nothing here assumes
//! UTF-8 beyond the lossy `*_str`/`to_strings` helpers.

use std::ops::Index;
use std::slice;

/// An ordered sequence of field payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Row {
    fields: Vec<Vec<u8>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, field: Vec<u8>) {
        self.fields.push(field);
    }

    /// Drop all fields but keep the allocation.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn get(&self, idx: usize) -> Option<&[u8]> {
        self.fields.get(idx).map(Vec::as_slice)
    }

    /// The field at `idx` if it is valid UTF-8.
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        self.get(idx).and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.fields.iter().map(Vec::as_slice)
    }

    /// Lossy UTF-8 view of every field.
    pub fn to_strings(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect()
    }

    pub fn into_fields(self) -> Vec<Vec<u8>> {
        self.fields
    }
}

impl Index<usize> for Row {
    type Output = [u8];

    fn index(&self, idx: usize) -> &[u8] {
        &self.fields[idx]
    }
}

impl From<Vec<Vec<u8>>> for Row {
    fn from(fields: Vec<Vec<u8>>) -> Self {
        Self { fields }
    }
}

impl<'a> From<&[&'a str]> for Row {
    fn from(fields: &[&'a str]) -> Self {
        fields.iter().map(|s| s.as_bytes().to_vec()).collect()
    }
}

impl FromIterator<Vec<u8>> for Row {
    fn from_iter<I: IntoIterator<Item = Vec<u8>>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Vec<u8>;
    type IntoIter = slice::Iter<'a, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A fully materialized CSV: rows in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row (rows may be ragged).
    pub fn num_columns(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(Row::to_strings).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_accessors() {
        let row = Row::from(&["a", "", "ʤ"][..]);
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(1), Some(&b""[..]));
        assert_eq!(row.get_str(2), Some("ʤ"));
        assert_eq!(row.get(3), None);
        assert_eq!(&row[0], b"a");
        assert_eq!(row.to_strings(), vec!["a", "", "ʤ"]);
    }

    #[test]
    fn non_utf8_is_preserved_raw() {
        let row: Row = vec![vec![0xff, b'a']].into_iter().collect();
        assert_eq!(row.get(0), Some(&[0xff, b'a'][..]));
        assert_eq!(row.get_str(0), None);
        assert_eq!(row.to_strings(), vec!["\u{fffd}a"]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut row = Row::with_capacity(8);
        row.push(b"x".to_vec());
        row.clear();
        assert!(row.is_empty());
        assert!(row.fields.capacity() >= 8);
    }

    #[test]
    fn table_width_is_widest_row() {
        let t = Table::new(vec![Row::from(&["a"][..]), Row::from(&["b", "c"][..])]);
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.num_columns(), 2);
        assert_eq!(Table::default().num_columns(), 0);
    }
}
