// ============================================================
// RECORD SERIALIZER
// ============================================================
// Row-oriented view of a table for JSON transport

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::table::{CellValue, Table};

/// One row as ordered (column, value) pairs.
/// Serializes as a JSON object keeping column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    fields: Vec<(&'a str, &'a CellValue)>,
}

impl<'a> Record<'a> {
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn get(&self, key: &str) -> Option<&'a CellValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Records in row order, each keyed by every column in table order
pub fn to_records(table: &Table) -> Vec<Record<'_>> {
    (0..table.num_rows())
        .map(|idx| Record {
            fields: table.row(idx).collect(),
        })
        .collect()
}
