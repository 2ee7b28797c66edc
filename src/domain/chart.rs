// ============================================================
// CHART KINDS
// ============================================================
// Fixed set of charts rendered per numeric column and the
// file names their images are stored under

use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Hist,
}

impl ChartKind {
    /// Sweep order
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Hist,
    ];

    /// Token used in artifact file names
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Hist => "hist",
        }
    }

    pub fn title(&self, column: &str) -> String {
        match self {
            ChartKind::Line => format!("Line Plot for {}", column),
            ChartKind::Bar => format!("Bar Plot for {}", column),
            ChartKind::Scatter => format!("Scatter Plot for {}", column),
            ChartKind::Hist => format!("Histogram for {}", column),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact file name for one (column, kind) pair: `{column}_{kind}.png`.
pub fn artifact_name(column: &str, kind: ChartKind) -> String {
    artifact_file_name(&artifact_stem(column), kind)
}

pub fn artifact_file_name(stem: &str, kind: ChartKind) -> String {
    format!("{}_{}.png", stem, kind)
}

/// File stem for a column name.
///
/// Path separators and NUL become `_`, and a leading dot is escaped, so the
/// name always denotes a plain file inside the store.
pub fn artifact_stem(column: &str) -> String {
    let mut stem: String = column
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    if stem.starts_with('.') {
        stem.insert(0, '_');
    }
    stem
}

/// Stems for a set of columns, unique within the set.
///
/// Columns that sanitize to the same stem (`a/b` and `a_b`) get a `.{n}`
/// suffix in column order, so no chart of one request overwrites another.
pub fn artifact_stems<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    columns
        .into_iter()
        .map(|column| {
            let base = artifact_stem(column);
            let mut stem = base.clone();
            let mut n = 0;
            while !taken.insert(stem.clone()) {
                n += 1;
                stem = format!("{}.{}", base, n);
            }
            stem
        })
        .collect()
}
