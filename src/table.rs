use serde::Deserialize;
use std::cmp::Ordering;

use crate::sheets::WebsiteRecord;

/// Fixed number of rows per page.
pub const PAGE_SIZE: usize = 10;

/// Record field a column displays and sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Domain,
    Niche1,
    Niche2,
    Traffic,
    Dr,
    Da,
    Language,
    Price,
    SpamScore,
}

/// Whether a column orders as text or as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

/// One column of the dashboard table.
pub struct Column {
    pub field: Field,
    /// Name used in query strings, matching the record's JSON field name.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

/// The statically declared, ordered column set. The first entry (`domain`)
/// is the default sort column.
pub static COLUMNS: [Column; 9] = [
    Column {
        field: Field::Domain,
        name: "domain",
        label: "Domain",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::Niche1,
        name: "niche1",
        label: "Niche 1",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::Niche2,
        name: "niche2",
        label: "Niche 2",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::Traffic,
        name: "traffic",
        label: "Traffic",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::Dr,
        name: "dr",
        label: "DR",
        kind: ColumnKind::Number,
    },
    Column {
        field: Field::Da,
        name: "da",
        label: "DA",
        kind: ColumnKind::Number,
    },
    Column {
        field: Field::Language,
        name: "language",
        label: "Language",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::Price,
        name: "price",
        label: "Price",
        kind: ColumnKind::Text,
    },
    Column {
        field: Field::SpamScore,
        name: "spamScore",
        label: "Spam Score",
        // Free text in the sheet despite the name, so it orders as text.
        kind: ColumnKind::Text,
    },
];

impl Column {
    /// The column's value for a record, rendered as display text.
    pub fn display(&self, record: &WebsiteRecord) -> String {
        match self.field {
            Field::Domain => record.domain.clone(),
            Field::Niche1 => record.niche1.clone(),
            Field::Niche2 => record.niche2.clone(),
            Field::Traffic => record.traffic.clone(),
            Field::Dr => record.dr.to_string(),
            Field::Da => record.da.to_string(),
            Field::Language => record.language.clone(),
            Field::Price => record.price.clone(),
            Field::SpamScore => record.spam_score.clone(),
        }
    }

    /// Typed comparator for this column: integer comparison for the score
    /// columns, string comparison for the rest.
    fn compare(&self, a: &WebsiteRecord, b: &WebsiteRecord) -> Ordering {
        match self.field {
            Field::Domain => a.domain.cmp(&b.domain),
            Field::Niche1 => a.niche1.cmp(&b.niche1),
            Field::Niche2 => a.niche2.cmp(&b.niche2),
            Field::Traffic => a.traffic.cmp(&b.traffic),
            Field::Dr => a.dr.cmp(&b.dr),
            Field::Da => a.da.cmp(&b.da),
            Field::Language => a.language.cmp(&b.language),
            Field::Price => a.price.cmp(&b.price),
            Field::SpamScore => a.spam_score.cmp(&b.spam_score),
        }
    }
}

/// Look up a column by its query-string name.
pub fn column_by_name(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|column| column.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Direction a header link for `target` should request next: reselecting the
/// active column toggles the direction, any other column starts ascending.
pub fn next_sort_dir(active: &Column, dir: SortDirection, target: &Column) -> SortDirection {
    if active.name == target.name {
        dir.toggled()
    } else {
        SortDirection::Asc
    }
}

/// View parameters carried in the dashboard query string. Everything is
/// optional and falls back to the defaults: no filter, sort by domain
/// ascending, page 1.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
}

/// One derived page of the table, ready to render.
pub struct TableView<'a> {
    pub rows: Vec<&'a WebsiteRecord>,
    pub filtered_count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub sort: &'static Column,
    pub dir: SortDirection,
    pub filter: String,
}

/// Total page count for `count` filtered records. An empty set still has one
/// (empty) page, so the page number is always well-defined.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Derive the visible page: filter by case-insensitive substring match on the
/// domain, stable-sort by the selected column (reversed when descending, ties
/// keep their relative order), then slice out the requested page with the
/// page number clamped to the valid range.
pub fn derive_view<'a>(records: &'a [WebsiteRecord], query: &TableQuery) -> TableView<'a> {
    let sort = query
        .sort
        .as_deref()
        .and_then(column_by_name)
        .unwrap_or(&COLUMNS[0]);
    let dir = query.dir.unwrap_or_default();
    let needle = query.q.to_lowercase();

    let mut filtered: Vec<&WebsiteRecord> = records
        .iter()
        .filter(|record| record.domain.to_lowercase().contains(&needle))
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = sort.compare(a, b);
        match dir {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);
    let rows = filtered
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    TableView {
        rows,
        filtered_count,
        page,
        total_pages,
        sort,
        dir,
        filter: query.q.clone(),
    }
}
