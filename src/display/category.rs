//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Color")]
    color: String,
}

/// Format categories as a table
pub fn format_category_list<'a>(categories: impl IntoIterator<Item = &'a Category>) -> String {
    let rows: Vec<CategoryRow> = categories
        .into_iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            kind: c.kind.to_string(),
            color: c.color.clone(),
        })
        .collect();

    if rows.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
