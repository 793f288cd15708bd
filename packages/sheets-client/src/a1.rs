//! A1 notation helpers.

/// Quote a sheet title for use in a range (`'It''s'`).
pub fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Column letters for a zero-based column index (0 -> `A`, 26 -> `AA`).
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Range covering every cell on a sheet.
pub fn whole_sheet(title: &str) -> String {
    quote_sheet(title)
}

/// Range of `width` columns starting at zero-based `row`, unbounded downward.
pub fn rows_from(title: &str, row: usize, width: usize) -> String {
    format!(
        "{}!A{}:{}",
        quote_sheet(title),
        row + 1,
        column_letters(width.max(1) - 1)
    )
}

/// Range of a single zero-based row spanning `width` columns.
pub fn row(title: &str, row: usize, width: usize) -> String {
    format!(
        "{}!A{row1}:{}{row1}",
        quote_sheet(title),
        column_letters(width.max(1) - 1),
        row1 = row + 1
    )
}
