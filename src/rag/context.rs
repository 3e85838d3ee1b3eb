//! Assembles retrieved row texts into the context handed to the chat model.

const ROW_SEPARATOR: &str = "\n\n";

pub fn join_rows<S: AsRef<str>>(rows: &[S]) -> String {
    rows.iter()
        .map(|row| row.as_ref())
        .collect::<Vec<_>>()
        .join(ROW_SEPARATOR)
}

pub fn comparison_context<S: AsRef<str>>(rows: &[S]) -> String {
    format!("Comparison of findings:{}{}", ROW_SEPARATOR, join_rows(rows))
}

pub fn demographics_context<S: AsRef<str>>(sustainability: &[S], christmas: &[S]) -> String {
    format!(
        "Sustainability Data:\n{}\n\nChristmas Data:\n{}",
        quoted_list(sustainability),
        quoted_list(christmas)
    )
}

/// `['first', 'second']`, with backslashes and control characters escaped so each
/// row stays on one line. A row containing `'` but no `"` is wrapped in double quotes.
fn quoted_list<S: AsRef<str>>(rows: &[S]) -> String {
    let items = rows
        .iter()
        .map(|row| quote(row.as_ref()))
        .collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            other => quoted.push(other),
        }
    }
    quoted.push(delimiter);
    quoted
}
