use std::collections::VecDeque;

use serde::Serialize;
use serde_json::{Map, Value};

use super::table::Table;

const OPTION_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    /// Number of columns in the sheet. Kept under this name for API compatibility.
    pub entries: usize,
    pub rows: usize,
    /// Question tag -> answer options, in sheet order.
    pub columns: Map<String, Value>,
}

/// Summarizes the survey layout of a sheet.
///
/// The survey exports put each question as a header over a block of answer
/// columns, and the first data row lists the answer options, with a lone
/// space cell between one question's options and the next. Headers count as
/// question tags when they are `Age` or are longer than four characters and not
/// auto-generated (`Unnamed:`). The first tag and the first option belong to the
/// respondent id column and are skipped.
pub fn summarize(table: &Table) -> DatasetStats {
    DatasetStats {
        entries: table.headers().len(),
        rows: table.len(),
        columns: group_options(table),
    }
}

fn group_options(table: &Table) -> Map<String, Value> {
    let mut result = Map::new();

    let mut tags = table
        .headers()
        .iter()
        .filter(|h| is_question_tag(h))
        .cloned()
        .collect::<VecDeque<_>>();
    let Some(first_row) = table.row(0) else {
        return result;
    };
    let options = first_row.iter().flatten().skip(1).collect::<Vec<_>>();

    if tags.pop_front().is_none() {
        return result;
    }
    let Some(mut current_tag) = tags.pop_front() else {
        return result;
    };
    let mut current_values: Vec<Value> = Vec::new();

    for value in options {
        if value == OPTION_SEPARATOR {
            if let Some(next_tag) = tags.pop_front() {
                let finished = std::mem::replace(&mut current_tag, next_tag);
                result.insert(finished, Value::Array(std::mem::take(&mut current_values)));
                continue;
            }
        }
        current_values.push(Value::String(value.clone()));
    }
    result.insert(current_tag, Value::Array(current_values));

    result
}

fn is_question_tag(header: &str) -> bool {
    header == "Age" || (!header.contains("Unnamed:") && header.chars().count() > 4)
}
