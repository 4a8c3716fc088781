//! Result rendering: ASCII tables with paginated navigation.

use anyhow::Result;
use serde_json::Value;

use crate::core::paginate::page;
use crate::io::prompt::PromptProvider;

const PREV: &str = "[<]";
const NEXT: &str = "[>]";
const GOTO: &str = "Go to specific page";
const DONE: &str = "Query menu";

/// Render a query result, paging through it when it spans multiple pages.
///
/// Non-array results are shown as a single row; an empty array prints a
/// "no results" notice instead of an empty table. With a single page the
/// table prints and control returns immediately; otherwise a navigation
/// menu offers prev/first/next/last, a validated go-to-page input, and a
/// way back to the block menus.
pub fn render_result(prompt: &mut dyn PromptProvider, result: &Value, page_size: usize) -> Result<()> {
    let rows: Vec<Value> = match result {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    if rows.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let mut index = 0;
    loop {
        let window = page(&rows, page_size, index);
        let total_pages = window.total_pages;
        let paged = total_pages > 1;

        if paged {
            let start = index * page_size;
            println!("Page {} of {total_pages}", index + 1);
            println!(
                "Showing rows {}-{} of {}",
                start + 1,
                start + window.shown.len(),
                rows.len()
            );
        }
        print!("{}", format_table(window.shown));
        if !paged {
            return Ok(());
        }

        let first = "[1]".to_string();
        let last = format!("[{total_pages}]");
        let mut choices = Vec::new();
        if window.has_prev {
            choices.push(PREV.to_string());
            choices.push(first.clone());
        }
        if window.has_next {
            choices.push(NEXT.to_string());
            choices.push(last.clone());
        }
        choices.push(GOTO.to_string());
        choices.push(DONE.to_string());

        let chosen = prompt.select("Navigation:", &choices)?;
        let chosen = choices[chosen].as_str();
        if chosen == PREV {
            index -= 1;
        } else if chosen == first {
            index = 0;
        } else if chosen == NEXT {
            index += 1;
        } else if chosen == last {
            index = total_pages - 1;
        } else if chosen == GOTO {
            // Out-of-range page numbers are rejected and re-asked, never
            // silently clamped.
            let check = |answer: &str| -> Result<(), String> {
                match answer.trim().parse::<usize>() {
                    Ok(n) if (1..=total_pages).contains(&n) => Ok(()),
                    _ => Err(format!("Please enter a number between 1 and {total_pages}")),
                }
            };
            let answer = prompt.input(
                &format!("Enter page number (1-{total_pages}):"),
                Some(&check),
            )?;
            index = answer.trim().parse::<usize>().unwrap_or(1) - 1;
        } else {
            return Ok(());
        }
    }
}

/// Tabulate rows: object rows contribute their keys as columns in first-seen
/// order, scalar rows render under a `value` column.
pub fn format_table(rows: &[Value]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        match row.as_object() {
            Some(map) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
            None => {
                if !columns.iter().any(|c| c == "value") {
                    columns.push("value".to_string());
                }
            }
        }
    }

    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| cell(row, column)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rendered
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&rule.join("-|-"));
    out.push('\n');
    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(value, width)| format!("{value:<width$}"))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

fn cell(row: &Value, column: &str) -> String {
    match row.as_object() {
        Some(map) => map.get(column).map(display_value).unwrap_or_default(),
        None if column == "value" => display_value(row),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
