use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

/// Print `data` as an aligned table, or as JSON with `--json`.
pub fn print_table<T: Serialize>(
    json: bool,
    data: &[T],
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<()> {
    if json {
        return print_json(data);
    }
    if data.is_empty() {
        println!("(none)");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data.iter().map(row).collect();
    print!("{}", render_table(headers, &rows));
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        print_json(data)
    } else {
        println!("{}", text(&data));
        Ok(())
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = pad_line(headers, &widths);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&pad_line(&cells, &widths));
    }
    out
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// Number cell; missing values render as `-`.
pub fn num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

pub fn text(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
