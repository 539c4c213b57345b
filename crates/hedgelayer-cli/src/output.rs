// Terminal rendering helpers: padded tables, status markers, value
// formatting. Styling is plain SGR sequences, disabled by --no-color or
// the NO_COLOR environment variable.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

pub fn disable_color() {
    COLOR_ENABLED.store(false, Ordering::Relaxed);
}

fn styled(code: &str, text: &str) -> String {
    if COLOR_ENABLED.load(Ordering::Relaxed) {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str) -> String {
    styled("1", text)
}

pub fn dim(text: &str) -> String {
    styled("2", text)
}

pub fn red(text: &str) -> String {
    styled("31", text)
}

pub fn green(text: &str) -> String {
    styled("32", text)
}

pub fn yellow(text: &str) -> String {
    styled("33", text)
}

pub fn cyan(text: &str) -> String {
    styled("36", text)
}

pub fn json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => error(&format!("Failed to serialize output: {e}")),
    }
}

pub fn heading(text: &str) {
    println!("\n{}\n", bold(text));
}

pub fn success(text: &str) {
    println!("{} {text}", green("✓"));
}

pub fn warn(text: &str) {
    println!("{} {text}", yellow("⚠"));
}

pub fn error(text: &str) {
    eprintln!("{} {text}", red("✗"));
}

/// Two-space padded columns; widths ignore SGR sequences so colored cells
/// align with plain ones.
pub fn table(rows: &[Vec<String>], headers: Option<&[&str]>) {
    let mut all: Vec<Vec<String>> = Vec::new();
    if let Some(headers) = headers {
        all.push(headers.iter().map(|h| h.to_string()).collect());
    }
    all.extend(rows.iter().cloned());

    let mut widths: Vec<usize> = Vec::new();
    for row in &all {
        for (i, cell) in row.iter().enumerate() {
            let width = visible_width(cell);
            if i >= widths.len() {
                widths.push(width);
            } else if width > widths[i] {
                widths[i] = width;
            }
        }
    }

    for (r, row) in all.iter().enumerate() {
        let padded: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i].saturating_sub(visible_width(cell));
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        println!("  {}", padded.join("  ").trim_end());

        if r == 0 && headers.is_some() {
            let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("  {}", separator.join("──"));
        }
    }
}

fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

pub fn currency(n: f64) -> String {
    let cents = (n.abs() * 100.0).round() as u64;
    let sign = if n < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_digits(cents / 100), cents % 100)
}

/// Whole number with thousands separators.
pub fn thousands(n: f64) -> String {
    let whole = n.abs().round() as u64;
    let sign = if n < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}{}", group_digits(whole))
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

pub fn percent(n: f64) -> String {
    format!("{:.1}%", n * 100.0)
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

pub fn relative_time(time: DateTime<Utc>) -> String {
    let mins = (Utc::now() - time).num_minutes();
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}
