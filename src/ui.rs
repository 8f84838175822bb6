// Terminal UI utilities

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn print_success(message: &str) {
    println!("{}", format!("✅ {}", message).bright_green().bold());
}

pub fn print_error(message: &str) {
    eprintln!("{}", format!("❌ {}", message).bright_red().bold());
}

pub fn print_info(message: &str) {
    println!("{}", format!("ℹ️  {}", message).bright_cyan());
}

pub fn print_warning(message: &str) {
    println!("{}", format!("⚠️  {}", message).bright_yellow());
}

/// Two aligned columns with a header row
pub fn print_map(headers: (&str, &str), rows: &BTreeMap<String, String>) {
    let width = rows
        .keys()
        .map(String::len)
        .chain(std::iter::once(headers.0.len()))
        .max()
        .unwrap_or(0);

    println!(
        "{}",
        format!("{:<width$}  {}", headers.0, headers.1, width = width).bold()
    );
    for (key, value) in rows {
        println!("{:<width$}  {}", key, value, width = width);
    }
}

pub fn print_list(items: &[String]) {
    for item in items {
        println!("{}", item);
    }
}

/// Raw command output, skipped when empty
pub fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{}", output);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
