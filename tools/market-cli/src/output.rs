//! Output formatting for the CLI.

use console::style;
use market_cart::LineItem;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize + ?Sized>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        println!("  {}", format_row(cols, widths));
    }

    /// Print the cart as a table, or as its snapshot JSON in JSON mode.
    pub fn cart(&self, items: &[LineItem]) {
        if self.json {
            self.json(items);
            return;
        }

        self.header("Cart");
        if items.is_empty() {
            self.info("Cart is empty");
            return;
        }

        let widths = column_widths(items);
        self.table_row(&["ID", "TITLE", "QTY", "PRICE"], &widths);
        for item in items {
            let quantity = item.quantity.to_string();
            let price = item.price.to_string();
            self.table_row(
                &[
                    item.id.as_str(),
                    item.title.as_str(),
                    quantity.as_str(),
                    price.as_str(),
                ],
                &widths,
            );
        }

        let units: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
        self.kv("units", &units.to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn format_row(cols: &[&str], widths: &[usize]) -> String {
    let formatted: Vec<String> = cols
        .iter()
        .zip(widths.iter())
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect();
    formatted.join("  ").trim_end().to_string()
}

/// Column widths fitting the header and every item.
fn column_widths(items: &[LineItem]) -> [usize; 4] {
    let mut widths = ["ID".len(), "TITLE".len(), "QTY".len(), "PRICE".len()];
    for item in items {
        widths[0] = widths[0].max(item.id.as_str().chars().count());
        widths[1] = widths[1].max(item.title.chars().count());
        widths[2] = widths[2].max(item.quantity.to_string().len());
        widths[3] = widths[3].max(item.price.to_string().len());
    }
    widths
}
