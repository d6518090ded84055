//! Output formatting for products, comparisons and marketplaces (table,
//! JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::extract::ProductRecord;
use crate::marketplace::{self, registry::RegistryEntry};
use crate::presenter::{OverlayState, PriceClass, ResultRow};
use serde_json::json;

/// Formats pipeline output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single product record.
    pub fn format_product(&self, product: &ProductRecord) -> String {
        match self.format {
            OutputFormat::Json => self.json(product, "{}"),
            OutputFormat::Table => self.table_product(product),
            OutputFormat::Markdown => self.markdown_product(product),
            OutputFormat::Csv => self.csv_product(product),
        }
    }

    /// Formats comparison rows.
    pub fn format_rows(&self, rows: &[ResultRow]) -> String {
        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::csv_rows_header().to_string(),
                _ => "No similar products found on other marketplaces.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json(rows, "[]"),
            OutputFormat::Table => self.table_rows(rows),
            OutputFormat::Markdown => self.markdown_rows(rows),
            OutputFormat::Csv => self.csv_rows(rows),
        }
    }

    /// Formats what the overlay currently shows.
    pub fn format_overlay(&self, state: &OverlayState) -> String {
        let Some(product) = state.product() else {
            return match self.format {
                OutputFormat::Json => "null".to_string(),
                OutputFormat::Csv => String::new(),
                _ => "No product detected.".to_string(),
            };
        };

        let rows: &[ResultRow] = match state {
            OverlayState::Results { rows, .. } => rows,
            _ => &[],
        };

        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "product": product,
                    "results": rows,
                    "notice": state.notice(),
                });
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Csv => self.format_rows(rows),
            _ => {
                let mut sections = vec![self.format_product(product), String::new()];
                match state.notice() {
                    Some(notice) => sections.push(notice),
                    None if matches!(state, OverlayState::Loading { .. }) => {
                        sections.push("Searching for better prices...".to_string())
                    }
                    None => sections.push(self.format_rows(rows)),
                }
                sections.join("\n")
            }
        }
    }

    /// Formats the marketplace registry.
    pub fn format_marketplaces(&self, entries: &[RegistryEntry]) -> String {
        match self.format {
            OutputFormat::Json => self.json(entries, "[]"),
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("{:<16}  {:<14}  {}", "ID", "Name", "Logo"),
                    format!("{:-<16}  {:-<14}  {:-<30}", "", "", ""),
                ];
                for entry in entries {
                    lines.push(format!(
                        "{:<16}  {:<14}  {}",
                        entry.id,
                        entry.name,
                        entry.logo.unwrap_or("-")
                    ));
                }
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines =
                    vec!["| ID | Name | Logo |".to_string(), "|----|------|------|".to_string()];
                for entry in entries {
                    lines.push(format!(
                        "| {} | {} | {} |",
                        entry.id,
                        entry.name,
                        entry.logo.unwrap_or("")
                    ));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["id,name,logo".to_string()];
                for entry in entries {
                    lines.push(format!(
                        "{},{},{}",
                        entry.id,
                        Self::csv_escape(entry.name),
                        entry.logo.unwrap_or("")
                    ));
                }
                lines.join("\n")
            }
        }
    }

    fn json<T: serde::Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
    }

    // Table formatting

    fn table_product(&self, product: &ProductRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Title:   {}", product.title));
        let price = product.price.as_deref().unwrap_or("Price not available");
        lines.push(format!("Price:   {}", price));
        lines.push(format!("Site:    {}", marketplace::display_name(&product.marketplace)));
        lines.push(format!("URL:     {}", product.url));

        if let Some(image) = &product.image {
            lines.push(format!("Image:   {}", image));
        }

        lines.join("\n")
    }

    fn table_rows(&self, rows: &[ResultRow]) -> String {
        let market_width = 14;
        let price_width = 12;
        let savings_width = 12;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<market_width$}  {:>price_width$}  {:<savings_width$}  {}",
            "Marketplace", "Price", "Savings", "Title"
        ));
        lines.push(format!(
            "{:-<market_width$}  {:-<price_width$}  {:-<savings_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for row in rows {
            lines.push(format!(
                "{:<market_width$}  {:>price_width$}  {:<savings_width$}  {}",
                row.marketplace_name,
                row.result.price,
                row.savings_label().unwrap_or_default(),
                Self::truncate(&row.result.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} listings", rows.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_product(&self, product: &ProductRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title));
        lines.push(String::new());

        if let Some(price) = &product.price {
            lines.push(format!("- **Price:** {}", price));
        }
        lines.push(format!("- **Site:** {}", marketplace::display_name(&product.marketplace)));
        lines.push(format!("- **URL:** [View product]({})", product.url));

        lines.join("\n")
    }

    fn markdown_rows(&self, rows: &[ResultRow]) -> String {
        let mut lines = Vec::new();

        lines.push("| Marketplace | Price | Savings | Title |".to_string());
        lines.push("|-------------|-------|---------|-------|".to_string());

        for row in rows {
            lines.push(format!(
                "| {} | {} | {} | [{}]({}) |",
                row.marketplace_name,
                row.result.price,
                row.savings_label().unwrap_or_default(),
                Self::truncate(&row.result.title, 40),
                row.result.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} listings found*", rows.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_product(&self, product: &ProductRecord) -> String {
        format!(
            "title,price,image,marketplace,url,extracted_at\n{},{},{},{},{},{}",
            Self::csv_escape(&product.title),
            Self::csv_escape(product.price.as_deref().unwrap_or("")),
            product.image.as_deref().unwrap_or(""),
            product.marketplace,
            product.url,
            product.extracted_at
        )
    }

    fn csv_rows_header() -> &'static str {
        "marketplace,title,price,price_class,savings,url"
    }

    fn csv_rows(&self, rows: &[ResultRow]) -> String {
        let mut lines = Vec::new();
        lines.push(Self::csv_rows_header().to_string());

        for row in rows {
            let class = match row.class {
                PriceClass::Lower => "lower",
                PriceClass::Higher => "higher",
                PriceClass::Same => "same",
            };

            lines.push(format!(
                "{},{},{},{},{},{}",
                row.result.marketplace,
                Self::csv_escape(&row.result.title),
                Self::csv_escape(&row.result.price),
                class,
                row.savings.map(|s| format!("{:.2}", s)).unwrap_or_default(),
                row.result.url
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    fn truncate(s: &str, width: usize) -> String {
        if s.chars().count() > width {
            let head: String = s.chars().take(width - 3).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        }
    }
}
