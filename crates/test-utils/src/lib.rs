//! Shared fixtures for the `agritrust` workspace tests.

use agritrust::providers::db::sqlite::SqliteProvider;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub provider: SqliteProvider,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let provider = SqliteProvider::new(":memory:").await?;
        provider.initialize_schema().await?;
        Ok(Self { provider })
    }
}

/// Writes `contents` to `dir/name` and returns the full path.
pub fn write_fixture(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Renders a bank statement CSV with an `amount` column from the given values.
pub fn amounts_csv(amounts: &[f64]) -> String {
    let mut csv = String::from("date,description,amount\n");
    for (i, amount) in amounts.iter().enumerate() {
        csv.push_str(&format!("2024-03-{:02},txn {},{}\n", i % 28 + 1, i + 1, amount));
    }
    csv
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod pdf {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a single-page PDF with one text line per entry of `lines`,
    /// set in the built-in Helvetica font so the text stays extractable.
    pub fn generate_test_pdf(lines: &[&str]) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);
        let font_name = Name(b"F1");

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, 12.0);
        content.set_leading(18.0);
        content.next_line(72.0, 760.0);
        for line in lines {
            content.show(Str(line.as_bytes()));
            content.next_line_using_leading();
        }
        content.end_text();
        pdf.stream(content_id, &content.finish());

        Ok(pdf.finish())
    }
}

#[cfg(feature = "xlsx")]
pub mod xlsx {
    use anyhow::Result;
    use rust_xlsxwriter::Workbook;
    use std::path::Path;

    /// One cell of a generated worksheet.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Cell {
        Text(String),
        Number(f64),
        Empty,
    }

    impl From<&str> for Cell {
        fn from(value: &str) -> Self {
            Cell::Text(value.to_string())
        }
    }

    impl From<f64> for Cell {
        fn from(value: f64) -> Self {
            Cell::Number(value)
        }
    }

    /// Writes `rows` to the first worksheet of a new workbook at `path`.
    pub fn generate_test_xlsx(path: &Path, rows: &[Vec<Cell>]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(r, c, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(r, c, *number)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
        workbook.save(path)?;
        Ok(())
    }
}
