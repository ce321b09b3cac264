//! Excel persistence. Converts the scraped sequence to a worksheet, dropping
//! duplicate rows keyed by (model, price) and keeping the first occurrence.

use crate::common::error::{Result, ScraperError};
use crate::common::types::ProductRecord;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

const NOT_AVAILABLE: &str = "N/A";

/// Write records to an xlsx workbook at `path`. Returns the number of unique
/// rows written. An empty input is an error and writes nothing.
pub fn write_workbook(records: &[ProductRecord], path: &Path) -> Result<usize> {
    if records.is_empty() {
        return Err(ScraperError::Site {
            message: "no records to export".to_string(),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    let price_header = format!("Price ({})", records[0].currency);
    let headers = [
        "Category",
        "Brand",
        "Model",
        price_header.as_str(),
        "Product URL",
        "Image URL",
        "Country",
        "Year (Target)",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let mut seen = HashSet::new();
    let mut row: u32 = 1;
    for record in records {
        if !seen.insert((record.model.clone(), record.price.to_bits())) {
            continue;
        }
        worksheet.write_string(row, 0, record.category.as_str())?;
        worksheet.write_string(row, 1, record.brand.as_str())?;
        worksheet.write_string(row, 2, record.model.as_str())?;
        worksheet.write_number(row, 3, record.price)?;
        worksheet.write_string(row, 4, record.product_url.as_deref().unwrap_or(NOT_AVAILABLE))?;
        worksheet.write_string(row, 5, record.image_url.as_deref().unwrap_or(NOT_AVAILABLE))?;
        worksheet.write_string(row, 6, record.country.as_str())?;
        worksheet.write_number(row, 7, f64::from(record.year))?;
        row += 1;
    }

    workbook.save(path)?;

    let unique = (row - 1) as usize;
    let dropped = records.len() - unique;
    if dropped > 0 {
        info!(dropped, "removed duplicate entries");
    }
    Ok(unique)
}
