//! Decision log writers.

use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use crate::decision::DecisionRecord;
use crate::error::Error;

pub const TSV_HEADERS: [&str; 4] = ["Document", "Gray_Percentage", "Selected_Format", "Flagged_Files"];
pub const XLSX_HEADERS: [&str; 4] = [
    "Document",
    "Gray Percentage (%)",
    "Selected Format",
    "Flagged_Files",
];
pub const XLSX_SHEET_NAME: &str = "Selection Log";

pub fn write_tsv(records: &[DecisionRecord], path: &Path) -> Result<(), Error> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;

    writer.write_record(TSV_HEADERS)?;
    for record in records {
        writer.write_record([
            record.selected_documents.as_str(),
            record.gray_percentage_text.as_str(),
            record.selected_format.label(),
            record.flagged_text(),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

pub fn write_xlsx(records: &[DecisionRecord], path: &Path) -> Result<(), Error> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;

    let bold = Format::new().set_bold();
    let mut widths: Vec<usize> = XLSX_HEADERS.iter().map(|h| h.len()).collect();

    for (col, header) in XLSX_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.selected_documents)?;
        match record.gray_percentage_text.parse::<f64>() {
            Ok(pct) => sheet.write_number(row, 1, pct)?,
            Err(_) => sheet.write_string(row, 1, &record.gray_percentage_text)?,
        };
        sheet.write_string(row, 2, record.selected_format.label())?;
        sheet.write_string(row, 3, record.flagged_text())?;

        let cells = [
            record.selected_documents.len(),
            record.gray_percentage_text.len(),
            record.selected_format.label().len(),
            record.flagged_text().len(),
        ];
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell);
        }
    }

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, (*width + 2) as f64)?;
    }

    workbook.save(path)?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
