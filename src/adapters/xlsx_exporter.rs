use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::core::errors::ExportError;
use crate::core::interfaces::adapters::SpreadsheetExporter;
use crate::core::models::ExtractionResult;
use crate::global_constants;

pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        Self
    }

    /// Empty values are written as blank text cells so every row has a cell
    /// in every column.
    fn write_row(
        worksheet: &mut Worksheet,
        row_index: usize,
        cells: &[String],
        format: &Format,
    ) -> Result<(), ExportError> {
        let row = u32::try_from(row_index)
            .map_err(|_| ExportError::Spreadsheet(format!("row {} is out of range", row_index)))?;

        for (column_index, cell) in cells.iter().enumerate() {
            let column = u16::try_from(column_index).map_err(|_| {
                ExportError::Spreadsheet(format!("column {} is out of range", column_index))
            })?;

            if cell.is_empty() {
                worksheet.write_blank(row, column, format)
            } else {
                worksheet.write_string_with_format(row, column, cell, format)
            }
            .map_err(to_export_error)?;
        }

        Ok(())
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_export_error(error: XlsxError) -> ExportError {
    ExportError::Spreadsheet(error.to_string())
}

impl SpreadsheetExporter for XlsxExporter {
    fn export(&self, result: &ExtractionResult) -> Result<Vec<u8>, ExportError> {
        log::info!(
            "[XLSX] Writing {} rows x {} columns",
            result.rows.len(),
            result.header().len()
        );

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let text_format = Format::new().set_num_format("@");

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(global_constants::WORKSHEET_NAME)
            .map_err(to_export_error)?;

        Self::write_row(worksheet, 0, &result.header(), &header_format)?;
        for (index, cells) in result.table_rows().iter().enumerate() {
            Self::write_row(worksheet, index + 1, cells, &text_format)?;
        }
        worksheet.autofit();

        let bytes = workbook.save_to_buffer().map_err(to_export_error)?;
        log::debug!("[XLSX] Workbook is {} bytes", bytes.len());
        Ok(bytes)
    }
}
