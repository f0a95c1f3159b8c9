use crate::core::errors::ExportError;
use crate::core::models::ExtractionResult;

pub trait SpreadsheetExporter: Send + Sync {
    fn export(&self, result: &ExtractionResult) -> Result<Vec<u8>, ExportError>;
}
