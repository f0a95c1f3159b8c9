mod spreadsheet_exporter;
mod text_recognizer;

pub use spreadsheet_exporter::SpreadsheetExporter;
pub use text_recognizer::TextRecognizer;
