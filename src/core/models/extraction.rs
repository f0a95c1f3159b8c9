use crate::global_constants;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRow {
    pub source_name: String,
    pub date: Option<String>,
    pub region_texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    ImageSkipped { file_name: String, reason: String },
    DimensionMismatch {
        file_name: String,
        actual: (u32, u32),
        expected: (u32, u32),
    },
    RegionOutsideImage { file_name: String, region_number: usize },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWarning::ImageSkipped { file_name, reason } => {
                write!(f, "Skipped '{}': {}", file_name, reason)
            }
            ExtractionWarning::DimensionMismatch {
                file_name,
                actual,
                expected,
            } => write!(
                f,
                "Skipped '{}': size {}x{} differs from expected {}x{}",
                file_name, actual.0, actual.1, expected.0, expected.1
            ),
            ExtractionWarning::RegionOutsideImage {
                file_name,
                region_number,
            } => write!(
                f,
                "Region {} lies outside '{}', left empty",
                region_number, file_name
            ),
        }
    }
}

/// Rows of one pipeline run plus the header that describes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub region_count: usize,
    pub include_date_column: bool,
    pub rows: Vec<ExtractionRow>,
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionResult {
    pub fn empty(region_count: usize, include_date_column: bool) -> Self {
        Self {
            region_count,
            include_date_column,
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![global_constants::SOURCE_NAME_HEADER.to_string()];
        if self.include_date_column {
            header.push(global_constants::DATE_HEADER.to_string());
        }
        header.extend(
            (1..=self.region_count)
                .map(|number| format!("{} {}", global_constants::REGION_HEADER_PREFIX, number)),
        );
        header
    }

    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.source_name.clone()];
                if self.include_date_column {
                    cells.push(row.date.clone().unwrap_or_default());
                }
                cells.extend(row.region_texts.iter().cloned());
                cells
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(include_date_column: bool) -> ExtractionResult {
        ExtractionResult {
            region_count: 2,
            include_date_column,
            rows: vec![ExtractionRow {
                source_name: "shot_2024-03-07.png".to_string(),
                date: Some("2024-03-07".to_string()),
                region_texts: vec!["Total".to_string(), String::new()],
            }],
            warnings: vec![],
        }
    }

    #[test]
    fn test_header_labels_regions_positionally() {
        let header = sample_result(true).header();

        assert_eq!(header, vec!["Source Name", "Date", "Data 1", "Data 2"]);
    }

    #[test]
    fn test_header_omits_date_when_disabled() {
        let header = sample_result(false).header();

        assert_eq!(header, vec!["Source Name", "Data 1", "Data 2"]);
    }

    #[test]
    fn test_table_rows_keep_empty_region_cells() {
        let rows = sample_result(true).table_rows();

        assert_eq!(
            rows,
            vec![vec!["shot_2024-03-07.png", "2024-03-07", "Total", ""]]
        );
    }

    #[test]
    fn test_table_rows_use_empty_cell_for_missing_date() {
        let mut result = sample_result(true);
        result.rows[0].date = None;

        let rows = result.table_rows();

        assert_eq!(rows[0][1], "");
        assert_eq!(rows[0].len(), result.header().len());
    }

    #[test]
    fn test_warning_display_names_skipped_file() {
        let warning = ExtractionWarning::ImageSkipped {
            file_name: "broken.png".to_string(),
            reason: "bad header".to_string(),
        };

        assert_eq!(warning.to_string(), "Skipped 'broken.png': bad header");
    }
}
