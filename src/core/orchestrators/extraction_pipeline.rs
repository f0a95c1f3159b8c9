use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::core::errors::PipelineError;
use crate::core::interfaces::adapters::TextRecognizer;
use crate::core::models::{
    ExtractionResult, ExtractionRow, ExtractionWarning, ImageAsset, Region, ResolutionPolicy,
    UploadedImage, UserSettings,
};
use crate::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub include_date_column: bool,
    pub max_concurrent_recognitions: usize,
    pub resolution_policy: ResolutionPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            include_date_column: true,
            max_concurrent_recognitions: 1,
            resolution_policy: ResolutionPolicy::AssumeUniform,
        }
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            include_date_column: settings.include_date_column,
            max_concurrent_recognitions: settings.max_concurrent_recognitions.max(1),
            resolution_policy: settings.resolution_policy,
        }
    }
}

pub struct ExtractionPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    options: PipelineOptions,
}

impl ExtractionPipeline {
    pub fn build(recognizer: Arc<dyn TextRecognizer>, options: PipelineOptions) -> Self {
        Self {
            recognizer,
            options,
        }
    }

    /// Runs every region of every image through the recognizer.
    ///
    /// Rows follow upload order and cells follow region order. Images that
    /// fail to decode are skipped with a warning; a recognition failure
    /// aborts the whole run.
    pub async fn run(
        &self,
        images: &[UploadedImage],
        regions: &[Region],
    ) -> Result<ExtractionResult, PipelineError> {
        if regions.is_empty() {
            log::warn!("[PIPELINE] Refusing to run without regions");
            return Err(PipelineError::NoRegions);
        }

        log::info!(
            "[PIPELINE] Processing {} images x {} regions with {} (concurrency {})",
            images.len(),
            regions.len(),
            self.recognizer.backend_name(),
            self.options.max_concurrent_recognitions
        );

        let mut result = ExtractionResult::empty(regions.len(), self.options.include_date_column);

        for upload in images {
            let asset = match ImageAsset::decode(upload) {
                Ok(asset) => asset,
                Err(error) => {
                    log::warn!("[PIPELINE] {}", error);
                    result.warnings.push(ExtractionWarning::ImageSkipped {
                        file_name: error.file_name,
                        reason: error.reason,
                    });
                    continue;
                }
            };

            let Some(image_regions) = self.resolve_regions_for(&asset, regions, &mut result.warnings)
            else {
                continue;
            };

            let region_texts = self
                .recognize_regions(&asset, &image_regions, &mut result.warnings)
                .await?;

            let date = if self.options.include_date_column {
                utils::extract_date_from_file_name(&asset.file_name)
            } else {
                None
            };

            result.rows.push(ExtractionRow {
                source_name: asset.file_name.clone(),
                date,
                region_texts,
            });
        }

        log::info!(
            "[PIPELINE] Finished: {} rows, {} warnings",
            result.rows.len(),
            result.warnings.len()
        );

        Ok(result)
    }

    fn resolve_regions_for(
        &self,
        asset: &ImageAsset,
        regions: &[Region],
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Option<Vec<Region>> {
        let image_size = asset.dimensions();

        match self.options.resolution_policy {
            ResolutionPolicy::AssumeUniform => Some(regions.to_vec()),
            ResolutionPolicy::ScaleFromReference { width, height } => Some(
                regions
                    .iter()
                    .map(|region| region.scale_between((width, height), image_size))
                    .collect(),
            ),
            ResolutionPolicy::RejectMismatched {
                width,
                height,
                tolerance_px,
            } => {
                let within_tolerance = image_size.0.abs_diff(width) <= tolerance_px
                    && image_size.1.abs_diff(height) <= tolerance_px;

                if within_tolerance {
                    return Some(regions.to_vec());
                }

                log::warn!(
                    "[PIPELINE] Skipping '{}': {}x{} differs from expected {}x{}",
                    asset.file_name,
                    image_size.0,
                    image_size.1,
                    width,
                    height
                );
                warnings.push(ExtractionWarning::DimensionMismatch {
                    file_name: asset.file_name.clone(),
                    actual: image_size,
                    expected: (width, height),
                });
                None
            }
        }
    }

    async fn recognize_regions(
        &self,
        asset: &ImageAsset,
        regions: &[Region],
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Result<Vec<String>, PipelineError> {
        let (image_width, image_height) = asset.dimensions();
        let mut crops: Vec<Option<Vec<u8>>> = Vec::with_capacity(regions.len());

        for (index, region) in regions.iter().enumerate() {
            let region_number = index + 1;

            let Some(clamped) = region.clamp_to(image_width, image_height) else {
                log::warn!(
                    "[PIPELINE] Region {} ({}) lies outside '{}' ({}x{})",
                    region_number,
                    region,
                    asset.file_name,
                    image_width,
                    image_height
                );
                warnings.push(ExtractionWarning::RegionOutsideImage {
                    file_name: asset.file_name.clone(),
                    region_number,
                });
                crops.push(None);
                continue;
            };

            if clamped != *region {
                log::debug!(
                    "[PIPELINE] Region {} clamped from {} to {} for '{}'",
                    region_number,
                    region,
                    clamped,
                    asset.file_name
                );
            }

            let png = asset
                .crop_region_to_png(&clamped)
                .map_err(|error| PipelineError::CropEncoding {
                    file_name: asset.file_name.clone(),
                    region_number,
                    reason: error.to_string(),
                })?;
            crops.push(Some(png));
        }

        let recognizer = &self.recognizer;
        let file_name = &asset.file_name;

        stream::iter(crops.into_iter().enumerate())
            .map(|(index, crop)| async move {
                let Some(png) = crop else {
                    return Ok(String::new());
                };

                let text = recognizer
                    .recognize_text(&png)
                    .await
                    .map_err(|source| PipelineError::Recognition {
                        file_name: file_name.clone(),
                        region_number: index + 1,
                        source,
                    })?;

                log::debug!(
                    "[PIPELINE] '{}' region {}: {} characters",
                    file_name,
                    index + 1,
                    text.len()
                );
                Ok(text)
            })
            .buffered(self.options.max_concurrent_recognitions.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_recognizers {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use image::GenericImageView;

    use crate::core::errors::RecognitionError;
    use crate::core::interfaces::adapters::TextRecognizer;

    /// Answers with the crop's pixel size, e.g. "30x40".
    pub struct CropSizeRecognizer {
        pub call_count: AtomicUsize,
        pub yield_longer_for_early_calls: bool,
    }

    impl CropSizeRecognizer {
        pub fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                yield_longer_for_early_calls: false,
            }
        }

        pub fn finishing_in_reverse() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                yield_longer_for_early_calls: true,
            }
        }
    }

    #[async_trait]
    impl TextRecognizer for CropSizeRecognizer {
        fn backend_name(&self) -> &'static str {
            "crop-size"
        }

        async fn recognize_text(&self, region_image: &[u8]) -> Result<String, RecognitionError> {
            let call_index = self.call_count.fetch_add(1, Ordering::SeqCst);

            if self.yield_longer_for_early_calls {
                for _ in 0..(20usize.saturating_sub(call_index * 5)) {
                    tokio::task::yield_now().await;
                }
            }

            let image = image::load_from_memory(region_image)
                .map_err(|error| RecognitionError::InvalidImage(error.to_string()))?;
            let (width, height) = image.dimensions();
            Ok(format!("{}x{}", width, height))
        }
    }

    /// Replays a fixed list of answers in call order.
    pub struct ScriptedRecognizer {
        answers: Mutex<VecDeque<String>>,
    }

    impl ScriptedRecognizer {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().map(|answer| answer.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl TextRecognizer for ScriptedRecognizer {
        fn backend_name(&self) -> &'static str {
            "scripted"
        }

        async fn recognize_text(&self, _region_image: &[u8]) -> Result<String, RecognitionError> {
            Ok(self
                .answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }
    }

    pub struct FailingRecognizer;

    #[async_trait]
    impl TextRecognizer for FailingRecognizer {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn recognize_text(&self, _region_image: &[u8]) -> Result<String, RecognitionError> {
            Err(RecognitionError::Transport("connection refused".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_recognizers::*;
    use super::*;
    use crate::core::models::test_images::uploaded_png;
    use std::sync::atomic::Ordering;

    fn region(left: u32, top: u32, width: u32, height: u32) -> Region {
        Region::new(left, top, width, height).unwrap()
    }

    fn pipeline_with(recognizer: Arc<dyn TextRecognizer>, options: PipelineOptions) -> ExtractionPipeline {
        ExtractionPipeline::build(recognizer, options)
    }

    #[tokio::test]
    async fn test_run_builds_expected_row_for_dated_file() {
        let pipeline = pipeline_with(
            Arc::new(ScriptedRecognizer::new(&["Total", ""])),
            PipelineOptions::default(),
        );
        let images = vec![uploaded_png("shot_2024-03-07.png", 200, 100)];
        let regions = vec![region(0, 0, 50, 20), region(60, 0, 50, 20)];

        let result = pipeline.run(&images, &regions).await.unwrap();

        assert_eq!(
            result.table_rows(),
            vec![vec!["shot_2024-03-07.png", "2024-03-07", "Total", ""]]
        );
    }

    #[tokio::test]
    async fn test_run_keeps_one_cell_per_region_for_every_image() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());
        let images = vec![
            uploaded_png("a.png", 100, 100),
            uploaded_png("b.png", 100, 100),
            uploaded_png("c.png", 100, 100),
        ];
        let regions = vec![region(0, 0, 10, 10), region(0, 0, 20, 10), region(0, 0, 30, 10)];

        let result = pipeline.run(&images, &regions).await.unwrap();

        assert_eq!(result.rows.len(), 3);
        let names: Vec<&str> = result.rows.iter().map(|row| row.source_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        for row in &result.rows {
            assert_eq!(row.region_texts, vec!["10x10", "20x10", "30x10"]);
        }
    }

    #[tokio::test]
    async fn test_run_skips_undecodable_image_and_records_warning() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());
        let images = vec![
            uploaded_png("first.png", 50, 50),
            UploadedImage::build_from_bytes("corrupt.png", b"not an image".to_vec()),
            uploaded_png("third.png", 50, 50),
        ];

        let result = pipeline.run(&images, &[region(0, 0, 5, 5)]).await.unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].source_name, "first.png");
        assert_eq!(result.rows[1].source_name, "third.png");
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            ExtractionWarning::ImageSkipped { file_name, .. } if file_name == "corrupt.png"
        ));
    }

    #[tokio::test]
    async fn test_run_refuses_empty_region_list() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());

        let error = pipeline
            .run(&[uploaded_png("a.png", 10, 10)], &[])
            .await
            .unwrap_err();

        assert!(matches!(error, PipelineError::NoRegions));
    }

    #[tokio::test]
    async fn test_run_with_no_images_returns_empty_result() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());

        let result = pipeline.run(&[], &[region(0, 0, 5, 5)]).await.unwrap();

        assert!(result.rows.is_empty());
        assert_eq!(result.header(), vec!["Source Name", "Date", "Data 1"]);
    }

    #[tokio::test]
    async fn test_run_clamps_region_crossing_image_edge() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());

        let result = pipeline
            .run(&[uploaded_png("a.png", 100, 100)], &[region(90, 80, 50, 50)])
            .await
            .unwrap();

        assert_eq!(result.rows[0].region_texts, vec!["10x20"]);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_run_leaves_cell_empty_for_region_outside_image() {
        let recognizer = Arc::new(CropSizeRecognizer::new());
        let pipeline = pipeline_with(recognizer.clone(), PipelineOptions::default());

        let result = pipeline
            .run(
                &[uploaded_png("a.png", 100, 100)],
                &[region(200, 0, 10, 10), region(0, 0, 10, 10)],
            )
            .await
            .unwrap();

        assert_eq!(result.rows[0].region_texts, vec!["", "10x10"]);
        assert_eq!(
            result.warnings,
            vec![ExtractionWarning::RegionOutsideImage {
                file_name: "a.png".to_string(),
                region_number: 1
            }]
        );
        assert_eq!(recognizer.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_aborts_on_recognition_failure() {
        let pipeline = pipeline_with(Arc::new(FailingRecognizer), PipelineOptions::default());

        let error = pipeline
            .run(&[uploaded_png("a.png", 20, 20)], &[region(0, 0, 5, 5)])
            .await
            .unwrap_err();

        match error {
            PipelineError::Recognition {
                file_name,
                region_number,
                ..
            } => {
                assert_eq!(file_name, "a.png");
                assert_eq!(region_number, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_is_idempotent_with_deterministic_recognizer() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());
        let images = vec![uploaded_png("x_2023-01-02.png", 64, 64)];
        let regions = vec![region(0, 0, 8, 8), region(8, 8, 16, 4)];

        let first = pipeline.run(&images, &regions).await.unwrap();
        let second = pipeline.run(&images, &regions).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_recognition_keeps_region_order() {
        let options = PipelineOptions {
            max_concurrent_recognitions: 4,
            ..PipelineOptions::default()
        };
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::finishing_in_reverse()), options);
        let regions = vec![
            region(0, 0, 10, 1),
            region(0, 0, 20, 1),
            region(0, 0, 30, 1),
            region(0, 0, 40, 1),
        ];

        let result = pipeline
            .run(&[uploaded_png("a.png", 50, 50)], &regions)
            .await
            .unwrap();

        assert_eq!(
            result.rows[0].region_texts,
            vec!["10x1", "20x1", "30x1", "40x1"]
        );
    }

    #[tokio::test]
    async fn test_date_column_disabled_leaves_date_empty() {
        let options = PipelineOptions {
            include_date_column: false,
            ..PipelineOptions::default()
        };
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), options);

        let result = pipeline
            .run(&[uploaded_png("shot_2024-03-07.png", 10, 10)], &[region(0, 0, 5, 5)])
            .await
            .unwrap();

        assert_eq!(result.rows[0].date, None);
        assert_eq!(result.table_rows()[0], vec!["shot_2024-03-07.png", "5x5"]);
    }

    #[tokio::test]
    async fn test_missing_date_in_file_name_is_not_an_error() {
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), PipelineOptions::default());

        let result = pipeline
            .run(&[uploaded_png("screenshot.png", 10, 10)], &[region(0, 0, 5, 5)])
            .await
            .unwrap();

        assert_eq!(result.rows[0].date, None);
    }

    #[tokio::test]
    async fn test_scale_from_reference_resizes_regions_per_image() {
        let options = PipelineOptions {
            resolution_policy: ResolutionPolicy::ScaleFromReference {
                width: 200,
                height: 200,
            },
            ..PipelineOptions::default()
        };
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), options);

        let result = pipeline
            .run(&[uploaded_png("small.png", 100, 100)], &[region(0, 0, 100, 50)])
            .await
            .unwrap();

        assert_eq!(result.rows[0].region_texts, vec!["50x25"]);
    }

    #[tokio::test]
    async fn test_reject_mismatched_skips_images_beyond_tolerance() {
        let options = PipelineOptions {
            resolution_policy: ResolutionPolicy::RejectMismatched {
                width: 100,
                height: 100,
                tolerance_px: 5,
            },
            ..PipelineOptions::default()
        };
        let pipeline = pipeline_with(Arc::new(CropSizeRecognizer::new()), options);
        let images = vec![
            uploaded_png("close.png", 103, 100),
            uploaded_png("far.png", 200, 100),
        ];

        let result = pipeline.run(&images, &[region(0, 0, 5, 5)]).await.unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].source_name, "close.png");
        assert_eq!(
            result.warnings,
            vec![ExtractionWarning::DimensionMismatch {
                file_name: "far.png".to_string(),
                actual: (200, 100),
                expected: (100, 100),
            }]
        );
    }

    #[test]
    fn test_options_from_settings_never_use_zero_concurrency() {
        let mut settings = UserSettings::default();
        settings.max_concurrent_recognitions = 0;
        settings.include_date_column = false;

        let options = PipelineOptions::from_settings(&settings);

        assert_eq!(options.max_concurrent_recognitions, 1);
        assert!(!options.include_date_column);
    }
}
