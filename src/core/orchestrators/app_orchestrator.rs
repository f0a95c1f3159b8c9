use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use iced::widget::{
    button, checkbox, column, container, row, scrollable, text, text_input, Column, Space,
};
use iced::{Alignment, Background, Color, Element, Length, Task};

use crate::adapters;
use crate::core::interfaces::adapters::{SpreadsheetExporter, TextRecognizer};
use crate::core::models::{
    ExtractionResult, Region, SessionEvent, SessionState, UploadedImage, UserSettings,
};
use crate::core::orchestrators::extraction_pipeline::{ExtractionPipeline, PipelineOptions};
use crate::core::orchestrators::region_definition::{
    define_regions, ManualRegionFields, RegionDrawingBoard, RegionSource,
};
use crate::global_constants;
use crate::presentation::app_theme;
use crate::presentation::{RegionCanvas, RegionCanvasMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    Preset,
    Manual,
    Drawn,
}

impl RegionMode {
    fn label(&self) -> &'static str {
        match self {
            RegionMode::Preset => "Preset regions",
            RegionMode::Manual => "Enter coordinates",
            RegionMode::Drawn => "Draw on image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    Left,
    Top,
    Width,
    Height,
}

pub struct AppOrchestrator {
    settings: UserSettings,
    session: SessionState,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    exporter: Arc<dyn SpreadsheetExporter>,
    uploads: Vec<UploadedImage>,
    image_path_input: String,
    output_path_input: String,
    region_mode: RegionMode,
    manual_fields: ManualRegionFields,
    drawing_board: RegionDrawingBoard,
    reference_canvas: Option<RegionCanvas>,
    regions: Vec<Region>,
    region_error: Option<String>,
    result: Option<ExtractionResult>,
    status: String,
}

#[derive(Clone)]
pub enum OrchestratorMessage {
    ImagePathChanged(String),
    LoadImages,
    FilesDropped(Vec<PathBuf>),
    ImagesLoaded(Result<Vec<UploadedImage>, String>),
    ClearImages,
    RegionModeSelected(RegionMode),
    ManualFieldChanged(ManualField, String),
    RegionCanvas(RegionCanvasMessage),
    UndoLastRegion,
    ClearDrawnRegions,
    ToggleDateColumn(bool),
    Process,
    ProcessingFinished(Result<ExtractionResult, String>),
    OutputPathChanged(String),
    SaveSpreadsheet,
    SpreadsheetSaved(Result<PathBuf, String>),
    RecognizerReady(Arc<dyn TextRecognizer>),
    RecognizerFailed(String),
    Reset,
}

impl std::fmt::Debug for OrchestratorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorMessage::ImagePathChanged(_) => write!(f, "ImagePathChanged"),
            OrchestratorMessage::LoadImages => write!(f, "LoadImages"),
            OrchestratorMessage::FilesDropped(paths) => write!(f, "FilesDropped({:?})", paths),
            OrchestratorMessage::ImagesLoaded(result) => match result {
                Ok(images) => write!(f, "ImagesLoaded({} images)", images.len()),
                Err(e) => write!(f, "ImagesLoaded(Err({}))", e),
            },
            OrchestratorMessage::ClearImages => write!(f, "ClearImages"),
            OrchestratorMessage::RegionModeSelected(mode) => {
                write!(f, "RegionModeSelected({:?})", mode)
            }
            OrchestratorMessage::ManualFieldChanged(field, _) => {
                write!(f, "ManualFieldChanged({:?})", field)
            }
            OrchestratorMessage::RegionCanvas(message) => write!(f, "RegionCanvas({:?})", message),
            OrchestratorMessage::UndoLastRegion => write!(f, "UndoLastRegion"),
            OrchestratorMessage::ClearDrawnRegions => write!(f, "ClearDrawnRegions"),
            OrchestratorMessage::ToggleDateColumn(value) => {
                write!(f, "ToggleDateColumn({})", value)
            }
            OrchestratorMessage::Process => write!(f, "Process"),
            OrchestratorMessage::ProcessingFinished(result) => {
                write!(f, "ProcessingFinished({:?})", result.is_ok())
            }
            OrchestratorMessage::OutputPathChanged(_) => write!(f, "OutputPathChanged"),
            OrchestratorMessage::SaveSpreadsheet => write!(f, "SaveSpreadsheet"),
            OrchestratorMessage::SpreadsheetSaved(result) => {
                write!(f, "SpreadsheetSaved({:?})", result)
            }
            OrchestratorMessage::RecognizerReady(recognizer) => {
                write!(f, "RecognizerReady({})", recognizer.backend_name())
            }
            OrchestratorMessage::RecognizerFailed(e) => write!(f, "RecognizerFailed({})", e),
            OrchestratorMessage::Reset => write!(f, "Reset"),
        }
    }
}

impl AppOrchestrator {
    pub fn build(settings: UserSettings, exporter: Arc<dyn SpreadsheetExporter>) -> Self {
        let output_path_input = settings.output_file_name.clone();
        let mut orchestrator = Self {
            settings,
            session: SessionState::default(),
            recognizer: None,
            exporter,
            uploads: Vec::new(),
            image_path_input: String::new(),
            output_path_input,
            region_mode: RegionMode::Preset,
            manual_fields: ManualRegionFields::default(),
            drawing_board: RegionDrawingBoard::default(),
            reference_canvas: None,
            regions: Vec::new(),
            region_error: None,
            result: None,
            status: "Initializing recognizer...".to_string(),
        };
        orchestrator.refresh_regions();
        orchestrator
    }

    pub fn get_window_title(&self) -> String {
        global_constants::APPLICATION_TITLE.to_string()
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        log::debug!("[ORCHESTRATOR] Received message: {:?}", message);

        match message {
            OrchestratorMessage::ImagePathChanged(value) => {
                self.image_path_input = value;
            }
            OrchestratorMessage::LoadImages => {
                let paths = split_path_list(&self.image_path_input);
                return self.handle_load_images(paths);
            }
            OrchestratorMessage::FilesDropped(paths) => {
                return self.handle_load_images(paths);
            }
            OrchestratorMessage::ImagesLoaded(result) => {
                self.handle_images_loaded(result);
            }
            OrchestratorMessage::ClearImages => {
                self.handle_clear_images(SessionEvent::ImagesCleared);
            }
            OrchestratorMessage::RegionModeSelected(mode) => {
                self.handle_region_mode_selected(mode);
            }
            OrchestratorMessage::ManualFieldChanged(field, value) => {
                self.handle_manual_field_changed(field, value);
            }
            OrchestratorMessage::RegionCanvas(RegionCanvasMessage::RectangleDrawn(rectangle)) => {
                let accepted = !self.session.is_busy()
                    && self.drawing_board.accept_rectangle(rectangle).is_some();
                if accepted {
                    self.refresh_regions();
                }
            }
            OrchestratorMessage::UndoLastRegion => {
                if !self.session.is_busy() && self.drawing_board.undo_last().is_some() {
                    self.refresh_regions();
                }
            }
            OrchestratorMessage::ClearDrawnRegions => {
                if !self.session.is_busy() {
                    self.drawing_board.clear();
                    self.refresh_regions();
                }
            }
            OrchestratorMessage::ToggleDateColumn(include_date_column) => {
                self.settings.include_date_column = include_date_column;
            }
            OrchestratorMessage::Process => {
                return self.handle_process();
            }
            OrchestratorMessage::ProcessingFinished(result) => {
                self.handle_processing_finished(result);
            }
            OrchestratorMessage::OutputPathChanged(value) => {
                self.output_path_input = value;
            }
            OrchestratorMessage::SaveSpreadsheet => {
                return self.handle_save_spreadsheet();
            }
            OrchestratorMessage::SpreadsheetSaved(result) => {
                self.handle_spreadsheet_saved(result);
            }
            OrchestratorMessage::RecognizerReady(recognizer) => {
                self.handle_recognizer_ready(recognizer);
            }
            OrchestratorMessage::RecognizerFailed(error) => {
                self.handle_recognizer_failed(error);
            }
            OrchestratorMessage::Reset => {
                self.handle_clear_images(SessionEvent::Reset);
            }
        }

        Task::none()
    }

    fn apply_session_event(&mut self, event: SessionEvent) -> bool {
        match self.session.apply(&event) {
            Ok(next) => {
                self.session = next;
                true
            }
            Err(error) => {
                self.status = format!("Error: {}", error);
                false
            }
        }
    }

    fn active_region_source(&self) -> RegionSource {
        match self.region_mode {
            RegionMode::Preset => RegionSource::Preset(self.settings.preset_regions.clone()),
            RegionMode::Manual => RegionSource::Manual(self.manual_fields.clone()),
            RegionMode::Drawn => RegionSource::Drawn(self.drawing_board.rectangles().to_vec()),
        }
    }

    fn refresh_regions(&mut self) {
        match define_regions(&self.active_region_source()) {
            Ok(regions) => {
                self.regions = regions;
                self.region_error = None;
            }
            Err(error) => {
                self.regions.clear();
                self.region_error = Some(error.to_string());
            }
        }

        if let Some(canvas) = self.reference_canvas.as_mut() {
            canvas.set_regions(self.regions.clone());
            canvas.set_drawing_enabled(self.region_mode == RegionMode::Drawn);
        }

        self.apply_session_event(SessionEvent::RegionsUpdated {
            region_count: self.regions.len(),
        });
    }

    fn handle_load_images(&mut self, paths: Vec<PathBuf>) -> Task<OrchestratorMessage> {
        if self.session.is_busy() {
            self.status = "Wait for processing to finish before loading images".to_string();
            return Task::none();
        }

        if paths.is_empty() {
            self.status = "Enter an image file or folder path".to_string();
            return Task::none();
        }

        log::info!("[ORCHESTRATOR] Loading images from {} paths", paths.len());
        self.status = "Loading images...".to_string();

        Task::future(async move {
            match adapters::load_uploaded_images(paths).await {
                Ok(images) => OrchestratorMessage::ImagesLoaded(Ok(images)),
                Err(e) => {
                    log::error!("[ORCHESTRATOR] Failed to load images: {:#}", e);
                    OrchestratorMessage::ImagesLoaded(Err(format!("{:#}", e)))
                }
            }
        })
    }

    fn handle_images_loaded(&mut self, result: Result<Vec<UploadedImage>, String>) {
        let images = match result {
            Ok(images) => images,
            Err(error) => {
                self.status = format!("Failed to load images: {}", error);
                return;
            }
        };

        if images.is_empty() {
            self.status = "No PNG or JPEG images found".to_string();
            return;
        }

        if !self.apply_session_event(SessionEvent::ImagesUploaded {
            has_regions: !self.regions.is_empty(),
        }) {
            return;
        }

        self.reference_canvas = images.iter().find_map(RegionCanvas::build_from_upload);
        if let Some(canvas) = self.reference_canvas.as_mut() {
            canvas.set_regions(self.regions.clone());
            canvas.set_drawing_enabled(self.region_mode == RegionMode::Drawn);
        }

        self.status = format!("Loaded {} images", images.len());
        self.uploads = images;
        self.result = None;
    }

    fn handle_clear_images(&mut self, event: SessionEvent) {
        let is_reset = event == SessionEvent::Reset;
        if !self.apply_session_event(event) {
            return;
        }

        self.uploads.clear();
        self.reference_canvas = None;
        self.result = None;

        if is_reset {
            self.drawing_board.clear();
            self.manual_fields = ManualRegionFields::default();
            self.region_mode = RegionMode::Preset;
            self.refresh_regions();
        }

        self.status = "Ready".to_string();
    }

    fn handle_region_mode_selected(&mut self, mode: RegionMode) {
        if self.session.is_busy() || self.region_mode == mode {
            return;
        }

        log::info!("[ORCHESTRATOR] Region source switched to {}", mode.label());
        self.region_mode = mode;
        self.refresh_regions();
    }

    fn handle_manual_field_changed(&mut self, field: ManualField, value: String) {
        if self.session.is_busy() {
            return;
        }

        match field {
            ManualField::Left => self.manual_fields.left = value,
            ManualField::Top => self.manual_fields.top = value,
            ManualField::Width => self.manual_fields.width = value,
            ManualField::Height => self.manual_fields.height = value,
        }

        if self.region_mode == RegionMode::Manual {
            self.refresh_regions();
        }
    }

    fn handle_process(&mut self) -> Task<OrchestratorMessage> {
        let Some(recognizer) = self.recognizer.clone() else {
            self.status = "Recognizer is not ready yet".to_string();
            return Task::none();
        };

        if !self.apply_session_event(SessionEvent::ProcessRequested) {
            return Task::none();
        }

        let pipeline =
            ExtractionPipeline::build(recognizer, PipelineOptions::from_settings(&self.settings));
        let images = self.uploads.clone();
        let regions = self.regions.clone();

        log::info!(
            "[ORCHESTRATOR] Processing {} images with {} regions",
            images.len(),
            regions.len()
        );
        self.status = format!("Processing {} images...", images.len());
        self.result = None;

        Task::future(async move {
            match pipeline.run(&images, &regions).await {
                Ok(result) => OrchestratorMessage::ProcessingFinished(Ok(result)),
                Err(e) => {
                    log::error!("[ORCHESTRATOR] Extraction failed: {}", e);
                    OrchestratorMessage::ProcessingFinished(Err(e.to_string()))
                }
            }
        })
    }

    fn handle_processing_finished(&mut self, result: Result<ExtractionResult, String>) {
        match result {
            Ok(result) => {
                if !self.apply_session_event(SessionEvent::ProcessingSucceeded) {
                    return;
                }
                self.status = if result.warnings.is_empty() {
                    format!("Ready: extracted {} rows", result.rows.len())
                } else {
                    format!(
                        "Ready: extracted {} rows with {} warnings",
                        result.rows.len(),
                        result.warnings.len()
                    )
                };
                self.result = Some(result);
            }
            Err(error) => {
                if !self.apply_session_event(SessionEvent::ProcessingFailed(error.clone())) {
                    return;
                }
                self.status = format!("Failed: {}", error);
            }
        }
    }

    fn handle_save_spreadsheet(&mut self) -> Task<OrchestratorMessage> {
        let Some(result) = self.result.as_ref() else {
            self.status = "Nothing to save yet, process the images first".to_string();
            return Task::none();
        };

        let bytes = match self.exporter.export(result) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::error!("[ORCHESTRATOR] {}", error);
                self.status = format!("Error: {}", error);
                return Task::none();
            }
        };

        let output_path =
            resolve_output_path(&self.output_path_input, &self.settings.output_file_name);
        log::info!(
            "[ORCHESTRATOR] Saving {} bytes of {} to {:?}",
            bytes.len(),
            global_constants::SPREADSHEET_MIME_TYPE,
            output_path
        );
        self.status = "Saving spreadsheet...".to_string();

        Task::future(async move {
            match write_spreadsheet(&output_path, &bytes).await {
                Ok(()) => OrchestratorMessage::SpreadsheetSaved(Ok(output_path)),
                Err(e) => OrchestratorMessage::SpreadsheetSaved(Err(format!("{:#}", e))),
            }
        })
    }

    fn handle_spreadsheet_saved(&mut self, result: Result<PathBuf, String>) {
        self.status = match result {
            Ok(path) => format!("Ready: saved {}", path.display()),
            Err(error) => {
                log::error!("[ORCHESTRATOR] Failed to save spreadsheet: {}", error);
                format!("Failed to save spreadsheet: {}", error)
            }
        };
    }

    fn handle_recognizer_ready(&mut self, recognizer: Arc<dyn TextRecognizer>) {
        log::info!(
            "[ORCHESTRATOR] {} recognizer ready",
            recognizer.backend_name()
        );
        self.status = format!("Ready ({} recognizer)", recognizer.backend_name());
        self.recognizer = Some(recognizer);
    }

    fn handle_recognizer_failed(&mut self, error: String) {
        log::error!("[ORCHESTRATOR] Recognizer unavailable: {}", error);
        self.status = format!("Error: recognizer unavailable: {}", error);
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);

        let header_section = column![
            text(global_constants::APPLICATION_TITLE).size(28),
            text("Load screenshots, mark regions, extract their text to a spreadsheet")
                .size(14)
                .style(app_theme::muted_text_style),
        ]
        .spacing(6);

        let content = column![
            header_section,
            self.render_upload_section(),
            self.render_region_section(),
            self.render_process_section(),
            self.render_results_section(),
        ]
        .spacing(20)
        .padding(28)
        .width(Length::Fill);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                iced::widget::container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }

    fn render_upload_section(&self) -> Element<'_, OrchestratorMessage> {
        let path_row = row![
            text_input("Image file or folder (separate several with ;)", &self.image_path_input)
                .on_input(OrchestratorMessage::ImagePathChanged)
                .on_submit(OrchestratorMessage::LoadImages)
                .padding(10),
            button(text("Load"))
                .padding([10, 24])
                .style(app_theme::primary_button_style)
                .on_press_maybe(
                    (!self.session.is_busy()).then_some(OrchestratorMessage::LoadImages)
                ),
            button(text("Clear"))
                .padding([10, 18])
                .style(app_theme::secondary_button_style)
                .on_press_maybe(
                    (!self.uploads.is_empty() && !self.session.is_busy())
                        .then_some(OrchestratorMessage::ClearImages)
                ),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let summary = if self.uploads.is_empty() {
            "No images loaded. You can also drop files onto the window.".to_string()
        } else {
            let names: Vec<&str> = self
                .uploads
                .iter()
                .take(5)
                .map(|upload| upload.file_name.as_str())
                .collect();
            let more = self.uploads.len().saturating_sub(names.len());
            if more > 0 {
                format!("{} images: {} and {} more", self.uploads.len(), names.join(", "), more)
            } else {
                format!("{} images: {}", self.uploads.len(), names.join(", "))
            }
        };

        render_section(
            "1. Images",
            column![path_row, text(summary).size(13).style(app_theme::muted_text_style)]
                .spacing(8),
        )
    }

    fn render_region_section(&self) -> Element<'_, OrchestratorMessage> {
        let mode_selector: Element<'_, OrchestratorMessage> = row(
            [RegionMode::Preset, RegionMode::Manual, RegionMode::Drawn]
                .into_iter()
                .map(|mode| {
                    let is_selected = self.region_mode == mode;
                    button(text(mode.label()))
                        .padding([8, 16])
                        .style(move |theme, status| {
                            app_theme::selector_button_style(theme, status, is_selected)
                        })
                        .on_press(OrchestratorMessage::RegionModeSelected(mode))
                        .into()
                }),
        )
        .spacing(8)
        .into();

        let mut body = column![mode_selector].spacing(12);

        match self.region_mode {
            RegionMode::Preset => {
                body = body.push(
                    text(format!(
                        "{} regions from settings",
                        self.settings.preset_regions.len()
                    ))
                    .size(13)
                    .style(app_theme::muted_text_style),
                );
            }
            RegionMode::Manual => {
                body = body.push(self.render_manual_fields());
            }
            RegionMode::Drawn => {
                body = body.push(
                    row![
                        text("Drag on the reference image to add a region")
                            .size(13)
                            .style(app_theme::muted_text_style),
                        Space::new().width(Length::Fill),
                        button(text("Undo"))
                            .padding([6, 14])
                            .style(app_theme::secondary_button_style)
                            .on_press(OrchestratorMessage::UndoLastRegion),
                        button(text("Clear regions"))
                            .padding([6, 14])
                            .style(app_theme::secondary_button_style)
                            .on_press(OrchestratorMessage::ClearDrawnRegions),
                    ]
                    .spacing(8)
                    .align_y(Alignment::Center),
                );
            }
        }

        if let Some(error) = &self.region_error {
            body = body.push(text(error.as_str()).size(13).style(app_theme::warning_text_style));
        }

        body = body.push(self.render_region_list());

        match &self.reference_canvas {
            Some(canvas) => {
                body = body.push(
                    text(format!("Reference: {}", canvas.source_name()))
                        .size(12)
                        .style(app_theme::muted_text_style),
                );
                body = body.push(canvas.render_ui().map(OrchestratorMessage::RegionCanvas));
            }
            None if self.region_mode == RegionMode::Drawn => {
                body = body.push(
                    text("Load images to draw regions on the first one")
                        .size(13)
                        .style(app_theme::warning_text_style),
                );
            }
            None => {}
        }

        render_section("2. Regions", body)
    }

    fn render_manual_fields(&self) -> Element<'_, OrchestratorMessage> {
        row![
            render_coordinate_field("Left", &self.manual_fields.left, ManualField::Left),
            render_coordinate_field("Top", &self.manual_fields.top, ManualField::Top),
            render_coordinate_field("Width", &self.manual_fields.width, ManualField::Width),
            render_coordinate_field("Height", &self.manual_fields.height, ManualField::Height),
        ]
        .spacing(12)
        .into()
    }

    fn render_region_list(&self) -> Element<'_, OrchestratorMessage> {
        if self.regions.is_empty() {
            return text("No regions defined").size(13).into();
        }

        Column::with_children(self.regions.iter().enumerate().map(|(index, region)| {
            let (left, top, right, bottom) = region.crop_box();
            text(format!(
                "{} {}: {} (box {}, {}, {}, {})",
                global_constants::REGION_HEADER_PREFIX,
                index + 1,
                region,
                left,
                top,
                right,
                bottom
            ))
            .size(13)
            .into()
        }))
        .spacing(2)
        .into()
    }

    fn render_process_section(&self) -> Element<'_, OrchestratorMessage> {
        let can_process = self.session.can_process() && self.recognizer.is_some();

        let controls = row![
            checkbox(self.settings.include_date_column)
                .on_toggle(OrchestratorMessage::ToggleDateColumn),
            text("Add date column from file names").size(14),
            Space::new().width(Length::Fill),
            button(text("Reset"))
                .padding([10, 18])
                .style(app_theme::secondary_button_style)
                .on_press_maybe((!self.session.is_busy()).then_some(OrchestratorMessage::Reset)),
            button(text("Process screenshots").size(16))
                .padding([12, 32])
                .style(app_theme::primary_button_style)
                .on_press_maybe(can_process.then_some(OrchestratorMessage::Process)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        render_section(
            "3. Extract",
            column![controls, self.render_status_indicator()].spacing(10),
        )
    }

    fn render_status_indicator(&self) -> Element<'_, OrchestratorMessage> {
        let status_color = app_theme::session_status_color(&self.session);

        row![
            text("●")
                .size(12)
                .style(move |_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(status_color),
                }),
            text(format!("{} · {}", self.session, self.status))
                .size(13)
                .style(app_theme::muted_text_style),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    fn render_results_section(&self) -> Element<'_, OrchestratorMessage> {
        let Some(result) = &self.result else {
            return Space::new().height(Length::Fixed(0.0)).into();
        };

        let mut table = column![render_table_row(result.header(), true)].spacing(2);
        for cells in result.table_rows() {
            table = table.push(render_table_row(cells, false));
        }

        let mut body = column![scrollable(table).height(Length::Fixed(260.0))].spacing(10);

        for warning in &result.warnings {
            body = body.push(
                text(warning.to_string())
                    .size(13)
                    .style(app_theme::warning_text_style),
            );
        }

        let save_row = row![
            text_input(global_constants::DEFAULT_OUTPUT_FILE_NAME, &self.output_path_input)
                .on_input(OrchestratorMessage::OutputPathChanged)
                .on_submit(OrchestratorMessage::SaveSpreadsheet)
                .padding(10),
            button(text("Save spreadsheet"))
                .padding([10, 24])
                .style(app_theme::primary_button_style)
                .on_press(OrchestratorMessage::SaveSpreadsheet),
        ]
        .spacing(10)
        .align_y(Alignment::Center);
        body = body.push(save_row);

        render_section("4. Results", body)
    }
}

fn render_section<'a>(
    title: &'a str,
    content: Column<'a, OrchestratorMessage>,
) -> Element<'a, OrchestratorMessage> {
    let section_content = container(content)
        .padding([12, 16])
        .width(Length::Fill)
        .style(|_theme| iced::widget::container::Style {
            background: Some(Background::Color(Color::from_rgba(0.2, 0.2, 0.2, 0.3))),
            border: iced::Border {
                color: Color::from_rgba(0.4, 0.4, 0.4, 0.3),
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        });

    column![text(title).size(16), section_content]
        .spacing(8)
        .width(Length::Fill)
        .into()
}

fn render_coordinate_field<'a>(
    label: &'a str,
    value: &'a str,
    field: ManualField,
) -> Element<'a, OrchestratorMessage> {
    column![
        text(label).size(12),
        text_input("0", value)
            .on_input(move |value| OrchestratorMessage::ManualFieldChanged(field, value))
            .padding(8)
            .width(Length::Fixed(110.0)),
    ]
    .spacing(4)
    .into()
}

fn render_table_row<'a>(cells: Vec<String>, is_header: bool) -> Element<'a, OrchestratorMessage> {
    row(cells.into_iter().map(|cell| {
        let cell_text = text(cell).size(if is_header { 14 } else { 13 });
        container(cell_text)
            .width(Length::Fixed(160.0))
            .padding([2, 6])
            .into()
    }))
    .into()
}

/// Splits the path field on `;` and newlines, dropping blanks.
pub fn split_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split([';', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Output file for the spreadsheet: a blank entry or a directory gets the
/// default file name, and a missing extension becomes `.xlsx`.
pub fn resolve_output_path(raw: &str, default_file_name: &str) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PathBuf::from(default_file_name);
    }

    let path = PathBuf::from(trimmed);
    if trimmed.ends_with(std::path::MAIN_SEPARATOR) || trimmed.ends_with('/') || path.is_dir() {
        return path.join(default_file_name);
    }

    if path.extension().is_none() {
        return path.with_extension("xlsx");
    }

    path
}

async fn write_spreadsheet(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }

    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
