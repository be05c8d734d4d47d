use super::logging::GuiLogLayer;
use super::models::{FespriteGui, init_gui_logging};
use crate::api;
use crate::core::params::CompositeParams;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

/// GUI-specific errors
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Invalid offset: {x},{y}. Both fields must be integers")]
    InvalidOffset { x: String, y: String },

    #[error("No {what} selected")]
    MissingSelection { what: &'static str },

    #[error("Error creating output directory: {0}")]
    OutputDirError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data table error: {0}")]
    Data(#[from] crate::io::DataError),
}

impl FespriteGui {
    pub fn select_input_directory(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            self.input_dir = path;
            info!("Selected input directory: {:?}", self.input_dir);
            self.refresh_tables();
        }
    }

    /// Reload the head/body choice lists from the path tables.
    pub fn refresh_tables(&mut self) {
        self.head_choices = match crate::io::data::load_head_paths(&self.input_dir) {
            Ok(table) => table.keys().cloned().collect(),
            Err(e) => {
                warn!("Could not load head table: {}", e);
                Vec::new()
            }
        };
        self.body_choices = match crate::io::data::load_body_paths(&self.input_dir) {
            Ok(table) => table.keys().cloned().collect(),
            Err(e) => {
                warn!("Could not load body table: {}", e);
                Vec::new()
            }
        };
        self.tables_loaded = true;

        if !self.head_choices.contains(&self.head) {
            self.head.clear();
        }
        if !self.body_choices.contains(&self.body) {
            self.body.clear();
        }
        info!(
            "Loaded {} head(s) and {} body(ies) from {:?}",
            self.head_choices.len(),
            self.body_choices.len(),
            self.input_dir
        );
    }

    /// Regenerate the path tables from the sheet directories, then reload.
    pub fn rescan_sheets(&mut self) {
        match api::scan_sheets(&self.input_dir) {
            Ok((heads, bodies)) => {
                info!("Registered {} head sheet(s) and {} body sheet(s)", heads, bodies);
            }
            Err(e) => {
                error!("Scan failed: {}", e);
            }
        }
        self.refresh_tables();
    }

    fn path_without_extension(path: &PathBuf) -> PathBuf {
        if let Some(file_name) = path.file_name().and_then(|s| s.to_str()) {
            if let Some(index) = file_name.find('.') {
                let prefix = &file_name[..index];
                if let Some(parent) = path.parent() {
                    return parent.join(prefix);
                } else {
                    return PathBuf::from(prefix);
                }
            }
        }
        path.to_path_buf()
    }

    pub fn select_output_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG images", &["png"])
            .save_file()
        {
            // Output sheets are always PNG; normalize whatever was typed.
            let path = Self::path_without_extension(&path).with_extension("png");
            self.output_path = Some(path);
            info!(
                "Selected output file: {:?}",
                self.output_path.as_ref().unwrap()
            );
            trace!("Output path configured for single pair compositing");
        }
    }

    pub fn select_output_directory(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            self.output_dir_path = Some(path);
            info!(
                "Selected output directory: {:?}",
                self.output_dir_path.as_ref().unwrap()
            );
            trace!("Output directory configured for batch compositing");
        }
    }

    fn parse_offset_fields(&self) -> Result<(i64, i64), GuiError> {
        let invalid = || GuiError::InvalidOffset {
            x: self.offset_x.clone(),
            y: self.offset_y.clone(),
        };
        let x = self.offset_x.trim();
        let y = self.offset_y.trim();
        let x = if x.is_empty() { 0 } else { x.parse().map_err(|_| invalid())? };
        let y = if y.is_empty() { 0 } else { y.parse().map_err(|_| invalid())? };
        Ok((x, y))
    }

    fn composite_params(&self) -> Result<CompositeParams, GuiError> {
        Ok(CompositeParams {
            mode: self.mode,
            alpha: self.alpha,
            offset: self.parse_offset_fields()?,
            sidecar: self.sidecar,
        })
    }

    pub fn process_files(&mut self) {
        if self.is_processing {
            debug!("Processing already in progress, ignoring request");
            return;
        }

        trace!("Starting compositing");
        self.is_processing = true;
        self.processing_start_time = Some(Instant::now());
        self.last_processing_duration = None;
        self.last_output = if self.batch_mode {
            None
        } else {
            self.output_path.clone()
        };

        // Always initialize logging for error messages to appear in GUI
        init_gui_logging();
        info!("Compositing started");

        // Clone all necessary parameters for the background thread
        let input_dir = self.input_dir.clone();
        let head = self.head.clone();
        let body = self.body.clone();
        let output_path = self.output_path.clone();
        let output_dir_path = self.output_dir_path.clone();
        let mode = self.mode;
        let alpha = self.alpha;
        let sidecar = self.sidecar;
        let offset_x = self.offset_x.clone();
        let offset_y = self.offset_y.clone();
        let batch_mode = self.batch_mode;
        let log_enabled = self.enable_logging;
        let log_messages = self.log_messages.clone();
        let (tx, rx) = std::sync::mpsc::channel();

        debug!("Background compositing parameters:");
        debug!("  Batch mode: {}", batch_mode);
        debug!("  Mode: {:?}", mode);
        debug!("  Alpha: {}", alpha);
        debug!("  Offset: {},{}", offset_x, offset_y);

        std::thread::spawn(move || {
            // Always set up tracing subscriber for this thread so messages
            // appear in the GUI (ignored if one is already installed).
            let subscriber = Registry::default().with(GuiLogLayer::new());
            let _ = tracing::subscriber::set_global_default(subscriber);

            let mut twin = FespriteGui {
                input_dir,
                head,
                body,
                output_path,
                output_dir_path,
                mode,
                alpha,
                sidecar,
                offset_x,
                offset_y,
                enable_logging: log_enabled,
                batch_mode,
                is_processing: true,
                log_messages,
                ..FespriteGui::default()
            };
            trace!("Background compositing thread started");
            let result = twin.process_files_inner();
            let msg = match result {
                Ok(m) => m,
                Err(e) => {
                    error!("Compositing cancelled: {}", e);
                    format!("Error: {}", e)
                }
            };
            let _ = tx.send(msg);
        });

        // Store the receiver for completion notification
        self.completion_receiver = Some(rx);
        info!("Compositing started in background thread");
    }

    // The actual compositing logic, run on the background thread
    pub fn process_files_inner(&mut self) -> Result<String, String> {
        let batch_mode = self.batch_mode;
        debug!(
            "Compositing mode: {}",
            if batch_mode { "Batch" } else { "Single pair" }
        );

        if self.head.is_empty() {
            error!("A head sheet must be selected");
            return Err(GuiError::MissingSelection { what: "head sheet" }.to_string());
        }
        let params = self.composite_params().map_err(|e| {
            error!("{}", e);
            e.to_string()
        })?;

        // Add a separator once validation passes
        let separator = crate::gui::logging::LogEntry::new(
            tracing::Level::INFO,
            "--- Compositing Started ---".to_string(),
            "gui".to_string(),
        );
        if let Ok(mut logs) = self.log_messages.lock() {
            logs.push(separator);
        }

        if batch_mode {
            let Some(output_dir) = self.output_dir_path.clone() else {
                error!("An output directory is required for batch compositing");
                return Err(GuiError::MissingSelection {
                    what: "output directory",
                }
                .to_string());
            };

            if let Err(e) = std::fs::create_dir_all(&output_dir) {
                error!("Error creating output directory: {}", e);
                return Err(GuiError::OutputDirError(e.to_string()).to_string());
            }

            info!("Starting batch compositing for head: {}", self.head);
            info!("Output directory: {:?}", output_dir);

            match api::composite_directory_to_path(
                &self.input_dir,
                &self.head,
                &output_dir,
                &params,
                true,
            ) {
                Ok(report) => {
                    info!("Batch compositing complete!");
                    info!("Processed: {}", report.processed);
                    info!("Skipped: {}", report.skipped);
                    info!("Errors: {}", report.errors);
                    Ok(format!(
                        "Batch compositing complete! Processed: {}, Skipped: {}, Errors: {}",
                        report.processed, report.skipped, report.errors
                    ))
                }
                Err(e) => {
                    error!("Batch compositing failed: {}", e);
                    Err(format!("Batch compositing failed: {}", e))
                }
            }
        } else {
            if self.body.is_empty() {
                error!("A body sheet must be selected");
                return Err(GuiError::MissingSelection { what: "body sheet" }.to_string());
            }
            let Some(output) = self.output_path.clone() else {
                error!("An output file is required");
                return Err(GuiError::MissingSelection { what: "output file" }.to_string());
            };

            trace!("Compositing {} + {}", self.head, self.body);
            match api::composite_to_path(&self.input_dir, &self.head, &self.body, &params, &output)
            {
                Ok(()) => {
                    info!(
                        "Successfully composited: {} + {} -> {:?}\n",
                        self.head, self.body, output
                    );
                    Ok(format!(
                        "Successfully composited: {} + {} -> {:?}\n",
                        self.head, self.body, output
                    ))
                }
                Err(e) => {
                    error!("Error compositing pair: {}", e);
                    Err(format!("Error compositing pair: {}", e))
                }
            }
        }
    }
}
