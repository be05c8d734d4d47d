use crate::gui::logging::{GuiLogLayer, LogEntry};
use crate::types::CompositeMode;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sysinfo;
use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

static LOGGING_INIT: OnceCell<()> = OnceCell::new();

pub fn init_gui_logging() {
    LOGGING_INIT.get_or_init(|| {
        let gui_layer = GuiLogLayer::new();

        // Keep eframe/winit TRACE chatter out of the panel.
        let filter = EnvFilter::new("trace")
            .add_directive("eframe=info".parse().unwrap())
            .add_directive("winit=info".parse().unwrap());

        let subscriber = Registry::default().with(gui_layer).with(filter);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

pub struct FespriteGui {
    // Input parameters
    pub input_dir: PathBuf,
    pub head: String,
    pub body: String,
    pub output_path: Option<PathBuf>,
    pub output_dir_path: Option<PathBuf>,

    // Choices loaded from the path tables
    pub head_choices: Vec<String>,
    pub body_choices: Vec<String>,
    pub tables_loaded: bool,

    // Compositing parameters
    pub mode: CompositeMode,
    pub alpha: bool,
    pub sidecar: bool,
    pub offset_x: String,
    pub offset_y: String,

    // Options
    pub enable_logging: bool,
    pub batch_mode: bool,
    pub min_log_level: Level,

    // Status
    pub status_message: String,
    pub is_processing: bool,
    pub processing_start_time: Option<Instant>,
    pub last_processing_duration: Option<Duration>,
    pub last_output: Option<PathBuf>,

    // Log messages for the central panel - thread-safe
    pub log_messages: Arc<Mutex<Vec<LogEntry>>>,

    // Receiver for completion notification from background processing
    pub completion_receiver: Option<std::sync::mpsc::Receiver<String>>,

    // System monitoring
    pub cpu_usage: f32,
    pub memory_usage_mb: f64,
    pub total_memory_mb: f64,
    pub system_monitor: Option<sysinfo::System>,
    pub last_system_update: Option<Instant>,
}

impl Default for FespriteGui {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs"),
            head: String::new(),
            body: String::new(),
            output_path: None,
            output_dir_path: None,
            head_choices: Vec::new(),
            body_choices: Vec::new(),
            tables_loaded: false,
            mode: CompositeMode::Idle,
            alpha: true,
            sidecar: false,
            offset_x: "0".to_string(),
            offset_y: "0".to_string(),
            enable_logging: false,
            batch_mode: false,
            min_log_level: Level::INFO,
            status_message: "Ready".to_string(),
            is_processing: false,
            processing_start_time: None,
            last_processing_duration: None,
            last_output: None,
            log_messages: Arc::new(Mutex::new(Vec::new())),
            completion_receiver: None,
            cpu_usage: 0.0,
            memory_usage_mb: 0.0,
            total_memory_mb: 0.0,
            system_monitor: None,
            last_system_update: None,
        }
    }
}

impl FespriteGui {
    pub fn save_logs_to_file(&self) -> Result<(), Box<dyn std::error::Error>> {
        let logs = self
            .log_messages
            .lock()
            .map_err(|e| format!("Failed to lock logs: {}", e))?;

        if logs.is_empty() {
            return Err("No logs to save".into());
        }

        let filtered_logs: Vec<&LogEntry> = logs
            .iter()
            .filter(|entry| {
                if self.min_log_level == Level::TRACE {
                    true
                } else {
                    entry.level == self.min_log_level
                }
            })
            .collect();

        if filtered_logs.is_empty() {
            return Err("No logs match the current filter level".into());
        }

        if let Some(save_path) = rfd::FileDialog::new()
            .add_filter("FESPRITE Log files", &["fesplog"])
            .set_file_name("fesprite_log.fesplog")
            .save_file()
        {
            let mut log_content = String::new();
            log_content.push_str("=== FESPRITE Log File ===\n");
            log_content.push_str(&format!("Generated: {}\n", chrono::Utc::now().to_rfc3339()));
            log_content.push_str(&format!(
                "Filter Level: {}\n",
                match self.min_log_level {
                    Level::ERROR => "ERROR",
                    Level::WARN => "WARN",
                    Level::INFO => "INFO",
                    Level::DEBUG => "DEBUG",
                    Level::TRACE => "ALL",
                }
            ));
            log_content.push_str(&format!("Total Logs: {}\n", filtered_logs.len()));
            log_content.push_str("=========================\n\n");

            for entry in &filtered_logs {
                let level_str = match entry.level {
                    Level::ERROR => "ERROR",
                    Level::WARN => "WARN",
                    Level::INFO => "INFO",
                    Level::DEBUG => "DEBUG",
                    Level::TRACE => "TRACE",
                };

                log_content.push_str(&format!(
                    "[{}] {} {}: {}\n",
                    entry.timestamp, level_str, entry.target, entry.message
                ));
            }

            fs::write(&save_path, log_content)?;

            tracing::info!(
                "Filtered logs saved to: {:?} ({} entries)",
                save_path,
                filtered_logs.len()
            );

            Ok(())
        } else {
            Err("No save location selected".into())
        }
    }

    pub fn save_preset(&self) -> Result<(), Box<dyn std::error::Error>> {
        #[derive(Serialize)]
        struct FespritePreset {
            mode: CompositeMode,
            alpha: bool,
            sidecar: bool,
            offset_x: String,
            offset_y: String,
            batch_mode: bool,
            min_log_level: String, // Store as string
        }

        let preset = FespritePreset {
            mode: self.mode,
            alpha: self.alpha,
            sidecar: self.sidecar,
            offset_x: self.offset_x.clone(),
            offset_y: self.offset_y.clone(),
            batch_mode: self.batch_mode,
            min_log_level: self.min_log_level.to_string(),
        };

        if let Some(save_path) = rfd::FileDialog::new()
            .add_filter("FESPRITE Preset files", &["fesprite"])
            .set_file_name("fesprite_preset.fesprite")
            .save_file()
        {
            let mut preset_content = String::new();
            preset_content.push_str("// ==========================================\n");
            preset_content.push_str("// FESPRITE Configuration Preset\n");
            preset_content.push_str("// ==========================================\n");
            preset_content
                .push_str("// Program: FESPRITE - FE 3DS Map Sprite Compositor\n");
            preset_content.push_str(&format!("// Version: {}\n", env!("CARGO_PKG_VERSION")));
            preset_content.push_str(&format!(
                "// Generated: {}\n",
                chrono::Utc::now().to_rfc3339()
            ));
            preset_content.push_str("// Note: Sheet names and paths are not included in presets\n");
            preset_content.push_str("// ==========================================\n\n");

            let json = serde_json::to_string_pretty(&preset)?;
            preset_content.push_str(&json);

            fs::write(&save_path, preset_content)?;

            tracing::info!("Preset saved to: {:?}", save_path);
            Ok(())
        } else {
            Err("No save location selected".into())
        }
    }

    pub fn load_preset(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(load_path) = rfd::FileDialog::new()
            .add_filter("FESPRITE Preset files", &["fesprite"])
            .pick_file()
        {
            let content = fs::read_to_string(&load_path)?;

            // Skip the commented header by finding the first '{' character
            let json_start = content
                .find('{')
                .ok_or("Invalid preset file: no JSON content found")?;
            let json = &content[json_start..];

            #[derive(Deserialize)]
            struct FespritePreset {
                mode: CompositeMode,
                alpha: bool,
                sidecar: bool,
                offset_x: String,
                offset_y: String,
                batch_mode: bool,
                min_log_level: String, // Load as string
            }

            let preset: FespritePreset = serde_json::from_str(json)?;

            let min_log_level = match preset.min_log_level.as_str() {
                "ERROR" => Level::ERROR,
                "WARN" => Level::WARN,
                "INFO" => Level::INFO,
                "DEBUG" => Level::DEBUG,
                "TRACE" => Level::TRACE,
                _ => Level::INFO,
            };

            self.mode = preset.mode;
            self.alpha = preset.alpha;
            self.sidecar = preset.sidecar;
            self.offset_x = preset.offset_x;
            self.offset_y = preset.offset_y;
            self.batch_mode = preset.batch_mode;
            self.min_log_level = min_log_level;

            tracing::info!("Preset loaded from: {:?}", load_path);
            Ok(())
        } else {
            Err("No preset file selected".into())
        }
    }

    pub fn generate_cli_command(&self) -> String {
        let mut cmd = String::from("cargo run --release --bin fesprite --");

        cmd.push_str(&format!(" --input-dir {:?}", self.input_dir));

        if !self.head.is_empty() {
            cmd.push_str(&format!(" --head {}", self.head));
        }

        // Single and batch flags are mutually exclusive on the CLI too
        if self.batch_mode {
            cmd.push_str(" --batch");
            if let Some(output_dir) = &self.output_dir_path {
                cmd.push_str(&format!(" --output-dir {:?}", output_dir));
            }
        } else {
            if !self.body.is_empty() {
                cmd.push_str(&format!(" --body {}", self.body));
            }
            if let Some(output_path) = &self.output_path {
                cmd.push_str(&format!(" --output {:?}", output_path));
            }
        }

        cmd.push_str(&format!(" --mode {}", self.mode));
        if !self.alpha {
            cmd.push_str(" --no-alpha");
        }
        if self.sidecar {
            cmd.push_str(" --sidecar");
        }

        let x = self.offset_x.trim();
        let y = self.offset_y.trim();
        if !(x.is_empty() && y.is_empty()) && !(x == "0" && y == "0") {
            cmd.push_str(&format!(" --offset {},{}", x, y));
        }

        // we always want to log
        cmd.push_str(" --log");

        cmd
    }

    /// Update system statistics (CPU and memory usage)
    pub fn update_system_stats(&mut self) {
        // Only update every 2 seconds to avoid excessive system calls
        let now = Instant::now();
        if let Some(last_update) = self.last_system_update {
            if now.duration_since(last_update).as_secs() < 2 {
                return;
            }
        }

        if self.system_monitor.is_none() {
            self.system_monitor = Some(sysinfo::System::new_all());
        }

        if let Some(ref mut sys) = self.system_monitor {
            sys.refresh_all();
            self.cpu_usage = sys.global_cpu_usage();
            self.memory_usage_mb = sys.used_memory() as f64 / 1024.0 / 1024.0;
            self.total_memory_mb = sys.total_memory() as f64 / 1024.0 / 1024.0;
        }

        self.last_system_update = Some(now);
    }
}
