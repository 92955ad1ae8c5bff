use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Pipeline stage producing the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Critic,
    Refiner,
    Evaluator,
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Critic => "CRITIC",
            Stage::Refiner => "REFINER",
            Stage::Evaluator => "EVALUATOR",
        }
    }

    fn short(&self) -> &'static str {
        match self {
            Stage::Critic => "C",
            Stage::Refiner => "R",
            Stage::Evaluator => "E",
        }
    }
}

/// Structured log events for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    PipelineStarted {
        correlation_id: String,
        role: String,
        prompt_preview: String,
    },
    StageStarted {
        correlation_id: String,
        stage: Stage,
    },
    StageCompleted {
        correlation_id: String,
        stage: Stage,
        confidence: f64,
        duration_secs: f64,
    },
    StageFailed {
        correlation_id: String,
        stage: Stage,
        error: String,
    },
    /// Evaluator failure that the pipeline absorbs instead of aborting
    StageDegraded {
        correlation_id: String,
        stage: Stage,
        error: String,
    },
    PipelineCompleted {
        correlation_id: String,
        success: bool,
        duration_secs: f64,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for pipeline events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON lines
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::PipelineStarted {
                role,
                prompt_preview,
                correlation_id,
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} {} {}",
                    "promptforge".bold().bright_white(),
                    format!("[{}]", role).bright_blue(),
                    correlation_id.dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "Prompt:".dimmed(),
                    truncate(prompt_preview, 70).dimmed()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::StageStarted { stage, .. } => {
                let label = match stage {
                    Stage::Critic => stage.label().bright_magenta(),
                    Stage::Refiner => stage.label().bright_cyan(),
                    Stage::Evaluator => stage.label().bright_yellow(),
                };
                let _ = writeln!(stderr, "  {} {}", "▶".bright_blue(), label.bold());
            }
            LogEvent::StageCompleted {
                confidence,
                duration_secs,
                ..
            } => {
                let _ = writeln!(
                    stderr,
                    "    {} Done (confidence {:.0}%, {:.1}s)",
                    "✓".bright_green(),
                    confidence * 100.0,
                    duration_secs
                );
            }
            LogEvent::StageFailed { error, .. } => {
                let _ = writeln!(stderr, "    {} {}", "✗".bright_red(), error.bright_red());
            }
            LogEvent::StageDegraded { error, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Degraded: {}",
                    "⚠".bright_yellow(),
                    error.bright_yellow()
                );
            }
            LogEvent::PipelineCompleted {
                success,
                duration_secs,
                ..
            } => {
                let _ = writeln!(stderr);
                if *success {
                    let _ = writeln!(
                        stderr,
                        "{} Pipeline completed ({:.1}s)",
                        "✓".bright_green(),
                        duration_secs
                    );
                } else {
                    let _ = writeln!(
                        stderr,
                        "{} Pipeline failed ({:.1}s)",
                        "✗".bright_red(),
                        duration_secs
                    );
                }
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::PipelineStarted { role, .. } => {
                format!("[{}] pipeline:start role={}", timestamp, role)
            }
            LogEvent::StageStarted { stage, .. } => {
                format!("[{}] {}:start", timestamp, stage.short())
            }
            LogEvent::StageCompleted {
                stage,
                confidence,
                duration_secs,
                ..
            } => format!(
                "[{}] {}:done conf={:.2} {:.1}s",
                timestamp,
                stage.short(),
                confidence,
                duration_secs
            ),
            LogEvent::StageFailed { stage, error, .. } => {
                format!("[{}] {}:fail {}", timestamp, stage.short(), error)
            }
            LogEvent::StageDegraded { stage, error, .. } => {
                format!("[{}] {}:degraded {}", timestamp, stage.short(), error)
            }
            LogEvent::PipelineCompleted {
                success,
                duration_secs,
                ..
            } => format!(
                "[{}] pipeline:{} {:.1}s",
                timestamp,
                if *success { "done" } else { "fail" },
                duration_secs
            ),
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let prefix: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", prefix)
    } else {
        s.to_string()
    }
}
