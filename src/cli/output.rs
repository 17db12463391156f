//! Output formatting helpers for CLI commands

use crate::console::{Console, Generation, QueryCache};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// Longest prompt shown in a table cell, in characters.
const PROMPT_COLUMN_CHARS: usize = 48;

/// View model for one history entry
#[derive(Debug, Clone, Serialize)]
pub struct GenerationView {
    pub index: usize,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub iterative_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inference: Option<f64>,
    pub image_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

impl GenerationView {
    pub fn new(index: usize, generation: &Generation) -> Self {
        Self {
            index,
            prompt: generation.prompt.clone(),
            width: generation.settings.width,
            height: generation.settings.height,
            steps: generation.settings.steps,
            iterative_mode: generation.settings.iterative_mode,
            inference: generation.result.inference_secs(),
            // Decoded size without decoding: 3 bytes per 4 base64 chars
            image_bytes: generation.result.b64_json.trim_end_matches('=').len() * 3 / 4,
            saved_to: None,
        }
    }

    pub fn with_saved_to(mut self, path: Option<PathBuf>) -> Self {
        self.saved_to = path;
        self
    }
}

fn seconds(value: Option<f64>) -> String {
    value
        .map(|s| format!("{:.2}s", s))
        .unwrap_or_else(|| "-".to_string())
}

fn preview(prompt: &str) -> String {
    match prompt.char_indices().nth(PROMPT_COLUMN_CHARS) {
        Some((idx, _)) => format!("{}…", &prompt[..idx]),
        None => prompt.to_string(),
    }
}

/// Format the session history as a table, marking the selected entry
pub fn format_history_table(entries: &[GenerationView], active: Option<usize>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "#", "Prompt", "Size", "Steps", "Consistent", "Inference"]);

    for entry in entries {
        let marker = if Some(entry.index) == active {
            "▶".green().to_string()
        } else {
            String::new()
        };
        let consistent = if entry.iterative_mode {
            "yes".cyan().to_string()
        } else {
            "no".to_string()
        };

        table.add_row(vec![
            Cell::new(marker),
            Cell::new(entry.index),
            Cell::new(preview(&entry.prompt)),
            Cell::new(format!("{}x{}", entry.width, entry.height)),
            Cell::new(entry.steps),
            Cell::new(consistent),
            Cell::new(seconds(entry.inference)),
        ]);
    }

    table.to_string()
}

/// Format history as JSON
pub fn format_history_json(entries: &[GenerationView], active: Option<usize>) -> String {
    serde_json::to_string_pretty(&json!({
        "active": active,
        "generations": entries
    }))
    .unwrap_or_default()
}

/// One-line summary of a freshly selected generation
pub fn format_generation_line(view: &GenerationView) -> String {
    let mut line = format!(
        "{} #{} {}x{} · {} steps · {} · {} bytes",
        "✓".green(),
        view.index,
        view.width,
        view.height,
        view.steps,
        seconds(view.inference),
        view.image_bytes,
    );
    if let Some(path) = &view.saved_to {
        line.push_str(&format!("\n  saved to {}", path.display()));
    }
    line
}

/// Format a single generation as JSON
pub fn format_generation_json(view: &GenerationView) -> String {
    serde_json::to_string_pretty(view).unwrap_or_default()
}

/// Current form and gate state of a console
pub fn format_status<C: QueryCache>(console: &Console<C>) -> String {
    let form = console.form();
    let state = if console.is_fetching() {
        "generating".yellow().to_string()
    } else if console.can_generate() {
        "ready".green().to_string()
    } else {
        "waiting for prompt".dimmed().to_string()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec![Cell::new("State"), Cell::new(state)]);
    table.add_row(vec![Cell::new("Prompt"), Cell::new(preview(&form.prompt))]);
    table.add_row(vec![
        Cell::new("Size"),
        Cell::new(format!("{}x{}", form.width, form.height)),
    ]);
    table.add_row(vec![Cell::new("Steps"), Cell::new(form.steps)]);
    table.add_row(vec![
        Cell::new("Consistency"),
        Cell::new(if form.iterative_mode { "on" } else { "off" }),
    ]);
    table.add_row(vec![
        Cell::new("History"),
        Cell::new(format!(
            "{} (selected: {})",
            console.history().len(),
            console
                .active_index()
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string())
        )),
    ]);
    table.add_row(vec![
        Cell::new("Enlarged"),
        Cell::new(if console.is_enlarged() { "yes" } else { "no" }),
    ]);

    table.to_string()
}

/// Collect views for every history entry
pub fn history_views<C: QueryCache>(console: &Console<C>) -> Vec<GenerationView> {
    console
        .history()
        .iter()
        .enumerate()
        .map(|(i, g)| GenerationView::new(i, g))
        .collect()
}
