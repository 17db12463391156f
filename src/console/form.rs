//! Form inputs edited by the user between generations.

use super::history::Generation;
use crate::api::types::{ImageConfig, ImageSettings, DEFAULT_HEIGHT, DEFAULT_STEPS, DEFAULT_WIDTH};

/// Current prompt and image parameters.
///
/// Values are not range-checked here; the proxy is the authority on bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    /// Consistency mode: reuse the fixed seed across generations
    pub iterative_mode: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            steps: DEFAULT_STEPS,
            iterative_mode: false,
        }
    }
}

impl FormState {
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    pub fn settings(&self) -> ImageSettings {
        ImageSettings {
            width: self.width,
            height: self.height,
            steps: self.steps,
            iterative_mode: self.iterative_mode,
        }
    }

    /// Snapshot of the form as a request; also the query cache key.
    pub fn to_config(&self) -> ImageConfig {
        ImageConfig {
            prompt: self.prompt.clone(),
            settings: self.settings(),
        }
    }

    /// Overwrite every field from a history entry.
    pub fn load(&mut self, generation: &Generation) {
        self.prompt = generation.prompt.clone();
        self.width = generation.settings.width;
        self.height = generation.settings.height;
        self.steps = generation.settings.steps;
        self.iterative_mode = generation.settings.iterative_mode;
    }
}
