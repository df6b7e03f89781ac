// src/page.rs
//! Page elements the trigger talks to.
//!
//! The hosting page hands element handles to the trigger instead of the
//! trigger looking them up globally. `Page::bind` resolves the three
//! elements once and fails when any of them is missing.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const INPUT_ID: &str = "vkIdInput";
pub const BUTTON_ID: &str = "analyzeBtn";
pub const OUTPUT_ID: &str = "result";

pub trait TextInput: Send + Sync {
    fn value(&self) -> String;
}

pub trait TextOutput: Send + Sync {
    /// Replace the whole text content.
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
}

/// Blocking user prompt.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

pub trait Button: Send + Sync {
    fn on_click(&self, handler: ClickHandler);
}

pub trait Document: Send + Sync {
    fn input(&self, id: &str) -> Option<Arc<dyn TextInput>>;
    fn button(&self, id: &str) -> Option<Arc<dyn Button>>;
    fn output(&self, id: &str) -> Option<Arc<dyn TextOutput>>;
}

#[derive(Clone)]
pub struct Page {
    pub input: Arc<dyn TextInput>,
    pub button: Arc<dyn Button>,
    pub output: Arc<dyn TextOutput>,
    pub alert: Arc<dyn Alert>,
}

impl Page {
    pub fn bind(document: &dyn Document, alert: Arc<dyn Alert>) -> Result<Self> {
        let input = document
            .input(INPUT_ID)
            .ok_or_else(|| missing_element(INPUT_ID))?;
        let button = document
            .button(BUTTON_ID)
            .ok_or_else(|| missing_element(BUTTON_ID))?;
        let output = document
            .output(OUTPUT_ID)
            .ok_or_else(|| missing_element(OUTPUT_ID))?;

        Ok(Self {
            input,
            button,
            output,
            alert,
        })
    }
}

fn missing_element(id: &str) -> anyhow::Error {
    anyhow!("Element not found on page: #{}", id)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ===== In-memory elements =====

#[derive(Default)]
pub struct MemoryInput {
    value: Mutex<String>,
}

impl MemoryInput {
    pub fn new(value: &str) -> Self {
        Self {
            value: Mutex::new(value.to_string()),
        }
    }

    pub fn set_value(&self, value: &str) {
        *lock(&self.value) = value.to_string();
    }
}

impl TextInput for MemoryInput {
    fn value(&self) -> String {
        lock(&self.value).clone()
    }
}

/// Output area that also remembers every text it was given.
#[derive(Default)]
pub struct MemoryOutput {
    history: Mutex<Vec<String>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        lock(&self.history).clone()
    }
}

impl TextOutput for MemoryOutput {
    fn set_text(&self, text: &str) {
        lock(&self.history).push(text.to_string());
    }

    fn text(&self) -> String {
        lock(&self.history).last().cloned().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct RecordingAlert {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Alert for RecordingAlert {
    fn alert(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}

#[derive(Default)]
pub struct MemoryButton {
    handlers: Mutex<Vec<ClickHandler>>,
}

impl MemoryButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a click to every registered handler.
    pub fn click(&self) {
        let handlers = lock(&self.handlers).clone();
        for handler in handlers {
            handler();
        }
    }
}

impl Button for MemoryButton {
    fn on_click(&self, handler: ClickHandler) {
        lock(&self.handlers).push(handler);
    }
}

#[derive(Clone)]
enum Element {
    Input(Arc<dyn TextInput>),
    Button(Arc<dyn Button>),
    Output(Arc<dyn TextOutput>),
}

/// Element registry keyed by id.
#[derive(Default)]
pub struct MemoryDocument {
    elements: HashMap<String, Element>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, id: &str, input: Arc<dyn TextInput>) -> Self {
        self.elements.insert(id.to_string(), Element::Input(input));
        self
    }

    pub fn with_button(mut self, id: &str, button: Arc<dyn Button>) -> Self {
        self.elements.insert(id.to_string(), Element::Button(button));
        self
    }

    pub fn with_output(mut self, id: &str, output: Arc<dyn TextOutput>) -> Self {
        self.elements.insert(id.to_string(), Element::Output(output));
        self
    }
}

impl Document for MemoryDocument {
    fn input(&self, id: &str) -> Option<Arc<dyn TextInput>> {
        match self.elements.get(id)? {
            Element::Input(input) => Some(Arc::clone(input)),
            _ => None,
        }
    }

    fn button(&self, id: &str) -> Option<Arc<dyn Button>> {
        match self.elements.get(id)? {
            Element::Button(button) => Some(Arc::clone(button)),
            _ => None,
        }
    }

    fn output(&self, id: &str) -> Option<Arc<dyn TextOutput>> {
        match self.elements.get(id)? {
            Element::Output(output) => Some(Arc::clone(output)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn full_document() -> MemoryDocument {
        MemoryDocument::new()
            .with_input(INPUT_ID, Arc::new(MemoryInput::new("42")))
            .with_button(BUTTON_ID, Arc::new(MemoryButton::new()))
            .with_output(OUTPUT_ID, Arc::new(MemoryOutput::new()))
    }

    #[test]
    fn test_bind_resolves_all_elements() {
        let page = Page::bind(&full_document(), Arc::new(RecordingAlert::new())).unwrap();
        assert_eq!(page.input.value(), "42");
        assert_eq!(page.output.text(), "");
    }

    #[test]
    fn test_bind_fails_on_missing_element() {
        let document = MemoryDocument::new()
            .with_input(INPUT_ID, Arc::new(MemoryInput::new("")))
            .with_button(BUTTON_ID, Arc::new(MemoryButton::new()));

        let err = Page::bind(&document, Arc::new(RecordingAlert::new()))
            .err()
            .unwrap();
        assert!(err.to_string().contains("#result"));
    }

    #[test]
    fn test_bind_fails_on_wrong_element_kind() {
        let document = MemoryDocument::new()
            .with_output(INPUT_ID, Arc::new(MemoryOutput::new()))
            .with_button(BUTTON_ID, Arc::new(MemoryButton::new()))
            .with_output(OUTPUT_ID, Arc::new(MemoryOutput::new()));

        assert!(Page::bind(&document, Arc::new(RecordingAlert::new())).is_err());
    }

    #[test]
    fn test_output_is_overwritten() {
        let output = MemoryOutput::new();
        output.set_text("first");
        output.set_text("second");
        assert_eq!(output.text(), "second");
        assert_eq!(output.history(), vec!["first", "second"]);
    }

    #[test]
    fn test_click_reaches_every_handler() {
        let button = MemoryButton::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let count = Arc::clone(&count);
            button.on_click(Arc::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }

        button.click();
        button.click();
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }
}
