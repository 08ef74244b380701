// src/render.rs
use chrono::{DateTime, Local};
use egui::Color32;
use serde_json::Value;

use crate::state::{DeviceState, LED_COUNT};

pub const PLACEHOLDER: &str = "—";

pub const TEXT_CONNECTING: &str = "Connecting…";
pub const TEXT_CONNECTED: &str = "Connected";
pub const TEXT_DISCONNECTED: &str = "Disconnected";
pub const TEXT_SAVED: &str = "Saved";
pub const TEXT_SAVE_ERROR: &str = "Save error";

/// Everything the panel shows for one state snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub hex: String,
    pub count: String,
    /// One entry per LED; `Some(color)` when lit.
    pub cells: [Option<String>; LED_COUNT],
    pub rev: String,
    pub updated_at: String,
}

impl Preview {
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

pub fn render_preview(state: &DeviceState) -> Preview {
    let cells = std::array::from_fn(|i| {
        if i < state.count as usize {
            Some(state.color.clone())
        } else {
            None
        }
    });

    Preview {
        hex: state.color.to_lowercase(),
        count: state.count.to_string(),
        cells,
        rev: state
            .rev
            .as_ref()
            .map(rev_label)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        updated_at: state
            .updated_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

fn rev_label(rev: &Value) -> String {
    match rev {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Show an RFC 3339 timestamp in local time. Unparseable input is shown as-is,
/// blank input as the placeholder.
pub fn format_timestamp(raw: &str) -> String {
    if raw.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Local).format("%x %X").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Connectivity indicator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub ok: bool,
    pub text: String,
    pub border: Color32,
    pub background: Color32,
}

impl Badge {
    pub fn new(ok: bool, text: &str) -> Self {
        let mut badge = Self {
            ok,
            text: String::new(),
            border: Color32::TRANSPARENT,
            background: Color32::TRANSPARENT,
        };
        badge.set(ok, text);
        badge
    }

    pub fn set(&mut self, ok: bool, text: &str) {
        let (r, g, b) = if ok { (100, 255, 180) } else { (255, 120, 120) };
        self.ok = ok;
        self.text = text.to_string();
        self.border = Color32::from_rgba_unmultiplied(r, g, b, 64);
        self.background = Color32::from_rgba_unmultiplied(r, g, b, 26);
    }
}

impl Default for Badge {
    fn default() -> Self {
        Self::new(true, TEXT_CONNECTING)
    }
}
