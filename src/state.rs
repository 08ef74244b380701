// src/state.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Physical LEDs on the strip.
pub const LED_COUNT: usize = 8;
pub const DEFAULT_COLOR: &str = "#ff0000";

/// What the panel believes the strip is showing.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceState {
    pub color: String,
    pub count: u8,
    pub rev: Option<Value>,
    pub updated_at: Option<String>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            count: LED_COUNT as u8,
            rev: None,
            updated_at: None,
        }
    }
}

/// Body of a successful `GET /api/state`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RemoteState {
    pub color: String,
    #[serde(default)]
    pub count: Value,
    #[serde(default)]
    pub rev: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body sent with `POST /api/state`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct StateUpdate {
    pub color: String,
    pub count: u8,
}

/// Fields of a successful `POST /api/state` we care about. The backend also
/// echoes `ok`, `color` and `count`; those are ignored.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SaveReceipt {
    #[serde(default)]
    pub rev: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl DeviceState {
    pub fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    pub fn set_count(&mut self, count: i64) {
        self.count = clamp_count(count);
    }

    /// Replace everything with what the backend reported on load.
    pub fn apply_remote(&mut self, remote: RemoteState) {
        self.color = remote.color;
        self.count = count_from_json(&remote.count);
        self.rev = remote.rev.filter(|v| !v.is_null());
        self.updated_at = remote.updated_at;
    }

    /// Take revision and timestamp from a save response, keeping the current
    /// values for anything the response left out.
    pub fn merge_receipt(&mut self, receipt: SaveReceipt) {
        if let Some(rev) = receipt.rev.filter(|v| !v.is_null()) {
            self.rev = Some(rev);
        }
        if let Some(updated_at) = receipt.updated_at {
            self.updated_at = Some(updated_at);
        }
    }

    pub fn update_payload(&self) -> StateUpdate {
        StateUpdate {
            color: self.color.clone(),
            count: self.count.min(LED_COUNT as u8),
        }
    }
}

pub fn clamp_count(n: i64) -> u8 {
    n.clamp(0, LED_COUNT as i64) as u8
}

/// Parse user-typed count text. Reads an optional sign and the leading run of
/// digits, anything unparseable becomes 0.
pub fn parse_count(text: &str) -> u8 {
    clamp_count(parse_int_prefix(text).unwrap_or(0))
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    // Overlong digit runs saturate; the clamp makes the exact value moot.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn count_from_json(value: &Value) -> u8 {
    match value {
        Value::Number(n) => {
            let n = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0);
            clamp_count(n)
        }
        Value::String(s) => parse_count(s),
        _ => 0,
    }
}

/// `#RRGGBB` to RGB. Anything else is not paintable.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn to_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clamp_keeps_range() {
        for n in -20..=20 {
            let expected = if n < 0 { 0 } else if n > 8 { 8 } else { n as u8 };
            assert_eq!(clamp_count(n), expected, "n = {n}");
        }
        assert_eq!(clamp_count(i64::MIN), 0);
        assert_eq!(clamp_count(i64::MAX), 8);
    }

    #[test]
    fn parse_count_falls_back_to_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("  "), 0);
    }

    #[test]
    fn parse_count_reads_digit_prefix() {
        assert_eq!(parse_count("5"), 5);
        assert_eq!(parse_count(" 3leds"), 3);
        assert_eq!(parse_count("+7"), 7);
        assert_eq!(parse_count("-4"), 0);
        assert_eq!(parse_count("12"), 8);
        assert_eq!(parse_count("99999999999999999999999"), 8);
        assert_eq!(parse_count("4.9"), 4);
    }

    #[test]
    fn remote_count_is_coerced() {
        let mut state = DeviceState::default();
        let remote = |count| RemoteState {
            color: "#00FF00".into(),
            count,
            rev: None,
            updated_at: None,
        };

        state.apply_remote(remote(json!(12)));
        assert_eq!(state.count, 8);
        state.apply_remote(remote(json!("3")));
        assert_eq!(state.count, 3);
        state.apply_remote(remote(json!(2.7)));
        assert_eq!(state.count, 2);
        state.apply_remote(remote(json!(null)));
        assert_eq!(state.count, 0);
        assert_eq!(state.color, "#00FF00");
    }

    #[test]
    fn merge_keeps_missing_fields() {
        let mut state = DeviceState {
            rev: Some(json!(4)),
            updated_at: Some("2024-01-01T00:00:00Z".into()),
            ..DeviceState::default()
        };
        state.merge_receipt(SaveReceipt {
            rev: Some(json!(5)),
            updated_at: None,
        });
        assert_eq!(state.rev, Some(json!(5)));
        assert_eq!(state.updated_at.as_deref(), Some("2024-01-01T00:00:00Z"));

        state.merge_receipt(SaveReceipt::default());
        assert_eq!(state.rev, Some(json!(5)));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#FF8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("ff8000"), None);
        assert_eq!(parse_hex_color("#ff80"), None);
        assert_eq!(parse_hex_color("#gg8000"), None);
        assert_eq!(to_hex_color([0, 255, 16]), "#00ff10");
    }
}
