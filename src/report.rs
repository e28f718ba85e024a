use std::fmt;

pub const ERROR_EXCERPT: usize = 200;
pub const BODY_EXCERPT: usize = 200;
pub const PRETTY_LIMIT: usize = 800;

/// First `max` characters of `text`, never splitting a UTF-8 sequence.
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Pretty-print a JSON body with two-space indentation, falling back to the
/// raw text when it does not parse. Either way the result is capped.
pub fn pretty_json(body: &str) -> String {
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());

    match pretty {
        Some(pretty) => truncate(&pretty, PRETTY_LIMIT).to_string(),
        None => truncate(body, PRETTY_LIMIT).to_string(),
    }
}

/// Overall classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Health, demo and the matched endpoint all answered 200.
    Pass,
    /// An endpoint matched but health or demo did not answer 200.
    Degraded,
    /// No candidate path accepted any payload shape.
    NoEndpoint,
}

impl Verdict {
    /// A failed search decides the verdict on its own; health and demo are
    /// only consulted once an endpoint matched.
    pub fn classify(health_ok: bool, demo_ok: bool, matched_ok: Option<bool>) -> Self {
        match matched_ok {
            None => Verdict::NoEndpoint,
            Some(true) if health_ok && demo_ok => Verdict::Pass,
            Some(_) => Verdict::Degraded,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::NoEndpoint => 1,
            Verdict::Degraded => 2,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Pass => "PASS",
            Verdict::Degraded => "DEGRADED",
            Verdict::NoEndpoint => "NO ENDPOINT",
        };
        write!(f, "{text} (exit {})", self.exit_code())
    }
}
