use tickgate_core::Outcome;

/// Render one outcome as JSON, compact by default.
pub fn render(outcome: &Outcome, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    }
}
