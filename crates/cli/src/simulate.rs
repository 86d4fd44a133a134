use crate::{attach_widget, outcome_json, print_json, Cli, Context, SimulateArgs};
use anyhow::Result;
use assist_widget::{Focus, HeadlessHost, InputPresentation, Key, KeyOutcome, Target};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Key(Key),
    Click(Target),
}

fn parse_step(raw: &str) -> Step {
    match raw.trim() {
        "view-all" => Step::Click(Target::ViewAll),
        "icon" => Step::Click(Target::Icon),
        "submit" => Step::Click(Target::SearchTrigger),
        "Space" | "space" => Step::Key(Key::Space),
        other => {
            let key = Key::from_dom(other);
            if key == Key::Other {
                log::warn!("Unrecognized key {other:?}; replaying it as an ordinary key");
            }
            Step::Key(key)
        }
    }
}

/// Where a key press lands given the page's current focus.
fn key_target(focus: Focus) -> Target {
    match focus {
        Focus::Row(index) => Target::Row(index),
        Focus::Input | Focus::Nowhere => Target::Input,
    }
}

/// Every prefix of `typed`, as successive input events would carry it.
fn prefixes(typed: &str) -> impl Iterator<Item = &str> {
    typed
        .char_indices()
        .map(move |(idx, ch)| &typed[..idx + ch.len_utf8()])
}

pub(crate) async fn run(cli: &Cli, args: &SimulateArgs) -> Result<()> {
    let ctx = Context::new(cli)?;
    let host = Arc::new(HeadlessHost::new(args.path.as_str(), args.icon));
    let widget = match attach_widget(cli, &ctx, host.clone()) {
        Ok(widget) => widget,
        Err(err) => {
            return print_json(&json!({ "attached": false, "reason": err.to_string() }));
        }
    };

    if widget.presentation() == InputPresentation::Collapsed && !args.typed.is_empty() {
        widget.on_click(Target::Icon);
    }
    for prefix in prefixes(&args.typed) {
        host.set_input_value(prefix);
        widget.on_input(prefix).await;
    }

    let mut outcomes = Vec::new();
    for raw in &args.keys {
        let step = parse_step(raw);
        let outcome = match step {
            Step::Key(key) => {
                let target = key_target(host.snapshot().focus);
                match widget.on_key(target, key) {
                    KeyOutcome::Handled => json!({ "step": raw, "handled": true }),
                    KeyOutcome::Ignored => json!({ "step": raw, "handled": false }),
                }
            }
            Step::Click(target) => {
                let commit = widget.on_click(target).as_ref().map(outcome_json);
                json!({ "step": raw, "commit": commit })
            }
        };
        outcomes.push(outcome);
    }

    print_json(&json!({
        "attached": true,
        "steps": outcomes,
        "page": host.snapshot(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_clicks() {
        assert_eq!(parse_step("ArrowDown"), Step::Key(Key::ArrowDown));
        assert_eq!(parse_step(" Enter "), Step::Key(Key::Enter));
        assert_eq!(parse_step("Space"), Step::Key(Key::Space));
        assert_eq!(parse_step("view-all"), Step::Click(Target::ViewAll));
        assert_eq!(parse_step("submit"), Step::Click(Target::SearchTrigger));
        assert_eq!(parse_step("F5"), Step::Key(Key::Other));
    }

    #[test]
    fn keys_follow_focus() {
        assert_eq!(key_target(Focus::Row(2)), Target::Row(2));
        assert_eq!(key_target(Focus::Nowhere), Target::Input);
    }

    #[test]
    fn prefixes_respect_char_boundaries() {
        let all: Vec<_> = prefixes("añb").collect();
        assert_eq!(all, vec!["a", "añ", "añb"]);
        assert_eq!(prefixes("").count(), 0);
    }
}
