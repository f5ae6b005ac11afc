use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Theme;
use crate::store::StateStore;
use chrono::Utc;

pub fn run<S: StateStore>(store: &mut S, theme: Option<Theme>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);

    match theme {
        None => {
            result.add_message(CmdMessage::info(format!("Current theme: {}", doc.theme)));
            result.theme = Some(doc.theme);
        }
        Some(theme) => {
            doc.theme = theme;
            doc.timestamp = Utc::now();
            persist(store, &doc, &mut result);
            result.add_message(CmdMessage::success(format!("Theme set to {}", theme)));
            result.theme = Some(theme);
        }
    }
    Ok(result)
}
