use anyhow::Result;

use crate::data::cast::{smart_cast, value_to_string};
use crate::data::walk::leaf_entries;
use crate::repl::prompt::Prompter;

use super::data_editor::DataEditor;

/// Walks every leaf in document order, shows the current value and asks
/// for a replacement. Replies are smart-cast and written back; end of
/// input stops the pass early. Returns how many leaves were filled.
pub fn fill_leaves(editor: &mut DataEditor, prompter: &mut dyn Prompter) -> Result<usize> {
    let leaves = leaf_entries(editor.data());
    let mut filled = 0;
    for (path, current) in leaves {
        let label = if path.is_current() {
            format!("value ({}): ", value_to_string(&current))
        } else {
            format!("{} ({}): ", path, value_to_string(&current))
        };
        let Some(reply) = prompter.read_line(&label)? else {
            break;
        };
        editor.set_value(&path, smart_cast(&reply))?;
        filled += 1;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::prompt::ScriptedPrompter;
    use serde_json::json;

    #[test]
    fn fills_leaves_in_document_order() -> Result<()> {
        let mut editor = DataEditor::from_value(json!({"a": 1, "b": {"c": "x"}}));
        let mut prompter = ScriptedPrompter::new(["10", "hello"]);
        let filled = fill_leaves(&mut editor, &mut prompter)?;
        assert_eq!(filled, 2);
        assert_eq!(editor.data(), &json!({"a": 10, "b": {"c": "hello"}}));
        Ok(())
    }

    #[test]
    fn stops_early_when_replies_run_out() -> Result<()> {
        let mut editor = DataEditor::from_value(json!({"a": 1, "b": 2}));
        let mut prompter = ScriptedPrompter::new(["true"]);
        let filled = fill_leaves(&mut editor, &mut prompter)?;
        assert_eq!(filled, 1);
        assert_eq!(editor.data(), &json!({"a": true, "b": 2}));
        Ok(())
    }
}
