//! Help text generated from the keymaps, so hints never drift from bindings.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// One line of help covering one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Paired actions such as next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        (!keys.is_empty()).then(|| keys.join("/"))
    }

    /// "keys:label", or None if nothing is bound.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|k| format!("{}:{}", k, self.label))
    }

    /// (keys, label) columns for the overlay.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|k| (k, self.label))
    }
}

/// Join the bound items into a status bar hint.
pub fn format_items(items: &[HelpItem], keymap: &Keymap) -> String {
    items
        .iter()
        .filter_map(|item| item.format(keymap))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Full list for the help overlay.
pub fn feed_overlay_items() -> Vec<HelpItem> {
    use Message::*;
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "next/prev entry"),
        HelpItem::pair(SelectFirst, SelectLast, "first/last entry"),
        HelpItem::pair(NextComment, PrevComment, "next/prev comment"),
        HelpItem::new(ToggleLike, "like / unlike"),
        HelpItem::new(OpenCommentForm, "comment"),
        HelpItem::new(DeleteComment, "delete comment"),
        HelpItem::new(ExpandComments, "show all comments"),
        HelpItem::new(ExpandLikes, "show all likes"),
        HelpItem::pair(NextPage, PrevPage, "next/prev page"),
        HelpItem::new(OpenPermalink, "open in browser"),
        HelpItem::new(PollNow, "refresh now"),
        HelpItem::new(ToggleDebug, "debug pane"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close help"),
    ]
}

/// Short hint for the status bar.
pub fn feed_compact_items() -> Vec<HelpItem> {
    use Message::*;
    vec![
        HelpItem::new(ToggleLike, "like"),
        HelpItem::new(OpenCommentForm, "comment"),
        HelpItem::new(ToggleHelp, "help"),
        HelpItem::new(Quit, "quit"),
    ]
}

pub fn form_items() -> Vec<HelpItem> {
    use Message::*;
    vec![
        HelpItem::new(SubmitComment, "post"),
        HelpItem::new(CancelComment, "cancel"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{feed_keymap, form_keymap, global_keymap};

    #[test]
    fn test_compact_feed_help() {
        let keymap = global_keymap().extend(feed_keymap());
        assert_eq!(
            format_items(&feed_compact_items(), &keymap),
            "l:like  c:comment  ?:help  q:quit"
        );
    }

    #[test]
    fn test_form_help() {
        assert_eq!(
            format_items(&form_items(), &form_keymap()),
            "Enter:post  Esc:cancel"
        );
    }

    #[test]
    fn test_pair_joins_keys() {
        let item = HelpItem::pair(Message::NextPage, Message::PrevPage, "pages");
        assert_eq!(item.format(&feed_keymap()).as_deref(), Some("n/p:pages"));
    }

    #[test]
    fn test_unbound_items_are_skipped() {
        let item = HelpItem::new(Message::SubmitComment, "post");
        assert!(item.format(&feed_keymap()).is_none());
    }

    #[test]
    fn test_every_overlay_item_is_bound() {
        let keymap = global_keymap().extend(feed_keymap());
        for item in feed_overlay_items() {
            assert!(item.format_for_overlay(&keymap).is_some(), "{}", item.label);
        }
    }
}
