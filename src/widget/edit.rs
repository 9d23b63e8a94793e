use crate::model::ItemId;

use super::field::TextField;

/// State of an open in-place edit.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub item: ItemId,
    /// Text before the edit started, restored on cancel or blank commit
    pub previous: String,
    pub field: TextField,
    /// Set by an explicit cancel; the focus loss that follows must not commit
    pub cancelled: bool,
}

impl EditSession {
    pub fn start(item: ItemId, text: &str) -> Self {
        EditSession {
            item,
            previous: text.to_string(),
            field: TextField::with_text_selected(text),
            cancelled: false,
        }
    }

    pub fn draft(&self) -> &str {
        self.field.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_prefills_and_selects() {
        let session = EditSession::start(ItemId(0), "Buy milk");
        assert_eq!(session.previous, "Buy milk");
        assert_eq!(session.draft(), "Buy milk");
        assert_eq!(session.field.selection(), Some((0, 8)));
        assert!(!session.cancelled);
    }
}
