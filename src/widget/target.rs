use crate::model::ItemId;

/// What an input event landed on, after hit-testing by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The new-entry input line
    NewInput,
    /// Somewhere on a row outside its label and remove control
    Row(ItemId),
    /// The text label of a row
    Label(ItemId),
    /// The remove control of a row
    Remove(ItemId),
    /// The edit field of the row being edited
    EditField(ItemId),
    /// Nothing the widget knows about
    Outside,
}

impl Target {
    /// The row this target belongs to, if any
    pub fn item(self) -> Option<ItemId> {
        match self {
            Target::Row(id) | Target::Label(id) | Target::Remove(id) | Target::EditField(id) => {
                Some(id)
            }
            Target::NewInput | Target::Outside => None,
        }
    }
}
