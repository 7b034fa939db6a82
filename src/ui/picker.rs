//! Model picker state machine.
//!
//! The overlay driver translates key presses into [`PickerEvent`]s and feeds
//! them through [`PickerState::handle`]; nothing in here touches a terminal,
//! so the whole machine can be exercised in unit tests.

/// Which part of the overlay receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerFocus {
    List,
    Filter,
}

/// Input events the overlay can feed into the state machine. Page moves
/// carry the step because only the driver knows the visible window height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    MoveUp,
    MoveDown,
    PageUp(usize),
    PageDown(usize),
    /// Move focus into the filter field.
    StartFilter,
    /// A character typed while the filter field has focus.
    Input(char),
    Backspace,
    /// Enter: confirms the selection from the list, or returns focus to the
    /// list from the filter field.
    Confirm,
    Cancel,
}

/// A terminal transition: the overlay closes and reports this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PickerState {
    items: Vec<String>,
    current: Option<String>,
    pub filter: String,
    pub filtered: Vec<String>,
    pub selected: usize,
    pub focus: PickerFocus,
}

impl PickerState {
    /// Seed the picker with the full catalog. Selection starts on the
    /// current model when it is present, else on the first row.
    pub fn new(items: Vec<String>, current: Option<&str>) -> Self {
        let selected = current
            .and_then(|id| items.iter().position(|item| item == id))
            .unwrap_or(0);
        PickerState {
            filtered: items.clone(),
            items,
            current: current.map(str::to_string),
            filter: String::new(),
            selected,
            focus: PickerFocus::List,
        }
    }

    /// Feed one event through the machine. `Some` means the overlay is done.
    pub fn handle(&mut self, event: PickerEvent) -> Option<PickerOutcome> {
        match event {
            PickerEvent::Cancel => return Some(PickerOutcome::Cancelled),
            PickerEvent::Confirm => match self.focus {
                PickerFocus::Filter => self.focus = PickerFocus::List,
                PickerFocus::List => {
                    if let Some(id) = self.filtered.get(self.selected) {
                        return Some(PickerOutcome::Selected(id.clone()));
                    }
                    // Empty filtered view: confirming is a no-op.
                }
            },
            PickerEvent::StartFilter => self.focus = PickerFocus::Filter,
            PickerEvent::Input(ch) => {
                if self.focus == PickerFocus::Filter {
                    self.filter.push(ch);
                    self.refresh_filter();
                }
            }
            PickerEvent::Backspace => {
                if self.focus == PickerFocus::Filter {
                    self.filter.pop();
                    self.refresh_filter();
                }
            }
            PickerEvent::MoveUp => self.move_by(-1),
            PickerEvent::MoveDown => self.move_by(1),
            PickerEvent::PageUp(step) => self.move_by(-(step.max(1) as isize)),
            PickerEvent::PageDown(step) => self.move_by(step.max(1) as isize),
        }
        None
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.filtered.get(self.selected).map(String::as_str)
    }

    /// Whether `id` is the model the overlay should mark as current.
    pub fn is_current(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    /// Recompute the filtered view (case-insensitive substring, catalog
    /// order) and re-clamp the selection: keep the previously selected row
    /// when it is still visible, otherwise snap to the first visible entry.
    fn refresh_filter(&mut self) {
        let previously_selected = self.filtered.get(self.selected).cloned();
        let needle = self.filter.to_lowercase();
        self.filtered = if needle.is_empty() {
            self.items.clone()
        } else {
            self.items
                .iter()
                .filter(|item| item.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        self.selected = previously_selected
            .and_then(|id| self.filtered.iter().position(|item| *item == id))
            .unwrap_or(0);
    }

    /// Move the selection over the filtered view with wraparound.
    /// Navigation only applies while the list has focus.
    fn move_by(&mut self, delta: isize) {
        if self.focus != PickerFocus::List {
            return;
        }
        let len = self.filtered.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_picker() -> PickerState {
        PickerState::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            Some("b"),
        )
    }

    fn type_filter(picker: &mut PickerState, text: &str) {
        picker.handle(PickerEvent::StartFilter);
        for ch in text.chars() {
            picker.handle(PickerEvent::Input(ch));
        }
    }

    #[test]
    fn opens_with_selection_on_current_model() {
        let picker = abc_picker();
        assert_eq!(picker.selected, 1);
        assert_eq!(picker.selected_id(), Some("b"));
        assert!(picker.is_current("b"));
        assert!(!picker.is_current("a"));
    }

    #[test]
    fn opens_at_zero_when_current_is_missing() {
        let picker = PickerState::new(vec!["a".to_string()], Some("gone"));
        assert_eq!(picker.selected, 0);
        let empty = PickerState::new(Vec::new(), None);
        assert_eq!(empty.selected, 0);
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        let mut picker = abc_picker();
        picker.selected = 2;
        picker.handle(PickerEvent::MoveDown);
        assert_eq!(picker.selected, 0);
        picker.handle(PickerEvent::MoveUp);
        assert_eq!(picker.selected, 2);
    }

    #[test]
    fn page_moves_wrap_like_single_steps() {
        let mut picker = abc_picker();
        picker.selected = 0;
        picker.handle(PickerEvent::PageDown(5));
        assert_eq!(picker.selected, 2); // 0 + 5 mod 3
        picker.handle(PickerEvent::PageUp(4));
        assert_eq!(picker.selected, 1);
    }

    #[test]
    fn navigation_ignored_while_filter_focused() {
        let mut picker = abc_picker();
        picker.handle(PickerEvent::StartFilter);
        picker.handle(PickerEvent::MoveDown);
        assert_eq!(picker.selected, 1);
        assert_eq!(picker.focus, PickerFocus::Filter);
    }

    #[test]
    fn filtering_narrows_and_snaps_selection() {
        let mut picker = abc_picker();
        type_filter(&mut picker, "c");
        assert_eq!(picker.filtered, vec!["c".to_string()]);
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn filtering_is_case_insensitive_and_keeps_order() {
        let mut picker = PickerState::new(
            vec![
                "Google/Gemma-2-9B".to_string(),
                "Tencent/Hunyuan".to_string(),
                "Google/Gemma-3-4B".to_string(),
            ],
            None,
        );
        type_filter(&mut picker, "gemma");
        assert_eq!(
            picker.filtered,
            vec![
                "Google/Gemma-2-9B".to_string(),
                "Google/Gemma-3-4B".to_string()
            ]
        );
    }

    #[test]
    fn clearing_the_filter_restores_the_full_order() {
        let mut picker = abc_picker();
        type_filter(&mut picker, "c");
        picker.handle(PickerEvent::Backspace);
        assert_eq!(
            picker.filtered,
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn longer_filters_restrict_the_previous_view() {
        let mut picker = PickerState::new(
            vec![
                "alpha".to_string(),
                "alphabet".to_string(),
                "beta".to_string(),
            ],
            None,
        );
        type_filter(&mut picker, "alpha");
        let first_view = picker.filtered.clone();
        picker.handle(PickerEvent::Input('b'));
        // The narrower view is a subset of the wider one, same order.
        assert!(picker
            .filtered
            .iter()
            .all(|item| first_view.contains(item)));
        assert_eq!(picker.filtered, vec!["alphabet".to_string()]);
    }

    #[test]
    fn selection_sticks_to_the_selected_row_when_still_visible() {
        let mut picker = PickerState::new(
            vec![
                "alpha".to_string(),
                "beta".to_string(),
                "alphabet".to_string(),
            ],
            Some("alphabet"),
        );
        assert_eq!(picker.selected, 2);
        type_filter(&mut picker, "alpha");
        // "alphabet" survives the filter, so the selection follows it.
        assert_eq!(picker.filtered, vec!["alpha".to_string(), "alphabet".to_string()]);
        assert_eq!(picker.selected_id(), Some("alphabet"));
    }

    #[test]
    fn confirm_returns_the_selected_id() {
        let mut picker = abc_picker();
        let outcome = picker.handle(PickerEvent::Confirm);
        assert_eq!(outcome, Some(PickerOutcome::Selected("b".to_string())));
    }

    #[test]
    fn confirm_on_empty_view_is_a_no_op() {
        let mut picker = abc_picker();
        type_filter(&mut picker, "zzz");
        picker.handle(PickerEvent::Confirm); // leaves filter focus
        assert!(picker.filtered.is_empty());
        assert_eq!(picker.handle(PickerEvent::Confirm), None);
    }

    #[test]
    fn confirm_in_filter_focus_returns_to_the_list() {
        let mut picker = abc_picker();
        picker.handle(PickerEvent::StartFilter);
        let outcome = picker.handle(PickerEvent::Confirm);
        assert_eq!(outcome, None);
        assert_eq!(picker.focus, PickerFocus::List);
    }

    #[test]
    fn cancel_closes_from_either_focus() {
        let mut picker = abc_picker();
        assert_eq!(
            picker.handle(PickerEvent::Cancel),
            Some(PickerOutcome::Cancelled)
        );

        let mut picker = abc_picker();
        picker.handle(PickerEvent::StartFilter);
        assert_eq!(
            picker.handle(PickerEvent::Cancel),
            Some(PickerOutcome::Cancelled)
        );
    }

    #[test]
    fn typed_characters_are_ignored_while_the_list_has_focus() {
        let mut picker = abc_picker();
        picker.handle(PickerEvent::Input('x'));
        assert!(picker.filter.is_empty());
        assert_eq!(picker.filtered.len(), 3);
    }
}
