//! State for the "new group" and "new direct chat" modals.

use super::{
    conversation::{UserId, UserSummary},
    session::SessionIdentity,
    text_input::TextInputState,
};

/// Load state of a modal picker populated by a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerLoad {
    Loading,
    Ready,
    Error,
}

/// What dismissed a modal. All triggers close it the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCloseTrigger {
    Cancel,
    OutsideClick,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOption {
    pub user_id: UserId,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFormField {
    Name,
    Description,
    Members,
}

/// A validated "create group" submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub members: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupForm {
    pub name: TextInputState,
    pub description: TextInputState,
    members: Vec<MemberOption>,
    members_load: PickerLoad,
    focus: GroupFormField,
    member_cursor: usize,
}

impl Default for NewGroupForm {
    fn default() -> Self {
        Self {
            name: TextInputState::default(),
            description: TextInputState::default(),
            members: Vec::new(),
            members_load: PickerLoad::Loading,
            focus: GroupFormField::Name,
            member_cursor: 0,
        }
    }
}

impl NewGroupForm {
    pub fn members(&self) -> &[MemberOption] {
        &self.members
    }

    pub fn members_load(&self) -> PickerLoad {
        self.members_load
    }

    pub fn focus(&self) -> GroupFormField {
        self.focus
    }

    pub fn member_cursor(&self) -> usize {
        self.member_cursor
    }

    /// Fills the member checkboxes from direct-chat counterparts.
    pub fn set_members(&mut self, counterparts: Vec<(UserId, String)>) {
        self.members = counterparts
            .into_iter()
            .map(|(user_id, name)| MemberOption {
                user_id,
                name,
                selected: false,
            })
            .collect();
        self.members_load = PickerLoad::Ready;
        self.member_cursor = 0;
    }

    pub fn set_members_error(&mut self) {
        self.members_load = PickerLoad::Error;
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            GroupFormField::Name => GroupFormField::Description,
            GroupFormField::Description => GroupFormField::Members,
            GroupFormField::Members => GroupFormField::Name,
        };
    }

    /// The text field under focus, if focus is on a text field.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.focus {
            GroupFormField::Name => Some(&mut self.name),
            GroupFormField::Description => Some(&mut self.description),
            GroupFormField::Members => None,
        }
    }

    pub fn member_cursor_down(&mut self) {
        if self.member_cursor + 1 < self.members.len() {
            self.member_cursor += 1;
        }
    }

    pub fn member_cursor_up(&mut self) {
        self.member_cursor = self.member_cursor.saturating_sub(1);
    }

    pub fn toggle_member_at_cursor(&mut self) {
        if let Some(member) = self.members.get_mut(self.member_cursor) {
            member.selected = !member.selected;
        }
    }

    pub fn selected_members(&self) -> Vec<UserId> {
        self.members
            .iter()
            .filter(|member| member.selected)
            .map(|member| member.user_id)
            .collect()
    }

    /// Builds a submission. A group needs a non-blank name; description and
    /// members are optional.
    pub fn draft(&self) -> Option<GroupDraft> {
        let name = self.name.submission()?;
        Some(GroupDraft {
            name: name.to_owned(),
            description: self.description.text().trim().to_owned(),
            members: self.selected_members(),
        })
    }

    /// Clears the typed fields and member selection, keeping the loaded
    /// member list.
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        for member in &mut self.members {
            member.selected = false;
        }
        self.focus = GroupFormField::Name;
        self.member_cursor = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectChatPicker {
    candidates: Vec<UserSummary>,
    load: PickerLoad,
    cursor: usize,
}

impl Default for DirectChatPicker {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            load: PickerLoad::Loading,
            cursor: 0,
        }
    }
}

impl DirectChatPicker {
    pub fn candidates(&self) -> &[UserSummary] {
        &self.candidates
    }

    pub fn load(&self) -> PickerLoad {
        self.load
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_candidates(&mut self, candidates: Vec<UserSummary>) {
        self.candidates = candidates;
        self.load = PickerLoad::Ready;
        self.cursor = 0;
    }

    pub fn set_error(&mut self) {
        self.load = PickerLoad::Error;
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&UserSummary> {
        self.candidates.get(self.cursor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    NewGroup(NewGroupForm),
    NewDirectChat(DirectChatPicker),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn open_new_group(&mut self) {
        *self = Self::NewGroup(NewGroupForm::default());
    }

    pub fn open_new_direct_chat(&mut self) {
        *self = Self::NewDirectChat(DirectChatPicker::default());
    }

    /// Closes whatever modal is open. Safe to call repeatedly; returns
    /// whether a modal was actually open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Self::Closed;
        was_open
    }

    pub fn new_group_mut(&mut self) -> Option<&mut NewGroupForm> {
        match self {
            Self::NewGroup(form) => Some(form),
            _ => None,
        }
    }

    pub fn direct_chat_mut(&mut self) -> Option<&mut DirectChatPicker> {
        match self {
            Self::NewDirectChat(picker) => Some(picker),
            _ => None,
        }
    }
}

/// Users that can be offered for a new direct chat: everyone except the
/// session user and users that already have a direct chat with them.
pub fn direct_chat_candidates(
    users: Vec<UserSummary>,
    existing_counterparts: &[UserId],
    session: SessionIdentity,
) -> Vec<UserSummary> {
    users
        .into_iter()
        .filter(|user| !session.is(user.id) && !existing_counterparts.contains(&user.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> UserSummary {
        UserSummary {
            id: UserId(id),
            username: name.to_owned(),
        }
    }

    fn type_into(input: &mut TextInputState, text: &str) {
        for ch in text.chars() {
            input.insert_char(ch);
        }
    }

    #[test]
    fn close_is_idempotent() {
        let mut modal = ModalState::default();
        modal.open_new_group();

        assert!(modal.close());
        assert!(!modal.close());
        assert_eq!(modal, ModalState::Closed);
    }

    #[test]
    fn group_draft_requires_non_blank_name() {
        let mut form = NewGroupForm::default();
        type_into(&mut form.name, "   ");
        assert_eq!(form.draft(), None);

        form.name.clear();
        type_into(&mut form.name, " Ducks ");
        type_into(&mut form.description, " pond talk ");

        let draft = form.draft().expect("draft with a name");
        assert_eq!(draft.name, "Ducks");
        assert_eq!(draft.description, "pond talk");
        assert!(draft.members.is_empty());
    }

    #[test]
    fn member_checkboxes_toggle_under_cursor() {
        let mut form = NewGroupForm::default();
        form.set_members(vec![
            (UserId(2), "bob".to_owned()),
            (UserId(3), "carol".to_owned()),
        ]);

        form.member_cursor_down();
        form.toggle_member_at_cursor();
        form.member_cursor_down();

        assert_eq!(form.member_cursor(), 1);
        assert_eq!(form.selected_members(), vec![UserId(3)]);

        form.toggle_member_at_cursor();
        assert!(form.selected_members().is_empty());
    }

    #[test]
    fn focus_cycles_through_fields() {
        let mut form = NewGroupForm::default();
        assert!(form.focused_input_mut().is_some());

        form.focus_next();
        assert_eq!(form.focus(), GroupFormField::Description);
        form.focus_next();
        assert!(form.focused_input_mut().is_none());
        form.focus_next();
        assert_eq!(form.focus(), GroupFormField::Name);
    }

    #[test]
    fn reset_clears_fields_and_selection() {
        let mut form = NewGroupForm::default();
        form.set_members(vec![(UserId(2), "bob".to_owned())]);
        type_into(&mut form.name, "Ducks");
        form.toggle_member_at_cursor();

        form.reset();

        assert!(form.name.is_empty());
        assert!(form.selected_members().is_empty());
        assert_eq!(form.members().len(), 1);
    }

    #[test]
    fn direct_chat_candidates_skip_self_and_existing_counterparts() {
        let session = SessionIdentity::new(UserId(1));
        let users = vec![user(1, "me"), user(2, "bob"), user(3, "carol")];

        let candidates = direct_chat_candidates(users, &[UserId(2)], session);

        assert_eq!(candidates, vec![user(3, "carol")]);
    }

    #[test]
    fn picker_cursor_stays_in_bounds() {
        let mut picker = DirectChatPicker::default();
        assert_eq!(picker.selected(), None);

        picker.set_candidates(vec![user(2, "bob"), user(3, "carol")]);
        picker.select_previous();
        picker.select_next();
        picker.select_next();

        assert_eq!(picker.selected().map(|u| u.id), Some(UserId(3)));
    }
}
