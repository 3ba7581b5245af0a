use super::{
    conversation::ConversationId,
    conversation_store::ConversationStore,
    events::ConnectivityStatus,
    modal_state::ModalState,
    notification::{Notification, NotificationPermission},
    open_chat_state::OpenChatState,
    session::SessionIdentity,
    text_input::TextInputState,
};

/// Which pane receives key input when no modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePane {
    #[default]
    Sidebar,
    Composer,
}

/// Why the shell loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    Quit,
    Logout,
}

/// Terminal-cell rectangle, recorded by the view for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ScreenRect {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }
}

/// Sidebar cursor and section visibility.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarState {
    cursor: Option<ConversationId>,
    direct_collapsed: bool,
    groups_collapsed: bool,
}

impl SidebarState {
    pub fn cursor(&self) -> Option<ConversationId> {
        self.cursor
    }

    pub fn direct_collapsed(&self) -> bool {
        self.direct_collapsed
    }

    pub fn groups_collapsed(&self) -> bool {
        self.groups_collapsed
    }

    pub fn toggle_direct(&mut self) {
        self.direct_collapsed = !self.direct_collapsed;
    }

    pub fn toggle_groups(&mut self) {
        self.groups_collapsed = !self.groups_collapsed;
    }

    /// Conversations in the order they appear on screen: direct chats, then
    /// groups, each in fetch order, skipping collapsed sections.
    pub fn visible_order(&self, store: &ConversationStore) -> Vec<ConversationId> {
        let direct = store
            .direct()
            .filter(|_| !self.direct_collapsed)
            .map(|c| c.id);
        let groups = store
            .groups()
            .filter(|_| !self.groups_collapsed)
            .map(|c| c.id);
        direct.chain(groups).collect()
    }

    /// Keeps the cursor on the same conversation when it is still visible,
    /// otherwise falls back to the first visible row.
    pub fn resolve_cursor(&mut self, store: &ConversationStore) {
        let order = self.visible_order(store);
        self.cursor = self
            .cursor
            .filter(|id| order.contains(id))
            .or_else(|| order.first().copied());
    }

    pub fn set_cursor(&mut self, conversation_id: ConversationId) {
        self.cursor = Some(conversation_id);
    }

    pub fn move_cursor(&mut self, store: &ConversationStore, down: bool) {
        let order = self.visible_order(store);
        let Some(position) = self
            .cursor
            .and_then(|id| order.iter().position(|candidate| *candidate == id))
        else {
            self.cursor = order.first().copied();
            return;
        };

        let next = if down {
            (position + 1).min(order.len().saturating_sub(1))
        } else {
            position.saturating_sub(1)
        };
        self.cursor = order.get(next).copied();
    }
}

/// Session-scoped state owned by the interaction controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    exit: Option<ExitRequest>,
    session: SessionIdentity,
    connectivity_status: ConnectivityStatus,
    notification_permission: NotificationPermission,
    conversations: ConversationStore,
    open_chat: OpenChatState,
    composer: TextInputState,
    modal: ModalState,
    active_pane: ActivePane,
    sidebar: SidebarState,
    notice: Option<String>,
    toast: Option<Notification>,
    modal_area: Option<ScreenRect>,
}

impl ShellState {
    pub fn new(session: SessionIdentity, notification_permission: NotificationPermission) -> Self {
        Self {
            running: true,
            exit: None,
            session,
            connectivity_status: ConnectivityStatus::Connecting,
            notification_permission,
            conversations: ConversationStore::default(),
            open_chat: OpenChatState::default(),
            composer: TextInputState::default(),
            modal: ModalState::default(),
            active_pane: ActivePane::default(),
            sidebar: SidebarState::default(),
            notice: None,
            toast: None,
            modal_area: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn exit_request(&self) -> Option<ExitRequest> {
        self.exit
    }

    pub fn stop(&mut self, request: ExitRequest) {
        self.running = false;
        self.exit = Some(request);
    }

    pub fn session(&self) -> SessionIdentity {
        self.session
    }

    pub fn connectivity_status(&self) -> ConnectivityStatus {
        self.connectivity_status
    }

    pub fn set_connectivity_status(&mut self, status: ConnectivityStatus) {
        self.connectivity_status = status;
    }

    pub fn notification_permission(&self) -> NotificationPermission {
        self.notification_permission
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn conversations_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversations
    }

    pub fn open_chat(&self) -> &OpenChatState {
        &self.open_chat
    }

    pub fn open_chat_mut(&mut self) -> &mut OpenChatState {
        &mut self.open_chat
    }

    pub fn composer(&self) -> &TextInputState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut TextInputState {
        &mut self.composer
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalState {
        &mut self.modal
    }

    pub fn active_pane(&self) -> ActivePane {
        self.active_pane
    }

    pub fn set_active_pane(&mut self, pane: ActivePane) {
        self.active_pane = pane;
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> (&mut SidebarState, &ConversationStore) {
        (&mut self.sidebar, &self.conversations)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn toast(&self) -> Option<&Notification> {
        self.toast.as_ref()
    }

    pub fn set_toast(&mut self, toast: Notification) {
        self.toast = Some(toast);
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    pub fn modal_area(&self) -> Option<ScreenRect> {
        self.modal_area
    }

    pub fn set_modal_area(&mut self, area: Option<ScreenRect>) {
        self.modal_area = area;
    }
}
