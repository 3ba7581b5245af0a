use super::conversation::UserId;

/// Identity of the logged-in user, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    user_id: UserId,
}

impl SessionIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
