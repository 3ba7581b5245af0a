/// Desktop notification permission, mirroring the browser tri-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl NotificationPermission {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "default" => Some(Self::Default),
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn needs_request(self) -> bool {
        self == Self::Default
    }

    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// A toast raised for an inbound message notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new_message(sender_name: &str, preview: &str) -> Self {
        Self {
            title: format!("New message from {sender_name}"),
            body: preview.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_labels() {
        for permission in [
            NotificationPermission::Default,
            NotificationPermission::Granted,
            NotificationPermission::Denied,
        ] {
            assert_eq!(NotificationPermission::parse(permission.as_str()), Some(permission));
        }
        assert_eq!(NotificationPermission::parse("maybe"), None);
    }

    #[test]
    fn only_default_needs_a_request() {
        assert!(NotificationPermission::Default.needs_request());
        assert!(!NotificationPermission::Granted.needs_request());
        assert!(!NotificationPermission::Denied.needs_request());
    }

    #[test]
    fn new_message_toast_names_the_sender() {
        let toast = Notification::new_message("alice", "see you at...");

        assert_eq!(toast.title, "New message from alice");
        assert_eq!(toast.body, "see you at...");
    }
}
