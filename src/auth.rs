//! Request authorization

use fleet_shared::{Header, MessageType};

/// Decides whether a request may reach the dispatch engine
pub trait Authorizer: Send + Sync {
    fn authorize(&self, header: &Header) -> bool;
}

/// Accepts requests whose header carries the configured shared secret
pub struct SharedSecretAuthorizer {
    api_key: String,
}

impl SharedSecretAuthorizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Authorizer for SharedSecretAuthorizer {
    fn authorize(&self, header: &Header) -> bool {
        header.msg_type() == MessageType::MsgRequest
            && !header.api_key.is_empty()
            && header.api_key == self.api_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_key_accepted() {
        let auth = SharedSecretAuthorizer::new("k3y");
        assert!(auth.authorize(&Header::new("ops", MessageType::MsgRequest, 1, "k3y")));
    }

    #[test]
    fn test_wrong_or_missing_key_rejected() {
        let auth = SharedSecretAuthorizer::new("k3y");
        assert!(!auth.authorize(&Header::new("ops", MessageType::MsgRequest, 1, "nope")));
        assert!(!auth.authorize(&Header::new("ops", MessageType::MsgRequest, 1, "")));
    }

    #[test]
    fn test_non_request_messages_rejected() {
        let auth = SharedSecretAuthorizer::new("k3y");
        assert!(!auth.authorize(&Header::new("ops", MessageType::MsgResponse, 1, "k3y")));
    }
}
