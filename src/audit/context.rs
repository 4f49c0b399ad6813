//! Request context for attributing mutations
//!
//! Carries who performed an action and where the request came from. A context
//! without a user is a system action.

use crate::models::UserId;

use super::entry::RequestMetadata;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user: Option<UserId>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub method: Option<String>,
    pub endpoint: Option<String>,
}

impl RequestContext {
    /// A context for actions not performed by any user
    pub fn system() -> Self {
        Self::default()
    }

    pub fn for_user(user: UserId) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the HTTP method and endpoint of the originating request
    pub fn with_request(mut self, method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Fill method/endpoint when the caller did not supply them
    pub fn or_request(&self, method: &str, endpoint: &str) -> Self {
        let mut ctx = self.clone();
        if ctx.method.is_none() {
            ctx.method = Some(method.to_string());
        }
        if ctx.endpoint.is_none() {
            ctx.endpoint = Some(endpoint.to_string());
        }
        ctx
    }

    pub fn is_system(&self) -> bool {
        self.user.is_none()
    }

    pub fn metadata(&self) -> RequestMetadata {
        RequestMetadata {
            ip: self.ip.clone(),
            user_agent: self.user_agent.clone(),
            method: self.method.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_context() {
        let ctx = RequestContext::system();
        assert!(ctx.is_system());
        assert_eq!(ctx.metadata(), RequestMetadata::default());
    }

    #[test]
    fn test_or_request_keeps_explicit_values() {
        let ctx = RequestContext::for_user(UserId::new())
            .with_request("PATCH", "/api/equipment/1/status")
            .or_request("PUT", "/api/equipment/1");
        assert_eq!(ctx.method.as_deref(), Some("PATCH"));
        assert_eq!(ctx.endpoint.as_deref(), Some("/api/equipment/1/status"));

        let filled = RequestContext::system().or_request("DELETE", "/api/tasks/2");
        assert_eq!(filled.method.as_deref(), Some("DELETE"));
        assert_eq!(filled.endpoint.as_deref(), Some("/api/tasks/2"));
    }
}
