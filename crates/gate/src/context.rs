use kurum360_auth::{RoleType, SessionSnapshot};

/// Cookie snapshot of the actor, attached to every request the gate lets through.
///
/// Best-effort: it reflects the cookies as sent, which may lag the durable
/// session until the next full navigation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    snapshot: SessionSnapshot,
}

impl SessionContext {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot.authenticated
    }

    pub fn role(&self) -> Option<RoleType> {
        self.snapshot.role
    }
}
