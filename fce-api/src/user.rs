#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is performing an operation. Threaded explicitly through every store
/// call and view derivation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Identity {
    Guest,
    User(UserId),
}

impl Identity {
    pub fn user(&self) -> Option<&UserId> {
        match self {
            Identity::Guest => None,
            Identity::User(u) => Some(u),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is(&self, user: &UserId) -> bool {
        self.user() == Some(user)
    }
}
