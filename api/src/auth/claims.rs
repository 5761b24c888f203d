use serde::{Deserialize, Serialize};
use services::Actor;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller as seen by the attendance operations.
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.sub, self.0.admin)
    }
}
