// src/models/auth.rs

use serde::{Deserialize, Serialize};

/// Claims do token de admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub exp: usize,
}

impl AdminClaims {
    /// Quem fica registrado no histórico do pedido.
    pub fn actor(&self) -> &str {
        if self.email.trim().is_empty() { &self.sub } else { &self.email }
    }
}
