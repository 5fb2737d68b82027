// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

/// Nome usado quando nem a fatura nem o site têm nome configurado.
pub const DEFAULT_SITE_NAME: &str = "Sanaa Collection";

/// Id do único documento de configurações.
pub const SETTINGS_ID: &str = "main";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSettings {
    #[schema(example = "Sanaa Collection")]
    pub store_name: Option<String>,
    #[schema(example = "SARL Sanaa")]
    pub business_name: Option<String>,
    /// Número de identificação fiscal
    #[schema(example = "000016001234567")]
    pub nif: Option<String>,
    /// Número de identificação estatística
    #[schema(example = "000016012345678")]
    pub nis: Option<String>,
    /// Registro de comércio
    #[schema(example = "16/00-1234567B21")]
    pub rc: Option<String>,
    #[schema(example = "12 Rue Didouche Mourad")]
    pub address: Option<String>,
    #[schema(example = "Alger")]
    pub wilaya: Option<String>,
    pub phone: Option<String>,
    #[validate(custom(function = "blank_or_email"))]
    #[schema(example = "contact@sanaa.dz")]
    pub email: Option<String>,
    #[schema(example = "Merci pour votre confiance")]
    pub footer_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[schema(example = "Sanaa Collection")]
    pub site_name: Option<String>,
    #[schema(example = "+213 555 12 34 56")]
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,

    pub invoice: Option<InvoiceSettings>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: Some(DEFAULT_SITE_NAME.to_string()),
            contact_phone: None,
            contact_email: None,
            invoice: None,
            updated_at: None,
        }
    }
}

/// Trata "" e "   " como ausente (os documentos antigos gravam strings vazias).
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SiteSettings {
    /// Nome exibido no topo da fatura: loja da fatura > nome do site > padrão.
    pub fn display_name(&self) -> &str {
        self.invoice
            .as_ref()
            .and_then(|inv| present(&inv.store_name))
            .or_else(|| present(&self.site_name))
            .unwrap_or(DEFAULT_SITE_NAME)
    }

    /// Aplica uma atualização parcial: só os campos enviados são sobrescritos.
    pub fn merge(&mut self, patch: UpdateSettingsRequest) {
        if let Some(v) = patch.site_name {
            self.site_name = Some(v);
        }
        if let Some(v) = patch.contact_phone {
            self.contact_phone = Some(v);
        }
        if let Some(v) = patch.contact_email {
            self.contact_email = Some(v);
        }
        if let Some(inv_patch) = patch.invoice {
            self.invoice.get_or_insert_with(InvoiceSettings::default).merge(inv_patch);
        }
    }
}

impl InvoiceSettings {
    pub fn merge(&mut self, patch: InvoiceSettings) {
        let InvoiceSettings {
            store_name,
            business_name,
            nif,
            nis,
            rc,
            address,
            wilaya,
            phone,
            email,
            footer_note,
        } = patch;

        merge_field(&mut self.store_name, store_name);
        merge_field(&mut self.business_name, business_name);
        merge_field(&mut self.nif, nif);
        merge_field(&mut self.nis, nis);
        merge_field(&mut self.rc, rc);
        merge_field(&mut self.address, address);
        merge_field(&mut self.wilaya, wilaya);
        merge_field(&mut self.phone, phone);
        merge_field(&mut self.email, email);
        merge_field(&mut self.footer_note, footer_note);
    }
}

fn merge_field(target: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Sanaa Collection")]
    pub site_name: Option<String>,

    #[schema(example = "+213 555 12 34 56")]
    pub contact_phone: Option<String>,

    #[validate(custom(function = "blank_or_email"))]
    pub contact_email: Option<String>,

    #[validate(nested)]
    pub invoice: Option<InvoiceSettings>,
}

/// Vazio limpa o campo; qualquer outra coisa precisa ser um e-mail.
fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}
