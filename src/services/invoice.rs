// src/services/invoice.rs
//
// Monta a descrição da fatura (blocos em ordem fixa) a partir do snapshot do
// pedido. Nenhum valor é recalculado: o TOTAL exibido é sempre o gravado.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, i18n::I18nStore},
    models::{
        orders::Order,
        settings::{present, SiteSettings},
    },
};

/// Largura (em caracteres) da coluna de endereço do bloco "faturado a".
pub const ADDRESS_WRAP_COLUMNS: usize = 45;
/// Largura da coluna PRODUTO; o título é cortado na primeira linha.
pub const PRODUCT_COLUMN_CHARS: usize = 38;
pub const NOTES_WRAP_COLUMNS: usize = 95;
/// Página única: o que passar disso é descartado.
pub const MAX_NOTE_LINES: usize = 12;

/// Argélia: UTC+1 o ano todo, sem horário de verão.
pub const ALGERIA_UTC_OFFSET_SECS: i32 = 3600;

pub const LEGAL_SEPARATOR: &str = "  |  ";
pub const COLOR_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    pub header: InvoiceHeader,
    pub bill_to: BillTo,
    pub line_item: LineItemTable,
    pub totals: TotalsBlock,
    pub status_line: String,
    pub notes: Option<NotesBlock>,
    pub footer: Footer,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceHeader {
    pub store_name: String,
    pub title: String,
    /// "N° #A1B2C3D4"
    pub reference: String,
    /// "Date: 05/03/2024"
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillTo {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemTable {
    pub heading: String,
    pub columns: [String; 5],
    pub row: [String; 5],
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsLine {
    pub label: String,
    pub amount: Decimal,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsBlock {
    pub subtotal: TotalsLine,
    pub delivery: TotalsLine,
    pub total: TotalsLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotesBlock {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterLine {
    pub text: String,
    pub style: FooterStyle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Footer {
    pub lines: Vec<FooterLine>,
}

pub struct InvoiceComposer<'a> {
    i18n: &'a I18nStore,
    lang: &'a str,
}

impl<'a> InvoiceComposer<'a> {
    pub fn new(i18n: &'a I18nStore, lang: &'a str) -> Self {
        Self { i18n, lang }
    }

    fn t(&self, key: &str) -> String {
        self.i18n.translate(self.lang, key)
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{:.2} {}", amount, self.t("invoice.currency"))
    }

    pub fn compose(
        &self,
        order: &Order,
        settings: Option<&SiteSettings>,
    ) -> Result<InvoiceLayout, AppError> {
        let title = self.product_title(order)?;
        if order.customer.full_name.trim().is_empty() {
            return Err(AppError::MissingOrderField("customer.fullName"));
        }
        if order.line_item.quantity <= 0 {
            return Err(AppError::InvalidQuantity(order.line_item.quantity));
        }

        let store_name = settings
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|| SiteSettings::default().display_name().to_string());

        let header = InvoiceHeader {
            store_name,
            title: self.t("invoice.title"),
            reference: format!("{} {}", self.t("invoice.number"), order.reference()),
            date: format!(
                "{}: {}",
                self.t("invoice.date"),
                local_date(order.created_at)
            ),
        };

        Ok(InvoiceLayout {
            header,
            bill_to: self.bill_to(order),
            line_item: self.line_item(order, &title),
            totals: self.totals(order),
            status_line: format!(
                "{}: {}",
                self.t("invoice.status"),
                self.t(&order.status.label_key())
            ),
            notes: self.notes(order),
            footer: self.footer(settings),
            file_name: format!("facture-{}.pdf", order.short_id()),
        })
    }

    fn product_title(&self, order: &Order) -> Result<String, AppError> {
        let item = &order.line_item;
        if item.product_id.trim().is_empty() {
            return Err(AppError::MissingOrderField("lineItem.productId"));
        }

        let (preferred, other) = if self.lang == "ar" {
            (&item.title_ar, &item.title_fr)
        } else {
            (&item.title_fr, &item.title_ar)
        };

        [preferred, other]
            .into_iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(AppError::MissingOrderField("lineItem.title"))
    }

    fn bill_to(&self, order: &Order) -> BillTo {
        let c = &order.customer;
        let mut lines = vec![
            c.full_name.trim().to_string(),
            format!("{}: {}", self.t("invoice.phone"), c.phone),
        ];

        let zone = if c.zone_name.trim().is_empty() { &c.zone_code } else { &c.zone_name };
        lines.push(zone.clone());

        if let Some(commune) = present(&c.commune_name) {
            lines.push(commune.to_string());
        }
        lines.extend(wrap_text(&c.address, ADDRESS_WRAP_COLUMNS));

        BillTo { heading: self.t("invoice.bill_to"), lines }
    }

    fn line_item(&self, order: &Order, title: &str) -> LineItemTable {
        let item = &order.line_item;
        let product = wrap_text(title, PRODUCT_COLUMN_CHARS)
            .into_iter()
            .next()
            .unwrap_or_default();
        let color = present(&item.color_name).unwrap_or(COLOR_PLACEHOLDER).to_string();

        LineItemTable {
            heading: self.t("invoice.details"),
            columns: [
                self.t("invoice.col.product"),
                self.t("invoice.col.color"),
                self.t("invoice.col.qty"),
                self.t("invoice.col.unit_price"),
                self.t("invoice.col.total"),
            ],
            row: [
                product,
                color,
                item.quantity.to_string(),
                self.money(item.unit_price),
                self.money(item.line_total()),
            ],
        }
    }

    fn totals(&self, order: &Order) -> TotalsBlock {
        let subtotal = order.line_item.line_total();
        let line = |label: String, amount: Decimal| TotalsLine {
            label,
            amount,
            text: self.money(amount),
        };

        if subtotal + order.delivery_price != order.total_price {
            tracing::warn!(
                order_id = %order.id,
                "Total gravado difere de subtotal + entrega; exibindo o valor gravado"
            );
        }

        TotalsBlock {
            subtotal: line(self.t("invoice.subtotal"), subtotal),
            delivery: line(self.t(order.delivery_type.label_key()), order.delivery_price),
            total: line(self.t("invoice.total"), order.total_price),
        }
    }

    fn notes(&self, order: &Order) -> Option<NotesBlock> {
        let text = present(&order.notes)?;
        let mut lines = wrap_text(text, NOTES_WRAP_COLUMNS);
        lines.truncate(MAX_NOTE_LINES);

        Some(NotesBlock { heading: self.t("invoice.notes"), lines })
    }

    fn footer(&self, settings: Option<&SiteSettings>) -> Footer {
        let normal = |text: String| FooterLine { text, style: FooterStyle::Normal };
        let italic = |text: String| FooterLine { text, style: FooterStyle::Italic };
        let mut lines = Vec::new();

        match settings.and_then(|s| s.invoice.as_ref()) {
            Some(inv) => {
                let legal: Vec<String> = [("NIF", &inv.nif), ("NIS", &inv.nis), ("RC", &inv.rc)]
                    .into_iter()
                    .filter_map(|(label, value)| present(value).map(|v| format!("{}: {}", label, v)))
                    .collect();
                if !legal.is_empty() {
                    lines.push(normal(legal.join(LEGAL_SEPARATOR)));
                }

                let address: Vec<&str> =
                    [&inv.address, &inv.wilaya].into_iter().filter_map(present).collect();
                if !address.is_empty() {
                    lines.push(normal(address.join(", ")));
                }

                let mut contact = Vec::new();
                if let Some(phone) = present(&inv.phone) {
                    contact.push(format!("{}: {}", self.t("invoice.phone"), phone));
                }
                if let Some(email) = present(&inv.email) {
                    contact.push(email.to_string());
                }
                if !contact.is_empty() {
                    lines.push(normal(contact.join(LEGAL_SEPARATOR)));
                }

                if let Some(note) = present(&inv.footer_note) {
                    lines.push(italic(note.to_string()));
                }
            }
            None => {
                lines.push(italic(self.t("invoice.thanks")));
                if let Some(phone) = settings.and_then(|s| present(&s.contact_phone)) {
                    lines.push(normal(format!("{}: {}", self.t("invoice.contact"), phone)));
                }
            }
        }

        Footer { lines }
    }
}

/// Quebra gulosa por palavras; palavras maiores que a largura são partidas.
/// Data do pedido no fuso da loja, "dd/mm/aaaa".
pub fn local_date(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(ALGERIA_UTC_OFFSET_SECS) {
        Some(tz) => at.with_timezone(&tz).format("%d/%m/%Y").to_string(),
        None => at.format("%d/%m/%Y").to_string(),
    }
}

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
