// src/services/document_service.rs

use genpdf::{elements, style, Alignment, Element};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::{OrdersRepository, SettingsRepository},
    services::invoice::{FooterStyle, InvoiceComposer, InvoiceLayout},
};

/// Cor de destaque da marca (nome da loja e nota de rodapé).
const BRAND_COLOR: style::Color = style::Color::Rgb(93, 64, 55);
const MUTED_COLOR: style::Color = style::Color::Rgb(100, 100, 100);

pub struct RenderedInvoice {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    orders_repo: OrdersRepository,
    settings_repo: SettingsRepository,
    font_dir: String,
    font_family: String,
}

impl DocumentService {
    pub fn new(
        orders_repo: OrdersRepository,
        settings_repo: SettingsRepository,
        font_dir: String,
        font_family: String,
    ) -> Self {
        Self { orders_repo, settings_repo, font_dir, font_family }
    }

    pub async fn generate_invoice_pdf<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        lang: &str,
        i18n: &I18nStore,
    ) -> Result<RenderedInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Busca os dados (snapshot do pedido + configurações)
        let order = self
            .orders_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;
        let settings = self.settings_repo.get_settings(&mut *tx).await?;

        tx.commit().await?;

        // 2. Monta o layout
        let layout = InvoiceComposer::new(i18n, lang).compose(&order, Some(&settings))?;

        // 3. Renderiza
        let bytes = self.render(&layout)?;
        tracing::info!(
            "🧾 Fatura {} gerada: total {} ({} bytes)",
            layout.file_name,
            layout.totals.total.amount,
            bytes.len()
        );

        Ok(RenderedInvoice { file_name: layout.file_name, bytes })
    }

    /// Desenha os blocos na ordem do layout.
    pub fn render(&self, layout: &InvoiceLayout) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.font_dir, &self.font_family, None)
            .map_err(|_| {
                AppError::FontNotFound(format!(
                    "Fonte '{}' não encontrada em {}",
                    self.font_family, self.font_dir
                ))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} {}", layout.header.title, layout.header.reference));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        let bold = style::Style::new().bold();
        let small = style::Style::new().with_font_size(9);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(layout.header.store_name.as_str())
                .styled(bold.with_font_size(24).with_color(BRAND_COLOR)),
        );
        doc.push(
            elements::Paragraph::new(layout.header.title.as_str())
                .styled(bold.with_font_size(18)),
        );
        let mut reference = elements::Paragraph::new(layout.header.reference.as_str());
        reference.set_alignment(Alignment::Right);
        doc.push(reference.styled(style::Style::new().with_font_size(10)));
        let mut date = elements::Paragraph::new(layout.header.date.as_str());
        date.set_alignment(Alignment::Right);
        doc.push(date.styled(style::Style::new().with_font_size(10)));

        doc.push(elements::Break::new(1.5));

        // --- FATURADO A ---
        doc.push(
            elements::Paragraph::new(layout.bill_to.heading.as_str())
                .styled(bold.with_font_size(11)),
        );
        for line in &layout.bill_to.lines {
            doc.push(
                elements::Paragraph::new(line.as_str()).styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        // --- ITEM ---
        doc.push(
            elements::Paragraph::new(layout.line_item.heading.as_str())
                .styled(bold.with_font_size(11)),
        );

        // Pesos: Produto (4), Cor (2), Qtd (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 2, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let mut header_row = table.row();
        for column in &layout.line_item.columns {
            header_row.push_element(
                elements::Paragraph::new(column.as_str()).styled(bold.with_font_size(9)),
            );
        }
        header_row
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let mut item_row = table.row();
        for value in &layout.line_item.row {
            item_row.push_element(elements::Paragraph::new(value.as_str()).styled(small));
        }
        item_row
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- TOTAIS ---
        let totals = &layout.totals;
        for line in [&totals.subtotal, &totals.delivery] {
            let mut p = elements::Paragraph::new(format!("{}: {}", line.label, line.text));
            p.set_alignment(Alignment::Right);
            doc.push(p.styled(style::Style::new().with_font_size(10)));
        }
        doc.push(elements::Break::new(0.5));
        let mut total = elements::Paragraph::new(format!("{}: {}", totals.total.label, totals.total.text));
        total.set_alignment(Alignment::Right);
        doc.push(total.styled(bold.with_font_size(12)));

        doc.push(elements::Break::new(1.5));

        // --- STATUS ---
        doc.push(
            elements::Paragraph::new(layout.status_line.as_str())
                .styled(small.with_color(MUTED_COLOR)),
        );

        // --- NOTAS ---
        if let Some(notes) = &layout.notes {
            doc.push(elements::Break::new(1));
            doc.push(elements::Paragraph::new(notes.heading.as_str()).styled(bold.with_font_size(9)));
            for line in &notes.lines {
                doc.push(
                    elements::Paragraph::new(line.as_str())
                        .styled(style::Style::new().with_font_size(8)),
                );
            }
        }

        // --- RODAPÉ ---
        doc.push(elements::Break::new(3));
        for line in &layout.footer.lines {
            let line_style = match line.style {
                FooterStyle::Normal => style::Style::new().with_font_size(8).with_color(MUTED_COLOR),
                FooterStyle::Italic => style::Style::new().italic().with_font_size(9).with_color(BRAND_COLOR),
            };
            let mut p = elements::Paragraph::new(line.text.as_str());
            p.set_alignment(Alignment::Center);
            doc.push(p.styled(line_style));
        }

        // Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
