use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Text in WinAnsiEncoding. Accented Spanish letters map one to one;
/// anything outside Latin-1 becomes `?`, except a few typographic marks.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '–' => 0x96,
            '—' => 0x97,
            '→' => b'>',
            c if (c as u32) < 0x100 => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// An invoice page: letterhead, bill-to block, one line item and totals.
#[derive(Debug, Clone, Default)]
pub struct InvoicePage {
    pub letterhead: Vec<String>,
    pub note: Option<String>,
    pub number: String,
    pub issued: String,
    pub bill_to: Vec<String>,
    pub item: String,
    pub qty: String,
    pub rate: String,
    pub amount: String,
    pub paid: bool,
    pub paid_on: Option<String>,
    pub balance_due: String,
}

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);
        let next_id = 5;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_font_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            next_id,
            font_id,
            bold_font_id,

            font_size: 9.0,
            header_font_size: 10.0,
            title_font_size: 14.0,
        }
    }

    /// Landscape pages fit wide tables.
    pub fn landscape(mut self) -> Self {
        std::mem::swap(&mut self.page_w, &mut self.page_h);
        self
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(FONT_REGULAR, self.font_id);
        fonts.pair(FONT_BOLD, self.bold_font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn draw_text_with(&self, content: &mut Content, font: Name, x: f32, y: f32, size: f32, text: &str) {
        let bytes = win_ansi(text);
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        self.draw_text_with(content, FONT_REGULAR, x, y, size, text);
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn fill_band(&self, content: &mut Content, y: f32, w: f32, rgb: (f32, f32, f32)) {
        content.save_state();
        content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
        content.rect(self.margin, y, w, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        row: &[String],
        font: Name,
        font_size: f32,
    ) {
        let mut x = self.margin;

        for (i, text) in row.iter().enumerate() {
            let w = col_widths.get(i).copied().unwrap_or(0.0);
            let max_chars = ((w - 6.0) / (font_size * 0.55)).max(1.0) as usize;
            let shown = if text.chars().count() > max_chars {
                let mut s: String = text.chars().take(max_chars.saturating_sub(1)).collect();
                s.push('.');
                s
            } else {
                text.clone()
            };
            self.draw_text_with(content, font, x + 3.0, y + 6.0, font_size, &shown);
            self.draw_cell_borders(content, x, y, w, self.row_h);
            x += w;
        }
    }

    /// Column widths from headers and content, scaled to the page.
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * 6.0 + 8.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (cell.chars().count() as f32 * 5.2 + 8.0).max(*w);
                }
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;

        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_header_footer(&self, content: &mut Content, title: &str, page: usize) {
        self.draw_text_with(
            content,
            FONT_BOLD,
            self.margin,
            self.page_h - self.margin + 15.0,
            self.title_font_size,
            title,
        );

        let pg = format!("Página {}", page);
        self.draw_text(
            content,
            self.page_w - self.margin - 60.0,
            self.margin - 35.0,
            self.font_size,
            &pg,
        );
    }

    /// Multi-page table with a title. The last `footer_rows` rows are drawn
    /// bold, as totals.
    pub fn write_table(
        &mut self,
        title: &str,
        headers: &[String],
        rows: &[Vec<String>],
        footer_rows: usize,
    ) {
        let col_widths = self.compute_col_widths(headers, rows);
        let table_w: f32 = col_widths.iter().sum();
        let first_footer = rows.len().saturating_sub(footer_rows);

        let mut start = 0;
        let mut page_idx = 1;

        // an empty table still gets one page with its header
        loop {
            let mut content = self.new_page();
            self.draw_page_header_footer(&mut content, title, page_idx);

            let mut y = self.page_h - self.margin - 30.0;

            self.fill_band(&mut content, y, table_w, (0.85, 0.87, 0.90));
            self.draw_row(&mut content, y, &col_widths, headers, FONT_BOLD, self.header_font_size);
            y -= self.row_h;

            let mut i = start;
            while i < rows.len() && y - self.row_h >= self.margin {
                let footer = i >= first_footer;
                if footer {
                    self.fill_band(&mut content, y, table_w, (0.85, 0.85, 0.85));
                } else if i % 2 == 0 {
                    self.fill_band(&mut content, y, table_w, (0.96, 0.96, 0.96));
                }

                let font = if footer { FONT_BOLD } else { FONT_REGULAR };
                self.draw_row(&mut content, y, &col_widths, &rows[i], font, self.font_size);

                y -= self.row_h;
                i += 1;
            }

            self.finalize_page(content);
            start = i;
            page_idx += 1;

            if start >= rows.len() {
                break;
            }
        }
    }

    /// One page per invoice.
    pub fn write_invoice(&mut self, inv: &InvoicePage) {
        let mut content = self.new_page();
        let left = self.margin;
        let right = self.page_w - self.margin;
        let mut y = self.page_h - self.margin;

        // letterhead
        for (i, line) in inv.letterhead.iter().enumerate() {
            let (font, size) = if i == 0 {
                (FONT_BOLD, self.title_font_size)
            } else {
                (FONT_REGULAR, self.font_size + 1.0)
            };
            self.draw_text_with(&mut content, font, left, y, size, line);
            y -= if i == 0 { 18.0 } else { 13.0 };
        }

        // number and date on the right
        let top = self.page_h - self.margin;
        self.draw_text_with(&mut content, FONT_BOLD, right - 170.0, top, self.title_font_size, "FACTURA");
        self.draw_text(&mut content, right - 170.0, top - 18.0, self.header_font_size, &format!("No. {}", inv.number));
        self.draw_text(&mut content, right - 170.0, top - 32.0, self.header_font_size, &format!("Fecha: {}", inv.issued));

        // bill to
        y -= 20.0;
        self.draw_text_with(&mut content, FONT_BOLD, left, y, self.header_font_size, "Facturar a:");
        y -= 14.0;
        for line in &inv.bill_to {
            self.draw_text(&mut content, left, y, self.header_font_size, line);
            y -= 13.0;
        }

        // line item
        y -= 20.0;
        let headers: Vec<String> = ["Descripción", "Cant.", "Precio", "Importe"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let usable = right - left;
        let widths = [usable * 0.55, usable * 0.15, usable * 0.15, usable * 0.15];

        self.fill_band(&mut content, y, usable, (0.85, 0.87, 0.90));
        self.draw_row(&mut content, y, &widths, &headers, FONT_BOLD, self.header_font_size);
        y -= self.row_h;
        let row = vec![
            inv.item.clone(),
            inv.qty.clone(),
            inv.rate.clone(),
            inv.amount.clone(),
        ];
        self.draw_row(&mut content, y, &widths, &row, FONT_REGULAR, self.header_font_size);

        // totals
        y -= 30.0;
        let label_x = right - 200.0;
        self.draw_text(&mut content, label_x, y, self.header_font_size, "Total:");
        self.draw_text(&mut content, right - 80.0, y, self.header_font_size, &inv.amount);
        y -= 15.0;
        let status = if inv.paid {
            match &inv.paid_on {
                Some(d) => format!("Pagada el {}", d),
                None => "Pagada".to_string(),
            }
        } else {
            "Pendiente".to_string()
        };
        self.draw_text(&mut content, label_x, y, self.header_font_size, &status);
        y -= 15.0;
        self.draw_text_with(&mut content, FONT_BOLD, label_x, y, self.header_font_size, "Saldo:");
        self.draw_text_with(&mut content, FONT_BOLD, right - 80.0, y, self.header_font_size, &inv.balance_due);

        if let Some(note) = &inv.note {
            self.draw_text(&mut content, left, self.margin, self.font_size, note);
        }

        self.finalize_page(content);
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}
