use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 5.5;
const FONT_SIZE_PT: f32 = 11.0;

/// Lays plain text out on A4 pages in Helvetica
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    wrap_at: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self { wrap_at: 90 }
    }
}

impl PdfRenderer {
    pub fn new(wrap_at: usize) -> Self {
        Self {
            wrap_at: wrap_at.max(1),
        }
    }

    fn lines_per_page() -> usize {
        ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize
    }

    /// Renders `text` into PDF bytes. Blocking: call from a blocking thread.
    pub fn render(&self, title: &str, text: &str) -> Result<Vec<u8>, printpdf::Error> {
        let lines = wrap_text(text, self.wrap_at);

        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let mut current = doc.get_page(page).get_layer(layer);
        for (index, line) in lines.iter().enumerate() {
            let row = index % Self::lines_per_page();
            if index > 0 && row == 0 {
                let (page, layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                current = doc.get_page(page).get_layer(layer);
            }
            if line.is_empty() {
                continue;
            }
            let y = PAGE_HEIGHT_MM - MARGIN_MM - row as f32 * LINE_HEIGHT_MM;
            current.use_text(line.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }

        doc.save_to_bytes()
    }
}

/// Greedy word wrap; words longer than `width` are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                lines.push(word.drain(..width).collect());
            }

            let word_len = word.len();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word);
            line_len += word_len;
        }

        lines.push(line);
    }
    lines
}
