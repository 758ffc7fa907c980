use crate::error::ReportError;
use crate::layout::{
    GRID, GRID_WIDTH, PAGE_HEIGHT, PAGE_WIDTH, PageLayout, PlacedRow, ReportLayout, Rgb, TextLine,
};
use crate::metrics::FontFace;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt, Rect,
};

const LAYER_NAME: &str = "Relatório";

/// The two faces a report uses, registered once per document.
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

/// Draws `layout` and returns the serialized PDF.
pub fn render_pdf(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(layout.title.as_str(), mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for page in &layout.pages {
        let (page_index, layer_index) = if page.number == 1 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME)
        };
        let canvas = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&canvas, page, layout, &fonts);
    }

    tracing::debug!(pages = layout.pages.len(), "Rendered report PDF.");
    Ok(doc.save_to_bytes()?)
}

fn draw_page(canvas: &PdfLayerReference, page: &PageLayout, layout: &ReportLayout, fonts: &Fonts) {
    for line in &page.text {
        draw_text(canvas, line, fonts);
    }
    for row in &page.rows {
        draw_row(canvas, row, layout);
        for line in &row.text {
            draw_text(canvas, line, fonts);
        }
    }
}

fn draw_row(canvas: &PdfLayerReference, row: &PlacedRow, layout: &ReportLayout) {
    let left = layout.columns[0].x;
    let last = layout.columns[layout.columns.len() - 1];
    let right = last.x + last.width;
    let top = row.top;
    let bottom = row.top + row.height;

    canvas.set_fill_color(color(row.background));
    canvas.add_rect(
        Rect::new(mm(left), mm(flip(bottom)), mm(right), mm(flip(top)))
            .with_mode(PaintMode::Fill),
    );

    canvas.set_outline_color(color(GRID));
    canvas.set_outline_thickness(GRID_WIDTH);
    segment(canvas, (left, top), (right, top));
    segment(canvas, (left, bottom), (right, bottom));
    segment(canvas, (left, top), (left, bottom));
    segment(canvas, (right, top), (right, bottom));
    if row.column_borders {
        for column in &layout.columns[1..] {
            segment(canvas, (column.x, top), (column.x, bottom));
        }
    }
}

fn draw_text(canvas: &PdfLayerReference, line: &TextLine, fonts: &Fonts) {
    canvas.set_fill_color(color(line.color));
    canvas.use_text(
        line.text.as_str(),
        line.size,
        mm(line.x),
        mm(flip(line.baseline)),
        fonts.get(line.face),
    );
}

fn segment(canvas: &PdfLayerReference, from: (f32, f32), to: (f32, f32)) {
    canvas.add_line(Line {
        points: vec![
            (Point::new(mm(from.0), mm(flip(from.1))), false),
            (Point::new(mm(to.0), mm(flip(to.1))), false),
        ],
        is_closed: false,
    });
}

/// Layout y grows downwards from the top edge, PDF y upwards from the bottom.
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.r) / 255.0,
        f32::from(rgb.g) / 255.0,
        f32::from(rgb.b) / 255.0,
        None,
    ))
}
