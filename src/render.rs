use crate::analysis::{HeatCell, UsageAnalysis, ZoneReport, ZoneResult};
use crate::error::{HeatmapError, HmResult};
use crate::geometry::Bounds;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

/// Maps layout units (y grows upward) to canvas pixels (y grows downward).
#[derive(Debug, Clone, Copy)]
struct Canvas {
    origin_x: i32,
    top_y: i32,
    cols: i32,
    rows: i32,
    cell: i32,
    pad: i32,
}

impl Canvas {
    fn new(bounds: Option<Bounds>, cell_size: u32) -> Self {
        // The grid always includes the origin, like the layout coordinates it comes from.
        let b = bounds.unwrap_or(Bounds {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
        });
        let origin_x = b.min_x.min(0);
        let origin_y = b.min_y.min(0);
        let cell = cell_size as i32;

        Self {
            origin_x,
            top_y: b.max_y + 1,
            cols: b.max_x + 1 - origin_x,
            rows: b.max_y + 1 - origin_y,
            cell,
            pad: (cell / 2).max(1),
        }
    }

    /// Canvas size: the grid, padding, and one extra row for column labels.
    fn size(&self) -> (u32, u32) {
        let w = self.cols * self.cell + 2 * self.pad;
        let h = (self.rows + 1) * self.cell + 2 * self.pad;
        (w as u32, h as u32)
    }

    fn px(&self, x: f64) -> i32 {
        self.pad + ((x - self.origin_x as f64) * self.cell as f64).round() as i32
    }

    fn py(&self, y: f64) -> i32 {
        self.pad + ((self.top_y as f64 - y) * self.cell as f64).round() as i32
    }

    fn grid_center_x(&self) -> i32 {
        self.pad + self.cols * self.cell / 2
    }

    fn below_grid_y(&self) -> i32 {
        self.pad + self.rows * self.cell + self.cell / 2
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> HeatmapError {
    HeatmapError::Render(e.to_string())
}

/// Writes the heatmap as an SVG file.
pub fn render_svg<P: AsRef<Path>>(
    analysis: &UsageAnalysis,
    path: P,
    cell_size: u32,
) -> HmResult<()> {
    let path = path.as_ref();
    let canvas = Canvas::new(analysis.bounds, cell_size);
    {
        let root = SVGBackend::new(path, canvas.size()).into_drawing_area();
        draw(&root, analysis, &canvas)?;
        root.present().map_err(render_err)?;
    }
    info!("🖼️  Heatmap written to {}", path.display());
    Ok(())
}

/// Renders the heatmap SVG into memory.
pub fn render_svg_string(analysis: &UsageAnalysis, cell_size: u32) -> HmResult<String> {
    let canvas = Canvas::new(analysis.bounds, cell_size);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, canvas.size()).into_drawing_area();
        draw(&root, analysis, &canvas)?;
        root.present().map_err(render_err)?;
    }
    Ok(buf)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    analysis: &UsageAnalysis,
    canvas: &Canvas,
) -> HmResult<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(render_err)?;

    for cell in &analysis.cells {
        draw_cell(root, cell, canvas)?;
    }

    let label_font = (canvas.cell as f64 * 0.3).max(6.0);
    let label_style = TextStyle::from(("sans-serif", label_font).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    draw_zone_labels(root, &analysis.rows, &label_style, |r| {
        (canvas.grid_center_x(), canvas.py(r.anchor + 0.5))
    })?;
    draw_zone_labels(root, &analysis.columns, &label_style, |r| {
        (canvas.px(r.anchor + 0.5), canvas.below_grid_y())
    })?;

    Ok(())
}

fn draw_cell<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cell: &HeatCell,
    canvas: &Canvas,
) -> HmResult<()>
where
    DB::ErrorType: 'static,
{
    let x = cell.pos.x as f64;
    let y = cell.pos.y as f64;
    let corners = [
        (canvas.px(x), canvas.py(y + 1.0)),
        (canvas.px(x + 1.0), canvas.py(y)),
    ];
    let fill = RGBColor(cell.color.r, cell.color.g, cell.color.b);

    root.draw(&Rectangle::new(corners, fill.filled()))
        .map_err(render_err)?;
    root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))
        .map_err(render_err)?;

    let key_font = (canvas.cell as f64 * 0.25).max(5.0);
    let key_style = TextStyle::from(("sans-serif", key_font).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let center = (canvas.px(x + 0.5), canvas.py(y + 0.5));

    root.draw(&Text::new(cell.key.clone(), center, key_style))
        .map_err(render_err)?;
    Ok(())
}

fn draw_zone_labels<DB, F>(
    root: &DrawingArea<DB, Shift>,
    report: &ZoneReport,
    style: &TextStyle,
    place: F,
) -> HmResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: Fn(&ZoneResult) -> (i32, i32),
{
    for result in report.iter() {
        let label = format!("{:.1}%", result.percentage);
        root.draw(&Text::new(label, place(result), style.clone()))
            .map_err(render_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_flips_y_axis() {
        let canvas = Canvas::new(
            Some(Bounds {
                min_x: 0,
                min_y: 0,
                max_x: 3,
                max_y: 1,
            }),
            10,
        );
        // y = 2 is the top edge of the grid, y = 0 the bottom edge.
        assert_eq!(canvas.py(2.0), canvas.pad);
        assert_eq!(canvas.py(0.0), canvas.pad + 20);
        assert_eq!(canvas.px(0.0), canvas.pad);
        assert_eq!(canvas.size(), (40 + 10, 30 + 10));
    }

    #[test]
    fn test_canvas_for_empty_layout_is_one_cell() {
        let canvas = Canvas::new(None, 8);
        assert_eq!((canvas.cols, canvas.rows), (1, 1));
    }
}
