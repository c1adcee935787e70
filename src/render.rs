use super::chart::Chart;
use super::theme::Theme;
use super::PlotError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Image formats the chart can be saved as, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    /// svg for .svg, png for .png or no extension
    pub fn from_path(path: &Path) -> Result<ImageFormat, PlotError> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Ok(ImageFormat::Png),
            Some(ext) => match ext.to_ascii_lowercase().as_str() {
                "svg" => Ok(ImageFormat::Svg),
                "png" => Ok(ImageFormat::Png),
                other => Err(PlotError::UnsupportedFormat(other.to_string())),
            },
        }
    }
}

/// writes the chart to the given path, the format follows the extension
pub fn save(chart: &Chart, theme: &Theme, fout: &Path) -> Result<(), PlotError> {
    let format = ImageFormat::from_path(fout)?;
    log::info!("saving chart as {:?} to {}", format, fout.display());
    match format {
        ImageFormat::Svg => draw(
            SVGBackend::new(fout, theme.size).into_drawing_area(),
            chart,
            theme,
        ),
        ImageFormat::Png => save_png(chart, theme, fout),
    }
}

/// draws into a pixel buffer and encodes it explicitly,
/// so paths without a .png extension still get a png
fn save_png(chart: &Chart, theme: &Theme, fout: &Path) -> Result<(), PlotError> {
    let (width, height) = theme.size;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    draw(
        BitMapBackend::with_buffer(&mut pixels, theme.size).into_drawing_area(),
        chart,
        theme,
    )?;
    let img = image::RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        PlotError::Render("pixel buffer does not match the chart size".to_string())
    })?;
    img.save_with_format(fout, image::ImageFormat::Png)
        .map_err(render_error)
}

/// renders the chart as svg into memory
pub fn to_svg_string(chart: &Chart, theme: &Theme) -> Result<String, PlotError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, theme.size).into_drawing_area();
        draw(root, chart, theme)?;
    }
    Ok(buf)
}

fn render_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// largest magnitude kept on an axis whose span would overflow
const SATURATED: f64 = f64::MAX / 4.;

/// pads the range like the other plots, widens it when all values are equal
/// and clamps it when the span does not fit in an f64
fn padded(range: Option<(f64, f64)>, fraction: f64) -> (f64, f64) {
    match range {
        None => (0., 1.),
        Some((min, max)) if max <= min => {
            let half = (min.abs() * fraction).max(0.5).min(SATURATED);
            (min - half, max + half)
        }
        Some((min, max)) => {
            let (min, max) = if (max - min).is_finite() {
                (min, max)
            } else {
                (min.max(-SATURATED), max.min(SATURATED))
            };
            let margin = (max - min) * fraction;
            (min - margin, max + margin)
        }
    }
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &Chart,
    theme: &Theme,
) -> Result<(), PlotError> {
    let (xmin, xmax) = padded(chart.x_range(), 1. / 20.);
    let (ymin, ymax) = padded(chart.y_range(), 1. / 10.);
    let font = theme.font_family.as_str();

    root.fill(&theme.background).map_err(render_error)?;
    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title.as_str(), (font, theme.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)
        .map_err(render_error)?;
    ctx.plotting_area()
        .fill(&theme.face)
        .map_err(render_error)?;
    ctx.configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(theme.grid.stroke_width(2))
        .set_all_tick_mark_size(2)
        .label_style((font, theme.label_size))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(render_error)?;

    for (i, series) in chart.series.iter().enumerate() {
        let color = theme.series_color(i);
        let line = LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(theme.line_width),
        );
        ctx.draw_series(line)
            .map_err(render_error)?
            .label(format!("{}={}", chart.hue_label, series.label))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
    }
    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((font, theme.label_size))
            .draw()
            .map_err(render_error)?;
    }
    root.present().map_err(render_error)?;
    Ok(())
}
