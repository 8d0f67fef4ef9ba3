// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render figures with `plotters`.

use std::{ops::Range, path::Path, str::FromStr};

use image::ImageFormat;
use log::{debug, info};
use plotters::{
    coord::Shift,
    prelude::*,
    style::{Color, RGBColor},
};

use super::{Colour, Figure, FigureSaver, LegendPosition, OutputFormat, PlotError, SeriesKind};
use crate::constants::{X_PIXELS, Y_PIXELS};

/// The space between the top of the root area and the axes [pixels]. The
/// legend is drawn in here.
const TOP_MARGIN: u32 = 220;
const LEGEND_FONT_SIZE: u32 = 40;
const LEGEND_MARGIN: u32 = 10;
/// The width reserved for each legend entry's marker [pixels].
const LEGEND_MARKER_WIDTH: u32 = 60;

/// Writes figures as raster images or SVGs. Raster images are encoded in the
/// requested format regardless of the output file's extension.
#[derive(Debug, Clone, Copy)]
pub struct PlottersSaver {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersSaver {
    fn default() -> Self {
        Self {
            width: X_PIXELS,
            height: Y_PIXELS,
        }
    }
}

impl FigureSaver for PlottersSaver {
    fn save(&self, figure: &Figure, path: &Path, format: &str) -> Result<(), PlotError> {
        let output_format = OutputFormat::from_str(&format.to_lowercase())
            .map_err(|_| PlotError::UnsupportedFormat(format.to_string()))?;
        let (x_range, y_range) = figure.axis_ranges()?;
        debug!(
            "Rendering {output_format} plot with x range {x_range:?} and y range {y_range:?}"
        );

        let size = (self.width, self.height);
        let image_format = match output_format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_figure(&root, figure, x_range, y_range)?;
                root.present().map_err(draw_err)?;
                info!("Wrote {}", path.display());
                return Ok(());
            }
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
        };

        let mut buffer = vec![0_u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            draw_figure(&root, figure, x_range, y_range)?;
            root.present().map_err(draw_err)?;
        }
        image::save_buffer_with_format(
            path,
            &buffer,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image_format,
        )?;

        info!("Wrote {}", path.display());
        Ok(())
    }
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Draw(e.to_string())
}

fn rgb(c: Colour) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let (y_min, y_max) = (y_range.start, y_range.end);
    let mut builder = ChartBuilder::on(root);
    if let Some(title) = &figure.title {
        builder.caption(title, ("sans-serif", 60));
    }
    let mut cc = builder
        .margin(40)
        .margin_top(TOP_MARGIN)
        .x_label_area_size(120)
        .y_label_area_size(220)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err)?;

    cc.configure_mesh()
        .light_line_style(WHITE)
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .label_style(("sans-serif", 40))
        .axis_desc_style(("sans-serif", 48))
        .draw()
        .map_err(draw_err)?;

    for span in &figure.spans {
        let style = rgb(span.colour).mix(span.alpha).filled();
        let anno = cc
            .draw_series(std::iter::once(Rectangle::new(
                [(span.x_min, y_min), (span.x_max, y_max)],
                style,
            )))
            .map_err(draw_err)?;
        if let Some(label) = &span.label {
            anno.label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 12), (x + 40, y + 12)], style));
        }
    }

    for series in &figure.series {
        let colour = rgb(series.colour);
        let points = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        match series.kind {
            SeriesKind::Line => {
                let style = colour.stroke_width(2);
                let anno = cc
                    .draw_series(LineSeries::new(points, style))
                    .map_err(draw_err)?;
                if let Some(label) = &series.label {
                    anno.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 40, y)], style)
                    });
                }
            }
            SeriesKind::Markers { size } => {
                let style = colour.filled();
                let anno = cc
                    .draw_series(points.map(|p| Circle::new(p, size, style)))
                    .map_err(draw_err)?;
                if let Some(label) = &series.label {
                    anno.label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 20, y), size, style));
                }
            }
        }
    }

    if let Some(legend) = figure.legend {
        if figure.labels().next().is_some() {
            let labels: Vec<&str> = figure.labels().collect();
            let (width, _) = cc.plotting_area().dim_in_pixel();
            let (x, y) = legend_anchor(legend.position, &labels, width);
            cc.configure_series_labels()
                .position(SeriesLabelPosition::Coordinate(x, y))
                .margin(LEGEND_MARGIN)
                .legend_area_size(LEGEND_MARKER_WIDTH)
                .label_font(("sans-serif", LEGEND_FONT_SIZE))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }
    }

    Ok(())
}

/// Where the top-left corner of the legend goes, relative to the top-left
/// corner of the axes. Plotters only knows the legend's size once it has
/// laid out the text, so the size is estimated from the labels. The legend
/// always sits in the top margin, above the axes.
pub(super) fn legend_anchor(
    position: LegendPosition,
    labels: &[&str],
    plot_width: u32,
) -> (i32, i32) {
    // Average glyph width and line height of the legend font.
    let char_width = (LEGEND_FONT_SIZE * 11 / 20) as i32;
    let line_height = (LEGEND_FONT_SIZE * 6 / 5) as i32;
    let margin = LEGEND_MARGIN as i32;

    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let width = longest * char_width + LEGEND_MARKER_WIDTH as i32 + 2 * margin;
    let height = labels.len() as i32 * line_height + 2 * margin;

    let plot_width = plot_width as i32;
    let x = match position {
        LegendPosition::AboveRight => plot_width - width,
        LegendPosition::AboveCentre => (plot_width - width) / 2,
    };
    // Keep a gap between the legend and the axes, but don't leave the image.
    let y = (-height - 2 * margin).max(-(TOP_MARGIN as i32) + 5);
    (x.max(0), y)
}
