use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

use crate::stats::{CategoryShare, TrendPoint};

const CHART_SIZE: (u32, u32) = (960, 540);
const PIE_SIZE: (u32, u32) = (720, 540);

const CUMULATIVE_COLOR: RGBColor = RGBColor(46, 139, 87);
const DAILY_COLOR: RGBColor = RGBColor(255, 165, 0);
const LEVEL_COLOR: RGBColor = RGBColor(68, 1, 84);

/// Cumulative line over a daily bar series: shared date axis, cumulative
/// count on the left axis, per-date count on the right.
pub fn trend_chart(points: &[TrendPoint]) -> anyhow::Result<String> {
    if points.is_empty() {
        return blank_chart(CHART_SIZE);
    }

    let n = points.len();
    let cumulative_max = points.last().map(|p| p.cumulative).unwrap_or(0).max(1) as i32;
    let daily_max = points.iter().map(|p| p.daily).max().unwrap_or(0).max(1) as i32;
    let dates: Vec<String> = points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Solved problems over time", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(52)
            .y_label_area_size(52)
            .right_y_label_area_size(52)
            .build_cartesian_2d(-0.6f64..(n as f64 - 0.4), 0i32..cumulative_max + 1)?
            .set_secondary_coord(-0.6f64..(n as f64 - 0.4), 0i32..daily_max + 1);

        let date_label = |x: &f64| -> String {
            let idx = x.round();
            if (x - idx).abs() > 0.25 || idx < 0.0 {
                return String::new();
            }
            dates.get(idx as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n.min(10))
            .x_label_formatter(&date_label)
            .x_desc("Date")
            .y_desc("Cumulative Count")
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc("Daily Count")
            .draw()?;

        chart.draw_secondary_series(points.iter().enumerate().map(|(i, p)| {
            Rectangle::new(
                [(i as f64 - 0.4, 0), (i as f64 + 0.4, p.daily as i32)],
                DAILY_COLOR.mix(0.5).filled(),
            )
        }))?;
        chart.draw_series(LineSeries::new(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.cumulative as i32)),
            CUMULATIVE_COLOR.stroke_width(2),
        ))?;

        root.present()?;
    }

    Ok(svg)
}

/// Category proportions as a pie. Each slice label carries the category
/// name and its share of all records to one decimal place.
pub fn category_pie(shares: &[CategoryShare]) -> anyhow::Result<String> {
    if shares.is_empty() {
        return blank_chart(PIE_SIZE);
    }

    let sizes: Vec<f64> = shares.iter().map(|s| s.count as f64).collect();
    let colors: Vec<RGBColor> = (0..shares.len()).map(palette_color).collect();
    let labels: Vec<String> = shares
        .iter()
        .map(|s| format!("{} {:.1}%", s.category, s.percent))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let dims = root.dim_in_pixel();
        let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
        let radius = f64::from(dims.0.min(dims.1)) * 0.32;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
        root.draw(&pie)?;

        root.present()?;
    }

    Ok(svg)
}

/// One bar per distinct difficulty value present, ascending by value.
pub fn difficulty_chart(counts: &[(i64, usize)]) -> anyhow::Result<String> {
    if counts.is_empty() {
        return blank_chart(CHART_SIZE);
    }

    let n = counts.len();
    let count_max = counts.iter().map(|&(_, count)| count).max().unwrap_or(0).max(1) as i32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Problems per difficulty level", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(52)
            .y_label_area_size(52)
            .build_cartesian_2d((0i32..n as i32).into_segmented(), 0i32..count_max + 1)?;

        let level_label = |x: &SegmentValue<i32>| -> String {
            match x {
                SegmentValue::CenterOf(i) if *i >= 0 => counts
                    .get(*i as usize)
                    .map(|(level, _)| level.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            }
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&level_label)
            .x_desc("Level")
            .y_desc("Count")
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(LEVEL_COLOR.mix(0.8).filled())
                .margin(6)
                .data(
                    counts
                        .iter()
                        .enumerate()
                        .map(|(i, &(_, count))| (i as i32, count as i32)),
                ),
        )?;

        root.present()?;
    }

    Ok(svg)
}

fn blank_chart(size: (u32, u32)) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        root.present()?;
    }
    Ok(svg)
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}
