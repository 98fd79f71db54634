use std::{fs, path::Path};

use itertools::Itertools;
use jiff::civil::Date;
use log::info;
use plotly::{
    box_plot::BoxPlot,
    common::{Mode, Title},
    layout::{Axis, GridPattern, LayoutGrid},
    Layout, Plot, Scatter,
};

use crate::error::Result;
use crate::preprocess::EngineeredRow;

/// Mean renewables percentage for each day, skipping the hours without a
/// value.  Rows are expected sorted by timestamp.
pub fn daily_mean_pct(rows: &[EngineeredRow]) -> Vec<(Date, f64)> {
    rows.iter()
        .chunk_by(|row| row.timestamp.date())
        .into_iter()
        .map(|(day, group)| {
            let values: Vec<f64> = group
                .map(|row| row.renewables_pct)
                .filter(|x| !x.is_nan())
                .collect();
            let mean = if values.is_empty() {
                f64::NAN
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            (day, mean)
        })
        .collect()
}

/// Daily mean of the renewables share on top, its distribution by hour
/// ending below.
pub fn history_plot(rows: &[EngineeredRow]) -> Plot {
    let daily = daily_mean_pct(rows);
    let mut plot = Plot::new();
    let trace0 = Scatter::new(
        daily.iter().map(|(day, _)| day.to_string()).collect_vec(),
        daily.iter().map(|(_, mean)| *mean).collect_vec(),
    )
    .mode(Mode::Markers)
    .name("Daily mean");
    plot.add_trace(trace0);

    let trace1 = BoxPlot::new_xy(
        rows.iter().map(|row| row.hour).collect_vec(),
        rows.iter().map(|row| row.renewables_pct).collect_vec(),
    )
    .name("By hour")
    .x_axis("x2")
    .y_axis("y2");
    plot.add_trace(trace1);

    plot.set_layout(
        Layout::new()
            .grid(
                LayoutGrid::new()
                    .rows(2)
                    .columns(1)
                    .pattern(GridPattern::Independent),
            )
            .y_axis(Axis::new().title(Title::with_text("Renewables Power Production (%)")))
            .x_axis2(Axis::new().title(Title::with_text("Hour")))
            .y_axis2(Axis::new().title(Title::with_text(
                "Renewables Power Production (%) grouped by Hour",
            )))
            .show_legend(false)
            .width(1200)
            .height(900),
    );
    plot
}

/// Write the plot as a standalone html file.
pub fn write_history_plot(rows: &[EngineeredRow], path: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        fs::create_dir_all(dir)?;
    }
    history_plot(rows).write_html(path);
    info!("Saved data plot as {}", path);
    Ok(())
}
