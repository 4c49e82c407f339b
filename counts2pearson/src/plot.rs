use std::{fs, path::Path};

use anyhow::Context;
use plotters::prelude::*;

use pars_core::linear_fit;

use crate::process::GeneCor;

/// Write `<dir>/<gene>.svg` for every transcript with a defined correlation.
/// `axes` holds the labels of the two input files.
pub fn plot_genes(dir: &Path, v: &[GeneCor], axes: &(String, String)) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create plot directory {}", dir.display()))?;
    let mut n = 0;
    for g in v.iter().filter(|g| g.cor.is_defined()) {
        let path = dir.join(format!("{}.svg", file_stem(&g.gene)));
        plot_gene(&path, g, axes)
            .with_context(|| format!("Error writing plot to {}", path.display()))?;
        n += 1;
    }
    debug!("{} plots written", n);
    Ok(())
}

/// Transcript ids may contain path separators
fn file_stem(gene: &str) -> String {
    gene.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

fn axis_range(v: &[f64]) -> (f64, f64) {
    let lo = v.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() {
        (0.0, 1.0)
    } else if hi > lo {
        let m = (hi - lo) * 0.05;
        (lo - m, hi + m)
    } else {
        (lo - 1.0, lo + 1.0)
    }
}

/// Scatter plot of the compared values with the least squares line
pub fn plot_gene(path: &Path, g: &GeneCor, axes: &(String, String)) -> anyhow::Result<()> {
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = axis_range(&g.x);
    let (y0, y1) = axis_range(&g.y);
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Correlation of PARS scores for {}", g.gene),
            ("sans-serif", 22),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart
        .configure_mesh()
        .x_desc(format!("PARS from {}", axes.0))
        .y_desc(format!("PARS from {}", axes.1))
        .draw()?;

    chart.draw_series(
        g.x.iter()
            .zip(g.y.iter())
            .map(|(x, y)| Circle::new((*x, *y), 2, BLUE.filled())),
    )?;

    if let Some((a, b)) = linear_fit(&g.x, &g.y) {
        chart
            .draw_series(LineSeries::new(
                [x0, x1].into_iter().map(|x| (x, a * x + b)),
                &RED,
            ))?
            .label(format!(
                "y={:.3}x{:+.3}; r={:.3}; P={:.3e}",
                a, b, g.cor.r, g.cor.p
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    root.present()?;
    Ok(())
}
