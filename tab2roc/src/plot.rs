use std::path::Path;

use plotters::{coord::Shift, prelude::*};

use crate::process::PairCurve;

const PANEL_SIZE: (u32, u32) = (640, 420);

/// Draw one panel per file pair, arranged as the upper triangle of an
/// (n-1) x (n-1) grid.  Each panel shows rho (left axis) and the number
/// of compared genes (right axis) against the load threshold.
pub fn plot_curves(path: &Path, n_files: usize, curves: &[PairCurve]) -> anyhow::Result<()> {
    let k = n_files.saturating_sub(1).max(1);
    let root = SVGBackend::new(path, (PANEL_SIZE.0 * k as u32, PANEL_SIZE.1 * k as u32))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((k, k));
    for c in curves.iter() {
        draw_panel(&panels[c.i * k + c.j - 1], c)?
    }
    root.present()?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, c: &PairCurve) -> anyhow::Result<()> {
    let x0 = c.points.first().map(|p| p.load).unwrap_or(0.0);
    let x1 = c.points.last().map(|p| p.load).unwrap_or(0.0).max(x0 + 1.0);
    let y0 = if c.points.iter().any(|p| p.rho < 0.0) {
        -1.0
    } else {
        0.0
    };
    let g_max = c.points.iter().map(|p| p.genes).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(&c.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..1.0)?
        .set_secondary_coord(x0..x1, 0.0..g_max);

    chart
        .configure_mesh()
        .x_desc("LOAD")
        .y_desc("Spearman correlation coefficient [rho]")
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("No. of genes")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            c.points
                .iter()
                .filter(|p| p.rho.is_finite())
                .map(|p| (p.load, p.rho)),
            &BLUE,
        ))?
        .label("Rho")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_secondary_series(LineSeries::new(
            c.points.iter().map(|p| (p.load, p.genes as f64)),
            &RED,
        ))?
        .label("Genes")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RocPoint;

    fn curve(i: usize, j: usize) -> PairCurve {
        PairCurve {
            i,
            j,
            title: format!("s{} vs s{}", i, j),
            points: [0.0, 0.5, 1.0]
                .iter()
                .enumerate()
                .map(|(k, l)| RocPoint {
                    load: *l,
                    genes: 30 - 10 * k,
                    positions: 300 - 100 * k,
                    rho: 0.6 + 0.1 * k as f64,
                    p: 1e-5,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_svg_with_one_panel_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roc.svg");
        let curves = vec![curve(0, 1), curve(0, 2), curve(1, 2)];
        plot_curves(&path, 3, &curves).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        for c in curves.iter() {
            assert!(svg.contains(&c.title), "missing panel {}", c.title);
        }
    }

    #[test]
    fn single_load_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.svg");
        let mut c = curve(0, 1);
        c.points.truncate(1);
        plot_curves(&path, 2, &[c]).unwrap();
        assert!(path.exists());
    }
}
