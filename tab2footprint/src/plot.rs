use std::path::Path;

use plotters::prelude::*;

use crate::process::Profile;

const PANEL_SIZE: (u32, u32) = (900, 300);

/// Plot the enrichment profiles of each input file in its own panel.
/// `titles` has one entry per input file; all panels share the position axis.
pub fn plot_profiles(path: &Path, titles: &[String], profiles: &[Profile]) -> anyhow::Result<()> {
    let n = titles.len().max(1);
    let root = SVGBackend::new(path, (PANEL_SIZE.0, PANEL_SIZE.1 * n as u32)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = profiles.iter().map(|p| p.values.len()).max().unwrap_or(0).max(2) as f64;
    let y_max = profiles
        .iter()
        .flat_map(|p| p.values.iter())
        .fold(1.0f64, |m, x| m.max(*x))
        * 1.05;

    for (i, (area, title)) in root.split_evenly((n, 1)).iter().zip(titles.iter()).enumerate() {
        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(1.0..x_max, 0.0..y_max)?;
        let mut mesh = chart.configure_mesh();
        mesh.y_desc("Reads enrichment");
        if i + 1 == n {
            mesh.x_desc("Position");
        }
        mesh.draw()?;

        for (k, p) in profiles.iter().filter(|p| p.file == i).enumerate() {
            let colour = Palette99::pick(k).to_rgba();
            chart
                .draw_series(LineSeries::new(
                    p.values
                        .iter()
                        .enumerate()
                        .map(|(j, x)| ((j + 1) as f64, *x)),
                    &colour,
                ))?
                .label(&p.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_panel_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprint.svg");
        let profiles = vec![
            Profile {
                file: 0,
                label: "wt.tab:1".to_owned(),
                values: vec![0.5, 1.5, 1.0],
            },
            Profile {
                file: 0,
                label: "wt.tab:2".to_owned(),
                values: vec![1.0, 1.0, 1.0],
            },
            Profile {
                file: 1,
                label: "mut.tab".to_owned(),
                values: vec![2.0, 0.0, 1.0, 1.0],
            },
        ];
        let titles = vec!["wt".to_owned(), "mut".to_owned()];
        plot_profiles(&path, &titles, &profiles).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Reads enrichment"));
        assert!(svg.contains("wt.tab:2"));
        assert!(svg.contains("mut.tab"));
    }

    #[test]
    fn no_profiles_still_gives_a_plot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        plot_profiles(&path, &["wt".to_owned()], &[]).unwrap();
        assert!(path.exists());
    }
}
