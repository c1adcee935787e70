use super::min_and_max;
use super::{Column, Dataset, PlotError};

/// One line of the chart: the points sharing a grouping value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// What gets drawn: labels plus the grouped series, in legend order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub hue_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
enum GroupKey {
    Number(f64),
    Text(String),
}

impl GroupKey {
    fn label(&self) -> String {
        match self {
            GroupKey::Number(v) => v.to_string(),
            GroupKey::Text(s) => s.clone(),
        }
    }
}

impl Chart {
    /// Line chart of y against x with one series per distinct hue value.
    ///
    /// Numeric hue values are ordered ascending, text values by first appearance
    /// and compared with surrounding whitespace trimmed.
    /// Rows with a missing hue or a non finite x or y are dropped.
    /// Each series is sorted by x, repeated x values are averaged.
    pub fn relational_line(
        dataset: &Dataset,
        title: &str,
        x: &str,
        y: &str,
        hue: &str,
    ) -> Result<Chart, PlotError> {
        let xs = dataset.numeric_column(x)?;
        let ys = dataset.numeric_column(y)?;
        let keys = group_keys(dataset.column(hue)?);

        let mut groups: Vec<(GroupKey, Vec<(f64, f64)>)> = Vec::new();
        for ((key, &xv), &yv) in keys.into_iter().zip(xs.iter()).zip(ys.iter()) {
            let key = match key {
                Some(k) => k,
                None => continue,
            };
            if !xv.is_finite() || !yv.is_finite() {
                continue;
            }
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, points)) => points.push((xv, yv)),
                None => groups.push((key, vec![(xv, yv)])),
            }
        }
        if groups
            .iter()
            .all(|(k, _)| matches!(k, GroupKey::Number(_)))
        {
            groups.sort_by(|(a, _), (b, _)| match (a, b) {
                (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
                _ => std::cmp::Ordering::Equal,
            });
        }

        let series = groups
            .into_iter()
            .map(|(key, points)| Series {
                label: key.label(),
                points: sort_and_average(points),
            })
            .collect();
        Ok(Chart {
            title: title.to_string(),
            x_label: x.trim().to_string(),
            y_label: y.trim().to_string(),
            hue_label: hue.trim().to_string(),
            series,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// min and max over the x values of all series
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let xs: Vec<f64> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .collect();
        min_and_max(&xs[..])
    }

    /// min and max over the y values of all series
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let ys: Vec<f64> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .collect();
        min_and_max(&ys[..])
    }
}

fn group_keys(column: &Column) -> Vec<Option<GroupKey>> {
    match column {
        Column::Numeric(values) => values
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    None
                } else {
                    Some(GroupKey::Number(v))
                }
            })
            .collect(),
        Column::Text(values) => values
            .iter()
            .map(|s| {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(GroupKey::Text(s.to_string()))
                }
            })
            .collect(),
    }
}

fn sort_and_average(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut averaged: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    let mut i = 0;
    while i < points.len() {
        let x = points[i].0;
        let same_x = points[i..].iter().take_while(|p| p.0 == x).count();
        let sum: f64 = points[i..i + same_x].iter().map(|p| p.1).sum();
        averaged.push((x, sum / same_x as f64));
        i += same_x;
    }
    averaged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DENSITY_COLUMN, METRIC_COLUMN, VERTICES_COLUMN};
    use pretty_assertions::assert_eq;

    fn chart_of(csv: &str) -> Chart {
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        Chart::relational_line(&ds, "t", DENSITY_COLUMN, METRIC_COLUMN, VERTICES_COLUMN)
            .unwrap()
    }

    #[test]
    fn one_series_per_vertex_count() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             100, 0.1, 5.2\n\
             100, 0.2, 6.1\n\
             200, 0.1, 9.4\n",
        );
        assert_eq!(
            chart.series,
            vec![
                Series {
                    label: "100".to_string(),
                    points: vec![(0.1, 5.2), (0.2, 6.1)],
                },
                Series {
                    label: "200".to_string(),
                    points: vec![(0.1, 9.4)],
                },
            ]
        );
        assert_eq!(chart.x_label, "Density");
        assert_eq!(chart.y_label, "CSR w/o MKL");
        assert_eq!(chart.hue_label, "Vertices");
    }

    #[test]
    fn numeric_groups_are_sorted_and_points_by_x() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             2048, 0.3, 3.0\n\
             1024, 0.2, 2.0\n\
             2048, 0.1, 1.0\n",
        );
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["1024", "2048"]);
        assert_eq!(chart.series[1].points, vec![(0.1, 1.0), (0.3, 3.0)]);
    }

    #[test]
    fn text_groups_keep_first_appearance() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             small, 0.1, 1.0\n\
             big, 0.1, 2.0\n\
             small, 0.2, 3.0\n",
        );
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["small", "big"]);
    }

    #[test]
    fn text_group_labels_are_trimmed() {
        let chart = chart_of(
            " Density,Vertices, CSR w/o MKL\n\
             0.1, small, 1.0\n\
             0.2,small, 3.0\n\
             0.1, big , 2.0\n",
        );
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["small", "big"]);
        assert_eq!(chart.series[0].points, vec![(0.1, 1.0), (0.2, 3.0)]);
    }

    #[test]
    fn repeated_x_is_averaged() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             1, 0.5, 2.0\n\
             1, 0.5, 4.0\n\
             1, 0.25, 1.0\n",
        );
        assert_eq!(chart.series[0].points, vec![(0.25, 1.0), (0.5, 3.0)]);
    }

    #[test]
    fn incomplete_rows_are_dropped() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             , 0.1, 1.0\n\
             1, , 2.0\n\
             1, 0.3, 3.0\n",
        );
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points, vec![(0.3, 3.0)]);
    }

    #[test]
    fn ranges_span_all_series() {
        let chart = chart_of(
            "Vertices, Density, CSR w/o MKL\n\
             1, 0.1, 5.0\n\
             2, 0.4, -1.0\n",
        );
        assert_eq!(chart.x_range(), Some((0.1, 0.4)));
        assert_eq!(chart.y_range(), Some((-1.0, 5.0)));
    }

    #[test]
    fn header_only_gives_empty_chart() {
        let chart = chart_of("Vertices, Density, CSR w/o MKL\n");
        assert!(chart.is_empty());
        assert_eq!(chart.x_range(), None);
    }

    #[test]
    fn text_metric_is_rejected() {
        let ds = Dataset::from_reader("Vertices, Density, CSR w/o MKL\n1, 0.1, fast\n".as_bytes())
            .unwrap();
        let err = Chart::relational_line(&ds, "t", DENSITY_COLUMN, METRIC_COLUMN, VERTICES_COLUMN)
            .unwrap_err();
        assert!(matches!(err, PlotError::NonNumericColumn(name) if name == METRIC_COLUMN));
    }
}
