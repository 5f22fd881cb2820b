//! BMI vs age scatter plots annotated with the user's point

use super::plotly::{Annotation, Axis, Figure, Layout, Marker, Trace, TraceKind};
use crate::dataset::{CvdDataset, CvdRecord, AGE_ORDER};

pub const NO_HEART_DISEASE: &str = "No Heart Disease";
pub const HEART_DISEASE: &str = "Heart Disease";

/// Facet and trace order for the label split
pub const LABEL_ORDER: [&str; 2] = [NO_HEART_DISEASE, HEART_DISEASE];

const LABEL_TITLE: &str = "Heart_Disease_Label";
const DEFAULT_COLORS: [&str; 2] = ["#636efa", "#EF553B"];
const WIDTH: u32 = 1000;
const HEIGHT: u32 = 800;

pub fn heart_disease_label(value: u8) -> &'static str {
    if value == 1 {
        HEART_DISEASE
    } else {
        NO_HEART_DISEASE
    }
}

/// The submitted (BMI, age bucket) pair drawn on top of the data
#[derive(Debug, Clone, PartialEq)]
pub struct UserPoint {
    pub bmi: f64,
    pub age_category: String,
}

impl UserPoint {
    pub fn new(bmi: f64, age_category: impl Into<String>) -> Self {
        Self {
            bmi,
            age_category: age_category.into(),
        }
    }

    fn trace(&self, kind: TraceKind) -> Trace {
        Trace::markers(kind, "You")
            .with_x(vec![self.bmi])
            .with_y(vec![self.age_category.clone()])
            .with_marker(Marker {
                color: Some("gold".to_string()),
                size: Some(25.0),
                symbol: Some("star".to_string()),
            })
            .with_showlegend(true)
    }
}

fn label_points<'a>(
    records: impl Iterator<Item = &'a CvdRecord>,
    label: &str,
) -> (Vec<f64>, Vec<String>) {
    records
        .filter(|r| heart_disease_label(r.heart_disease) == label)
        .map(|r| (r.bmi, r.age_category.clone()))
        .unzip()
}

/// All records split into side-by-side facets by label
pub fn overall_scatter(dataset: &CvdDataset, user: &UserPoint) -> Figure {
    let mut layout = Layout::default()
        .with_size(WIDTH, HEIGHT)
        .with_legend_title(LABEL_TITLE);

    let domains = [[0.0, 0.49], [0.51, 1.0]];
    layout.xaxis = Some(Axis {
        domain: Some(domains[0]),
        anchor: Some("y".to_string()),
        ..Axis::titled("BMI")
    });
    layout.xaxis2 = Some(Axis {
        domain: Some(domains[1]),
        anchor: Some("y2".to_string()),
        matches: Some("x".to_string()),
        ..Axis::titled("BMI")
    });
    layout.yaxis = Some(Axis {
        anchor: Some("x".to_string()),
        ..Axis::titled("Age_Category").with_category_order(&AGE_ORDER)
    });
    layout.yaxis2 = Some(Axis {
        anchor: Some("x2".to_string()),
        matches: Some("y".to_string()),
        showticklabels: Some(false),
        ..Axis::default()
    });

    let mut fig = Figure::new(layout);
    for (idx, label) in LABEL_ORDER.iter().enumerate() {
        let (xaxis, yaxis) = if idx == 0 { ("x", "y") } else { ("x2", "y2") };
        let (bmi, ages) = label_points(dataset.records().iter(), label);
        fig.add_trace(
            Trace::markers(TraceKind::Scatter, label)
                .with_x(bmi)
                .with_y(ages)
                .with_marker(Marker::color(DEFAULT_COLORS[idx]))
                .with_opacity(0.5)
                .on_axes(xaxis, yaxis),
        );

        let [lo, hi] = domains[idx];
        fig.layout
            .annotations
            .push(Annotation::heading(format!("{}={}", LABEL_TITLE, label), (lo + hi) / 2.0));
    }
    fig.add_trace(user.trace(TraceKind::Scatter));
    fig
}

/// Records of one sex, colored red/blue by label
pub fn sex_scatter(dataset: &CvdDataset, sex: &str, user: &UserPoint) -> Figure {
    let mut layout = Layout::titled(format!("BMI vs Age (Sex: {})", sex))
        .with_size(WIDTH, HEIGHT)
        .with_legend_title(LABEL_TITLE);
    layout.xaxis = Some(Axis::titled("BMI"));
    layout.yaxis = Some(Axis::titled("Age_Category").with_category_order(&AGE_ORDER));

    let mut fig = Figure::new(layout);
    for label in LABEL_ORDER {
        let color = if label == HEART_DISEASE { "red" } else { "blue" };
        let (bmi, ages) = label_points(dataset.filter_by_sex(sex), label);
        fig.add_trace(
            Trace::markers(TraceKind::Scattergl, label)
                .with_x(bmi)
                .with_y(ages)
                .with_marker(Marker::color(color))
                .with_opacity(0.2),
        );
    }
    fig.add_trace(user.trace(TraceKind::Scattergl));
    fig
}
