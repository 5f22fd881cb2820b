//! Exploratory charts for the data tab
//!
//! Built once at startup from the loaded dataset. Distributions are
//! aggregated here so the browser receives counts and box statistics
//! rather than every row.

use super::plotly::{Axis, Figure, Layout, Trace, TraceKind};
use super::stats::{BoxStats, Histogram};
use crate::dataset::{CvdDataset, CvdRecord, AGE_ORDER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BMI_BINS: usize = 40;

/// One titled chart of the data tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub figure: Figure,
}

/// The five charts in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploratoryCharts {
    pub charts: Vec<Chart>,
}

impl ExploratoryCharts {
    pub fn build(dataset: &CvdDataset) -> Self {
        let charts = vec![
            Chart {
                id: "sex-counts".to_string(),
                title: "Heart Disease Counts by Sex".to_string(),
                figure: heart_disease_by_sex(dataset),
            },
            Chart {
                id: "bmi-distribution".to_string(),
                title: "BMI Distribution".to_string(),
                figure: bmi_histogram(dataset, BMI_BINS),
            },
            Chart {
                id: "age-distribution".to_string(),
                title: "Age Category Distribution".to_string(),
                figure: age_distribution(dataset),
            },
            Chart {
                id: "bmi-age-diabetes".to_string(),
                title: "BMI vs Age Category colored by Diabetes".to_string(),
                figure: bmi_by_age_box(dataset, "Diabetes", |r| &r.diabetes),
            },
            Chart {
                id: "bmi-age-arthritis".to_string(),
                title: "BMI vs Age Category colored by Arthritis".to_string(),
                figure: bmi_by_age_box(dataset, "Arthritis", |r| &r.arthritis),
            },
        ];
        Self { charts }
    }

    pub fn get(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Grouped bars of record counts per sex, one series per label value
pub fn heart_disease_by_sex(dataset: &CvdDataset) -> Figure {
    let mut sexes: Vec<String> = Vec::new();
    let mut counts: BTreeMap<u8, BTreeMap<String, usize>> = BTreeMap::new();
    for r in dataset.records() {
        if !sexes.contains(&r.sex) {
            sexes.push(r.sex.clone());
        }
        *counts
            .entry(r.heart_disease)
            .or_default()
            .entry(r.sex.clone())
            .or_insert(0) += 1;
    }

    let mut layout = Layout::default().with_legend_title("Heart_Disease");
    layout.barmode = Some("group".to_string());
    layout.xaxis = Some(Axis::titled("Sex"));
    layout.yaxis = Some(Axis::titled("count"));

    let mut fig = Figure::new(layout);
    for (label, by_sex) in counts {
        let y: Vec<f64> = sexes
            .iter()
            .map(|s| by_sex.get(s).copied().unwrap_or(0) as f64)
            .collect();
        fig.add_trace(
            Trace::new(TraceKind::Bar)
                .with_name(&label.to_string())
                .with_x(sexes.clone())
                .with_y(y),
        );
    }
    fig
}

/// Equal-width BMI histogram drawn as touching bars
pub fn bmi_histogram(dataset: &CvdDataset, n_bins: usize) -> Figure {
    let bmi: Vec<f64> = dataset.records().iter().map(|r| r.bmi).collect();

    let mut layout = Layout::default();
    layout.bargap = Some(0.0);
    layout.xaxis = Some(Axis::titled("BMI"));
    layout.yaxis = Some(Axis::titled("count"));

    let mut fig = Figure::new(layout);
    if let Some(hist) = Histogram::from_values(&bmi, n_bins) {
        let mut trace = Trace::new(TraceKind::Bar)
            .with_name("BMI")
            .with_x(hist.centers())
            .with_y(hist.counts.iter().map(|&c| c as f64).collect::<Vec<f64>>());
        trace.width = Some(hist.bin_width);
        fig.add_trace(trace);
    }
    fig
}

/// Record counts per age bucket in survey order
pub fn age_distribution(dataset: &CvdDataset) -> Figure {
    let order = age_axis(dataset);
    let y: Vec<f64> = order
        .iter()
        .map(|age| dataset.records().iter().filter(|r| &r.age_category == age).count() as f64)
        .collect();

    let mut layout = Layout::default();
    layout.xaxis = Some(Axis::titled("Age_Category").with_category_order(&order));
    layout.yaxis = Some(Axis::titled("count"));

    let mut fig = Figure::new(layout);
    fig.add_trace(
        Trace::new(TraceKind::Bar)
            .with_name("Age_Category")
            .with_x(order)
            .with_y(y),
    );
    fig
}

/// BMI box plots per age bucket, grouped by a Yes/No column
pub fn bmi_by_age_box<F>(dataset: &CvdDataset, column: &str, group_of: F) -> Figure
where
    F: Fn(&CvdRecord) -> &String,
{
    let order = age_axis(dataset);

    let mut groups: BTreeMap<&str, BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
    for r in dataset.records() {
        groups
            .entry(group_of(r).as_str())
            .or_default()
            .entry(r.age_category.as_str())
            .or_default()
            .push(r.bmi);
    }

    let mut layout = Layout::default().with_legend_title(column);
    layout.boxmode = Some("group".to_string());
    layout.xaxis = Some(Axis::titled("Age_Category").with_category_order(&order));
    layout.yaxis = Some(Axis::titled("BMI"));

    let mut fig = Figure::new(layout);
    for (group, by_age) in groups {
        let mut x = Vec::new();
        let mut stats = Vec::new();
        for age in &order {
            if let Some(s) = by_age.get(age.as_str()).and_then(|v| BoxStats::from_values(v)) {
                x.push(age.clone());
                stats.push(s);
            }
        }

        let mut trace = Trace::new(TraceKind::Box)
            .with_name(group)
            .with_x(x);
        trace.offsetgroup = Some(group.to_string());
        trace.q1 = Some(stats.iter().map(|s| s.q1).collect());
        trace.median = Some(stats.iter().map(|s| s.median).collect());
        trace.q3 = Some(stats.iter().map(|s| s.q3).collect());
        trace.lowerfence = Some(stats.iter().map(|s| s.lowerfence).collect());
        trace.upperfence = Some(stats.iter().map(|s| s.upperfence).collect());
        fig.add_trace(trace);
    }
    fig
}

/// Fixed age order, followed by any bucket the survey order does not list
fn age_axis(dataset: &CvdDataset) -> Vec<String> {
    let mut order: Vec<String> = AGE_ORDER.iter().map(|s| s.to_string()).collect();
    for age in dataset.age_categories() {
        if !order.contains(&age) {
            order.push(age);
        }
    }
    order
}
