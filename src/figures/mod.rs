//! Plotly figures for the dashboard
//!
//! Figures are plain serde structs serialized to the JSON shape plotly.js
//! expects, so the browser renders them with `Plotly.react`.

mod charts;
pub mod plotly;
mod scatter;
pub mod stats;

pub use charts::{
    age_distribution, bmi_by_age_box, bmi_histogram, heart_disease_by_sex, Chart,
    ExploratoryCharts, BMI_BINS,
};
pub use plotly::{Figure, Layout, Trace, TraceKind};
pub use scatter::{
    heart_disease_label, overall_scatter, sex_scatter, UserPoint, HEART_DISEASE, LABEL_ORDER,
    NO_HEART_DISEASE,
};
