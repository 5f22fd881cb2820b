//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};

use crate::dashboard::{DashboardView, FormOptions, SubmitRequest};
use crate::figures::Chart;
use crate::model::{ModelSummary, PredictionRequest, PredictionResult};

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Prediction Handlers
// ============================================================================

/// Dropdown domains for the prediction form
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<FormOptions> {
    Json(state.dashboard.options())
}

/// The page-load view: no risk text, both chart containers hidden
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.render_initial())
}

/// Predict button callback
pub async fn submit_dashboard(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<DashboardView>> {
    let Json(request) = payload?;
    let n_clicks = request.n_clicks;

    let view = tokio::task::spawn_blocking(move || {
        state.dashboard.submit(request.n_clicks, &request.form)
    })
    .await?
    .map_err(|e| {
        tracing::info!(n_clicks, error = %e, "Dashboard submission rejected");
        ServerError::from(e)
    })?;

    Ok(Json(view))
}

/// Score one request without rendering figures
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(request) = payload?;
    let result = tokio::task::spawn_blocking(move || state.predictor.predict(&request)).await??;
    Ok(Json(result))
}

// ============================================================================
// Chart and Model Handlers
// ============================================================================

/// All exploratory charts, serialized once at startup
pub async fn get_charts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.charts_json.clone(),
    )
}

pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(chart_id): Path<String>,
) -> Result<Json<Chart>> {
    state
        .charts
        .get(&chart_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("chart '{}'", chart_id)))
}

pub async fn get_model_summary(State(state): State<Arc<AppState>>) -> Json<ModelSummary> {
    Json(state.predictor.summary())
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.dataset.len(),
        "trees": state.predictor.n_trees(),
        "trainer": state.config.trainer,
        "uptime_secs": state.uptime_secs(),
    }))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SafeHeart</title>
    <script defer src="https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>[x-cloak]{display:none!important}.tab-active{background-color:rgb(59 130 246);color:white}</style>
</head>
<body class="bg-gray-50 text-gray-900 min-h-screen" x-data="app()">
    <header class="bg-white border-b px-6 py-4">
        <h1 class="text-2xl font-bold text-center">SafeHeart Dashboard</h1>
    </header>
    <nav class="bg-white px-6 py-2 border-b">
        <div class="flex space-x-1 justify-center">
            <button @click="tab='predict'" :class="tab==='predict'?'tab-active':'hover:bg-gray-200'" class="px-4 py-2 rounded-md text-sm">🧠 Predict Heart Disease Risk</button>
            <button @click="openCharts()" :class="tab==='charts'?'tab-active':'hover:bg-gray-200'" class="px-4 py-2 rounded-md text-sm">📊 Data Visualizations</button>
        </div>
    </nav>
    <main class="p-6">
        <div x-show="tab==='predict'" class="w-1/2 mx-auto space-y-3">
            <div><label class="block text-sm mb-1">Sex:</label><select id="sex" x-model="form.Sex" class="w-full border rounded p-2"><option :value="null">Select...</option><template x-for="o in opts.sex"><option :value="o" x-text="o"></option></template></select></div>
            <div><label class="block text-sm mb-1">Age Category:</label><select id="age" x-model="form.Age_Category" class="w-full border rounded p-2"><option :value="null">Select...</option><template x-for="o in opts.age_category"><option :value="o" x-text="o"></option></template></select></div>
            <div><label class="block text-sm mb-1">Weight (kg):</label><input id="weight" type="number" x-model.number="form.Weight" placeholder="Enter weight" class="w-full border rounded p-2"></div>
            <div><label class="block text-sm mb-1">Height (cm):</label><input id="height" type="number" x-model.number="form.Height" placeholder="Enter height" class="w-full border rounded p-2"></div>
            <div><label class="block text-sm mb-1">BMI:</label><input id="bmi" type="number" x-model.number="form.BMI" placeholder="Enter BMI" class="w-full border rounded p-2"></div>
            <div><label class="block text-sm mb-1">Diabetes:</label><select id="diabetes" x-model="form.Diabetes" class="w-full border rounded p-2"><option :value="null">Select...</option><template x-for="o in opts.diabetes"><option :value="o" x-text="o"></option></template></select></div>
            <div><label class="block text-sm mb-1">Arthritis:</label><select id="arthritis" x-model="form.Arthritis" class="w-full border rounded p-2"><option :value="null">Select...</option><template x-for="o in opts.arthritis"><option :value="o" x-text="o"></option></template></select></div>
            <button id="submit-button" @click="submit()" :disabled="loading" class="px-6 py-2 bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white rounded">Predict Risk</button>
            <div id="prediction-output">
                <p x-show="error" x-text="error" class="text-red-600"></p>
                <h3 x-show="view.risk_text" x-text="view.risk_text" class="text-xl font-semibold"></h3>
                <p x-show="view.probability_text" x-text="view.probability_text"></p>
            </div>
            <p x-show="loading" class="text-gray-500">⏳ Predicting...</p>
            <div id="overall-plot-container" x-show="view.overall_visible" x-cloak>
                <h4 class="text-lg font-semibold">📊 Overall BMI vs Age Category</h4>
                <div id="overall-plot"></div>
            </div>
            <div id="sex-specific-plot-container" x-show="view.sex_visible" x-cloak>
                <h4 class="text-lg font-semibold">📊 Sex-specific BMI vs Age Category</h4>
                <div id="sex-specific-plot"></div>
            </div>
        </div>
        <div x-show="tab==='charts'" x-cloak class="w-11/12 mx-auto space-y-6">
            <template x-for="c in charts||[]" :key="c.id">
                <div><h3 class="text-lg font-semibold" x-text="c.title"></h3><div :id="'chart-'+c.id"></div></div>
            </template>
        </div>
    </main>
    <script>
    const EMPTY_VIEW={risk_text:'',probability_text:'',overall_visible:false,sex_visible:false};
    function app(){return{tab:'predict',opts:{sex:[],age_category:[],diabetes:[],arthritis:[]},form:{Sex:null,Age_Category:null,Weight:null,Height:null,BMI:null,Diabetes:null,Arthritis:null},nClicks:0,loading:false,error:null,view:{...EMPTY_VIEW},charts:null,
    init(){this.fetchOptions();this.fetchView()},
    async fetchOptions(){try{const r=await fetch('/api/options');this.opts=await r.json()}catch(e){console.error(e)}},
    async fetchView(){try{const r=await fetch('/api/dashboard');this.view=await r.json()}catch(e){console.error(e)}},
    async submit(){this.nClicks++;this.loading=true;this.error=null;try{const r=await fetch('/api/dashboard/submit',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify({n_clicks:this.nClicks,form:this.form})});const d=await r.json();if(!r.ok){this.view={...EMPTY_VIEW};this.error=d.message;return}this.view=d;this.$nextTick(()=>{Plotly.react('overall-plot',d.overall_figure.data,d.overall_figure.layout);Plotly.react('sex-specific-plot',d.sex_figure.data,d.sex_figure.layout)})}catch(e){this.error=String(e)}finally{this.loading=false}},
    async openCharts(){this.tab='charts';if(this.charts)return;try{const r=await fetch('/api/charts');const d=await r.json();this.charts=d.charts;this.$nextTick(()=>{for(const c of this.charts){Plotly.react('chart-'+c.id,c.figure.data,c.figure.layout)}})}catch(e){console.error(e)}}}}
    </script>
</body>
</html>"##;
