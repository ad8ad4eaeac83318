use async_trait::async_trait;
use macro_series::app::ports::{HttpClientPort, HttpGetResult};
use macro_series::chart::{FigureSize, LineStyle};
use macro_series::{Config, Country, IndexKind, LineChartRenderer, Pipeline, SeriesError, TimeSeriesKey};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves canned bodies by URL fragment and records every request
struct StubHttp {
    routes: Vec<(&'static str, u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl StubHttp {
    fn new(routes: Vec<(&'static str, u16, String)>) -> Self {
        Self {
            routes,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HttpClientPort for StubHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String> {
        self.requests.lock().unwrap().push(url.to_string());
        let (_, status, body) = self
            .routes
            .iter()
            .find(|(fragment, _, _)| url.contains(fragment))
            .ok_or_else(|| format!("no route for {}", url))?;
        Ok(HttpGetResult {
            status: *status,
            bytes: body.clone().into_bytes(),
            content_type: "application/json".to_string(),
        })
    }
}

fn argentina_currency() -> String {
    json!({"data": [["2022-01-03", 102.9], ["2022-01-04", 103.0], ["2022-01-12", 103.6]]}).to_string()
}

fn argentina_cpi() -> String {
    json!({"data": [["2021-12-01", 0.509], ["2022-01-01", 0.505], ["2022-02-01", 0.524]]}).to_string()
}

fn norway_currency() -> String {
    json!({"data": {
        "dataSets": [{"series": {"0:0:0:0": {"observations": {"0": ["8.8121"], "1": ["8.8523"], "2": [null]}}}}],
        "structure": {"dimensions": {"observation": [{"values": [
            {"name": "2022-01-03"}, {"name": "2022-01-04"}, {"name": "2022-01-05"}
        ]}]}}
    }})
    .to_string()
}

fn norway_cpi() -> String {
    "Consumer price index\nTwelve-month change\nMonth,CPI\nDec.21,5.3\nJan.22,3.2\nFeb.22,3.7\n".to_string()
}

fn all_routes() -> Vec<(&'static str, u16, String)> {
    vec![
        ("168.1_T_CAMBIOR_D_0_0_26", 200, argentina_currency()),
        ("105.1_I2N_2016_M_14", 200, argentina_cpi()),
        ("B.USD.NOK.SP", 200, norway_currency()),
        ("kpi_tab_en.csv", 200, norway_cpi()),
    ]
}

#[tokio::test]
async fn test_run_builds_figure_for_every_series() {
    let http = Arc::new(StubHttp::new(all_routes()));
    let pipeline = Pipeline::new(Config::default(), http.clone());

    let result = pipeline.run().await.unwrap();
    assert_eq!(result.series.len(), 4);
    assert_eq!(result.dashboard.keys(), {
        let mut keys = TimeSeriesKey::all();
        keys.sort();
        keys
    });
    assert_eq!(http.requests.lock().unwrap().len(), 4);

    let by_key: HashMap<_, _> = result.series.iter().map(|s| (s.key, s)).collect();
    let ar_cpi = by_key[&TimeSeriesKey::new(IndexKind::Cpi, Country::Argentina)];
    assert_eq!(ar_cpi.points.iter().map(|p| p.value).collect::<Vec<_>>(), vec![50.0, 52.0]);

    let no_cur = by_key[&TimeSeriesKey::new(IndexKind::Currency, Country::Norway)];
    assert_eq!(no_cur.len(), 2);

    let no_cpi = by_key[&TimeSeriesKey::new(IndexKind::Cpi, Country::Norway)];
    assert_eq!(no_cpi.points[0].value, 3.2);

    let currency = result.dashboard.displayed(IndexKind::Currency).unwrap();
    assert_eq!(currency.title, "Argentina Currency");
    assert_eq!(currency.y_ticks, vec![102.0, 102.5, 103.0, 103.5]);
    assert_eq!(currency.x_gridline_interval_days, Some(7));
}

#[tokio::test]
async fn test_disabled_norway_cpi_is_not_fetched() {
    let mut config = Config::default();
    config.features.norway_cpi = false;
    let http = Arc::new(StubHttp::new(all_routes()));
    let pipeline = Pipeline::new(config, http.clone());

    let mut result = pipeline.run().await.unwrap();
    assert_eq!(result.series.len(), 3);
    assert!(http
        .requests
        .lock()
        .unwrap()
        .iter()
        .all(|url| !url.contains("kpi_tab_en.csv")));

    let err = result
        .dashboard
        .select_country(IndexKind::Cpi, Country::Norway)
        .unwrap_err();
    assert!(matches!(err, SeriesError::Unavailable { .. }));

    let zoomed = result.dashboard.zoom(IndexKind::Cpi).unwrap();
    assert_eq!(zoomed.title, "Argentina CPI");
    assert_eq!(zoomed.size.width, 13.0);
}

#[tokio::test]
async fn test_failed_fetch_fails_the_run() {
    let mut routes = all_routes();
    routes[2] = ("B.USD.NOK.SP", 500, String::new());
    let pipeline = Pipeline::new(Config::default(), Arc::new(StubHttp::new(routes)));

    let err = pipeline.run().await.err().unwrap();
    assert!(matches!(err, SeriesError::Fetch { .. }));
    assert_eq!(err.key(), Some(TimeSeriesKey::new(IndexKind::Currency, Country::Norway)));
}

#[tokio::test]
async fn test_malformed_payload_names_series() {
    let mut routes = all_routes();
    routes[0] = ("168.1_T_CAMBIOR_D_0_0_26", 200, json!({"unexpected": true}).to_string());
    let pipeline = Pipeline::new(Config::default(), Arc::new(StubHttp::new(routes)));

    let err = pipeline.run().await.err().unwrap();
    assert!(matches!(err, SeriesError::DataFormat { .. }));
    assert_eq!(err.key(), Some(TimeSeriesKey::new(IndexKind::Currency, Country::Argentina)));
}

#[tokio::test]
async fn test_dashboard_written_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(Config::default(), Arc::new(StubHttp::new(all_routes())));
    let result = pipeline.run().await.unwrap();

    let path = result.write_dashboard(dir.path().to_str().unwrap()).unwrap();
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["figures"].as_array().unwrap().len(), 4);
    assert_eq!(written["selection"]["currency"], "argentina");
}

#[tokio::test]
async fn test_custom_renderer_shapes_every_figure() {
    let style = LineStyle {
        color: "darkred".to_string(),
        ..LineStyle::default()
    };
    let renderer = LineChartRenderer::new(FigureSize::new(8.0, 6.0), style);
    let pipeline = Pipeline::new(Config::default(), Arc::new(StubHttp::new(all_routes())))
        .with_renderer(Box::new(renderer));

    let result = pipeline.run().await.unwrap();
    for key in result.dashboard.keys() {
        let figure = result.dashboard.figure(&key).unwrap();
        assert_eq!(figure.size, FigureSize::new(8.0, 6.0));
        assert_eq!(figure.style.color, "darkred");
        assert_eq!(figure.style.marker, "o");
    }
}
