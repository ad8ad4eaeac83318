/// Upstream endpoints and series identifiers

// Argentina: datos.gob.ar series API
pub const ARGENTINA_BASE_URL: &str = "https://apis.datos.gob.ar/series/api/";
pub const ARGENTINA_CURRENCY_ID: &str = "168.1_T_CAMBIOR_D_0_0_26";
pub const ARGENTINA_CPI_ID: &str = "105.1_I2N_2016_M_14";
pub const ARGENTINA_CURRENCY_START: &str = "2022";
pub const ARGENTINA_CPI_REPRESENTATION: &str = "percent_change_a_year_ago";

// Norway: Norges Bank SDMX API and CPI table
pub const NORWAY_BASE_URL: &str = "https://data.norges-bank.no/api/";
pub const NORWAY_CURRENCY_SERIES: &str = "B.USD.NOK.SP";
pub const NORWAY_START_PERIOD: &str = "2022-01-01";
pub const NORWAY_END_PERIOD: &str = "2022-04-10";
pub const NORWAY_CPI_CSV_URL: &str =
    "https://www.norges-bank.no/globalassets/marketdata/ppo/kpi/kpi_tab_en.csv";

/// The single-currency-pair series inside an SDMX data set
pub const SDMX_SERIES_KEY: &str = "0:0:0:0";

/// Lines preceding the data rows in the Norges Bank CPI table
pub const CPI_CSV_HEADER_LINES: usize = 3;

/// Default lower bound of every series (first day of 2022)
pub const DEFAULT_SINCE: (i32, u32, u32) = (2022, 1, 1);

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "MACRO_SERIES_CONFIG";

/// Figure sizes in inches
pub const FIGURE_SIZE: (f64, f64) = (6.4, 4.8);
pub const ZOOM_SIZE: (f64, f64) = (13.0, 7.0);

/// Currency charts: y tick spacing and x gridline interval
pub const CURRENCY_TICK_STEP: f64 = 0.5;
pub const CURRENCY_GRIDLINE_DAYS: u32 = 7;
/// Above this many y ticks the range is too wide for fixed spacing
pub const MAX_Y_TICKS: usize = 200;

pub const DASHBOARD_FILE: &str = "dashboard.json";
