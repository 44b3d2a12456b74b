use chrono::NaiveDate;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

/// Sample about 1000 rows out of roughly 5.1M sections.
pub const DEFAULT_SECTION_SAMPLE_PERCENT: f64 = (1000.0 * 100.0) / 5_100_000.0;

/// Parameters of the analytical queries and the projection.
///
/// | variable | default |
/// |---|---|
/// | `DASHBOARD_CUTOFF_DATE` | `2023-05-02` |
/// | `DASHBOARD_DEFAULT_THRESHOLD` | 10 |
/// | `DASHBOARD_HISTOGRAM_BINS` | 100 |
/// | `DASHBOARD_SECTION_SAMPLE_PERCENT` | ≈0.0196 |
/// | `DASHBOARD_TSNE_ITERATIONS` | 500 |
/// | `DASHBOARD_TSNE_PERPLEXITY` | 30 |
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub cutoff_date: NaiveDate,
    /// A question asked more often than this counts as a default one
    pub default_question_threshold: i64,
    pub histogram_bins: usize,
    pub section_sample_percent: f64,
    pub tsne_iterations: usize,
    pub tsne_perplexity: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cutoff_date: NaiveDate::from_ymd_opt(2023, 5, 2).unwrap_or_default(),
            default_question_threshold: 10,
            histogram_bins: 100,
            section_sample_percent: DEFAULT_SECTION_SAMPLE_PERCENT,
            tsne_iterations: 500,
            tsne_perplexity: 30.0,
        }
    }
}

impl FromEnv for DashboardConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cutoff_raw = env_or_default("DASHBOARD_CUTOFF_DATE", "2023-05-02");
        let cutoff_date = NaiveDate::parse_from_str(&cutoff_raw, "%Y-%m-%d").map_err(|e| {
            ConfigError::ParseError {
                key: "DASHBOARD_CUTOFF_DATE".to_string(),
                details: e.to_string(),
            }
        })?;

        let section_sample_percent: f64 = env_parse(
            "DASHBOARD_SECTION_SAMPLE_PERCENT",
            &defaults.section_sample_percent.to_string(),
        )?;
        if !(section_sample_percent > 0.0 && section_sample_percent <= 100.0) {
            return Err(ConfigError::Invalid {
                key: "DASHBOARD_SECTION_SAMPLE_PERCENT".to_string(),
                details: format!("{} is not in (0, 100]", section_sample_percent),
            });
        }

        let histogram_bins: usize = env_parse("DASHBOARD_HISTOGRAM_BINS", "100")?;
        if histogram_bins == 0 {
            return Err(ConfigError::Invalid {
                key: "DASHBOARD_HISTOGRAM_BINS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            cutoff_date,
            default_question_threshold: env_parse("DASHBOARD_DEFAULT_THRESHOLD", "10")?,
            histogram_bins,
            section_sample_percent,
            tsne_iterations: env_parse("DASHBOARD_TSNE_ITERATIONS", "500")?,
            tsne_perplexity: env_parse("DASHBOARD_TSNE_PERPLEXITY", "30")?,
        })
    }
}
