//! Forecast documents from `/gridpoints/.../forecast[/hourly]` and their
//! text renderings.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Period names that already read well as a header.
const VERBATIM_HEADERS: [&str; 3] = ["Overnight", "This Afternoon", "Tonight"];

const NIGHT_SUFFIX: &str = " Night";

pub const DEFAULT_DAYS: usize = 4;
pub const HOURLY_PERIODS: usize = 12;

/// Which forecast to fetch and how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastPeriod {
    Daily,
    Hourly,
}

impl ForecastPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastPeriod::Daily => "daily",
            ForecastPeriod::Hourly => "hourly",
        }
    }

    pub const fn all() -> &'static [ForecastPeriod] {
        &[ForecastPeriod::Daily, ForecastPeriod::Hourly]
    }

    /// Path appended to a gridpoint base URL.
    pub fn endpoint_suffix(&self) -> &'static str {
        match self {
            ForecastPeriod::Daily => "/forecast",
            ForecastPeriod::Hourly => "/forecast/hourly",
        }
    }
}

impl fmt::Display for ForecastPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastPeriod {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "daily" => Ok(ForecastPeriod::Daily),
            "hourly" => Ok(ForecastPeriod::Hourly),
            _ => Err(anyhow::anyhow!(
                "Unknown forecast period '{value}'. Supported periods: daily, hourly."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub number: Option<u32>,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub detailed_forecast: String,
    #[serde(default)]
    pub short_forecast: String,
    pub temperature: i64,
    pub temperature_unit: String,
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub is_daytime: Option<bool>,
}

impl Period {
    pub fn start(&self) -> Result<DateTime<FixedOffset>> {
        parse_time(&self.start_time)
    }

    pub fn end(&self) -> Result<DateTime<FixedOffset>> {
        parse_time(&self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastProperties {
    pub periods: Vec<Period>,
}

/// A parsed forecast response. The response JSON is kept for [`render_debug`].
///
/// [`render_debug`]: ForecastDocument::render_debug
#[derive(Debug, Clone)]
pub struct ForecastDocument {
    pub context: Option<serde_json::Value>,
    pub geometry: Option<serde_json::Value>,
    pub doc_type: Option<String>,
    pub properties: ForecastProperties,
    raw: serde_json::Value,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default, rename = "@context")]
    context: Option<serde_json::Value>,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    doc_type: Option<String>,
    properties: ForecastProperties,
}

impl ForecastDocument {
    /// Validates `raw` against the forecast shape; `url` is only used for errors.
    pub fn from_value(url: &str, raw: serde_json::Value) -> Result<Self> {
        let envelope = Envelope::deserialize(&raw).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            field: e.to_string(),
        })?;

        Ok(Self {
            context: envelope.context,
            geometry: envelope.geometry,
            doc_type: envelope.doc_type,
            properties: envelope.properties,
            raw,
        })
    }

    pub fn periods(&self) -> &[Period] {
        &self.properties.periods
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Pretty-printed response, for troubleshooting only.
    pub fn render_debug(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    fn first_periods(&self, n: usize) -> Result<&[Period]> {
        let periods = self.periods();
        periods
            .get(..n)
            .ok_or(Error::InsufficientPeriods { expected: n, found: periods.len() })
    }
}

/// `YYYY-MM-DDTHH:MM:SS±HHMM`; a colon in the offset is accepted too.
pub fn parse_time(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .map_err(|source| Error::TimeParse { value: value.to_string(), source })
}

/// Multi-day narrative forecast.
#[derive(Debug, Clone)]
pub struct DailyForecast {
    document: ForecastDocument,
    days: usize,
}

impl DailyForecast {
    pub fn new(document: ForecastDocument) -> Self {
        Self { document, days: DEFAULT_DAYS }
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn document(&self) -> &ForecastDocument {
        &self.document
    }

    pub fn render_text(&self) -> Result<String> {
        let mut result = String::new();

        for (i, period) in self.document.first_periods(self.days)?.iter().enumerate() {
            let header = daily_header(period)?;

            result.push_str(&header);
            result.push('\n');
            result.push_str(&"-".repeat(header.chars().count()));
            result.push('\n');
            result.push_str(&period.detailed_forecast);
            if i != 6 {
                result.push_str("\n\n");
            }
        }

        Ok(result)
    }

    pub fn render_debug(&self) -> String {
        self.document.render_debug()
    }
}

/// `Tonight` stays as is; anything else becomes `{Weekday}[ Night] ({Month} {Day})`
/// computed from the start time.
fn daily_header(period: &Period) -> Result<String> {
    let start = period.start()?;

    if VERBATIM_HEADERS.contains(&period.name.as_str()) {
        return Ok(period.name.clone());
    }

    let modifier = if period.name.ends_with(NIGHT_SUFFIX) { NIGHT_SUFFIX } else { "" };
    Ok(format!("{}{modifier} ({})", start.format("%A"), start.format("%B %d")))
}

/// Twelve one-line hourly entries.
#[derive(Debug, Clone)]
pub struct HourlyForecast {
    document: ForecastDocument,
}

impl HourlyForecast {
    pub fn new(document: ForecastDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &ForecastDocument {
        &self.document
    }

    pub fn render_text(&self) -> Result<String> {
        let mut result = String::new();

        for period in self.document.first_periods(HOURLY_PERIODS)? {
            let start = period.start()?;
            result.push_str(&format!(
                "{} {}°{}, {}, winds {}\n",
                start.format("%I%p"),
                period.temperature,
                period.temperature_unit,
                period.short_forecast,
                period.wind_speed,
            ));
        }

        Ok(result)
    }

    pub fn render_debug(&self) -> String {
        self.document.render_debug()
    }
}

/// A fetched forecast wrapped in its rendering strategy.
#[derive(Debug, Clone)]
pub enum Forecast {
    Daily(DailyForecast),
    Hourly(HourlyForecast),
}

impl Forecast {
    pub fn wrap(period: ForecastPeriod, document: ForecastDocument) -> Self {
        match period {
            ForecastPeriod::Daily => Forecast::Daily(DailyForecast::new(document)),
            ForecastPeriod::Hourly => Forecast::Hourly(HourlyForecast::new(document)),
        }
    }

    pub fn period(&self) -> ForecastPeriod {
        match self {
            Forecast::Daily(_) => ForecastPeriod::Daily,
            Forecast::Hourly(_) => ForecastPeriod::Hourly,
        }
    }

    /// Sets the period count for daily forecasts; hourly ignores it.
    pub fn with_days(self, days: usize) -> Self {
        match self {
            Forecast::Daily(daily) => Forecast::Daily(daily.with_days(days)),
            hourly @ Forecast::Hourly(_) => hourly,
        }
    }

    pub fn render_text(&self) -> Result<String> {
        match self {
            Forecast::Daily(daily) => daily.render_text(),
            Forecast::Hourly(hourly) => hourly.render_text(),
        }
    }

    pub fn render_debug(&self) -> String {
        match self {
            Forecast::Daily(daily) => daily.render_debug(),
            Forecast::Hourly(hourly) => hourly.render_debug(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period(name: &str, start: &str, detailed: &str) -> serde_json::Value {
        json!({
            "number": 1,
            "name": name,
            "startTime": start,
            "endTime": start,
            "isDaytime": true,
            "temperature": 72,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "windDirection": "SW",
            "shortForecast": "Sunny",
            "detailedForecast": detailed,
        })
    }

    fn document(periods: Vec<serde_json::Value>) -> ForecastDocument {
        ForecastDocument::from_value(
            "http://test/forecast",
            json!({
                "@context": ["https://geojson.org/geojson-ld/geojson-context.jsonld"],
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [] },
                "properties": { "periods": periods },
            }),
        )
        .unwrap()
    }

    fn hourly_period(start: &str, temp: i64, short: &str) -> serde_json::Value {
        json!({
            "name": "",
            "startTime": start,
            "endTime": start,
            "temperature": temp,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "shortForecast": short,
            "detailedForecast": "",
        })
    }

    #[test]
    fn period_parses_from_str() {
        assert_eq!(ForecastPeriod::try_from("Hourly").unwrap(), ForecastPeriod::Hourly);
        for p in ForecastPeriod::all() {
            assert_eq!(ForecastPeriod::try_from(p.as_str()).unwrap(), *p);
        }
        let err = ForecastPeriod::try_from("weekly").unwrap_err();
        assert!(err.to_string().contains("Unknown forecast period"));
    }

    #[test]
    fn parse_time_accepts_compact_and_colon_offsets() {
        let compact = parse_time("2024-07-04T18:00:00-0400").unwrap();
        let colon = parse_time("2024-07-04T18:00:00-04:00").unwrap();
        assert_eq!(compact, colon);
        assert_eq!(compact.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn parse_time_rejects_garbage() {
        let err = parse_time("July 4th").unwrap_err();
        assert!(matches!(err, Error::TimeParse { ref value, .. } if value == "July 4th"));
    }

    #[test]
    fn document_keeps_envelope() {
        let doc = document(vec![period("Tonight", "2024-07-04T18:00:00-0400", "Clear.")]);
        assert_eq!(doc.doc_type.as_deref(), Some("Feature"));
        assert!(doc.context.is_some());
        assert!(doc.geometry.is_some());
        assert_eq!(doc.periods().len(), 1);
    }

    #[test]
    fn document_without_periods_is_malformed() {
        let err = ForecastDocument::from_value("http://test/forecast", json!({ "properties": {} }))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { ref field, .. } if field.contains("periods")));
    }

    #[test]
    fn tonight_header_is_verbatim() {
        let doc = document(vec![period("Tonight", "2024-07-04T18:00:00-0400", "Clear, with a low around 61.")]);
        let text = DailyForecast::new(doc).with_days(1).render_text().unwrap();
        assert_eq!(text, "Tonight\n-------\nClear, with a low around 61.\n\n");
    }

    #[test]
    fn night_suffix_survives_recomputed_weekday() {
        let doc = document(vec![period("Saturday Night", "2024-07-04T18:00:00-0400", "Fireworks.")]);
        let text = DailyForecast::new(doc).with_days(1).render_text().unwrap();
        let header = "Thursday Night (July 04)";
        assert_eq!(text, format!("{header}\n{}\nFireworks.\n\n", "-".repeat(header.len())));
    }

    #[test]
    fn holiday_names_are_replaced_by_weekday() {
        let doc = document(vec![period("Independence Day", "2024-07-04T06:00:00-0400", "Hot.")]);
        let text = DailyForecast::new(doc).with_days(1).render_text().unwrap();
        assert!(text.starts_with("Thursday (July 04)\n------------------\n"));
    }

    #[test]
    fn daily_defaults_to_four_periods() {
        let periods = (0..6)
            .map(|i| period("This Afternoon", "2024-07-04T12:00:00-0400", &format!("p{i}")))
            .collect();
        let daily = DailyForecast::new(document(periods));
        assert_eq!(daily.days(), DEFAULT_DAYS);

        let text = daily.render_text().unwrap();
        assert!(text.contains("p3"));
        assert!(!text.contains("p4"));
        assert!(text.ends_with("p3\n\n"));
    }

    #[test]
    fn no_separator_after_seventh_period() {
        let periods = (0..7)
            .map(|i| period("Tonight", "2024-07-04T18:00:00-0400", &format!("p{i}")))
            .collect();
        let text = DailyForecast::new(document(periods)).with_days(7).render_text().unwrap();
        assert!(text.ends_with("Tonight\n-------\np6"));
        assert!(text.contains("p5\n\nTonight"));
    }

    #[test]
    fn daily_with_too_few_periods_fails() {
        let doc = document(vec![period("Tonight", "2024-07-04T18:00:00-0400", "x")]);
        let err = DailyForecast::new(doc).render_text().unwrap_err();
        assert!(matches!(err, Error::InsufficientPeriods { expected: 4, found: 1 }));
    }

    #[test]
    fn bad_timestamp_aborts_daily() {
        let doc = document(vec![
            period("Tonight", "2024-07-04T18:00:00-0400", "ok"),
            period("Friday", "not-a-time", "bad"),
        ]);
        let err = DailyForecast::new(doc).with_days(2).render_text().unwrap_err();
        assert!(matches!(err, Error::TimeParse { .. }));
    }

    #[test]
    fn hourly_line_format() {
        let periods = (0..HOURLY_PERIODS)
            .map(|h| hourly_period(&format!("2024-07-04T{:02}:00:00-0400", 15 + h / 2), 72, "Sunny"))
            .collect();
        let text = HourlyForecast::new(document(periods)).render_text().unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HOURLY_PERIODS);
        assert_eq!(lines[0], "03PM 72°F, Sunny, winds 5 mph");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn hourly_uses_only_first_twelve() {
        let periods = (0..24)
            .map(|h| hourly_period(&format!("2024-07-05T{h:02}:00:00-0400"), h as i64, "Clear"))
            .collect();
        let text = HourlyForecast::new(document(periods)).render_text().unwrap();
        assert_eq!(text.lines().count(), 12);
        assert!(text.starts_with("12AM 0°F"));
        assert!(text.lines().last().unwrap().starts_with("11AM 11°F"));
    }

    #[test]
    fn hourly_with_fewer_than_twelve_fails() {
        let periods = (0..3)
            .map(|h| hourly_period(&format!("2024-07-05T{h:02}:00:00-0400"), 60, "Clear"))
            .collect();
        let err = HourlyForecast::new(document(periods)).render_text().unwrap_err();
        assert!(matches!(err, Error::InsufficientPeriods { expected: 12, found: 3 }));
    }

    #[test]
    fn bad_timestamp_aborts_hourly() {
        let mut periods: Vec<_> = (0..HOURLY_PERIODS)
            .map(|h| hourly_period(&format!("2024-07-05T{h:02}:00:00-0400"), 60, "Clear"))
            .collect();
        periods[5] = hourly_period("2024-07-05 05:00", 60, "Clear");
        let err = HourlyForecast::new(document(periods)).render_text().unwrap_err();
        assert!(matches!(err, Error::TimeParse { .. }));
    }

    #[test]
    fn forecast_enum_dispatches() {
        let doc = document(vec![period("Tonight", "2024-07-04T18:00:00-0400", "Clear.")]);
        let forecast = Forecast::wrap(ForecastPeriod::Daily, doc.clone()).with_days(1);
        assert_eq!(forecast.period(), ForecastPeriod::Daily);
        assert!(forecast.render_text().unwrap().starts_with("Tonight\n"));

        let forecast = Forecast::wrap(ForecastPeriod::Hourly, doc).with_days(1);
        assert_eq!(forecast.period(), ForecastPeriod::Hourly);
        assert!(matches!(forecast.render_text(), Err(Error::InsufficientPeriods { .. })));
    }

    #[test]
    fn debug_dump_is_pretty_json() {
        let doc = document(vec![period("Tonight", "2024-07-04T18:00:00-0400", "Clear.")]);
        let dump = Forecast::wrap(ForecastPeriod::Daily, doc).render_debug();
        assert!(dump.contains("\n  \"properties\": {"));
        let reparsed: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(reparsed["type"], "Feature");
    }
}
