//! Resolve, fetch, extract: the full lookup for one search.

use chrono::{DateTime, Local, TimeZone};

use crate::{
    Config,
    error::Result,
    extract::{current_conditions, extract},
    forecast::{ForecastSource, MetNoClient},
    geocode::default_geocoder_from_config,
    location::LocationSensor,
    model::{DaySummary, ForecastDocument, ForecastReport, HourOfDay, ResolvedPlace},
    resolver::CoordinateResolver,
    session::{Event, Session, SessionState},
    symbols::SymbolCatalog,
};

/// Day offsets shown in the forecast strip.
pub const FORECAST_DAYS: std::ops::RangeInclusive<u32> = 1..=3;

/// What the user asked for.
#[derive(Debug, Clone, Copy)]
pub enum SearchQuery<'a> {
    Place(&'a str),
    Device(&'a dyn LocationSensor),
}

impl SearchQuery<'_> {
    fn describe(&self) -> String {
        match self {
            SearchQuery::Place(name) => name.trim().to_string(),
            SearchQuery::Device(_) => "device location".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct WeatherLookup {
    resolver: CoordinateResolver,
    forecast: Box<dyn ForecastSource>,
    icons: SymbolCatalog,
    hour: HourOfDay,
}

impl WeatherLookup {
    pub fn new(resolver: CoordinateResolver, forecast: Box<dyn ForecastSource>, icons: SymbolCatalog) -> Self {
        Self { resolver, forecast, icons, hour: HourOfDay::default() }
    }

    /// Default geocoder, met.no client and icon source from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let geocoder = default_geocoder_from_config(config)?;
        let forecast = MetNoClient::new(config.forecast_url(), config.user_agent())?;
        let icons = config.symbol_catalog()?;

        Ok(Self::new(CoordinateResolver::new(geocoder), Box::new(forecast), icons))
    }

    pub fn with_hour(mut self, hour: HourOfDay) -> Self {
        self.hour = hour;
        self
    }

    pub async fn resolve(&self, query: SearchQuery<'_>) -> Result<ResolvedPlace> {
        match query {
            SearchQuery::Place(name) => self.resolver.resolve_by_name(name).await,
            SearchQuery::Device(sensor) => self.resolver.resolve_by_device(sensor).await,
        }
    }

    /// Resolve `query`, then fetch and summarize its forecast.
    pub async fn report(&self, query: SearchQuery<'_>) -> Result<ForecastReport> {
        let place = self.resolve(query).await?;
        let doc = self.forecast.fetch(place.coordinates).await?;
        Ok(self.build_report(place, &doc, &Local::now()))
    }

    /// Current conditions plus one summary per [`FORECAST_DAYS`] offset.
    pub fn build_report<Tz: TimeZone>(
        &self,
        place: ResolvedPlace,
        doc: &ForecastDocument,
        reference: &DateTime<Tz>,
    ) -> ForecastReport {
        ForecastReport {
            place,
            current: current_conditions(doc, &self.icons),
            days: self.days(doc, reference),
        }
    }

    fn days<Tz: TimeZone>(&self, doc: &ForecastDocument, reference: &DateTime<Tz>) -> Vec<DaySummary> {
        FORECAST_DAYS
            .map(|days_ahead| extract(doc, self.hour, days_ahead, reference, &self.icons))
            .collect()
    }

    /// Run one search against `session`, recording each step as an event.
    ///
    /// Failures end up in the returned snapshot rather than as an `Err`.
    pub async fn search(&self, session: &Session, query: SearchQuery<'_>) -> SessionState {
        let state = session.dispatch(Event::SearchRequested { query: query.describe() });
        let token = state.latest_token();

        let place = match self.resolve(query).await {
            Ok(place) => place,
            Err(error) => return session.dispatch(Event::ResolutionFailed { token, error }),
        };
        let coordinates = place.coordinates;
        session.dispatch(Event::CoordinatesResolved { token, place });

        let event = match self.forecast.fetch(coordinates).await {
            Ok(doc) => Event::ForecastReceived {
                token,
                current: current_conditions(&doc, &self.icons),
                days: self.days(&doc, &Local::now()),
            },
            Err(error) => Event::ForecastFailed { token, error },
        };
        session.dispatch(event)
    }
}
