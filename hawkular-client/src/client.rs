//! The transport client: batching, request construction and error classification.
//!
//! # Partial failures
//!
//! [`HawkularClient::put`] is not transactional. Records are partitioned by
//! metric type and each type is POSTed on its own. The first group that fails
//! stops the call and its error is returned; groups sent before it stay
//! accepted on the server and nothing is rolled back or retried. Callers that
//! need to know exactly which groups made it should use
//! [`HawkularClient::put_each`].
//!
//! # Tenants
//!
//! The tenant header is read from the client at the moment a request is built.
//! [`HawkularClient::tenant`] needs `&mut self`, so a tenant cannot change under
//! an in-flight submission of the same instance. For concurrent multi-tenant
//! use, derive one client per tenant with [`HawkularClient::with_tenant`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, HOST};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn, Level};

use crate::config::ClientConfig;
use crate::error::{MetricsError, Result};
use crate::logging::truncate_field;
use crate::metric::{create_datapoint, create_metric, Datapoint, MetricRecord, MetricType};
use crate::security::Credentials;
use crate::transport::{HttpRequest, ReqwestTransport, Transport, TransportError};
use crate::url::UrlBuilder;

/// Header carrying the tenant id.
pub const TENANT_HEADER: &str = "hawkular-tenant";

/// Statuses the service uses for success.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized compactly before sending.
    Json(Value),
    /// Sent exactly as given. An empty string sends no body.
    Raw(String),
}

impl Payload {
    /// Converts any serializable value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    fn into_body(self) -> Result<Option<Vec<u8>>> {
        match self {
            Payload::Json(value) => Ok(Some(serde_json::to_vec(&value)?)),
            Payload::Raw(text) if text.is_empty() => Ok(None),
            Payload::Raw(text) => Ok(Some(text.into_bytes())),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Raw(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Raw(text.to_string())
    }
}

/// Wire form of a record inside a type group; the type lives in the URL.
#[derive(Serialize)]
struct RawMetric<'a> {
    id: &'a str,
    data: &'a [Datapoint],
}

/// Result of submitting one metric type group.
#[derive(Debug)]
pub struct GroupOutcome {
    pub metric_type: MetricType,
    /// Number of records in the group
    pub records: usize,
    pub result: Result<()>,
}

/// Per-type outcomes of [`HawkularClient::put_each`], in submission order.
#[derive(Debug, Default)]
pub struct PutReport {
    pub outcomes: Vec<GroupOutcome>,
}

impl PutReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Types whose group was accepted.
    pub fn succeeded(&self) -> Vec<MetricType> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.metric_type)
            .collect()
    }

    /// Failed groups with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (MetricType, &MetricsError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.metric_type, e)))
    }

    /// Collapses the report to the first error, like [`HawkularClient::put`].
    pub fn into_result(self) -> Result<()> {
        self.outcomes
            .into_iter()
            .map(|o| o.result)
            .find(|r| r.is_err())
            .unwrap_or(Ok(()))
    }
}

/// Client for a Hawkular Metrics endpoint.
#[derive(Clone)]
pub struct HawkularClient {
    config: Arc<ClientConfig>,
    tenant_id: String,
    urls: UrlBuilder,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for HawkularClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HawkularClient")
            .field("tenant_id", &self.tenant_id)
            .field("base_url", &self.urls.base_url())
            .field("credentials", &self.credentials.scheme())
            .finish_non_exhaustive()
    }
}

impl HawkularClient {
    /// Creates a client that talks HTTP(S) through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::build(config, Arc::new(transport)))
    }

    /// Creates a client on top of a caller supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, transport))
    }

    fn build(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            tenant_id: config.tenant_id().to_string(),
            urls: UrlBuilder::from_config(&config),
            credentials: config.credentials(),
            config: Arc::new(config),
            transport,
        }
    }

    /// Switches the tenant used by this instance for every later call.
    pub fn tenant(&mut self, tenant_id: impl Into<String>) {
        self.tenant_id = tenant_id.into();
    }

    /// Returns a copy of this client bound to another tenant.
    ///
    /// The copy shares the transport.
    pub fn with_tenant(&self, tenant_id: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.tenant(tenant_id);
        client
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends one record or a batch of records, possibly of mixed types.
    ///
    /// Issues one POST per metric type. Returns the first failure; groups sent
    /// before it are not rolled back (see the module docs).
    ///
    /// # Errors
    ///
    /// * [`MetricsError::InvalidMetricType`] if a record has no type
    /// * [`MetricsError::InvalidRequest`] for an empty batch, id or data, or a NaN/infinite value
    /// * [`MetricsError::Server`] / [`MetricsError::Connection`] from the first failing group
    #[instrument(skip(self, records), fields(tenant = %self.tenant_id, groups = tracing::field::Empty))]
    pub async fn put(&self, records: impl Into<Vec<MetricRecord>>) -> Result<()> {
        let groups = partition(records.into())?;
        tracing::Span::current().record("groups", groups.len());

        for (metric_type, records) in &groups {
            self.post_group(*metric_type, records).await?;
        }
        Ok(())
    }

    /// Like [`put`](Self::put) but submits every group and reports each outcome.
    ///
    /// Validation errors are still returned before anything is sent.
    #[instrument(skip(self, records), fields(tenant = %self.tenant_id))]
    pub async fn put_each(&self, records: impl Into<Vec<MetricRecord>>) -> Result<PutReport> {
        let groups = partition(records.into())?;

        let mut report = PutReport::default();
        for (metric_type, records) in &groups {
            let result = self.post_group(*metric_type, records).await;
            report.outcomes.push(GroupOutcome {
                metric_type: *metric_type,
                records: records.len(),
                result,
            });
        }
        Ok(report)
    }

    /// Sends a single value for a single metric.
    #[instrument(skip_all, fields(tenant = %self.tenant_id, metric_type = %metric_type))]
    pub async fn push(
        &self,
        metric_type: MetricType,
        metric_id: impl Into<String>,
        value: impl Into<Value>,
        timestamp: Option<i64>,
    ) -> Result<()> {
        let record = create_metric(metric_type, metric_id, create_datapoint(value, timestamp, None));
        self.put(record).await
    }

    /// Replaces the tags of a metric with `tags`.
    ///
    /// Tags not listed are removed on the server. Pass `None` as the type to
    /// address the generic metrics collection.
    #[instrument(skip(self, metric_type, tags), fields(tenant = %self.tenant_id))]
    pub async fn update_metric_tags<K, V>(
        &self,
        metric_type: impl Into<Option<MetricType>>,
        metric_id: &str,
        tags: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        if metric_id.is_empty() {
            return Err(MetricsError::invalid_request("metric id cannot be empty"));
        }

        let tags: BTreeMap<String, String> = tags
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let url = self.urls.tags_url(metric_type, metric_id);

        self.request(Method::PUT, &url, Payload::json(&tags)?).await
    }

    async fn post_group(&self, metric_type: MetricType, records: &[MetricRecord]) -> Result<()> {
        let payload: Vec<RawMetric<'_>> = records
            .iter()
            .map(|r| RawMetric {
                id: &r.id,
                data: &r.data,
            })
            .collect();
        let url = self.urls.datapoints_url(metric_type);

        self.request(Method::POST, &url, Payload::json(&payload)?)
            .await?;

        if self.config.log_config().base_level >= Level::INFO {
            info!(%metric_type, records = records.len(), "Submitted datapoints");
        }
        Ok(())
    }

    /// Issues one request and classifies its outcome.
    ///
    /// * 200, 201 and 204 are success, whatever the body.
    /// * Any other status becomes [`MetricsError::Server`].
    /// * A request that got no response becomes [`MetricsError::Connection`].
    /// * Other transport errors pass through as [`MetricsError::Transport`].
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        payload: impl Into<Payload>,
    ) -> Result<()> {
        let log = self.config.log_config();
        let headers = self.headers()?;
        let body = payload.into().into_body()?;

        debug!(
            %method,
            url,
            bytes = body.as_ref().map_or(0, Vec::len),
            "Sending request"
        );
        if log.log_payloads {
            if let Some(text) = body.as_deref().and_then(|b| std::str::from_utf8(b).ok()) {
                debug!(body = %truncate_field(text, log.max_field_length), "Request payload");
            }
        }

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        };

        match self.transport.execute(request).await {
            Ok(response) if SUCCESS_STATUSES.contains(&response.status) => {
                debug!(status = response.status, "Request accepted");
                Ok(())
            }
            Ok(response) => {
                let err = MetricsError::from_response(response.status, &response.body);
                warn!(
                    status = response.status,
                    error_msg = %truncate_field(err.server_message().unwrap_or_default(), log.max_field_length),
                    "Metrics service rejected request"
                );
                Err(err)
            }
            Err(TransportError::Unreachable { reason }) => {
                error!(url, %reason, "Could not reach metrics service");
                Err(MetricsError::Connection { reason })
            }
            Err(TransportError::Other(source)) => Err(MetricsError::Transport(source)),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(TENANT_HEADER),
            header_value("tenant id", &self.tenant_id)?,
        );
        headers.insert(HOST, header_value("host", self.config.host())?);

        if let Some(authorization) = self.credentials.authorization_header() {
            let mut value = header_value("authorization", authorization.expose())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| MetricsError::invalid_request(format!("{what} is not a valid header value")))
}

/// Groups records by type, rejecting anything that cannot be sent.
fn partition(records: Vec<MetricRecord>) -> Result<BTreeMap<MetricType, Vec<MetricRecord>>> {
    if records.is_empty() {
        return Err(MetricsError::invalid_request("batch contains no metrics"));
    }

    let mut groups: BTreeMap<MetricType, Vec<MetricRecord>> = BTreeMap::new();
    for record in records {
        let Some(metric_type) = record.metric_type else {
            return Err(MetricsError::InvalidMetricType { id: record.id });
        };
        if record.id.is_empty() {
            return Err(MetricsError::invalid_request("metric id cannot be empty"));
        }
        if record.data.is_empty() {
            return Err(MetricsError::invalid_request(format!(
                "metric '{}' has no datapoints",
                record.id
            )));
        }
        if let Some(datapoint) = record.data.iter().find(|dp| dp.value.is_null()) {
            return Err(MetricsError::invalid_request(format!(
                "metric '{}' has a datapoint at {} without a value (NaN and infinite floats have no JSON form)",
                record.id, datapoint.timestamp
            )));
        }
        groups.entry(metric_type).or_default().push(record);
    }
    Ok(groups)
}

/// Convenience for building a tag map inline.
pub fn tags<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> HashMap<String, String>
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
