//! Diagnostics for one CLI invocation. Events go to stderr so stdout stays
//! clean for `--json`; spans are also exported over OTLP/gRPC when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use anyhow::{anyhow, Result};
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    trace::{SdkTracerProvider, Tracer},
    Resource,
};
use std::{env::var, io, sync::OnceLock, time::Duration};
use tonic::{
    metadata::{MetadataKey, MetadataMap, MetadataValue},
    transport::ClientTlsConfig,
};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

const SERVICE_NAME: &str = "guardian-admin";
const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";
const EXPORT_TIMEOUT: Duration = Duration::from_secs(2);

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// What is being run, and against which backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub api_url: String,
    pub verbosity: u8,
}

impl Invocation {
    fn resource(&self, run_id: &str) -> Resource {
        Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new("service.name", SERVICE_NAME),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                KeyValue::new("service.instance.id", run_id.to_string()),
                KeyValue::new("guardian_admin.command", self.command.clone()),
                KeyValue::new("guardian_admin.api_url", self.api_url.clone()),
            ])
            .build()
    }
}

/// Map a `-v` count to a tracing level.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

// RUST_LOG refines the `-v` level; transport crates stay quiet unless asked.
fn filter(level: Level) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("h2=error".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?))
}

/// Collector endpoint and request metadata from the `OTEL_EXPORTER_OTLP_*`
/// variables.
#[derive(Debug)]
struct Exporter {
    endpoint: String,
    metadata: MetadataMap,
}

impl Exporter {
    fn from_env() -> Result<Option<Self>> {
        let Ok(endpoint) = var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
            return Ok(None);
        };
        if let Ok(proto) = var("OTEL_EXPORTER_OTLP_PROTOCOL") {
            if proto != "grpc" {
                debug!("OTEL_EXPORTER_OTLP_PROTOCOL='{proto}' ignored: only 'grpc' is supported");
            }
        }
        let headers = var("OTEL_EXPORTER_OTLP_HEADERS").unwrap_or_default();
        Self::new(&endpoint, &headers).map(Some)
    }

    fn new(endpoint: &str, headers: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_OTLP_ENDPOINT.to_string()
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint.trim_end_matches('/'))
        };

        Ok(Self {
            endpoint,
            metadata: metadata(headers)?,
        })
    }

    fn tls_domain(&self) -> Option<&str> {
        self.endpoint
            .strip_prefix("https://")
            .and_then(|rest| rest.split('/').next())
            .and_then(|authority| authority.split(':').next())
            .filter(|host| !host.is_empty())
    }

    fn tracer(self, invocation: &Invocation) -> Result<Tracer> {
        let mut builder = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .with_compression(Compression::Gzip)
            .with_timeout(EXPORT_TIMEOUT);

        if let Some(host) = self.tls_domain() {
            let tls = ClientTlsConfig::new()
                .domain_name(host.to_string())
                .with_native_roots();
            builder = builder.with_tls_config(tls);
        }
        if !self.metadata.is_empty() {
            builder = builder.with_metadata(self.metadata);
        }

        let run_id = var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string());
        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(builder.build()?)
            .with_resource(invocation.resource(&run_id))
            .build();

        let _ = TRACER_PROVIDER.set(provider.clone());
        global::set_tracer_provider(provider.clone());

        Ok(provider.tracer(SERVICE_NAME))
    }
}

// `key=value` pairs separated by commas. Only ASCII metadata is accepted.
fn metadata(headers: &str) -> Result<MetadataMap> {
    let mut meta = MetadataMap::new();
    for pair in headers.split(',').filter(|pair| !pair.trim().is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            debug!("skipping malformed OTLP header entry '{}'", pair.trim());
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let name = MetadataKey::from_bytes(key.as_bytes())
            .map_err(|e| anyhow!("invalid OTLP header name {key}: {e}"))?;
        let value: MetadataValue<_> = value
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid OTLP header value for {key}: {e}"))?;
        meta.insert(name, value);
    }
    Ok(meta)
}

/// Install the stderr logger for `invocation`, plus the OTLP layer when an
/// exporter is configured.
///
/// # Errors
///
/// Returns an error if the exporter settings are invalid or a global
/// subscriber is already installed.
pub fn init(invocation: &Invocation) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .compact();
    let filter = filter(level_for(invocation.verbosity))?;

    if let Some(exporter) = Exporter::from_env()? {
        let tracer = exporter.tracer(invocation)?;
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        let subscriber = Registry::default()
            .with(fmt_layer)
            .with(otel_layer)
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Flush pending spans before the process exits (noop without an exporter).
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("flushing spans");
        let _ = provider.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn invocation() -> Invocation {
        Invocation {
            command: "audit".to_string(),
            api_url: "https://admin.example.com".to_string(),
            verbosity: 2,
        }
    }

    #[test]
    fn level_for_maps_counts() {
        assert_eq!(level_for(0), Level::ERROR);
        assert_eq!(level_for(2), Level::INFO);
        assert_eq!(level_for(4), Level::TRACE);
        assert_eq!(level_for(9), Level::TRACE);
    }

    #[test]
    fn filter_quiets_transport_crates() {
        temp_env::with_vars([("RUST_LOG", None::<&str>)], || {
            let rendered = filter(Level::DEBUG).unwrap().to_string();
            assert!(rendered.contains("debug"));
            assert!(rendered.contains("reqwest=warn"));
            assert!(rendered.contains("hyper=error"));
        });
    }

    #[test]
    fn resource_names_the_command_and_backend() {
        let resource = invocation().resource("01J0000000000000000000000");
        let get = |key: &'static str| resource.get(&opentelemetry::Key::from_static_str(key));

        assert_eq!(get("service.name").unwrap().as_str(), SERVICE_NAME);
        assert_eq!(get("guardian_admin.command").unwrap().as_str(), "audit");
        assert_eq!(
            get("guardian_admin.api_url").unwrap().as_str(),
            "https://admin.example.com"
        );
        assert_eq!(
            get("service.instance.id").unwrap().as_str(),
            "01J0000000000000000000000"
        );
    }

    #[test]
    fn exporter_endpoint_defaults_to_https() {
        let exporter = Exporter::new("collector.example.com:4317/", "").unwrap();
        assert_eq!(exporter.endpoint, "https://collector.example.com:4317");
        assert_eq!(exporter.tls_domain(), Some("collector.example.com"));

        let exporter = Exporter::new("http://localhost:4317", "").unwrap();
        assert_eq!(exporter.tls_domain(), None);

        let exporter = Exporter::new(" ", "").unwrap();
        assert_eq!(exporter.endpoint, DEFAULT_OTLP_ENDPOINT);
    }

    #[test]
    fn metadata_skips_malformed_entries() {
        let meta = metadata("Authorization = Bearer abc , malformed, x-scope=a=b").unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("authorization").unwrap().to_str().unwrap(), "Bearer abc");
        assert_eq!(meta.get("x-scope").unwrap().to_str().unwrap(), "a=b");
        assert!(metadata("").unwrap().is_empty());
    }

    #[test]
    fn binary_metadata_is_rejected() {
        let err = metadata("custom-bin=YmluYXJ5").unwrap_err();
        assert!(err.to_string().contains("invalid OTLP header name custom-bin"));
    }

    #[test]
    fn without_endpoint_nothing_is_exported() {
        temp_env::with_vars([("OTEL_EXPORTER_OTLP_ENDPOINT", None::<&str>)], || {
            assert!(Exporter::from_env().unwrap().is_none());
        });
        shutdown_tracer();
    }
}
