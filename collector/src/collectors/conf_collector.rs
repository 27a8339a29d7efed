use crate::{
    client::Command,
    collectors::{
        GaugeSet,
        Module,
        ScrapeContext,
    },
    error::ScrapeError,
    metrics::{
        LabelInjector,
        StatsRecord,
    },
    parsers::parse_conf,
};
use prometheus::{
    core::Desc,
    proto::MetricFamily,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};

const CONF_GAUGES: &[(&str, &str, &str)] = &[
    ("maxClientCnxns", "max_connections", "max of connections."),
    ("tickTime", "tick_time", "The length of a single tick in milliseconds."),
    ("initLimit", "init_limit", "Ticks the initial synchronization phase can take."),
    ("syncLimit", "sync_limit", "Ticks that can pass between sending a request and getting an acknowledgement."),
    ("minSessionTimeout", "min_session_timeout", "Minimum session timeout in milliseconds."),
    ("maxSessionTimeout", "max_session_timeout", "Maximum session timeout in milliseconds."),
];

/// Server configuration from the `conf` command, labeled by node.
pub struct ConfCollector {
    gauges: GaugeSet,
    /// Node label resolved from the last successful `conf` reply.
    node: Option<String>,
}

impl ConfCollector {
    pub const NAME: &'static str = "conf";

    pub fn new(injector: &Arc<LabelInjector>) -> prometheus::Result<Self> {
        Ok(Self {
            gauges: GaugeSet::new(injector, &["node"], CONF_GAUGES)?,
            node: None,
        })
    }

    pub fn factory(injector: &Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> {
        Ok(Box::new(Self::new(injector)?))
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    async fn refresh(&mut self, ctx: &ScrapeContext<'_>) -> Result<(), ScrapeError> {
        let body = ctx.backend.send(Command::Conf).await?;
        let records = parse_conf(&body);
        debug!(?records, "conf data");

        let node = records
            .first()
            .and_then(ensemble_address)
            .unwrap_or_else(|| ctx.node().to_string());
        for record in &records {
            self.gauges.apply(record, &[node.as_str()]);
        }
        self.node = Some(node);
        Ok(())
    }
}

/// `<host of server.<serverId>>:<clientPort>`, when the reply names both.
fn ensemble_address(record: &StatsRecord) -> Option<String> {
    let server_id = record.metric("serverId")?;
    let member = record.metric(&format!("server.{server_id}"))?;
    let host = member.split(':').next().filter(|host| !host.is_empty())?;
    let port = record.metric("clientPort")?;
    Some(format!("{host}:{port}"))
}

impl Module for ConfCollector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn describe(&self) -> Vec<Desc> {
        self.gauges.describe()
    }

    fn collect<'a>(
        &'a mut self,
        ctx: &'a ScrapeContext<'a>,
        out: &'a mut Vec<MetricFamily>,
    ) -> Pin<Box<dyn Future<Output = Result<(), ScrapeError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.refresh(ctx).await;
            out.extend(self.gauges.collect());
            result
        })
    }
}
