use crate::{
    client::Command,
    collectors::{
        GaugeSet,
        Module,
        ScrapeContext,
    },
    error::ScrapeError,
    metrics::LabelInjector,
    parsers::{
        parse_cons,
        CLIENT_LABEL,
    },
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

const CONS_GAUGES: &[(&str, &str, &str)] = &[
    ("queued", "client_queued", "Client queue."),
    ("recved", "client_recved", "Number of packets received by the client."),
    ("sent", "client_sent", "Number of packets sent by the client."),
    ("sid", "client_sid", "Client Session Id."),
    ("lop", "client_lop", "Client last operation instructions."),
    ("est", "client_est", "Client connection timestamp."),
    ("to", "client_to", "Client connection timeout."),
    ("lcxid", "client_lcxid", "The last id of the client (no specific id confirmed)."),
    ("lzxid", "client_lzxid", "The last id of the client (state change id)."),
    ("lresp", "client_lresp", "Client last response timestamp."),
    ("llat", "client_llat", "Client last delay."),
    ("minlat", "client_minlat", "Client Minimum delay."),
    ("avglat", "client_avglat", "Client Average delay."),
    ("maxlat", "client_maxlat", "Client Maximum delay."),
];

/// Per-connection statistics from the `cons` command, labeled by node and client.
pub struct ConsCollector {
    gauges: GaugeSet,
}

impl ConsCollector {
    pub const NAME: &'static str = "cons";

    pub fn new(injector: &Arc<LabelInjector>) -> prometheus::Result<Self> {
        Ok(Self {
            gauges: GaugeSet::new(injector, &["node", CLIENT_LABEL], CONS_GAUGES)?,
        })
    }

    pub fn factory(injector: &Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> {
        Ok(Box::new(Self::new(injector)?))
    }

    async fn refresh(&self, ctx: &ScrapeContext<'_>) -> Result<(), ScrapeError> {
        let body = ctx.backend.send(Command::Cons).await?;
        let records = parse_cons(&body);
        debug!(connections = records.len(), "cons data");

        for record in &records {
            let client = record.label(CLIENT_LABEL).unwrap_or_default();
            self.gauges.apply(record, &[ctx.node(), client]);
        }
        Ok(())
    }
}

impl Module for ConsCollector {
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
