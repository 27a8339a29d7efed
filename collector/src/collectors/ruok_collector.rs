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
        parse_ruok,
        RUOK_KEY,
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

/// Liveness of the server as answered to `ruok`.
pub struct RuokCollector {
    gauges: GaugeSet,
}

impl RuokCollector {
    pub const NAME: &'static str = "ruok";

    pub fn new(injector: &Arc<LabelInjector>) -> prometheus::Result<Self> {
        Ok(Self {
            gauges: GaugeSet::new(
                injector,
                &["node"],
                &[(RUOK_KEY, "up", "the status of zookeeper service.")],
            )?,
        })
    }

    pub fn factory(injector: &Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> {
        Ok(Box::new(Self::new(injector)?))
    }

    async fn refresh(&self, ctx: &ScrapeContext<'_>) -> Result<(), ScrapeError> {
        let body = ctx.backend.send(Command::Ruok).await?;
        let records = parse_ruok(&body);
        debug!(?records, "ruok data");

        for record in &records {
            self.gauges.apply(record, &[ctx.node()]);
        }
        Ok(())
    }
}

impl Module for RuokCollector {
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
