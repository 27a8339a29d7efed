use crate::{
    client::Command,
    collectors::{
        GaugeSet,
        Module,
        ScrapeContext,
    },
    error::ScrapeError,
    metrics::LabelInjector,
    parsers::parse_mntr,
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

const MNTR_GAUGES: &[(&str, &str, &str)] = &[
    ("zk_num_alive_connections", "connections", "the number of connections."),
    ("zk_server_state", "server_is_leader", "server mode(follower/leader)."),
    ("zk_min_latency", "min_latency", "Minimum Latency."),
    ("zk_avg_latency", "avg_latency", "Average Latency."),
    ("zk_max_latency", "max_latency", "Maximum Latency."),
    ("zk_open_file_descriptor_count", "open_file_descriptor_count", "Number of open file descriptors."),
    ("zk_max_file_descriptor_count", "max_file_descriptor_count", "Maximum number of file descriptors."),
    ("zk_outstanding_requests", "outstanding_requests", "Stacked requests."),
    ("zk_approximate_data_size", "approximate_data_size", "Data size."),
    ("zk_packets_sent", "packets_sent", "Number of packets sent."),
    ("zk_packets_received", "packets_received", "Number of packets received."),
    ("zk_followers", "followers", "Number of follower(Only leader have)."),
    ("zk_synced_followers", "synced_followers", "Number of synchronized follower(Only leader have)."),
    ("zk_pending_syncs", "pending_syncs", "Number of ready to sync."),
    ("zk_last_proposal_size", "last_proposal_size", "The size of the last Proposal message."),
    ("zk_max_proposal_size", "max_proposal_size", "The size of the maximum Proposal message."),
    ("zk_min_proposal_size", "min_proposal_size", "The size of the minimum Proposal message."),
    ("zk_cnt_node_changed_watch_count", "cnt_node_changed_watch_count", "the changed watch count"),
];

/// Server statistics from the `mntr` command, labeled by node.
pub struct MntrCollector {
    gauges: GaugeSet,
}

impl MntrCollector {
    pub const NAME: &'static str = "mntr";

    pub fn new(injector: &Arc<LabelInjector>) -> prometheus::Result<Self> {
        Ok(Self {
            gauges: GaugeSet::new(injector, &["node"], MNTR_GAUGES)?,
        })
    }

    pub fn factory(injector: &Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> {
        Ok(Box::new(Self::new(injector)?))
    }

    async fn refresh(&self, ctx: &ScrapeContext<'_>) -> Result<(), ScrapeError> {
        let body = ctx.backend.send(Command::Mntr).await?;
        let records = parse_mntr(&body);
        debug!(?records, "mntr data");

        for record in &records {
            self.gauges.apply(record, &[ctx.node()]);
        }
        Ok(())
    }
}

impl Module for MntrCollector {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testing::{
        injector,
        sample,
        FakeBackend,
    };

    #[tokio::test]
    async fn sets_gauges_present_in_the_reply() {
        let backend = FakeBackend::default().reply(
            Command::Mntr,
            "zk_server_state\tleader\nzk_num_alive_connections\t7\nzk_avg_latency\t0.4\nzk_version\t3.8.4\n",
        );
        let (injector, identity) = injector();
        let mut collector = MntrCollector::new(&injector).unwrap();
        let ctx = ScrapeContext {
            backend: &backend,
            identity: &identity,
        };

        let mut out = Vec::new();
        collector.collect(&ctx, &mut out).await.unwrap();

        assert_eq!(sample(&out, "zookeeper_server_is_leader", &[("node", "zk1")]), Some(1.0));
        assert_eq!(sample(&out, "zookeeper_connections", &[("node", "zk1")]), Some(7.0));
        assert_eq!(sample(&out, "zookeeper_avg_latency", &[("node", "zk1")]), Some(0.4));
        assert_eq!(sample(&out, "zookeeper_followers", &[("node", "zk1")]), None);
    }

    #[tokio::test]
    async fn non_numeric_values_are_skipped() {
        let backend = FakeBackend::default().reply(Command::Mntr, "zk_followers\tmany\nzk_pending_syncs\t3\n");
        let (injector, identity) = injector();
        let mut collector = MntrCollector::new(&injector).unwrap();
        let ctx = ScrapeContext {
            backend: &backend,
            identity: &identity,
        };

        let mut out = Vec::new();
        collector.collect(&ctx, &mut out).await.unwrap();

        assert_eq!(sample(&out, "zookeeper_followers", &[]), None);
        assert_eq!(sample(&out, "zookeeper_pending_syncs", &[]), Some(3.0));
    }
}
