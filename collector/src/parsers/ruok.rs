use crate::metrics::StatsRecord;

/// Metric key holding the liveness answer.
pub const RUOK_KEY: &str = "ruok";

const IMOK: &str = "imok";

/// Maps a `ruok` reply to `1` when the server answered `imok`, `0` otherwise.
pub fn parse_ruok(body: &[u8]) -> Vec<StatsRecord> {
    let reply = String::from_utf8_lossy(body);
    let up = if reply.trim() == IMOK { "1" } else { "0" };

    let mut record = StatsRecord::default();
    record.insert_metric(RUOK_KEY, up);
    vec![record]
}
