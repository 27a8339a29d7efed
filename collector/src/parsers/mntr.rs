use crate::metrics::StatsRecord;

/// The only `mntr` key whose value is textual; reported as 1 on the leader.
pub const SERVER_STATE_KEY: &str = "zk_server_state";

const LEADER: &str = "leader";

/// Parses the whitespace separated `key value` lines of a `mntr` reply.
pub fn parse_mntr(body: &[u8]) -> Vec<StatsRecord> {
    let reply = String::from_utf8_lossy(body);
    let mut record = StatsRecord::default();

    for line in reply.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let line = line.replace('\t', " ");
        let Some((key, value)) = line.trim().split_once(' ') else {
            warn!(line = %line, "skipping mntr line without a value");
            continue;
        };

        let value = value.trim();
        if key == SERVER_STATE_KEY {
            let is_leader = if value == LEADER { "1" } else { "0" };
            record.insert_metric(key, is_leader);
        } else {
            record.insert_metric(key, value);
        }
    }

    vec![record]
}
