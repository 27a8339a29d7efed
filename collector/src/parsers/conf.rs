use crate::metrics::StatsRecord;

/// Header that separates the plain settings from the ensemble members.
const MEMBERSHIP_MARKER: &str = "membership:";

/// Parses the `key=value` lines of a `conf` reply into a single record.
pub fn parse_conf(body: &[u8]) -> Vec<StatsRecord> {
    let reply = String::from_utf8_lossy(body);
    let mut record = StatsRecord::default();

    for line in reply.lines() {
        let line = line.trim();
        if line.is_empty() || line.contains(MEMBERSHIP_MARKER) {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => record.insert_metric(key.trim(), value.trim()),
            None => warn!(line, "skipping conf line without `=`"),
        }
    }

    vec![record]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    const CONF: &str = "clientPort=2181
dataDir=/data/version-2
tickTime=2000
maxClientCnxns=60
serverId=1

membership: 
server.1=zk1:2888:3888:participant;0.0.0.0:2181
server.2=zk2:2888:3888:participant;0.0.0.0:2181
version=100000000
";

    #[test]
    fn one_record_with_every_setting() {
        let records = parse_conf(CONF.as_bytes());

        assert_eq!(records.len(), 1);
        let expected: BTreeMap<String, String> = [
            ("clientPort", "2181"),
            ("dataDir", "/data/version-2"),
            ("tickTime", "2000"),
            ("maxClientCnxns", "60"),
            ("serverId", "1"),
            ("server.1", "zk1:2888:3888:participant;0.0.0.0:2181"),
            ("server.2", "zk2:2888:3888:participant;0.0.0.0:2181"),
            ("version", "100000000"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(records[0].metrics, expected);
        assert!(records[0].labels.is_empty());
    }

    #[test]
    fn lines_without_separator_are_skipped() {
        let records = parse_conf(b"tickTime=2000\nnot a setting\n\n");

        assert_eq!(records[0].metrics.len(), 1);
        assert_eq!(records[0].metric("tickTime"), Some("2000"));
    }

    #[test]
    fn splits_on_the_first_equals_sign() {
        let records = parse_conf(b"jvm.flags=-Da=b\n");

        assert_eq!(records[0].metric("jvm.flags"), Some("-Da=b"));
    }

    #[test]
    fn empty_reply_gives_an_empty_record() {
        assert_eq!(parse_conf(b""), vec![StatsRecord::default()]);
    }

    #[test]
    fn parsing_is_repeatable() {
        assert_eq!(parse_conf(CONF.as_bytes()), parse_conf(CONF.as_bytes()));
    }
}
