use crate::metrics::StatsRecord;

/// Label carrying the client identifier of a connection.
pub const CLIENT_LABEL: &str = "client";

/// Marks the start of each connection in a `cons` reply.
const CLIENT_DELIMITER: char = '/';

/// Parses a `cons` reply into one record per client connection.
///
/// Each connection looks like
/// `/10.0.0.3:52614[1](queued=0,recved=12,sent=12,...)`; the text before the
/// parenthesis becomes the `client` label and the pairs inside become metrics.
pub fn parse_cons(body: &[u8]) -> Vec<StatsRecord> {
    let reply = String::from_utf8_lossy(body);
    reply.split(CLIENT_DELIMITER).filter_map(parse_connection).collect()
}

fn parse_connection(block: &str) -> Option<StatsRecord> {
    let (client, rest) = block.split_once('(')?;
    let client = client.trim();
    if client.is_empty() {
        debug!(block, "skipping connection without a client identifier");
        return None;
    }

    let pairs = rest.split_once(')').map_or(rest, |(inside, _)| inside);
    let mut record = StatsRecord::default().with_label(CLIENT_LABEL, client);
    for pair in pairs.split(',') {
        match pair.split_once('=') {
            Some((key, value)) => record.insert_metric(key.trim(), value.trim()),
            None if pair.trim().is_empty() => {}
            None => debug!(client, pair, "skipping connection field without `=`"),
        }
    }

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONS: &str = " /10.0.0.3:52614[1](queued=0,recved=120,sent=121,sid=0x1000a2b3c4d0001,lop=PING,est=1700000000000,to=30000,lcxid=0x5,lzxid=0x200000010,lresp=1700000100000,llat=0,minlat=0,avglat=1,maxlat=9)
 /10.0.0.4:41000[1](queued=2,recved=7,sent=6)
 /127.0.0.1:60000[0](queued=0,recved=1,sent=0)

";

    #[test]
    fn one_record_per_connection() {
        let records = parse_cons(CONS.as_bytes());

        let clients: Vec<_> = records.iter().map(|r| r.label(CLIENT_LABEL).unwrap()).collect();
        assert_eq!(clients, vec!["10.0.0.3:52614[1]", "10.0.0.4:41000[1]", "127.0.0.1:60000[0]"]);
    }

    #[test]
    fn metrics_stay_with_their_connection() {
        let records = parse_cons(CONS.as_bytes());

        assert_eq!(records[0].metrics.len(), 14);
        assert_eq!(records[0].metric("maxlat"), Some("9"));
        assert_eq!(records[0].metric("lop"), Some("PING"));

        let keys: Vec<_> = records[1].metrics.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["queued", "recved", "sent"]);
        assert_eq!(records[1].metric("queued"), Some("2"));
        assert_eq!(records[2].metric("recved"), Some("1"));
    }

    #[test]
    fn junk_without_connections_gives_no_records() {
        assert!(parse_cons(b"").is_empty());
        assert!(parse_cons(b"This ZooKeeper instance is not currently serving requests\n").is_empty());
    }

    #[test]
    fn fields_without_value_are_skipped() {
        let records = parse_cons(b"/10.0.0.9:1[1](queued=1,broken,sent=3)\n");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metrics.len(), 2);
        assert_eq!(records[0].metric("sent"), Some("3"));
    }

    #[test]
    fn parsing_is_repeatable() {
        assert_eq!(parse_cons(CONS.as_bytes()), parse_cons(CONS.as_bytes()));
    }
}
