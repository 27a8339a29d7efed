//! Turn raw four-letter-word replies into [`StatsRecord`](crate::metrics::StatsRecord)s.
//!
//! All parsers are total: malformed input degrades to fewer records or fewer
//! metrics, never to an error. Parsing holds no state, so the same bytes
//! always yield the same records.

mod conf;
mod cons;
mod mntr;
mod ruok;

pub use conf::parse_conf;
pub use cons::{
    parse_cons,
    CLIENT_LABEL,
};
pub use mntr::{
    parse_mntr,
    SERVER_STATE_KEY,
};
pub use ruok::{
    parse_ruok,
    RUOK_KEY,
};
