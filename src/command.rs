/*!
 * Command Surface
 *
 * `Cmd` describes one engine operation as data, so operations can be
 * queued into transactions, parsed from text and replayed. `Reply` is the
 * typed result of running a `Cmd`.
 *
 * `parse_line` turns a whitespace-separated command line (as typed into
 * the shell) into a `Cmd`. Names are matched case-insensitively and
 * argument counts are validated before anything runs.
 */

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use bytes::Bytes;

use crate::error::Result;
use crate::geo::GeoUnit;
use crate::storage::{Locked, TtlStatus};
use crate::store::lists::End;
use crate::store::{bits, geo, hashes, hll, keys, lists, sets, strings, zsets};
use crate::lock;
use crate::txn::compare_and_delete;

/// An engine operation with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// GET key - string value
    Get(String),
    /// SET key value [EX s | PX ms]
    Set {
        key: String,
        value: Bytes,
        ttl: Option<Duration>,
    },
    Del(String),
    Exists(String),
    /// EXPIRE key seconds / PEXPIRE key ms
    Expire(String, Duration),
    Persist(String),
    /// TTL key - whole seconds
    Ttl(String),
    /// PTTL key - milliseconds
    PTtl(String),
    /// TYPE key
    Type(String),
    Rename(String, String),

    Incr(String),
    IncrBy(String, i64),
    Decr(String),
    DecrBy(String, i64),

    SAdd(String, String),
    SRem(String, String),
    SIsMember(String, String),
    SMembers(String),
    SCard(String),
    SInter(Vec<String>),
    SUnion(Vec<String>),
    SDiff(Vec<String>),

    HSet(String, String, Bytes),
    HGet(String, String),
    HDel(String, String),
    HLen(String),
    HGetAll(String),
    HIncrBy(String, String, i64),
    /// HSCAN key [MATCH pattern]
    HScan(String, String),

    LPush(String, Bytes),
    RPush(String, Bytes),
    LPop(String),
    RPop(String),
    LLen(String),
    LRange(String, i64, i64),

    ZAdd(String, f64, String),
    /// ZRANGEBYSCORE key min max [LIMIT offset count]
    ZRangeByScore {
        key: String,
        min: f64,
        max: f64,
        limit: Option<(usize, usize)>,
    },
    ZIncrBy(String, f64, String),
    ZRem(String, String),
    ZScore(String, String),
    ZCard(String),

    SetBit(String, u64, u8),
    GetBit(String, u64),
    BitCount(String),

    PfAdd(String, Bytes),
    PfCount(String),
    /// PFMERGE dest source [source ...]
    PfMerge(String, Vec<String>),

    GeoAdd {
        key: String,
        lon: f64,
        lat: f64,
        member: String,
    },
    GeoPos(String, String),
    GeoDist {
        key: String,
        a: String,
        b: String,
        unit: GeoUnit,
    },
    GeoRadius {
        key: String,
        lon: f64,
        lat: f64,
        radius: f64,
        unit: GeoUnit,
    },

    /// CAD key expected - delete only if the string value equals `expected`
    CompareAndDelete(String, Bytes),
    /// ACQUIRE key token lease-ms
    Acquire(String, Bytes, Duration),
    /// RELEASE key token
    Release(String, Bytes),
    /// EXTEND key token lease-ms
    Extend(String, Bytes, Duration),
}

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Bulk(Bytes),
    /// Type name from TYPE
    Status(&'static str),
    Ttl(TtlStatus),
    /// List elements
    Array(Vec<Bytes>),
    /// Set or sorted-set members, in result order
    Members(Vec<String>),
    /// `(field, value)` pairs from HGETALL and HSCAN
    Pairs(Vec<(String, Bytes)>),
    Position(f64, f64),
    /// `(member, distance)` pairs from GEORADIUS
    Nearby(Vec<(String, f64)>),
}

impl Reply {
    fn from_opt_bytes(b: Option<Bytes>) -> Self {
        b.map_or(Reply::Nil, Reply::Bulk)
    }

    fn from_opt_float(f: Option<f64>) -> Self {
        f.map_or(Reply::Nil, Reply::Float)
    }
}

impl Cmd {
    /// Keys this command reads or writes, possibly with duplicates
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Cmd::Rename(a, b) => vec![a.as_str(), b.as_str()],
            Cmd::SInter(ks) | Cmd::SUnion(ks) | Cmd::SDiff(ks) => ks.iter().map(String::as_str).collect(),
            Cmd::PfMerge(dest, srcs) => std::iter::once(dest.as_str())
                .chain(srcs.iter().map(String::as_str))
                .collect(),
            Cmd::Get(k)
            | Cmd::Set { key: k, .. }
            | Cmd::Del(k)
            | Cmd::Exists(k)
            | Cmd::Expire(k, _)
            | Cmd::Persist(k)
            | Cmd::Ttl(k)
            | Cmd::PTtl(k)
            | Cmd::Type(k)
            | Cmd::Incr(k)
            | Cmd::IncrBy(k, _)
            | Cmd::Decr(k)
            | Cmd::DecrBy(k, _)
            | Cmd::SAdd(k, _)
            | Cmd::SRem(k, _)
            | Cmd::SIsMember(k, _)
            | Cmd::SMembers(k)
            | Cmd::SCard(k)
            | Cmd::HSet(k, _, _)
            | Cmd::HGet(k, _)
            | Cmd::HDel(k, _)
            | Cmd::HLen(k)
            | Cmd::HGetAll(k)
            | Cmd::HIncrBy(k, _, _)
            | Cmd::HScan(k, _)
            | Cmd::LPush(k, _)
            | Cmd::RPush(k, _)
            | Cmd::LPop(k)
            | Cmd::RPop(k)
            | Cmd::LLen(k)
            | Cmd::LRange(k, _, _)
            | Cmd::ZAdd(k, _, _)
            | Cmd::ZRangeByScore { key: k, .. }
            | Cmd::ZIncrBy(k, _, _)
            | Cmd::ZRem(k, _)
            | Cmd::ZScore(k, _)
            | Cmd::ZCard(k)
            | Cmd::SetBit(k, _, _)
            | Cmd::GetBit(k, _)
            | Cmd::BitCount(k)
            | Cmd::PfAdd(k, _)
            | Cmd::PfCount(k)
            | Cmd::GeoAdd { key: k, .. }
            | Cmd::GeoPos(k, _)
            | Cmd::GeoDist { key: k, .. }
            | Cmd::GeoRadius { key: k, .. }
            | Cmd::CompareAndDelete(k, _)
            | Cmd::Acquire(k, _, _)
            | Cmd::Release(k, _)
            | Cmd::Extend(k, _, _) => vec![k.as_str()],
        }
    }

    /// Run the command against slots already locked by the caller
    ///
    /// # Arguments
    /// * `locked` - Lock set covering every key in [`Cmd::keys`]
    ///
    /// # Panics
    /// If `locked` does not cover this command's keys.
    pub fn apply(&self, locked: &mut Locked<'_>) -> Result<Reply> {
        let reply = match self {
            Cmd::Get(k) => Reply::from_opt_bytes(strings::get_string(locked.slot(k))?),
            Cmd::Set { key, value, ttl } => {
                strings::set_string(locked.slot(key), value.clone(), *ttl);
                Reply::Ok
            }
            Cmd::Del(k) => Reply::Bool(keys::delete(locked.slot(k))),
            Cmd::Exists(k) => Reply::Bool(keys::exists(locked.slot(k))),
            Cmd::Expire(k, ttl) => Reply::Bool(keys::expire(locked.slot(k), *ttl)),
            Cmd::Persist(k) => Reply::Bool(keys::persist(locked.slot(k))),
            Cmd::Ttl(k) => Reply::Int(ttl_seconds(locked.slot(k).ttl())),
            Cmd::PTtl(k) => Reply::Ttl(locked.slot(k).ttl()),
            Cmd::Type(k) => match locked.slot(k).value() {
                Some(v) => Reply::Status(v.type_name()),
                None => Reply::Status("none"),
            },
            Cmd::Rename(from, to) => {
                locked.rename(from, to)?;
                Reply::Ok
            }

            Cmd::Incr(k) => Reply::Int(strings::incr_by(locked.slot(k), 1)?),
            Cmd::IncrBy(k, d) => Reply::Int(strings::incr_by(locked.slot(k), *d)?),
            Cmd::Decr(k) => Reply::Int(strings::decr_by(locked.slot(k), 1)?),
            Cmd::DecrBy(k, d) => Reply::Int(strings::decr_by(locked.slot(k), *d)?),

            Cmd::SAdd(k, m) => Reply::Bool(sets::sadd(locked.slot(k), m)?),
            Cmd::SRem(k, m) => Reply::Bool(sets::srem(locked.slot(k), m)?),
            Cmd::SIsMember(k, m) => Reply::Bool(sets::sismember(locked.slot(k), m)?),
            Cmd::SMembers(k) => Reply::Members(sets::smembers(locked.slot(k))?.into_iter().collect()),
            Cmd::SCard(k) => Reply::Int(sets::scard(locked.slot(k))? as i64),
            Cmd::SInter(ks) => Reply::Members(sets::sinter(locked, ks)?.into_iter().collect()),
            Cmd::SUnion(ks) => Reply::Members(sets::sunion(locked, ks)?.into_iter().collect()),
            Cmd::SDiff(ks) => Reply::Members(sets::sdiff(locked, ks)?.into_iter().collect()),

            Cmd::HSet(k, f, v) => Reply::Bool(hashes::hset(locked.slot(k), f, v.clone())?),
            Cmd::HGet(k, f) => Reply::from_opt_bytes(hashes::hget(locked.slot(k), f)?),
            Cmd::HDel(k, f) => Reply::Bool(hashes::hdel(locked.slot(k), f)?),
            Cmd::HLen(k) => Reply::Int(hashes::hlen(locked.slot(k))? as i64),
            Cmd::HGetAll(k) => Reply::Pairs(hashes::hgetall(locked.slot(k))?),
            Cmd::HIncrBy(k, f, d) => Reply::Int(hashes::hincrby(locked.slot(k), f, *d)?),
            Cmd::HScan(k, pattern) => Reply::Pairs(hashes::hscan(locked.slot(k), pattern)?),

            Cmd::LPush(k, v) => Reply::Int(lists::push(locked.slot(k), End::Head, v.clone())? as i64),
            Cmd::RPush(k, v) => Reply::Int(lists::push(locked.slot(k), End::Tail, v.clone())? as i64),
            Cmd::LPop(k) => Reply::from_opt_bytes(lists::pop(locked.slot(k), End::Head)?),
            Cmd::RPop(k) => Reply::from_opt_bytes(lists::pop(locked.slot(k), End::Tail)?),
            Cmd::LLen(k) => Reply::Int(lists::llen(locked.slot(k))? as i64),
            Cmd::LRange(k, start, stop) => Reply::Array(lists::lrange(locked.slot(k), *start, *stop)?),

            Cmd::ZAdd(k, score, m) => Reply::Bool(zsets::zadd(locked.slot(k), *score, m)?),
            Cmd::ZRangeByScore { key, min, max, limit } => {
                let (offset, count) = match limit {
                    Some((o, c)) => (*o, Some(*c)),
                    None => (0, None),
                };
                Reply::Members(zsets::zrange_by_score(locked.slot(key), *min, *max, offset, count)?)
            }
            Cmd::ZIncrBy(k, delta, m) => Reply::Float(zsets::zincrby(locked.slot(k), *delta, m)?),
            Cmd::ZRem(k, m) => Reply::Bool(zsets::zrem(locked.slot(k), m)?),
            Cmd::ZScore(k, m) => Reply::from_opt_float(zsets::zscore(locked.slot(k), m)?),
            Cmd::ZCard(k) => Reply::Int(zsets::zcard(locked.slot(k))? as i64),

            Cmd::SetBit(k, offset, bit) => Reply::Int(bits::setbit(locked.slot(k), *offset, *bit)? as i64),
            Cmd::GetBit(k, offset) => Reply::Int(bits::getbit(locked.slot(k), *offset)? as i64),
            Cmd::BitCount(k) => Reply::Int(bits::bitcount(locked.slot(k))? as i64),

            Cmd::PfAdd(k, e) => Reply::Bool(hll::pfadd(locked.slot(k), e)?),
            Cmd::PfCount(k) => Reply::Int(hll::pfcount(locked.slot(k))? as i64),
            Cmd::PfMerge(dest, srcs) => {
                hll::pfmerge(locked, dest, srcs)?;
                Reply::Ok
            }

            Cmd::GeoAdd { key, lon, lat, member } => Reply::Bool(geo::geoadd(locked.slot(key), *lon, *lat, member)?),
            Cmd::GeoPos(k, m) => match geo::geopos(locked.slot(k), m)? {
                Some((lon, lat)) => Reply::Position(lon, lat),
                None => Reply::Nil,
            },
            Cmd::GeoDist { key, a, b, unit } => Reply::from_opt_float(geo::geodist(locked.slot(key), a, b, *unit)?),
            Cmd::GeoRadius { key, lon, lat, radius, unit } => {
                Reply::Nearby(geo::georadius(locked.slot(key), *lon, *lat, *radius, *unit)?)
            }

            Cmd::CompareAndDelete(k, expected) => Reply::Bool(compare_and_delete(locked.slot(k), expected)),
            Cmd::Acquire(k, token, lease) => Reply::Bool(lock::acquire(locked.slot(k), token, *lease)),
            Cmd::Release(k, token) => Reply::Bool(compare_and_delete(locked.slot(k), token)),
            Cmd::Extend(k, token, lease) => Reply::Bool(lock::extend(locked.slot(k), token, *lease)),
        };
        Ok(reply)
    }
}

/// TTL reply in seconds, rounded to the nearest second
fn ttl_seconds(status: TtlStatus) -> i64 {
    match status {
        TtlStatus::Missing => -2,
        TtlStatus::NoExpiry => -1,
        TtlStatus::Remaining(d) => ((d.as_millis() + 500) / 1000) as i64,
    }
}

impl fmt::Display for Reply {
    /// Render the way an interactive client prints replies
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Nil => f.write_str("(nil)"),
            Reply::Bool(b) => write!(f, "(integer) {}", *b as i64),
            Reply::Int(i) => write!(f, "(integer) {}", i),
            Reply::Float(x) => write!(f, "\"{}\"", x),
            Reply::Bulk(b) => write!(f, "\"{}\"", String::from_utf8_lossy(b)),
            Reply::Status(s) => f.write_str(s),
            Reply::Ttl(TtlStatus::Missing) => f.write_str("(integer) -2"),
            Reply::Ttl(TtlStatus::NoExpiry) => f.write_str("(integer) -1"),
            Reply::Ttl(TtlStatus::Remaining(d)) => write!(f, "(integer) {}", d.as_millis()),
            Reply::Array(items) => write_numbered(f, items.iter().map(|b| format!("\"{}\"", String::from_utf8_lossy(b)))),
            Reply::Members(items) => write_numbered(f, items.iter().map(|m| format!("\"{}\"", m))),
            Reply::Pairs(items) => write_numbered(
                f,
                items
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), String::from_utf8_lossy(v).into_owned()])
                    .map(|s| format!("\"{}\"", s)),
            ),
            Reply::Position(lon, lat) => write!(f, "1) \"{}\"\n2) \"{}\"", lon, lat),
            Reply::Nearby(items) => write_numbered(f, items.iter().map(|(m, d)| format!("\"{}\" {:.4}", m, d))),
        }
    }
}

fn write_numbered(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = String>) -> fmt::Result {
    let mut empty = true;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        write!(f, "{}) {}", i + 1, item)?;
        empty = false;
    }
    if empty {
        f.write_str("(empty array)")?;
    }
    Ok(())
}

/// Positional arguments after the command name
struct Args<'a> {
    name: &'a str,
    items: &'a [&'a str],
}

impl<'a> Args<'a> {
    fn exact(&self, n: usize) -> anyhow::Result<()> {
        if self.items.len() != n {
            bail!("wrong number of arguments for '{}'", self.name.to_ascii_lowercase());
        }
        Ok(())
    }

    fn at_least(&self, n: usize) -> anyhow::Result<()> {
        if self.items.len() < n {
            bail!("wrong number of arguments for '{}'", self.name.to_ascii_lowercase());
        }
        Ok(())
    }

    fn string(&self, i: usize) -> String {
        self.items[i].to_owned()
    }

    fn bytes(&self, i: usize) -> Bytes {
        Bytes::copy_from_slice(self.items[i].as_bytes())
    }

    fn strings(&self, from: usize) -> Vec<String> {
        self.items[from..].iter().map(|s| s.to_string()).collect()
    }

    fn parse<T>(&self, i: usize, what: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.items[i]
            .parse()
            .with_context(|| format!("invalid {} '{}'", what, self.items[i]))
    }

    fn millis(&self, i: usize) -> anyhow::Result<Duration> {
        Ok(Duration::from_millis(self.parse(i, "milliseconds")?))
    }

    fn seconds(&self, i: usize) -> anyhow::Result<Duration> {
        Ok(Duration::from_secs(self.parse(i, "seconds")?))
    }
}

/// Parse one command line
///
/// Tokens are separated by ASCII whitespace; there is no quoting.
///
/// # Returns
/// * `Ok(cmd)` - Parsed command with validated arguments
/// * `Err(...)` - Empty line, unknown command, bad arity or bad number
pub fn parse_line(line: &str) -> anyhow::Result<Cmd> {
    let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
    parse_tokens(&tokens)
}

/// Parse a pre-split command (name followed by arguments)
pub fn parse_tokens(tokens: &[&str]) -> anyhow::Result<Cmd> {
    let Some((&name, items)) = tokens.split_first() else {
        bail!("empty command");
    };
    let a = Args { name, items };
    let is = |s: &str| name.eq_ignore_ascii_case(s);

    let cmd = if is("GET") {
        a.exact(1)?;
        Cmd::Get(a.string(0))
    } else if is("SET") {
        a.at_least(2)?;
        let ttl = match items.len() {
            2 => None,
            4 if items[2].eq_ignore_ascii_case("EX") => Some(a.seconds(3)?),
            4 if items[2].eq_ignore_ascii_case("PX") => Some(a.millis(3)?),
            _ => bail!("syntax error"),
        };
        Cmd::Set {
            key: a.string(0),
            value: a.bytes(1),
            ttl,
        }
    } else if is("DEL") {
        a.exact(1)?;
        Cmd::Del(a.string(0))
    } else if is("EXISTS") {
        a.exact(1)?;
        Cmd::Exists(a.string(0))
    } else if is("EXPIRE") {
        a.exact(2)?;
        Cmd::Expire(a.string(0), a.seconds(1)?)
    } else if is("PEXPIRE") {
        a.exact(2)?;
        Cmd::Expire(a.string(0), a.millis(1)?)
    } else if is("PERSIST") {
        a.exact(1)?;
        Cmd::Persist(a.string(0))
    } else if is("TTL") {
        a.exact(1)?;
        Cmd::Ttl(a.string(0))
    } else if is("PTTL") {
        a.exact(1)?;
        Cmd::PTtl(a.string(0))
    } else if is("TYPE") {
        a.exact(1)?;
        Cmd::Type(a.string(0))
    } else if is("RENAME") {
        a.exact(2)?;
        Cmd::Rename(a.string(0), a.string(1))
    } else if is("INCR") {
        a.exact(1)?;
        Cmd::Incr(a.string(0))
    } else if is("INCRBY") {
        a.exact(2)?;
        Cmd::IncrBy(a.string(0), a.parse(1, "increment")?)
    } else if is("DECR") {
        a.exact(1)?;
        Cmd::Decr(a.string(0))
    } else if is("DECRBY") {
        a.exact(2)?;
        Cmd::DecrBy(a.string(0), a.parse(1, "decrement")?)
    } else if is("SADD") {
        a.exact(2)?;
        Cmd::SAdd(a.string(0), a.string(1))
    } else if is("SREM") {
        a.exact(2)?;
        Cmd::SRem(a.string(0), a.string(1))
    } else if is("SISMEMBER") {
        a.exact(2)?;
        Cmd::SIsMember(a.string(0), a.string(1))
    } else if is("SMEMBERS") {
        a.exact(1)?;
        Cmd::SMembers(a.string(0))
    } else if is("SCARD") {
        a.exact(1)?;
        Cmd::SCard(a.string(0))
    } else if is("SINTER") {
        a.at_least(1)?;
        Cmd::SInter(a.strings(0))
    } else if is("SUNION") {
        a.at_least(1)?;
        Cmd::SUnion(a.strings(0))
    } else if is("SDIFF") {
        a.at_least(1)?;
        Cmd::SDiff(a.strings(0))
    } else if is("HSET") {
        a.exact(3)?;
        Cmd::HSet(a.string(0), a.string(1), a.bytes(2))
    } else if is("HGET") {
        a.exact(2)?;
        Cmd::HGet(a.string(0), a.string(1))
    } else if is("HDEL") {
        a.exact(2)?;
        Cmd::HDel(a.string(0), a.string(1))
    } else if is("HLEN") {
        a.exact(1)?;
        Cmd::HLen(a.string(0))
    } else if is("HGETALL") {
        a.exact(1)?;
        Cmd::HGetAll(a.string(0))
    } else if is("HINCRBY") {
        a.exact(3)?;
        Cmd::HIncrBy(a.string(0), a.string(1), a.parse(2, "increment")?)
    } else if is("HSCAN") {
        let pattern = match items.len() {
            1 => "*".to_owned(),
            3 if items[1].eq_ignore_ascii_case("MATCH") => a.string(2),
            _ => bail!("syntax error"),
        };
        Cmd::HScan(a.string(0), pattern)
    } else if is("LPUSH") {
        a.exact(2)?;
        Cmd::LPush(a.string(0), a.bytes(1))
    } else if is("RPUSH") {
        a.exact(2)?;
        Cmd::RPush(a.string(0), a.bytes(1))
    } else if is("LPOP") {
        a.exact(1)?;
        Cmd::LPop(a.string(0))
    } else if is("RPOP") {
        a.exact(1)?;
        Cmd::RPop(a.string(0))
    } else if is("LLEN") {
        a.exact(1)?;
        Cmd::LLen(a.string(0))
    } else if is("LRANGE") {
        a.exact(3)?;
        Cmd::LRange(a.string(0), a.parse(1, "start")?, a.parse(2, "stop")?)
    } else if is("ZADD") {
        a.exact(3)?;
        Cmd::ZAdd(a.string(0), a.parse(1, "score")?, a.string(2))
    } else if is("ZRANGEBYSCORE") {
        let limit = match items.len() {
            3 => None,
            6 if items[3].eq_ignore_ascii_case("LIMIT") => Some((a.parse(4, "offset")?, a.parse(5, "count")?)),
            _ => bail!("syntax error"),
        };
        Cmd::ZRangeByScore {
            key: a.string(0),
            min: a.parse(1, "min")?,
            max: a.parse(2, "max")?,
            limit,
        }
    } else if is("ZINCRBY") {
        a.exact(3)?;
        Cmd::ZIncrBy(a.string(0), a.parse(1, "increment")?, a.string(2))
    } else if is("ZREM") {
        a.exact(2)?;
        Cmd::ZRem(a.string(0), a.string(1))
    } else if is("ZSCORE") {
        a.exact(2)?;
        Cmd::ZScore(a.string(0), a.string(1))
    } else if is("ZCARD") {
        a.exact(1)?;
        Cmd::ZCard(a.string(0))
    } else if is("SETBIT") {
        a.exact(3)?;
        Cmd::SetBit(a.string(0), a.parse(1, "offset")?, a.parse(2, "bit")?)
    } else if is("GETBIT") {
        a.exact(2)?;
        Cmd::GetBit(a.string(0), a.parse(1, "offset")?)
    } else if is("BITCOUNT") {
        a.exact(1)?;
        Cmd::BitCount(a.string(0))
    } else if is("PFADD") {
        a.exact(2)?;
        Cmd::PfAdd(a.string(0), a.bytes(1))
    } else if is("PFCOUNT") {
        a.exact(1)?;
        Cmd::PfCount(a.string(0))
    } else if is("PFMERGE") {
        a.at_least(1)?;
        Cmd::PfMerge(a.string(0), a.strings(1))
    } else if is("GEOADD") {
        a.exact(4)?;
        Cmd::GeoAdd {
            key: a.string(0),
            lon: a.parse(1, "longitude")?,
            lat: a.parse(2, "latitude")?,
            member: a.string(3),
        }
    } else if is("GEOPOS") {
        a.exact(2)?;
        Cmd::GeoPos(a.string(0), a.string(1))
    } else if is("GEODIST") {
        if items.len() != 3 && items.len() != 4 {
            bail!("wrong number of arguments for 'geodist'");
        }
        let unit = if items.len() == 4 { a.parse(3, "unit")? } else { GeoUnit::Meters };
        Cmd::GeoDist {
            key: a.string(0),
            a: a.string(1),
            b: a.string(2),
            unit,
        }
    } else if is("GEORADIUS") {
        a.exact(5)?;
        Cmd::GeoRadius {
            key: a.string(0),
            lon: a.parse(1, "longitude")?,
            lat: a.parse(2, "latitude")?,
            radius: a.parse(3, "radius")?,
            unit: a.parse(4, "unit")?,
        }
    } else if is("CAD") {
        a.exact(2)?;
        Cmd::CompareAndDelete(a.string(0), a.bytes(1))
    } else if is("ACQUIRE") {
        a.exact(3)?;
        Cmd::Acquire(a.string(0), a.bytes(1), a.millis(2)?)
    } else if is("RELEASE") {
        a.exact(2)?;
        Cmd::Release(a.string(0), a.bytes(1))
    } else if is("EXTEND") {
        a.exact(3)?;
        Cmd::Extend(a.string(0), a.bytes(1), a.millis(2)?)
    } else {
        bail!("unknown command '{}'", name);
    };

    Ok(cmd)
}
