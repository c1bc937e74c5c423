// # Direct DNS Resolver
//
// Looks up a hostname's A records by asking the first nameserver listed in
// the resolver configuration directly, over UDP.
//
// ## Why not the system resolver
//
// The system resolver can answer from local sources (e.g. `/etc/hosts`
// mapping the machine's own name to 127.0.1.1), which says nothing about
// what the zone currently publishes.
//
// ## Behaviour
//
// - One query per lookup: random id, recursion desired, `<host>.` / A / IN
// - Fixed 2 second transport timeout, no retries, no TCP fallback
// - Non-NOERROR answers fail with the response code name
// - Every A answer is returned in server order; other types are ignored

mod resolv_conf;

pub use resolv_conf::{DEFAULT_RESOLV_CONF, first_nameserver, read_nameserver};

use cfdns_core::traits::RecordResolver;
use cfdns_core::{Error, Result};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use hickory_proto::serialize::binary::BinEncodable;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::UdpSocket;

/// Standard DNS port
pub const DNS_PORT: u16 = 53;

/// Transport timeout for one query/response exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Largest response accepted over UDP
const MAX_RESPONSE_SIZE: usize = 4096;

/// A-record resolver that bypasses the local resolver stack
#[derive(Debug, Clone)]
pub struct DirectResolver {
    /// Resolver configuration the nameserver is taken from
    resolv_conf: PathBuf,

    /// Nameserver port
    port: u16,

    /// Transport timeout
    timeout: Duration,
}

impl Default for DirectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectResolver {
    pub fn new() -> Self {
        Self {
            resolv_conf: PathBuf::from(DEFAULT_RESOLV_CONF),
            port: DNS_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_resolv_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.resolv_conf = path.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address of the nameserver to ask, re-read on every lookup
    fn nameserver(&self) -> Result<SocketAddr> {
        let nameserver = read_nameserver(&self.resolv_conf)?;
        let ip: IpAddr = nameserver
            .parse()
            .map_err(|_| Error::query(format!("Invalid nameserver address: {}", nameserver)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Send `query` to `server` and wait for its response
    async fn exchange(&self, server: SocketAddr, query: &Message) -> Result<Message> {
        let request = query
            .to_bytes()
            .map_err(|e| Error::query(format!("Unable to encode query: {}", e)))?;

        let local: SocketAddr = match server {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| Error::query(e.to_string()))?;
        socket
            .connect(server)
            .await
            .map_err(|e| Error::query(e.to_string()))?;

        let roundtrip = async {
            socket.send(&request).await?;
            let mut buf = vec![0u8; MAX_RESPONSE_SIZE];
            let len = socket.recv(&mut buf).await?;
            buf.truncate(len);
            Ok::<_, std::io::Error>(buf)
        };

        let response = tokio::time::timeout(self.timeout, roundtrip)
            .await
            .map_err(|_| Error::query(format!("read udp {}: i/o timeout", server)))?
            .map_err(|e| Error::query(e.to_string()))?;

        let response = Message::from_vec(&response)
            .map_err(|e| Error::query(format!("Malformed response: {}", e)))?;

        if response.id() != query.id() {
            return Err(Error::query(format!(
                "Response id {} does not match query id {}",
                response.id(),
                query.id()
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl RecordResolver for DirectResolver {
    async fn lookup_a(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let server = self.nameserver()?;
        let query = build_query(hostname)?;

        tracing::debug!("Querying {} for A records of {}", server, hostname);
        let response = self.exchange(server, &query).await?;

        a_answers(&response)
    }
}

/// Recursive A/IN query for `hostname` with a random id
pub fn build_query(hostname: &str) -> Result<Message> {
    let fqdn = if hostname.ends_with('.') {
        hostname.to_string()
    } else {
        format!("{}.", hostname)
    };
    let name = Name::from_ascii(&fqdn)
        .map_err(|e| Error::invalid_argument(format!("Invalid hostname {}: {}", hostname, e)))?;

    let mut question = Query::query(name, RecordType::A);
    question.set_query_class(DNSClass::IN);

    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(question);

    Ok(message)
}

/// Every A answer of a successful response, in server order
pub fn a_answers(response: &Message) -> Result<Vec<IpAddr>> {
    let code = response.response_code();
    if code != ResponseCode::NoError {
        return Err(Error::resolution(code.to_string()));
    }

    Ok(response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::A(a)) => Some(IpAddr::V4(a.0)),
            _ => None,
        })
        .collect())
}
