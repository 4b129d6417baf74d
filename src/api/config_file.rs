//! Cluster config file. One command per line:
//!
//! ```text
//! P <id> <T|L> <url>       a transaction manager or lease manager, in roster order
//! P <id> C <script>        a client
//! S <num slots>
//! T <HH:MM:SS>             wall clock time of the first slot
//! D <millis>               slot duration
//! F <slot> <N|C>... (<a>,<b>)...
//! ```
//!
//! An `F` line has one `N` (normal) or `C` (crashed) per server, in `P` order, then the
//! suspicions of that slot: `(a,b)` means `a` suspects `b`. Slots without an `F` line inherit the
//! previous slot's states.

use crate::api::MemberInfo;
use crate::cluster::{ParticipantId, ProcessState, SlotSchedule};
use chrono::NaiveTime;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SLOT_DURATION: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientInfo {
    pub id: String,
    pub script: String,
}

#[derive(Clone, Debug)]
pub struct ClusterConfig {
    pub lease_managers: Vec<MemberInfo>,
    pub transaction_managers: Vec<MemberInfo>,
    pub clients: Vec<ClientInfo>,
    pub schedule: SlotSchedule,
    pub start_time: Option<NaiveTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line_number}: {reason}")]
    Malformed { line_number: usize, reason: String },
    #[error("Line {line_number}: {id} is not a server")]
    UnknownParticipant { line_number: usize, id: String },
}

impl ClusterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    /// Time left until the configured start, or zero if there's no start time or it has passed.
    pub fn start_delay(&self, now: NaiveTime) -> Duration {
        self.start_time
            .and_then(|start| (start - now).to_std().ok())
            .unwrap_or_else(|| Duration::from_millis(0))
    }
}

impl FromStr for ClusterConfig {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::default();
        for (index, line) in contents.lines().enumerate() {
            parser.parse_line(index + 1, line.trim())?;
        }

        parser.finish()
    }
}

#[derive(Default)]
struct Parser {
    lease_managers: Vec<MemberInfo>,
    transaction_managers: Vec<MemberInfo>,
    clients: Vec<ClientInfo>,
    // Every server id in P order. F lines list states in this order.
    servers: Vec<String>,
    num_slots: Option<usize>,
    slot_duration: Option<Duration>,
    start_time: Option<NaiveTime>,
    // Parsed once every P line has been seen.
    failure_lines: Vec<(usize, String)>,
}

impl Parser {
    fn parse_line(&mut self, line_number: usize, line: &str) -> Result<(), ConfigError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let malformed = |reason: &str| ConfigError::Malformed {
            line_number,
            reason: reason.to_string(),
        };

        match tokens.as_slice() {
            [] => Ok(()),
            ["P", id, "C", script] => {
                self.clients.push(ClientInfo {
                    id: id.to_string(),
                    script: script.to_string(),
                });
                Ok(())
            }
            ["P", id, role, url] => {
                let member = MemberInfo {
                    id: id.to_string(),
                    addr: parse_url(url).ok_or_else(|| malformed("unresolvable url"))?,
                };
                match *role {
                    "T" => self.transaction_managers.push(member),
                    "L" => self.lease_managers.push(member),
                    _ => return Err(malformed("process type must be T, L or C")),
                }
                self.servers.push(id.to_string());
                Ok(())
            }
            ["S", num_slots] => {
                self.num_slots = Some(num_slots.parse().map_err(|_| malformed("bad slot count"))?);
                Ok(())
            }
            ["D", millis] => {
                let millis: u64 = millis.parse().map_err(|_| malformed("bad slot duration"))?;
                self.slot_duration = Some(Duration::from_millis(millis));
                Ok(())
            }
            ["T", time] => {
                let start = NaiveTime::parse_from_str(time, "%H:%M:%S").map_err(|_| malformed("bad start time"))?;
                self.start_time = Some(start);
                Ok(())
            }
            ["F", ..] => {
                self.failure_lines.push((line_number, line.to_string()));
                Ok(())
            }
            _ => Err(malformed("unknown command")),
        }
    }

    fn finish(self) -> Result<ClusterConfig, ConfigError> {
        let mut failures = BTreeMap::new();
        for (line_number, line) in self.failure_lines.iter() {
            let (slot, states) = self.parse_failure_line(*line_number, line)?;
            if self.num_slots.map(|n| slot > n).unwrap_or(false) {
                return Err(ConfigError::Malformed {
                    line_number: *line_number,
                    reason: format!("slot {} is past the last slot", slot),
                });
            }
            failures.insert(slot, states);
        }

        let num_slots = self
            .num_slots
            .unwrap_or_else(|| failures.keys().next_back().copied().unwrap_or(0));
        let mut slots: Vec<HashMap<ParticipantId, ProcessState>> = Vec::with_capacity(num_slots);
        for slot in 1..=num_slots {
            let states = match failures.remove(&slot) {
                Some(states) => states,
                None => slots.last().cloned().unwrap_or_default(),
            };
            slots.push(states);
        }

        Ok(ClusterConfig {
            lease_managers: self.lease_managers,
            transaction_managers: self.transaction_managers,
            clients: self.clients,
            schedule: SlotSchedule::new(self.slot_duration.unwrap_or(DEFAULT_SLOT_DURATION), slots),
            start_time: self.start_time,
        })
    }

    fn parse_failure_line(
        &self,
        line_number: usize,
        line: &str,
    ) -> Result<(usize, HashMap<ParticipantId, ProcessState>), ConfigError> {
        let malformed = |reason: String| ConfigError::Malformed { line_number, reason };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let slot: usize = tokens
            .get(1)
            .and_then(|slot| slot.parse().ok())
            .filter(|slot| *slot > 0)
            .ok_or_else(|| malformed("bad slot number".into()))?;

        let num_servers = self.servers.len();
        let state_tokens = tokens.get(2..2 + num_servers).ok_or_else(|| {
            malformed(format!("expected a state for each of the {} servers", num_servers))
        })?;

        let mut states = HashMap::with_capacity(num_servers);
        for (id, state) in self.servers.iter().zip(state_tokens.iter()) {
            let crashed = match *state {
                "N" => false,
                "C" => true,
                other => return Err(malformed(format!("state of {} is {}, expected N or C", id, other))),
            };
            states.insert(
                ParticipantId::new(id.as_str()),
                ProcessState {
                    crashed,
                    ..ProcessState::default()
                },
            );
        }

        // Pairs may contain spaces, e.g. "(TM1, TM2)".
        let pairs: String = tokens[2 + num_servers..].concat();
        for pair in pairs.split(')').filter(|pair| !pair.is_empty()) {
            let (suspecter, suspected) = pair
                .strip_prefix('(')
                .and_then(|inner| {
                    let mut ids = inner.split(',');
                    match (ids.next(), ids.next(), ids.next()) {
                        (Some(a), Some(b), None) if !a.is_empty() && !b.is_empty() => Some((a, b)),
                        _ => None,
                    }
                })
                .ok_or_else(|| malformed(format!("bad suspicion {})", pair)))?;

            for id in [suspecter, suspected].iter() {
                if !self.servers.iter().any(|server| server == id) {
                    return Err(ConfigError::UnknownParticipant {
                        line_number,
                        id: id.to_string(),
                    });
                }
            }

            if let Some(state) = states.get_mut(&ParticipantId::new(suspecter)) {
                state.suspects.insert(ParticipantId::new(suspected));
            }
        }

        Ok((slot, states))
    }
}

fn parse_url(url: &str) -> Option<SocketAddr> {
    let host_port = url
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port.to_socket_addrs().ok()?.next()
}
