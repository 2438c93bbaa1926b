//! Connection manager (§4.F): admission control, per-peer caps, a sliding
//! rate-limit window and a stale-connection sweep. Grounded on the
//! teacher's `server.rs` connection bookkeeping (a players table plus
//! per-connection counters), generalized from a fixed-size array to a
//! concurrent map since connection count here isn't bounded by a tile map.

use std::collections::VecDeque;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::ids::ConnectionId;

pub const MAX_CONNECTIONS: usize = 250;
pub const MAX_PER_HOST: usize = 5;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
pub const RATE_LIMIT_THRESHOLD: usize = 20;
const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

struct ConnectionRecord {
    peer: IpAddr,
    connected_at: Instant,
    last_activity: Instant,
    activity_ring: VecDeque<Instant>,
    open: bool,
}

#[derive(Default)]
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, ConnectionRecord>,
    per_host: DashMap<IpAddr, usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionStats {
    pub active: usize,
    pub rate_limited: usize,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_exempt(peer: IpAddr) -> bool {
        peer.is_loopback()
    }

    /// Admits a new connection, enforcing the global and per-host caps
    /// (§4.F). Returns `false` (and admits nothing) if either is hit.
    pub fn add_connection(&self, id: ConnectionId, peer: IpAddr) -> bool {
        if self.connections.len() >= MAX_CONNECTIONS {
            return false;
        }
        if !Self::is_exempt(peer) {
            let count = self.per_host.get(&peer).map(|c| *c).unwrap_or(0);
            if count >= MAX_PER_HOST {
                return false;
            }
        }

        let now = Instant::now();
        self.connections.insert(
            id,
            ConnectionRecord {
                peer,
                connected_at: now,
                last_activity: now,
                activity_ring: VecDeque::new(),
                open: true,
            },
        );
        *self.per_host.entry(peer).or_insert(0) += 1;
        true
    }

    pub fn remove_connection(&self, id: ConnectionId) {
        if let Some((_, record)) = self.connections.remove(&id) {
            if let Some(mut count) = self.per_host.get_mut(&record.peer) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    drop(count);
                    self.per_host.remove(&record.peer);
                }
            }
        }
    }

    pub fn mark_closed(&self, id: ConnectionId) {
        if let Some(mut record) = self.connections.get_mut(&id) {
            record.open = false;
        }
    }

    /// Appends an activity timestamp and prunes entries outside the
    /// rate-limit window (§4.F).
    pub fn record_activity(&self, id: ConnectionId) {
        let now = Instant::now();
        if let Some(mut record) = self.connections.get_mut(&id) {
            record.last_activity = now;
            record.activity_ring.push_back(now);
            while let Some(&front) = record.activity_ring.front() {
                if now.duration_since(front) > RATE_LIMIT_WINDOW {
                    record.activity_ring.pop_front();
                } else {
                    break;
                }
            }
        }
    }

    pub fn is_rate_limited(&self, id: ConnectionId) -> bool {
        self.connections
            .get(&id)
            .map(|r| r.activity_ring.len() > RATE_LIMIT_THRESHOLD)
            .unwrap_or(false)
    }

    /// Removes connections that are closed or have been idle past the
    /// stale threshold (§4.F). Returns the number removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let stale: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|e| {
                let r = e.value();
                !r.open || now.duration_since(r.connected_at) > STALE_AFTER && now.duration_since(r.last_activity) > STALE_AFTER
            })
            .map(|e| *e.key())
            .collect();
        let count = stale.len();
        for id in stale {
            self.remove_connection(id);
        }
        count
    }

    pub fn stats(&self) -> ConnectionStats {
        let active = self.connections.len();
        let rate_limited = self.connections.iter().filter(|e| e.value().activity_ring.len() > RATE_LIMIT_THRESHOLD).count();
        ConnectionStats { active, rate_limited }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn rejects_past_per_host_cap() {
        let manager = ConnectionManager::new();
        let peer: IpAddr = Ipv4Addr::new(10, 0, 0, 1).into();
        for _ in 0..MAX_PER_HOST {
            assert!(manager.add_connection(ConnectionId::next(), peer));
        }
        assert!(!manager.add_connection(ConnectionId::next(), peer));
    }

    #[test]
    fn loopback_is_exempt_from_per_host_cap() {
        let manager = ConnectionManager::new();
        let peer: IpAddr = Ipv4Addr::new(127, 0, 0, 1).into();
        for _ in 0..(MAX_PER_HOST + 3) {
            assert!(manager.add_connection(ConnectionId::next(), peer));
        }
    }

    #[test]
    fn rate_limit_trips_past_threshold() {
        let manager = ConnectionManager::new();
        let peer: IpAddr = Ipv4Addr::new(10, 0, 0, 2).into();
        let id = ConnectionId::next();
        manager.add_connection(id, peer);
        for _ in 0..=RATE_LIMIT_THRESHOLD {
            manager.record_activity(id);
        }
        assert!(manager.is_rate_limited(id));
    }
}
