//! Scripted Baikal rig behind the `Transport` contract.
//!
//! Miner API calls arrive as the `printf '%s' '<json>' | nc ...` pipeline
//! the runner builds; anything else is treated as a plain shell command and
//! recorded.

#![allow(dead_code)]

use async_trait::async_trait;
use mineos_asic::{RpcRequest, Transport, TransportError};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};
use tokio::{sync::Notify, time::Instant};

pub const MAC: &str = "00:1A:2B:3C:4D:5E";

pub fn giant_system() -> Value {
    json!({
        "Hostname": "baikal-07",
        "MAC": MAC,
        "IP": "192.168.1.40",
        "Product Type": "Giant B",
        "Product Version": "1.2",
        "Kernel Version": "4.4.138",
        "Miner Version": "sgminer 5.6.2-b",
        "Uptime": 86400,
        "Temp CPU": 45.3
    })
}

pub fn legacy_system() -> Value {
    json!({
        "Hostname": "minerpi",
        "MAC": "b8-27-eb-01-02-03",
        "Product Type": "Quadruple Mini Miner",
        "Product Version": "1.0",
        "FileSystem Version": "20170831",
        "Miner Version": "sgminer 5.6.2-b"
    })
}

pub fn summary() -> Value {
    json!({
        "Elapsed": 3600,
        "MHS av": 1234.56789,
        "MHS 5s": 1200.5,
        "KHS av": 1234567.89,
        "KHS 5s": 1200500.0,
        "Accepted": 100,
        "Rejected": 2,
        "Hardware Errors": 3,
        "Utility": 1.6667
    })
}

pub fn device(asc: u32, temperature: f64, mhs_5s: f64) -> Value {
    json!({"ASC": asc, "Temperature": temperature, "MHS 5s": mhs_5s, "Hardware Errors": asc})
}

pub fn board(id: u32, chips: u32, clock: u32) -> Value {
    json!({"ID": format!("BKLU{}", id), "Chip Count": chips, "Clock": clock})
}

pub fn pool(index: u32, url: &str, algorithm: &str) -> Value {
    json!({
        "POOL": index,
        "URL": url,
        "User": "rig.07",
        "Algorithm": algorithm,
        "Status": "Alive",
        "Stratum Active": index == 0,
        "Priority": index,
        "Getworks": 12,
        "Accepted": 100,
        "Rejected": 2,
        "Discarded": 5,
        "Stale": 1,
        "Difficulty Accepted": 25600.0,
        "Difficulty Rejected": 512.0,
        "Difficulty Stale": 256.0,
        "Last Share Difficulty": 256.0,
        "Last Share Time": 1520000000u64
    })
}

pub fn miner_config() -> Value {
    json!({
        "Frequency": 600,
        "Temp Target": 70,
        "Temp Cutoff": 90,
        "Failover Only": true,
        "Scan Time": 30,
        "Queue": 1,
        "Expiry": 120
    })
}

pub fn pool_config() -> Value {
    json!([
        {"URL": "stratum+tcp://dcr.pool.example:3252", "User": "rig.07", "Pass": "x", "Algorithm": "decred"},
        {"URL": "stratum+tcp://sc.pool.example:3333", "User": "rig.07", "Pass": "x", "Algorithm": "sia"}
    ])
}

fn ok(message: &str) -> Value {
    json!([{"STATUS": "S", "When": 1520000000u64, "Code": 0, "Msg": message}])
}

fn reply(section: &str, rows: Value) -> Value {
    let mut reply = json!({"STATUS": ok(section), "id": 1});
    reply[section] = rows;
    reply
}

struct DeviceState {
    system: Value,
    devs: Vec<Value>,
    stats: Vec<Value>,
    pools: Vec<Value>,
    miner_config: Value,
    pool_config: Value,
    restart_status: &'static str,
    failures: HashMap<String, TransportError>,
    history: Vec<String>,
}

/// In-memory Baikal rig
pub struct FakeBaikal {
    state: Mutex<DeviceState>,
    peer: Option<SocketAddr>,
    hold: AtomicBool,
    entered: Notify,
    release: Notify,
    disconnected: AtomicBool,
}

impl FakeBaikal {
    pub fn giant() -> Self {
        Self::with_system(giant_system(), None)
    }

    pub fn legacy(peer: SocketAddr) -> Self {
        Self::with_system(legacy_system(), Some(peer))
    }

    pub fn with_system(system: Value, peer: Option<SocketAddr>) -> Self {
        Self {
            state: Mutex::new(DeviceState {
                system,
                devs: vec![device(0, 63.2, 600.25), device(1, 61.0, 600.25)],
                stats: vec![board(0, 48, 600), board(1, 47, 575)],
                pools: vec![
                    pool(0, "stratum+tcp://dcr.pool.example:3252", "decred"),
                    pool(1, "stratum+tcp://sc.pool.example:3333", "sia"),
                ],
                miner_config: miner_config(),
                pool_config: pool_config(),
                restart_status: "S",
                failures: HashMap::new(),
                history: Vec::new(),
            }),
            peer,
            hold: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn set_boards(&self, devs: Vec<Value>, stats: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state.devs = devs;
        state.stats = stats;
    }

    pub fn set_restart_status(&self, status: &'static str) {
        self.state.lock().unwrap().restart_status = status;
    }

    /// The next call of `command` fails with `err` without reaching the rig
    pub fn fail_once(&self, command: &str, err: TransportError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(command.to_string(), err);
    }

    /// Commands received so far: RPC command names and raw shell lines
    pub fn history(&self) -> Vec<String> {
        self.state.lock().unwrap().history.clone()
    }

    pub fn miner_config(&self) -> Value {
        self.state.lock().unwrap().miner_config.clone()
    }

    pub fn pool_config(&self) -> Value {
        self.state.lock().unwrap().pool_config.clone()
    }

    /// Park every following call until [`FakeBaikal::release`]
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Wait until a call is parked
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.hold.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    /// Tear the connection down; parked calls fail
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
        self.release();
    }

    fn handle(&self, command: &str) -> Result<Vec<u8>, TransportError> {
        let request = match parse_rpc(command) {
            Some(request) => request,
            None => {
                let mut state = self.state.lock().unwrap();
                state.history.push(command.to_string());
                if let Some(err) = state.failures.remove(command) {
                    return Err(err);
                }
                return Ok(Vec::new());
            }
        };

        let mut state = self.state.lock().unwrap();
        state.history.push(request.command.clone());
        if let Some(err) = state.failures.remove(&request.command) {
            return Err(err);
        }

        let body = match request.command.as_str() {
            "system" => reply("SYSTEM", json!([state.system.clone()])),
            "summary+devs+stats+pools+system" => {
                let mut stats = state.stats.clone();
                stats.push(json!({"ID": "POOL0", "Pool Calls": 0}));
                json!({
                    "summary": [reply("SUMMARY", json!([summary()]))],
                    "devs": [reply("DEVS", Value::Array(state.devs.clone()))],
                    "stats": [reply("STATS", Value::Array(stats))],
                    "pools": [reply("POOLS", Value::Array(state.pools.clone()))],
                    "system": [reply("SYSTEM", json!([{"Temp CPU": 45.3}]))],
                    "id": 1
                })
            }
            "minerconf" => reply("MINERCONF", json!([state.miner_config.clone()])),
            "poolconf" => reply("POOLCONF", state.pool_config.clone()),
            "setminerconf" => {
                state.miner_config = serde_json::from_str(&request.parameter).unwrap();
                json!({"STATUS": ok("Miner config saved")})
            }
            "setpoolconf" => {
                state.pool_config = serde_json::from_str(&request.parameter).unwrap();
                json!({"STATUS": ok("Pool config saved")})
            }
            "restart" => json!({
                "STATUS": [{"STATUS": state.restart_status, "Code": 7, "Msg": "Restart"}]
            }),
            _ => json!({"STATUS": [{"STATUS": "E", "Code": 14, "Msg": "Invalid command"}]}),
        };

        let mut raw = serde_json::to_vec(&body).unwrap();
        raw.push(0);
        Ok(raw)
    }
}

#[async_trait]
impl Transport for FakeBaikal {
    async fn execute(
        &self,
        command: &str,
        _deadline: Option<Instant>,
    ) -> Result<Vec<u8>, TransportError> {
        if self.hold.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(TransportError::disconnected("connection reset by peer"));
        }
        self.handle(command)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

/// Recover the request from the runner's shell pipeline
fn parse_rpc(command: &str) -> Option<RpcRequest> {
    let rest = command.strip_prefix("printf '%s' ")?;
    let (quoted, _) = rest.rsplit_once(" | nc ")?;
    let payload = quoted
        .strip_prefix('\'')?
        .strip_suffix('\'')?
        .replace(r"'\''", "'");
    serde_json::from_str(&payload).ok()
}
