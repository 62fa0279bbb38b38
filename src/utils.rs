use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context as _, Result};
use iroh::SecretKey;
use rand::{distributions::Alphanumeric, Rng as _};
use serde_json::Value;
use tracing::info;

const STORE: &str = "store.json";
const SECRET_KEY: &str = "secretKey";
const INVITE_FRAGMENT: &str = "#channel=";
pub const ROOM_ID_LEN: usize = 10;

/// Small persistent key/value store kept as `store.json` in the data dir.
#[derive(Debug)]
pub struct AppStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl AppStore {
    /// Open the store under `data_dir`, creating the directory if needed.
    pub fn acquire(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
        let path = data_dir.join(STORE);
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("{} is not a valid store", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.save()
    }

    /// The node's secret key, generated and saved on first use so the peer id
    /// is stable across restarts.
    pub fn get_secret_key(&mut self) -> Result<SecretKey> {
        if let Some(hex_key) = self.get(SECRET_KEY).and_then(Value::as_str) {
            let bytes: [u8; 32] = hex::decode(hex_key)
                .context("stored secret key is not hex")?
                .try_into()
                .map_err(|_| anyhow::anyhow!("stored secret key has the wrong length"))?;
            return Ok(SecretKey::from_bytes(&bytes));
        }
        let key = SecretKey::generate(rand::rngs::OsRng);
        self.set(SECRET_KEY, hex::encode(key.to_bytes()))?;
        info!("generated a new node identity");
        Ok(key)
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Generate a Unix timestamp in Micros.
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_micros() as u64)
        .unwrap_or_default()
}

/// A fresh, short, shareable room id.
pub fn new_room_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_ID_LEN)
        .map(char::from)
        .collect()
}

/// Link a friend can open to join: `<base>#channel=<ticket>`.
pub fn invite_link(base_url: &str, ticket: &str) -> String {
    format!("{}{INVITE_FRAGMENT}{ticket}", base_url.trim_end_matches('#'))
}

/// Pull the ticket out of an invite link. A bare ticket is returned as is.
pub fn parse_invite(input: &str) -> &str {
    let input = input.trim();
    match input.split_once(INVITE_FRAGMENT) {
        Some((_, ticket)) => ticket.split('&').next().unwrap_or(ticket),
        None => input,
    }
}
