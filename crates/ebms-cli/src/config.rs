//! CLI configuration file
//!
//! The engine settings sit at the top level; static producers used to
//! simulate pulls are listed as `[[producers]]` tables:
//!
//! ```toml
//! producer_timeout_ms = 2000
//! channels = ["urn:fdc:ebms:mpc:orders"]
//!
//! [[producers]]
//! name = "orders-outbox"
//! mpc = "urn:fdc:ebms:mpc:orders"
//! message_id = "order-1@ebms"
//! payload = "<Order/>"
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use ebms_core::messages::{CollaborationInfo, Party, PartyInfo};
use ebms_core::{MessageInfo, MpcId, UserMessage};
use ebms_pull::{EngineConfig, MessageProducer, ProducerResponse, ProducerScope, PullContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine settings
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Producers that always offer one fixed message
    #[serde(default)]
    pub producers: Vec<StaticProducerConfig>,
}

/// One fixed-message producer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticProducerConfig {
    /// Producer name
    pub name: String,
    /// Channel served; all channels when absent
    #[serde(default)]
    pub mpc: Option<String>,
    /// Id of the offered message; generated when absent
    #[serde(default)]
    pub message_id: Option<String>,
    /// Sending party id
    #[serde(default = "default_party")]
    pub from: String,
    /// Receiving party id
    #[serde(default = "default_party")]
    pub to: String,
    /// Service of the offered message
    #[serde(default = "default_service")]
    pub service: String,
    /// Action of the offered message
    #[serde(default = "default_action")]
    pub action: String,
    /// Payload of the offered message
    #[serde(default)]
    pub payload: String,
}

fn default_party() -> String {
    "APP_1000000101".to_string()
}

fn default_service() -> String {
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/service".to_string()
}

fn default_action() -> String {
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/test".to_string()
}

impl CliConfig {
    /// Load a configuration file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.engine.merge_with_env()?;
        Ok(config)
    }
}

impl StaticProducerConfig {
    /// Scope the producer registers for
    pub fn scope(&self) -> Result<ProducerScope> {
        match &self.mpc {
            None => Ok(ProducerScope::AllChannels),
            Some(key) => Ok(ProducerScope::Channel(
                MpcId::new(key.as_str())
                    .with_context(|| format!("producer '{}'", self.name))?,
            )),
        }
    }

    /// Build the producer
    pub fn build(&self) -> Result<ConfiguredProducer> {
        let mpc = match &self.mpc {
            Some(key) => Some(MpcId::new(key.as_str())?),
            None => None,
        };
        let message_info = match &self.message_id {
            Some(id) => MessageInfo::with_id(id.clone()),
            None => MessageInfo::new(),
        };
        let message = UserMessage {
            collaboration_info: CollaborationInfo {
                agreement_ref: None,
                pmode_id: None,
                service_type: None,
                service: self.service.clone(),
                action: self.action.clone(),
                conversation_id: message_info.message_id.clone(),
            },
            message_info,
            party_info: PartyInfo {
                from: Party {
                    id: self.from.clone(),
                    role: "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/initiator"
                        .to_string(),
                },
                to: Party {
                    id: self.to.clone(),
                    role: "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/responder"
                        .to_string(),
                },
            },
            properties: Vec::new(),
            mpc,
            payload: self.payload.clone().into_bytes(),
        };
        Ok(ConfiguredProducer {
            name: self.name.clone(),
            message,
        })
    }
}

/// Producer built from a [`StaticProducerConfig`]
pub struct ConfiguredProducer {
    name: String,
    message: UserMessage,
}

#[async_trait]
impl MessageProducer for ConfiguredProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        ProducerResponse::message(self.message.clone())
    }
}
