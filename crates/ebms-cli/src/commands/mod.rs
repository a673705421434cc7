//! CLI command handlers

pub mod channels;
pub mod pull;

use crate::config::CliConfig;
use anyhow::Result;
use ebms_pull::PullEngine;

/// Build an engine with every configured static producer registered
pub fn build_engine(config: &CliConfig) -> Result<PullEngine> {
    let engine = PullEngine::from_config(config.engine.clone())?;
    for producer in &config.producers {
        engine
            .producers()
            .register(producer.scope()?, std::sync::Arc::new(producer.build()?));
    }
    Ok(engine)
}
