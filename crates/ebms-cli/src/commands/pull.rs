//! `ebms pull`: simulate one pull request against the configured producers

use anyhow::Result;
use clap::Args;
use ebms_core::{MepBinding, MessageInfo, PMode, PModeLeg, UserMessage};
use ebms_pull::{ErrorSignal, ExchangeContext, ExchangeHistory, PullEngine};
use serde::Serialize;

/// Arguments of `ebms pull`
#[derive(Debug, Clone, Args)]
pub struct PullArgs {
    /// Channel key to pull; omit to send a pull without one
    #[arg(long)]
    pub mpc: Option<String>,

    /// Message id of the pull request signal
    #[arg(long)]
    pub message: Option<String>,

    /// MEP binding governing the exchange (e.g. `pushAndPull` or its full URI)
    #[arg(long)]
    pub binding: Option<MepBinding>,

    /// Id of the completed push leg, for push-and-pull exchanges
    #[arg(long)]
    pub pushed: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum PullReport {
    Message { message: Box<UserMessage> },
    Error(ErrorSignal),
}

impl PullArgs {
    fn exchange(&self) -> Result<ExchangeContext> {
        let info = match &self.message {
            Some(id) => MessageInfo::with_id(id.clone()),
            None => MessageInfo::new(),
        };
        let mut exchange = ExchangeContext::new(info);
        if let Some(binding) = self.binding {
            let leg2 = match binding.mep() {
                ebms_core::Mep::OneWay => None,
                ebms_core::Mep::TwoWay => Some(PModeLeg::default()),
            };
            exchange =
                exchange.with_pmode(PMode::new("cli", binding, PModeLeg::default(), leg2)?);
        }
        if let Some(pushed) = &self.pushed {
            exchange = exchange.with_history(ExchangeHistory::push_completed(pushed.clone()));
        }
        Ok(exchange)
    }
}

/// Run one pull and print its outcome as JSON
pub async fn handle_pull(engine: &PullEngine, args: &PullArgs) -> Result<()> {
    let exchange = args.exchange()?;
    let report = match engine
        .handle_pull_request(args.mpc.as_deref(), &exchange)
        .await
    {
        Ok(message) => PullReport::Message {
            message: Box::new(message),
        },
        Err(error) => PullReport::Error(ErrorSignal::from_pull_error(
            &error,
            exchange.message_info.message_id.clone(),
        )),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
