//! Exchange pattern binding resolution
//!
//! Tells producers what a pull owes on the applicable MEP binding. The
//! resolver is a pure function of the binding and the prior-leg history; it
//! keeps no state and can be re-derived from the P-Mode and message history
//! at any time.
//!
//! | binding          | push leg done | obligation            |
//! |------------------|---------------|-----------------------|
//! | none configured  | any           | `Unspecified`         |
//! | push, sync, pushAndPush | any    | `NotPullable`         |
//! | pull             | any           | `InitiatingMessage`   |
//! | pullAndPush      | any           | `InitiatingMessage`   |
//! | pushAndPull      | no            | `AwaitingPushLeg`     |
//! | pushAndPull      | yes           | `ReplyToPush`         |

use ebms_core::{MepBinding, MessageInfo, MpcId, PMode, PullRequest};
use serde::{Deserialize, Serialize};

/// What the message history says about earlier legs of the exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeHistory {
    /// The pushed first leg of a push-and-pull exchange has completed
    pub push_leg_completed: bool,
    /// Message id of the completed push leg, if known
    pub pushed_message_id: Option<String>,
}

impl ExchangeHistory {
    /// History with a completed push leg
    pub fn push_completed(message_id: impl Into<String>) -> Self {
        Self {
            push_leg_completed: true,
            pushed_message_id: Some(message_id.into()),
        }
    }
}

/// What, if anything, a pull response owes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseObligation {
    /// No binding is known; producers decide on their own
    Unspecified,
    /// The binding has no pulled leg; nothing is owed through a pull
    NotPullable,
    /// The pull fetches the user message that initiates the exchange
    InitiatingMessage,
    /// The push leg has not completed; the reply is not due yet
    AwaitingPushLeg,
    /// The pull fetches the reply to the completed push leg
    ReplyToPush {
        /// Id of the pushed request the reply refers to
        ref_to_message_id: Option<String>,
    },
}

impl ResponseObligation {
    /// Whether a producer may answer with a message at all
    pub fn expects_message(&self) -> bool {
        matches!(
            self,
            ResponseObligation::Unspecified
                | ResponseObligation::InitiatingMessage
                | ResponseObligation::ReplyToPush { .. }
        )
    }
}

/// Resolve the obligation of a pull under `binding`
pub fn resolve_obligation(
    binding: Option<MepBinding>,
    history: &ExchangeHistory,
) -> ResponseObligation {
    let Some(binding) = binding else {
        return ResponseObligation::Unspecified;
    };
    match binding {
        MepBinding::Push | MepBinding::Sync | MepBinding::PushAndPush => {
            ResponseObligation::NotPullable
        }
        MepBinding::Pull | MepBinding::PullAndPush => ResponseObligation::InitiatingMessage,
        MepBinding::PushAndPull if history.push_leg_completed => ResponseObligation::ReplyToPush {
            ref_to_message_id: history.pushed_message_id.clone(),
        },
        MepBinding::PushAndPull => ResponseObligation::AwaitingPushLeg,
    }
}

/// Exchange information supplied by the transport with each pull
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeContext {
    /// Identity of the pull request signal
    pub message_info: MessageInfo,
    /// P-Mode governing the exchange, when the transport could determine one
    pub pmode: Option<PMode>,
    /// Prior-leg history of the exchange
    pub history: ExchangeHistory,
}

impl ExchangeContext {
    /// Context for a pull request with no P-Mode and no history
    pub fn new(message_info: MessageInfo) -> Self {
        Self {
            message_info,
            pmode: None,
            history: ExchangeHistory::default(),
        }
    }

    /// Context for a decoded pull request
    pub fn for_request(request: &PullRequest) -> Self {
        Self::new(request.message_info.clone())
    }

    /// Attach the governing P-Mode
    pub fn with_pmode(mut self, pmode: PMode) -> Self {
        self.pmode = Some(pmode);
        self
    }

    /// Attach the prior-leg history
    pub fn with_history(mut self, history: ExchangeHistory) -> Self {
        self.history = history;
        self
    }

    /// Binding of the governing P-Mode
    pub fn binding(&self) -> Option<MepBinding> {
        self.pmode.as_ref().map(|pmode| pmode.binding)
    }

    /// Obligation of the pull under this context
    pub fn obligation(&self) -> ResponseObligation {
        resolve_obligation(self.binding(), &self.history)
    }
}

/// Everything a producer is told about the pull it is asked to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullContext {
    /// Resolved channel
    pub mpc: MpcId,
    /// Exchange information from the transport
    pub exchange: ExchangeContext,
    /// Resolved obligation
    pub obligation: ResponseObligation,
}

impl PullContext {
    /// Resolve the obligation and bundle it with the exchange
    pub fn new(mpc: MpcId, exchange: ExchangeContext) -> Self {
        let obligation = exchange.obligation();
        Self {
            mpc,
            exchange,
            obligation,
        }
    }

    /// Id of the pull request signal
    pub fn pull_message_id(&self) -> &str {
        &self.exchange.message_info.message_id
    }

    /// Id of the P-Mode governing the exchange
    pub fn pmode_id(&self) -> Option<&str> {
        self.exchange.pmode.as_ref().map(|pmode| pmode.id.as_str())
    }
}
