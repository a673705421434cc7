//! P-Mode configuration records
//!
//! Only the parts of a P-Mode the processing core reads are modelled: the
//! exchange pattern, its binding, and per leg the partition channel and the
//! reliability contract. Persistence of these records is external.

use crate::errors::CoreError;
use crate::mep::{Mep, MepBinding};
use crate::mpc::MpcId;
use crate::reliability::ReliabilityContract;
use serde::{Deserialize, Serialize};

/// One leg of a P-Mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PModeLeg {
    /// Channel the leg's user message is placed on when pulled
    pub mpc: Option<MpcId>,
    /// Reliability contract of the leg; `None` when the leg has none
    pub reliability: Option<ReliabilityContract>,
}

impl PModeLeg {
    /// Leg bound to a partition channel
    pub fn on_channel(mpc: MpcId) -> Self {
        Self {
            mpc: Some(mpc),
            reliability: None,
        }
    }

    /// Attach a reliability contract
    pub fn with_reliability(mut self, reliability: ReliabilityContract) -> Self {
        self.reliability = Some(reliability);
        self
    }
}

/// Processing mode of a class of messages
///
/// Deserialized records go through [`PMode::new`], so a stored P-Mode with an
/// empty id, a MEP contradicting its binding, or a surplus leg is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PModeRecord")]
pub struct PMode {
    /// Unique P-Mode identifier
    pub id: String,
    /// Exchange pattern
    pub mep: Mep,
    /// Channel binding of the pattern
    pub binding: MepBinding,
    /// First leg
    pub leg1: PModeLeg,
    /// Second leg, present for two-way patterns
    pub leg2: Option<PModeLeg>,
}

/// P-Mode as persisted, before validation
#[derive(Deserialize)]
struct PModeRecord {
    id: String,
    #[serde(default)]
    mep: Option<Mep>,
    binding: MepBinding,
    #[serde(default)]
    leg1: PModeLeg,
    #[serde(default)]
    leg2: Option<PModeLeg>,
}

impl TryFrom<PModeRecord> for PMode {
    type Error = CoreError;

    fn try_from(record: PModeRecord) -> Result<Self, Self::Error> {
        if let Some(mep) = record.mep {
            if !record.binding.is_mep_compatible(mep) {
                return Err(CoreError::invalid_argument(
                    "PMode.mep",
                    format!("binding '{}' does not belong to {mep:?}", record.binding),
                ));
            }
        }
        PMode::new(record.id, record.binding, record.leg1, record.leg2)
    }
}

impl PMode {
    /// Create a P-Mode, checking the binding against the MEP and the legs
    pub fn new(
        id: impl Into<String>,
        binding: MepBinding,
        leg1: PModeLeg,
        leg2: Option<PModeLeg>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::invalid_argument("PMode.id", "must not be empty"));
        }
        let mep = binding.mep();
        if leg2.is_some() && mep == Mep::OneWay {
            return Err(CoreError::invalid_argument(
                "PMode.leg2",
                format!("binding '{binding}' is one-way and takes a single leg"),
            ));
        }
        Ok(Self {
            id,
            mep,
            binding,
            leg1,
            leg2,
        })
    }

    /// Leg by 1-based number
    pub fn leg(&self, number: u8) -> Option<&PModeLeg> {
        match number {
            1 => Some(&self.leg1),
            2 => self.leg2.as_ref(),
            _ => None,
        }
    }

    /// Channels referenced by any leg
    pub fn channels(&self) -> Vec<&MpcId> {
        [Some(&self.leg1), self.leg2.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|leg| leg.mpc.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tristate::TriState;

    #[test]
    fn test_mep_derived_from_binding() {
        let pmode = PMode::new(
            "pm-push-pull",
            MepBinding::PushAndPull,
            PModeLeg::default(),
            Some(PModeLeg::on_channel(MpcId::default_mpc())),
        )
        .unwrap();
        assert_eq!(pmode.mep, Mep::TwoWay);
        assert_eq!(pmode.channels(), vec![&MpcId::default_mpc()]);
        assert!(pmode.leg(2).is_some());
        assert!(pmode.leg(3).is_none());
    }

    #[test]
    fn test_one_way_rejects_second_leg() {
        let result = PMode::new(
            "pm-pull",
            MepBinding::Pull,
            PModeLeg::default(),
            Some(PModeLeg::default()),
        );
        assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn test_leg_owns_reliability() {
        let mut contract = ReliabilityContract::default();
        contract.set_at_least_once(TriState::True);
        let leg = PModeLeg::default().with_reliability(contract.clone());
        assert_eq!(leg.reliability, Some(contract));
    }

    #[test]
    fn test_stored_record_round_trips() {
        let pmode = PMode::new(
            "pm-pull-push",
            MepBinding::PullAndPush,
            PModeLeg::on_channel(MpcId::default_mpc()),
            Some(PModeLeg::default()),
        )
        .unwrap();
        let json = serde_json::to_string(&pmode).unwrap();
        assert_eq!(serde_json::from_str::<PMode>(&json).unwrap(), pmode);

        let without_mep: PMode =
            serde_json::from_str(r#"{"id":"pm-pull","binding":"Pull"}"#).unwrap();
        assert_eq!(without_mep.mep, Mep::OneWay);
    }

    #[test]
    fn test_inconsistent_stored_records_rejected() {
        for record in [
            r#"{"id":"","mep":"TwoWay","binding":"Push","leg1":{},"leg2":{}}"#,
            r#"{"id":"pm-a","mep":"TwoWay","binding":"Push","leg1":{}}"#,
            r#"{"id":"pm-b","mep":"OneWay","binding":"PushAndPull","leg1":{}}"#,
            r#"{"id":"pm-c","binding":"Pull","leg1":{},"leg2":{}}"#,
        ] {
            assert!(
                serde_json::from_str::<PMode>(record).is_err(),
                "accepted {record}"
            );
        }
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(PMode::new(" ", MepBinding::Push, PModeLeg::default(), None).is_err());
    }
}
