use crate::game::error::ActionError;
use crate::model::player::Participant;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KouLeResponse {
    Agree,
    Challenge,
}

impl fmt::Display for KouLeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KouLeResponse::Agree => f.write_str("agree"),
            KouLeResponse::Challenge => f.write_str("challenge"),
        }
    }
}

/// Open Kou Le declaration waiting on the other two participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KouLeNegotiation {
    initiator: Participant,
    responses: [Option<KouLeResponse>; 3],
}

impl KouLeNegotiation {
    pub fn new(initiator: Participant) -> Self {
        let mut responses = [None; 3];
        responses[initiator.index()] = Some(KouLeResponse::Agree);
        Self {
            initiator,
            responses,
        }
    }

    pub fn initiator(&self) -> Participant {
        self.initiator
    }

    pub fn response(&self, seat: Participant) -> Option<KouLeResponse> {
        self.responses[seat.index()]
    }

    pub fn check(&self, seat: Participant) -> Result<(), ActionError> {
        if seat == self.initiator {
            return Err(ActionError::InitiatorCannotRespond(seat));
        }
        if self.responses[seat.index()].is_some() {
            return Err(ActionError::AlreadyResponded(seat));
        }
        Ok(())
    }

    pub fn record(&mut self, seat: Participant, response: KouLeResponse) -> Result<(), ActionError> {
        self.check(seat)?;
        self.responses[seat.index()] = Some(response);
        Ok(())
    }

    /// Participants still expected to answer, in seat order.
    pub fn pending(&self) -> impl Iterator<Item = Participant> + '_ {
        Participant::LOOP
            .into_iter()
            .filter(|seat| self.responses[seat.index()].is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.responses.iter().all(Option::is_some)
    }

    pub fn challengers(&self) -> Vec<Participant> {
        Participant::LOOP
            .into_iter()
            .filter(|seat| self.responses[seat.index()] == Some(KouLeResponse::Challenge))
            .collect()
    }
}
