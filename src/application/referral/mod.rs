//! Referral lifecycle command handlers.

mod submit_request;
mod transition_request;

pub use submit_request::{
    SubmitReferralRequestCommand, SubmitReferralRequestError, SubmitReferralRequestHandler,
    SubmitReferralRequestResult,
};
pub use transition_request::{
    TransitionReferralCommand, TransitionReferralError, TransitionReferralHandler,
    TransitionReferralResult,
};
