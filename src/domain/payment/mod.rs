//! Payment domain: orders, callbacks, and the two trust models.
//!
//! The engine orchestrates payment but never clears money itself. Two
//! channels exist with very different guarantees:
//!
//! - **Gateway**: the processor calls back with a signature we verify
//!   cryptographically. "Paid" is machine-verified.
//! - **Self-attested**: a peer-to-peer transfer with no callback.
//!   "Paid" is the payer's word, gated by an explicit confirmation and a
//!   hard countdown. This channel is architecturally lower-trust and is
//!   logged with full auditability.

mod order;
mod self_attested;
mod verifier;

pub use order::{
    GatewayOrder, Money, PaymentCallback, PaymentChannel, PaymentReference, PaymentRequest,
};
pub use self_attested::{AttemptState, SelfAttestedAttempt};
pub use verifier::GatewaySignatureVerifier;

#[cfg(test)]
pub use verifier::compute_test_signature;
