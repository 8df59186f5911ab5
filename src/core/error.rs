use thiserror::Error;
use std::result::Result;
use super::ring::Digest;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DhtError {
	#[error("Invalid number of bits {0} (expected 1..=64)")]
	InvalidBits(u32),
	#[error("Identifier {id} out of range for a {bits}-bit ring")]
	IdOutOfRange { id: Digest, bits: u32 },
	#[error("Unknown node handle {0}")]
	UnknownNode(usize),
	#[error("Node {0} has not joined a ring")]
	NotJoined(Digest),
	#[error("Node {0} has already joined a ring")]
	AlreadyJoined(Digest),
	#[error("Node {0} cannot join through itself")]
	SelfJoin(Digest),
	#[error("Identifier {0} is already taken on the ring")]
	DuplicateIdentifier(Digest),
	#[error("Finger index {0} out of range")]
	InvalidFingerIndex(usize),
	#[error("Lookup of {id} gave up after {hops} hops")]
	RoutingFailure { id: Digest, hops: usize }
}

pub type DhtResult<T> = Result<T, DhtError>;
