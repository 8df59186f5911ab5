pub mod node;
pub mod ring;
pub mod config;
pub mod error;
pub mod lookup;
pub mod join;

pub use node::*;
pub use config::*;
pub use error::*;

use sha1::{Digest as _, Sha1};
use ring::{Digest, IdSpace};

/// SHA-1 of the data as a big-endian integer, reduced modulo 2^bits
pub fn calculate_hash(data: &[u8], space: &IdSpace) -> Digest {
	let hash = Sha1::digest(data);
	// the low 64 bits are enough because 2^bits divides 2^64
	let mut low = [0u8; 8];
	low.copy_from_slice(&hash[hash.len() - 8..]);
	Digest::from_be_bytes(low) & space.mask()
}

pub fn construct_node(name: &str, space: &IdSpace) -> Node {
	Node {
		id: calculate_hash(name.as_bytes(), space),
		name: name.to_string()
	}
}
