use super::error::{DhtError::*, DhtResult};

pub type Digest = u64;
// max number of bits of a digest
pub const MAX_BITS: u32 = Digest::BITS;

/// Identifier space [0, 2^m) with modular arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSpace {
	bits: u32
}

impl IdSpace {
	pub fn new(bits: u32) -> DhtResult<Self> {
		if bits == 0 || bits > MAX_BITS {
			return Err(InvalidBits(bits));
		}
		Ok(IdSpace { bits })
	}

	pub fn bits(&self) -> u32 {
		self.bits
	}

	/// Number of identifiers on the ring (2^m)
	pub fn size(&self) -> u128 {
		1u128 << self.bits
	}

	pub fn mask(&self) -> Digest {
		if self.bits == MAX_BITS {
			Digest::MAX
		} else {
			(1 << self.bits) - 1
		}
	}

	pub fn contains(&self, id: Digest) -> bool {
		id & !self.mask() == 0
	}

	pub fn check(&self, id: Digest) -> DhtResult<Digest> {
		if self.contains(id) {
			Ok(id)
		} else {
			Err(IdOutOfRange {
				id,
				bits: self.bits
			})
		}
	}

	// 2^m divides 2^64 so wrapping ops stay correct after masking
	pub fn add(&self, a: Digest, b: Digest) -> Digest {
		a.wrapping_add(b) & self.mask()
	}

	pub fn sub(&self, a: Digest, b: Digest) -> Digest {
		a.wrapping_sub(b) & self.mask()
	}

	/// 2^k, k in [0, m)
	pub fn pow2(&self, k: usize) -> Digest {
		1 << k
	}

	// Calculate start field of finger table (see Table 1)
	// k in [0, m)
	pub fn finger_start(&self, id: Digest, k: usize) -> Digest {
		self.add(id, self.pow2(k))
	}
}

/// Circular interval (start, end), or (start, end] when inclusive.
///
/// Equal bounds cover the whole ring except `start` itself,
/// and the whole ring when inclusive.
pub fn in_interval(id: Digest, start: Digest, end: Digest, inclusive: bool) -> bool {
	let strict = if end > start {
		// (start, id, end)
		id > start && id < end
	}
	else {
		// end <= start
		// case 1: (start, id, end + MAX_VAL)
		// case 2: (start, id + MAX_VAL, end + MAX_VAL)
		id > start || id < end
	};
	strict || (inclusive && id == end)
}

// Strictly in range: id in (start, end)
pub fn in_range(id: Digest, start: Digest, end: Digest) -> bool {
	in_interval(id, start, end, false)
}
